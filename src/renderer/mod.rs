//! 2D rendering module
//!
//! The game draws through [`DrawContext`], a small canvas-style immediate
//! mode API: rects, arcs, paths, linear gradients and text. The browser
//! build backs it with a `CanvasRenderingContext2d`; tests and the native
//! demo record the calls instead.

#[cfg(target_arch = "wasm32")]
pub mod canvas;
pub mod recorder;
pub mod scene;
pub mod sprites;

pub use recorder::{CommandRecorder, DrawCommand};
pub use scene::{render, render_preview};

use serde::{Deserialize, Serialize};

/// Straight (non-premultiplied) RGBA color
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    /// 0.0 - 1.0
    pub a: f32,
}

impl Color {
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 1.0 }
    }

    pub const fn rgba(r: u8, g: u8, b: u8, a: f32) -> Self {
        Self { r, g, b, a }
    }

    pub fn with_alpha(self, a: f32) -> Self {
        Self {
            a: a.clamp(0.0, 1.0),
            ..self
        }
    }

    /// CSS color string (`#rrggbb` when opaque)
    pub fn to_css(&self) -> String {
        if self.a >= 1.0 {
            format!("#{:02X}{:02X}{:02X}", self.r, self.g, self.b)
        } else {
            format!("rgba({}, {}, {}, {})", self.r, self.g, self.b, self.a)
        }
    }
}

/// Palette
pub mod palette {
    use super::Color;

    pub const BRAND_BLUE: Color = Color::rgb(0x00, 0x52, 0xFF);
    pub const GOLD: Color = Color::rgb(0xFF, 0xD7, 0x00);
    pub const GOLD_RIM: Color = Color::rgb(0xDA, 0xA5, 0x20);
    pub const CORNSILK: Color = Color::rgb(0xFF, 0xF8, 0xDC);
    pub const WHITE: Color = Color::rgb(0xFF, 0xFF, 0xFF);
    pub const SKY_MID: Color = Color::rgb(0xF0, 0xF7, 0xFF);
    pub const SKY_LOW: Color = Color::rgb(0xE0, 0xEF, 0xFF);
    pub const SKY_PREVIEW: Color = Color::rgb(0xE8, 0xF0, 0xFF);
    pub const SUN: Color = Color::rgb(255, 200, 0);
}

/// Vertical or horizontal color ramp between two points
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinearGradient {
    pub from: (f32, f32),
    pub to: (f32, f32),
    /// (offset 0-1, color), in increasing offset order
    pub stops: Vec<(f32, Color)>,
}

impl LinearGradient {
    pub fn vertical(height: f32, stops: &[(f32, Color)]) -> Self {
        Self {
            from: (0.0, 0.0),
            to: (0.0, height),
            stops: stops.to_vec(),
        }
    }
}

/// Horizontal text anchor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum TextAlign {
    #[default]
    Left,
    Center,
    Right,
}

impl TextAlign {
    pub fn as_str(&self) -> &'static str {
        match self {
            TextAlign::Left => "left",
            TextAlign::Center => "center",
            TextAlign::Right => "right",
        }
    }
}

/// Canvas-style immediate mode drawing surface
pub trait DrawContext {
    fn set_fill(&mut self, color: Color);
    fn set_fill_gradient(&mut self, gradient: &LinearGradient);
    fn set_stroke(&mut self, color: Color, width: f32);

    fn fill_rect(&mut self, x: f32, y: f32, w: f32, h: f32);

    fn begin_path(&mut self);
    fn move_to(&mut self, x: f32, y: f32);
    fn line_to(&mut self, x: f32, y: f32);
    fn close_path(&mut self);
    /// Circular arc (radians, clockwise in screen space)
    fn arc(&mut self, cx: f32, cy: f32, radius: f32, start: f32, end: f32);
    /// Axis-aligned elliptical arc
    fn ellipse(&mut self, cx: f32, cy: f32, rx: f32, ry: f32, start: f32, end: f32);
    fn fill(&mut self);
    fn stroke(&mut self);

    /// Monospace font at the given pixel size
    fn set_font(&mut self, size_px: f32, bold: bool);
    fn set_text_align(&mut self, align: TextAlign);
    fn fill_text(&mut self, text: &str, x: f32, y: f32);

    fn save(&mut self);
    fn restore(&mut self);
    fn set_global_alpha(&mut self, alpha: f32);
}

/// Filled full circle as its own path
pub fn fill_circle(ctx: &mut dyn DrawContext, cx: f32, cy: f32, radius: f32) {
    ctx.begin_path();
    ctx.arc(cx, cy, radius, 0.0, std::f32::consts::TAU);
    ctx.fill();
}

/// Filled full ellipse as its own path
pub fn fill_ellipse(ctx: &mut dyn DrawContext, cx: f32, cy: f32, rx: f32, ry: f32) {
    ctx.begin_path();
    ctx.ellipse(cx, cy, rx, ry, 0.0, std::f32::consts::TAU);
    ctx.fill();
}
