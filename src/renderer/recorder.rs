//! Recording draw surface
//!
//! Implements [`DrawContext`] by appending every call to a list. The native
//! demo renders into one so the full frame path runs headless, and tests
//! assert on the recorded commands.

use serde::{Deserialize, Serialize};

use super::{Color, DrawContext, LinearGradient, TextAlign};

/// One recorded drawing call
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum DrawCommand {
    SetFill(Color),
    SetFillGradient(LinearGradient),
    SetStroke {
        color: Color,
        width: f32,
    },
    FillRect {
        x: f32,
        y: f32,
        w: f32,
        h: f32,
    },
    BeginPath,
    MoveTo {
        x: f32,
        y: f32,
    },
    LineTo {
        x: f32,
        y: f32,
    },
    ClosePath,
    Arc {
        cx: f32,
        cy: f32,
        radius: f32,
        start: f32,
        end: f32,
    },
    Ellipse {
        cx: f32,
        cy: f32,
        rx: f32,
        ry: f32,
        start: f32,
        end: f32,
    },
    Fill,
    Stroke,
    SetFont {
        size: f32,
        bold: bool,
    },
    SetTextAlign(TextAlign),
    FillText {
        text: String,
        x: f32,
        y: f32,
    },
    Save,
    Restore,
    SetGlobalAlpha(f32),
}

/// In-memory [`DrawContext`]
#[derive(Debug, Clone, Default)]
pub struct CommandRecorder {
    pub commands: Vec<DrawCommand>,
    /// Frames finished with [`CommandRecorder::clear`]
    pub frames: u64,
}

impl CommandRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Drop the recorded commands, counting the frame
    pub fn clear(&mut self) {
        self.commands.clear();
        self.frames += 1;
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    /// Every string drawn, in order
    pub fn texts(&self) -> Vec<&str> {
        self.commands
            .iter()
            .filter_map(|c| match c {
                DrawCommand::FillText { text, .. } => Some(text.as_str()),
                _ => None,
            })
            .collect()
    }

    pub fn fill_rects(&self) -> usize {
        self.count(|c| matches!(c, DrawCommand::FillRect { .. }))
    }

    pub fn count(&self, pred: impl Fn(&DrawCommand) -> bool) -> usize {
        self.commands.iter().filter(|c| pred(c)).count()
    }

    /// Index of the first command matching `pred`
    pub fn position(&self, pred: impl Fn(&DrawCommand) -> bool) -> Option<usize> {
        self.commands.iter().position(pred)
    }
}

impl DrawContext for CommandRecorder {
    fn set_fill(&mut self, color: Color) {
        self.commands.push(DrawCommand::SetFill(color));
    }

    fn set_fill_gradient(&mut self, gradient: &LinearGradient) {
        self.commands.push(DrawCommand::SetFillGradient(gradient.clone()));
    }

    fn set_stroke(&mut self, color: Color, width: f32) {
        self.commands.push(DrawCommand::SetStroke { color, width });
    }

    fn fill_rect(&mut self, x: f32, y: f32, w: f32, h: f32) {
        self.commands.push(DrawCommand::FillRect { x, y, w, h });
    }

    fn begin_path(&mut self) {
        self.commands.push(DrawCommand::BeginPath);
    }

    fn move_to(&mut self, x: f32, y: f32) {
        self.commands.push(DrawCommand::MoveTo { x, y });
    }

    fn line_to(&mut self, x: f32, y: f32) {
        self.commands.push(DrawCommand::LineTo { x, y });
    }

    fn close_path(&mut self) {
        self.commands.push(DrawCommand::ClosePath);
    }

    fn arc(&mut self, cx: f32, cy: f32, radius: f32, start: f32, end: f32) {
        self.commands.push(DrawCommand::Arc {
            cx,
            cy,
            radius,
            start,
            end,
        });
    }

    fn ellipse(&mut self, cx: f32, cy: f32, rx: f32, ry: f32, start: f32, end: f32) {
        self.commands.push(DrawCommand::Ellipse {
            cx,
            cy,
            rx,
            ry,
            start,
            end,
        });
    }

    fn fill(&mut self) {
        self.commands.push(DrawCommand::Fill);
    }

    fn stroke(&mut self) {
        self.commands.push(DrawCommand::Stroke);
    }

    fn set_font(&mut self, size_px: f32, bold: bool) {
        self.commands.push(DrawCommand::SetFont {
            size: size_px,
            bold,
        });
    }

    fn set_text_align(&mut self, align: TextAlign) {
        self.commands.push(DrawCommand::SetTextAlign(align));
    }

    fn fill_text(&mut self, text: &str, x: f32, y: f32) {
        self.commands.push(DrawCommand::FillText {
            text: text.to_string(),
            x,
            y,
        });
    }

    fn save(&mut self) {
        self.commands.push(DrawCommand::Save);
    }

    fn restore(&mut self) {
        self.commands.push(DrawCommand::Restore);
    }

    fn set_global_alpha(&mut self, alpha: f32) {
        self.commands.push(DrawCommand::SetGlobalAlpha(alpha));
    }
}
