//! Browser drawing surface
//!
//! Backs [`DrawContext`] with a `CanvasRenderingContext2d`. Failed draw
//! calls are logged and skipped; they never abort a frame.

use wasm_bindgen::{JsCast, JsValue};
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement};

use super::{Color, DrawContext, LinearGradient, TextAlign};

/// Look up the 2D context of a canvas element
pub fn context_2d(canvas: &HtmlCanvasElement) -> Result<CanvasRenderingContext2d, JsValue> {
    canvas
        .get_context("2d")?
        .ok_or_else(|| JsValue::from_str("canvas has no 2d context"))?
        .dyn_into::<CanvasRenderingContext2d>()
        .map_err(|_| JsValue::from_str("2d context has an unexpected type"))
}

fn warn_on_err(op: &str, result: Result<(), JsValue>) {
    if let Err(e) = result {
        log::warn!("Canvas {} failed: {:?}", op, e);
    }
}

impl DrawContext for CanvasRenderingContext2d {
    fn set_fill(&mut self, color: Color) {
        self.set_fill_style_str(&color.to_css());
    }

    fn set_fill_gradient(&mut self, gradient: &LinearGradient) {
        let (x0, y0) = gradient.from;
        let (x1, y1) = gradient.to;
        let canvas_gradient =
            self.create_linear_gradient(x0 as f64, y0 as f64, x1 as f64, y1 as f64);
        for (offset, color) in &gradient.stops {
            warn_on_err(
                "gradient stop",
                canvas_gradient.add_color_stop(*offset, &color.to_css()),
            );
        }
        self.set_fill_style_canvas_gradient(&canvas_gradient);
    }

    fn set_stroke(&mut self, color: Color, width: f32) {
        self.set_stroke_style_str(&color.to_css());
        self.set_line_width(width as f64);
    }

    fn fill_rect(&mut self, x: f32, y: f32, w: f32, h: f32) {
        CanvasRenderingContext2d::fill_rect(self, x as f64, y as f64, w as f64, h as f64);
    }

    fn begin_path(&mut self) {
        CanvasRenderingContext2d::begin_path(self);
    }

    fn move_to(&mut self, x: f32, y: f32) {
        CanvasRenderingContext2d::move_to(self, x as f64, y as f64);
    }

    fn line_to(&mut self, x: f32, y: f32) {
        CanvasRenderingContext2d::line_to(self, x as f64, y as f64);
    }

    fn close_path(&mut self) {
        CanvasRenderingContext2d::close_path(self);
    }

    fn arc(&mut self, cx: f32, cy: f32, radius: f32, start: f32, end: f32) {
        warn_on_err(
            "arc",
            CanvasRenderingContext2d::arc(
                self,
                cx as f64,
                cy as f64,
                radius as f64,
                start as f64,
                end as f64,
            ),
        );
    }

    fn ellipse(&mut self, cx: f32, cy: f32, rx: f32, ry: f32, start: f32, end: f32) {
        warn_on_err(
            "ellipse",
            CanvasRenderingContext2d::ellipse(
                self,
                cx as f64,
                cy as f64,
                rx as f64,
                ry as f64,
                0.0,
                start as f64,
                end as f64,
            ),
        );
    }

    fn fill(&mut self) {
        CanvasRenderingContext2d::fill(self);
    }

    fn stroke(&mut self) {
        CanvasRenderingContext2d::stroke(self);
    }

    fn set_font(&mut self, size_px: f32, bold: bool) {
        let weight = if bold { "bold " } else { "" };
        CanvasRenderingContext2d::set_font(self, &format!("{}{}px monospace", weight, size_px));
    }

    fn set_text_align(&mut self, align: TextAlign) {
        CanvasRenderingContext2d::set_text_align(self, align.as_str());
    }

    fn fill_text(&mut self, text: &str, x: f32, y: f32) {
        warn_on_err(
            "fill_text",
            CanvasRenderingContext2d::fill_text(self, text, x as f64, y as f64),
        );
    }

    fn save(&mut self) {
        CanvasRenderingContext2d::save(self);
    }

    fn restore(&mut self) {
        CanvasRenderingContext2d::restore(self);
    }

    fn set_global_alpha(&mut self, alpha: f32) {
        CanvasRenderingContext2d::set_global_alpha(self, alpha as f64);
    }
}
