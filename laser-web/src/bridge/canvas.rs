//! Canvas 2D implementation of the draw surface

use std::f64::consts::TAU;

use nalgebra::Point2;
use tracing::warn;
use wasm_bindgen::JsCast;
use web_sys::{CanvasRenderingContext2d, Document, HtmlCanvasElement, HtmlVideoElement};

use crate::error::PointerError;
use crate::geometry::{FitRect, ViewportGeometry};
use crate::renderer::{DrawSurface, Stroke};

pub struct CanvasSurface {
    canvas: HtmlCanvasElement,
    ctx: CanvasRenderingContext2d,
    video: HtmlVideoElement,
}

impl CanvasSurface {
    /// Bind to the canvas with `canvas_id`
    pub fn from_document(
        document: &Document,
        canvas_id: &str,
        video: HtmlVideoElement,
    ) -> Result<Self, PointerError> {
        let canvas = document
            .get_element_by_id(canvas_id)
            .ok_or_else(|| PointerError::SurfaceUnavailable(format!("no element '#{canvas_id}'")))?
            .dyn_into::<HtmlCanvasElement>()
            .map_err(|_| PointerError::SurfaceUnavailable(format!("'#{canvas_id}' is not a canvas")))?;

        let ctx = canvas
            .get_context("2d")
            .map_err(|e| PointerError::SurfaceUnavailable(format!("{e:?}")))?
            .ok_or_else(|| PointerError::SurfaceUnavailable("2d context unavailable".into()))?
            .dyn_into::<CanvasRenderingContext2d>()
            .map_err(|_| PointerError::SurfaceUnavailable("unexpected context type".into()))?;

        ctx.set_line_cap("round");
        Ok(Self { canvas, ctx, video })
    }

    fn apply_stroke(&self, stroke: &Stroke) {
        self.ctx.set_stroke_style_str(stroke.color);
        self.ctx.set_line_width(stroke.width);
    }

    fn circle_path(&self, center: Point2<f64>, radius: f64) -> bool {
        self.ctx.begin_path();
        self.ctx.arc(center.x, center.y, radius, 0.0, TAU).is_ok()
    }
}

impl DrawSurface for CanvasSurface {
    fn resize(&mut self, viewport: &ViewportGeometry) {
        let style = self.canvas.style();
        let _ = style.set_property("width", &format!("{}px", viewport.css_width));
        let _ = style.set_property("height", &format!("{}px", viewport.css_height));

        // setting the size resets the context state
        self.canvas.set_width(viewport.internal_width);
        self.canvas.set_height(viewport.internal_height);

        let _ = self.ctx.set_transform(1.0, 0.0, 0.0, 1.0, 0.0, 0.0);
        self.ctx.set_image_smoothing_enabled(false);
        self.ctx.set_line_cap("round");
    }

    fn clear(&mut self, width: f64, height: f64) {
        self.ctx.clear_rect(0.0, 0.0, width, height);
    }

    fn save(&mut self) {
        self.ctx.save();
    }

    fn restore(&mut self) {
        self.ctx.restore();
    }

    fn mirror_horizontally(&mut self, width: f64) {
        let _ = self.ctx.translate(width, 0.0);
        let _ = self.ctx.scale(-1.0, 1.0);
    }

    fn draw_video(&mut self, fit: &FitRect) {
        if let Err(err) = self.ctx.draw_image_with_html_video_element_and_dw_and_dh(
            &self.video,
            fit.offset_x,
            fit.offset_y,
            fit.width,
            fit.height,
        ) {
            warn!(error = ?err, "video frame could not be drawn");
        }
    }

    fn stroke_line(&mut self, from: Point2<f64>, to: Point2<f64>, stroke: &Stroke) {
        self.apply_stroke(stroke);
        self.ctx.begin_path();
        self.ctx.move_to(from.x, from.y);
        self.ctx.line_to(to.x, to.y);
        self.ctx.stroke();
    }

    fn fill_circle(&mut self, center: Point2<f64>, radius: f64, color: &str) {
        self.ctx.set_fill_style_str(color);
        if self.circle_path(center, radius) {
            self.ctx.fill();
        }
    }

    fn stroke_circle(&mut self, center: Point2<f64>, radius: f64, stroke: &Stroke) {
        self.apply_stroke(stroke);
        if self.circle_path(center, radius) {
            self.ctx.stroke();
        }
    }
}
