//! The abstract 2D paint target renderers draw against.
//!
//! The host application owns the real surface (an HTML canvas context, a
//! raster compositor, a test recorder); renderers only see this trait.
//! Drawing primitives are fallible because a host surface may reject an
//! operation mid-paint; renderers catch those failures at their outer
//! `draw` boundary so one bad layer never aborts the rest of the frame.

use thiserror::Error;

/// A drawing-surface operation was rejected by the host.
#[derive(Error, Debug, Clone)]
#[error("Surface operation failed: {message}")]
pub struct SurfaceError {
    /// What the host reported.
    pub message: String,
}

impl SurfaceError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Canvas-style 2D paint target.
///
/// Text drawing is centered on the given point (both axes); hosts that
/// anchor text differently must adjust internally. `measure_text` uses the
/// most recently set font.
pub trait RenderSurface {
    fn save(&mut self);
    fn restore(&mut self);

    fn set_stroke_color(&mut self, color: &str);
    fn set_fill_color(&mut self, color: &str);
    fn set_line_width(&mut self, width: f64);
    fn set_global_alpha(&mut self, alpha: f64);
    fn set_font(&mut self, size: f64, family: &str);

    fn translate(&mut self, dx: f64, dy: f64);
    fn rotate(&mut self, radians: f64);

    fn draw_line(&mut self, x1: f64, y1: f64, x2: f64, y2: f64) -> Result<(), SurfaceError>;
    /// Strokes a circular arc from `start_angle` to `end_angle` (radians,
    /// increasing counterclockwise in math convention, i.e. sweeping through
    /// increasing angle values modulo 2π).
    fn draw_arc(
        &mut self,
        cx: f64,
        cy: f64,
        radius: f64,
        start_angle: f64,
        end_angle: f64,
    ) -> Result<(), SurfaceError>;
    fn fill_circle(&mut self, cx: f64, cy: f64, radius: f64) -> Result<(), SurfaceError>;
    fn stroke_circle(&mut self, cx: f64, cy: f64, radius: f64) -> Result<(), SurfaceError>;
    fn fill_rect(&mut self, x: f64, y: f64, w: f64, h: f64) -> Result<(), SurfaceError>;
    fn stroke_rect(&mut self, x: f64, y: f64, w: f64, h: f64) -> Result<(), SurfaceError>;
    fn fill_text(&mut self, text: &str, x: f64, y: f64) -> Result<(), SurfaceError>;
    fn stroke_text(&mut self, text: &str, x: f64, y: f64) -> Result<(), SurfaceError>;

    /// Width of `text` in the current font.
    fn measure_text(&self, text: &str) -> f64;
}

/// One recorded surface call.
#[derive(Debug, Clone, PartialEq)]
pub enum SurfaceOp {
    Save,
    Restore,
    StrokeColor(String),
    FillColor(String),
    LineWidth(f64),
    GlobalAlpha(f64),
    Font { size: f64, family: String },
    Translate { dx: f64, dy: f64 },
    Rotate { radians: f64 },
    Line { x1: f64, y1: f64, x2: f64, y2: f64 },
    Arc { cx: f64, cy: f64, radius: f64, start_angle: f64, end_angle: f64 },
    FillCircle { cx: f64, cy: f64, radius: f64 },
    StrokeCircle { cx: f64, cy: f64, radius: f64 },
    FillRect { x: f64, y: f64, w: f64, h: f64 },
    StrokeRect { x: f64, y: f64, w: f64, h: f64 },
    FillText { text: String, x: f64, y: f64 },
    StrokeText { text: String, x: f64, y: f64 },
}

impl SurfaceOp {
    /// Coarse kind name, for call-sequence assertions.
    pub fn kind(&self) -> &'static str {
        match self {
            SurfaceOp::Save => "save",
            SurfaceOp::Restore => "restore",
            SurfaceOp::StrokeColor(_) => "stroke_color",
            SurfaceOp::FillColor(_) => "fill_color",
            SurfaceOp::LineWidth(_) => "line_width",
            SurfaceOp::GlobalAlpha(_) => "global_alpha",
            SurfaceOp::Font { .. } => "font",
            SurfaceOp::Translate { .. } => "translate",
            SurfaceOp::Rotate { .. } => "rotate",
            SurfaceOp::Line { .. } => "line",
            SurfaceOp::Arc { .. } => "arc",
            SurfaceOp::FillCircle { .. } => "fill_circle",
            SurfaceOp::StrokeCircle { .. } => "stroke_circle",
            SurfaceOp::FillRect { .. } => "fill_rect",
            SurfaceOp::StrokeRect { .. } => "stroke_rect",
            SurfaceOp::FillText { .. } => "fill_text",
            SurfaceOp::StrokeText { .. } => "stroke_text",
        }
    }
}

/// Surface that records every call, for tests and debugging.
///
/// `fail_on` injects a [`SurfaceError`] whenever an op of that kind is
/// attempted, to exercise the swallow-at-draw-boundary contract.
#[derive(Debug, Default)]
pub struct RecordingSurface {
    pub ops: Vec<SurfaceOp>,
    pub fail_on: Option<&'static str>,
    font_size: f64,
}

impl RecordingSurface {
    pub fn new() -> Self {
        Self {
            ops: Vec::new(),
            fail_on: None,
            font_size: 12.0,
        }
    }

    pub fn failing_on(kind: &'static str) -> Self {
        Self {
            fail_on: Some(kind),
            ..Self::new()
        }
    }

    pub fn count(&self, kind: &str) -> usize {
        self.ops.iter().filter(|op| op.kind() == kind).count()
    }

    /// Index of the first op of `kind`, if any.
    pub fn first_index(&self, kind: &str) -> Option<usize> {
        self.ops.iter().position(|op| op.kind() == kind)
    }

    fn record(&mut self, op: SurfaceOp) -> Result<(), SurfaceError> {
        if self.fail_on == Some(op.kind()) {
            return Err(SurfaceError::new(format!("injected failure on {}", op.kind())));
        }
        self.ops.push(op);
        Ok(())
    }

    fn record_infallible(&mut self, op: SurfaceOp) {
        // Injected failures only apply to the fallible drawing primitives.
        self.ops.push(op);
    }
}

impl RenderSurface for RecordingSurface {
    fn save(&mut self) {
        self.record_infallible(SurfaceOp::Save);
    }

    fn restore(&mut self) {
        self.record_infallible(SurfaceOp::Restore);
    }

    fn set_stroke_color(&mut self, color: &str) {
        self.record_infallible(SurfaceOp::StrokeColor(color.to_string()));
    }

    fn set_fill_color(&mut self, color: &str) {
        self.record_infallible(SurfaceOp::FillColor(color.to_string()));
    }

    fn set_line_width(&mut self, width: f64) {
        self.record_infallible(SurfaceOp::LineWidth(width));
    }

    fn set_global_alpha(&mut self, alpha: f64) {
        self.record_infallible(SurfaceOp::GlobalAlpha(alpha));
    }

    fn set_font(&mut self, size: f64, family: &str) {
        self.font_size = size;
        self.record_infallible(SurfaceOp::Font {
            size,
            family: family.to_string(),
        });
    }

    fn translate(&mut self, dx: f64, dy: f64) {
        self.record_infallible(SurfaceOp::Translate { dx, dy });
    }

    fn rotate(&mut self, radians: f64) {
        self.record_infallible(SurfaceOp::Rotate { radians });
    }

    fn draw_line(&mut self, x1: f64, y1: f64, x2: f64, y2: f64) -> Result<(), SurfaceError> {
        self.record(SurfaceOp::Line { x1, y1, x2, y2 })
    }

    fn draw_arc(
        &mut self,
        cx: f64,
        cy: f64,
        radius: f64,
        start_angle: f64,
        end_angle: f64,
    ) -> Result<(), SurfaceError> {
        self.record(SurfaceOp::Arc {
            cx,
            cy,
            radius,
            start_angle,
            end_angle,
        })
    }

    fn fill_circle(&mut self, cx: f64, cy: f64, radius: f64) -> Result<(), SurfaceError> {
        self.record(SurfaceOp::FillCircle { cx, cy, radius })
    }

    fn stroke_circle(&mut self, cx: f64, cy: f64, radius: f64) -> Result<(), SurfaceError> {
        self.record(SurfaceOp::StrokeCircle { cx, cy, radius })
    }

    fn fill_rect(&mut self, x: f64, y: f64, w: f64, h: f64) -> Result<(), SurfaceError> {
        self.record(SurfaceOp::FillRect { x, y, w, h })
    }

    fn stroke_rect(&mut self, x: f64, y: f64, w: f64, h: f64) -> Result<(), SurfaceError> {
        self.record(SurfaceOp::StrokeRect { x, y, w, h })
    }

    fn fill_text(&mut self, text: &str, x: f64, y: f64) -> Result<(), SurfaceError> {
        self.record(SurfaceOp::FillText {
            text: text.to_string(),
            x,
            y,
        })
    }

    fn stroke_text(&mut self, text: &str, x: f64, y: f64) -> Result<(), SurfaceError> {
        self.record(SurfaceOp::StrokeText {
            text: text.to_string(),
            x,
            y,
        })
    }

    fn measure_text(&self, text: &str) -> f64 {
        // Width heuristic matching a typical sans-serif aspect ratio.
        text.chars().count() as f64 * self.font_size * 0.6
    }
}
