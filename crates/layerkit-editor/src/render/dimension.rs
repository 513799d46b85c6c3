//! Linear dimension rendering, bounds, and hit testing.

use layerkit_core::geometry::{point_to_segment_distance, Bounds, Point};

use crate::measure::{append_tolerance_to_text, format_with_tolerance, Tolerance, UnitFormat};
use crate::model::{DimensionLayer, EndStyle, Layer, Orientation, TextPosition};
use crate::surface::{RenderSurface, SurfaceError};

/// Distance within which a point counts as hitting a dimension line.
pub const HIT_TOLERANCE: f64 = 6.0;

const DEFAULT_STROKE_WIDTH: f64 = 1.0;
const DEFAULT_FONT_SIZE: f64 = 12.0;
const BOUNDS_PADDING: f64 = 5.0;
const LABEL_CLEARANCE: f64 = 4.0;

/// Precomputed screen geometry for one dimension layer.
struct DimensionGeometry {
    p1: Point,
    p2: Point,
    distance: f64,
    /// Unit vector along the measured baseline.
    dir: (f64, f64),
    /// Unit vector perpendicular to the dimension line, on the offset side.
    perp: (f64, f64),
    /// Offset of the dimension line from the baseline.
    offset: f64,
    /// Dimension line endpoints (baseline endpoints pushed out by `offset`).
    a: Point,
    b: Point,
}

/// Drawing and geometry engine for `dimension` layers.
#[derive(Debug, Clone, Copy, Default)]
pub struct DimensionRenderer;

impl DimensionRenderer {
    pub const END_STYLES: [EndStyle; 4] = EndStyle::ALL;
    pub const TEXT_POSITIONS: [TextPosition; 3] = TextPosition::ALL;

    pub fn new() -> Self {
        Self
    }

    /// Euclidean distance between the two anchor points.
    pub fn calculate_distance(dim: &DimensionLayer) -> f64 {
        let dx = dim.x2 - dim.x1;
        let dy = dim.y2 - dim.y1;
        (dx * dx + dy * dy).sqrt()
    }

    fn units(dim: &DimensionLayer) -> UnitFormat {
        UnitFormat {
            unit: dim.unit.clone(),
            spaced: true,
            show_unit: dim.show_unit,
            precision: dim.precision,
        }
    }

    fn tolerance(dim: &DimensionLayer) -> Tolerance {
        Tolerance {
            kind: dim.tolerance_type,
            value: dim.tolerance_value,
            upper: dim.tolerance_upper,
            lower: dim.tolerance_lower,
        }
    }

    /// Formats a raw pixel distance: scale, round to precision, unit,
    /// tolerance suffix.
    pub fn format_measurement(&self, raw_distance: f64, dim: &DimensionLayer) -> String {
        let scale = if dim.scale.is_finite() && dim.scale != 0.0 {
            dim.scale
        } else {
            1.0
        };
        format_with_tolerance(raw_distance * scale, &Self::units(dim), &Self::tolerance(dim))
    }

    /// Appends the tolerance notation to a user-entered label.
    pub fn format_user_text_with_tolerance(&self, text: &str, dim: &DimensionLayer) -> String {
        append_tolerance_to_text(text, &Self::tolerance(dim))
    }

    /// The label to draw: user override text (with tolerance appended) when
    /// present, otherwise the auto-computed measurement.
    pub fn build_display_text(&self, raw_distance: f64, dim: &DimensionLayer) -> String {
        match dim.text.as_deref() {
            Some(text) if !text.trim().is_empty() => {
                self.format_user_text_with_tolerance(text, dim)
            }
            _ => self.format_measurement(raw_distance, dim),
        }
    }

    fn geometry(dim: &DimensionLayer) -> Option<DimensionGeometry> {
        let p1 = Point::new(dim.x1, dim.y1);
        let p2 = Point::new(dim.x2, dim.y2);
        let distance = Self::calculate_distance(dim);
        if distance == 0.0 {
            return None;
        }
        let dir = ((p2.x - p1.x) / distance, (p2.y - p1.y) / distance);
        // Orientation constrains only the offset direction, never whether
        // the annotation draws.
        let perp = match dim.orientation {
            Orientation::Horizontal => (0.0, -1.0),
            Orientation::Vertical => (1.0, 0.0),
            Orientation::Free => (-dir.1, dir.0),
        };
        let offset = dim.line_offset();
        let a = Point::new(p1.x + perp.0 * offset, p1.y + perp.1 * offset);
        let b = Point::new(p2.x + perp.0 * offset, p2.y + perp.1 * offset);
        Some(DimensionGeometry {
            p1,
            p2,
            distance,
            dir,
            perp,
            offset,
            a,
            b,
        })
    }

    /// Draws the annotation: extension lines, offset dimension line, end
    /// markers, label. Coincident endpoints draw nothing at all. Surface
    /// failures are swallowed here; one bad layer never aborts the frame.
    pub fn draw(&self, surface: &mut dyn RenderSurface, layer: &Layer, dim: &DimensionLayer) {
        let Some(geometry) = Self::geometry(dim) else {
            return;
        };
        surface.save();
        if let Err(e) = self.paint(surface, layer, dim, &geometry) {
            tracing::trace!(layer = %layer.id, error = %e, "dimension paint aborted");
        }
        surface.restore();
    }

    fn paint(
        &self,
        surface: &mut dyn RenderSurface,
        layer: &Layer,
        dim: &DimensionLayer,
        g: &DimensionGeometry,
    ) -> Result<(), SurfaceError> {
        let stroke = layer.stroke.as_deref().unwrap_or("#000000");
        let width = layer.stroke_width_or(DEFAULT_STROKE_WIDTH);
        let font_size = effective_font_size(dim.font_size);

        surface.set_global_alpha(layer.effective_opacity());
        surface.set_stroke_color(stroke);
        surface.set_line_width(width);
        surface.set_font(font_size, "sans-serif");

        // Extension lines first so every later stroke layers over them.
        let gap = dim.extension_gap;
        let excursion = g.offset + dim.extension_length;
        for base in [g.p1, g.p2] {
            surface.draw_line(
                base.x + g.perp.0 * gap,
                base.y + g.perp.1 * gap,
                base.x + g.perp.0 * excursion,
                base.y + g.perp.1 * excursion,
            )?;
        }

        let text = self.build_display_text(g.distance, dim);
        let text_width = surface.measure_text(&text);
        let mid = Point::new((g.a.x + g.b.x) / 2.0, (g.a.y + g.b.y) / 2.0);

        // Main dimension line. A centered label without a background breaks
        // the line into two segments flanking the text.
        let split = dim.text_position == TextPosition::Center && !dim.show_background;
        let half_gap = text_width / 2.0 + LABEL_CLEARANCE;
        if split && g.distance > 2.0 * half_gap {
            surface.draw_line(
                g.a.x,
                g.a.y,
                mid.x - g.dir.0 * half_gap,
                mid.y - g.dir.1 * half_gap,
            )?;
            surface.draw_line(
                mid.x + g.dir.0 * half_gap,
                mid.y + g.dir.1 * half_gap,
                g.b.x,
                g.b.y,
            )?;
        } else {
            surface.draw_line(g.a.x, g.a.y, g.b.x, g.b.y)?;
        }

        // End markers point outward along the dimension line.
        let out1 = (-g.dir.0, -g.dir.1);
        let out2 = g.dir;
        draw_end_marker(surface, dim.end_style, g.a, out1, width, stroke)?;
        draw_end_marker(surface, dim.end_style, g.b, out2, width, stroke)?;

        // Label.
        match dim.text_position {
            TextPosition::Center => {
                if dim.show_background {
                    surface.set_fill_color(layer.fill.as_deref().unwrap_or("#ffffff"));
                    surface.fill_rect(
                        mid.x - text_width / 2.0 - 2.0,
                        mid.y - font_size / 2.0 - 2.0,
                        text_width + 4.0,
                        font_size + 4.0,
                    )?;
                }
                surface.set_fill_color(stroke);
                surface.fill_text(&text, mid.x, mid.y)?;
            }
            TextPosition::Above => {
                surface.set_fill_color(stroke);
                surface.fill_text(
                    &text,
                    mid.x + g.perp.0 * (font_size * 0.6 + 3.0),
                    mid.y + g.perp.1 * (font_size * 0.6 + 3.0),
                )?;
            }
            TextPosition::Below => {
                surface.set_fill_color(stroke);
                surface.fill_text(
                    &text,
                    mid.x - g.perp.0 * (font_size * 0.6 + 3.0),
                    mid.y - g.perp.1 * (font_size * 0.6 + 3.0),
                )?;
            }
        }
        Ok(())
    }

    /// Axis-aligned box covering anchors, extension excursion, and label.
    pub fn get_bounds(&self, _layer: &Layer, dim: &DimensionLayer) -> Bounds {
        let p1 = Point::new(dim.x1, dim.y1);
        let p2 = Point::new(dim.x2, dim.y2);
        let mut bounds = Bounds::at_point(p1);
        bounds.include(p2);
        if let Some(g) = Self::geometry(dim) {
            let excursion = g.offset + dim.extension_length;
            bounds.include(Point::new(p1.x + g.perp.0 * excursion, p1.y + g.perp.1 * excursion));
            bounds.include(Point::new(p2.x + g.perp.0 * excursion, p2.y + g.perp.1 * excursion));
            // Approximate label metrics; no surface is available here.
            let font_size = effective_font_size(dim.font_size);
            let text = self.build_display_text(g.distance, dim);
            let text_width = text.chars().count() as f64 * font_size * 0.6;
            let mid = Point::new((g.a.x + g.b.x) / 2.0, (g.a.y + g.b.y) / 2.0);
            bounds.include(Point::new(mid.x - text_width / 2.0, mid.y - font_size));
            bounds.include(Point::new(mid.x + text_width / 2.0, mid.y + font_size));
        }
        bounds.padded(BOUNDS_PADDING)
    }

    /// Hit test against the *offset* dimension line and both extension
    /// lines, never the raw baseline.
    pub fn hit_test(&self, _layer: &Layer, dim: &DimensionLayer, px: f64, py: f64) -> bool {
        let Some(g) = Self::geometry(dim) else {
            // Degenerate annotation: only the coincident anchor is hittable.
            return Point::new(px, py).distance_to(&Point::new(dim.x1, dim.y1)) <= HIT_TOLERANCE;
        };
        if point_to_segment_distance(px, py, g.a.x, g.a.y, g.b.x, g.b.y) <= HIT_TOLERANCE {
            return true;
        }
        let gap = dim.extension_gap;
        let excursion = g.offset + dim.extension_length;
        for base in [g.p1, g.p2] {
            let d = point_to_segment_distance(
                px,
                py,
                base.x + g.perp.0 * gap,
                base.y + g.perp.1 * gap,
                base.x + g.perp.0 * excursion,
                base.y + g.perp.1 * excursion,
            );
            if d <= HIT_TOLERANCE {
                return true;
            }
        }
        false
    }
}

fn effective_font_size(size: f64) -> f64 {
    if size.is_finite() && size > 0.0 {
        size
    } else {
        DEFAULT_FONT_SIZE
    }
}

/// Draws one end marker at `tip`, with `out` the outward unit direction
/// along the dimension line.
pub(crate) fn draw_end_marker(
    surface: &mut dyn RenderSurface,
    style: EndStyle,
    tip: Point,
    out: (f64, f64),
    stroke_width: f64,
    stroke_color: &str,
) -> Result<(), SurfaceError> {
    match style {
        EndStyle::Arrow => {
            let length = 8.0 + stroke_width * 2.0;
            let spread = 0.42;
            for sign in [1.0, -1.0] {
                let angle = out.1.atan2(out.0) + std::f64::consts::PI + sign * spread;
                surface.draw_line(
                    tip.x,
                    tip.y,
                    tip.x + angle.cos() * length,
                    tip.y + angle.sin() * length,
                )?;
            }
        }
        EndStyle::Tick => {
            let half = 4.0 + stroke_width;
            let perp = (-out.1, out.0);
            surface.draw_line(
                tip.x - perp.0 * half,
                tip.y - perp.1 * half,
                tip.x + perp.0 * half,
                tip.y + perp.1 * half,
            )?;
        }
        EndStyle::Dot => {
            surface.set_fill_color(stroke_color);
            surface.fill_circle(tip.x, tip.y, 2.0 + stroke_width)?;
        }
        EndStyle::None => {}
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{LayerKind, ToleranceType};
    use crate::surface::RecordingSurface;

    fn dim_layer(x1: f64, y1: f64, x2: f64, y2: f64) -> (Layer, DimensionLayer) {
        let layer = Layer::dimension(x1, y1, x2, y2);
        let dim = match &layer.kind {
            LayerKind::Dimension(d) => d.clone(),
            _ => unreachable!(),
        };
        (layer, dim)
    }

    #[test]
    fn distance_is_euclidean() {
        let (_, dim) = dim_layer(0.0, 0.0, 30.0, 40.0);
        assert_eq!(DimensionRenderer::calculate_distance(&dim), 50.0);
    }

    #[test]
    fn format_defaults_to_px() {
        let (_, dim) = dim_layer(0.0, 0.0, 30.0, 40.0);
        let r = DimensionRenderer::new();
        assert_eq!(r.format_measurement(50.0, &dim), "50 px");
    }

    #[test]
    fn format_applies_scale_and_precision() {
        let (_, mut dim) = dim_layer(0.0, 0.0, 30.0, 40.0);
        dim.scale = 0.1;
        dim.precision = 2;
        dim.unit = "mm".to_string();
        let r = DimensionRenderer::new();
        assert_eq!(r.format_measurement(50.0, &dim), "5.00 mm");
    }

    #[test]
    fn user_text_overrides_measurement() {
        let (_, mut dim) = dim_layer(0.0, 0.0, 30.0, 40.0);
        dim.text = Some("width".to_string());
        dim.tolerance_type = ToleranceType::Symmetric;
        dim.tolerance_value = Some(0.5);
        let r = DimensionRenderer::new();
        assert_eq!(r.build_display_text(50.0, &dim), "width ±0.5");
    }

    #[test]
    fn blank_user_text_falls_back_to_measurement() {
        let (_, mut dim) = dim_layer(0.0, 0.0, 30.0, 40.0);
        dim.text = Some("   ".to_string());
        let r = DimensionRenderer::new();
        assert_eq!(r.build_display_text(50.0, &dim), "50 px");
    }

    #[test]
    fn coincident_endpoints_draw_nothing() {
        let (layer, dim) = dim_layer(10.0, 10.0, 10.0, 10.0);
        let mut surface = RecordingSurface::new();
        DimensionRenderer::new().draw(&mut surface, &layer, &dim);
        assert!(surface.ops.is_empty());
    }

    #[test]
    fn draw_order_is_extensions_line_markers_label() {
        let (layer, dim) = dim_layer(0.0, 0.0, 100.0, 0.0);
        let mut surface = RecordingSurface::new();
        DimensionRenderer::new().draw(&mut surface, &layer, &dim);
        // Two extension lines, then the main line, then arrow strokes.
        let lines: Vec<usize> = surface
            .ops
            .iter()
            .enumerate()
            .filter(|(_, op)| op.kind() == "line")
            .map(|(i, _)| i)
            .collect();
        assert!(lines.len() >= 3 + 4, "extensions + main + arrow strokes");
        let label = surface.first_index("fill_text").expect("label drawn");
        assert!(label > lines[lines.len() - 1], "label drawn last");
        assert_eq!(surface.ops.first().unwrap().kind(), "save");
        assert_eq!(surface.ops.last().unwrap().kind(), "restore");
    }

    #[test]
    fn surface_failure_is_swallowed() {
        let (layer, dim) = dim_layer(0.0, 0.0, 100.0, 0.0);
        let mut surface = RecordingSurface::failing_on("line");
        DimensionRenderer::new().draw(&mut surface, &layer, &dim);
        // Restore still runs even though painting aborted early.
        assert_eq!(surface.ops.last().unwrap().kind(), "restore");
    }

    #[test]
    fn invalid_stroke_width_uses_default() {
        let (mut layer, dim) = dim_layer(0.0, 0.0, 100.0, 0.0);
        layer.stroke_width = Some(-3.0);
        let mut surface = RecordingSurface::new();
        DimensionRenderer::new().draw(&mut surface, &layer, &dim);
        assert!(surface
            .ops
            .iter()
            .any(|op| *op == crate::surface::SurfaceOp::LineWidth(1.0)));
    }

    #[test]
    fn hit_test_follows_the_offset_line() {
        let (layer, mut dim) = dim_layer(0.0, 0.0, 100.0, 0.0);
        dim.dimension_offset = Some(80.0);
        let r = DimensionRenderer::new();
        // Free orientation: perp of (1,0) is (0,1), offset line at y=80.
        assert!(!r.hit_test(&layer, &dim, 50.0, 0.0), "baseline is not hittable");
        assert!(r.hit_test(&layer, &dim, 50.0, 80.0), "offset line is hittable");
    }

    #[test]
    fn hit_test_covers_extension_lines() {
        let (layer, dim) = dim_layer(0.0, 0.0, 100.0, 0.0);
        let r = DimensionRenderer::new();
        // Extension line runs from y=gap(5) to y=offset+length(27.5) at x=0.
        assert!(r.hit_test(&layer, &dim, 0.0, 15.0));
        assert!(!r.hit_test(&layer, &dim, 50.0, 60.0));
    }

    #[test]
    fn bounds_cover_offset_excursion() {
        let (layer, mut dim) = dim_layer(0.0, 0.0, 100.0, 0.0);
        dim.dimension_offset = Some(80.0);
        let bounds = DimensionRenderer::new().get_bounds(&layer, &dim);
        assert!(bounds.max_y >= 80.0 + dim.extension_length);
        assert!(bounds.min_x <= 0.0 && bounds.max_x >= 100.0);
    }

    #[test]
    fn centered_label_without_background_splits_line() {
        let (layer, mut dim) = dim_layer(0.0, 0.0, 200.0, 0.0);
        dim.text_position = TextPosition::Center;
        dim.show_background = false;
        let mut surface = RecordingSurface::new();
        DimensionRenderer::new().draw(&mut surface, &layer, &dim);
        // 2 extensions + 2 half-lines + 4 arrow strokes.
        assert_eq!(surface.count("line"), 8);
        assert_eq!(surface.count("fill_rect"), 0);
    }

    #[test]
    fn centered_label_with_background_draws_rect() {
        let (layer, mut dim) = dim_layer(0.0, 0.0, 200.0, 0.0);
        dim.text_position = TextPosition::Center;
        let mut surface = RecordingSurface::new();
        DimensionRenderer::new().draw(&mut surface, &layer, &dim);
        assert_eq!(surface.count("fill_rect"), 1);
        assert_eq!(surface.count("line"), 7, "single unbroken main line");
    }
}
