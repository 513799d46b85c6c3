//! Angle dimension rendering, bounds, and hit testing.

use std::f64::consts::TAU;

use layerkit_core::geometry::{point_to_segment_distance, Bounds, Point};
use layerkit_core::math::radians_to_degrees;

use crate::measure::{append_tolerance_to_text, format_with_tolerance, Tolerance, UnitFormat};
use crate::model::{AngleDimensionLayer, Layer};
use crate::surface::{RenderSurface, SurfaceError};

use super::dimension::draw_end_marker;

/// Distance within which a point counts as hitting an arm or the arc.
pub const HIT_TOLERANCE: f64 = 6.0;
/// The vertex gets a slightly wider grab radius than the thin strokes.
pub const VERTEX_TOLERANCE: f64 = 8.0;

/// Arms shorter than this have no usable direction.
const MIN_ARM_LENGTH: f64 = 1.0;
const DEFAULT_STROKE_WIDTH: f64 = 1.0;
const DEFAULT_FONT_SIZE: f64 = 12.0;
const BOUNDS_PADDING: f64 = 8.0;

/// The resolved sweep of an angle annotation, in radians.
///
/// The arc is always drawn from `start_angle` sweeping through increasing
/// angles to `end_angle`; `sweep_angle` is that (always positive) extent.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AngleSweep {
    pub start_angle: f64,
    pub end_angle: f64,
    pub sweep_angle: f64,
}

/// Drawing and geometry engine for `angleDimension` layers.
#[derive(Debug, Clone, Copy, Default)]
pub struct AngleDimensionRenderer;

impl AngleDimensionRenderer {
    pub fn new() -> Self {
        Self
    }

    fn arm_angles(angle: &AngleDimensionLayer) -> (f64, f64) {
        (
            (angle.ay - angle.cy).atan2(angle.ax - angle.cx),
            (angle.by - angle.cy).atan2(angle.bx - angle.cx),
        )
    }

    /// Resolves which side of the two arms is measured.
    ///
    /// The minor (≤180°) sweep is chosen by default; `reflex_angle` selects
    /// the complementary side instead. Start/end are ordered so the sweep
    /// always runs through increasing angles.
    pub fn calculate_angles(angle: &AngleDimensionLayer) -> AngleSweep {
        let (a1, a2) = Self::arm_angles(angle);
        let forward = (a2 - a1).rem_euclid(TAU);
        let minor_is_forward = forward <= std::f64::consts::PI;
        let take_forward = minor_is_forward != angle.reflex_angle;
        if take_forward {
            AngleSweep {
                start_angle: a1,
                end_angle: a2,
                sweep_angle: forward,
            }
        } else {
            AngleSweep {
                start_angle: a2,
                end_angle: a1,
                sweep_angle: TAU - forward,
            }
        }
    }

    /// The measured angle in degrees.
    pub fn calculate_degrees(angle: &AngleDimensionLayer) -> f64 {
        radians_to_degrees(Self::calculate_angles(angle).sweep_angle)
    }

    fn units(angle: &AngleDimensionLayer) -> UnitFormat {
        UnitFormat {
            unit: "°".to_string(),
            spaced: false,
            show_unit: angle.show_unit,
            precision: angle.precision,
        }
    }

    fn tolerance(angle: &AngleDimensionLayer) -> Tolerance {
        Tolerance {
            kind: angle.tolerance_type,
            value: angle.tolerance_value,
            upper: angle.tolerance_upper,
            lower: angle.tolerance_lower,
        }
    }

    /// Formats a measured angle in degrees, tolerance applied.
    pub fn format_measurement(&self, degrees: f64, angle: &AngleDimensionLayer) -> String {
        format_with_tolerance(degrees, &Self::units(angle), &Self::tolerance(angle))
    }

    /// The label to draw: user override (tolerance appended) or the
    /// auto-computed measurement.
    pub fn build_display_text(&self, angle: &AngleDimensionLayer) -> String {
        match angle.text.as_deref() {
            Some(text) if !text.trim().is_empty() => {
                append_tolerance_to_text(text, &Self::tolerance(angle))
            }
            _ => self.format_measurement(Self::calculate_degrees(angle), angle),
        }
    }

    fn arm_lengths(angle: &AngleDimensionLayer) -> (f64, f64) {
        let vertex = Point::new(angle.cx, angle.cy);
        (
            vertex.distance_to(&Point::new(angle.ax, angle.ay)),
            vertex.distance_to(&Point::new(angle.bx, angle.by)),
        )
    }

    /// Draws the annotation: extension lines along both arms, the measuring
    /// arc, end markers, and the label. When either arm is too short to
    /// define a direction the layer draws nothing. Surface failures are
    /// swallowed at this boundary.
    pub fn draw(&self, surface: &mut dyn RenderSurface, layer: &Layer, angle: &AngleDimensionLayer) {
        let (len_a, len_b) = Self::arm_lengths(angle);
        if len_a < MIN_ARM_LENGTH || len_b < MIN_ARM_LENGTH {
            return;
        }
        surface.save();
        if let Err(e) = self.paint(surface, layer, angle) {
            tracing::trace!(layer = %layer.id, error = %e, "angle paint aborted");
        }
        surface.restore();
    }

    fn paint(
        &self,
        surface: &mut dyn RenderSurface,
        layer: &Layer,
        angle: &AngleDimensionLayer,
    ) -> Result<(), SurfaceError> {
        let stroke = layer.stroke.as_deref().unwrap_or("#000000");
        let width = layer.stroke_width_or(DEFAULT_STROKE_WIDTH);
        let font_size = if angle.font_size.is_finite() && angle.font_size > 0.0 {
            angle.font_size
        } else {
            DEFAULT_FONT_SIZE
        };
        let family = angle.font_family.as_deref().unwrap_or("sans-serif");

        surface.set_global_alpha(layer.effective_opacity());
        surface.set_stroke_color(stroke);
        surface.set_line_width(width);
        surface.set_font(font_size, family);

        if layer.rotation != 0.0 {
            surface.translate(angle.cx, angle.cy);
            surface.rotate(layer.rotation.to_radians());
            surface.translate(-angle.cx, -angle.cy);
        }

        let radius = angle.effective_arc_radius();
        let sweep = Self::calculate_angles(angle);

        // Extension lines run from the vertex out past the arc.
        let reach = radius + angle.extension_length;
        for arm_angle in [sweep.start_angle, sweep.end_angle] {
            surface.draw_line(
                angle.cx,
                angle.cy,
                angle.cx + arm_angle.cos() * reach,
                angle.cy + arm_angle.sin() * reach,
            )?;
        }

        surface.draw_arc(
            angle.cx,
            angle.cy,
            radius,
            sweep.start_angle,
            sweep.end_angle,
        )?;

        // End markers sit tangentially at the arc endpoints, pointing away
        // from the sweep.
        let start_tip = Point::new(
            angle.cx + sweep.start_angle.cos() * radius,
            angle.cy + sweep.start_angle.sin() * radius,
        );
        let end_tip = Point::new(
            angle.cx + sweep.end_angle.cos() * radius,
            angle.cy + sweep.end_angle.sin() * radius,
        );
        let start_out = (sweep.start_angle.sin(), -sweep.start_angle.cos());
        let end_out = (-sweep.end_angle.sin(), sweep.end_angle.cos());
        draw_end_marker(surface, angle.end_style, start_tip, start_out, width, stroke)?;
        draw_end_marker(surface, angle.end_style, end_tip, end_out, width, stroke)?;

        // Label at the angular midpoint, pushed radially outward.
        let text = self.build_display_text(angle);
        let mid_angle = sweep.start_angle + sweep.sweep_angle / 2.0;
        let label_radius = radius + angle.extension_length + font_size;
        let lx = angle.cx + mid_angle.cos() * label_radius;
        let ly = angle.cy + mid_angle.sin() * label_radius;
        let text_width = surface.measure_text(&text);

        if angle.show_background {
            surface.set_fill_color(layer.fill.as_deref().unwrap_or("#ffffff"));
            surface.fill_rect(
                lx - text_width / 2.0 - 2.0,
                ly - font_size / 2.0 - 2.0,
                text_width + 4.0,
                font_size + 4.0,
            )?;
        }
        surface.set_fill_color(stroke);
        surface.fill_text(&text, lx, ly)?;
        if angle.tolerance_type == crate::model::ToleranceType::Basic {
            // Basic tolerance is drawn as a box around the label.
            surface.stroke_rect(
                lx - text_width / 2.0 - 3.0,
                ly - font_size / 2.0 - 3.0,
                text_width + 6.0,
                font_size + 6.0,
            )?;
        }
        Ok(())
    }

    /// Axis-aligned box covering vertex, arm endpoints, and the full arc
    /// circle. The circle is included whole rather than the swept portion.
    pub fn get_bounds(&self, _layer: &Layer, angle: &AngleDimensionLayer) -> Bounds {
        let mut bounds = Bounds::at_point(Point::new(angle.cx, angle.cy));
        bounds.include(Point::new(angle.ax, angle.ay));
        bounds.include(Point::new(angle.bx, angle.by));
        let reach = angle.effective_arc_radius() + angle.extension_length;
        bounds.include(Point::new(angle.cx - reach, angle.cy - reach));
        bounds.include(Point::new(angle.cx + reach, angle.cy + reach));
        bounds.padded(BOUNDS_PADDING)
    }

    /// Whether `test` lies within the sweep from `start` to `end` (radians,
    /// increasing direction), handling the wrap past 2π.
    fn is_angle_in_range(test: f64, start: f64, end: f64) -> bool {
        let t = test.rem_euclid(TAU);
        let s = start.rem_euclid(TAU);
        let e = end.rem_euclid(TAU);
        if s <= e {
            t >= s && t <= e
        } else {
            t >= s || t <= e
        }
    }

    /// Hit test against the vertex, both arms, and the swept arc.
    pub fn hit_test(&self, _layer: &Layer, angle: &AngleDimensionLayer, px: f64, py: f64) -> bool {
        let vertex = Point::new(angle.cx, angle.cy);
        let probe = Point::new(px, py);
        if probe.distance_to(&vertex) <= VERTEX_TOLERANCE {
            return true;
        }
        for arm in [
            Point::new(angle.ax, angle.ay),
            Point::new(angle.bx, angle.by),
        ] {
            if point_to_segment_distance(px, py, vertex.x, vertex.y, arm.x, arm.y) <= HIT_TOLERANCE
            {
                return true;
            }
        }
        let (len_a, len_b) = Self::arm_lengths(angle);
        if len_a < MIN_ARM_LENGTH || len_b < MIN_ARM_LENGTH {
            return false;
        }
        let radius = angle.effective_arc_radius();
        let d = probe.distance_to(&vertex);
        if (d - radius).abs() <= HIT_TOLERANCE {
            let sweep = Self::calculate_angles(angle);
            let probe_angle = (py - angle.cy).atan2(px - angle.cx);
            return Self::is_angle_in_range(probe_angle, sweep.start_angle, sweep.end_angle);
        }
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{LayerKind, ToleranceType};
    use crate::surface::RecordingSurface;

    fn right_angle() -> (Layer, AngleDimensionLayer) {
        // Arms east and north (screen coordinates, y grows downward).
        let layer = Layer::angle_dimension(100.0, 100.0, 200.0, 100.0, 100.0, 0.0);
        let angle = match &layer.kind {
            LayerKind::AngleDimension(a) => a.clone(),
            _ => unreachable!(),
        };
        (layer, angle)
    }

    #[test]
    fn minor_angle_of_perpendicular_arms_is_90() {
        let (_, angle) = right_angle();
        let degrees = AngleDimensionRenderer::calculate_degrees(&angle);
        assert!((degrees - 90.0).abs() < 1e-9);
    }

    #[test]
    fn reflex_side_is_the_complement() {
        let (_, mut angle) = right_angle();
        angle.reflex_angle = true;
        let degrees = AngleDimensionRenderer::calculate_degrees(&angle);
        assert!((degrees - 270.0).abs() < 1e-9);
        assert!(degrees > 180.0);
    }

    #[test]
    fn minor_and_reflex_sweeps_share_endpoints() {
        let (_, mut angle) = right_angle();
        let minor = AngleDimensionRenderer::calculate_angles(&angle);
        angle.reflex_angle = true;
        let reflex = AngleDimensionRenderer::calculate_angles(&angle);
        assert_eq!(minor.start_angle, reflex.end_angle);
        assert_eq!(minor.end_angle, reflex.start_angle);
        assert!((minor.sweep_angle + reflex.sweep_angle - TAU).abs() < 1e-12);
    }

    #[test]
    fn default_format_uses_one_decimal_and_degree_sign() {
        let (_, angle) = right_angle();
        let r = AngleDimensionRenderer::new();
        assert_eq!(r.format_measurement(45.0, &angle), "45.0°");
    }

    #[test]
    fn unit_can_be_suppressed() {
        let (_, mut angle) = right_angle();
        angle.show_unit = false;
        angle.precision = 0;
        let r = AngleDimensionRenderer::new();
        assert_eq!(r.format_measurement(45.0, &angle), "45");
    }

    #[test]
    fn user_text_overrides_measurement() {
        let (_, mut angle) = right_angle();
        angle.text = Some("corner".to_string());
        angle.tolerance_type = ToleranceType::Symmetric;
        angle.tolerance_value = Some(2.0);
        let r = AngleDimensionRenderer::new();
        assert_eq!(r.build_display_text(&angle), "corner ±2");
    }

    #[test]
    fn degenerate_arm_draws_nothing() {
        let (layer, mut angle) = right_angle();
        angle.ax = angle.cx;
        angle.ay = angle.cy;
        let mut surface = RecordingSurface::new();
        AngleDimensionRenderer::new().draw(&mut surface, &layer, &angle);
        assert!(surface.ops.is_empty());
    }

    #[test]
    fn draw_emits_arc_between_extension_lines_and_label() {
        let (layer, angle) = right_angle();
        let mut surface = RecordingSurface::new();
        AngleDimensionRenderer::new().draw(&mut surface, &layer, &angle);
        assert_eq!(surface.count("arc"), 1);
        assert!(surface.count("line") >= 2, "two extension lines");
        assert_eq!(surface.count("fill_text"), 1);
        assert!(surface.first_index("arc") > surface.first_index("line"));
        assert!(surface.first_index("fill_text") > surface.first_index("arc"));
    }

    #[test]
    fn surface_failure_is_swallowed() {
        let (layer, angle) = right_angle();
        let mut surface = RecordingSurface::failing_on("arc");
        AngleDimensionRenderer::new().draw(&mut surface, &layer, &angle);
        assert_eq!(surface.ops.last().unwrap().kind(), "restore");
    }

    #[test]
    fn basic_tolerance_draws_a_box() {
        let (layer, mut angle) = right_angle();
        angle.tolerance_type = ToleranceType::Basic;
        let mut surface = RecordingSurface::new();
        AngleDimensionRenderer::new().draw(&mut surface, &layer, &angle);
        assert_eq!(surface.count("stroke_rect"), 1);
    }

    #[test]
    fn in_range_handles_wraparound() {
        assert!(AngleDimensionRenderer::is_angle_in_range(0.1, -0.5, 0.5));
        assert!(AngleDimensionRenderer::is_angle_in_range(-0.1, -0.5, 0.5));
        assert!(!AngleDimensionRenderer::is_angle_in_range(1.0, -0.5, 0.5));
    }

    #[test]
    fn hit_test_vertex_arms_and_arc() {
        let (layer, angle) = right_angle();
        let r = AngleDimensionRenderer::new();
        assert!(r.hit_test(&layer, &angle, 103.0, 100.0), "vertex");
        assert!(r.hit_test(&layer, &angle, 150.0, 101.0), "arm a");
        assert!(r.hit_test(&layer, &angle, 100.0, 50.0), "arm b");
        // Arc point at 45° into the sweep (y up on screen means -45°).
        let on_arc = (
            100.0 + 40.0 * (-std::f64::consts::FRAC_PI_4).cos(),
            100.0 + 40.0 * (-std::f64::consts::FRAC_PI_4).sin(),
        );
        assert!(r.hit_test(&layer, &angle, on_arc.0, on_arc.1), "arc");
        // Same radius, opposite side of the vertex: outside the sweep.
        assert!(!r.hit_test(&layer, &angle, 100.0 - 40.0, 100.0 + 0.1));
        assert!(!r.hit_test(&layer, &angle, 300.0, 300.0));
    }

    #[test]
    fn bounds_cover_arc_circle_and_arms() {
        let (layer, angle) = right_angle();
        let bounds = AngleDimensionRenderer::new().get_bounds(&layer, &angle);
        assert!(bounds.min_x <= 100.0 - 55.0);
        assert!(bounds.max_x >= 200.0);
        assert!(bounds.min_y <= 0.0);
    }
}
