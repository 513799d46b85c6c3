//! Marker rendering, numbering, bounds, and hit testing.

use layerkit_core::geometry::{point_to_segment_distance, Bounds, Point};

use crate::model::{Layer, LayerKind, MarkerLayer, MarkerStyle, MarkerValue};
use crate::surface::{RenderSurface, SurfaceError};

/// Distance within which a point counts as hitting the leader line.
pub const HIT_TOLERANCE: f64 = 6.0;

const DEFAULT_STROKE_WIDTH: f64 = 2.0;
const BOUNDS_PADDING: f64 = 2.0;

/// Shadow support is a host capability, not a surface primitive. A host
/// that can paint drop shadows supplies one of these; without it markers
/// render fine, just flat.
pub trait ShadowPainter {
    /// Arms the host's shadow state from the layer's shadow fields.
    fn apply(&mut self, marker: &MarkerLayer) -> Result<(), SurfaceError>;
    /// Disarms shadow state so later strokes are unaffected.
    fn clear(&mut self);
}

/// Drawing and numbering engine for `marker` layers.
#[derive(Default)]
pub struct MarkerRenderer {
    shadow: Option<Box<dyn ShadowPainter>>,
}

impl MarkerRenderer {
    pub fn new() -> Self {
        Self { shadow: None }
    }

    pub fn with_shadow_painter(shadow: Box<dyn ShadowPainter>) -> Self {
        Self {
            shadow: Some(shadow),
        }
    }

    /// Renders a marker value in the given style.
    ///
    /// Text values pass through verbatim in every style; numeric values get
    /// the style's decoration (circle styles carry no textual decoration,
    /// the circle itself is the decoration).
    pub fn format_value(value: &MarkerValue, style: MarkerStyle) -> String {
        match value {
            MarkerValue::Text(text) => text.clone(),
            MarkerValue::Number(n) => {
                if style.is_lettered() {
                    letters(*n)
                } else {
                    match style {
                        MarkerStyle::Parentheses => format!("({})", n),
                        MarkerStyle::Plain => format!("{}.", n),
                        _ => format!("{}", n),
                    }
                }
            }
        }
    }

    /// The next free sequence number among existing markers.
    ///
    /// Only numeric marker values participate; when `style` is given, only
    /// markers of that style are counted, so independent sequences in
    /// different styles do not collide.
    pub fn get_next_value(layers: &[Layer], style: Option<MarkerStyle>) -> i64 {
        layers
            .iter()
            .filter_map(|layer| match &layer.kind {
                LayerKind::Marker(marker) => Some(marker),
                _ => None,
            })
            .filter(|marker| style.is_none_or(|s| marker.style == s))
            .filter_map(|marker| marker.value.as_number())
            .max()
            .map(|max| max + 1)
            .unwrap_or(1)
    }

    /// Draws the marker: optional leader arrow, optional circle body, and
    /// the label. Surface failures are swallowed at this boundary.
    pub fn draw(&mut self, surface: &mut dyn RenderSurface, layer: &Layer, marker: &MarkerLayer) {
        surface.save();
        if let Err(e) = self.paint(surface, layer, marker) {
            tracing::trace!(layer = %layer.id, error = %e, "marker paint aborted");
        }
        surface.restore();
    }

    fn paint(
        &mut self,
        surface: &mut dyn RenderSurface,
        layer: &Layer,
        marker: &MarkerLayer,
    ) -> Result<(), SurfaceError> {
        let stroke = layer.stroke.as_deref().unwrap_or("#000000");
        let fill = layer.fill.as_deref().unwrap_or("#ffffff");
        let width = layer.stroke_width_or(DEFAULT_STROKE_WIDTH);
        let size = marker.effective_size();
        let radius = size / 2.0;

        surface.set_global_alpha(layer.effective_opacity());

        // Rotation pivots on the marker position, so translate first and
        // draw everything vertex-relative after.
        surface.translate(marker.x, marker.y);
        if layer.rotation != 0.0 {
            surface.rotate(layer.rotation.to_radians());
        }

        if marker.has_shadow {
            if let Some(shadow) = self.shadow.as_mut() {
                shadow.apply(marker)?;
            }
        }

        // Leader line from the body edge toward the arrow point.
        if marker.has_arrow {
            if let (Some(ax), Some(ay)) = (marker.arrow_x, marker.arrow_y) {
                let dx = ax - marker.x;
                let dy = ay - marker.y;
                let len = (dx * dx + dy * dy).sqrt();
                if len > radius {
                    let (ux, uy) = (dx / len, dy / len);
                    surface.set_stroke_color(stroke);
                    surface.set_line_width(width);
                    surface.draw_line(ux * radius, uy * radius, dx, dy)?;
                    // Arrowhead.
                    let head = 6.0 + width;
                    let base_angle = uy.atan2(ux) + std::f64::consts::PI;
                    for spread in [0.4, -0.4] {
                        let a = base_angle + spread;
                        surface.draw_line(dx, dy, dx + a.cos() * head, dy + a.sin() * head)?;
                    }
                }
            }
        }

        if marker.style.has_circle() {
            surface.set_fill_color(fill);
            surface.fill_circle(0.0, 0.0, radius)?;
            surface.set_stroke_color(stroke);
            surface.set_line_width(width);
            surface.stroke_circle(0.0, 0.0, radius)?;
        }

        if let Some(shadow) = self.shadow.as_mut() {
            // Text and outline stay crisp even when the body has a shadow.
            shadow.clear();
        }

        let text = Self::format_value(&marker.value, marker.style);
        surface.set_font(marker.font_size(), "sans-serif");
        if let Some(stroke_width) = marker.text_stroke_width {
            if stroke_width > 0.0 {
                surface.set_stroke_color(marker.text_stroke.as_deref().unwrap_or("#ffffff"));
                surface.set_line_width(stroke_width);
                surface.stroke_text(&text, 0.0, 0.0)?;
            }
        }
        surface.set_fill_color(stroke);
        surface.fill_text(&text, 0.0, 0.0)?;
        Ok(())
    }

    /// Box around the body circle, extended to the arrow point when present.
    pub fn get_bounds(&self, layer: &Layer, marker: &MarkerLayer) -> Bounds {
        let radius = marker.effective_size() / 2.0 + layer.stroke_width_or(DEFAULT_STROKE_WIDTH);
        let mut bounds = Bounds::at_point(Point::new(marker.x - radius, marker.y - radius));
        bounds.include(Point::new(marker.x + radius, marker.y + radius));
        if marker.has_arrow {
            if let (Some(ax), Some(ay)) = (marker.arrow_x, marker.arrow_y) {
                bounds.include(Point::new(ax, ay));
            }
        }
        bounds.padded(BOUNDS_PADDING)
    }

    /// Hit test against the body circle, or the leader line when present.
    pub fn hit_test(&self, _layer: &Layer, marker: &MarkerLayer, px: f64, py: f64) -> bool {
        let center = Point::new(marker.x, marker.y);
        if Point::new(px, py).distance_to(&center) <= marker.effective_size() / 2.0 {
            return true;
        }
        if marker.has_arrow {
            if let (Some(ax), Some(ay)) = (marker.arrow_x, marker.arrow_y) {
                return point_to_segment_distance(px, py, marker.x, marker.y, ax, ay)
                    <= HIT_TOLERANCE;
            }
        }
        false
    }
}

/// Bijective base-26 letters: 1 → A, 26 → Z, 27 → AA. Values below 1 are
/// clamped to 1.
fn letters(n: i64) -> String {
    let mut n = n.max(1);
    let mut out = Vec::new();
    while n > 0 {
        n -= 1;
        out.push((b'A' + (n % 26) as u8) as char);
        n /= 26;
    }
    out.iter().rev().collect()
}
