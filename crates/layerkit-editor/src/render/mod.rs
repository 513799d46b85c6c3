//! Per-kind rendering, bounds, and hit-test dispatch.
//!
//! The measurement kinds (dimension, angle dimension, marker) carry real
//! drawing engines; the basic shape kinds get a minimal outline rendering
//! so a full layer stack still paints something sensible. Groups and
//! unrecognized kinds are invisible and unhittable.

pub mod angle;
pub mod dimension;
pub mod marker;

pub use angle::{AngleDimensionRenderer, AngleSweep};
pub use dimension::DimensionRenderer;
pub use marker::{MarkerRenderer, ShadowPainter};

use layerkit_core::geometry::{point_to_segment_distance, Bounds, Point};

use crate::model::{Layer, LayerKind};
use crate::surface::RenderSurface;

const SHAPE_HIT_TOLERANCE: f64 = 6.0;

/// Renders one layer onto `surface`. Hidden layers draw nothing.
pub fn draw_layer(surface: &mut dyn RenderSurface, layer: &Layer) {
    if !layer.visible {
        return;
    }
    match &layer.kind {
        LayerKind::Dimension(dim) => DimensionRenderer::new().draw(surface, layer, dim),
        LayerKind::AngleDimension(angle) => {
            AngleDimensionRenderer::new().draw(surface, layer, angle)
        }
        LayerKind::Marker(marker) => MarkerRenderer::new().draw(surface, layer, marker),
        LayerKind::Rectangle(rect) => {
            surface.save();
            prepare_shape(surface, layer);
            let _ = surface.stroke_rect(rect.x, rect.y, rect.width, rect.height);
            surface.restore();
        }
        LayerKind::Circle(circle) => {
            surface.save();
            prepare_shape(surface, layer);
            let _ = surface.stroke_circle(circle.x, circle.y, circle.radius);
            surface.restore();
        }
        LayerKind::Text(text) => {
            surface.save();
            prepare_shape(surface, layer);
            surface.set_font(text.font_size, "sans-serif");
            surface.set_fill_color(layer.stroke.as_deref().unwrap_or("#000000"));
            let _ = surface.fill_text(&text.text, text.x, text.y);
            surface.restore();
        }
        LayerKind::Path(path) => {
            surface.save();
            prepare_shape(surface, layer);
            for pair in path.points.windows(2) {
                if surface
                    .draw_line(pair[0].x, pair[0].y, pair[1].x, pair[1].y)
                    .is_err()
                {
                    break;
                }
            }
            surface.restore();
        }
        LayerKind::Blur(blur) => {
            // Hosts with a real blur compositor intercept this kind before
            // dispatch; the fallback is a translucent cover.
            surface.save();
            prepare_shape(surface, layer);
            surface.set_fill_color(layer.fill.as_deref().unwrap_or("#cccccc"));
            let _ = surface.fill_rect(blur.x, blur.y, blur.width, blur.height);
            surface.restore();
        }
        LayerKind::Group(_) | LayerKind::Unknown => {}
    }
}

fn prepare_shape(surface: &mut dyn RenderSurface, layer: &Layer) {
    surface.set_global_alpha(layer.effective_opacity());
    surface.set_stroke_color(layer.stroke.as_deref().unwrap_or("#000000"));
    surface.set_line_width(layer.stroke_width_or(1.0));
}

/// Axis-aligned bounds of one layer, `None` for kinds with no extent.
pub fn layer_bounds(layer: &Layer) -> Option<Bounds> {
    match &layer.kind {
        LayerKind::Dimension(dim) => Some(DimensionRenderer::new().get_bounds(layer, dim)),
        LayerKind::AngleDimension(angle) => {
            Some(AngleDimensionRenderer::new().get_bounds(layer, angle))
        }
        LayerKind::Marker(marker) => Some(MarkerRenderer::new().get_bounds(layer, marker)),
        LayerKind::Rectangle(rect) => {
            let mut b = Bounds::at_point(Point::new(rect.x, rect.y));
            b.include(Point::new(rect.x + rect.width, rect.y + rect.height));
            Some(b)
        }
        LayerKind::Circle(circle) => {
            let mut b = Bounds::at_point(Point::new(circle.x - circle.radius, circle.y - circle.radius));
            b.include(Point::new(circle.x + circle.radius, circle.y + circle.radius));
            Some(b)
        }
        LayerKind::Text(text) => {
            let width = text.text.chars().count() as f64 * text.font_size * 0.6;
            let mut b = Bounds::at_point(Point::new(text.x - width / 2.0, text.y - text.font_size));
            b.include(Point::new(text.x + width / 2.0, text.y + text.font_size));
            Some(b)
        }
        LayerKind::Path(path) => {
            let mut points = path.points.iter();
            let first = points.next()?;
            let mut b = Bounds::at_point(*first);
            for p in points {
                b.include(*p);
            }
            Some(b)
        }
        LayerKind::Blur(blur) => {
            let mut b = Bounds::at_point(Point::new(blur.x, blur.y));
            b.include(Point::new(blur.x + blur.width, blur.y + blur.height));
            Some(b)
        }
        LayerKind::Group(_) | LayerKind::Unknown => None,
    }
}

/// Whether the point hits the layer's interactive geometry.
pub fn hit_test_layer(layer: &Layer, px: f64, py: f64) -> bool {
    match &layer.kind {
        LayerKind::Dimension(dim) => DimensionRenderer::new().hit_test(layer, dim, px, py),
        LayerKind::AngleDimension(angle) => {
            AngleDimensionRenderer::new().hit_test(layer, angle, px, py)
        }
        LayerKind::Marker(marker) => MarkerRenderer::new().hit_test(layer, marker, px, py),
        LayerKind::Circle(circle) => {
            Point::new(px, py).distance_to(&Point::new(circle.x, circle.y))
                <= circle.radius + SHAPE_HIT_TOLERANCE
        }
        LayerKind::Path(path) => path.points.windows(2).any(|pair| {
            point_to_segment_distance(px, py, pair[0].x, pair[0].y, pair[1].x, pair[1].y)
                <= SHAPE_HIT_TOLERANCE
        }),
        LayerKind::Rectangle(_) | LayerKind::Text(_) | LayerKind::Blur(_) => layer_bounds(layer)
            .map(|b| b.padded(SHAPE_HIT_TOLERANCE).contains(Point::new(px, py)))
            .unwrap_or(false),
        LayerKind::Group(_) | LayerKind::Unknown => false,
    }
}
