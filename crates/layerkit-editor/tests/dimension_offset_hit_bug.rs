//! Regression: hit testing a dimension must follow the offset line.
//!
//! An earlier hit test used the raw baseline between the two anchor
//! points, so a dimension pushed away from its subject by
//! `dimensionOffset` could not be selected where it was drawn, and
//! phantom-selected along the invisible baseline.

use layerkit_editor::model::{Layer, LayerKind};
use layerkit_editor::render::DimensionRenderer;

fn offset_dimension(offset: f64) -> Layer {
    let mut layer = Layer::dimension(0.0, 0.0, 100.0, 0.0);
    if let LayerKind::Dimension(dim) = &mut layer.kind {
        dim.dimension_offset = Some(offset);
    }
    layer
}

#[test]
fn baseline_is_not_selectable() {
    let layer = offset_dimension(80.0);
    let LayerKind::Dimension(dim) = &layer.kind else {
        unreachable!()
    };
    let renderer = DimensionRenderer::new();
    assert!(!renderer.hit_test(&layer, dim, 50.0, 0.0));
}

#[test]
fn drawn_offset_line_is_selectable() {
    let layer = offset_dimension(80.0);
    let LayerKind::Dimension(dim) = &layer.kind else {
        unreachable!()
    };
    let renderer = DimensionRenderer::new();
    // Free orientation: the perpendicular of a horizontal baseline points
    // toward positive y, so the dimension line sits at y = 80.
    assert!(renderer.hit_test(&layer, dim, 50.0, 80.0));
    assert!(renderer.hit_test(&layer, dim, 50.0, 84.0), "within tolerance");
    assert!(!renderer.hit_test(&layer, dim, 50.0, 95.0), "past tolerance");
}

#[test]
fn extension_lines_are_selectable_too() {
    let layer = offset_dimension(80.0);
    let LayerKind::Dimension(dim) = &layer.kind else {
        unreachable!()
    };
    let renderer = DimensionRenderer::new();
    // Extension lines run from the gap near each anchor out past the
    // dimension line.
    assert!(renderer.hit_test(&layer, dim, 0.0, 40.0));
    assert!(renderer.hit_test(&layer, dim, 100.0, 40.0));
}
