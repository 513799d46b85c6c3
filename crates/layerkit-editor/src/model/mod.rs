//! Layer records: the wire format shared with persistence and history.
//!
//! A layer is a tagged variant keyed by its `type` string. Records decoded
//! from storage may carry legacy scalar quirks (`0`/`1` booleans, numeric
//! strings) and arbitrary unknown fields; decoding is lenient and unknown
//! `type` tags become [`LayerKind::Unknown`] instead of an error.

use layerkit_core::clamp_opacity;
use layerkit_core::geometry::Point;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

mod angle;
mod dimension;
mod lenient;
mod marker;

pub use angle::AngleDimensionLayer;
pub use dimension::{DimensionLayer, EndStyle, Orientation, TextPosition, ToleranceType};
pub use marker::{MarkerLayer, MarkerStyle, MarkerValue};

/// Virtual bottom-most slot in the layer list. Not a real record; dropping a
/// layer onto it sends the layer to the back of the z-order.
pub const BACKGROUND_ID: &str = "__background__";

fn default_true() -> bool {
    true
}
fn default_one() -> f64 {
    1.0
}

/// One annotation record in the ordered collection.
///
/// Common fields live here; per-type geometry and formatting live in
/// [`LayerKind`], flattened so the JSON stays a single flat object keyed by
/// `type`, exactly as persisted records look.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Layer {
    #[serde(default)]
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default = "default_true", deserialize_with = "lenient::bool_true")]
    pub visible: bool,
    #[serde(default, deserialize_with = "lenient::bool_false")]
    pub locked: bool,
    #[serde(default = "default_one", deserialize_with = "lenient::f64_one")]
    pub opacity: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stroke: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fill: Option<String>,
    #[serde(
        default,
        deserialize_with = "lenient::opt_f64",
        skip_serializing_if = "Option::is_none"
    )]
    pub stroke_width: Option<f64>,
    #[serde(default, deserialize_with = "lenient::f64_zero")]
    pub rotation: f64,
    /// Id of the owning group, if this layer is a folder member.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_group: Option<String>,
    #[serde(flatten)]
    pub kind: LayerKind,
}

/// Closed union over the `type` discriminant.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum LayerKind {
    #[serde(rename = "dimension")]
    Dimension(DimensionLayer),
    #[serde(rename = "angleDimension")]
    AngleDimension(AngleDimensionLayer),
    #[serde(rename = "marker")]
    Marker(MarkerLayer),
    #[serde(rename = "rectangle")]
    Rectangle(RectangleLayer),
    #[serde(rename = "circle")]
    Circle(CircleLayer),
    #[serde(rename = "text")]
    Text(TextLayer),
    #[serde(rename = "path")]
    Path(PathLayer),
    #[serde(rename = "blur")]
    Blur(BlurLayer),
    #[serde(rename = "group")]
    Group(GroupLayer),
    /// Record with a `type` this build does not know. Kept so newer data
    /// survives a round-trip through an older editor.
    #[serde(other, rename = "unknown")]
    Unknown,
}

impl LayerKind {
    /// The `type` discriminant string as persisted.
    pub fn type_name(&self) -> &'static str {
        match self {
            LayerKind::Dimension(_) => "dimension",
            LayerKind::AngleDimension(_) => "angleDimension",
            LayerKind::Marker(_) => "marker",
            LayerKind::Rectangle(_) => "rectangle",
            LayerKind::Circle(_) => "circle",
            LayerKind::Text(_) => "text",
            LayerKind::Path(_) => "path",
            LayerKind::Blur(_) => "blur",
            LayerKind::Group(_) => "group",
            LayerKind::Unknown => "unknown",
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RectangleLayer {
    #[serde(default, deserialize_with = "lenient::f64_zero")]
    pub x: f64,
    #[serde(default, deserialize_with = "lenient::f64_zero")]
    pub y: f64,
    #[serde(default, deserialize_with = "lenient::f64_zero")]
    pub width: f64,
    #[serde(default, deserialize_with = "lenient::f64_zero")]
    pub height: f64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CircleLayer {
    #[serde(default, deserialize_with = "lenient::f64_zero")]
    pub x: f64,
    #[serde(default, deserialize_with = "lenient::f64_zero")]
    pub y: f64,
    #[serde(default, deserialize_with = "lenient::f64_zero")]
    pub radius: f64,
}

fn default_text_font_size() -> f64 {
    16.0
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TextLayer {
    #[serde(default, deserialize_with = "lenient::f64_zero")]
    pub x: f64,
    #[serde(default, deserialize_with = "lenient::f64_zero")]
    pub y: f64,
    #[serde(default)]
    pub text: String,
    #[serde(
        default = "default_text_font_size",
        deserialize_with = "lenient::f64_zero"
    )]
    pub font_size: f64,
}

impl Default for TextLayer {
    fn default() -> Self {
        Self {
            x: 0.0,
            y: 0.0,
            text: String::new(),
            font_size: default_text_font_size(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PathLayer {
    #[serde(default)]
    pub points: Vec<Point>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BlurLayer {
    #[serde(default, deserialize_with = "lenient::f64_zero")]
    pub x: f64,
    #[serde(default, deserialize_with = "lenient::f64_zero")]
    pub y: f64,
    #[serde(default, deserialize_with = "lenient::f64_zero")]
    pub width: f64,
    #[serde(default, deserialize_with = "lenient::f64_zero")]
    pub height: f64,
}

/// A folder layer owning an ordered list of child layer ids.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupLayer {
    #[serde(default)]
    pub children: Vec<String>,
    #[serde(default, deserialize_with = "lenient::bool_false")]
    pub collapsed: bool,
}

fn generate_id(prefix: &str) -> String {
    let uuid = Uuid::new_v4().simple().to_string();
    format!("{}-{}", prefix, &uuid[..8])
}

impl Layer {
    fn with_kind(prefix: &str, name: &str, kind: LayerKind) -> Self {
        Self {
            id: generate_id(prefix),
            name: Some(name.to_string()),
            visible: true,
            locked: false,
            opacity: 1.0,
            stroke: None,
            fill: None,
            stroke_width: None,
            rotation: 0.0,
            parent_group: None,
            kind,
        }
    }

    /// A fully defaulted dimension layer between two anchor points.
    pub fn dimension(x1: f64, y1: f64, x2: f64, y2: f64) -> Self {
        Self::with_kind(
            "dimension",
            "Dimension",
            LayerKind::Dimension(DimensionLayer {
                x1,
                y1,
                x2,
                y2,
                ..DimensionLayer::default()
            }),
        )
    }

    /// A fully defaulted angle dimension layer for a vertex and two arms.
    pub fn angle_dimension(cx: f64, cy: f64, ax: f64, ay: f64, bx: f64, by: f64) -> Self {
        Self::with_kind(
            "angleDimension",
            "Angle Dimension",
            LayerKind::AngleDimension(AngleDimensionLayer {
                cx,
                cy,
                ax,
                ay,
                bx,
                by,
                ..AngleDimensionLayer::default()
            }),
        )
    }

    /// A fully defaulted marker layer at a point.
    pub fn marker(x: f64, y: f64) -> Self {
        Self::with_kind(
            "marker",
            "Marker",
            LayerKind::Marker(MarkerLayer {
                x,
                y,
                ..MarkerLayer::default()
            }),
        )
    }

    /// A fully defaulted (expanded, empty) group layer.
    pub fn group(name: &str) -> Self {
        Self::with_kind("group", name, LayerKind::Group(GroupLayer::default()))
    }

    /// Opacity clamped to `[0, 1]`.
    pub fn effective_opacity(&self) -> f64 {
        clamp_opacity(self.opacity)
    }

    /// Stroke width with invalid and non-positive values replaced.
    pub fn stroke_width_or(&self, default: f64) -> f64 {
        match self.stroke_width {
            Some(w) if w.is_finite() && w > 0.0 => w,
            _ => default,
        }
    }

    pub fn is_group(&self) -> bool {
        matches!(self.kind, LayerKind::Group(_))
    }

    pub fn as_group(&self) -> Option<&GroupLayer> {
        match &self.kind {
            LayerKind::Group(g) => Some(g),
            _ => None,
        }
    }

    pub fn as_group_mut(&mut self) -> Option<&mut GroupLayer> {
        match &mut self.kind {
            LayerKind::Group(g) => Some(g),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn decodes_legacy_scalars() {
        let layer: Layer = serde_json::from_value(json!({
            "type": "angleDimension",
            "id": "a1",
            "cx": 100, "cy": 100, "ax": 200, "ay": 100, "bx": 100, "by": 0,
            "reflexAngle": 1,
            "showUnit": 0,
            "visible": 1,
            "opacity": "0.5"
        }))
        .unwrap();
        assert!(layer.visible);
        assert_eq!(layer.opacity, 0.5);
        match layer.kind {
            LayerKind::AngleDimension(a) => {
                assert!(a.reflex_angle);
                assert!(!a.show_unit);
            }
            other => panic!("wrong kind: {other:?}"),
        }
    }

    #[test]
    fn unknown_fields_are_ignored() {
        let layer: Layer = serde_json::from_value(json!({
            "type": "dimension",
            "id": "d1",
            "x1": 0, "y1": 0, "x2": 30, "y2": 40,
            "futureFeatureFlag": {"nested": true}
        }))
        .unwrap();
        assert_eq!(layer.id, "d1");
        assert!(matches!(layer.kind, LayerKind::Dimension(_)));
    }

    #[test]
    fn unknown_type_is_preserved_as_variant() {
        let layer: Layer = serde_json::from_value(json!({
            "type": "hologram",
            "id": "h1"
        }))
        .unwrap();
        assert!(matches!(layer.kind, LayerKind::Unknown));
    }

    #[test]
    fn invalid_enum_strings_fall_back() {
        let layer: Layer = serde_json::from_value(json!({
            "type": "dimension",
            "endStyle": "laser",
            "textPosition": 12,
            "toleranceType": "sloppy",
            "toleranceValue": "not a number"
        }))
        .unwrap();
        let LayerKind::Dimension(d) = layer.kind else {
            panic!("wrong kind");
        };
        assert_eq!(d.end_style, EndStyle::Arrow);
        assert_eq!(d.text_position, TextPosition::Above);
        assert_eq!(d.tolerance_type, ToleranceType::None);
        assert_eq!(d.tolerance_value, None);
    }

    #[test]
    fn marker_value_asymmetry() {
        let number: MarkerValue = serde_json::from_value(json!(5)).unwrap();
        assert_eq!(number, MarkerValue::Number(5));
        let numeric_string: MarkerValue = serde_json::from_value(json!("7")).unwrap();
        assert_eq!(numeric_string, MarkerValue::Number(7));
        let custom: MarkerValue = serde_json::from_value(json!("1A")).unwrap();
        assert_eq!(custom, MarkerValue::Text("1A".to_string()));
        let null: MarkerValue = serde_json::from_value(json!(null)).unwrap();
        assert_eq!(null, MarkerValue::Number(1));
        let boolean: MarkerValue = serde_json::from_value(json!(true)).unwrap();
        assert_eq!(boolean, MarkerValue::Number(1));
    }

    #[test]
    fn round_trips_through_json() {
        let layer = Layer::dimension(0.0, 0.0, 30.0, 40.0);
        let encoded = serde_json::to_value(&layer).unwrap();
        assert_eq!(encoded["type"], "dimension");
        let decoded: Layer = serde_json::from_value(encoded).unwrap();
        assert_eq!(decoded.id, layer.id);
        assert!(matches!(decoded.kind, LayerKind::Dimension(_)));
    }

    #[test]
    fn factories_generate_prefixed_ids() {
        let d = Layer::dimension(0.0, 0.0, 1.0, 1.0);
        assert!(d.id.starts_with("dimension-"));
        let a = Layer::angle_dimension(0.0, 0.0, 1.0, 0.0, 0.0, 1.0);
        assert!(a.id.starts_with("angleDimension-"));
        let m = Layer::marker(5.0, 5.0);
        assert!(m.id.starts_with("marker-"));
        assert_ne!(
            Layer::marker(0.0, 0.0).id,
            Layer::marker(0.0, 0.0).id,
            "ids must be unique"
        );
    }
}
