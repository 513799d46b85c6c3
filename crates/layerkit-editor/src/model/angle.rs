//! Angle dimension layer records.

use serde::{Deserialize, Serialize};

use super::dimension::{EndStyle, ToleranceType};
use super::lenient;

fn default_arc_radius() -> f64 {
    40.0
}
fn default_precision() -> u32 {
    1
}
fn default_true() -> bool {
    true
}
fn default_font_size() -> f64 {
    12.0
}
fn default_extension_length() -> f64 {
    15.0
}

/// An angle annotation: a vertex, two arms, and an arc sweep between them.
///
/// The measured angle is the minor (≤180°) sweep unless `reflex_angle` is
/// set, in which case the annotation reads the >180° side.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AngleDimensionLayer {
    #[serde(default, deserialize_with = "lenient::f64_zero")]
    pub cx: f64,
    #[serde(default, deserialize_with = "lenient::f64_zero")]
    pub cy: f64,
    #[serde(default, deserialize_with = "lenient::f64_zero")]
    pub ax: f64,
    #[serde(default, deserialize_with = "lenient::f64_zero")]
    pub ay: f64,
    #[serde(default, deserialize_with = "lenient::f64_zero")]
    pub bx: f64,
    #[serde(default, deserialize_with = "lenient::f64_zero")]
    pub by: f64,

    #[serde(default = "default_arc_radius", deserialize_with = "lenient::f64_zero")]
    pub arc_radius: f64,
    /// Legacy records store this as `0`/`1`.
    #[serde(default, deserialize_with = "lenient::bool_false")]
    pub reflex_angle: bool,

    #[serde(default = "default_precision", deserialize_with = "lenient::u32_zero")]
    pub precision: u32,
    #[serde(default = "default_true", deserialize_with = "lenient::bool_true")]
    pub show_unit: bool,

    #[serde(default, deserialize_with = "lenient::enum_or_default")]
    pub end_style: EndStyle,
    #[serde(default, deserialize_with = "lenient::enum_or_default")]
    pub tolerance_type: ToleranceType,
    #[serde(
        default,
        deserialize_with = "lenient::opt_f64",
        skip_serializing_if = "Option::is_none"
    )]
    pub tolerance_value: Option<f64>,
    #[serde(
        default,
        deserialize_with = "lenient::opt_f64",
        skip_serializing_if = "Option::is_none"
    )]
    pub tolerance_upper: Option<f64>,
    #[serde(
        default,
        deserialize_with = "lenient::opt_f64",
        skip_serializing_if = "Option::is_none"
    )]
    pub tolerance_lower: Option<f64>,

    #[serde(default = "default_true", deserialize_with = "lenient::bool_true")]
    pub show_background: bool,
    #[serde(default = "default_font_size", deserialize_with = "lenient::f64_zero")]
    pub font_size: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub font_family: Option<String>,
    #[serde(
        default = "default_extension_length",
        deserialize_with = "lenient::f64_zero"
    )]
    pub extension_length: f64,

    /// User override for the auto-computed angle label.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
}

impl Default for AngleDimensionLayer {
    fn default() -> Self {
        Self {
            cx: 0.0,
            cy: 0.0,
            ax: 0.0,
            ay: 0.0,
            bx: 0.0,
            by: 0.0,
            arc_radius: default_arc_radius(),
            reflex_angle: false,
            precision: default_precision(),
            show_unit: true,
            end_style: EndStyle::Arrow,
            tolerance_type: ToleranceType::None,
            tolerance_value: None,
            tolerance_upper: None,
            tolerance_lower: None,
            show_background: true,
            font_size: default_font_size(),
            font_family: None,
            extension_length: default_extension_length(),
            text: None,
        }
    }
}

impl AngleDimensionLayer {
    /// Arc radius with the non-positive/NaN fallback applied.
    pub fn effective_arc_radius(&self) -> f64 {
        if self.arc_radius.is_finite() && self.arc_radius > 0.0 {
            self.arc_radius
        } else {
            default_arc_radius()
        }
    }
}
