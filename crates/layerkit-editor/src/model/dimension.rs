//! Linear dimension layer records.

use serde::{Deserialize, Serialize};
use std::str::FromStr;

use super::lenient;

/// Marker drawn at each end of a dimension line or angle arc.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum EndStyle {
    #[default]
    Arrow,
    Tick,
    Dot,
    None,
}

impl EndStyle {
    pub const ALL: [EndStyle; 4] = [EndStyle::Arrow, EndStyle::Tick, EndStyle::Dot, EndStyle::None];
}

impl FromStr for EndStyle {
    type Err = ();
    fn from_str(s: &str) -> Result<Self, ()> {
        match s {
            "arrow" => Ok(EndStyle::Arrow),
            "tick" => Ok(EndStyle::Tick),
            "dot" => Ok(EndStyle::Dot),
            "none" => Ok(EndStyle::None),
            _ => Err(()),
        }
    }
}

/// Placement of the measurement label relative to the dimension line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TextPosition {
    #[default]
    Above,
    Below,
    Center,
}

impl TextPosition {
    pub const ALL: [TextPosition; 3] =
        [TextPosition::Above, TextPosition::Below, TextPosition::Center];
}

impl FromStr for TextPosition {
    type Err = ();
    fn from_str(s: &str) -> Result<Self, ()> {
        match s {
            "above" => Ok(TextPosition::Above),
            "below" => Ok(TextPosition::Below),
            "center" => Ok(TextPosition::Center),
            _ => Err(()),
        }
    }
}

/// Constrains how the offset direction of the dimension line is derived.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Orientation {
    Horizontal,
    Vertical,
    #[default]
    Free,
}

impl FromStr for Orientation {
    type Err = ();
    fn from_str(s: &str) -> Result<Self, ()> {
        match s {
            "horizontal" => Ok(Orientation::Horizontal),
            "vertical" => Ok(Orientation::Vertical),
            "free" => Ok(Orientation::Free),
            _ => Err(()),
        }
    }
}

/// Engineering tolerance notation attached to a measurement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ToleranceType {
    #[default]
    None,
    Basic,
    Symmetric,
    Deviation,
    Limits,
}

impl FromStr for ToleranceType {
    type Err = ();
    fn from_str(s: &str) -> Result<Self, ()> {
        match s {
            "none" => Ok(ToleranceType::None),
            "basic" => Ok(ToleranceType::Basic),
            "symmetric" => Ok(ToleranceType::Symmetric),
            "deviation" => Ok(ToleranceType::Deviation),
            "limits" => Ok(ToleranceType::Limits),
            _ => Err(()),
        }
    }
}

fn default_unit() -> String {
    "px".to_string()
}
fn default_scale() -> f64 {
    1.0
}
fn default_true() -> bool {
    true
}
fn default_extension_length() -> f64 {
    15.0
}
fn default_extension_gap() -> f64 {
    5.0
}
fn default_font_size() -> f64 {
    12.0
}

/// A linear measurement annotation between two anchor points.
///
/// The dimension line itself is drawn offset from the measured baseline by
/// `dimension_offset` (derived from the extension geometry when absent),
/// with extension lines connecting it back toward the anchors.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DimensionLayer {
    #[serde(default, deserialize_with = "lenient::f64_zero")]
    pub x1: f64,
    #[serde(default, deserialize_with = "lenient::f64_zero")]
    pub y1: f64,
    #[serde(default, deserialize_with = "lenient::f64_zero")]
    pub x2: f64,
    #[serde(default, deserialize_with = "lenient::f64_zero")]
    pub y2: f64,

    #[serde(default = "default_unit")]
    pub unit: String,
    #[serde(default = "default_scale", deserialize_with = "lenient::f64_one")]
    pub scale: f64,
    #[serde(default, deserialize_with = "lenient::u32_zero")]
    pub precision: u32,
    #[serde(default = "default_true", deserialize_with = "lenient::bool_true")]
    pub show_unit: bool,

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

    #[serde(default, deserialize_with = "lenient::enum_or_default")]
    pub end_style: EndStyle,
    #[serde(default, deserialize_with = "lenient::enum_or_default")]
    pub text_position: TextPosition,
    /// Opaque label-direction hint; round-trips but is not interpreted.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text_direction: Option<String>,
    #[serde(default, deserialize_with = "lenient::enum_or_default")]
    pub orientation: Orientation,

    #[serde(
        default = "default_extension_length",
        deserialize_with = "lenient::f64_zero"
    )]
    pub extension_length: f64,
    #[serde(
        default = "default_extension_gap",
        deserialize_with = "lenient::f64_zero"
    )]
    pub extension_gap: f64,
    #[serde(
        default,
        deserialize_with = "lenient::opt_f64",
        skip_serializing_if = "Option::is_none"
    )]
    pub dimension_offset: Option<f64>,

    #[serde(default = "default_true", deserialize_with = "lenient::bool_true")]
    pub show_background: bool,
    #[serde(default = "default_font_size", deserialize_with = "lenient::f64_zero")]
    pub font_size: f64,

    /// User override for the auto-computed measurement label.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
}

impl Default for DimensionLayer {
    fn default() -> Self {
        Self {
            x1: 0.0,
            y1: 0.0,
            x2: 0.0,
            y2: 0.0,
            unit: default_unit(),
            scale: 1.0,
            precision: 0,
            show_unit: true,
            tolerance_type: ToleranceType::None,
            tolerance_value: None,
            tolerance_upper: None,
            tolerance_lower: None,
            end_style: EndStyle::Arrow,
            text_position: TextPosition::Above,
            text_direction: None,
            orientation: Orientation::Free,
            extension_length: default_extension_length(),
            extension_gap: default_extension_gap(),
            dimension_offset: None,
            show_background: true,
            font_size: default_font_size(),
            text: None,
        }
    }
}

impl DimensionLayer {
    /// Offset of the dimension line from the measured baseline. Falls back
    /// to a value derived from the extension geometry when not explicit.
    pub fn line_offset(&self) -> f64 {
        match self.dimension_offset {
            Some(o) if o.is_finite() => o,
            _ => self.extension_gap + self.extension_length / 2.0,
        }
    }
}
