//! Numbered/lettered marker layer records.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::str::FromStr;

use super::lenient;

/// Visual style of a marker's sequence label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum MarkerStyle {
    #[default]
    Circled,
    Parentheses,
    Plain,
    Letter,
    LetterCircled,
}

impl MarkerStyle {
    pub const ALL: [MarkerStyle; 5] = [
        MarkerStyle::Circled,
        MarkerStyle::Parentheses,
        MarkerStyle::Plain,
        MarkerStyle::Letter,
        MarkerStyle::LetterCircled,
    ];

    /// Whether this style draws a circle body behind the label.
    pub fn has_circle(&self) -> bool {
        matches!(self, MarkerStyle::Circled | MarkerStyle::LetterCircled)
    }

    /// Whether this style renders letters instead of digits.
    pub fn is_lettered(&self) -> bool {
        matches!(self, MarkerStyle::Letter | MarkerStyle::LetterCircled)
    }
}

impl FromStr for MarkerStyle {
    type Err = ();
    fn from_str(s: &str) -> Result<Self, ()> {
        match s {
            "circled" => Ok(MarkerStyle::Circled),
            "parentheses" => Ok(MarkerStyle::Parentheses),
            "plain" => Ok(MarkerStyle::Plain),
            "letter" => Ok(MarkerStyle::Letter),
            "letter-circled" => Ok(MarkerStyle::LetterCircled),
            _ => Err(()),
        }
    }
}

/// A marker's value: a sequence number, or verbatim user-entered text.
///
/// Stored values that are numbers (or numeric strings) decode as `Number`;
/// non-numeric strings are deliberately kept verbatim, since that is how
/// custom labels like `"1A"` are stored. Anything else defaults to `1`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum MarkerValue {
    Number(i64),
    Text(String),
}

impl Default for MarkerValue {
    fn default() -> Self {
        MarkerValue::Number(1)
    }
}

impl MarkerValue {
    pub fn as_number(&self) -> Option<i64> {
        match self {
            MarkerValue::Number(n) => Some(*n),
            MarkerValue::Text(_) => None,
        }
    }
}

impl<'de> Deserialize<'de> for MarkerValue {
    fn deserialize<D: Deserializer<'de>>(d: D) -> Result<Self, D::Error> {
        let value = Value::deserialize(d)?;
        Ok(match value {
            Value::Number(n) => n
                .as_i64()
                .or_else(|| n.as_f64().map(|f| f.round() as i64))
                .map(MarkerValue::Number)
                .unwrap_or_default(),
            Value::String(s) => match s.trim().parse::<i64>() {
                Ok(n) => MarkerValue::Number(n),
                Err(_) => MarkerValue::Text(s),
            },
            _ => MarkerValue::default(),
        })
    }
}

fn default_size() -> f64 {
    24.0
}

/// A small numbered or lettered marker, optionally with a leader arrow.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MarkerLayer {
    #[serde(default, deserialize_with = "lenient::f64_zero")]
    pub x: f64,
    #[serde(default, deserialize_with = "lenient::f64_zero")]
    pub y: f64,
    #[serde(default)]
    pub value: MarkerValue,
    #[serde(default, deserialize_with = "lenient::enum_or_default")]
    pub style: MarkerStyle,
    #[serde(default = "default_size", deserialize_with = "lenient::f64_zero")]
    pub size: f64,

    #[serde(default, deserialize_with = "lenient::bool_false")]
    pub has_arrow: bool,
    #[serde(
        default,
        deserialize_with = "lenient::opt_f64",
        skip_serializing_if = "Option::is_none"
    )]
    pub arrow_x: Option<f64>,
    #[serde(
        default,
        deserialize_with = "lenient::opt_f64",
        skip_serializing_if = "Option::is_none"
    )]
    pub arrow_y: Option<f64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text_stroke: Option<String>,
    #[serde(
        default,
        deserialize_with = "lenient::opt_f64",
        skip_serializing_if = "Option::is_none"
    )]
    pub text_stroke_width: Option<f64>,

    #[serde(default, deserialize_with = "lenient::bool_false")]
    pub has_shadow: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shadow_color: Option<String>,
    #[serde(
        default,
        deserialize_with = "lenient::opt_f64",
        skip_serializing_if = "Option::is_none"
    )]
    pub shadow_blur: Option<f64>,
    #[serde(
        default,
        deserialize_with = "lenient::opt_f64",
        skip_serializing_if = "Option::is_none"
    )]
    pub shadow_offset_x: Option<f64>,
    #[serde(
        default,
        deserialize_with = "lenient::opt_f64",
        skip_serializing_if = "Option::is_none"
    )]
    pub shadow_offset_y: Option<f64>,

    #[serde(default, deserialize_with = "lenient::f64_zero")]
    pub font_size_adjust: f64,
}

impl Default for MarkerLayer {
    fn default() -> Self {
        Self {
            x: 0.0,
            y: 0.0,
            value: MarkerValue::default(),
            style: MarkerStyle::Circled,
            size: default_size(),
            has_arrow: false,
            arrow_x: None,
            arrow_y: None,
            text_stroke: None,
            text_stroke_width: None,
            has_shadow: false,
            shadow_color: None,
            shadow_blur: None,
            shadow_offset_x: None,
            shadow_offset_y: None,
            font_size_adjust: 0.0,
        }
    }
}

impl MarkerLayer {
    /// Effective marker diameter; non-positive/NaN sizes fall back to 24.
    pub fn effective_size(&self) -> f64 {
        if self.size.is_finite() && self.size > 0.0 {
            self.size
        } else {
            default_size()
        }
    }

    /// Label font size, derived from the marker size rather than stored.
    pub fn font_size(&self) -> f64 {
        self.effective_size() * 0.58 + self.font_size_adjust
    }
}
