//! Measurement label formatting shared by the dimension and angle renderers.
//!
//! Both renderers speak the same tolerance vocabulary (`symmetric`,
//! `deviation`, `limits`, `basic`, `none`); only the unit conventions
//! differ (`" px"` with a separating space vs. a bare `"°"`).

use crate::model::ToleranceType;

/// Unit conventions for one renderer.
#[derive(Debug, Clone)]
pub struct UnitFormat {
    pub unit: String,
    /// Whether a space separates value and unit (`"50 px"` vs `"45.0°"`).
    pub spaced: bool,
    pub show_unit: bool,
    pub precision: u32,
}

impl UnitFormat {
    /// Formats a bare value with precision and unit.
    pub fn value(&self, value: f64) -> String {
        let number = format!("{:.*}", self.precision as usize, value);
        if self.show_unit {
            if self.spaced {
                format!("{} {}", number, self.unit)
            } else {
                format!("{}{}", number, self.unit)
            }
        } else {
            number
        }
    }
}

/// Tolerance fields as decoded from a layer record. Non-numeric stored
/// values arrive as `None` and never produce a suffix.
#[derive(Debug, Clone, Copy, Default)]
pub struct Tolerance {
    pub kind: ToleranceType,
    pub value: Option<f64>,
    pub upper: Option<f64>,
    pub lower: Option<f64>,
}

impl Tolerance {
    fn symmetric_value(&self) -> Option<f64> {
        self.value.filter(|v| v.is_finite() && *v != 0.0)
    }

    fn deviation_values(&self) -> Option<(f64, f64)> {
        let upper = self.upper.filter(|v| v.is_finite()).unwrap_or(0.0);
        let lower = self.lower.filter(|v| v.is_finite()).unwrap_or(0.0);
        if upper == 0.0 && lower == 0.0 {
            None
        } else {
            Some((upper, lower))
        }
    }
}

/// Shortest plain rendering of a tolerance magnitude (`0.5`, `2`).
fn plain(value: f64) -> String {
    format!("{}", value)
}

/// Formats a measured value with its tolerance notation applied.
///
/// `limits` replaces the nominal value with its two bounds; the other kinds
/// append a suffix (or nothing). `basic` carries no textual suffix; it is
/// rendered as a box around the label, which is the renderer's job.
pub fn format_with_tolerance(value: f64, units: &UnitFormat, tolerance: &Tolerance) -> String {
    match tolerance.kind {
        ToleranceType::Symmetric => match tolerance.symmetric_value() {
            Some(v) => format!("{} ±{}", units.value(value), plain(v)),
            None => units.value(value),
        },
        ToleranceType::Deviation => match tolerance.deviation_values() {
            // Upper always leads with '+', lower with '-', regardless of the
            // stored signs.
            Some((u, l)) => format!("{} +{}/-{}", units.value(value), plain(u.abs()), plain(l.abs())),
            None => units.value(value),
        },
        ToleranceType::Limits => {
            let upper = tolerance.upper.filter(|v| v.is_finite()).unwrap_or(0.0);
            let lower = tolerance.lower.filter(|v| v.is_finite()).unwrap_or(0.0);
            format!(
                "{} to {}",
                units.value(value - lower.abs()),
                units.value(value + upper.abs())
            )
        }
        ToleranceType::None | ToleranceType::Basic => units.value(value),
    }
}

/// Appends the tolerance notation to user-entered label text without
/// altering the text itself. With no computed value to offset, `limits`
/// appends the tolerance bounds themselves.
pub fn append_tolerance_to_text(text: &str, tolerance: &Tolerance) -> String {
    match tolerance.kind {
        ToleranceType::Symmetric => match tolerance.symmetric_value() {
            Some(v) => format!("{} ±{}", text, plain(v)),
            None => text.to_string(),
        },
        ToleranceType::Deviation => match tolerance.deviation_values() {
            Some((u, l)) => format!("{} +{}/-{}", text, plain(u.abs()), plain(l.abs())),
            None => text.to_string(),
        },
        ToleranceType::Limits => {
            let upper = tolerance.upper.filter(|v| v.is_finite()).unwrap_or(0.0);
            let lower = tolerance.lower.filter(|v| v.is_finite()).unwrap_or(0.0);
            if upper == 0.0 && lower == 0.0 {
                text.to_string()
            } else {
                format!("{} -{} to +{}", text, plain(lower.abs()), plain(upper.abs()))
            }
        }
        ToleranceType::None | ToleranceType::Basic => text.to_string(),
    }
}
