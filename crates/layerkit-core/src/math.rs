//! Numeric helpers used throughout the renderers.
//!
//! Layer records arrive from a dynamically typed storage layer, so every
//! numeric field can be `NaN` or infinite after decoding. These helpers
//! centralize the "substitute a sane default" policy.

/// Bounds `value` to `[min, max]` inclusive.
///
/// Any non-finite input (NaN, ±infinity) returns `min`. The caller is
/// responsible for passing `min <= max`.
pub fn clamp(value: f64, min: f64, max: f64) -> f64 {
    if !value.is_finite() {
        return min;
    }
    value.max(min).min(max)
}

/// Clamps an opacity value to `[0, 1]`.
///
/// Non-finite input returns the full-opacity default of `1.0` rather than
/// `0.0` so that a corrupt opacity never makes a layer invisible.
pub fn clamp_opacity(value: f64) -> f64 {
    if !value.is_finite() {
        return 1.0;
    }
    clamp(value, 0.0, 1.0)
}

/// Converts degrees to radians. No normalization is applied; values outside
/// `[0, 360)` convert proportionally.
pub fn degrees_to_radians(degrees: f64) -> f64 {
    degrees * std::f64::consts::PI / 180.0
}

/// Converts radians to degrees. Exact inverse of [`degrees_to_radians`] to
/// floating-point precision.
pub fn radians_to_degrees(radians: f64) -> f64 {
    radians * 180.0 / std::f64::consts::PI
}
