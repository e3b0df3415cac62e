//! Numeric helpers shared across crates.

/// Round half away from zero to `decimals` places.
///
/// `f64::round` already rounds half away from zero; this scales around it.
/// Non-finite input is returned unchanged.
pub fn round_to(value: f64, decimals: u32) -> f64 {
    if !value.is_finite() {
        return value;
    }
    let factor = 10f64.powi(decimals as i32);
    (value * factor).round() / factor
}
