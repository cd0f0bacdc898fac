//! Small numeric helpers shared by the estimators.
//!
//! Rounding is applied only when a value leaves the engine; interpretation
//! labels and derived means are computed from unrounded values.

/// Round `value` to `decimals` places (half away from zero).
pub fn round_to(value: f64, decimals: u32) -> f64 {
    let factor = 10f64.powi(decimals as i32);
    (value * factor).round() / factor
}

/// `numerator / denominator × 100`, or 0 when the denominator is 0.
pub fn percent(numerator: usize, denominator: usize) -> f64 {
    if denominator == 0 {
        0.0
    } else {
        numerator as f64 / denominator as f64 * 100.0
    }
}

/// Arithmetic mean, `None` for an empty slice.
pub fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        None
    } else {
        Some(values.iter().sum::<f64>() / values.len() as f64)
    }
}

/// Chance-corrected agreement `(observed − expected) / (1 − expected)`.
///
/// When expected agreement is 1 every observation fell into one shared
/// category, so observed agreement is 1 as well and the ratio is 0/0. That
/// case is defined as perfect agreement.
pub fn chance_corrected(observed: f64, expected: f64) -> f64 {
    if (1.0 - expected).abs() <= EXPECTED_EPSILON {
        1.0
    } else {
        (observed - expected) / (1.0 - expected)
    }
}

/// Tolerance for treating expected agreement as exactly 1.
const EXPECTED_EPSILON: f64 = 1e-12;
