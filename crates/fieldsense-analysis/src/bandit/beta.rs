//! Beta posterior helpers via `statrs`.

use fieldsense_core::constants::{CONFIDENCE_FLOOR, CONFIDENCE_SATURATION, CONFIDENCE_SPAN};
use fieldsense_core::numeric::round_to;
use rand::distributions::Distribution;
use rand::Rng;
use statrs::distribution::Beta;

/// Posterior mean: alpha / (alpha + beta).
///
/// Guards against division by zero; falls back to 0.5.
pub fn posterior_mean(alpha: f64, beta: f64) -> f64 {
    let sum = alpha + beta;
    if sum <= 0.0 || !sum.is_finite() {
        return 0.5;
    }
    let mean = alpha / sum;
    if mean.is_finite() {
        mean.clamp(0.0, 1.0)
    } else {
        0.5
    }
}

/// Draw one sample from Beta(alpha, beta).
///
/// Parameters `statrs` rejects yield the posterior mean instead of a draw.
pub fn sample_beta<R: Rng + ?Sized>(alpha: f64, beta: f64, rng: &mut R) -> f64 {
    match Beta::new(alpha, beta) {
        Ok(dist) => {
            let x = dist.sample(rng);
            if x.is_finite() {
                x
            } else {
                posterior_mean(alpha, beta)
            }
        }
        Err(_) => posterior_mean(alpha, beta),
    }
}

/// Recommendation confidence in percent: `10 + min(90, total / 30 * 90)`,
/// one decimal. A non-finite evidence total yields the floor.
pub fn confidence(alpha: f64, beta: f64) -> f64 {
    let total = alpha + beta;
    if !total.is_finite() {
        return CONFIDENCE_FLOOR;
    }
    let scaled = (total / CONFIDENCE_SATURATION * CONFIDENCE_SPAN).min(CONFIDENCE_SPAN);
    round_to(CONFIDENCE_FLOOR + scaled, 1)
}
