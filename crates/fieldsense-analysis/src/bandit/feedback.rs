//! Rating → Beta parameter deltas.

use fieldsense_core::constants::{FAILURE_RATING, MAX_RATING, MIN_RATING, SUCCESS_RATING};
use fieldsense_core::errors::RecommenderError;

/// Convert a 1-10 farmer rating into `(alpha_delta, beta_delta)`.
///
/// 7..=10 is a success (+1 alpha), 1..=3 a failure (+1 beta). 4..=6 splits
/// one unit of evidence: `((r - 4) / 3, (7 - r) / 3)`.
pub fn rating_to_delta(rating: i64) -> Result<(f64, f64), RecommenderError> {
    if !(MIN_RATING..=MAX_RATING).contains(&rating) {
        return Err(RecommenderError::InvalidRating { rating });
    }
    let delta = if rating >= SUCCESS_RATING {
        (1.0, 0.0)
    } else if rating <= FAILURE_RATING {
        (0.0, 1.0)
    } else {
        let r = rating as f64;
        ((r - 4.0) / 3.0, (7.0 - r) / 3.0)
    };
    Ok(delta)
}
