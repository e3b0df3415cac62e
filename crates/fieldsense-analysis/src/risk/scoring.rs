//! Piecewise-linear stress scores and the drought index.
//!
//! Unknown crops score 0. Scores are rounded to one decimal, the drought
//! index to two.

use fieldsense_core::constants::{MAX_RISK_SCORE, MEDIUM_DROUGHT_SCORE};
use fieldsense_core::numeric::round_to;
use fieldsense_core::types::{DroughtAssessment, DroughtLevel};

use super::crops::Crop;

/// Heat stress for a daily maximum temperature.
///
/// 0 at or below the crop optimum, 9 at or above its limit, linear between.
pub fn calculate_heat_stress(crop: &str, tmax: f64) -> f64 {
    let Ok(crop) = crop.parse::<Crop>() else {
        return 0.0;
    };
    let limits = crop.heat_limits();
    let stress = if tmax <= limits.optimum {
        0.0
    } else if tmax < limits.limit {
        MAX_RISK_SCORE * (tmax - limits.optimum) / (limits.limit - limits.optimum)
    } else {
        MAX_RISK_SCORE
    };
    round_to(stress, 1)
}

/// Frost stress for a daily minimum temperature.
///
/// 0 at or above the no-frost threshold, 9 at or below the frost threshold,
/// linear between. Crops without a frost model always score 0.
pub fn calculate_frost_stress(crop: &str, tmin: f64) -> f64 {
    let Some(limits) = crop.parse::<Crop>().ok().and_then(|c| c.frost_limits()) else {
        return 0.0;
    };
    let stress = if tmin >= limits.no_frost {
        0.0
    } else if tmin > limits.frost {
        MAX_RISK_SCORE * ((tmin - limits.no_frost) / (limits.frost - limits.no_frost)).abs()
    } else {
        MAX_RISK_SCORE
    };
    round_to(stress, 1)
}

/// Drought index `DI = (P - E) + SM / T` and its risk class.
///
/// `DI` is 0 when the average temperature is 0. Above 1 is no risk, exactly
/// 1 is medium risk (score 5), below 1 is high risk scaled by `9 * (1 - DI)`
/// and capped at 9.
pub fn calculate_drought_risk(
    precipitation: f64,
    evapotranspiration: f64,
    soil_moisture: f64,
    temperature: f64,
) -> DroughtAssessment {
    let di = if temperature == 0.0 {
        0.0
    } else {
        (precipitation - evapotranspiration) + soil_moisture / temperature
    };

    let (risk_level, risk_score) = if di > 1.0 {
        (DroughtLevel::NoRisk, 0.0)
    } else if di == 1.0 {
        (DroughtLevel::MediumRisk, MEDIUM_DROUGHT_SCORE)
    } else {
        (DroughtLevel::HighRisk, (MAX_RISK_SCORE * (1.0 - di)).min(MAX_RISK_SCORE))
    };

    DroughtAssessment {
        drought_index: round_to(di, 2),
        risk_level,
        risk_score: round_to(risk_score, 1),
    }
}
