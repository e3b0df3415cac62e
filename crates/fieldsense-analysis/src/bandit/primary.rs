//! Primary-factor resolution.
//!
//! The same rule indexes the belief table everywhere: recommend, confidence,
//! improvements, and feedback updates.

use fieldsense_core::types::{Context, ContextFactor, ContextType};

/// The largest factor in the context.
///
/// Ties go to the earliest factor in `ContextFactor::ALL`
/// (heat, frost, drought, soil quality). NaN never wins.
pub fn primary_factor(context: &Context) -> ContextFactor {
    let mut best = ContextFactor::HeatStress;
    let mut best_value = context.factor(best);
    for factor in ContextFactor::ALL.into_iter().skip(1) {
        let value = context.factor(factor);
        if value > best_value || (best_value.is_nan() && !value.is_nan()) {
            best = factor;
            best_value = value;
        }
    }
    best
}

/// The belief row credited for the context. Soil quality maps to
/// `soil_quality_low`.
pub fn determine_primary_context(context: &Context) -> ContextType {
    primary_factor(context).context_type()
}
