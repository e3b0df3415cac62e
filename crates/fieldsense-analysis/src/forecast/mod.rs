//! Multi-day risk projection with optional product impact.

pub mod impact;
pub mod projector;

pub use impact::{apply_impact, impact_factors, ImpactFactors};
pub use projector::ForecastProjector;
