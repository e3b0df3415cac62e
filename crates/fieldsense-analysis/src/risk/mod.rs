//! Crop risk scoring: heat, frost, and drought stress on a 0-9 scale.

pub mod calculator;
pub mod crops;
pub mod measures;
pub mod scoring;

pub use calculator::RiskCalculator;
pub use crops::Crop;
pub use measures::{group_by_date, DayMeasurements, Measure};
pub use scoring::{calculate_drought_risk, calculate_frost_stress, calculate_heat_stress};
