//! Risk signals: raw measurements in, stress scores out.

use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// One raw daily measurement as delivered by a weather source.
///
/// `valid_date` is an ISO date or datetime; `measure_type` is the provider's
/// label, e.g. `TempAir_DailyMax (C)`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawMeasurement {
    pub valid_date: String,
    pub measure_type: String,
    pub daily_value: f64,
}

impl RawMeasurement {
    pub fn new(valid_date: impl Into<String>, measure_type: impl Into<String>, daily_value: f64) -> Self {
        Self {
            valid_date: valid_date.into(),
            measure_type: measure_type.into(),
            daily_value,
        }
    }
}

/// Drought risk classes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DroughtLevel {
    #[serde(rename = "No risk")]
    NoRisk,
    #[serde(rename = "Medium risk")]
    MediumRisk,
    #[serde(rename = "High risk")]
    HighRisk,
}

impl DroughtLevel {
    pub fn label(&self) -> &'static str {
        match self {
            Self::NoRisk => "No risk",
            Self::MediumRisk => "Medium risk",
            Self::HighRisk => "High risk",
        }
    }
}

impl fmt::Display for DroughtLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DroughtAssessment {
    pub drought_index: f64,
    pub risk_level: DroughtLevel,
    pub risk_score: f64,
}

/// Current risk assessment for one field location and date.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldRisks {
    pub heat_stress: f64,
    pub frost_stress: f64,
    pub drought_stress: f64,
    pub drought_index: f64,
    pub temperature_max: f64,
    pub temperature_min: f64,
    pub precipitation: f64,
    pub soil_moisture: f64,
    pub date: NaiveDate,
}

/// Reduction a product applies to each risk axis of one day.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ProductImpact {
    pub heat_stress_with_product: f64,
    pub heat_stress_reduction: f64,
    pub frost_stress_with_product: f64,
    pub frost_stress_reduction: f64,
    pub drought_stress_with_product: f64,
    pub drought_stress_reduction: f64,
}

/// Projected risks for one forecast day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyRisk {
    pub date: NaiveDate,
    pub heat_stress: f64,
    pub frost_stress: f64,
    pub drought_stress: f64,
    pub drought_index: f64,
    pub tmax: f64,
    pub tmin: f64,
    pub precipitation: f64,
    pub soil_moisture: f64,
    #[serde(flatten, skip_serializing_if = "Option::is_none")]
    pub product_impact: Option<ProductImpact>,
}
