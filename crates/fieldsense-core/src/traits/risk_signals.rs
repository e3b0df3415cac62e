//! Risk collaborator seams.
//!
//! `WeatherSource` is the raw-data boundary (an HTTP client in production,
//! fixtures in tests). `RiskSignals` is what the core consumes.

use chrono::NaiveDate;

use crate::errors::DataUnavailable;
use crate::types::{FieldRisks, RawMeasurement};

/// Supplier of raw daily weather/soil measurements.
pub trait WeatherSource: Send + Sync {
    /// Measurements for a single day at a location.
    fn daily(&self, date: NaiveDate, lat: f64, lon: f64) -> Result<Vec<RawMeasurement>, DataUnavailable>;

    /// Forecast measurements from today through `days_ahead`.
    fn forecast(&self, lat: f64, lon: f64, days_ahead: u32) -> Result<Vec<RawMeasurement>, DataUnavailable>;
}

/// Producer of per-field stress scores.
pub trait RiskSignals: Send + Sync {
    fn field_risks(
        &self,
        date: NaiveDate,
        crop: &str,
        lat: f64,
        lon: f64,
    ) -> Result<FieldRisks, DataUnavailable>;

    fn forecast_series(
        &self,
        lat: f64,
        lon: f64,
        days_ahead: u32,
    ) -> Result<Vec<RawMeasurement>, DataUnavailable>;
}
