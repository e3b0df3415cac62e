//! ForecastProjector — scores a forecast series day by day.

use std::sync::Arc;

use fieldsense_core::errors::DataUnavailable;
use fieldsense_core::traits::RiskSignals;
use fieldsense_core::types::{DailyRisk, Product, RawMeasurement};

use super::impact::{apply_impact, impact_factors};
use crate::risk::measures::{group_by_date, Measure};
use crate::risk::scoring::{calculate_drought_risk, calculate_frost_stress, calculate_heat_stress};

/// Projects crop risks over a forecast horizon.
pub struct ForecastProjector {
    signals: Arc<dyn RiskSignals>,
}

impl ForecastProjector {
    pub fn new(signals: Arc<dyn RiskSignals>) -> Self {
        Self { signals }
    }

    /// Daily risks for the next `days_ahead` days, ascending by date.
    ///
    /// Upstream failures are returned unchanged.
    pub fn predict_future_risks(
        &self,
        lat: f64,
        lon: f64,
        crop: &str,
        days_ahead: u32,
    ) -> Result<Vec<DailyRisk>, DataUnavailable> {
        let series = self.signals.forecast_series(lat, lon, days_ahead)?;
        let days = Self::project(crop, &series);
        tracing::debug!(crop, forecast_days = days.len(), "forecast projected");
        Ok(days)
    }

    /// `predict_future_risks` with each day carrying the named product's
    /// impact. An unknown product name yields the plain projection.
    pub fn predict_with_biologicals_impact(
        &self,
        lat: f64,
        lon: f64,
        crop: &str,
        product: &str,
        days_ahead: u32,
    ) -> Result<Vec<DailyRisk>, DataUnavailable> {
        let mut days = self.predict_future_risks(lat, lon, crop, days_ahead)?;
        match product.parse::<Product>() {
            Ok(product) => {
                let factors = impact_factors(product);
                for day in &mut days {
                    apply_impact(day, &factors);
                }
            }
            Err(_) => tracing::debug!(product, "unknown product, no impact applied"),
        }
        Ok(days)
    }

    /// Score a raw series.
    ///
    /// Every dated day appears. Heat needs the max temperature, frost the min
    /// temperature, drought all four of precipitation, evapotranspiration,
    /// soil moisture and average temperature; a missing input scores 0 on
    /// its axis and reports 0 for its raw value.
    pub fn project(crop: &str, series: &[RawMeasurement]) -> Vec<DailyRisk> {
        group_by_date(series)
            .into_iter()
            .map(|(date, day)| {
                let heat_stress = day
                    .get(Measure::TempMax)
                    .map_or(0.0, |tmax| calculate_heat_stress(crop, tmax));
                let frost_stress = day
                    .get(Measure::TempMin)
                    .map_or(0.0, |tmin| calculate_frost_stress(crop, tmin));

                let drought = match (
                    day.get(Measure::Precipitation),
                    day.get(Measure::Evapotranspiration),
                    day.get(Measure::SoilMoisture),
                    day.get(Measure::TempAvg),
                ) {
                    (Some(p), Some(e), Some(sm), Some(t)) => {
                        let d = calculate_drought_risk(p, e, sm, t);
                        (d.risk_score, d.drought_index)
                    }
                    _ => (0.0, 0.0),
                };

                DailyRisk {
                    date,
                    heat_stress,
                    frost_stress,
                    drought_stress: drought.0,
                    drought_index: drought.1,
                    tmax: day.value_or_zero(Measure::TempMax),
                    tmin: day.value_or_zero(Measure::TempMin),
                    precipitation: day.value_or_zero(Measure::Precipitation),
                    soil_moisture: day.value_or_zero(Measure::SoilMoisture),
                    product_impact: None,
                }
            })
            .collect()
    }
}
