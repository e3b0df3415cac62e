//! `RiskSignals` over a `WeatherSource`.

use chrono::NaiveDate;
use fieldsense_core::errors::DataUnavailable;
use fieldsense_core::traits::{RiskSignals, WeatherSource};
use fieldsense_core::types::{FieldRisks, RawMeasurement};

use super::measures::{DayMeasurements, Measure};
use super::scoring::{calculate_drought_risk, calculate_frost_stress, calculate_heat_stress};

/// Scores a field's current risks from raw measurements.
pub struct RiskCalculator<W> {
    source: W,
}

impl<W: WeatherSource> RiskCalculator<W> {
    pub fn new(source: W) -> Self {
        Self { source }
    }

    pub fn source(&self) -> &W {
        &self.source
    }

    /// Score one day's measurements. All six measures must be present.
    pub fn score(
        date: NaiveDate,
        crop: &str,
        measurements: &[RawMeasurement],
    ) -> Result<FieldRisks, DataUnavailable> {
        let mut day = DayMeasurements::default();
        day.extend(measurements);

        let missing = day.missing();
        if !missing.is_empty() {
            let missing = missing
                .iter()
                .map(Measure::to_string)
                .collect::<Vec<_>>()
                .join(", ");
            return Err(DataUnavailable::Incomplete { missing });
        }

        let tmax = day.value_or_zero(Measure::TempMax);
        let tmin = day.value_or_zero(Measure::TempMin);
        let precipitation = day.value_or_zero(Measure::Precipitation);
        let soil_moisture = day.value_or_zero(Measure::SoilMoisture);
        let drought = calculate_drought_risk(
            precipitation,
            day.value_or_zero(Measure::Evapotranspiration),
            soil_moisture,
            day.value_or_zero(Measure::TempAvg),
        );

        Ok(FieldRisks {
            heat_stress: calculate_heat_stress(crop, tmax),
            frost_stress: calculate_frost_stress(crop, tmin),
            drought_stress: drought.risk_score,
            drought_index: drought.drought_index,
            temperature_max: tmax,
            temperature_min: tmin,
            precipitation,
            soil_moisture,
            date,
        })
    }
}

impl<W: WeatherSource> RiskSignals for RiskCalculator<W> {
    fn field_risks(
        &self,
        date: NaiveDate,
        crop: &str,
        lat: f64,
        lon: f64,
    ) -> Result<FieldRisks, DataUnavailable> {
        let measurements = self.source.daily(date, lat, lon).inspect_err(|e| {
            tracing::warn!(%date, lat, lon, error = %e, "weather data unavailable");
        })?;
        Self::score(date, crop, &measurements)
    }

    fn forecast_series(
        &self,
        lat: f64,
        lon: f64,
        days_ahead: u32,
    ) -> Result<Vec<RawMeasurement>, DataUnavailable> {
        self.source.forecast(lat, lon, days_ahead).inspect_err(|e| {
            tracing::warn!(lat, lon, days_ahead, error = %e, "forecast data unavailable");
        })
    }
}
