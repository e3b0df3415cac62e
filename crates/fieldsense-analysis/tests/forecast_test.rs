//! ForecastProjector over fixture risk signals.

use std::sync::Arc;

use chrono::NaiveDate;
use fieldsense_analysis::{ForecastProjector, RiskCalculator};
use fieldsense_core::errors::DataUnavailable;
use fieldsense_core::traits::{RiskSignals, WeatherSource};
use fieldsense_core::types::RawMeasurement;

/// Serves the same series for every request.
struct SeriesSource(Result<Vec<RawMeasurement>, DataUnavailable>);

impl WeatherSource for SeriesSource {
    fn daily(&self, _: NaiveDate, _: f64, _: f64) -> Result<Vec<RawMeasurement>, DataUnavailable> {
        self.0.clone()
    }

    fn forecast(&self, _: f64, _: f64, _: u32) -> Result<Vec<RawMeasurement>, DataUnavailable> {
        self.0.clone()
    }
}

fn projector(series: Result<Vec<RawMeasurement>, DataUnavailable>) -> ForecastProjector {
    let signals: Arc<dyn RiskSignals> = Arc::new(RiskCalculator::new(SeriesSource(series)));
    ForecastProjector::new(signals)
}

fn day(date: &str, tmax: f64, tmin: f64, precip: f64, sm: f64, et: f64, tavg: f64) -> Vec<RawMeasurement> {
    let ts = format!("{date}T00:00:00Z");
    vec![
        RawMeasurement::new(&ts, "TempAir_DailyMax (C)", tmax),
        RawMeasurement::new(&ts, "TempAir_DailyMin (C)", tmin),
        RawMeasurement::new(&ts, "Precip_DailySum (mm)", precip),
        RawMeasurement::new(&ts, "Soilmoisture_0to10cm_DailyAvg (vol%)", sm),
        RawMeasurement::new(&ts, "Referenceevapotranspiration_DailySum (mm)", et),
        RawMeasurement::new(&ts, "TempAir_DailyAvg (C)", tavg),
    ]
}

fn date(s: &str) -> NaiveDate {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
}

#[test]
fn test_days_come_out_in_ascending_order() {
    let mut series = day("2024-07-03", 30.0, 15.0, 5.0, 20.0, 3.0, 10.0);
    series.extend(day("2024-07-01", 38.5, 0.0, 1.0, 5.0, 1.0, 10.0));
    series.extend(day("2024-07-02", 45.0, 4.0, 5.0, 20.0, 3.0, 10.0));

    let risks = projector(Ok(series))
        .predict_future_risks(-23.5, -46.6, "soybean", 3)
        .unwrap();
    let dates: Vec<_> = risks.iter().map(|r| r.date).collect();
    assert_eq!(dates, [date("2024-07-01"), date("2024-07-02"), date("2024-07-03")]);

    assert_eq!(risks[0].heat_stress, 4.5);
    assert_eq!(risks[0].frost_stress, 5.1);
    assert_eq!(risks[0].drought_stress, 4.5);
    assert_eq!(risks[0].drought_index, 0.5);
    assert_eq!(risks[1].heat_stress, 9.0);
    assert_eq!(risks[1].frost_stress, 0.0);
    assert_eq!(risks[2].drought_stress, 0.0);
    assert_eq!(risks[2].drought_index, 4.0);
    assert!(risks.iter().all(|r| r.product_impact.is_none()));
}

#[test]
fn test_incomplete_days_still_appear_with_zeroes() {
    let ts = "2024-07-05T00:00:00";
    let series = vec![
        RawMeasurement::new(ts, "TempAir_DailyMax (C)", 40.0),
        RawMeasurement::new(ts, "Precip_DailySum (mm)", 0.0),
        RawMeasurement::new("2024-07-06T00:00:00", "TempAir_DailyMin (C)", -3.0),
    ];
    let risks = projector(Ok(series))
        .predict_future_risks(0.0, 0.0, "corn", 2)
        .unwrap();
    assert_eq!(risks.len(), 2);

    // 9 * 7 / 11 = 5.727..
    assert_eq!(risks[0].heat_stress, 5.7);
    assert_eq!(risks[0].frost_stress, 0.0);
    assert_eq!(risks[0].drought_stress, 0.0);
    assert_eq!(risks[0].drought_index, 0.0);
    assert_eq!(risks[0].tmin, 0.0);
    assert_eq!(risks[0].soil_moisture, 0.0);

    assert_eq!(risks[1].heat_stress, 0.0);
    assert_eq!(risks[1].frost_stress, 9.0);
    assert_eq!(risks[1].tmax, 0.0);
}

#[test]
fn test_upstream_failure_passes_through() {
    let failure = DataUnavailable::FetchFailed {
        message: "timeout".to_string(),
    };
    let p = projector(Err(failure.clone()));
    assert_eq!(p.predict_future_risks(0.0, 0.0, "soybean", 7).unwrap_err(), failure);
    assert_eq!(
        p.predict_with_biologicals_impact(0.0, 0.0, "soybean", "StressBuster", 7)
            .unwrap_err(),
        failure
    );
}

#[test]
fn test_product_impact_reduces_each_axis() {
    let series = day("2024-07-01", 38.5, 0.0, 1.0, 5.0, 1.0, 10.0);
    let risks = projector(Ok(series))
        .predict_with_biologicals_impact(0.0, 0.0, "soybean", "StressBuster", 1)
        .unwrap();
    let impact = risks[0].product_impact.unwrap();

    assert!((impact.heat_stress_reduction - 4.5 * 0.30).abs() < 1e-9);
    assert!((impact.heat_stress_with_product - 4.5 * 0.70).abs() < 1e-9);
    assert!((impact.frost_stress_reduction - 5.1 * 0.25).abs() < 1e-9);
    assert!((impact.drought_stress_with_product - 4.5 * 0.65).abs() < 1e-9);
    // Base scores are untouched.
    assert_eq!(risks[0].heat_stress, 4.5);
}

#[test]
fn test_unknown_product_is_pass_through() {
    let series = day("2024-07-01", 38.5, 0.0, 1.0, 5.0, 1.0, 10.0);
    let p = projector(Ok(series));
    let plain = p.predict_future_risks(0.0, 0.0, "soybean", 1).unwrap();
    let with_unknown = p
        .predict_with_biologicals_impact(0.0, 0.0, "soybean", "MiracleGrow", 1)
        .unwrap();
    assert_eq!(plain, with_unknown);
}

#[test]
fn test_impact_fields_flatten_into_the_day() {
    let series = day("2024-07-01", 38.5, 0.0, 1.0, 5.0, 1.0, 10.0);
    let p = projector(Ok(series));

    let with = p
        .predict_with_biologicals_impact(0.0, 0.0, "soybean", "YieldBooster", 1)
        .unwrap();
    let json = serde_json::to_value(&with[0]).unwrap();
    assert_eq!(json["date"], "2024-07-01");
    assert!(json.get("heat_stress_with_product").is_some());
    assert!(json.get("drought_stress_reduction").is_some());
    assert!(json.get("product_impact").is_none());

    let without = p.predict_future_risks(0.0, 0.0, "soybean", 1).unwrap();
    let json = serde_json::to_value(&without[0]).unwrap();
    assert!(json.get("heat_stress_with_product").is_none());
}

#[test]
fn test_unknown_crop_projects_zero_temperature_stress() {
    let series = day("2024-07-01", 50.0, -10.0, 1.0, 5.0, 1.0, 10.0);
    let risks = projector(Ok(series))
        .predict_future_risks(0.0, 0.0, "sorghum", 1)
        .unwrap();
    assert_eq!(risks[0].heat_stress, 0.0);
    assert_eq!(risks[0].frost_stress, 0.0);
    assert_eq!(risks[0].drought_stress, 4.5);
}
