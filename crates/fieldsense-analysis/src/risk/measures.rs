//! Recognizing raw weather measurements and grouping them by day.

use std::collections::BTreeMap;
use std::fmt;

use chrono::NaiveDate;
use fieldsense_core::types::RawMeasurement;

/// The six daily measures risk scoring consumes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Measure {
    TempMax,
    TempMin,
    Precipitation,
    SoilMoisture,
    Evapotranspiration,
    TempAvg,
}

impl Measure {
    /// Match order when a label contains more than one marker.
    pub const ALL: [Measure; 6] = [
        Self::TempMax,
        Self::TempMin,
        Self::Precipitation,
        Self::SoilMoisture,
        Self::Evapotranspiration,
        Self::TempAvg,
    ];

    /// Substring identifying the measure in a provider label.
    pub fn marker(&self) -> &'static str {
        match self {
            Self::TempMax => "TempAir_DailyMax",
            Self::TempMin => "TempAir_DailyMin",
            Self::Precipitation => "Precip_DailySum",
            Self::SoilMoisture => "Soilmoisture",
            Self::Evapotranspiration => "Referenceevapotranspiration",
            Self::TempAvg => "TempAir_DailyAvg",
        }
    }

    /// Classify a provider label such as `TempAir_DailyMax (C)`.
    pub fn classify(measure_type: &str) -> Option<Measure> {
        Self::ALL
            .into_iter()
            .find(|m| measure_type.contains(m.marker()))
    }

    fn index(&self) -> usize {
        match self {
            Self::TempMax => 0,
            Self::TempMin => 1,
            Self::Precipitation => 2,
            Self::SoilMoisture => 3,
            Self::Evapotranspiration => 4,
            Self::TempAvg => 5,
        }
    }
}

impl fmt::Display for Measure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.marker())
    }
}

/// Measures seen for one day. Later values for the same measure win.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct DayMeasurements {
    values: [Option<f64>; 6],
}

impl DayMeasurements {
    pub fn record(&mut self, measure: Measure, value: f64) {
        self.values[measure.index()] = Some(value);
    }

    pub fn get(&self, measure: Measure) -> Option<f64> {
        self.values[measure.index()]
    }

    /// Value or 0 when absent.
    pub fn value_or_zero(&self, measure: Measure) -> f64 {
        self.get(measure).unwrap_or(0.0)
    }

    /// Measures not yet seen, in `Measure::ALL` order.
    pub fn missing(&self) -> Vec<Measure> {
        Measure::ALL
            .into_iter()
            .filter(|m| self.get(*m).is_none())
            .collect()
    }

    /// Fold a batch of measurements in, ignoring unrecognized labels.
    pub fn extend<'a>(&mut self, measurements: impl IntoIterator<Item = &'a RawMeasurement>) {
        for m in measurements {
            if let Some(measure) = Measure::classify(&m.measure_type) {
                self.record(measure, m.daily_value);
            }
        }
    }
}

/// Calendar date of a `valid_date` (the part before any `T`).
///
/// `None` for an empty or unparseable date.
pub fn measurement_date(valid_date: &str) -> Option<NaiveDate> {
    let day = valid_date.split('T').next().unwrap_or_default().trim();
    if day.is_empty() {
        return None;
    }
    NaiveDate::parse_from_str(day, "%Y-%m-%d").ok()
}

/// Group measurements by calendar date, ascending.
///
/// Entries with no usable date are dropped. A dated entry with an
/// unrecognized label still creates its day.
pub fn group_by_date(measurements: &[RawMeasurement]) -> BTreeMap<NaiveDate, DayMeasurements> {
    let mut days: BTreeMap<NaiveDate, DayMeasurements> = BTreeMap::new();
    for m in measurements {
        let Some(date) = measurement_date(&m.valid_date) else {
            tracing::debug!(valid_date = %m.valid_date, "skipping undated measurement");
            continue;
        };
        days.entry(date).or_default().extend(std::iter::once(m));
    }
    days
}
