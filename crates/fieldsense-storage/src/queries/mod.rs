//! Query modules — plain functions over a `&Connection`.

pub mod beliefs;
pub mod feedback;
pub mod fields;
pub mod recommendations;

use chrono::{DateTime, NaiveDate, Utc};
use fieldsense_core::errors::StorageError;

/// Epoch seconds → UTC timestamp. Out-of-range values collapse to the epoch.
pub(crate) fn from_epoch(secs: i64) -> DateTime<Utc> {
    DateTime::from_timestamp(secs, 0).unwrap_or_default()
}

/// Current time as epoch seconds.
pub(crate) fn now_epoch() -> i64 {
    Utc::now().timestamp()
}

pub(crate) fn parse_date(text: &str) -> Result<NaiveDate, StorageError> {
    NaiveDate::parse_from_str(text, "%Y-%m-%d").map_err(|e| StorageError::Serialization {
        message: format!("invalid date '{text}': {e}"),
    })
}

pub(crate) fn format_date(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}
