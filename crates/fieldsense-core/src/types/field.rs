//! Farmers, fields, and recommendation history.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use super::{Context, Product};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Farmer {
    pub id: i64,
    pub name: String,
    pub location: String,
    pub created_at: DateTime<Utc>,
}

/// A field to register.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewField {
    pub farmer_id: i64,
    pub name: String,
    pub latitude: f64,
    pub longitude: f64,
    pub crop_type: String,
    pub size_hectares: f64,
    pub soil_quality: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Field {
    pub id: i64,
    pub farmer_id: i64,
    pub name: String,
    pub latitude: f64,
    pub longitude: f64,
    pub crop_type: String,
    pub size_hectares: f64,
    pub soil_quality: i64,
    pub created_at: DateTime<Utc>,
}

/// One row of a field's recommendation history, with its rating if any.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub id: i64,
    pub field_id: i64,
    pub date: NaiveDate,
    pub context: Context,
    pub product: Product,
    pub confidence: f64,
    pub created_at: DateTime<Utc>,
    pub rating: Option<i64>,
}
