//! Use-case results.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use fieldsense_core::types::{FieldRisks, Product, RecommendationResult};
use serde::{Deserialize, Serialize};

/// A recommendation for a registered field with the risks behind it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldRecommendation {
    #[serde(flatten)]
    pub recommendation: RecommendationResult,
    pub risks: FieldRisks,
}

/// Expected improvement of every product for a field on a date.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldImprovements {
    pub field_id: i64,
    pub date: NaiveDate,
    pub risks: FieldRisks,
    pub potential_improvements: BTreeMap<Product, f64>,
}
