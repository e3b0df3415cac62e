//! Recommendation and feedback records.

use std::collections::BTreeMap;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use super::{Context, ContextFactor, ContextType, Product};

/// A recommendation about to be persisted.
#[derive(Debug, Clone, PartialEq)]
pub struct NewRecommendation {
    pub field_id: i64,
    pub date: NaiveDate,
    pub context: Context,
    pub product: Product,
    pub confidence: f64,
}

/// A persisted recommendation. Immutable once written.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recommendation {
    pub id: i64,
    pub field_id: i64,
    pub date: NaiveDate,
    pub context: Context,
    pub product: Product,
    pub confidence: f64,
    pub created_at: DateTime<Utc>,
}

/// A farmer's rating of a recommendation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Feedback {
    pub id: i64,
    pub recommendation_id: i64,
    pub rating: i64,
    pub notes: String,
    pub timestamp: DateTime<Utc>,
}

/// What a recorded feedback resolves to: the snapshot context and product of
/// the rated recommendation.
#[derive(Debug, Clone, PartialEq)]
pub struct FeedbackResolution {
    pub feedback_id: i64,
    pub recommendation_id: i64,
    pub context: Context,
    pub product: Product,
    pub rating: i64,
}

/// Result of one belief update.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FeedbackUpdate {
    pub updated_context: ContextType,
    pub new_alpha: f64,
    pub new_beta: f64,
}

/// Output of `recommend`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecommendationResult {
    /// Present only when the recommendation was persisted.
    pub recommendation_id: Option<i64>,
    pub product: Product,
    pub confidence: f64,
    pub primary_factor: ContextFactor,
    pub is_exploration: bool,
    pub expected_improvements: BTreeMap<Product, f64>,
    pub timestamp: DateTime<Utc>,
}
