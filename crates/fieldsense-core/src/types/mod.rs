//! Domain types shared across the workspace.

pub mod belief;
pub mod context;
pub mod field;
pub mod product;
pub mod recommendation;
pub mod risk;

pub use belief::{BeliefParameter, BeliefTable, BeliefUpdate};
pub use context::{Context, ContextFactor, ContextType};
pub use field::{Farmer, Field, HistoryEntry, NewField};
pub use product::Product;
pub use recommendation::{
    Feedback, FeedbackResolution, FeedbackUpdate, NewRecommendation, Recommendation,
    RecommendationResult,
};
pub use risk::{
    DailyRisk, DroughtAssessment, DroughtLevel, FieldRisks, ProductImpact, RawMeasurement,
};
