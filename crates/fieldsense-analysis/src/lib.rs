//! Algorithms for Fieldsense: the Thompson-sampling product recommender,
//! crop risk scoring, and multi-day risk projection.

pub mod bandit;
pub mod forecast;
pub mod risk;

pub use bandit::BanditRecommender;
pub use forecast::ForecastProjector;
pub use risk::RiskCalculator;
