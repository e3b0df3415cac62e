//! Thompson-sampling bandit over (context type, product) Beta beliefs.
//!
//! One belief cell per (context, product). Exploitation samples the cells of
//! the primary context; exploration draws a product weighted by its mean
//! success rate across all contexts. Feedback ratings move exactly one cell.

pub mod beta;
pub mod feedback;
pub mod primary;
pub mod recommender;

pub use beta::{confidence, posterior_mean, sample_beta};
pub use feedback::rating_to_delta;
pub use primary::{determine_primary_context, primary_factor};
pub use recommender::BanditRecommender;
