//! Collaborator traits at the seams of the core.

pub mod belief_store;
pub mod risk_signals;

pub use belief_store::{BeliefStore, InMemoryBeliefStore};
pub use risk_signals::{RiskSignals, WeatherSource};
