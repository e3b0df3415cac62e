//! Field-level use cases over the Fieldsense engine.
//!
//! `AdvisorRuntime` is built explicitly and passed around; there is no
//! process-wide instance.

pub mod responses;
pub mod runtime;

pub use responses::{FieldImprovements, FieldRecommendation};
pub use runtime::{AdvisorRuntime, RuntimeOptions};
