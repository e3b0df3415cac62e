//! Core types, traits, errors, config, and tracing for Fieldsense.
//!
//! Every other crate in the workspace depends on this one. It carries no
//! algorithms and no I/O beyond config file loading.

pub mod config;
pub mod constants;
pub mod errors;
pub mod numeric;
pub mod tracing;
pub mod traits;
pub mod types;

pub use types::{
    BeliefParameter, BeliefTable, Context, ContextFactor, ContextType, Product,
};
