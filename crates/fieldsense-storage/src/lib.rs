//! SQLite persistence for Fieldsense.
//!
//! `DatabaseManager` owns the connections; `SqliteBeliefStore` implements the
//! core `BeliefStore` trait on top of it. Query modules are plain functions
//! over a `&Connection` so they compose inside transactions.

pub mod connection;
pub mod migrations;
pub mod queries;
pub mod store;

pub use connection::DatabaseManager;
pub use store::SqliteBeliefStore;
