//! Shared constants for the Fieldsense engine.

/// Fieldsense version string.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Default probability of entering exploration mode per recommendation.
pub const DEFAULT_EXPLORATION_RATE: f64 = 0.1;

/// Default forecast horizon in days.
pub const DEFAULT_DAYS_AHEAD: u32 = 7;

/// Default SQLite database file.
pub const DEFAULT_DATABASE_PATH: &str = "agri_recommendations.db";

/// Default number of read connections.
pub const DEFAULT_READ_POOL_SIZE: usize = 4;

/// Upper bound on read connections.
pub const MAX_READ_POOL_SIZE: usize = 8;

/// Default number of history entries returned.
pub const DEFAULT_HISTORY_LIMIT: usize = 10;

// ---- Confidence ----

/// Minimum confidence reported for any recommendation (percent).
pub const CONFIDENCE_FLOOR: f64 = 10.0;

/// Maximum confidence added on top of the floor (percent).
pub const CONFIDENCE_SPAN: f64 = 90.0;

/// Evidence mass (alpha + beta) at which confidence saturates.
pub const CONFIDENCE_SATURATION: f64 = 30.0;

// ---- Risk scale ----

/// Upper bound of every stress score.
pub const MAX_RISK_SCORE: f64 = 9.0;

/// Drought score assigned when the drought index sits exactly at 1.
pub const MEDIUM_DROUGHT_SCORE: f64 = 5.0;

// ---- Feedback ----

/// Ratings at or above this count as a clear success.
pub const SUCCESS_RATING: i64 = 7;

/// Ratings at or below this count as a clear failure.
pub const FAILURE_RATING: i64 = 3;

/// Valid rating range.
pub const MIN_RATING: i64 = 1;
pub const MAX_RATING: i64 = 10;
