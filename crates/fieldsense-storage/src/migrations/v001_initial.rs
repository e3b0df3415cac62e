//! V001: Initial schema.
//! farmers, fields, recommendations, feedback, model_parameters.

pub const MIGRATION_SQL: &str = r#"
CREATE TABLE IF NOT EXISTS farmers (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    name TEXT NOT NULL,
    location TEXT NOT NULL DEFAULT '',
    created_at INTEGER NOT NULL
) STRICT;

CREATE TABLE IF NOT EXISTS fields (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    farmer_id INTEGER NOT NULL REFERENCES farmers(id),
    name TEXT NOT NULL,
    latitude REAL NOT NULL,
    longitude REAL NOT NULL,
    crop_type TEXT NOT NULL,
    size_hectares REAL NOT NULL,
    soil_quality INTEGER NOT NULL,
    created_at INTEGER NOT NULL
) STRICT;

CREATE INDEX IF NOT EXISTS idx_fields_farmer ON fields(farmer_id);

-- Context is the JSON snapshot captured at recommendation time.
-- Feedback credits the belief row derived from this snapshot.
CREATE TABLE IF NOT EXISTS recommendations (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    field_id INTEGER NOT NULL,
    date TEXT NOT NULL,
    context TEXT NOT NULL,
    recommended_product TEXT NOT NULL,
    confidence REAL NOT NULL,
    created_at INTEGER NOT NULL
) STRICT;

CREATE INDEX IF NOT EXISTS idx_recommendations_field
    ON recommendations(field_id, created_at DESC);

-- applied flips 0 -> 1 exactly once, in the same transaction as the
-- belief increment it causes.
CREATE TABLE IF NOT EXISTS feedback (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    recommendation_id INTEGER NOT NULL REFERENCES recommendations(id),
    rating INTEGER NOT NULL CHECK (rating BETWEEN 1 AND 10),
    notes TEXT NOT NULL DEFAULT '',
    timestamp INTEGER NOT NULL,
    applied INTEGER NOT NULL DEFAULT 0
) STRICT;

CREATE INDEX IF NOT EXISTS idx_feedback_recommendation
    ON feedback(recommendation_id);

CREATE TABLE IF NOT EXISTS model_parameters (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    context_type TEXT NOT NULL,
    product TEXT NOT NULL,
    alpha REAL NOT NULL CHECK (alpha > 0),
    beta REAL NOT NULL CHECK (beta > 0),
    updated_at INTEGER NOT NULL,
    UNIQUE(context_type, product)
) STRICT;
"#;
