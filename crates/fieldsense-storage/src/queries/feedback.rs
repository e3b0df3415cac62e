//! Queries for the feedback table.

use fieldsense_core::errors::StorageError;
use fieldsense_core::types::{Feedback, FeedbackResolution};
use rusqlite::{params, Connection, OptionalExtension};

use super::recommendations::{decode_context, decode_product};
use super::{from_epoch, now_epoch};

/// Insert a feedback row (not yet applied). Returns its id.
pub fn insert(
    conn: &Connection,
    recommendation_id: i64,
    rating: i64,
    notes: &str,
) -> Result<i64, StorageError> {
    conn.execute(
        "INSERT INTO feedback (recommendation_id, rating, notes, timestamp, applied)
         VALUES (?1, ?2, ?3, ?4, 0)",
        params![recommendation_id, rating, notes, now_epoch()],
    )
    .map_err(StorageError::sqlite)?;
    Ok(conn.last_insert_rowid())
}

/// Flip `applied` from 0 to 1. Returns false if the row was already applied
/// or does not exist.
pub fn mark_applied(conn: &Connection, feedback_id: i64) -> Result<bool, StorageError> {
    let changed = conn
        .execute(
            "UPDATE feedback SET applied = 1 WHERE id = ?1 AND applied = 0",
            params![feedback_id],
        )
        .map_err(StorageError::sqlite)?;
    Ok(changed == 1)
}

/// Whether the feedback row exists and has been applied.
pub fn is_applied(conn: &Connection, feedback_id: i64) -> Result<Option<bool>, StorageError> {
    conn.query_row(
        "SELECT applied FROM feedback WHERE id = ?1",
        params![feedback_id],
        |row| row.get::<_, i64>(0),
    )
    .optional()
    .map(|v| v.map(|applied| applied != 0))
    .map_err(StorageError::sqlite)
}

/// Recorded feedback not yet folded into the beliefs, oldest first, joined
/// with the snapshot of the recommendation it rates.
pub fn pending(conn: &Connection) -> Result<Vec<FeedbackResolution>, StorageError> {
    let mut stmt = conn
        .prepare_cached(
            "SELECT f.id, f.recommendation_id, f.rating, r.context, r.recommended_product
             FROM feedback f
             JOIN recommendations r ON r.id = f.recommendation_id
             WHERE f.applied = 0
             ORDER BY f.id",
        )
        .map_err(StorageError::sqlite)?;

    let rows = stmt
        .query_map([], |row| {
            Ok((
                row.get::<_, i64>(0)?,
                row.get::<_, i64>(1)?,
                row.get::<_, i64>(2)?,
                row.get::<_, String>(3)?,
                row.get::<_, String>(4)?,
            ))
        })
        .map_err(StorageError::sqlite)?;

    let mut pending = Vec::new();
    for row in rows {
        let (feedback_id, recommendation_id, rating, context, product) =
            row.map_err(StorageError::sqlite)?;
        pending.push(FeedbackResolution {
            feedback_id,
            recommendation_id,
            context: decode_context(&context)?,
            product: decode_product(&product)?,
            rating,
        });
    }
    Ok(pending)
}

/// All feedback for one recommendation, oldest first.
pub fn for_recommendation(
    conn: &Connection,
    recommendation_id: i64,
) -> Result<Vec<Feedback>, StorageError> {
    let mut stmt = conn
        .prepare_cached(
            "SELECT id, recommendation_id, rating, notes, timestamp
             FROM feedback WHERE recommendation_id = ?1 ORDER BY id",
        )
        .map_err(StorageError::sqlite)?;

    let rows = stmt
        .query_map(params![recommendation_id], |row| {
            Ok(Feedback {
                id: row.get(0)?,
                recommendation_id: row.get(1)?,
                rating: row.get(2)?,
                notes: row.get(3)?,
                timestamp: from_epoch(row.get(4)?),
            })
        })
        .map_err(StorageError::sqlite)?;

    rows.collect::<Result<Vec<_>, _>>()
        .map_err(StorageError::sqlite)
}

/// Count all feedback rows.
pub fn count(conn: &Connection) -> Result<i64, StorageError> {
    conn.query_row("SELECT COUNT(*) FROM feedback", [], |row| row.get(0))
        .map_err(StorageError::sqlite)
}
