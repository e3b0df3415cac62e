//! Queries for the recommendations table.

use fieldsense_core::errors::StorageError;
use fieldsense_core::types::{Context, HistoryEntry, NewRecommendation, Product, Recommendation};
use rusqlite::{params, Connection, OptionalExtension};

use super::{format_date, from_epoch, now_epoch, parse_date};

/// Raw row before the context JSON and product name are decoded.
struct RecommendationRow {
    id: i64,
    field_id: i64,
    date: String,
    context: String,
    product: String,
    confidence: f64,
    created_at: i64,
}

impl RecommendationRow {
    fn decode(self) -> Result<Recommendation, StorageError> {
        Ok(Recommendation {
            id: self.id,
            field_id: self.field_id,
            date: parse_date(&self.date)?,
            context: decode_context(&self.context)?,
            product: decode_product(&self.product)?,
            confidence: self.confidence,
            created_at: from_epoch(self.created_at),
        })
    }
}

pub(crate) fn decode_context(json: &str) -> Result<Context, StorageError> {
    serde_json::from_str(json).map_err(|e| StorageError::Serialization {
        message: format!("invalid context snapshot: {e}"),
    })
}

pub(crate) fn decode_product(name: &str) -> Result<Product, StorageError> {
    name.parse::<Product>()
        .map_err(|e| StorageError::Serialization { message: e })
}

/// Insert a recommendation. Returns its row id.
pub fn insert(conn: &Connection, rec: &NewRecommendation) -> Result<i64, StorageError> {
    let context = serde_json::to_string(&rec.context).map_err(|e| StorageError::Serialization {
        message: e.to_string(),
    })?;
    conn.execute(
        "INSERT INTO recommendations
            (field_id, date, context, recommended_product, confidence, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        params![
            rec.field_id,
            format_date(rec.date),
            context,
            rec.product.as_str(),
            rec.confidence,
            now_epoch()
        ],
    )
    .map_err(StorageError::sqlite)?;
    Ok(conn.last_insert_rowid())
}

/// Fetch one recommendation by id.
pub fn get(conn: &Connection, id: i64) -> Result<Option<Recommendation>, StorageError> {
    let row = conn
        .query_row(
            "SELECT id, field_id, date, context, recommended_product, confidence, created_at
             FROM recommendations WHERE id = ?1",
            params![id],
            |row| {
                Ok(RecommendationRow {
                    id: row.get(0)?,
                    field_id: row.get(1)?,
                    date: row.get(2)?,
                    context: row.get(3)?,
                    product: row.get(4)?,
                    confidence: row.get(5)?,
                    created_at: row.get(6)?,
                })
            },
        )
        .optional()
        .map_err(StorageError::sqlite)?;

    row.map(RecommendationRow::decode).transpose()
}

/// Most recent recommendations for a field, newest first, each with the
/// rating of its latest feedback if any.
pub fn query_history(
    conn: &Connection,
    field_id: i64,
    limit: usize,
) -> Result<Vec<HistoryEntry>, StorageError> {
    let mut stmt = conn
        .prepare_cached(
            "SELECT r.id, r.field_id, r.date, r.context, r.recommended_product,
                    r.confidence, r.created_at,
                    (SELECT f.rating FROM feedback f
                     WHERE f.recommendation_id = r.id
                     ORDER BY f.id DESC LIMIT 1) AS rating
             FROM recommendations r
             WHERE r.field_id = ?1
             ORDER BY r.created_at DESC, r.id DESC
             LIMIT ?2",
        )
        .map_err(StorageError::sqlite)?;

    let rows = stmt
        .query_map(params![field_id, limit as i64], |row| {
            Ok((
                RecommendationRow {
                    id: row.get(0)?,
                    field_id: row.get(1)?,
                    date: row.get(2)?,
                    context: row.get(3)?,
                    product: row.get(4)?,
                    confidence: row.get(5)?,
                    created_at: row.get(6)?,
                },
                row.get::<_, Option<i64>>(7)?,
            ))
        })
        .map_err(StorageError::sqlite)?;

    let mut entries = Vec::new();
    for row in rows {
        let (raw, rating) = row.map_err(StorageError::sqlite)?;
        let rec = raw.decode()?;
        entries.push(HistoryEntry {
            id: rec.id,
            field_id: rec.field_id,
            date: rec.date,
            context: rec.context,
            product: rec.product,
            confidence: rec.confidence,
            created_at: rec.created_at,
            rating,
        });
    }
    Ok(entries)
}
