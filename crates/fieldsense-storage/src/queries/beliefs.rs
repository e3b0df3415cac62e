//! Queries for the model_parameters table.

use fieldsense_core::errors::StorageError;
use fieldsense_core::types::{BeliefParameter, ContextType, Product};
use rusqlite::{params, Connection};

use super::{from_epoch, now_epoch};

/// A model_parameters row with its keys still as stored text.
#[derive(Debug, Clone)]
pub struct BeliefRow {
    pub context_type: String,
    pub product: String,
    pub alpha: f64,
    pub beta: f64,
    pub updated_at: i64,
}

impl BeliefRow {
    /// Resolve the text keys. Rows naming an unknown context or product
    /// return `None`.
    pub fn typed(&self) -> Option<(ContextType, Product, BeliefParameter)> {
        let context = self.context_type.parse::<ContextType>().ok()?;
        let product = self.product.parse::<Product>().ok()?;
        Some((
            context,
            product,
            BeliefParameter {
                alpha: self.alpha,
                beta: self.beta,
                updated_at: from_epoch(self.updated_at),
            },
        ))
    }
}

/// Load every row.
pub fn load_all(conn: &Connection) -> Result<Vec<BeliefRow>, StorageError> {
    let mut stmt = conn
        .prepare_cached(
            "SELECT context_type, product, alpha, beta, updated_at
             FROM model_parameters ORDER BY id",
        )
        .map_err(StorageError::sqlite)?;

    let rows = stmt
        .query_map([], |row| {
            Ok(BeliefRow {
                context_type: row.get(0)?,
                product: row.get(1)?,
                alpha: row.get(2)?,
                beta: row.get(3)?,
                updated_at: row.get(4)?,
            })
        })
        .map_err(StorageError::sqlite)?;

    rows.collect::<Result<Vec<_>, _>>()
        .map_err(StorageError::sqlite)
}

/// Overwrite one cell (insert if missing).
pub fn upsert(
    conn: &Connection,
    context: ContextType,
    product: Product,
    alpha: f64,
    beta: f64,
) -> Result<(), StorageError> {
    conn.execute(
        "INSERT INTO model_parameters (context_type, product, alpha, beta, updated_at)
         VALUES (?1, ?2, ?3, ?4, ?5)
         ON CONFLICT(context_type, product)
         DO UPDATE SET alpha = excluded.alpha, beta = excluded.beta, updated_at = excluded.updated_at",
        params![context.as_str(), product.as_str(), alpha, beta, now_epoch()],
    )
    .map_err(StorageError::sqlite)?;
    Ok(())
}

/// Add deltas to one cell in a single statement and return the new values.
///
/// A missing cell is created as `(prior_alpha + alpha_delta, prior_beta + beta_delta)`.
#[allow(clippy::too_many_arguments)]
pub fn increment(
    conn: &Connection,
    context: ContextType,
    product: Product,
    prior_alpha: f64,
    prior_beta: f64,
    alpha_delta: f64,
    beta_delta: f64,
) -> Result<BeliefParameter, StorageError> {
    conn.query_row(
        "INSERT INTO model_parameters (context_type, product, alpha, beta, updated_at)
         VALUES (?1, ?2, ?3 + ?5, ?4 + ?6, ?7)
         ON CONFLICT(context_type, product)
         DO UPDATE SET alpha = alpha + ?5, beta = beta + ?6, updated_at = ?7
         RETURNING alpha, beta, updated_at",
        params![
            context.as_str(),
            product.as_str(),
            prior_alpha,
            prior_beta,
            alpha_delta,
            beta_delta,
            now_epoch()
        ],
        |row| {
            Ok(BeliefParameter {
                alpha: row.get(0)?,
                beta: row.get(1)?,
                updated_at: from_epoch(row.get(2)?),
            })
        },
    )
    .map_err(StorageError::sqlite)
}

/// Count rows.
pub fn count(conn: &Connection) -> Result<i64, StorageError> {
    conn.query_row("SELECT COUNT(*) FROM model_parameters", [], |row| row.get(0))
        .map_err(StorageError::sqlite)
}
