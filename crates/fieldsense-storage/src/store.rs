//! `BeliefStore` over SQLite.

use std::sync::Arc;

use fieldsense_core::errors::StorageError;
use fieldsense_core::traits::BeliefStore;
use fieldsense_core::types::belief::default_prior;
use fieldsense_core::types::{
    BeliefParameter, BeliefUpdate, ContextType, Farmer, Feedback, Field, FeedbackResolution, HistoryEntry,
    NewField, NewRecommendation, Product, Recommendation,
};

use crate::connection::writer::with_immediate_transaction;
use crate::connection::DatabaseManager;
use crate::queries::{beliefs, feedback, fields, recommendations};

/// SQLite-backed store. Cheap to clone; clones share the same database.
#[derive(Clone)]
pub struct SqliteBeliefStore {
    db: Arc<DatabaseManager>,
}

impl SqliteBeliefStore {
    pub fn new(db: Arc<DatabaseManager>) -> Self {
        Self { db }
    }

    pub fn database(&self) -> &Arc<DatabaseManager> {
        &self.db
    }

    pub fn get_recommendation(&self, id: i64) -> Result<Option<Recommendation>, StorageError> {
        self.db.with_reader(|conn| recommendations::get(conn, id))
    }

    /// Latest `limit` recommendations for a field, newest first.
    pub fn history(&self, field_id: i64, limit: usize) -> Result<Vec<HistoryEntry>, StorageError> {
        self.db
            .with_reader(|conn| recommendations::query_history(conn, field_id, limit))
    }

    pub fn add_farmer(&self, name: &str, location: &str) -> Result<i64, StorageError> {
        self.db
            .with_writer(|conn| fields::insert_farmer(conn, name, location))
    }

    pub fn get_farmer(&self, id: i64) -> Result<Option<Farmer>, StorageError> {
        self.db.with_reader(|conn| fields::get_farmer(conn, id))
    }

    pub fn add_field(&self, field: &NewField) -> Result<i64, StorageError> {
        self.db.with_writer(|conn| fields::insert_field(conn, field))
    }

    pub fn get_field(&self, id: i64) -> Result<Option<Field>, StorageError> {
        self.db.with_reader(|conn| fields::get_field(conn, id))
    }

    pub fn list_fields(&self, farmer_id: Option<i64>) -> Result<Vec<Field>, StorageError> {
        self.db.with_reader(|conn| fields::list_fields(conn, farmer_id))
    }

    pub fn field_count(&self) -> Result<i64, StorageError> {
        self.db.with_reader(fields::count_fields)
    }

    /// Every rating recorded for a recommendation, oldest first.
    pub fn feedback_for(&self, recommendation_id: i64) -> Result<Vec<Feedback>, StorageError> {
        self.db
            .with_reader(|conn| feedback::for_recommendation(conn, recommendation_id))
    }

    /// Whether a feedback row has been folded into the beliefs.
    pub fn feedback_applied(&self, feedback_id: i64) -> Result<Option<bool>, StorageError> {
        self.db.with_reader(|conn| feedback::is_applied(conn, feedback_id))
    }
}

impl BeliefStore for SqliteBeliefStore {
    fn load(&self) -> Result<Vec<(ContextType, Product, BeliefParameter)>, StorageError> {
        let rows = self.db.with_reader(beliefs::load_all)?;
        let mut cells = Vec::with_capacity(rows.len());
        for row in rows {
            match row.typed() {
                Some(cell) => cells.push(cell),
                None => tracing::warn!(
                    context_type = %row.context_type,
                    product = %row.product,
                    "skipping belief row with unknown key"
                ),
            }
        }
        Ok(cells)
    }

    fn save(
        &self,
        context: ContextType,
        product: Product,
        alpha: f64,
        beta: f64,
    ) -> Result<(), StorageError> {
        self.db
            .with_writer(|conn| beliefs::upsert(conn, context, product, alpha, beta))
    }

    fn apply_update(&self, update: &BeliefUpdate) -> Result<BeliefParameter, StorageError> {
        let (prior_alpha, prior_beta) = default_prior(update.context, update.product);
        self.db.with_writer(|conn| {
            with_immediate_transaction(conn, |tx| {
                if let Some(feedback_id) = update.feedback_id {
                    if !feedback::mark_applied(tx, feedback_id)? {
                        return Err(StorageError::FeedbackAlreadyApplied { feedback_id });
                    }
                }
                beliefs::increment(
                    tx,
                    update.context,
                    update.product,
                    prior_alpha,
                    prior_beta,
                    update.alpha_delta,
                    update.beta_delta,
                )
            })
        })
    }

    fn record_recommendation(&self, rec: &NewRecommendation) -> Result<i64, StorageError> {
        self.db.with_writer(|conn| recommendations::insert(conn, rec))
    }

    fn record_feedback(
        &self,
        recommendation_id: i64,
        rating: i64,
        notes: &str,
    ) -> Result<Option<FeedbackResolution>, StorageError> {
        self.db.with_writer(|conn| {
            with_immediate_transaction(conn, |tx| {
                let Some(rec) = recommendations::get(tx, recommendation_id)? else {
                    return Ok(None);
                };
                let feedback_id = feedback::insert(tx, recommendation_id, rating, notes)?;
                Ok(Some(FeedbackResolution {
                    feedback_id,
                    recommendation_id,
                    context: rec.context,
                    product: rec.product,
                    rating,
                }))
            })
        })
    }

    fn pending_feedback(&self) -> Result<Vec<FeedbackResolution>, StorageError> {
        self.db.with_reader(feedback::pending)
    }
}
