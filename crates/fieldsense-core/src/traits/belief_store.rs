//! BeliefStore — persistence seam for belief parameters and the records
//! that feed them.
//!
//! The SQLite implementation lives in `fieldsense-storage`. The in-memory
//! implementation below serves tests and store-less runs.

use std::sync::Mutex;

use chrono::Utc;

use crate::errors::StorageError;
use crate::types::belief::default_prior;
use crate::types::{
    BeliefParameter, BeliefTable, BeliefUpdate, ContextType, FeedbackResolution,
    NewRecommendation, Product,
};

/// Owner of belief parameters and recommendation/feedback records.
pub trait BeliefStore: Send + Sync {
    /// Load every stored belief. Cells the store has never seen are absent.
    fn load(&self) -> Result<Vec<(ContextType, Product, BeliefParameter)>, StorageError>;

    /// Overwrite one cell.
    fn save(
        &self,
        context: ContextType,
        product: Product,
        alpha: f64,
        beta: f64,
    ) -> Result<(), StorageError>;

    /// Atomically add the update's deltas to one cell and return the stored
    /// result. A cell never seen before starts from its default prior.
    ///
    /// When `feedback_id` is set, the feedback is marked applied in the same
    /// atomic step; applying it a second time fails with
    /// `StorageError::FeedbackAlreadyApplied` and leaves the cell unchanged.
    fn apply_update(&self, update: &BeliefUpdate) -> Result<BeliefParameter, StorageError>;

    /// Persist a recommendation and return its id.
    fn record_recommendation(&self, rec: &NewRecommendation) -> Result<i64, StorageError>;

    /// Persist a rating. Returns `None`, and stores nothing, when the
    /// recommendation does not exist.
    fn record_feedback(
        &self,
        recommendation_id: i64,
        rating: i64,
        notes: &str,
    ) -> Result<Option<FeedbackResolution>, StorageError>;

    /// Recorded feedback that has not been applied yet, oldest first.
    fn pending_feedback(&self) -> Result<Vec<FeedbackResolution>, StorageError>;
}

#[derive(Debug, Default)]
struct InMemoryState {
    beliefs: Vec<(ContextType, Product, BeliefParameter)>,
    recommendations: Vec<NewRecommendation>,
    feedback: Vec<(FeedbackResolution, bool)>,
}

impl InMemoryState {
    fn cell_mut(&mut self, context: ContextType, product: Product) -> Option<&mut BeliefParameter> {
        self.beliefs
            .iter_mut()
            .find(|(c, p, _)| *c == context && *p == product)
            .map(|(_, _, param)| param)
    }
}

/// In-memory store for tests and single-run usage.
#[derive(Debug, Default)]
pub struct InMemoryBeliefStore {
    state: Mutex<InMemoryState>,
}

impl InMemoryBeliefStore {
    /// An empty store (no beliefs, no records).
    pub fn new() -> Self {
        Self::default()
    }

    /// A store seeded with the given table.
    pub fn with_table(table: &BeliefTable) -> Self {
        let store = Self::new();
        if let Ok(mut state) = store.state.lock() {
            state.beliefs = table.iter().collect();
        }
        store
    }

    /// Number of recommendations recorded.
    pub fn recommendation_count(&self) -> usize {
        self.state.lock().map(|s| s.recommendations.len()).unwrap_or(0)
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, InMemoryState>, StorageError> {
        self.state.lock().map_err(|_| StorageError::SqliteError {
            message: "in-memory store lock poisoned".to_string(),
        })
    }
}

impl BeliefStore for InMemoryBeliefStore {
    fn load(&self) -> Result<Vec<(ContextType, Product, BeliefParameter)>, StorageError> {
        Ok(self.lock()?.beliefs.clone())
    }

    fn save(
        &self,
        context: ContextType,
        product: Product,
        alpha: f64,
        beta: f64,
    ) -> Result<(), StorageError> {
        let mut state = self.lock()?;
        let param = BeliefParameter::new(alpha, beta);
        match state.cell_mut(context, product) {
            Some(cell) => *cell = param,
            None => state.beliefs.push((context, product, param)),
        }
        Ok(())
    }

    fn apply_update(&self, update: &BeliefUpdate) -> Result<BeliefParameter, StorageError> {
        let mut state = self.lock()?;

        if let Some(feedback_id) = update.feedback_id {
            let entry = state
                .feedback
                .iter_mut()
                .find(|(res, _)| res.feedback_id == feedback_id)
                .ok_or_else(|| StorageError::SqliteError {
                    message: format!("feedback {feedback_id} does not exist"),
                })?;
            if entry.1 {
                return Err(StorageError::FeedbackAlreadyApplied { feedback_id });
            }
            entry.1 = true;
        }

        let (prior_alpha, prior_beta) = default_prior(update.context, update.product);
        if state.cell_mut(update.context, update.product).is_none() {
            state
                .beliefs
                .push((update.context, update.product, BeliefParameter::new(prior_alpha, prior_beta)));
        }
        let cell = state
            .cell_mut(update.context, update.product)
            .ok_or_else(|| StorageError::SqliteError {
                message: "belief cell vanished".to_string(),
            })?;
        cell.alpha += update.alpha_delta;
        cell.beta += update.beta_delta;
        cell.updated_at = Utc::now();
        Ok(*cell)
    }

    fn record_recommendation(&self, rec: &NewRecommendation) -> Result<i64, StorageError> {
        let mut state = self.lock()?;
        state.recommendations.push(rec.clone());
        Ok(state.recommendations.len() as i64)
    }

    fn record_feedback(
        &self,
        recommendation_id: i64,
        rating: i64,
        _notes: &str,
    ) -> Result<Option<FeedbackResolution>, StorageError> {
        let mut state = self.lock()?;
        let Some(rec) = usize::try_from(recommendation_id - 1)
            .ok()
            .and_then(|idx| state.recommendations.get(idx))
            .cloned()
        else {
            return Ok(None);
        };
        let resolution = FeedbackResolution {
            feedback_id: state.feedback.len() as i64 + 1,
            recommendation_id,
            context: rec.context,
            product: rec.product,
            rating,
        };
        state.feedback.push((resolution.clone(), false));
        Ok(Some(resolution))
    }

    fn pending_feedback(&self) -> Result<Vec<FeedbackResolution>, StorageError> {
        Ok(self
            .lock()?
            .feedback
            .iter()
            .filter(|(_, applied)| !applied)
            .map(|(res, _)| res.clone())
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;
    use crate::types::Context;

    fn new_rec() -> NewRecommendation {
        NewRecommendation {
            field_id: 1,
            date: NaiveDate::from_ymd_opt(2024, 6, 1).unwrap(),
            context: Context::new(6.0, 0.0, 1.0, 5),
            product: Product::StressBuster,
            confidence: 40.0,
        }
    }

    #[test]
    fn test_feedback_for_missing_recommendation_is_none() {
        let store = InMemoryBeliefStore::new();
        assert!(store.record_feedback(42, 8, "").unwrap().is_none());
        assert!(store.record_feedback(0, 8, "").unwrap().is_none());
    }

    #[test]
    fn test_feedback_applies_once() {
        let store = InMemoryBeliefStore::with_table(&BeliefTable::defaults());
        let rec_id = store.record_recommendation(&new_rec()).unwrap();
        let res = store.record_feedback(rec_id, 9, "great").unwrap().unwrap();
        assert_eq!(store.pending_feedback().unwrap(), vec![res.clone()]);
        let update = BeliefUpdate {
            context: ContextType::HeatStress,
            product: Product::StressBuster,
            alpha_delta: 1.0,
            beta_delta: 0.0,
            feedback_id: Some(res.feedback_id),
        };
        let param = store.apply_update(&update).unwrap();
        assert_eq!(param.alpha, 9.0);
        assert!(store.pending_feedback().unwrap().is_empty());
        let err = store.apply_update(&update).unwrap_err();
        assert!(matches!(err, StorageError::FeedbackAlreadyApplied { .. }));
    }

    #[test]
    fn test_update_on_empty_store_starts_from_prior() {
        let store = InMemoryBeliefStore::new();
        let param = store
            .apply_update(&BeliefUpdate {
                context: ContextType::SoilQualityLow,
                product: Product::NutrientBooster,
                alpha_delta: 0.0,
                beta_delta: 1.0,
                feedback_id: None,
            })
            .unwrap();
        assert_eq!((param.alpha, param.beta), (8.0, 3.0));
    }
}
