//! BanditRecommender behavior: sampling modes, persistence, and feedback
//! updates against both the in-memory and SQLite stores.

use std::collections::HashMap;
use std::sync::Arc;
use std::thread;

use fieldsense_analysis::BanditRecommender;
use fieldsense_core::config::RecommenderConfig;
use fieldsense_core::errors::{RecommenderError, StorageError};
use fieldsense_core::traits::{BeliefStore, InMemoryBeliefStore};
use fieldsense_core::types::{
    BeliefParameter, BeliefTable, Context, ContextFactor, ContextType, Product,
};
use fieldsense_storage::{DatabaseManager, SqliteBeliefStore};
use proptest::prelude::*;
use rand::rngs::StdRng;
use rand::SeedableRng;

fn seeded_config(seed: u64) -> RecommenderConfig {
    RecommenderConfig {
        exploration_rate: Some(0.1),
        seed: Some(seed),
    }
}

fn sqlite_store() -> Arc<SqliteBeliefStore> {
    Arc::new(SqliteBeliefStore::new(Arc::new(
        DatabaseManager::open_in_memory().unwrap(),
    )))
}

fn heat_context() -> Context {
    Context::new(6.0, 0.0, 2.0, 3)
}

#[test]
fn test_exploration_follows_average_probability_weights() {
    let rec = BanditRecommender::new(None, &seeded_config(1));
    let mut rng = StdRng::seed_from_u64(42);
    let mut counts: HashMap<Product, usize> = HashMap::new();
    let draws = 10_000;
    for _ in 0..draws {
        let result = rec
            .recommend_with_rng(&heat_context(), None, 1.0, &mut rng)
            .unwrap();
        assert!(result.is_exploration);
        *counts.entry(result.product).or_default() += 1;
    }

    let weights = rec.exploration_weights().unwrap();
    for product in Product::ALL {
        let observed = counts.get(&product).copied().unwrap_or(0) as f64 / draws as f64;
        let expected = weights[product.index()];
        assert!(
            (observed - expected).abs() < 0.03,
            "{product}: observed {observed:.4}, expected {expected:.4}"
        );
    }
}

#[test]
fn test_zero_exploration_rate_always_exploits() {
    let rec = BanditRecommender::new(None, &seeded_config(3));
    let mut rng = StdRng::seed_from_u64(9);
    for _ in 0..200 {
        let result = rec
            .recommend_with_rng(&heat_context(), None, 0.0, &mut rng)
            .unwrap();
        assert!(!result.is_exploration);
    }
}

#[test]
fn test_exploitation_picks_the_dominant_arm() {
    let mut table = BeliefTable::defaults();
    table.set(ContextType::DroughtStress, Product::YieldBooster, BeliefParameter::new(500.0, 1.0));
    table.set(ContextType::DroughtStress, Product::StressBuster, BeliefParameter::new(1.0, 500.0));
    table.set(ContextType::DroughtStress, Product::NutrientBooster, BeliefParameter::new(1.0, 500.0));
    let store: Arc<dyn BeliefStore> = Arc::new(InMemoryBeliefStore::with_table(&table));
    let rec = BanditRecommender::new(Some(store), &seeded_config(5));

    let drought = Context::new(1.0, 0.0, 8.0, 2);
    let mut rng = StdRng::seed_from_u64(11);
    for _ in 0..100 {
        let result = rec.recommend_with_rng(&drought, None, 0.0, &mut rng).unwrap();
        assert_eq!(result.product, Product::YieldBooster);
        assert_eq!(result.primary_factor, ContextFactor::DroughtStress);
    }
}

#[test]
fn test_result_carries_confidence_and_improvements() {
    let rec = BanditRecommender::new(None, &seeded_config(8));
    let result = rec.recommend(&heat_context(), Some(1)).unwrap();
    // Without a store nothing is persisted.
    assert_eq!(result.recommendation_id, None);
    assert_eq!(result.primary_factor, ContextFactor::HeatStress);
    let param = rec.belief(ContextType::HeatStress, result.product).unwrap();
    let expected = ((10.0 + (param.alpha + param.beta) / 30.0 * 90.0) * 10.0).round() / 10.0;
    assert_eq!(result.confidence, expected);
    assert_eq!(result.expected_improvements.len(), 3);
    assert_eq!(
        result.expected_improvements,
        rec.get_product_improvements(&heat_context()).unwrap()
    );
}

#[test]
fn test_soil_quality_primary_reports_raw_factor() {
    let rec = BanditRecommender::new(None, &seeded_config(2));
    let ctx = Context::new(1.0, 1.0, 1.0, 7);
    let result = rec.recommend(&ctx, None).unwrap();
    assert_eq!(result.primary_factor, ContextFactor::SoilQuality);
    assert_eq!(result.expected_improvements[&Product::NutrientBooster], 12.0);
}

#[test]
fn test_recommendation_is_persisted_only_with_field_id() {
    let store = sqlite_store();
    let rec = BanditRecommender::new(
        Some(store.clone() as Arc<dyn BeliefStore>),
        &seeded_config(4),
    );

    let anonymous = rec.recommend(&heat_context(), None).unwrap();
    assert_eq!(anonymous.recommendation_id, None);

    let persisted = rec.recommend(&heat_context(), Some(12)).unwrap();
    let id = persisted.recommendation_id.unwrap();
    let stored = store.get_recommendation(id).unwrap().unwrap();
    assert_eq!(stored.field_id, 12);
    assert_eq!(stored.product, persisted.product);
    assert_eq!(stored.confidence, persisted.confidence);
    assert_eq!(stored.context, heat_context());
}

#[test]
fn test_in_memory_store_records_field_recommendations() {
    let store = Arc::new(InMemoryBeliefStore::new());
    let rec = BanditRecommender::new(
        Some(store.clone() as Arc<dyn BeliefStore>),
        &seeded_config(8),
    );
    rec.recommend(&heat_context(), None).unwrap();
    let result = rec.recommend(&heat_context(), Some(3)).unwrap();
    assert_eq!(result.recommendation_id, Some(1));
    assert_eq!(store.recommendation_count(), 1);
}

#[test]
fn test_improvements_are_stable_without_feedback() {
    let rec = BanditRecommender::new(None, &seeded_config(6));
    let ctx = Context::new(0.0, 4.0, 1.0, 2);
    let first = rec.get_product_improvements(&ctx).unwrap();
    let _ = rec.recommend(&ctx, None).unwrap();
    let second = rec.get_product_improvements(&ctx).unwrap();
    assert_eq!(first, second);
}

#[test]
fn test_feedback_rating_two_adds_one_failure() {
    let store = sqlite_store();
    let rec = BanditRecommender::new(Some(store.clone() as Arc<dyn BeliefStore>), &seeded_config(1));
    let update = rec
        .update_from_feedback(&heat_context(), Product::StressBuster, 2)
        .unwrap();
    assert_eq!(update.updated_context, ContextType::HeatStress);
    assert_eq!((update.new_alpha, update.new_beta), (8.0, 3.0));

    // Cache and store agree.
    let cached = rec.belief(ContextType::HeatStress, Product::StressBuster).unwrap();
    let stored = store
        .load()
        .unwrap()
        .into_iter()
        .find(|(c, p, _)| *c == ContextType::HeatStress && *p == Product::StressBuster)
        .unwrap()
        .2;
    assert_eq!((cached.alpha, cached.beta), (stored.alpha, stored.beta));
}

#[test]
fn test_feedback_rating_five_splits_evidence() {
    let rec = BanditRecommender::new(Some(sqlite_store() as Arc<dyn BeliefStore>), &seeded_config(1));
    let update = rec
        .update_from_feedback(&heat_context(), Product::StressBuster, 5)
        .unwrap();
    assert!((update.new_alpha - (8.0 + 1.0 / 3.0)).abs() < 1e-9);
    assert!((update.new_beta - (2.0 + 2.0 / 3.0)).abs() < 1e-9);
}

#[test]
fn test_repeated_submissions_each_count_once() {
    let rec = BanditRecommender::new(Some(sqlite_store() as Arc<dyn BeliefStore>), &seeded_config(1));
    let first = rec
        .update_from_feedback(&heat_context(), Product::StressBuster, 10)
        .unwrap();
    let second = rec
        .update_from_feedback(&heat_context(), Product::StressBuster, 10)
        .unwrap();
    assert_eq!(first.new_alpha, 9.0);
    assert_eq!(second.new_alpha, 10.0);
    assert_eq!(second.new_beta, 2.0);
}

#[test]
fn test_recorded_feedback_applies_at_most_once() {
    let store = sqlite_store();
    let rec = BanditRecommender::new(Some(store.clone() as Arc<dyn BeliefStore>), &seeded_config(7));
    let result = rec.recommend(&heat_context(), Some(1)).unwrap();
    let resolution = store
        .record_feedback(result.recommendation_id.unwrap(), 9, "worked")
        .unwrap()
        .unwrap();

    let update = rec.apply_feedback(&resolution).unwrap();
    let err = rec.apply_feedback(&resolution).unwrap_err();
    assert!(matches!(
        err,
        RecommenderError::Storage(StorageError::FeedbackAlreadyApplied { .. })
    ));
    let cached = rec.belief(ContextType::HeatStress, result.product).unwrap();
    assert_eq!(cached.alpha, update.new_alpha);
}

#[test]
fn test_feedback_credits_snapshot_context_not_current_one() {
    let store = sqlite_store();
    let rec = BanditRecommender::new(Some(store.clone() as Arc<dyn BeliefStore>), &seeded_config(7));
    let frost = Context::new(0.0, 7.0, 1.0, 2);
    let result = rec.recommend(&frost, Some(3)).unwrap();
    let resolution = store
        .record_feedback(result.recommendation_id.unwrap(), 1, "")
        .unwrap()
        .unwrap();

    let update = rec.apply_feedback(&resolution).unwrap();
    assert_eq!(update.updated_context, ContextType::FrostStress);
}

#[test]
fn test_concurrent_feedback_on_one_cell_loses_nothing() {
    let store = sqlite_store();
    let rec = Arc::new(BanditRecommender::new(
        Some(store.clone() as Arc<dyn BeliefStore>),
        &seeded_config(1),
    ));
    let threads: Vec<_> = (0..8)
        .map(|_| {
            let rec = Arc::clone(&rec);
            thread::spawn(move || {
                for _ in 0..20 {
                    rec.update_from_feedback(&heat_context(), Product::YieldBooster, 8)
                        .unwrap();
                }
            })
        })
        .collect();
    for t in threads {
        t.join().unwrap();
    }

    let cached = rec.belief(ContextType::HeatStress, Product::YieldBooster).unwrap();
    assert_eq!((cached.alpha, cached.beta), (163.0, 2.0));
    let reloaded = BanditRecommender::new(Some(store as Arc<dyn BeliefStore>), &seeded_config(1));
    assert_eq!(
        reloaded.belief(ContextType::HeatStress, Product::YieldBooster).unwrap().alpha,
        163.0
    );
}

#[test]
fn test_failing_store_falls_back_to_defaults() {
    struct BrokenStore;

    impl BeliefStore for BrokenStore {
        fn load(&self) -> Result<Vec<(ContextType, Product, BeliefParameter)>, StorageError> {
            Err(StorageError::SqliteError {
                message: "disk I/O error".to_string(),
            })
        }
        fn save(&self, _: ContextType, _: Product, _: f64, _: f64) -> Result<(), StorageError> {
            Ok(())
        }
        fn apply_update(
            &self,
            _: &fieldsense_core::types::BeliefUpdate,
        ) -> Result<BeliefParameter, StorageError> {
            Err(StorageError::SqliteError {
                message: "disk I/O error".to_string(),
            })
        }
        fn record_recommendation(
            &self,
            _: &fieldsense_core::types::NewRecommendation,
        ) -> Result<i64, StorageError> {
            Err(StorageError::SqliteError {
                message: "disk I/O error".to_string(),
            })
        }
        fn record_feedback(
            &self,
            _: i64,
            _: i64,
            _: &str,
        ) -> Result<Option<fieldsense_core::types::FeedbackResolution>, StorageError> {
            Ok(None)
        }
        fn pending_feedback(
            &self,
        ) -> Result<Vec<fieldsense_core::types::FeedbackResolution>, StorageError> {
            Ok(Vec::new())
        }
    }

    let rec = BanditRecommender::new(Some(Arc::new(BrokenStore)), &seeded_config(1));
    let defaults = BeliefTable::defaults();
    for (c, p, param) in rec.snapshot().unwrap().iter() {
        let prior = defaults.get(c, p);
        assert_eq!((param.alpha, param.beta), (prior.alpha, prior.beta));
    }
    assert_eq!(rec.belief(ContextType::HeatStress, Product::StressBuster).unwrap().alpha, 8.0);

    // The recommendation is still made, just not recorded.
    let result = rec.recommend(&heat_context(), Some(1)).unwrap();
    assert_eq!(result.recommendation_id, None);
    assert_eq!(result.primary_factor, ContextFactor::HeatStress);

    // A failed belief write leaves the cache as it was.
    assert!(rec
        .update_from_feedback(&heat_context(), Product::StressBuster, 9)
        .is_err());
    assert_eq!(rec.belief(ContextType::HeatStress, Product::StressBuster).unwrap().alpha, 8.0);
}

/// Delegates to an in-memory store but fails the first `apply_update`.
struct FlakyStore {
    inner: InMemoryBeliefStore,
    failures_left: std::sync::atomic::AtomicUsize,
}

impl BeliefStore for FlakyStore {
    fn load(&self) -> Result<Vec<(ContextType, Product, BeliefParameter)>, StorageError> {
        self.inner.load()
    }
    fn save(&self, c: ContextType, p: Product, alpha: f64, beta: f64) -> Result<(), StorageError> {
        self.inner.save(c, p, alpha, beta)
    }
    fn apply_update(
        &self,
        update: &fieldsense_core::types::BeliefUpdate,
    ) -> Result<BeliefParameter, StorageError> {
        use std::sync::atomic::Ordering;
        let left = self.failures_left.load(Ordering::SeqCst);
        if left > 0 {
            self.failures_left.store(left - 1, Ordering::SeqCst);
            return Err(StorageError::SqliteError {
                message: "database is locked".to_string(),
            });
        }
        self.inner.apply_update(update)
    }
    fn record_recommendation(
        &self,
        rec: &fieldsense_core::types::NewRecommendation,
    ) -> Result<i64, StorageError> {
        self.inner.record_recommendation(rec)
    }
    fn record_feedback(
        &self,
        recommendation_id: i64,
        rating: i64,
        notes: &str,
    ) -> Result<Option<fieldsense_core::types::FeedbackResolution>, StorageError> {
        self.inner.record_feedback(recommendation_id, rating, notes)
    }
    fn pending_feedback(
        &self,
    ) -> Result<Vec<fieldsense_core::types::FeedbackResolution>, StorageError> {
        self.inner.pending_feedback()
    }
}

#[test]
fn test_failed_feedback_application_is_replayed() {
    let store = Arc::new(FlakyStore {
        inner: InMemoryBeliefStore::with_table(&BeliefTable::defaults()),
        failures_left: std::sync::atomic::AtomicUsize::new(1),
    });
    let rec = BanditRecommender::new(
        Some(store.clone() as Arc<dyn BeliefStore>),
        &seeded_config(3),
    );

    let result = rec.recommend(&heat_context(), Some(7)).unwrap();
    let id = result.recommendation_id.unwrap();
    let before = rec.belief(ContextType::HeatStress, result.product).unwrap();
    let resolution = store.record_feedback(id, 9, "").unwrap().unwrap();

    let err = rec.apply_feedback(&resolution).unwrap_err();
    assert!(matches!(err, RecommenderError::Storage(_)));
    assert_eq!(rec.belief(ContextType::HeatStress, result.product).unwrap(), before);
    assert_eq!(store.pending_feedback().unwrap().len(), 1);

    assert_eq!(rec.apply_pending_feedback().unwrap(), 1);
    let after = rec.belief(ContextType::HeatStress, result.product).unwrap();
    assert_eq!((after.alpha, after.beta), (before.alpha + 1.0, before.beta));
    assert!(store.pending_feedback().unwrap().is_empty());
    assert_eq!(rec.apply_pending_feedback().unwrap(), 0);
}

#[test]
fn test_pending_feedback_without_store_is_noop() {
    let rec = BanditRecommender::new(None, &seeded_config(3));
    assert_eq!(rec.apply_pending_feedback().unwrap(), 0);
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn test_beliefs_stay_positive_for_any_rating_sequence(
        ratings in prop::collection::vec(1i64..=10, 0..40),
        heat in 0.0f64..9.0,
        frost in 0.0f64..9.0,
        drought in 0.0f64..9.0,
        soil in 0i64..10,
    ) {
        let rec = BanditRecommender::new(None, &seeded_config(1));
        let ctx = Context::new(heat, frost, drought, soil);
        for (i, rating) in ratings.iter().enumerate() {
            let product = Product::ALL[i % 3];
            rec.update_from_feedback(&ctx, product, *rating).unwrap();
        }
        for (_, _, param) in rec.snapshot().unwrap().iter() {
            prop_assert!(param.alpha > 0.0);
            prop_assert!(param.beta > 0.0);
        }
    }
}
