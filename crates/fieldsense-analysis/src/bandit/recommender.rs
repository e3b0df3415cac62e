//! BanditRecommender — Thompson sampling with a write-through belief cache.

use std::array;
use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, RwLock};

use chrono::Utc;
use fieldsense_core::config::RecommenderConfig;
use fieldsense_core::errors::{RecommenderError, StorageError};
use fieldsense_core::numeric::round_to;
use fieldsense_core::traits::BeliefStore;
use fieldsense_core::types::{
    BeliefParameter, BeliefTable, BeliefUpdate, Context, ContextType, FeedbackResolution,
    FeedbackUpdate, NewRecommendation, Product, RecommendationResult,
};
use rand::distributions::{Distribution, WeightedIndex};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use super::beta::{confidence, posterior_mean, sample_beta};
use super::feedback::rating_to_delta;
use super::primary::{determine_primary_context, primary_factor};

/// Improvement multiplier per product. NutrientBooster uses the higher
/// value only when the primary context is `soil_quality_low`.
fn improvement_multiplier(product: Product, primary: ContextType) -> f64 {
    match product {
        Product::StressBuster => 10.0,
        Product::YieldBooster => 14.0,
        Product::NutrientBooster if primary == ContextType::SoilQualityLow => 15.0,
        Product::NutrientBooster => 8.0,
    }
}

/// Product recommender over a 4x3 table of Beta beliefs.
///
/// Each (context, product) cell sits behind its own `RwLock`. Recommendation
/// and improvement calls only read. A feedback update holds the write lock of
/// the one cell it touches across the store write and the cache write, so
/// updates to the same cell are serialized and updates to different cells
/// never contend.
pub struct BanditRecommender {
    cells: [[RwLock<BeliefParameter>; 3]; 4],
    store: Option<Arc<dyn BeliefStore>>,
    exploration_rate: f64,
    rng: Mutex<StdRng>,
}

impl BanditRecommender {
    /// Build the recommender, loading beliefs through `store`.
    ///
    /// With no store, a failing store, or an empty store, the default priors
    /// are used. An empty store is seeded with them.
    pub fn new(store: Option<Arc<dyn BeliefStore>>, config: &RecommenderConfig) -> Self {
        let table = match &store {
            Some(store) => load_table(store.as_ref()),
            None => BeliefTable::defaults(),
        };
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        Self {
            cells: array::from_fn(|c| {
                array::from_fn(|p| RwLock::new(table.get(ContextType::ALL[c], Product::ALL[p])))
            }),
            store,
            exploration_rate: config.effective_exploration_rate(),
            rng: Mutex::new(rng),
        }
    }

    /// Configured probability of exploring.
    pub fn exploration_rate(&self) -> f64 {
        self.exploration_rate
    }

    /// Recommend a product for the context using the configured exploration
    /// rate and the recommender's own RNG.
    ///
    /// When a store is attached and `field_id` is given, the recommendation is
    /// persisted and its id returned in the result. A failed write is logged
    /// and leaves `recommendation_id` empty.
    pub fn recommend(
        &self,
        context: &Context,
        field_id: Option<i64>,
    ) -> Result<RecommendationResult, RecommenderError> {
        let (product, is_exploration) = {
            let mut rng = self.rng.lock().map_err(|_| RecommenderError::StatePoisoned)?;
            self.choose(context, self.exploration_rate, &mut *rng)?
        };
        self.finish(context, field_id, product, is_exploration)
    }

    /// `recommend` with an explicit exploration rate and RNG.
    pub fn recommend_with_rng<R: Rng + ?Sized>(
        &self,
        context: &Context,
        field_id: Option<i64>,
        exploration_rate: f64,
        rng: &mut R,
    ) -> Result<RecommendationResult, RecommenderError> {
        let (product, is_exploration) = self.choose(context, exploration_rate, rng)?;
        self.finish(context, field_id, product, is_exploration)
    }

    /// Expected improvement (percent) of every product for the context:
    /// posterior mean of the primary-context cell times the product
    /// multiplier, one decimal. Deterministic in the current beliefs.
    pub fn get_product_improvements(
        &self,
        context: &Context,
    ) -> Result<BTreeMap<Product, f64>, RecommenderError> {
        let primary = determine_primary_context(context);
        let mut improvements = BTreeMap::new();
        for product in Product::ALL {
            let param = self.read(primary, product)?;
            let probability = posterior_mean(param.alpha, param.beta);
            improvements.insert(
                product,
                round_to(probability * improvement_multiplier(product, primary), 1),
            );
        }
        Ok(improvements)
    }

    /// Fold a rating into the belief cell of the context's primary factor.
    ///
    /// `context` must be the snapshot captured when the rated recommendation
    /// was made. Ratings outside 1..=10 are rejected without touching any
    /// belief.
    pub fn update_from_feedback(
        &self,
        context: &Context,
        product: Product,
        rating: i64,
    ) -> Result<FeedbackUpdate, RecommenderError> {
        let delta = rating_to_delta(rating)?;
        let primary = determine_primary_context(context);
        self.apply_delta(primary, product, delta, None, rating)
    }

    /// Apply a recorded feedback. The store refuses a feedback id it has
    /// already applied, so this succeeds at most once per feedback.
    pub fn apply_feedback(
        &self,
        resolution: &FeedbackResolution,
    ) -> Result<FeedbackUpdate, RecommenderError> {
        let delta = rating_to_delta(resolution.rating)?;
        let primary = determine_primary_context(&resolution.context);
        self.apply_delta(
            primary,
            resolution.product,
            delta,
            Some(resolution.feedback_id),
            resolution.rating,
        )
    }

    /// Apply every recorded feedback the store still holds as unapplied.
    ///
    /// Returns how many were applied. Feedback applied concurrently by
    /// another caller is skipped.
    pub fn apply_pending_feedback(&self) -> Result<usize, RecommenderError> {
        let Some(store) = &self.store else {
            return Ok(0);
        };
        let mut applied = 0;
        for resolution in store.pending_feedback()? {
            match self.apply_feedback(&resolution) {
                Ok(_) => applied += 1,
                Err(RecommenderError::Storage(StorageError::FeedbackAlreadyApplied { .. })) => {}
                Err(e) => return Err(e),
            }
        }
        if applied > 0 {
            tracing::info!(applied, "pending feedback applied");
        }
        Ok(applied)
    }

    /// Current cached belief for one cell.
    pub fn belief(
        &self,
        context: ContextType,
        product: Product,
    ) -> Result<BeliefParameter, RecommenderError> {
        self.read(context, product)
    }

    /// Copy of the whole cache.
    pub fn snapshot(&self) -> Result<BeliefTable, RecommenderError> {
        let mut table = BeliefTable::defaults();
        for context in ContextType::ALL {
            for product in Product::ALL {
                table.set(context, product, self.read(context, product)?);
            }
        }
        Ok(table)
    }

    /// Exploration weights: each product's posterior mean averaged over all
    /// context types, normalized to sum to 1. Uniform if every mean is 0.
    pub fn exploration_weights(&self) -> Result<[f64; 3], RecommenderError> {
        let mut weights = [0.0; 3];
        for product in Product::ALL {
            let mut sum = 0.0;
            for context in ContextType::ALL {
                let param = self.read(context, product)?;
                sum += posterior_mean(param.alpha, param.beta);
            }
            weights[product.index()] = sum / ContextType::ALL.len() as f64;
        }
        let total: f64 = weights.iter().sum();
        if total > 0.0 && total.is_finite() {
            for w in &mut weights {
                *w /= total;
            }
        } else {
            weights = [1.0 / 3.0; 3];
        }
        Ok(weights)
    }

    fn choose<R: Rng + ?Sized>(
        &self,
        context: &Context,
        exploration_rate: f64,
        rng: &mut R,
    ) -> Result<(Product, bool), RecommenderError> {
        if rng.gen::<f64>() < exploration_rate {
            let weights = self.exploration_weights()?;
            let idx = match WeightedIndex::new(weights) {
                Ok(dist) => dist.sample(rng),
                Err(_) => rng.gen_range(0..Product::ALL.len()),
            };
            return Ok((Product::ALL[idx], true));
        }

        let primary = determine_primary_context(context);
        let mut best = Product::ALL[0];
        let mut best_sample = f64::NEG_INFINITY;
        for product in Product::ALL {
            let param = self.read(primary, product)?;
            let sample = sample_beta(param.alpha, param.beta, rng);
            if sample > best_sample {
                best = product;
                best_sample = sample;
            }
        }
        Ok((best, false))
    }

    fn finish(
        &self,
        context: &Context,
        field_id: Option<i64>,
        product: Product,
        is_exploration: bool,
    ) -> Result<RecommendationResult, RecommenderError> {
        let factor = primary_factor(context);
        let primary = factor.context_type();
        let param = self.read(primary, product)?;
        let confidence = confidence(param.alpha, param.beta);

        let recommendation_id = match (&self.store, field_id) {
            (Some(store), Some(field_id)) => store
                .record_recommendation(&NewRecommendation {
                    field_id,
                    date: Utc::now().date_naive(),
                    context: *context,
                    product,
                    confidence,
                })
                .inspect_err(|e| {
                    tracing::warn!(field_id, error = %e, "recommendation not recorded");
                })
                .ok(),
            _ => None,
        };

        let expected_improvements = self.get_product_improvements(context)?;

        tracing::debug!(
            primary_context = %primary,
            product = %product,
            is_exploration,
            confidence,
            ?recommendation_id,
            "recommendation decided"
        );

        Ok(RecommendationResult {
            recommendation_id,
            product,
            confidence,
            primary_factor: factor,
            is_exploration,
            expected_improvements,
            timestamp: Utc::now(),
        })
    }

    fn apply_delta(
        &self,
        context: ContextType,
        product: Product,
        (alpha_delta, beta_delta): (f64, f64),
        feedback_id: Option<i64>,
        rating: i64,
    ) -> Result<FeedbackUpdate, RecommenderError> {
        let cell = &self.cells[context.index()][product.index()];
        let mut guard = cell.write().map_err(|_| RecommenderError::StatePoisoned)?;

        let updated = match &self.store {
            Some(store) => store.apply_update(&BeliefUpdate {
                context,
                product,
                alpha_delta,
                beta_delta,
                feedback_id,
            })?,
            None => BeliefParameter {
                alpha: guard.alpha + alpha_delta,
                beta: guard.beta + beta_delta,
                updated_at: Utc::now(),
            },
        };
        *guard = updated;

        tracing::info!(
            primary_context = %context,
            product = %product,
            rating,
            new_alpha = updated.alpha,
            new_beta = updated.beta,
            "belief updated"
        );

        Ok(FeedbackUpdate {
            updated_context: context,
            new_alpha: updated.alpha,
            new_beta: updated.beta,
        })
    }

    fn read(&self, context: ContextType, product: Product) -> Result<BeliefParameter, RecommenderError> {
        self.cells[context.index()][product.index()]
            .read()
            .map(|param| *param)
            .map_err(|_| RecommenderError::StatePoisoned)
    }
}

/// Load the belief table from a store, falling back to the defaults.
fn load_table(store: &dyn BeliefStore) -> BeliefTable {
    let mut table = BeliefTable::defaults();
    match store.load() {
        Ok(cells) if cells.is_empty() => {
            tracing::warn!("belief store is empty, seeding default priors");
            for (context, product, param) in table.iter() {
                if let Err(e) = store.save(context, product, param.alpha, param.beta) {
                    tracing::warn!(error = %e, "failed to seed default prior");
                    break;
                }
            }
        }
        Ok(cells) => {
            for (context, product, param) in cells {
                if param.is_valid() {
                    table.set(context, product, param);
                } else {
                    tracing::warn!(
                        primary_context = %context,
                        product = %product,
                        alpha = param.alpha,
                        beta = param.beta,
                        "ignoring non-positive stored belief"
                    );
                }
            }
        }
        Err(e) => {
            tracing::warn!(error = %e, "belief store unavailable, using default priors");
        }
    }
    table
}
