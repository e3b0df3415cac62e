//! AdvisorRuntime — owns config, storage, recommender, and risk projection.
//!
//! Construct one per process (or per test) and share it by reference or
//! `Arc`. Every collaborator is injected at construction.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use chrono::NaiveDate;
use fieldsense_analysis::bandit::rating_to_delta;
use fieldsense_analysis::{BanditRecommender, ForecastProjector, RiskCalculator};
use fieldsense_core::config::{CliOverrides, FieldsenseConfig};
use fieldsense_core::constants::{DEFAULT_HISTORY_LIMIT, VERSION};
use fieldsense_core::errors::{AdvisorError, StorageError};
use fieldsense_core::traits::{BeliefStore, RiskSignals, WeatherSource};
use fieldsense_core::types::{
    Context, DailyRisk, Feedback, FeedbackUpdate, Field, FieldRisks, HistoryEntry, NewField,
};
use fieldsense_storage::{DatabaseManager, SqliteBeliefStore};

use crate::responses::{FieldImprovements, FieldRecommendation};

/// Demo farmer and field created by `seed_demo_field`.
const DEMO_FARMER: (&str, &str) = ("Test Farmer", "Brazil");
const DEMO_FIELD_NAME: &str = "Test Field";

/// Options for building the runtime.
#[derive(Debug, Clone, Default)]
pub struct RuntimeOptions {
    /// Database file. Overrides `storage.database_path`.
    pub db_path: Option<PathBuf>,
    /// Use an in-memory database; `db_path` is ignored.
    pub in_memory: bool,
    /// Root for `fieldsense.toml` and relative database paths.
    pub project_root: Option<PathBuf>,
    /// Inline TOML configuration. Skips file/env resolution when set.
    pub config_toml: Option<String>,
    /// Highest-priority overrides, applied during file/env resolution.
    pub cli: Option<CliOverrides>,
}

/// The Fieldsense composition root.
pub struct AdvisorRuntime {
    config: FieldsenseConfig,
    store: Arc<SqliteBeliefStore>,
    recommender: BanditRecommender,
    signals: Arc<dyn RiskSignals>,
    projector: ForecastProjector,
}

impl AdvisorRuntime {
    /// Build the runtime around the given risk signals.
    pub fn new(opts: RuntimeOptions, signals: Arc<dyn RiskSignals>) -> Result<Self, AdvisorError> {
        let config = resolve_config(&opts)?;

        let db = if opts.in_memory {
            DatabaseManager::open_in_memory()?
        } else {
            let path = resolve_db_path(&opts, &config);
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                std::fs::create_dir_all(parent).map_err(|e| StorageError::SqliteError {
                    message: format!("failed to create database directory: {e}"),
                })?;
            }
            DatabaseManager::open_with_config(&path, &config.storage)?
        };
        let store = Arc::new(SqliteBeliefStore::new(Arc::new(db)));

        let recommender = BanditRecommender::new(
            Some(store.clone() as Arc<dyn BeliefStore>),
            &config.recommender,
        );
        let projector = ForecastProjector::new(Arc::clone(&signals));

        // Ratings recorded by an earlier run whose belief write failed.
        recommender.apply_pending_feedback()?;

        tracing::info!(
            version = VERSION,
            exploration_rate = recommender.exploration_rate(),
            days_ahead = config.forecast.effective_days_ahead(),
            in_memory = opts.in_memory,
            "advisor runtime ready"
        );

        Ok(Self {
            config,
            store,
            recommender,
            signals,
            projector,
        })
    }

    /// Build the runtime with a `RiskCalculator` over `source`.
    pub fn with_weather_source<W>(opts: RuntimeOptions, source: W) -> Result<Self, AdvisorError>
    where
        W: WeatherSource + 'static,
    {
        Self::new(opts, Arc::new(RiskCalculator::new(source)))
    }

    pub fn config(&self) -> &FieldsenseConfig {
        &self.config
    }

    pub fn recommender(&self) -> &BanditRecommender {
        &self.recommender
    }

    pub fn store(&self) -> &Arc<SqliteBeliefStore> {
        &self.store
    }

    // ─── Field registry ──────────────────────────────────────────────────

    pub fn register_farmer(&self, name: &str, location: &str) -> Result<i64, AdvisorError> {
        Ok(self.store.add_farmer(name, location)?)
    }

    pub fn register_field(&self, field: &NewField) -> Result<i64, AdvisorError> {
        Ok(self.store.add_field(field)?)
    }

    pub fn field(&self, field_id: i64) -> Result<Field, AdvisorError> {
        self.store
            .get_field(field_id)?
            .ok_or(AdvisorError::FieldNotFound { field_id })
    }

    pub fn fields(&self, farmer_id: Option<i64>) -> Result<Vec<Field>, AdvisorError> {
        Ok(self.store.list_fields(farmer_id)?)
    }

    /// Create the demo farmer and field when no field exists yet.
    ///
    /// Returns the new field's id, or `None` if fields were already present.
    pub fn seed_demo_field(&self) -> Result<Option<i64>, AdvisorError> {
        let existing = self.store.field_count()?;
        if existing > 0 {
            tracing::debug!(existing, "fields already exist, demo field not created");
            return Ok(None);
        }
        let farmer_id = self.register_farmer(DEMO_FARMER.0, DEMO_FARMER.1)?;
        let field_id = self.register_field(&NewField {
            farmer_id,
            name: DEMO_FIELD_NAME.to_string(),
            latitude: -23.5505,
            longitude: -46.6333,
            crop_type: "soybean".to_string(),
            size_hectares: 10.5,
            soil_quality: 7,
        })?;
        tracing::info!(field_id, "demo field created");
        Ok(Some(field_id))
    }

    // ─── Risks and recommendations ───────────────────────────────────────

    /// Current risks for a crop at a location.
    pub fn risks(
        &self,
        date: NaiveDate,
        crop: &str,
        lat: f64,
        lon: f64,
    ) -> Result<FieldRisks, AdvisorError> {
        Ok(self.signals.field_risks(date, crop, lat, lon)?)
    }

    /// Recommend a product for a registered field and persist the decision.
    pub fn recommend_for_field(
        &self,
        field_id: i64,
        date: NaiveDate,
    ) -> Result<FieldRecommendation, AdvisorError> {
        let (field, risks, context) = self.field_context(field_id, date)?;
        let recommendation = self.recommender.recommend(&context, Some(field.id))?;
        Ok(FieldRecommendation {
            recommendation,
            risks,
        })
    }

    /// Expected improvement of each product for a registered field.
    pub fn improvements_for_field(
        &self,
        field_id: i64,
        date: NaiveDate,
    ) -> Result<FieldImprovements, AdvisorError> {
        let (field, risks, context) = self.field_context(field_id, date)?;
        let potential_improvements = self.recommender.get_product_improvements(&context)?;
        Ok(FieldImprovements {
            field_id: field.id,
            date,
            risks,
            potential_improvements,
        })
    }

    /// Record a rating and fold it into the beliefs of the rated
    /// recommendation's snapshot context.
    ///
    /// If the belief write fails the rating stays recorded as pending and is
    /// applied by `apply_pending_feedback`, which also runs at startup.
    pub fn submit_feedback(
        &self,
        recommendation_id: i64,
        rating: i64,
        notes: &str,
    ) -> Result<FeedbackUpdate, AdvisorError> {
        rating_to_delta(rating)?;
        let resolution = self
            .store
            .record_feedback(recommendation_id, rating, notes)?
            .ok_or(AdvisorError::RecommendationNotFound { recommendation_id })?;
        let update = self.recommender.apply_feedback(&resolution).inspect_err(|e| {
            tracing::warn!(
                feedback_id = resolution.feedback_id,
                error = %e,
                "feedback recorded but not applied, left pending"
            );
        })?;
        Ok(update)
    }

    /// Apply recorded ratings whose belief update never landed.
    pub fn apply_pending_feedback(&self) -> Result<usize, AdvisorError> {
        Ok(self.recommender.apply_pending_feedback()?)
    }

    /// Ratings recorded for a recommendation, oldest first.
    pub fn feedback(&self, recommendation_id: i64) -> Result<Vec<Feedback>, AdvisorError> {
        Ok(self.store.feedback_for(recommendation_id)?)
    }

    /// Latest recommendations for a field, newest first. `limit` defaults to 10.
    pub fn history(
        &self,
        field_id: i64,
        limit: Option<usize>,
    ) -> Result<Vec<HistoryEntry>, AdvisorError> {
        Ok(self
            .store
            .history(field_id, limit.unwrap_or(DEFAULT_HISTORY_LIMIT))?)
    }

    // ─── Forecasts ───────────────────────────────────────────────────────

    /// Projected daily risks. `days` defaults to `forecast.days_ahead`.
    pub fn forecast(
        &self,
        crop: &str,
        lat: f64,
        lon: f64,
        days: Option<u32>,
    ) -> Result<Vec<DailyRisk>, AdvisorError> {
        let days = days.unwrap_or_else(|| self.config.forecast.effective_days_ahead());
        Ok(self.projector.predict_future_risks(lat, lon, crop, days)?)
    }

    /// Projected daily risks with a product's impact applied.
    pub fn forecast_with_product(
        &self,
        crop: &str,
        product: &str,
        lat: f64,
        lon: f64,
        days: Option<u32>,
    ) -> Result<Vec<DailyRisk>, AdvisorError> {
        let days = days.unwrap_or_else(|| self.config.forecast.effective_days_ahead());
        Ok(self
            .projector
            .predict_with_biologicals_impact(lat, lon, crop, product, days)?)
    }

    fn field_context(
        &self,
        field_id: i64,
        date: NaiveDate,
    ) -> Result<(Field, FieldRisks, Context), AdvisorError> {
        let field = self.field(field_id)?;
        let risks = self
            .signals
            .field_risks(date, &field.crop_type, field.latitude, field.longitude)?;
        let context = Context::new(
            risks.heat_stress,
            risks.frost_stress,
            risks.drought_stress,
            field.soil_quality,
        );
        Ok((field, risks, context))
    }
}

fn resolve_config(opts: &RuntimeOptions) -> Result<FieldsenseConfig, AdvisorError> {
    let config = match (&opts.config_toml, &opts.project_root) {
        (Some(toml_str), _) => FieldsenseConfig::from_toml(toml_str)?,
        (None, Some(root)) => FieldsenseConfig::load(root, opts.cli.as_ref())?,
        (None, None) => FieldsenseConfig::load(Path::new("."), opts.cli.as_ref())?,
    };
    Ok(config)
}

fn resolve_db_path(opts: &RuntimeOptions, config: &FieldsenseConfig) -> PathBuf {
    let path = opts
        .db_path
        .clone()
        .unwrap_or_else(|| config.storage.effective_database_path());
    match &opts.project_root {
        Some(root) if path.is_relative() => root.join(path),
        _ => path,
    }
}
