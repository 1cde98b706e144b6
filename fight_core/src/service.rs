//! Prediction service facade.
//!
//! Wires the repository, scoring adapter and composer behind the four
//! operations the transport layer consumes. Constructed once at startup
//! (blocking initialization barrier) and shared read-only across requests:
//! every operation is a pure function over immutable state, so concurrent
//! callers need no coordination.

use crate::config::PredictorConfig;
use crate::error::{PredictError, Result};
use crate::features::{self, FeatureVector};
use crate::models::{CategoryWeight, ModelInfo, PresentationResult, SearchResponse};
use crate::repository::FighterRepository;
use crate::response;
use crate::schema::SchemaVersion;
use crate::scoring::{LogisticModel, ScoringAdapter, WinModel};
use chrono::{DateTime, Utc};
use rayon::prelude::*;
use tracing::info;

/// Placeholder corner names used by the raw-stats entry point.
const RED_PLACEHOLDER: &str = "Red Fighter";
const BLUE_PLACEHOLDER: &str = "Blue Fighter";

pub const DEFAULT_SEARCH_LIMIT: usize = 10;

#[derive(Debug)]
pub struct PredictionService {
    repo: FighterRepository,
    scorer: ScoringAdapter,
    schema: SchemaVersion,
    loaded_at: DateTime<Utc>,
}

impl PredictionService {
    /// Startup barrier: load the snapshot and the scoring artifact, run the
    /// schema pairing check, and only then accept requests.
    pub fn load(config: &PredictorConfig) -> Result<Self> {
        let repo = FighterRepository::load(&config.snapshot_path)?;
        let model = LogisticModel::load(&config.model_path)?;
        let schema = model.schema();

        if let Some(expected) = config.schema {
            if expected != schema {
                return Err(PredictError::data_load(
                    "scoring artifact",
                    format!(
                        "artifact trained against schema '{}' but '{}' is configured",
                        schema.as_str(),
                        expected.as_str()
                    ),
                ));
            }
        }

        info!(
            schema = schema.as_str(),
            fighters = repo.len(),
            "prediction service ready"
        );
        Ok(Self::new(repo, Box::new(model), schema))
    }

    /// Explicit dependency injection seam: any `WinModel` implementation can
    /// be bound, mock models included.
    pub fn new(repo: FighterRepository, model: Box<dyn WinModel>, schema: SchemaVersion) -> Self {
        Self {
            repo,
            scorer: ScoringAdapter::new(model),
            schema,
            loaded_at: Utc::now(),
        }
    }

    pub fn schema(&self) -> SchemaVersion {
        self.schema
    }

    pub fn repository(&self) -> &FighterRepository {
        &self.repo
    }

    /// Full pipeline: resolve both names, difference the records, score,
    /// compose. Fails with `NotFound` when either resolution fails.
    pub fn predict_by_names(&self, red: &str, blue: &str) -> Result<PresentationResult> {
        let red_stats = self.repo.resolve(red)?;
        let blue_stats = self.repo.resolve(blue)?;

        let vector = features::build(red_stats, blue_stats, self.schema);
        let p = self.scorer.score(&vector)?;

        Ok(response::compose(
            p,
            &red_stats.name,
            &blue_stats.name,
            Some(red_stats),
            Some(blue_stats),
            self.schema,
        ))
    }

    /// Raw-stats entry point: positional feature values in the active
    /// schema's declared order, bypassing repository resolution. Wrong arity
    /// or non-finite input is a validation failure.
    pub fn predict_by_stats(&self, values: &[f64]) -> Result<PresentationResult> {
        let expected = self.schema.feature_count();
        if values.len() != expected {
            return Err(PredictError::Validation(format!(
                "expected {} feature values for the {} schema, got {}",
                expected,
                self.schema.as_str(),
                values.len()
            )));
        }
        if values.iter().any(|v| !v.is_finite()) {
            return Err(PredictError::Validation(
                "feature values must be finite numbers".to_string(),
            ));
        }

        let vector = FeatureVector::from_raw(self.schema, values);
        let p = self.scorer.score(&vector)?;

        Ok(response::compose(
            p,
            RED_PLACEHOLDER,
            BLUE_PLACEHOLDER,
            None,
            None,
            self.schema,
        ))
    }

    /// Substring search over the snapshot. Queries under 2 characters are a
    /// validation failure at this boundary.
    pub fn search(&self, query: &str, limit: usize) -> Result<SearchResponse> {
        if query.chars().count() < 2 {
            return Err(PredictError::Validation(
                "search query must be at least 2 characters".to_string(),
            ));
        }

        let fighters: Vec<_> = self.repo.search(query, limit).into_iter().cloned().collect();
        Ok(SearchResponse {
            query: query.to_string(),
            count: fighters.len(),
            fighters,
        })
    }

    /// Static descriptive metadata: pure data, no computation.
    pub fn model_info(&self) -> ModelInfo {
        ModelInfo {
            model: self.scorer.model_name().to_string(),
            schema: self.schema.as_str(),
            features: self
                .scorer
                .expected_columns()
                .map(|cols| cols.to_vec())
                .unwrap_or_else(|| {
                    self.schema
                        .feature_names()
                        .iter()
                        .map(|n| n.to_string())
                        .collect()
                }),
            emphasis: self
                .schema
                .category_weights()
                .iter()
                .map(|&(category, weight)| CategoryWeight { category, weight })
                .collect(),
            fighters: self.repo.len(),
            loaded_at: self.loaded_at,
        }
    }

    /// Batch prediction for a full fight card. Pure fan-out of the
    /// single-request path; per-bout failures stay per-bout.
    pub fn predict_card(&self, bouts: &[(String, String)]) -> Vec<Result<PresentationResult>> {
        bouts
            .par_iter()
            .map(|(red, blue)| self.predict_by_names(red, blue))
            .collect()
    }
}
