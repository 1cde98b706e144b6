//! Environment-driven startup configuration.
//!
//! Paths to the two startup artifacts (fighter snapshot, scoring artifact)
//! plus an optional schema override used by the load-time pairing check.

use crate::schema::SchemaVersion;
use std::env;

/// Configuration consumed once by `PredictionService::load`.
#[derive(Debug, Clone)]
pub struct PredictorConfig {
    /// Path to the aggregated fighter statistics snapshot (JSON).
    pub snapshot_path: String,
    /// Path to the pre-trained scoring artifact export (JSON).
    pub model_path: String,
    /// When set, the loaded artifact must have been trained against this
    /// schema; a mismatch fails startup.
    pub schema: Option<SchemaVersion>,
}

impl Default for PredictorConfig {
    fn default() -> Self {
        Self {
            snapshot_path: "data/fighter_database.json".to_string(),
            model_path: "models/win_model.json".to_string(),
            schema: None,
        }
    }
}

impl PredictorConfig {
    /// Load configuration from environment variables with fallback to the
    /// defaults above.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            snapshot_path: env::var("FIGHTER_DB_PATH").unwrap_or(defaults.snapshot_path),
            model_path: env::var("WIN_MODEL_PATH").unwrap_or(defaults.model_path),
            schema: env::var("WIN_MODEL_SCHEMA")
                .ok()
                .and_then(|v| SchemaVersion::parse(&v)),
        }
    }

    pub fn with_schema(mut self, schema: SchemaVersion) -> Self {
        self.schema = Some(schema);
        self
    }
}
