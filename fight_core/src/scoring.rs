//! Scoring adapter over the opaque pre-trained win model.
//!
//! The model is bound once at startup and treated as a deterministic,
//! side-effect-free capability: feature row in, red-corner win probability
//! out. Any failure inside the model surfaces as a `Scoring` error, fatal for
//! that request and never retried.

use crate::error::{PredictError, Result};
use crate::features::{self, FeatureVector};
use crate::schema::SchemaVersion;
use serde::Deserialize;
use std::fs;
use std::path::Path;
use tracing::info;

/// Opaque pre-trained binary classifier.
///
/// The probability returned is the mass assigned to the red corner winning.
/// Implementations must be deterministic and safe to call concurrently.
pub trait WinModel: Send + Sync {
    /// Input columns the model was trained on, in training order, when known.
    /// When advertised, this list is authoritative over the schema's order.
    fn expected_columns(&self) -> Option<&[String]>;

    /// Probability of the positive class for one feature row.
    fn predict_proba(&self, features: &[f64]) -> anyhow::Result<f64>;

    /// Model name for logging and metadata.
    fn model_name(&self) -> &str;
}

/// Logistic function for probability calculation
#[inline]
fn logistic(x: f64) -> f64 {
    1.0 / (1.0 + (-x).exp())
}

fn default_model_name() -> String {
    "logistic_regression".to_string()
}

/// On-disk export of a trained logistic-regression artifact.
#[derive(Debug, Clone, Deserialize)]
struct ModelArtifact {
    schema: SchemaVersion,
    #[serde(default = "default_model_name")]
    name: String,
    features: Vec<String>,
    weights: Vec<f64>,
    #[serde(default)]
    bias: f64,
}

/// Pre-trained logistic-regression win model loaded from a JSON export.
///
/// The export carries the schema tag it was trained against, its input
/// columns in training order, one weight per column and an intercept.
#[derive(Debug, Clone)]
pub struct LogisticModel {
    name: String,
    schema: SchemaVersion,
    features: Vec<String>,
    weights: Vec<f64>,
    bias: f64,
}

impl LogisticModel {
    /// Load the artifact file. Missing or malformed artifacts are fatal.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let raw = fs::read_to_string(path).map_err(|e| {
            PredictError::data_load("scoring artifact", format!("{}: {}", path.display(), e))
        })?;
        let artifact: ModelArtifact = serde_json::from_str(&raw)
            .map_err(|e| PredictError::data_load("scoring artifact", e))?;
        let model = Self::from_artifact(artifact)?;
        info!(
            model = %model.name,
            schema = model.schema.as_str(),
            features = model.features.len(),
            "loaded scoring artifact"
        );
        Ok(model)
    }

    fn from_artifact(artifact: ModelArtifact) -> Result<Self> {
        if artifact.features.is_empty() {
            return Err(PredictError::data_load(
                "scoring artifact",
                "artifact advertises no input columns",
            ));
        }
        if artifact.features.len() != artifact.weights.len() {
            return Err(PredictError::data_load(
                "scoring artifact",
                format!(
                    "{} input columns but {} weights",
                    artifact.features.len(),
                    artifact.weights.len()
                ),
            ));
        }
        Ok(Self {
            name: artifact.name,
            schema: artifact.schema,
            features: artifact.features,
            weights: artifact.weights,
            bias: artifact.bias,
        })
    }

    /// Schema the artifact was trained against, for the load-time pairing check.
    pub fn schema(&self) -> SchemaVersion {
        self.schema
    }
}

impl WinModel for LogisticModel {
    fn expected_columns(&self) -> Option<&[String]> {
        Some(&self.features)
    }

    fn predict_proba(&self, features: &[f64]) -> anyhow::Result<f64> {
        if features.len() != self.weights.len() {
            anyhow::bail!(
                "feature row has {} values, model expects {}",
                features.len(),
                self.weights.len()
            );
        }
        let z: f64 = self
            .weights
            .iter()
            .zip(features)
            .map(|(w, x)| w * x)
            .sum::<f64>()
            + self.bias;
        Ok(logistic(z))
    }

    fn model_name(&self) -> &str {
        &self.name
    }
}

/// Wraps the bound model: aligns the builder's columns to the model's
/// advertised input order, scores, and validates the scalar that comes back.
pub struct ScoringAdapter {
    model: Box<dyn WinModel>,
}

impl std::fmt::Debug for ScoringAdapter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ScoringAdapter")
            .field("model", &self.model.model_name())
            .finish()
    }
}

impl ScoringAdapter {
    pub fn new(model: Box<dyn WinModel>) -> Self {
        Self { model }
    }

    /// Score a feature vector. The input vector is never mutated; alignment
    /// produces a fresh row in the model's expected order.
    pub fn score(&self, vector: &FeatureVector) -> Result<f64> {
        let aligned = features::align(vector, self.model.expected_columns());
        let p = self
            .model
            .predict_proba(aligned.values())
            .map_err(|e| PredictError::Scoring(e.to_string()))?;

        if !p.is_finite() || !(0.0..=1.0).contains(&p) {
            return Err(PredictError::Scoring(format!(
                "model produced an out-of-range probability: {}",
                p
            )));
        }
        Ok(p)
    }

    pub fn expected_columns(&self) -> Option<&[String]> {
        self.model.expected_columns()
    }

    pub fn model_name(&self) -> &str {
        self.model.model_name()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::FeatureVector;

    fn artifact(features: &[&str], weights: &[f64], bias: f64) -> ModelArtifact {
        ModelArtifact {
            schema: SchemaVersion::Baseline,
            name: "test_logreg".to_string(),
            features: features.iter().map(|s| s.to_string()).collect(),
            weights: weights.to_vec(),
            bias,
        }
    }

    struct FixedModel(f64);

    impl WinModel for FixedModel {
        fn expected_columns(&self) -> Option<&[String]> {
            None
        }
        fn predict_proba(&self, _features: &[f64]) -> anyhow::Result<f64> {
            Ok(self.0)
        }
        fn model_name(&self) -> &str {
            "fixed"
        }
    }

    struct FailingModel;

    impl WinModel for FailingModel {
        fn expected_columns(&self) -> Option<&[String]> {
            None
        }
        fn predict_proba(&self, _features: &[f64]) -> anyhow::Result<f64> {
            anyhow::bail!("artifact unavailable")
        }
        fn model_name(&self) -> &str {
            "failing"
        }
    }

    #[test]
    fn test_logistic_midpoint_and_monotonicity() {
        assert!((logistic(0.0) - 0.5).abs() < 1e-12);
        assert!(logistic(4.0) > 0.9);
        assert!(logistic(-4.0) < 0.1);
    }

    #[test]
    fn test_logistic_model_known_weights() {
        let model =
            LogisticModel::from_artifact(artifact(&["a", "b"], &[1.0, 2.0], 0.0)).unwrap();
        // z = 1*0.5 + 2*0.25 = 1.0
        let p = model.predict_proba(&[0.5, 0.25]).unwrap();
        assert!((p - logistic(1.0)).abs() < 1e-12);
    }

    #[test]
    fn test_artifact_weight_mismatch_fails_fast() {
        let err = LogisticModel::from_artifact(artifact(&["a", "b"], &[1.0], 0.0)).unwrap_err();
        assert!(matches!(err, PredictError::DataLoad { .. }));
    }

    #[test]
    fn test_artifact_without_columns_fails_fast() {
        let err = LogisticModel::from_artifact(artifact(&[], &[], 0.0)).unwrap_err();
        assert!(matches!(err, PredictError::DataLoad { .. }));
    }

    #[test]
    fn test_missing_artifact_file_is_data_load_error() {
        let err = LogisticModel::load("no/such/model.json").unwrap_err();
        assert!(matches!(err, PredictError::DataLoad { .. }));
    }

    #[test]
    fn test_adapter_aligns_to_model_columns() {
        let model =
            LogisticModel::from_artifact(artifact(&["b", "a"], &[2.0, 1.0], 0.0)).unwrap();
        let adapter = ScoringAdapter::new(Box::new(model));

        // Vector computed in (a, b) order; model wants (b, a).
        let vector = FeatureVector::new(
            vec!["a".to_string(), "b".to_string()],
            vec![0.5, 0.25],
        );
        let p = adapter.score(&vector).unwrap();
        // z = 2*0.25 + 1*0.5 = 1.0
        assert!((p - logistic(1.0)).abs() < 1e-12);
    }

    #[test]
    fn test_adapter_zero_fills_unknown_model_columns() {
        let model =
            LogisticModel::from_artifact(artifact(&["a", "missing"], &[1.0, 5.0], 0.0)).unwrap();
        let adapter = ScoringAdapter::new(Box::new(model));

        let vector = FeatureVector::new(vec!["a".to_string()], vec![1.0]);
        let p = adapter.score(&vector).unwrap();
        // The missing column contributes nothing: z = 1.0
        assert!((p - logistic(1.0)).abs() < 1e-12);
    }

    #[test]
    fn test_model_failure_surfaces_as_scoring_error() {
        let adapter = ScoringAdapter::new(Box::new(FailingModel));
        let vector = FeatureVector::new(vec![], vec![]);
        let err = adapter.score(&vector).unwrap_err();
        assert!(matches!(err, PredictError::Scoring(_)));
        // Message stays generic about the artifact's internals
        assert!(err.to_string().starts_with("scoring failed"));
    }

    #[test]
    fn test_out_of_range_probability_is_scoring_error() {
        for bad in [1.5, -0.1, f64::NAN, f64::INFINITY] {
            let adapter = ScoringAdapter::new(Box::new(FixedModel(bad)));
            let vector = FeatureVector::new(vec![], vec![]);
            assert!(matches!(
                adapter.score(&vector).unwrap_err(),
                PredictError::Scoring(_)
            ));
        }
    }

    #[test]
    fn test_in_range_probability_passes_through() {
        let adapter = ScoringAdapter::new(Box::new(FixedModel(0.75)));
        let vector = FeatureVector::new(vec![], vec![]);
        assert_eq!(adapter.score(&vector).unwrap(), 0.75);
    }
}
