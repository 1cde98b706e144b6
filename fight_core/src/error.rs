//! Error taxonomy for the prediction core.
//!
//! Four failure classes cross the service boundary:
//! - `DataLoad`: snapshot or scoring artifact missing/corrupt at startup.
//!   Fatal: the process must not serve traffic.
//! - `NotFound`: name resolution produced zero candidates. Maps to a
//!   client-facing 404 at the transport layer.
//! - `Validation`: malformed or insufficient request input. Maps to a 400.
//! - `Scoring`: the bound model failed during evaluation. Per-request fatal,
//!   never retried, surfaced as a generic server error without model internals.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, PredictError>;

#[derive(Debug, Clone, Error)]
pub enum PredictError {
    /// Snapshot or scoring artifact could not be loaded or failed the
    /// schema pairing check.
    #[error("failed to load {what}: {reason}")]
    DataLoad { what: &'static str, reason: String },

    /// No fighter matched the query after the exact, partial and prefix passes.
    #[error("fighter '{query}' not found")]
    NotFound {
        query: String,
        /// Up to 3 substring-containment suggestions.
        suggestions: Vec<String>,
        /// Up to 5 known names, populated when no suggestion exists.
        sample: Vec<String>,
    },

    /// Malformed request input (short search query, wrong raw-stats arity).
    #[error("{0}")]
    Validation(String),

    /// The scoring model raised or produced an unusable value.
    #[error("scoring failed: {0}")]
    Scoring(String),
}

impl PredictError {
    pub(crate) fn data_load(what: &'static str, reason: impl ToString) -> Self {
        Self::DataLoad {
            what,
            reason: reason.to_string(),
        }
    }

    /// Client-facing detail string. For `NotFound` this includes the
    /// suggestions or the known-name sample; other variants use `Display`.
    pub fn detail(&self) -> String {
        match self {
            Self::NotFound {
                query,
                suggestions,
                sample,
            } => {
                if !suggestions.is_empty() {
                    format!("Did you mean: {}?", suggestions.join(", "))
                } else if !sample.is_empty() {
                    format!("Fighter '{}' not found. Try: {}", query, sample.join(", "))
                } else {
                    format!("Fighter '{}' not found", query)
                }
            }
            other => other.to_string(),
        }
    }

    /// True for the startup-fatal class.
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::DataLoad { .. })
    }
}
