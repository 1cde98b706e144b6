// Shared models for the FightCast prediction core
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// ============================================================================
// Corner & Confidence Enums
// ============================================================================

/// Corner tag for the two fighters in a bout. Red is the first-listed fighter.
///
/// Request handling only ever deals in corner tags; free-text names appear
/// again at the presentation layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Corner {
    Red,
    Blue,
}

impl Corner {
    pub fn as_str(&self) -> &'static str {
        match self {
            Corner::Red => "red",
            Corner::Blue => "blue",
        }
    }

    pub fn opponent(&self) -> Corner {
        match self {
            Corner::Red => Corner::Blue,
            Corner::Blue => Corner::Red,
        }
    }
}

/// Ordinal confidence tier, ordered from weakest to strongest.
///
/// Which tiers a given model can actually produce depends on its tier policy:
/// legacy two-sided models bottom out at `Low`, folded five-tier models reach
/// `VeryLow`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConfidenceTier {
    VeryLow = 0,
    Low = 1,
    Medium = 2,
    High = 3,
    VeryHigh = 4,
}

// ============================================================================
// Fighter Statistics
// ============================================================================

fn default_win_rate() -> f64 {
    0.5
}

/// One fighter's aggregated career statistics.
///
/// Every metric is default-filled on deserialization so downstream
/// differencing never fails on a missing key: `win_rate` defaults to 0.5
/// (no-history prior), everything else to 0. The serde aliases reconcile the
/// two snapshot generations that abbreviate stat keys differently.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FighterStats {
    /// Canonical name, unique within a snapshot.
    #[serde(default)]
    pub name: String,

    // Fight statistics (per-fight averages)
    #[serde(default, alias = "avg_kd")]
    pub avg_knockdowns: f64,
    #[serde(default, alias = "avg_str")]
    pub avg_strikes: f64,
    #[serde(default, alias = "avg_sub")]
    pub avg_submissions: f64,
    #[serde(default, alias = "avg_td")]
    pub avg_takedowns: f64,

    // Recent form
    #[serde(default)]
    pub win_streak: f64,
    #[serde(default)]
    pub recent_avg_strikes: f64,
    #[serde(default, alias = "recent_avg_kd")]
    pub recent_avg_knockdowns: f64,

    // Career
    #[serde(default = "default_win_rate")]
    pub win_rate: f64,
    #[serde(default)]
    pub total_fights: f64,
    #[serde(default)]
    pub finish_rate: f64,
}

impl Default for FighterStats {
    fn default() -> Self {
        Self {
            name: String::new(),
            avg_knockdowns: 0.0,
            avg_strikes: 0.0,
            avg_submissions: 0.0,
            avg_takedowns: 0.0,
            win_streak: 0.0,
            recent_avg_strikes: 0.0,
            recent_avg_knockdowns: 0.0,
            win_rate: 0.5,
            total_fights: 0.0,
            finish_rate: 0.0,
        }
    }
}

// ============================================================================
// Prediction Results
// ============================================================================

/// Category emphasis weight carried from the active schema.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryWeight {
    pub category: &'static str,
    pub weight: f64,
}

/// One per-metric advantage statement.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Advantage {
    pub metric: &'static str,
    pub statement: String,
}

/// Outcome of one scoring pass, before presentation shaping.
///
/// Constructed fresh per request, immutable once built, never persisted.
#[derive(Debug, Clone, Serialize)]
pub struct PredictionResult {
    /// Probability that the red corner wins.
    pub p_red: f64,
    /// Derived complement, `1 - p_red`.
    pub p_blue: f64,
    pub winner: Corner,
    pub tier: ConfidenceTier,
    pub close_fight: bool,
    /// Fractions summing to 1 across stat categories.
    pub impact_weights: Vec<CategoryWeight>,
    /// Per-metric advantage statements, present when both records were known.
    pub advantages: Option<Vec<Advantage>>,
}

/// JSON-shaped prediction returned to the transport layer.
#[derive(Debug, Clone, Serialize)]
pub struct PresentationResult {
    /// "Red Name vs Blue Name"
    pub fight: String,
    /// Predicted winner's display name.
    pub prediction: String,
    /// Confidence label under the active tier policy.
    pub confidence: String,
    /// Fighter name -> percentage string, one decimal place.
    pub probabilities: serde_json::Map<String, serde_json::Value>,
    /// Winner's probability mass as a percentage string.
    pub winner_probability: String,
    pub is_close_fight: bool,
    /// Metric -> directional statement, when both records were supplied.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub advantages: Option<serde_json::Map<String, serde_json::Value>>,
}

// ============================================================================
// Service Metadata
// ============================================================================

/// Search response wrapper: the query echoed back plus matched records.
#[derive(Debug, Clone, Serialize)]
pub struct SearchResponse {
    pub query: String,
    pub count: usize,
    pub fighters: Vec<FighterStats>,
}

/// Static descriptive metadata about the bound model and snapshot.
#[derive(Debug, Clone, Serialize)]
pub struct ModelInfo {
    pub model: String,
    pub schema: &'static str,
    pub features: Vec<String>,
    /// Category emphasis, strongest first.
    pub emphasis: Vec<CategoryWeight>,
    pub fighters: usize,
    pub loaded_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stats_default_fill_on_deserialize() {
        let stats: FighterStats = serde_json::from_str("{}").unwrap();
        assert_eq!(stats.avg_strikes, 0.0);
        assert_eq!(stats.total_fights, 0.0);
        // Rate-like field defaults to the no-history prior
        assert_eq!(stats.win_rate, 0.5);
    }

    #[test]
    fn test_stats_legacy_key_aliases() {
        let raw = r#"{"avg_kd": 1.2, "avg_sub": 0.4, "avg_td": 2.1, "win_rate": 0.8}"#;
        let stats: FighterStats = serde_json::from_str(raw).unwrap();
        assert_eq!(stats.avg_knockdowns, 1.2);
        assert_eq!(stats.avg_submissions, 0.4);
        assert_eq!(stats.avg_takedowns, 2.1);
        assert_eq!(stats.win_rate, 0.8);
    }

    #[test]
    fn test_stats_modern_keys() {
        let raw = r#"{"avg_knockdowns": 0.5, "avg_strikes": 30.0, "win_streak": 2}"#;
        let stats: FighterStats = serde_json::from_str(raw).unwrap();
        assert_eq!(stats.avg_knockdowns, 0.5);
        assert_eq!(stats.avg_strikes, 30.0);
        assert_eq!(stats.win_streak, 2.0);
    }

    #[test]
    fn test_tier_ordering() {
        assert!(ConfidenceTier::VeryLow < ConfidenceTier::Low);
        assert!(ConfidenceTier::Low < ConfidenceTier::Medium);
        assert!(ConfidenceTier::Medium < ConfidenceTier::High);
        assert!(ConfidenceTier::High < ConfidenceTier::VeryHigh);
    }

    #[test]
    fn test_corner_opponent() {
        assert_eq!(Corner::Red.opponent(), Corner::Blue);
        assert_eq!(Corner::Blue.opponent(), Corner::Red);
        assert_eq!(Corner::Red.as_str(), "red");
    }
}
