//! Feature schema versions.
//!
//! Three incompatible feature schemas exist across model generations. Each
//! variant owns, as data: its ordered feature list, the derivation rule for
//! every feature, its category emphasis, its confidence tier policy and its
//! close-fight band. The variant is selected once at load time from the bound
//! scoring artifact, never per request.

use crate::models::{ConfidenceTier, FighterStats};
use serde::{Deserialize, Serialize};

/// Additive floor used by ratio features to avoid division by zero.
/// Frozen training-time constant; must match the bound artifact.
pub const RATIO_EPSILON: f64 = 0.1;

/// Frozen composite multipliers per metric family (training-time constants).
pub const KNOCKDOWN_WEIGHT: f64 = 2.0;
pub const STRIKE_WEIGHT: f64 = 1.5;
pub const STREAK_WEIGHT: f64 = 1.8;

/// Tagged schema version. Selected at load time from the scoring artifact.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SchemaVersion {
    /// 3-feature career model: win rate, experience, streak.
    Baseline,
    /// 7-feature model with per-fight stat emphasis.
    Rebalanced,
    /// 19-feature model adding recent form, ratios, dominance flags and
    /// weighted composites.
    Extended,
}

impl SchemaVersion {
    pub fn as_str(&self) -> &'static str {
        match self {
            SchemaVersion::Baseline => "baseline",
            SchemaVersion::Rebalanced => "rebalanced",
            SchemaVersion::Extended => "extended",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "baseline" => Some(SchemaVersion::Baseline),
            "rebalanced" => Some(SchemaVersion::Rebalanced),
            "extended" => Some(SchemaVersion::Extended),
            _ => None,
        }
    }

    /// Every feature this schema derives, in declared order.
    pub fn features(&self) -> &'static [FeatureDef] {
        match self {
            SchemaVersion::Baseline => BASELINE_FEATURES,
            SchemaVersion::Rebalanced => REBALANCED_FEATURES,
            SchemaVersion::Extended => EXTENDED_FEATURES,
        }
    }

    /// Declared feature names, in order.
    pub fn feature_names(&self) -> Vec<&'static str> {
        self.features().iter().map(|f| f.name).collect()
    }

    pub fn feature_count(&self) -> usize {
        self.features().len()
    }

    /// Record metrics this schema tracks, for the advantage breakdown.
    pub fn metrics(&self) -> &'static [MetricDef] {
        match self {
            SchemaVersion::Baseline => BASELINE_METRICS,
            SchemaVersion::Rebalanced => REBALANCED_METRICS,
            SchemaVersion::Extended => EXTENDED_METRICS,
        }
    }

    pub fn tier_policy(&self) -> TierPolicy {
        match self {
            SchemaVersion::Baseline | SchemaVersion::Rebalanced => TierPolicy::TwoSided,
            SchemaVersion::Extended => TierPolicy::FoldedWinner,
        }
    }

    /// Symmetric close-fight band around 0.5, inclusive at both edges.
    pub fn close_band(&self) -> (f64, f64) {
        match self {
            SchemaVersion::Baseline | SchemaVersion::Rebalanced => (0.4, 0.6),
            SchemaVersion::Extended => (0.45, 0.55),
        }
    }

    /// Category emphasis, fractions summing to 1, strongest first.
    pub fn category_weights(&self) -> &'static [(&'static str, f64)] {
        match self {
            SchemaVersion::Baseline => &[("career", 0.6), ("recent_form", 0.4)],
            SchemaVersion::Rebalanced => {
                &[("fight_stats", 0.6), ("recent_form", 0.3), ("career", 0.1)]
            }
            SchemaVersion::Extended => {
                &[("fight_stats", 0.5), ("recent_form", 0.3), ("career", 0.2)]
            }
        }
    }
}

// ============================================================================
// Tier Policies
// ============================================================================

/// How a probability maps to a confidence tier.
///
/// `TwoSided` compares the raw red-corner probability against symmetric
/// thresholds (legacy 3-tier models). `FoldedWinner` folds to the winner's
/// mass `max(p, 1-p)` first and compares one-sided (extended 5-tier models).
/// The two conventions differ at the boundaries and are never mixed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TierPolicy {
    TwoSided,
    FoldedWinner,
}

impl TierPolicy {
    pub fn classify(&self, p: f64) -> ConfidenceTier {
        match self {
            TierPolicy::TwoSided => {
                if p > 0.8 || p < 0.2 {
                    ConfidenceTier::VeryHigh
                } else if p > 0.7 || p < 0.3 {
                    ConfidenceTier::High
                } else if p > 0.6 || p < 0.4 {
                    ConfidenceTier::Medium
                } else {
                    ConfidenceTier::Low
                }
            }
            TierPolicy::FoldedWinner => {
                let winner_mass = p.max(1.0 - p);
                if winner_mass > 0.85 {
                    ConfidenceTier::VeryHigh
                } else if winner_mass > 0.75 {
                    ConfidenceTier::High
                } else if winner_mass > 0.65 {
                    ConfidenceTier::Medium
                } else if winner_mass > 0.55 {
                    ConfidenceTier::Low
                } else {
                    ConfidenceTier::VeryLow
                }
            }
        }
    }

    /// Display label for a tier under this policy.
    pub fn label(&self, tier: ConfidenceTier) -> &'static str {
        match self {
            TierPolicy::TwoSided => match tier {
                ConfidenceTier::VeryHigh => "Very High",
                ConfidenceTier::High => "High",
                ConfidenceTier::Medium => "Medium",
                // TwoSided never classifies below Low
                ConfidenceTier::Low | ConfidenceTier::VeryLow => "Low (Close Fight)",
            },
            TierPolicy::FoldedWinner => match tier {
                ConfidenceTier::VeryHigh => "Very High",
                ConfidenceTier::High => "High",
                ConfidenceTier::Medium => "Medium",
                ConfidenceTier::Low => "Low",
                ConfidenceTier::VeryLow => "Very Low (Toss-up)",
            },
        }
    }
}

// ============================================================================
// Feature Definitions
// ============================================================================

type MetricFn = fn(&FighterStats) -> f64;

/// Derivation rule for one feature.
#[derive(Debug, Clone, Copy)]
pub enum Derivation {
    /// Signed difference `red - blue` of the metric.
    Diff,
    /// `red / (blue + ε)`, with `red` floored to ε when exactly zero.
    Ratio,
    /// 1.0 when the signed difference is strictly positive, else 0.0.
    Dominance,
    /// Fixed multiplier applied to the signed difference.
    Weighted(f64),
}

/// One feature the builder derives: name, source metric and rule.
#[derive(Debug, Clone, Copy)]
pub struct FeatureDef {
    pub name: &'static str,
    pub metric: MetricFn,
    pub rule: Derivation,
}

impl FeatureDef {
    const fn diff(name: &'static str, metric: MetricFn) -> Self {
        Self {
            name,
            metric,
            rule: Derivation::Diff,
        }
    }

    const fn ratio(name: &'static str, metric: MetricFn) -> Self {
        Self {
            name,
            metric,
            rule: Derivation::Ratio,
        }
    }

    const fn dominance(name: &'static str, metric: MetricFn) -> Self {
        Self {
            name,
            metric,
            rule: Derivation::Dominance,
        }
    }

    const fn weighted(name: &'static str, metric: MetricFn, w: f64) -> Self {
        Self {
            name,
            metric,
            rule: Derivation::Weighted(w),
        }
    }
}

fn knockdowns(f: &FighterStats) -> f64 {
    f.avg_knockdowns
}
fn strikes(f: &FighterStats) -> f64 {
    f.avg_strikes
}
fn submissions(f: &FighterStats) -> f64 {
    f.avg_submissions
}
fn takedowns(f: &FighterStats) -> f64 {
    f.avg_takedowns
}
fn win_rate(f: &FighterStats) -> f64 {
    f.win_rate
}
fn total_fights(f: &FighterStats) -> f64 {
    f.total_fights
}
fn win_streak(f: &FighterStats) -> f64 {
    f.win_streak
}
fn recent_strikes(f: &FighterStats) -> f64 {
    f.recent_avg_strikes
}
fn recent_knockdowns(f: &FighterStats) -> f64 {
    f.recent_avg_knockdowns
}
fn finish_rate(f: &FighterStats) -> f64 {
    f.finish_rate
}
/// Combined grappling output, used by the grappling dominance flag.
fn grappling(f: &FighterStats) -> f64 {
    f.avg_takedowns + f.avg_submissions
}

static BASELINE_FEATURES: &[FeatureDef] = &[
    FeatureDef::diff("win_rate_diff", win_rate),
    FeatureDef::diff("exp_diff", total_fights),
    FeatureDef::diff("streak_diff", win_streak),
];

static REBALANCED_FEATURES: &[FeatureDef] = &[
    FeatureDef::diff("kd_diff", knockdowns),
    FeatureDef::diff("str_diff", strikes),
    FeatureDef::diff("sub_diff", submissions),
    FeatureDef::diff("td_diff", takedowns),
    FeatureDef::diff("win_rate_diff", win_rate),
    FeatureDef::diff("exp_diff", total_fights),
    FeatureDef::diff("streak_diff", win_streak),
];

static EXTENDED_FEATURES: &[FeatureDef] = &[
    // Plain signed differences
    FeatureDef::diff("kd_diff", knockdowns),
    FeatureDef::diff("str_diff", strikes),
    FeatureDef::diff("sub_diff", submissions),
    FeatureDef::diff("td_diff", takedowns),
    FeatureDef::diff("win_rate_diff", win_rate),
    FeatureDef::diff("exp_diff", total_fights),
    FeatureDef::diff("streak_diff", win_streak),
    FeatureDef::diff("recent_str_diff", recent_strikes),
    FeatureDef::diff("recent_kd_diff", recent_knockdowns),
    FeatureDef::diff("finish_rate_diff", finish_rate),
    // Epsilon-guarded ratios
    FeatureDef::ratio("kd_ratio", knockdowns),
    FeatureDef::ratio("str_ratio", strikes),
    FeatureDef::ratio("td_ratio", takedowns),
    // Dominance flags
    FeatureDef::dominance("kd_dominance", knockdowns),
    FeatureDef::dominance("str_dominance", strikes),
    FeatureDef::dominance("grappling_dominance", grappling),
    // Weighted composites
    FeatureDef::weighted("kd_weighted", knockdowns, KNOCKDOWN_WEIGHT),
    FeatureDef::weighted("str_weighted", strikes, STRIKE_WEIGHT),
    FeatureDef::weighted("streak_weighted", win_streak, STREAK_WEIGHT),
];

// ============================================================================
// Tracked Metrics (advantage breakdown)
// ============================================================================

/// One record metric tracked for the advantage breakdown: snapshot-facing
/// key, accessor and display rule.
#[derive(Debug, Clone, Copy)]
pub struct MetricDef {
    pub key: &'static str,
    pub metric: MetricFn,
    /// Display decimals for the magnitude.
    pub decimals: usize,
    /// Display unit appended to the magnitude.
    pub unit: &'static str,
}

const fn metric(
    key: &'static str,
    metric: MetricFn,
    decimals: usize,
    unit: &'static str,
) -> MetricDef {
    MetricDef {
        key,
        metric,
        decimals,
        unit,
    }
}

static BASELINE_METRICS: &[MetricDef] = &[
    metric("win_rate", win_rate, 3, ""),
    metric("experience", total_fights, 0, "fights"),
    metric("recent_form", win_streak, 0, "wins"),
];

static REBALANCED_METRICS: &[MetricDef] = &[
    metric("knockdowns", knockdowns, 2, "avg"),
    metric("strikes", strikes, 1, "avg"),
    metric("submissions", submissions, 2, "avg"),
    metric("takedowns", takedowns, 2, "avg"),
    metric("win_rate", win_rate, 3, ""),
    metric("experience", total_fights, 0, "fights"),
    metric("recent_form", win_streak, 0, "wins"),
];

static EXTENDED_METRICS: &[MetricDef] = &[
    metric("knockdowns", knockdowns, 2, "avg"),
    metric("strikes", strikes, 1, "avg"),
    metric("submissions", submissions, 2, "avg"),
    metric("takedowns", takedowns, 2, "avg"),
    metric("win_rate", win_rate, 3, ""),
    metric("experience", total_fights, 0, "fights"),
    metric("recent_form", win_streak, 0, "wins"),
    metric("recent_strikes", recent_strikes, 1, "avg"),
    metric("recent_knockdowns", recent_knockdowns, 2, "avg"),
    metric("finish_rate", finish_rate, 3, ""),
];
