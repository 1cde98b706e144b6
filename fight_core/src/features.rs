//! Feature vector construction.
//!
//! Differences two fighter records into the ordered numeric vector the bound
//! scoring model expects. Derivation rules live on the schema as data; this
//! module only executes them and handles column alignment against the model's
//! advertised input order.

use crate::models::FighterStats;
use crate::schema::{Derivation, SchemaVersion, RATIO_EPSILON};

/// Ordered name -> value mapping produced by the builder.
///
/// Construction never fails: every record metric is default-filled, and
/// alignment zero-fills anything the model expects that was not computed.
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureVector {
    names: Vec<String>,
    values: Vec<f64>,
}

impl FeatureVector {
    pub fn new(names: Vec<String>, values: Vec<f64>) -> Self {
        debug_assert_eq!(names.len(), values.len());
        Self { names, values }
    }

    /// Pair raw values with the active schema's declared feature names.
    /// Used by the raw-stats entry point; arity is validated by the caller.
    pub fn from_raw(schema: SchemaVersion, values: &[f64]) -> Self {
        Self::new(
            schema.feature_names().iter().map(|n| n.to_string()).collect(),
            values.to_vec(),
        )
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }

    pub fn get(&self, name: &str) -> Option<f64> {
        self.names
            .iter()
            .position(|n| n == name)
            .map(|i| self.values[i])
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// Build the feature vector for `red` vs `blue` under the active schema.
///
/// Plain features are the signed difference `red - blue`; ratio, dominance
/// and weighted features apply the schema's fixed derivation rules to the
/// same metric pair.
pub fn build(red: &FighterStats, blue: &FighterStats, schema: SchemaVersion) -> FeatureVector {
    let defs = schema.features();
    let mut names = Vec::with_capacity(defs.len());
    let mut values = Vec::with_capacity(defs.len());

    for def in defs {
        let a = (def.metric)(red);
        let b = (def.metric)(blue);
        let value = match def.rule {
            Derivation::Diff => a - b,
            Derivation::Ratio => guarded_ratio(a, b),
            Derivation::Dominance => {
                if a - b > 0.0 {
                    1.0
                } else {
                    0.0
                }
            }
            Derivation::Weighted(w) => w * (a - b),
        };
        names.push(def.name.to_string());
        values.push(value);
    }

    FeatureVector::new(names, values)
}

/// `a / (b + ε)`, with `a` floored to ε when exactly zero. The floor matches
/// the training pipeline's substitution of a default for zero numerators.
fn guarded_ratio(a: f64, b: f64) -> f64 {
    let numerator = if a == 0.0 { RATIO_EPSILON } else { a };
    numerator / (b + RATIO_EPSILON)
}

/// Reindex `vector` to the model's advertised column order.
///
/// Advertised columns missing from the computed map are zero-filled;
/// computed columns the model does not advertise are silently dropped.
/// With no advertised order the vector passes through in schema order.
pub fn align(vector: &FeatureVector, expected: Option<&[String]>) -> FeatureVector {
    let Some(expected) = expected else {
        return vector.clone();
    };

    let names: Vec<String> = expected.to_vec();
    let values: Vec<f64> = expected
        .iter()
        .map(|col| vector.get(col).unwrap_or(0.0))
        .collect();

    FeatureVector::new(names, values)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{KNOCKDOWN_WEIGHT, STREAK_WEIGHT, STRIKE_WEIGHT};

    fn jones() -> FighterStats {
        FighterStats {
            name: "Jon Jones".to_string(),
            avg_knockdowns: 1.0,
            avg_strikes: 50.0,
            avg_submissions: 0.6,
            avg_takedowns: 2.0,
            win_rate: 0.8,
            total_fights: 20.0,
            win_streak: 5.0,
            recent_avg_strikes: 55.0,
            recent_avg_knockdowns: 1.2,
            finish_rate: 0.7,
        }
    }

    fn blachowicz() -> FighterStats {
        FighterStats {
            name: "Jan Blachowicz".to_string(),
            avg_knockdowns: 0.5,
            avg_strikes: 30.0,
            avg_submissions: 0.3,
            avg_takedowns: 1.0,
            win_rate: 0.6,
            total_fights: 15.0,
            win_streak: 2.0,
            recent_avg_strikes: 28.0,
            recent_avg_knockdowns: 0.4,
            finish_rate: 0.5,
        }
    }

    #[test]
    fn test_rebalanced_diffs() {
        let v = build(&jones(), &blachowicz(), SchemaVersion::Rebalanced);
        assert_eq!(v.len(), 7);
        assert_eq!(v.get("kd_diff"), Some(0.5));
        assert_eq!(v.get("str_diff"), Some(20.0));
        assert!((v.get("sub_diff").unwrap() - 0.3).abs() < 1e-12);
        assert_eq!(v.get("td_diff"), Some(1.0));
        assert!((v.get("win_rate_diff").unwrap() - 0.2).abs() < 1e-12);
        assert_eq!(v.get("exp_diff"), Some(5.0));
        assert_eq!(v.get("streak_diff"), Some(3.0));
    }

    #[test]
    fn test_extended_derived_features() {
        let v = build(&jones(), &blachowicz(), SchemaVersion::Extended);
        assert_eq!(v.len(), 19);

        // Ratios use the epsilon-guarded rule
        let kd_ratio = v.get("kd_ratio").unwrap();
        assert!((kd_ratio - 1.0 / 0.6).abs() < 1e-12);

        // Dominance flags fire on strictly positive diffs
        assert_eq!(v.get("kd_dominance"), Some(1.0));
        assert_eq!(v.get("str_dominance"), Some(1.0));
        assert_eq!(v.get("grappling_dominance"), Some(1.0));

        // Weighted composites carry the frozen multipliers
        assert!((v.get("kd_weighted").unwrap() - KNOCKDOWN_WEIGHT * 0.5).abs() < 1e-12);
        assert!((v.get("str_weighted").unwrap() - STRIKE_WEIGHT * 20.0).abs() < 1e-12);
        assert!((v.get("streak_weighted").unwrap() - STREAK_WEIGHT * 3.0).abs() < 1e-12);
    }

    #[test]
    fn test_ratio_epsilon_guards() {
        // Zero denominator never divides by zero
        let mut b = blachowicz();
        b.avg_knockdowns = 0.0;
        let v = build(&jones(), &b, SchemaVersion::Extended);
        assert!((v.get("kd_ratio").unwrap() - 1.0 / 0.1).abs() < 1e-12);

        // Zero numerator gets the same epsilon floor
        let mut a = jones();
        a.avg_knockdowns = 0.0;
        let v = build(&a, &blachowicz(), SchemaVersion::Extended);
        assert!((v.get("kd_ratio").unwrap() - 0.1 / 0.6).abs() < 1e-12);
    }

    #[test]
    fn test_default_filled_records_never_fail() {
        let empty: FighterStats = serde_json::from_str("{}").unwrap();
        for schema in [
            SchemaVersion::Baseline,
            SchemaVersion::Rebalanced,
            SchemaVersion::Extended,
        ] {
            let v = build(&empty, &jones(), schema);
            assert_eq!(v.len(), schema.feature_count());
            assert!(v.values().iter().all(|x| x.is_finite()));
        }
    }

    #[test]
    fn test_plain_diff_antisymmetry() {
        for schema in [
            SchemaVersion::Baseline,
            SchemaVersion::Rebalanced,
            SchemaVersion::Extended,
        ] {
            let ab = build(&jones(), &blachowicz(), schema);
            let ba = build(&blachowicz(), &jones(), schema);
            for def in schema.features() {
                let forward = ab.get(def.name).unwrap();
                let backward = ba.get(def.name).unwrap();
                match def.rule {
                    Derivation::Diff | Derivation::Weighted(_) => {
                        assert!(
                            (forward + backward).abs() < 1e-9,
                            "{} not antisymmetric: {} vs {}",
                            def.name,
                            forward,
                            backward
                        );
                    }
                    Derivation::Dominance => {
                        // Flags invert with the sign flip (no exact ties here)
                        assert_eq!(forward + backward, 1.0, "{}", def.name);
                    }
                    Derivation::Ratio => {
                        assert!(forward > 0.0 && backward > 0.0, "{}", def.name);
                    }
                }
            }
        }
    }

    #[test]
    fn test_dominance_zero_on_exact_equality() {
        let a = jones();
        let v = build(&a, &a, SchemaVersion::Extended);
        assert_eq!(v.get("kd_dominance"), Some(0.0));
        assert_eq!(v.get("str_dominance"), Some(0.0));
        assert_eq!(v.get("grappling_dominance"), Some(0.0));
        // And every plain diff reads zero against itself
        assert_eq!(v.get("kd_diff"), Some(0.0));
        assert_eq!(v.get("streak_weighted"), Some(0.0));
    }

    #[test]
    fn test_align_reorders_and_zero_fills() {
        let v = build(&jones(), &blachowicz(), SchemaVersion::Baseline);
        let expected = vec![
            "streak_diff".to_string(),
            "unknown_col".to_string(),
            "win_rate_diff".to_string(),
        ];
        let aligned = align(&v, Some(&expected));

        assert_eq!(aligned.names(), expected.as_slice());
        assert_eq!(aligned.values()[0], 3.0);
        assert_eq!(aligned.values()[1], 0.0); // zero-filled
        assert!((aligned.values()[2] - 0.2).abs() < 1e-12);
        // exp_diff was computed but not advertised: dropped
        assert_eq!(aligned.get("exp_diff"), None);
    }

    #[test]
    fn test_align_without_expected_passes_through() {
        let v = build(&jones(), &blachowicz(), SchemaVersion::Rebalanced);
        let aligned = align(&v, None);
        assert_eq!(aligned, v);
    }

    #[test]
    fn test_from_raw_pairs_schema_order() {
        let v = FeatureVector::from_raw(SchemaVersion::Baseline, &[0.2, 5.0, 1.0]);
        assert_eq!(v.get("win_rate_diff"), Some(0.2));
        assert_eq!(v.get("exp_diff"), Some(5.0));
        assert_eq!(v.get("streak_diff"), Some(1.0));
    }
}
