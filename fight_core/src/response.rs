//! Response composition.
//!
//! Turns a scored probability plus the two resolved records into the
//! structured result the transport layer serializes: predicted winner,
//! confidence tier under the active policy, close-fight flag and per-metric
//! advantage breakdown. Pure functions over immutable inputs; composition
//! only runs once scoring has fully succeeded.

use crate::models::{
    Advantage, CategoryWeight, Corner, FighterStats, PredictionResult, PresentationResult,
};
use crate::schema::SchemaVersion;

/// Classify a scored probability under the active schema.
///
/// The winner tag is strict: exactly 0.5 goes to the blue corner, matching
/// the trained models' historical tie-breaking.
pub fn evaluate(p: f64, schema: SchemaVersion) -> PredictionResult {
    let winner = if p > 0.5 { Corner::Red } else { Corner::Blue };
    let (lo, hi) = schema.close_band();

    PredictionResult {
        p_red: p,
        p_blue: 1.0 - p,
        winner,
        tier: schema.tier_policy().classify(p),
        close_fight: (lo..=hi).contains(&p),
        impact_weights: schema
            .category_weights()
            .iter()
            .map(|&(category, weight)| CategoryWeight { category, weight })
            .collect(),
        advantages: None,
    }
}

/// Shape the full presentation response.
///
/// The advantage breakdown is emitted only when both records are supplied
/// (the raw-stats entry point has none). Percentages render with one decimal
/// place.
pub fn compose(
    p: f64,
    red_name: &str,
    blue_name: &str,
    red: Option<&FighterStats>,
    blue: Option<&FighterStats>,
    schema: SchemaVersion,
) -> PresentationResult {
    let mut result = evaluate(p, schema);
    if let (Some(red), Some(blue)) = (red, blue) {
        result.advantages = Some(advantage_breakdown(red_name, blue_name, red, blue, schema));
    }

    let prediction = match result.winner {
        Corner::Red => red_name,
        Corner::Blue => blue_name,
    };

    let mut probabilities = serde_json::Map::new();
    probabilities.insert(red_name.to_string(), pct(result.p_red).into());
    probabilities.insert(blue_name.to_string(), pct(result.p_blue).into());

    let advantages = result.advantages.as_ref().map(|list| {
        list.iter()
            .map(|a| (a.metric.to_string(), a.statement.clone().into()))
            .collect::<serde_json::Map<String, serde_json::Value>>()
    });

    PresentationResult {
        fight: format!("{} vs {}", red_name, blue_name),
        prediction: prediction.to_string(),
        confidence: schema.tier_policy().label(result.tier).to_string(),
        probabilities,
        winner_probability: pct(result.p_red.max(result.p_blue)),
        is_close_fight: result.close_fight,
        advantages,
    }
}

/// One directional statement per tracked metric, naming whichever fighter
/// holds the higher value and the magnitude of the gap. Exact ties read
/// "Even".
fn advantage_breakdown(
    red_name: &str,
    blue_name: &str,
    red: &FighterStats,
    blue: &FighterStats,
    schema: SchemaVersion,
) -> Vec<Advantage> {
    schema
        .metrics()
        .iter()
        .map(|def| {
            let diff = (def.metric)(red) - (def.metric)(blue);
            let statement = if diff == 0.0 {
                "Even".to_string()
            } else {
                let leader = if diff > 0.0 { red_name } else { blue_name };
                let magnitude = format!("{:.*}", def.decimals, diff.abs());
                if def.unit.is_empty() {
                    format!("{} by {}", leader, magnitude)
                } else {
                    format!("{} by {} {}", leader, magnitude, def.unit)
                }
            };
            Advantage {
                metric: def.key,
                statement,
            }
        })
        .collect()
}

/// Percentage string with one decimal place.
fn pct(p: f64) -> String {
    format!("{:.1}%", p * 100.0)
}
