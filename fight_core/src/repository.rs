//! Immutable fighter statistics repository.
//!
//! Loads the aggregated snapshot once at startup and serves name resolution
//! and substring search for the life of the process. Records are kept in
//! snapshot encounter order; nothing is mutated after load, so the repository
//! is shared read-only across concurrent requests without locking.

use crate::error::{PredictError, Result};
use crate::models::FighterStats;
use rustc_hash::FxHashMap;
use std::fs;
use std::path::Path;
use tracing::{debug, info, warn};

/// How a query resolved, for logging.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum MatchKind {
    Exact,
    SinglePartial,
    PrefixPartial,
    FirstPartial,
}

#[derive(Debug)]
pub struct FighterRepository {
    /// Records in snapshot encounter order. Scan order for partial matching
    /// and search follows this ordering, so resolution of ambiguous queries
    /// is deterministic per snapshot but not across reordered snapshots.
    fighters: Vec<FighterStats>,
    /// Lowercased canonical name -> index. First encounter wins when two
    /// names collide case-insensitively, matching scan-order semantics.
    by_name: FxHashMap<String, usize>,
}

impl FighterRepository {
    /// Load the snapshot file. Missing or unparseable snapshots are fatal.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let raw = fs::read_to_string(path).map_err(|e| {
            PredictError::data_load("fighter snapshot", format!("{}: {}", path.display(), e))
        })?;
        let repo = Self::from_json_str(&raw)?;
        info!(
            fighters = repo.len(),
            path = %path.display(),
            "loaded fighter snapshot"
        );
        Ok(repo)
    }

    /// Build from a snapshot JSON string (object of objects, fighter name ->
    /// metric map). Entry order in the document is preserved as scan order.
    pub fn from_json_str(raw: &str) -> Result<Self> {
        let parsed: serde_json::Map<String, serde_json::Value> = serde_json::from_str(raw)
            .map_err(|e| PredictError::data_load("fighter snapshot", e))?;

        let mut fighters = Vec::with_capacity(parsed.len());
        let mut by_name = FxHashMap::default();

        for (name, value) in parsed {
            let mut stats: FighterStats = serde_json::from_value(value).map_err(|e| {
                PredictError::data_load("fighter snapshot", format!("record '{}': {}", name, e))
            })?;
            stats.name = name;
            by_name
                .entry(stats.name.to_lowercase())
                .or_insert(fighters.len());
            fighters.push(stats);
        }

        if fighters.is_empty() {
            warn!("fighter snapshot contains no records");
        }

        Ok(Self { fighters, by_name })
    }

    pub fn len(&self) -> usize {
        self.fighters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fighters.is_empty()
    }

    /// Resolve a free-text query to a record.
    ///
    /// Passes, in order: case-insensitive exact match; substring containment
    /// (a single candidate wins outright, otherwise the first candidate whose
    /// name starts with the query, otherwise the first candidate in scan
    /// order). Zero candidates is a `NotFound` carrying up to 3 containment
    /// suggestions, or a sample of up to 5 known names.
    pub fn resolve(&self, query: &str) -> Result<&FighterStats> {
        let needle = query.trim().to_lowercase();

        if let Some(&idx) = self.by_name.get(&needle) {
            return Ok(self.found(idx, &needle, MatchKind::Exact));
        }

        let partials: Vec<usize> = self
            .fighters
            .iter()
            .enumerate()
            .filter(|(_, f)| f.name.to_lowercase().contains(&needle))
            .map(|(i, _)| i)
            .collect();

        match partials.as_slice() {
            [] => {}
            [only] => return Ok(self.found(*only, &needle, MatchKind::SinglePartial)),
            many => {
                if let Some(&idx) = many
                    .iter()
                    .find(|&&i| self.fighters[i].name.to_lowercase().starts_with(&needle))
                {
                    return Ok(self.found(idx, &needle, MatchKind::PrefixPartial));
                }
                return Ok(self.found(many[0], &needle, MatchKind::FirstPartial));
            }
        }

        // Same containment test as the partial pass; usually empty here, in
        // which case the known-name sample applies.
        let suggestions: Vec<String> = self
            .fighters
            .iter()
            .filter(|f| f.name.to_lowercase().contains(&needle))
            .take(3)
            .map(|f| f.name.clone())
            .collect();
        let sample = if suggestions.is_empty() {
            self.fighters.iter().take(5).map(|f| f.name.clone()).collect()
        } else {
            Vec::new()
        };

        Err(PredictError::NotFound {
            query: query.trim().to_string(),
            suggestions,
            sample,
        })
    }

    /// Substring search in scan order, at most `limit` records. Queries
    /// shorter than 2 characters return nothing.
    pub fn search(&self, query: &str, limit: usize) -> Vec<&FighterStats> {
        if query.chars().count() < 2 {
            return Vec::new();
        }
        let needle = query.to_lowercase();
        self.fighters
            .iter()
            .filter(|f| f.name.to_lowercase().contains(&needle))
            .take(limit)
            .collect()
    }

    /// Iterate records in scan order.
    pub fn iter(&self) -> impl Iterator<Item = &FighterStats> {
        self.fighters.iter()
    }

    fn found(&self, idx: usize, needle: &str, kind: MatchKind) -> &FighterStats {
        let fighter = &self.fighters[idx];
        debug!(query = needle, name = %fighter.name, kind = ?kind, "resolved fighter");
        fighter
    }
}
