//! Keyword search over stored code units.
//!
//! Retrieval runs in two stages. The store narrows by project and kind in
//! SQL, then every remaining unit goes through a case-insensitive substring
//! candidate check followed by tiered scoring. Results are sorted by score
//! (descending) with name as the tiebreaker, and the limit is applied only
//! after sorting so truncation never drops a higher-scoring hit.

use crate::error::Result;
use crate::store::ProjectStore;
use crate::types::{StoredUnit, UnitKind};

/// Score for a query match in the unit's name.
pub const SCORE_NAME: u32 = 100;
/// Score for a match in the derived keywords.
pub const SCORE_KEYWORDS: u32 = 50;
/// Score for a match in the snippet (first 200 chars of code).
pub const SCORE_SNIPPET: u32 = 25;
/// Floor score: the match only occurs deeper in the full code.
pub const SCORE_CODE: u32 = 10;

/// Options controlling a search run.
#[derive(Debug, Clone)]
pub struct SearchOptions {
    /// Maximum number of hits returned, applied after sorting.
    pub limit: usize,
    /// Restrict to a single project by name.
    pub project: Option<String>,
    /// Restrict to a single unit kind.
    pub kind: Option<UnitKind>,
}

impl Default for SearchOptions {
    fn default() -> Self {
        Self {
            limit: 10,
            project: None,
            kind: None,
        }
    }
}

/// One scored search result.
#[derive(Debug, Clone)]
pub struct SearchHit {
    pub unit: StoredUnit,
    pub score: u32,
}

/// Whether `unit` matches `query_lower` at all.
///
/// The empty query matches everything. `query_lower` must already be
/// lowercased; fields are lowercased here per check.
pub fn is_candidate(unit: &StoredUnit, query_lower: &str) -> bool {
    if query_lower.is_empty() {
        return true;
    }
    unit.name.to_lowercase().contains(query_lower)
        || unit.keywords.to_lowercase().contains(query_lower)
        || unit.snippet.to_lowercase().contains(query_lower)
        || unit.code.to_lowercase().contains(query_lower)
}

/// Tiered score for a candidate unit. Tiers are checked in priority
/// order and only the first matching tier counts; the floor score fires
/// exactly when the match lies past the snippet boundary in the full
/// code.
pub fn score_unit(unit: &StoredUnit, query_lower: &str) -> u32 {
    if unit.name.to_lowercase().contains(query_lower) {
        SCORE_NAME
    } else if unit.keywords.to_lowercase().contains(query_lower) {
        SCORE_KEYWORDS
    } else if unit.snippet.to_lowercase().contains(query_lower) {
        SCORE_SNIPPET
    } else {
        SCORE_CODE
    }
}

/// Search engine borrowing a store for the duration of one query.
#[derive(Debug)]
pub struct SearchEngine<'a> {
    store: &'a ProjectStore,
}

impl<'a> SearchEngine<'a> {
    pub fn new(store: &'a ProjectStore) -> Self {
        Self { store }
    }

    /// Run a keyword search.
    ///
    /// An unknown project name in the options simply yields zero hits;
    /// filters narrow, they do not validate.
    pub fn search(&self, query: &str, options: &SearchOptions) -> Result<Vec<SearchHit>> {
        let query_lower = query.to_lowercase();
        let units = self
            .store
            .query_units(options.project.as_deref(), options.kind)?;

        let mut hits: Vec<SearchHit> = units
            .into_iter()
            .filter(|unit| is_candidate(unit, &query_lower))
            .map(|unit| {
                let score = score_unit(&unit, &query_lower);
                SearchHit { unit, score }
            })
            .collect();

        hits.sort_by(|a, b| {
            b.score
                .cmp(&a.score)
                .then_with(|| a.unit.name.cmp(&b.unit.name))
        });
        hits.truncate(options.limit);
        Ok(hits)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
