//! Match-quality tiers and result ranking.

use super::tokenize::{is_abbreviation_query, normalize_text};
use crate::record::SymbolRecord;
use serde::Serialize;
use std::cmp::Ordering;

/// How a record matched the query, best first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchTier {
    /// Search key equals the query.
    Exact,
    /// Search key starts with the query.
    Prefix,
    /// Query appears elsewhere in the search key.
    Substring,
    /// Query spells out successive segment initials of the label.
    Initials,
}

/// Classifies a record against an already normalized query.
///
/// Returns `None` when the record does not match at all.
pub fn match_tier(record: &SymbolRecord, normalized_query: &str) -> Option<MatchTier> {
    if normalized_query.is_empty() {
        return None;
    }

    let key = record.search_key();
    if key == normalized_query {
        Some(MatchTier::Exact)
    } else if key.starts_with(normalized_query) {
        Some(MatchTier::Prefix)
    } else if key.contains(normalized_query) {
        Some(MatchTier::Substring)
    } else if is_abbreviation_query(normalized_query) && record.initials().contains(normalized_query)
    {
        Some(MatchTier::Initials)
    } else {
        None
    }
}

/// A candidate with its assigned tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RankedMatch<'a> {
    pub record: &'a SymbolRecord,
    pub tier: MatchTier,
}

/// Orders candidates by tier, then specificity, then category priority, then
/// search key. The sort is stable, so fully tied candidates keep their input
/// (snapshot) order. Candidates that do not match the query are dropped.
pub fn rank<'a>(
    candidates: impl IntoIterator<Item = &'a SymbolRecord>,
    query: &str,
) -> Vec<&'a SymbolRecord> {
    rank_matches(candidates, query)
        .into_iter()
        .map(|ranked| ranked.record)
        .collect()
}

/// Like [`rank`], keeping the tier of every result.
pub fn rank_matches<'a>(
    candidates: impl IntoIterator<Item = &'a SymbolRecord>,
    query: &str,
) -> Vec<RankedMatch<'a>> {
    let normalized = normalize_text(query);

    let mut ranked: Vec<RankedMatch<'a>> = candidates
        .into_iter()
        .filter_map(|record| {
            match_tier(record, &normalized).map(|tier| RankedMatch { record, tier })
        })
        .collect();

    ranked.sort_by(compare_ranked);
    ranked
}

fn compare_ranked(a: &RankedMatch<'_>, b: &RankedMatch<'_>) -> Ordering {
    a.tier
        .cmp(&b.tier)
        // Fewer name segments means a more specific label
        .then_with(|| a.record.segment_count().cmp(&b.record.segment_count()))
        .then_with(|| {
            a.record
                .category()
                .priority()
                .cmp(&b.record.category().priority())
        })
        .then_with(|| a.record.search_key().cmp(b.record.search_key()))
}
