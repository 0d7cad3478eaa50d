//! Symbol lookup handler: one search-box keystroke per request.

use crate::error::LookupError;
use crate::record::Category;
use crate::search::MatchTier;
use crate::session::ResultSet;
use crate::state::{LookupOutcome, LookupState};
use rmcp::schemars;
use serde::Deserialize;
use std::fmt::Write as _;
use std::sync::Arc;

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct LookupRequest {
    /// Current search-box text. An empty query clears the session.
    pub query: String,
    /// Only show results of this category
    #[serde(default)]
    pub category: Option<Category>,
    /// Maximum number of results to show (default: 25)
    #[serde(default = "default_limit")]
    pub limit: Option<usize>,
}

fn default_limit() -> Option<usize> {
    Some(25)
}

/// Execute a lookup against the loaded symbol index.
pub async fn handle_lookup(state: &Arc<LookupState>, request: LookupRequest) -> Result<String, String> {
    let results = match state.lookup(&request.query).await {
        Ok(LookupOutcome::Presented(results)) => results,
        Ok(LookupOutcome::Superseded) => {
            return Ok(format!(
                "Lookup for '{}' was superseded by a newer query; its results were discarded.",
                request.query
            ));
        }
        Ok(LookupOutcome::Cleared) => {
            return Ok(
                "Query is empty. Type part of a class, member or package name.".to_string(),
            );
        }
        Err(LookupError::NotBuilt) => {
            return Err("No symbol index loaded.\n\n\
                 Use load_index with the path of a javadoc output directory \
                 or a *-search-index.js file."
                .to_string());
        }
        Err(e) => return Err(e.to_string()),
    };

    if results.is_empty() {
        let mut msg = format!("No symbols match '{}'.\n\n", request.query);
        msg.push_str("Search tips:\n");
        msg.push_str("• Try a shorter part of the name\n");
        msg.push_str("• Camel-case initials work: 'gcd' finds GradientCornerDetector\n");
        msg.push_str("• Member signatures are searchable: 'getx(' finds getX()\n");
        return Ok(msg);
    }

    Ok(format_results(
        &results,
        request.category,
        request.limit.unwrap_or(25),
    ))
}

/// Formats a result set as a numbered list.
///
/// Numbers are 1-based positions in the full result set, so they stay valid for
/// `select` when a category filter or limit hides some hits.
pub fn format_results(results: &ResultSet, category: Option<Category>, limit: usize) -> String {
    let mut output = if results.is_truncated() {
        format!(
            "Symbols matching '{}' ({} total, first {} kept by max_results):\n\n",
            results.query(),
            results.total_matches(),
            results.len()
        )
    } else {
        format!(
            "Symbols matching '{}' ({} total):\n\n",
            results.query(),
            results.len()
        )
    };

    let shown = results
        .hits()
        .iter()
        .enumerate()
        .filter(|(_, hit)| category.is_none_or(|c| hit.record.category() == c))
        .take(limit);

    let mut count = 0;
    for (position, hit) in shown {
        count += 1;
        let record = &hit.record;
        let _ = writeln!(
            output,
            "{}. `{}` ({}, {})",
            position + 1,
            record.qualified_name(),
            record.category(),
            tier_str(hit.tier)
        );
        if let Some(target) = record.target() {
            let _ = writeln!(output, "   → {}", target);
        }
    }

    if count == 0 {
        if let Some(category) = category {
            if results.is_truncated() {
                let _ = writeln!(
                    output,
                    "No {} results among the first {} matches; raise max_results to see the rest.",
                    category,
                    results.len()
                );
            } else {
                let _ = writeln!(output, "No {} results; remove the category filter to see all.", category);
            }
        }
    } else if count < results.len() {
        let _ = writeln!(output, "\n({} of {} shown)", count, results.len());
    }

    output
}

const fn tier_str(tier: MatchTier) -> &'static str {
    match tier {
        MatchTier::Exact => "exact",
        MatchTier::Prefix => "prefix",
        MatchTier::Substring => "substring",
        MatchTier::Initials => "initials",
    }
}
