//! Index loading handler.

use crate::config::expand_tilde;
use crate::record::Category;
use crate::search::IndexSnapshot;
use crate::state::LookupState;
use rmcp::schemars;
use serde::Deserialize;
use std::fmt::Write as _;
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct LoadIndexRequest {
    /// Javadoc output directories or *-search-index.js files. `~` is expanded.
    pub paths: Vec<String>,
}

/// Loads the given search-index files and rebuilds the symbol index.
pub async fn handle_load_index(
    state: &Arc<LookupState>,
    request: LoadIndexRequest,
) -> Result<String, String> {
    if request.paths.is_empty() {
        return Err("No paths given. Pass a javadoc directory or search-index file.".to_string());
    }

    let paths: Vec<PathBuf> = request
        .paths
        .iter()
        .map(|p| PathBuf::from(expand_tilde(p).into_owned()))
        .collect();
    let path_count = paths.len();

    let report = state.load(paths).await?;
    let snapshot = state.snapshot().await.map_err(|e| e.to_string())?;

    let mut output = format!(
        "Indexed {} symbols from {} path(s).\n",
        report.indexed, path_count
    );
    if report.dropped > 0 || report.duplicates > 0 {
        let _ = writeln!(
            output,
            "Skipped {} malformed and {} duplicate entries.",
            report.dropped, report.duplicates
        );
    }
    output.push('\n');
    output.push_str(&format_category_counts(&snapshot));
    Ok(output)
}

/// One line per category, in ranking priority order.
pub fn format_category_counts(snapshot: &IndexSnapshot) -> String {
    let mut output = String::new();
    for category in Category::BY_PRIORITY {
        let _ = writeln!(output, "• {}: {}", category, snapshot.category_count(category));
    }
    output
}
