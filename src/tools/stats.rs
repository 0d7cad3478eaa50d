//! Index statistics handler.

use super::load_index::format_category_counts;
use crate::state::LookupState;
use std::sync::Arc;

pub async fn handle_index_stats(state: &Arc<LookupState>) -> Result<String, String> {
    let snapshot = state.snapshot().await.map_err(|e| e.to_string())?;
    let report = snapshot.report();

    let mut output = format!(
        "Symbol index generation {}: {} symbols ({} dropped, {} duplicates collapsed)\n\n",
        snapshot.generation(),
        report.indexed,
        report.dropped,
        report.duplicates
    );
    output.push_str(&format_category_counts(&snapshot));
    Ok(output)
}
