//! Selection handler: hands back the link target of a presented result.

use crate::state::LookupState;
use rmcp::schemars;
use serde::Deserialize;
use std::sync::Arc;

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct SelectRequest {
    /// 1-based result number as shown by lookup
    pub number: usize,
}

pub async fn handle_select(state: &Arc<LookupState>, request: SelectRequest) -> Result<String, String> {
    let position = request
        .number
        .checked_sub(1)
        .ok_or_else(|| "Result numbers start at 1.".to_string())?;

    let selection = state.select(position).await.map_err(|e| e.to_string())?;
    Ok(match selection.target {
        Some(target) => format!("`{}` → {}", selection.qualified_name, target),
        None => format!("`{}` has no link target.", selection.qualified_name),
    })
}
