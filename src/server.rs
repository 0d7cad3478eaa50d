//! MCP server exposing the symbol lookup tools.

use crate::config::LookupConfig;
use crate::state::LookupState;
use crate::tools::{
    LoadIndexRequest, LookupRequest, SelectRequest, handle_index_stats, handle_load_index,
    handle_lookup, handle_select,
};
use rmcp::{
    ServerHandler,
    handler::server::{router::tool::ToolRouter, wrapper::Parameters},
    model::*,
    schemars::{self, JsonSchema, generate::SchemaSettings},
    tool, tool_handler, tool_router,
};
use std::sync::Arc;

/// MCP server for javadoc symbol lookup
#[derive(Clone)]
pub struct SymbolServer {
    /// Index and session shared across tool calls
    state: Arc<LookupState>,

    /// Tool router for handling MCP tool calls
    tool_router: ToolRouter<Self>,
}

impl std::fmt::Debug for SymbolServer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SymbolServer")
            .field("state", &self.state)
            .finish()
    }
}

#[tool_router]
impl SymbolServer {
    pub fn new(config: LookupConfig) -> Self {
        Self::with_state(Arc::new(LookupState::new(config)))
    }

    pub fn with_state(state: Arc<LookupState>) -> Self {
        Self {
            state,
            tool_router: Self::tool_router(),
        }
    }

    pub const fn state(&self) -> &Arc<LookupState> {
        &self.state
    }

    #[tool(
        description = "Load javadoc search-index files (type-, member-, package-, module- and tag-search-index.js) from the given files or javadoc output directories and rebuild the symbol index. Replaces any previously loaded index.",
        input_schema = inline_schema_for_type::<LoadIndexRequest>()
    )]
    async fn load_index(
        &self,
        Parameters(request): Parameters<LoadIndexRequest>,
    ) -> std::result::Result<String, String> {
        handle_load_index(&self.state, request)
            .await
            .map_err(|e| format!("Failed to load index: {}", e))
    }

    #[tool(
        description = "Look up Java symbols (packages, classes, members, tags) by the text typed so far. Matches case-insensitive substrings and camel-case initials ('gcd' finds GradientCornerDetector). Results are ranked exact, prefix, substring, then initials, and numbered for use with select. Each call supersedes the previous query; an empty query clears the session.",
        input_schema = inline_schema_for_type::<LookupRequest>()
    )]
    async fn lookup(
        &self,
        Parameters(request): Parameters<LookupRequest>,
    ) -> std::result::Result<String, String> {
        handle_lookup(&self.state, request).await
    }

    #[tool(
        description = "Select a result of the latest lookup by its number and return its documentation link target."
    )]
    async fn select(
        &self,
        Parameters(request): Parameters<SelectRequest>,
    ) -> std::result::Result<String, String> {
        handle_select(&self.state, request).await
    }

    #[tool(description = "Show symbol counts per category for the loaded index.")]
    async fn index_stats(&self) -> std::result::Result<String, String> {
        handle_index_stats(&self.state).await
    }
}

#[tool_handler]
impl ServerHandler for SymbolServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo::new(ServerCapabilities::builder().enable_tools().build())
            .with_protocol_version(ProtocolVersion::V_2024_11_05)
            .with_server_info(Implementation::from_build_env())
            .with_instructions(
                "docsearch: incremental symbol lookup over javadoc search indexes. \
                 Use load_index with a javadoc output directory unless one was preloaded, \
                 then call lookup as the query grows and select to get a result's link.",
            )
    }
}

/// Generate an inline JSON schema for MCP tools
///
/// Unlike rmcp's default `schema_for_type()`, this function sets `inline_subschemas = true`
/// to generate inline enum definitions instead of $ref patterns. This ensures MCP Inspector
/// displays enums as dropdown widgets rather than raw JSON input fields.
pub fn inline_schema_for_type<T: JsonSchema>() -> Arc<JsonObject> {
    let mut settings = SchemaSettings::draft07();
    settings.transforms = vec![Box::new(schemars::transform::AddNullable::default())];
    settings.inline_subschemas = true;

    let generator = settings.into_generator();
    let schema = generator.into_root_schema_for::<T>();
    let object = serde_json::to_value(schema).expect("failed to serialize schema");

    let json_object = match object {
        serde_json::Value::Object(object) => object,
        _ => panic!("Schema serialization produced non-object value"),
    };

    Arc::new(json_object)
}
