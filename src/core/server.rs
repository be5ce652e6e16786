//! MCP Server implementation and lifecycle management.
//!
//! The handler delegates tool calls to the router built in
//! `domains/tools/router.rs` and prompt requests to the `PromptService`.
//! **Adding a new tool does NOT require modifying this file!**

use rmcp::{
    ErrorData as McpError, RoleServer, ServerHandler, handler::server::tool::ToolRouter, model::*,
    service::RequestContext, tool_handler,
};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{info, instrument};

use super::config::Config;
use crate::domains::{
    prompts::PromptService,
    tools::{ToolContext, build_tool_router},
};

#[cfg(feature = "http")]
use crate::domains::tools::ToolRegistry;

/// Instructions reported to clients on initialization.
pub const SERVER_INSTRUCTIONS: &str = "BoardGameGeek MCP server. Search games, look up details, \
collections, users, the hotness list, retail prices, similar-game recommendations, rules \
discussions and trade opportunities between two users. Pass 'SELF' as a username to use the \
configured BGG_USERNAME.";

/// The main MCP server handler.
#[derive(Clone)]
pub struct McpServer {
    /// Server configuration.
    config: Arc<Config>,

    /// Configuration and client factory handed to each tool call.
    tool_context: ToolContext,

    /// Service for handling prompt-related requests.
    prompt_service: Arc<PromptService>,

    /// Tool router for handling tool calls.
    tool_router: ToolRouter<Self>,
}

impl McpServer {
    /// Create a new MCP server backed by the live BoardGameGeek client.
    pub fn new(config: Config) -> Self {
        Self::with_context(ToolContext::new(Arc::new(config)))
    }

    /// Create a server around an existing tool context.
    pub fn with_context(tool_context: ToolContext) -> Self {
        let config = tool_context.config().clone();
        let prompt_service = Arc::new(PromptService::new(config.prompts.clone()));

        Self {
            tool_router: build_tool_router::<Self>(tool_context.clone()),
            config,
            tool_context,
            prompt_service,
        }
    }

    /// Get the server name.
    pub fn name(&self) -> &str {
        &self.config.server.name
    }

    /// Get the server version.
    pub fn version(&self) -> &str {
        &self.config.server.version
    }

    /// Get the server configuration.
    pub fn config(&self) -> &Arc<Config> {
        &self.config
    }

    /// Get the context tools run with.
    pub fn tool_context(&self) -> &ToolContext {
        &self.tool_context
    }

    // ========================================================================
    // HTTP Transport Support Methods
    // ========================================================================

    /// List all available tools (for HTTP transport).
    pub fn list_tools(&self) -> Vec<serde_json::Value> {
        self.tool_router
            .list_all()
            .into_iter()
            .map(|t| {
                serde_json::json!({
                    "name": t.name,
                    "description": t.description,
                    "inputSchema": t.input_schema
                })
            })
            .collect()
    }

    /// Call a tool by name (for HTTP transport).
    #[cfg(feature = "http")]
    pub async fn call_tool(
        &self,
        name: &str,
        arguments: serde_json::Value,
    ) -> Result<serde_json::Value, String> {
        let registry = ToolRegistry::new(self.tool_context.clone());
        registry.call_tool(name, arguments).await
    }

    /// List all available prompts (for HTTP transport).
    pub async fn list_prompts(&self) -> Vec<serde_json::Value> {
        let prompts = self.prompt_service.list_prompts().await;

        prompts
            .into_iter()
            .map(|p| {
                serde_json::json!({
                    "name": p.name,
                    "title": p.title,
                    "description": p.description,
                    "arguments": p.arguments
                })
            })
            .collect()
    }

    /// Get a prompt by name (for HTTP transport).
    pub async fn get_prompt(
        &self,
        name: &str,
        arguments: Option<serde_json::Value>,
    ) -> Result<serde_json::Value, String> {
        let args = arguments.and_then(|v| v.as_object().map(string_arguments));

        match self.prompt_service.get_prompt(name, args).await {
            Ok(result) => Ok(serde_json::json!({
                "description": result.description,
                "messages": result.messages
            })),
            Err(e) => Err(e.to_string()),
        }
    }
}

/// Keep the string-valued prompt arguments.
fn string_arguments(map: &serde_json::Map<String, serde_json::Value>) -> HashMap<String, String> {
    map.iter()
        .filter_map(|(k, v)| v.as_str().map(|s| (k.clone(), s.to_string())))
        .collect()
}

#[tool_handler]
impl ServerHandler for McpServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            instructions: Some(SERVER_INSTRUCTIONS.to_string()),
            capabilities: ServerCapabilities::builder()
                .enable_tools()
                .enable_prompts()
                .build(),
            server_info: Implementation {
                name: self.config.server.name.clone(),
                version: self.config.server.version.clone(),
                ..Implementation::from_build_env()
            },
            ..Default::default()
        }
    }

    #[instrument(skip(self, _context))]
    async fn list_prompts(
        &self,
        _request: Option<PaginatedRequestParam>,
        _context: RequestContext<RoleServer>,
    ) -> Result<ListPromptsResult, McpError> {
        info!("Listing prompts");
        let prompts = self.prompt_service.list_prompts().await;
        Ok(ListPromptsResult {
            prompts,
            next_cursor: None,
            meta: None,
        })
    }

    #[instrument(skip(self, _context))]
    async fn get_prompt(
        &self,
        request: GetPromptRequestParam,
        _context: RequestContext<RoleServer>,
    ) -> Result<GetPromptResult, McpError> {
        info!("Getting prompt: {}", request.name);
        let arguments = request.arguments.as_ref().map(string_arguments);
        self.prompt_service
            .get_prompt(&request.name, arguments)
            .await
            .map_err(|e| McpError::invalid_params(e.to_string(), None))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bgg::testing::StubBgg;
    use crate::domains::tools::test_support::stub_context;

    fn server() -> McpServer {
        McpServer::with_context(stub_context(StubBgg::default(), Some("meeple_fan")))
    }

    #[test]
    fn test_lists_every_tool() {
        let tools = server().list_tools();
        assert_eq!(tools.len(), 10);
        assert!(tools.iter().any(|t| t["name"] == "bgg-trade-finder"));
        assert!(tools.iter().all(|t| t["inputSchema"].is_object()));
    }

    #[test]
    fn test_info_declares_tools_and_prompts() {
        let info = server().get_info();
        assert!(info.capabilities.tools.is_some());
        assert!(info.capabilities.prompts.is_some());
        assert!(info.capabilities.resources.is_none());
        assert_eq!(info.server_info.name, "bgg-mcp");
    }

    #[tokio::test]
    async fn test_get_prompt_over_http_shape() {
        let result = server()
            .get_prompt(
                "trade-sales-post",
                Some(serde_json::json!({"username": "meeple_fan", "currency": 42})),
            )
            .await
            .unwrap();
        let text = result["messages"][0]["content"]["text"].as_str().unwrap();
        assert!(text.contains("prices in USD currency"));
    }

    #[tokio::test]
    async fn test_get_prompt_missing_username() {
        let err = server()
            .get_prompt("game-recommendations", None)
            .await
            .unwrap_err();
        assert_eq!(err, "Missing required argument: username");
    }
}
