//! Tool Registry - central registration and dispatch for all tools.
//!
//! This module provides:
//! - A registry of all available tools
//! - HTTP dispatch for tool calls (when http feature is enabled)
//! - Tool metadata for listing

#[cfg(feature = "http")]
use tracing::warn;

use rmcp::model::Tool;

use super::context::ToolContext;
use super::definitions::{
    CollectionTool, DetailsTool, HotTool, PriceTool, RecommenderTool, RulesTool, SearchTool,
    ThreadDetailsTool, ToolDefinition, TradeFinderTool, UserTool,
};

/// Tool registry - manages all available tools.
pub struct ToolRegistry {
    #[cfg_attr(not(feature = "http"), allow(dead_code))]
    ctx: ToolContext,
}

impl ToolRegistry {
    /// Create a new tool registry.
    pub fn new(ctx: ToolContext) -> Self {
        Self { ctx }
    }

    /// Get all tool names.
    pub fn tool_names(&self) -> Vec<&'static str> {
        vec![
            SearchTool::NAME,
            DetailsTool::NAME,
            CollectionTool::NAME,
            HotTool::NAME,
            UserTool::NAME,
            PriceTool::NAME,
            TradeFinderTool::NAME,
            RecommenderTool::NAME,
            RulesTool::NAME,
            ThreadDetailsTool::NAME,
        ]
    }

    /// Get all tools as Tool models (metadata).
    ///
    /// Both transports list tools from here or from the router built with
    /// the same definitions.
    pub fn get_all_tools() -> Vec<Tool> {
        vec![
            SearchTool::to_tool(),
            DetailsTool::to_tool(),
            CollectionTool::to_tool(),
            HotTool::to_tool(),
            UserTool::to_tool(),
            PriceTool::to_tool(),
            TradeFinderTool::to_tool(),
            RecommenderTool::to_tool(),
            RulesTool::to_tool(),
            ThreadDetailsTool::to_tool(),
        ]
    }

    /// Dispatch an HTTP tool call to the appropriate tool.
    ///
    /// Returns the serialized `CallToolResult`.
    #[cfg(feature = "http")]
    pub async fn call_tool(
        &self,
        name: &str,
        arguments: serde_json::Value,
    ) -> Result<serde_json::Value, String> {
        let ctx = self.ctx.clone();
        let result = match name {
            SearchTool::NAME => SearchTool::invoke(arguments, ctx).await,
            DetailsTool::NAME => DetailsTool::invoke(arguments, ctx).await,
            CollectionTool::NAME => CollectionTool::invoke(arguments, ctx).await,
            HotTool::NAME => HotTool::invoke(arguments, ctx).await,
            UserTool::NAME => UserTool::invoke(arguments, ctx).await,
            PriceTool::NAME => PriceTool::invoke(arguments, ctx).await,
            TradeFinderTool::NAME => TradeFinderTool::invoke(arguments, ctx).await,
            RecommenderTool::NAME => RecommenderTool::invoke(arguments, ctx).await,
            RulesTool::NAME => RulesTool::invoke(arguments, ctx).await,
            ThreadDetailsTool::NAME => ThreadDetailsTool::invoke(arguments, ctx).await,
            _ => {
                warn!("Unknown tool requested: {}", name);
                return Err(format!("Unknown tool: {}", name));
            }
        };

        serde_json::to_value(result).map_err(|e| e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bgg::testing::StubBgg;
    use crate::domains::tools::context::test_support::stub_context;

    #[test]
    fn test_registry_tool_names() {
        let registry = ToolRegistry::new(stub_context(StubBgg::default(), None));
        let names = registry.tool_names();
        assert_eq!(names.len(), 10);
        assert!(names.contains(&"bgg-search"));
        assert!(names.contains(&"bgg-recommender"));
        assert!(names.contains(&"bgg-rules"));
        assert_eq!(ToolRegistry::get_all_tools().len(), names.len());
    }

    #[test]
    fn test_tool_schemas_are_objects() {
        for tool in ToolRegistry::get_all_tools() {
            assert_eq!(
                tool.input_schema.get("type").and_then(|t| t.as_str()),
                Some("object"),
                "{} schema",
                tool.name
            );
        }
    }

    #[cfg(feature = "http")]
    #[tokio::test]
    async fn test_registry_call_search() {
        use crate::bgg::testing::{hit, thing};

        let stub = StubBgg {
            search_hits: vec![hit(13, "Catan", "boardgame")],
            things: vec![thing(13, "Catan", 100_000)],
            ..StubBgg::default()
        };
        let registry = ToolRegistry::new(stub_context(stub, None));
        let result = registry
            .call_tool("bgg-search", serde_json::json!({ "query": "Catan" }))
            .await
            .unwrap();
        let text = result["content"][0]["text"].as_str().unwrap();
        assert!(text.contains("\"name\":\"Catan\""));
    }

    #[cfg(feature = "http")]
    #[tokio::test]
    async fn test_registry_call_unknown() {
        let registry = ToolRegistry::new(stub_context(StubBgg::default(), None));
        let result = registry.call_tool("unknown", serde_json::json!({})).await;
        assert!(result.is_err());
    }
}
