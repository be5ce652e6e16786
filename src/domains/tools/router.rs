//! Tool Router - builds the rmcp ToolRouter.
//!
//! Each tool knows how to create its own route; this module only lists them.

use rmcp::handler::server::tool::ToolRouter;

use super::context::ToolContext;
use super::definitions::{
    CollectionTool, DetailsTool, HotTool, PriceTool, RecommenderTool, RulesTool, SearchTool,
    ThreadDetailsTool, ToolDefinition, TradeFinderTool, UserTool,
};

/// Build the tool router with all registered tools.
pub fn build_tool_router<S>(ctx: ToolContext) -> ToolRouter<S>
where
    S: Send + Sync + 'static,
{
    ToolRouter::new()
        .with_route(SearchTool::create_route(ctx.clone()))
        .with_route(DetailsTool::create_route(ctx.clone()))
        .with_route(CollectionTool::create_route(ctx.clone()))
        .with_route(HotTool::create_route(ctx.clone()))
        .with_route(UserTool::create_route(ctx.clone()))
        .with_route(PriceTool::create_route(ctx.clone()))
        .with_route(TradeFinderTool::create_route(ctx.clone()))
        .with_route(RecommenderTool::create_route(ctx.clone()))
        .with_route(RulesTool::create_route(ctx.clone()))
        .with_route(ThreadDetailsTool::create_route(ctx))
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::super::registry::ToolRegistry;
    use super::*;
    use crate::core::config::Config;

    struct TestServer {}

    fn test_context() -> ToolContext {
        ToolContext::new(Arc::new(Config::default()))
    }

    #[test]
    fn test_build_router() {
        let router: ToolRouter<TestServer> = build_tool_router(test_context());
        let tools = router.list_all();
        assert_eq!(tools.len(), 10);

        let names: Vec<_> = tools.iter().map(|t| t.name.as_ref()).collect();
        assert!(names.contains(&"bgg-search"));
        assert!(names.contains(&"bgg-details"));
        assert!(names.contains(&"bgg-collection"));
        assert!(names.contains(&"bgg-hot"));
        assert!(names.contains(&"bgg-trade-finder"));
        assert!(names.contains(&"bgg-thread-details"));
    }

    #[test]
    fn test_registry_matches_router() {
        // Ensure registry and router have the same tools
        let ctx = test_context();
        let registry = ToolRegistry::new(ctx.clone());
        let registry_names = registry.tool_names();

        let router: ToolRouter<TestServer> = build_tool_router(ctx);
        let router_tools = router.list_all();
        let router_names: Vec<_> = router_tools.iter().map(|t| t.name.as_ref()).collect();

        assert_eq!(registry_names.len(), router_names.len());
        for name in registry_names {
            assert!(router_names.contains(&name));
        }
    }
}
