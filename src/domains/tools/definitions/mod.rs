//! Tool definitions module.
//!
//! Each tool lives in its own file under `bgg/` and implements
//! [`ToolDefinition`], which supplies the MCP metadata, the route used by the
//! rmcp router and the dispatch used by the HTTP transport.

pub mod bgg;

use futures::FutureExt;
use futures::future::BoxFuture;
use rmcp::{
    handler::server::tool::{ToolCallContext, ToolRoute, cached_schema_for_type},
    model::{CallToolResult, Tool},
};
use schemars::JsonSchema;
use serde::de::DeserializeOwned;
use tracing::{info, warn};

use crate::bgg::BggApi;

use super::context::ToolContext;
use super::error::ToolError;

pub use bgg::{
    CollectionTool, DetailsTool, HotTool, PriceTool, RecommenderTool, RulesTool, SearchTool,
    ThreadDetailsTool, TradeFinderTool, UserTool,
};

/// A named operation exposed to MCP clients.
///
/// Implementors only describe their parameters and the blocking work; calling
/// conventions are shared. Failures are returned to the caller as plain text
/// in a successful result.
pub trait ToolDefinition {
    /// Tool name as registered in MCP.
    const NAME: &'static str;

    /// Tool description shown to clients.
    const DESCRIPTION: &'static str;

    /// Validated arguments.
    type Params: DeserializeOwned + JsonSchema + Send + 'static;

    /// Run the tool against a data client. Blocking.
    fn execute(
        params: Self::Params,
        api: &dyn BggApi,
        ctx: &ToolContext,
    ) -> Result<String, ToolError>;

    /// Create a Tool model for this tool (metadata).
    fn to_tool() -> Tool
    where
        Self: Sized,
    {
        Tool {
            name: Self::NAME.into(),
            description: Some(Self::DESCRIPTION.into()),
            input_schema: cached_schema_for_type::<Self::Params>(),
            annotations: None,
            output_schema: None,
            icons: None,
            meta: None,
            title: None,
        }
    }

    /// Parse arguments, connect and execute. Blocking.
    fn run(arguments: serde_json::Value, ctx: &ToolContext) -> CallToolResult
    where
        Self: Sized,
    {
        let arguments = match arguments {
            serde_json::Value::Null => serde_json::Value::Object(Default::default()),
            other => other,
        };
        let params: Self::Params = match serde_json::from_value(arguments) {
            Ok(params) => params,
            Err(e) => {
                return bgg::common::diagnostic_result(&format!(
                    "Invalid arguments for {}: {}",
                    Self::NAME,
                    e
                ));
            }
        };

        info!("Calling tool {}", Self::NAME);

        let outcome = ctx
            .connect()
            .map_err(|e| ToolError::remote("Failed to create BoardGameGeek client", e))
            .and_then(|api| Self::execute(params, api.as_ref(), ctx));

        match outcome {
            Ok(text) => bgg::common::success_result(text),
            Err(e) => {
                warn!(tool = Self::NAME, "{}", e);
                bgg::common::diagnostic_result(&e.to_string())
            }
        }
    }

    /// Run on the blocking pool; the HTTP client must not block the runtime.
    fn invoke(arguments: serde_json::Value, ctx: ToolContext) -> BoxFuture<'static, CallToolResult>
    where
        Self: Sized + 'static,
    {
        async move {
            tokio::task::spawn_blocking(move || Self::run(arguments, &ctx))
                .await
                .unwrap_or_else(|e| {
                    bgg::common::diagnostic_result(&format!("Task failed: {}", e))
                })
        }
        .boxed()
    }

    /// Create a ToolRoute for the rmcp router.
    fn create_route<S>(ctx: ToolContext) -> ToolRoute<S>
    where
        Self: Sized + 'static,
        S: Send + Sync + 'static,
    {
        ToolRoute::new_dyn(Self::to_tool(), move |call: ToolCallContext<'_, S>| {
            let arguments = call
                .arguments
                .clone()
                .map(serde_json::Value::Object)
                .unwrap_or(serde_json::Value::Null);
            let invocation = Self::invoke(arguments, ctx.clone());
            async move { Ok(invocation.await) }.boxed()
        })
    }
}
