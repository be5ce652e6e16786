//! Forum thread tool.

use schemars::JsonSchema;
use serde::Deserialize;

use crate::bgg::BggApi;
use crate::domains::tools::definitions::ToolDefinition;
use crate::domains::tools::{ToolContext, ToolError};

use super::common::{LooseId, to_pretty_json};

/// Parameters for `bgg-thread-details`.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct ThreadDetailsParams {
    #[schemars(description = "The BoardGameGeek thread ID to fetch")]
    pub thread_id: LooseId,
}

#[derive(Debug, Clone)]
pub struct ThreadDetailsTool;

impl ToolDefinition for ThreadDetailsTool {
    const NAME: &'static str = "bgg-thread-details";
    const DESCRIPTION: &'static str = "Get full content of a specific BoardGameGeek forum thread, including all posts and replies. Use this after finding relevant threads with bgg-rules.";

    type Params = ThreadDetailsParams;

    fn execute(
        params: ThreadDetailsParams,
        api: &dyn BggApi,
        _ctx: &ToolContext,
    ) -> Result<String, ToolError> {
        let thread_id = params
            .thread_id
            .value()
            .ok_or_else(|| ToolError::invalid_arguments("Invalid thread ID format"))?;

        let thread = api
            .thread(thread_id)
            .map_err(|e| ToolError::remote("Failed to get thread details", e))?;
        to_pretty_json(&thread)
    }
}
