//! User profile tool.

use schemars::JsonSchema;
use serde::Deserialize;

use crate::bgg::BggApi;
use crate::domains::tools::definitions::ToolDefinition;
use crate::domains::tools::{ToolContext, ToolError};

use super::common::to_json;

/// Parameters for `bgg-user`.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct UserParams {
    #[schemars(
        description = "The username of the BoardGameGeek (BGG) user. When the user refers to themselves (me, my, I), use 'SELF' as the value."
    )]
    pub username: String,
}

#[derive(Debug, Clone)]
pub struct UserTool;

impl ToolDefinition for UserTool {
    const NAME: &'static str = "bgg-user";
    const DESCRIPTION: &'static str = "Find details about a specific user on BoardGameGeek (BGG)";

    type Params = UserParams;

    fn execute(params: UserParams, api: &dyn BggApi, ctx: &ToolContext) -> Result<String, ToolError> {
        if params.username.trim().is_empty() {
            return Err(ToolError::invalid_arguments("Username is required"));
        }
        let username = ctx.resolve_username(params.username.trim())?;

        let user = api
            .user(&username)
            .map_err(|e| ToolError::remote("Error fetching user", e))?;
        to_json(&user)
    }
}
