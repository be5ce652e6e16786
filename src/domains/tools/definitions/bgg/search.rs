//! Game search tool.

use schemars::JsonSchema;
use serde::Deserialize;

use crate::bgg::BggApi;
use crate::domains::tools::definitions::ToolDefinition;
use crate::domains::tools::{ToolContext, ToolError};

use super::common::{GameSummary, loose_count, to_json};
use super::ranking::{GameType, rank_search_results};

const DEFAULT_LIMIT: usize = 30;

/// Parameters for `bgg-search`.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct SearchParams {
    /// Game name or part of a name.
    #[schemars(description = "Game name to search for on BoardGameGeek (BGG)")]
    pub query: String,

    #[schemars(description = "Maximum number of results to return (default: 30)")]
    #[serde(default, deserialize_with = "loose_count")]
    pub limit: Option<u32>,

    #[schemars(
        description = "Filter by type (default: all, options: 'boardgame' (aka base game), 'boardgameexpansion', or 'all')"
    )]
    #[serde(default, rename = "type")]
    pub kind: GameType,
}

impl SearchParams {
    /// The requested limit, or the default when missing or zero.
    pub fn limit(&self) -> usize {
        self.limit
            .filter(|n| *n > 0)
            .map_or(DEFAULT_LIMIT, |n| n as usize)
    }
}

/// Ranked name search returning game summaries.
#[derive(Debug, Clone)]
pub struct SearchTool;

impl ToolDefinition for SearchTool {
    const NAME: &'static str = "bgg-search";
    const DESCRIPTION: &'static str = "Search for board games on BoardGameGeek (BGG) by name or part of a name using a broad search (e.g., 'Catan', 'Ticket to Ride')";

    type Params = SearchParams;

    fn execute(
        params: SearchParams,
        api: &dyn BggApi,
        _ctx: &ToolContext,
    ) -> Result<String, ToolError> {
        let games = rank_search_results(api, &params.query, params.kind, params.limit())?;
        to_json(&GameSummary::from_things(&games))
    }
}
