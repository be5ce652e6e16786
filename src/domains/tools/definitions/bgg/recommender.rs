//! Similar-game recommendation tool.

use schemars::JsonSchema;
use serde::Deserialize;

use crate::bgg::{BggApi, Thing};
use crate::domains::tools::definitions::ToolDefinition;
use crate::domains::tools::{ToolContext, ToolError};

use super::common::{GameSummary, LooseId, to_json};
use super::ranking::{GameType, rank_search_results};

pub const DEFAULT_MIN_VOTES: u32 = 30;

/// Parameters for `bgg-recommender`.
#[derive(Debug, Clone, Default, Deserialize, JsonSchema)]
pub struct RecommenderParams {
    #[schemars(description = "Name of the game to base recommendations on (slower than using ID)")]
    #[serde(default)]
    pub name: Option<String>,

    #[schemars(
        description = "BoardGameGeek (BGG) ID of the game to base recommendations on (preferred for speed)"
    )]
    #[serde(default)]
    pub id: Option<LooseId>,

    #[schemars(description = "Minimum votes threshold for recommendation quality (default: 30)")]
    #[serde(default)]
    pub min_votes: Option<f64>,
}

impl RecommenderParams {
    /// Positive vote threshold, falling back to the default.
    pub fn min_votes(&self) -> u32 {
        self.min_votes
            .filter(|v| *v >= 1.0)
            .map(|v| v as u32)
            .unwrap_or(DEFAULT_MIN_VOTES)
    }
}

/// Look up the game to base recommendations on. A name wins over an id.
pub fn resolve_game_id(
    api: &dyn BggApi,
    name: Option<&str>,
    id: Option<&LooseId>,
) -> Result<u64, ToolError> {
    if let Some(name) = name.map(str::trim).filter(|n| !n.is_empty()) {
        let games = rank_search_results(api, name, GameType::BoardGame, 1)
            .map_err(|e| ToolError::not_found(format!("Error finding game by name: {}", e)))?;
        return games
            .first()
            .map(|game| game.id)
            .ok_or_else(|| ToolError::not_found("No games found with that name"));
    }

    match id {
        Some(id) => id
            .value()
            .ok_or_else(|| ToolError::invalid_arguments("BGG ID must be a valid number")),
        None => Err(ToolError::invalid_arguments(
            "Either 'name' or 'id' parameter must be provided",
        )),
    }
}

/// Full records for up to ten games similar to `game_id`.
pub fn recommend(api: &dyn BggApi, game_id: u64, min_votes: u32) -> Result<Vec<Thing>, ToolError> {
    let ids = api
        .similar_games(game_id, min_votes)
        .map_err(|e| ToolError::remote("Error fetching recommendations", e))?;

    if ids.is_empty() {
        return Err(ToolError::not_found("No recommendations found"));
    }

    api.things(&ids)
        .map_err(|e| ToolError::remote("Error fetching game details", e))
}

#[derive(Debug, Clone)]
pub struct RecommenderTool;

impl ToolDefinition for RecommenderTool {
    const NAME: &'static str = "bgg-recommender";
    const DESCRIPTION: &'static str = "Get game recommendations based on a specific game using either the BoardGameGeek (BGG) ID or name directly. ID is preferred for faster responses.";

    type Params = RecommenderParams;

    fn execute(
        params: RecommenderParams,
        api: &dyn BggApi,
        _ctx: &ToolContext,
    ) -> Result<String, ToolError> {
        let game_id = resolve_game_id(api, params.name.as_deref(), params.id.as_ref())?;
        let games = recommend(api, game_id, params.min_votes())?;
        to_json(&GameSummary::from_things(&games))
    }
}
