//! User collection tool.

use schemars::JsonSchema;
use serde::Deserialize;

use crate::bgg::{BggApi, CollectionQuery};
use crate::domains::tools::definitions::ToolDefinition;
use crate::domains::tools::{ToolContext, ToolError};

use super::common::{loose_count, to_json};

/// Parameters for `bgg-collection`.
///
/// Flag names follow the BoardGameGeek collection filters.
#[derive(Debug, Clone, Default, Deserialize, JsonSchema)]
pub struct CollectionParams {
    #[schemars(
        description = "The username of the BoardGameGeek (BGG) user who owns the collection. When the user refers to themselves (me, my, I), use 'SELF' as the value."
    )]
    #[serde(default)]
    pub username: String,

    #[schemars(
        description = "Filter by game type: 'boardgame' for base games only (excludes expansions), 'boardgameexpansion' for expansions only"
    )]
    #[serde(default)]
    pub subtype: Option<String>,

    #[schemars(
        description = "Filters for owned games in the collection (default: true if no ownership filters specified)"
    )]
    #[serde(default)]
    pub owned: Option<bool>,

    #[schemars(description = "Filters for wishlisted games in the collection")]
    #[serde(default)]
    pub wishlist: Option<bool>,

    #[schemars(description = "Filters for preordered games in the collection")]
    #[serde(default)]
    pub preordered: Option<bool>,

    #[schemars(description = "Filters for games that are marked for trade in the collection")]
    #[serde(default)]
    pub fortrade: Option<bool>,

    #[schemars(description = "Filters for games that are rated in the collection")]
    #[serde(default)]
    pub rated: Option<bool>,

    #[schemars(description = "Filters for games that the user wants to play in the collection")]
    #[serde(default)]
    pub wanttoplay: Option<bool>,

    #[schemars(description = "Filters for games that have recorded plays in the collection")]
    #[serde(default)]
    pub played: Option<bool>,

    #[schemars(description = "Filters for games that the user wants to buy in the collection")]
    #[serde(default)]
    pub wanttobuy: Option<bool>,

    #[schemars(description = "Filters for games that have spare parts or not in the collection")]
    #[serde(default)]
    pub hasparts: Option<bool>,

    #[schemars(description = "Filters based on the minimum personal rating of the games in the collection")]
    #[serde(default)]
    pub minrating: Option<f64>,

    #[schemars(description = "Filters based on the maximum personal rating of the games in the collection")]
    #[serde(default)]
    pub maxrating: Option<f64>,

    #[schemars(
        description = "Filters based on the minimum global BoardGameGeek (BGG) rating of the games in the collection"
    )]
    #[serde(default)]
    pub minbggrating: Option<f64>,

    #[schemars(
        description = "Filters based on the maximum global BoardGameGeek (BGG) rating of the games in the collection"
    )]
    #[serde(default)]
    pub maxbggrating: Option<f64>,

    #[schemars(description = "Filters based on the minimum number of plays of the games in the collection")]
    #[serde(default, deserialize_with = "loose_count")]
    pub minplays: Option<u32>,

    #[schemars(description = "Filters based on the maximum number of plays of the games in the collection")]
    #[serde(default, deserialize_with = "loose_count")]
    pub maxplays: Option<u32>,
}

impl CollectionParams {
    fn has_ownership_filter(&self) -> bool {
        [
            self.owned,
            self.wishlist,
            self.preordered,
            self.fortrade,
            self.wanttoplay,
            self.wanttobuy,
        ]
        .iter()
        .any(Option::is_some)
    }

    /// Translate into a collection request.
    ///
    /// Without any ownership filter only owned games are requested, and a
    /// `boardgame` subtype also excludes expansions.
    pub fn to_query(&self) -> CollectionQuery {
        let (subtype, exclude_subtype) = match self.subtype.as_deref() {
            Some("boardgame") => (
                Some("boardgame".to_string()),
                Some("boardgameexpansion".to_string()),
            ),
            Some(other) => (Some(other.to_string()), None),
            None => (None, None),
        };

        let own = if self.has_ownership_filter() {
            self.owned
        } else {
            Some(true)
        };

        CollectionQuery {
            subtype,
            exclude_subtype,
            own,
            wishlist: self.wishlist,
            preordered: self.preordered,
            trade: self.fortrade,
            rated: self.rated,
            want_to_play: self.wanttoplay,
            played: self.played,
            want_to_buy: self.wanttobuy,
            has_parts: self.hasparts,
            min_rating: self.minrating,
            max_rating: self.maxrating,
            min_bgg_rating: self.minbggrating,
            max_bgg_rating: self.maxbggrating,
            min_plays: self.minplays,
            max_plays: self.maxplays,
        }
    }
}

/// A user's collection with optional filters.
#[derive(Debug, Clone)]
pub struct CollectionTool;

impl ToolDefinition for CollectionTool {
    const NAME: &'static str = "bgg-collection";
    const DESCRIPTION: &'static str =
        "Find the details about a specific users board game collection on BoardGameGeek (BGG)";

    type Params = CollectionParams;

    fn execute(
        params: CollectionParams,
        api: &dyn BggApi,
        ctx: &ToolContext,
    ) -> Result<String, ToolError> {
        if params.username.trim().is_empty() {
            return Err(ToolError::invalid_arguments("Username is required"));
        }
        let username = ctx.resolve_username(params.username.trim())?;

        let items = api
            .collection(&username, &params.to_query())
            .map_err(|e| ToolError::remote("Error fetching collection", e))?;

        if items.is_empty() {
            return Err(ToolError::not_found(
                "No items found in collection with the specified filters",
            ));
        }
        to_json(&items)
    }
}
