//! Trade finder tool.
//!
//! Matches the games one user owns against another user's wishlist.

use std::collections::HashSet;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::bgg::{BggApi, CollectionItem, CollectionQuery};
use crate::domains::tools::definitions::ToolDefinition;
use crate::domains::tools::{ToolContext, ToolError};

use super::common::to_json;

/// Result of matching one collection against a wishlist.
#[derive(Debug, Clone, Serialize)]
pub struct TradeOpportunity {
    pub user1_username: String,
    pub user2_username: String,
    pub user1_has_wanted: Vec<TradeItem>,
    pub user2_wishlist: Vec<TradeItem>,
    pub summary: TradeSummary,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TradeItem {
    pub game_id: u64,
    pub name: String,
    pub year_published: i32,
    pub for_trade: bool,
    pub want_in_trade: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_rating: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bgg_rating: Option<f64>,
}

#[derive(Debug, Clone, Serialize)]
pub struct TradeSummary {
    pub user1_has_wanted_count: usize,
    pub user2_wishlist_count: usize,
    pub has_trade_opportunity: bool,
}

impl TradeItem {
    fn from_item(item: &CollectionItem, want_in_trade: bool) -> Self {
        Self {
            game_id: item.game_id,
            name: item.name.clone(),
            year_published: item.year_published,
            for_trade: item.status.for_trade,
            want_in_trade,
            user_rating: item.user_rating,
            bgg_rating: item.bgg_rating,
        }
    }
}

/// Find the owned games that appear on the wishlist.
///
/// The wishlist is echoed in full; every wishlist entry counts as wanted.
pub fn analyse_trade_opportunities(
    user1: &str,
    user2: &str,
    owned: &[CollectionItem],
    wishlist: &[CollectionItem],
) -> TradeOpportunity {
    let wanted: HashSet<u64> = wishlist.iter().map(|item| item.game_id).collect();

    let user1_has_wanted: Vec<TradeItem> = owned
        .iter()
        .filter(|item| wanted.contains(&item.game_id))
        .map(|item| TradeItem::from_item(item, item.status.want))
        .collect();

    let user2_wishlist: Vec<TradeItem> = wishlist
        .iter()
        .map(|item| TradeItem::from_item(item, true))
        .collect();

    let summary = TradeSummary {
        user1_has_wanted_count: user1_has_wanted.len(),
        user2_wishlist_count: user2_wishlist.len(),
        has_trade_opportunity: !user1_has_wanted.is_empty(),
    };

    TradeOpportunity {
        user1_username: user1.to_string(),
        user2_username: user2.to_string(),
        user1_has_wanted,
        user2_wishlist,
        summary,
    }
}

/// Fetch both collections and match them.
pub fn find_trades(api: &dyn BggApi, user1: &str, user2: &str) -> Result<TradeOpportunity, ToolError> {
    let owned = api
        .collection(user1, &CollectionQuery::owned())
        .map_err(|e| ToolError::remote(format!("Error fetching {}'s collection", user1), e))?;

    let wishlist = api
        .collection(user2, &CollectionQuery::wishlisted())
        .map_err(|e| ToolError::remote(format!("Error fetching {}'s wishlist", user2), e))?;

    debug!(
        "Matching {} owned games against {} wishlist entries",
        owned.len(),
        wishlist.len()
    );
    Ok(analyse_trade_opportunities(user1, user2, &owned, &wishlist))
}

/// Parameters for `bgg-trade-finder`.
#[derive(Debug, Clone, Default, Deserialize, JsonSchema)]
pub struct TradeFinderParams {
    #[schemars(
        description = "BGG username whose collection will be checked. When the user refers to themselves (me, my, I), use 'SELF' as the value."
    )]
    #[serde(default)]
    pub user1: String,

    #[schemars(description = "BGG username whose wishlist will be checked against user1's collection")]
    #[serde(default)]
    pub user2: String,
}

#[derive(Debug, Clone)]
pub struct TradeFinderTool;

impl ToolDefinition for TradeFinderTool {
    const NAME: &'static str = "bgg-trade-finder";
    const DESCRIPTION: &'static str = "Find what games user1 owns that user2 has on their wishlist. Shows potential trading opportunities.";

    type Params = TradeFinderParams;

    fn execute(
        params: TradeFinderParams,
        api: &dyn BggApi,
        ctx: &ToolContext,
    ) -> Result<String, ToolError> {
        if params.user1.trim().is_empty() {
            return Err(ToolError::invalid_arguments("user1 is required"));
        }
        let user1 = ctx.resolve_username(params.user1.trim())?;

        if params.user2.trim().is_empty() {
            return Err(ToolError::invalid_arguments("user2 is required"));
        }
        let user2 = ctx.resolve_username(params.user2.trim())?;

        to_json(&find_trades(api, &user1, &user2)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bgg::testing::{StubBgg, owned, wishlisted};
    use crate::domains::tools::context::test_support::{result_text, stub_context};

    #[test]
    fn test_intersection_and_flags() {
        let mut azul = owned(230802, "Azul");
        azul.status.for_trade = true;
        let owned_games = vec![owned(13, "Catan"), azul, owned(822, "Carcassonne")];
        let wishlist = vec![wishlisted(230802, "Azul"), wishlisted(9209, "Ticket to Ride")];

        let result = analyse_trade_opportunities("alice", "bob", &owned_games, &wishlist);

        assert_eq!(result.user1_has_wanted.len(), 1);
        let item = &result.user1_has_wanted[0];
        assert_eq!(item.game_id, 230802);
        assert!(item.for_trade);
        assert!(!item.want_in_trade);

        assert_eq!(result.user2_wishlist.len(), 2);
        assert!(result.user2_wishlist.iter().all(|i| i.want_in_trade));
        assert_eq!(result.summary.user1_has_wanted_count, 1);
        assert_eq!(result.summary.user2_wishlist_count, 2);
        assert!(result.summary.has_trade_opportunity);
    }

    #[test]
    fn test_no_opportunity() {
        let result = analyse_trade_opportunities(
            "alice",
            "bob",
            &[owned(13, "Catan")],
            &[wishlisted(822, "Carcassonne")],
        );
        assert!(result.user1_has_wanted.is_empty());
        assert!(!result.summary.has_trade_opportunity);

        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["user1_has_wanted"], serde_json::json!([]));
        assert_eq!(json["summary"]["user2_wishlist_count"], 1);
    }

    #[test]
    fn test_trade_tool_resolves_self_for_both_users() {
        let mut stub = StubBgg::default();
        stub.collections
            .insert("alice".to_string(), vec![owned(13, "Catan"), wishlisted(13, "Catan")]);
        let ctx = stub_context(stub, Some("alice"));

        let text = result_text(&TradeFinderTool::run(
            serde_json::json!({ "user1": "SELF", "user2": "SELF" }),
            &ctx,
        ));
        let json: serde_json::Value = serde_json::from_str(&text).unwrap();
        assert_eq!(json["user1_username"], "alice");
        assert_eq!(json["user2_username"], "alice");
        assert_eq!(json["summary"]["has_trade_opportunity"], true);
    }

    #[test]
    fn test_trade_tool_messages() {
        let ctx = stub_context(StubBgg::default(), None);
        assert_eq!(
            result_text(&TradeFinderTool::run(serde_json::json!({ "user2": "bob" }), &ctx)),
            "user1 is required"
        );
        assert_eq!(
            result_text(&TradeFinderTool::run(serde_json::json!({ "user1": "alice" }), &ctx)),
            "user2 is required"
        );

        let failing = StubBgg {
            failure: Some("Invalid username specified".to_string()),
            ..StubBgg::default()
        };
        let ctx = stub_context(failing, None);
        assert_eq!(
            result_text(&TradeFinderTool::run(
                serde_json::json!({ "user1": "alice", "user2": "bob" }),
                &ctx
            )),
            "Error fetching alice's collection: Invalid username specified"
        );
    }
}
