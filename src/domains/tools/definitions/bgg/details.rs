//! Game details tool.

use schemars::JsonSchema;
use serde::Deserialize;
use tracing::debug;

use crate::bgg::BggApi;
use crate::domains::tools::definitions::ToolDefinition;
use crate::domains::tools::{ToolContext, ToolError};

use super::common::{GameSummary, LooseId, to_json};

/// Parameters for `bgg-details`.
#[derive(Debug, Clone, Default, Deserialize, JsonSchema)]
pub struct DetailsParams {
    #[schemars(description = "The name of the board game")]
    #[serde(default)]
    pub name: Option<String>,

    #[schemars(description = "The BoardGameGeek ID of the board game")]
    #[serde(default)]
    pub id: Option<LooseId>,

    /// Return the complete record instead of the summary.
    #[schemars(
        description = "Return the complete BGG API response instead of essential info. WARNING: This returns significantly more data and can overload AI context windows. ONLY set this to true if the user explicitly requests 'full details', 'complete data', or similar. Default behavior returns essential info which is sufficient for most use cases."
    )]
    #[serde(default)]
    pub full_details: bool,
}

/// Details for one game, looked up by id or exact name.
#[derive(Debug, Clone)]
pub struct DetailsTool;

impl DetailsTool {
    fn resolve_id(params: &DetailsParams, api: &dyn BggApi) -> Result<u64, ToolError> {
        if let Some(id) = &params.id {
            return id
                .value()
                .ok_or_else(|| ToolError::invalid_arguments("Invalid ID format"));
        }

        let name = params
            .name
            .as_deref()
            .ok_or_else(|| ToolError::invalid_arguments("Either 'name' or 'id' parameter must be provided"))?;

        match api.search(name, true) {
            Ok(hits) => hits
                .first()
                .map(|hit| hit.id)
                .ok_or_else(|| ToolError::not_found("No search result found")),
            Err(e) => {
                debug!("Exact search for '{}' failed: {}", name, e);
                Err(ToolError::not_found("No search result found"))
            }
        }
    }
}

impl ToolDefinition for DetailsTool {
    const NAME: &'static str = "bgg-details";
    const DESCRIPTION: &'static str =
        "Find the details about a specific board game on BoardGameGeek (BGG)";

    type Params = DetailsParams;

    fn execute(
        params: DetailsParams,
        api: &dyn BggApi,
        _ctx: &ToolContext,
    ) -> Result<String, ToolError> {
        let id = Self::resolve_id(&params, api)?;

        let things = api
            .things(&[id])
            .map_err(|e| ToolError::remote("Error fetching game details", e))?;

        let thing = things
            .first()
            .ok_or_else(|| ToolError::not_found("No query results found"))?;

        if params.full_details {
            to_json(thing)
        } else {
            to_json(&GameSummary::from(thing))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bgg::testing::{StubBgg, hit, thing};
    use crate::domains::tools::context::test_support::{result_text, stub_context};

    fn stub() -> StubBgg {
        StubBgg {
            exact_hits: vec![hit(822, "Carcassonne", "boardgame")],
            things: vec![thing(822, "Carcassonne", 110_000)],
            ..StubBgg::default()
        }
    }

    fn call(args: serde_json::Value) -> String {
        result_text(&DetailsTool::run(args, &stub_context(stub(), None)))
    }

    #[test]
    fn test_details_by_numeric_and_string_id() {
        for args in [serde_json::json!({ "id": 822 }), serde_json::json!({ "id": "822" })] {
            let json: serde_json::Value = serde_json::from_str(&call(args)).unwrap();
            assert_eq!(json["name"], "Carcassonne");
            assert!(json.get("num_ratings").is_some());
        }
    }

    #[test]
    fn test_details_by_name() {
        let json: serde_json::Value =
            serde_json::from_str(&call(serde_json::json!({ "name": "Carcassonne" }))).unwrap();
        assert_eq!(json["id"], 822);
    }

    #[test]
    fn test_full_details_returns_record() {
        let json: serde_json::Value = serde_json::from_str(&call(
            serde_json::json!({ "id": 822, "full_details": true }),
        ))
        .unwrap();
        assert!(json.get("statistics").is_some());
        assert!(json.get("num_ratings").is_none());
    }

    #[test]
    fn test_details_messages() {
        assert_eq!(call(serde_json::json!({ "id": "abc" })), "Invalid ID format");
        assert_eq!(
            call(serde_json::json!({})),
            "Either 'name' or 'id' parameter must be provided"
        );
        assert_eq!(call(serde_json::json!({ "id": 1 })), "No query results found");

        let ctx = stub_context(StubBgg::default(), None);
        let text = result_text(&DetailsTool::run(serde_json::json!({ "name": "Nope" }), &ctx));
        assert_eq!(text, "No search result found");
    }
}
