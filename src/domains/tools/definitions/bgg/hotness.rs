//! Hotness list tool.

use schemars::JsonSchema;
use serde::Deserialize;

use crate::bgg::BggApi;
use crate::domains::tools::definitions::ToolDefinition;
use crate::domains::tools::{ToolContext, ToolError};

use super::common::to_json;

/// `bgg-hot` takes no arguments.
#[derive(Debug, Clone, Default, Deserialize, JsonSchema)]
pub struct HotParams {}

#[derive(Debug, Clone)]
pub struct HotTool;

impl ToolDefinition for HotTool {
    const NAME: &'static str = "bgg-hot";
    const DESCRIPTION: &'static str = "Find the current board game hotness on BoardGameGeek (BGG)";

    type Params = HotParams;

    fn execute(_params: HotParams, api: &dyn BggApi, _ctx: &ToolContext) -> Result<String, ToolError> {
        let items = api
            .hot()
            .map_err(|e| ToolError::remote("Error fetching hot games", e))?;

        if items.is_empty() {
            return Err(ToolError::not_found("No hot games found"));
        }
        to_json(&items)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bgg::HotItem;
    use crate::bgg::testing::StubBgg;
    use crate::domains::tools::context::test_support::{result_text, stub_context};

    #[test]
    fn test_hot_list() {
        let stub = StubBgg {
            hot: vec![HotItem {
                id: 342942,
                rank: 1,
                name: "Ark Nova".to_string(),
                year_published: Some(2021),
                thumbnail: String::new(),
            }],
            ..StubBgg::default()
        };
        let text = result_text(&HotTool::run(serde_json::Value::Null, &stub_context(stub, None)));
        let json: serde_json::Value = serde_json::from_str(&text).unwrap();
        assert_eq!(json[0]["name"], "Ark Nova");
        assert_eq!(json[0]["rank"], 1);
    }

    #[test]
    fn test_hot_empty() {
        let ctx = stub_context(StubBgg::default(), None);
        let text = result_text(&HotTool::run(serde_json::json!({}), &ctx));
        assert_eq!(text, "No hot games found");
    }
}
