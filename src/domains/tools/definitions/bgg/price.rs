//! Retail price lookup tool.

use schemars::JsonSchema;
use serde::Deserialize;

use crate::bgg::BggApi;
use crate::domains::tools::definitions::ToolDefinition;
use crate::domains::tools::{ToolContext, ToolError};

use super::common::to_pretty_json;

pub const DEFAULT_CURRENCY: &str = "USD";
pub const DEFAULT_DESTINATION: &str = "US";

/// Parameters for `bgg-price`.
#[derive(Debug, Clone, Default, Deserialize, JsonSchema)]
pub struct PriceParams {
    #[schemars(description = "Comma-separated BGG IDs (e.g., '12,844,2096,13857')")]
    #[serde(default)]
    pub ids: String,

    #[schemars(description = "Currency code: DKK, GBP, SEK, EUR, or USD (default: USD)")]
    #[serde(default)]
    pub currency: Option<String>,

    #[schemars(description = "Destination country: DK, SE, GB, DE, or US (default: US)")]
    #[serde(default)]
    pub destination: Option<String>,
}

impl PriceParams {
    /// Upper-cased currency, defaulting to USD.
    pub fn currency(&self) -> String {
        normalize(self.currency.as_deref(), DEFAULT_CURRENCY)
    }

    /// Upper-cased destination country, defaulting to US.
    pub fn destination(&self) -> String {
        normalize(self.destination.as_deref(), DEFAULT_DESTINATION)
    }
}

fn normalize(value: Option<&str>, default: &str) -> String {
    match value.map(str::trim) {
        Some(v) if !v.is_empty() => v.to_uppercase(),
        _ => default.to_string(),
    }
}

#[derive(Debug, Clone)]
pub struct PriceTool;

impl ToolDefinition for PriceTool {
    const NAME: &'static str = "bgg-price";
    const DESCRIPTION: &'static str =
        "Get current prices for board games from multiple retailers using BGG IDs";

    type Params = PriceParams;

    fn execute(params: PriceParams, api: &dyn BggApi, _ctx: &ToolContext) -> Result<String, ToolError> {
        let ids = params.ids.trim();
        if ids.is_empty() {
            return Err(ToolError::invalid_arguments("IDs parameter is required"));
        }

        let prices = api
            .prices(ids, &params.currency(), &params.destination())
            .map_err(|e| ToolError::remote("API request error", e))?;
        to_pretty_json(&prices)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bgg::testing::StubBgg;
    use crate::domains::tools::context::test_support::{result_text, stub_context};

    #[test]
    fn test_price_defaults_and_uppercase() {
        let ctx = stub_context(StubBgg::default(), None);

        let text = result_text(&PriceTool::run(serde_json::json!({ "ids": "12,844" }), &ctx));
        let json: serde_json::Value = serde_json::from_str(&text).unwrap();
        assert_eq!(json["currency"], "USD");
        assert_eq!(json["destination"], "US");
        assert!(text.contains('\n'));

        let text = result_text(&PriceTool::run(
            serde_json::json!({ "ids": "12", "currency": "gbp", "destination": "gb" }),
            &ctx,
        ));
        let json: serde_json::Value = serde_json::from_str(&text).unwrap();
        assert_eq!(json["currency"], "GBP");
        assert_eq!(json["destination"], "GB");
    }

    #[test]
    fn test_price_requires_ids() {
        let ctx = stub_context(StubBgg::default(), None);
        let text = result_text(&PriceTool::run(serde_json::json!({ "ids": "" }), &ctx));
        assert_eq!(text, "IDs parameter is required");
    }
}
