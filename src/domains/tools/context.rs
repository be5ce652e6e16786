//! Shared state handed to every tool invocation.

use std::sync::Arc;

use crate::bgg::{BggApi, BggClient, BggResult};
use crate::core::config::Config;

use super::error::ToolError;

/// Builds a data client for one invocation.
///
/// Called on the blocking thread pool, since `reqwest::blocking` clients must
/// not be created or dropped inside the async runtime.
pub type ApiFactory = Arc<dyn Fn() -> BggResult<Box<dyn BggApi>> + Send + Sync>;

/// Configuration plus a way to reach BoardGameGeek.
#[derive(Clone)]
pub struct ToolContext {
    config: Arc<Config>,
    connector: ApiFactory,
}

impl ToolContext {
    /// Context backed by the real HTTP client.
    pub fn new(config: Arc<Config>) -> Self {
        let bgg = config.bgg.clone();
        let connector: ApiFactory =
            Arc::new(move || BggClient::new(&bgg).map(|c| Box::new(c) as Box<dyn BggApi>));
        Self { config, connector }
    }

    /// Context backed by a custom client factory.
    pub fn with_connector(config: Arc<Config>, connector: ApiFactory) -> Self {
        Self { config, connector }
    }

    pub fn config(&self) -> &Arc<Config> {
        &self.config
    }

    /// Create a data client.
    pub fn connect(&self) -> BggResult<Box<dyn BggApi>> {
        (self.connector)()
    }

    /// Resolve the `SELF` placeholder to the configured default username.
    pub fn resolve_username(&self, username: &str) -> Result<String, ToolError> {
        if username != "SELF" {
            return Ok(username.to_string());
        }
        self.config
            .default_username()
            .map(str::to_string)
            .ok_or_else(|| {
                ToolError::invalid_arguments(
                    "BGG_USERNAME environment variable not set. Either set it or provide your specific username instead of 'SELF'.",
                )
            })
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::*;
    use crate::bgg::testing::StubBgg;

    /// Context whose client is a clone of `stub`.
    pub fn stub_context(stub: StubBgg, username: Option<&str>) -> ToolContext {
        let mut config = Config::default();
        config.bgg.username = username.map(str::to_string);
        ToolContext::with_connector(
            Arc::new(config),
            Arc::new(move || Ok(Box::new(stub.clone()) as Box<dyn BggApi>)),
        )
    }

    /// Text of the first content block.
    pub fn result_text(result: &rmcp::model::CallToolResult) -> String {
        assert!(!result.is_error.unwrap_or(false), "tool results are never errors");
        match &result.content[0].raw {
            rmcp::model::RawContent::Text(text) => text.text.clone(),
            _ => panic!("Expected text content"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::test_support::stub_context;
    use crate::bgg::testing::StubBgg;

    #[test]
    fn test_resolve_self_with_default() {
        let ctx = stub_context(StubBgg::default(), Some("meeple_fan"));
        assert_eq!(ctx.resolve_username("SELF").unwrap(), "meeple_fan");
        assert_eq!(ctx.resolve_username("someone").unwrap(), "someone");
    }

    #[test]
    fn test_resolve_self_without_default() {
        let ctx = stub_context(StubBgg::default(), None);
        let err = ctx.resolve_username("SELF").unwrap_err();
        assert!(err.to_string().starts_with("BGG_USERNAME environment variable not set"));
    }
}
