//! Configuration management for the MCP server.
//!
//! This module provides a centralized configuration structure that can be
//! populated from environment variables, command-line overrides, or defaults.

use super::error::{Error, Result};
use super::transport::{TransportConfig, TransportOverrides};
use serde::{Deserialize, Serialize};
use tracing::{Level, info, warn};

/// Main configuration structure for the MCP server.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Server identification and metadata.
    pub server: ServerConfig,

    /// Prompts domain configuration.
    pub prompts: PromptsConfig,

    /// Logging configuration.
    pub logging: LoggingConfig,

    /// Transport configuration.
    pub transport: TransportConfig,

    /// BoardGameGeek access configuration.
    pub bgg: BggConfig,
}

/// Server identification configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// The name of the server as reported to clients.
    pub name: String,

    /// The version of the server.
    pub version: String,
}

/// Configuration for the prompts domain.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PromptsConfig {
    // Prompts are registered in domains/prompts/registry.rs
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level filter (e.g., "info", "debug", "trace").
    pub level: String,

    /// Whether to include timestamps in log output.
    pub with_timestamps: bool,
}

/// BoardGameGeek and companion service settings.
#[derive(Clone, Serialize, Deserialize)]
pub struct BggConfig {
    /// Username substituted for `SELF` in tool arguments.
    pub username: Option<String>,

    /// Bearer token for XML API2. Never serialized.
    #[serde(skip_serializing, default)]
    pub api_token: Option<String>,

    /// XML API2 base URL.
    pub api_url: String,

    /// Retail price lookup endpoint.
    pub prices_url: String,

    /// Recommendation service base URL.
    pub recommend_url: String,

    /// Per-request timeout.
    pub timeout_secs: u64,

    /// User-Agent sent with every request.
    pub user_agent: String,

    /// How often a queued collection export is re-polled.
    pub queued_retries: u32,

    /// Delay between re-polls, in milliseconds.
    pub queued_retry_delay_ms: u64,
}

/// Custom Debug implementation to redact secrets from logs.
impl std::fmt::Debug for BggConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BggConfig")
            .field("username", &self.username)
            .field("api_token", &self.api_token.as_ref().map(|_| "[REDACTED]"))
            .field("api_url", &self.api_url)
            .field("prices_url", &self.prices_url)
            .field("recommend_url", &self.recommend_url)
            .field("timeout_secs", &self.timeout_secs)
            .field("user_agent", &self.user_agent)
            .field("queued_retries", &self.queued_retries)
            .field("queued_retry_delay_ms", &self.queued_retry_delay_ms)
            .finish()
    }
}

impl Default for BggConfig {
    fn default() -> Self {
        Self {
            username: None,
            api_token: None,
            api_url: "https://boardgamegeek.com/xmlapi2".to_string(),
            prices_url: "https://boardgameprices.co.uk/api/info".to_string(),
            recommend_url: "https://recommend.games/api".to_string(),
            timeout_secs: 30,
            user_agent: format!("bgg-mcp/{}", env!("CARGO_PKG_VERSION")),
            queued_retries: 5,
            queued_retry_delay_ms: 2000,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server: ServerConfig {
                name: "bgg-mcp".to_string(),
                version: env!("CARGO_PKG_VERSION").to_string(),
            },
            prompts: PromptsConfig::default(),
            logging: LoggingConfig {
                level: "info".to_string(),
                with_timestamps: true,
            },
            transport: TransportConfig::default(),
            bgg: BggConfig::default(),
        }
    }
}

fn env_var(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

impl Config {
    /// Create a new configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self> {
        Self::load(&TransportOverrides::default())
    }

    /// Load configuration from environment variables, with command-line
    /// values filling in the transport settings the environment leaves open.
    ///
    /// Server settings use the `MCP_` prefix, BoardGameGeek settings the
    /// `BGG_` prefix. A `.env` file is read first when present.
    pub fn load(overrides: &TransportOverrides) -> Result<Self> {
        dotenvy::dotenv().ok();

        let mut config = Self::default();

        if let Some(name) = env_var("MCP_SERVER_NAME") {
            config.server.name = name;
        }

        if let Some(level) = env_var("MCP_LOG_LEVEL") {
            config.logging.level = level;
        }

        if let Some(timestamps) = env_var("MCP_LOG_TIMESTAMPS") {
            config.logging.with_timestamps = timestamps.parse().unwrap_or(true);
        }

        config.transport = TransportConfig::resolve(overrides)?;

        config.bgg.username = env_var("BGG_USERNAME");
        config.bgg.api_token = env_var("BGG_API_TOKEN");

        if let Some(url) = env_var("BGG_API_URL") {
            config.bgg.api_url = url;
        }

        if let Some(timeout) = env_var("BGG_TIMEOUT_SECS") {
            config.bgg.timeout_secs = timeout
                .trim()
                .parse()
                .map_err(|_| Error::config(format!("BGG_TIMEOUT_SECS is not a number: {}", timeout)))?;
        }

        config.validate()?;
        Ok(config)
    }

    /// Check values that would make every request fail.
    pub fn validate(&self) -> Result<()> {
        if self.bgg.timeout_secs == 0 {
            return Err(Error::config("BGG_TIMEOUT_SECS must be greater than zero"));
        }
        if self.bgg.api_url.trim().is_empty() {
            return Err(Error::config("BGG_API_URL must not be empty"));
        }
        Ok(())
    }

    /// Notes about the BoardGameGeek settings, for logging at startup.
    ///
    /// Loading happens before the subscriber exists, so nothing is logged
    /// from [`Config::load`] itself.
    pub fn startup_notes(&self) -> Vec<(Level, String)> {
        let mut notes = Vec::new();
        match self.default_username() {
            Some(username) => notes.push((
                Level::INFO,
                format!("Default BoardGameGeek username: {}", username),
            )),
            None => notes.push((
                Level::WARN,
                "BGG_USERNAME not set - tools will reject the 'SELF' username".to_string(),
            )),
        }
        if self.bgg.api_token.is_some() {
            notes.push((
                Level::INFO,
                "BoardGameGeek API token loaded from environment".to_string(),
            ));
        }
        notes
    }

    /// Log [`Config::startup_notes`].
    pub fn log_startup_notes(&self) {
        for (level, note) in self.startup_notes() {
            if level == Level::WARN {
                warn!("{}", note);
            } else {
                info!("{}", note);
            }
        }
    }

    /// The username `SELF` resolves to, if configured.
    pub fn default_username(&self) -> Option<&str> {
        self.bgg.username.as_deref()
    }
}

/// Serializes tests that touch process environment variables.
#[cfg(test)]
pub(crate) static ENV_TEST_LOCK: std::sync::Mutex<()> = std::sync::Mutex::new(());
