//! Transport configuration types.

use serde::{Deserialize, Serialize};

use super::{TransportError, TransportResult};

/// Transport configuration options.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum TransportConfig {
    /// Standard input/output transport (default for MCP).
    #[cfg(feature = "stdio")]
    Stdio,

    /// HTTP transport with JSON-RPC over POST plus the REST endpoints.
    #[cfg(feature = "http")]
    Http(HttpConfig),
}

/// HTTP transport configuration.
#[cfg(feature = "http")]
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HttpConfig {
    /// Port number to listen on.
    pub port: u16,

    /// Host address to bind to.
    #[serde(default = "default_host")]
    pub host: String,

    /// Path for JSON-RPC endpoint.
    #[serde(default = "default_rpc_path")]
    pub rpc_path: String,

    /// Enable CORS on the JSON-RPC endpoint for browser clients.
    #[serde(default = "default_cors")]
    pub enable_cors: bool,

    /// Public URL announced in the startup logs.
    #[serde(default)]
    pub base_url: Option<String>,
}

/// Values taken from the command line.
///
/// Environment variables win over these; both fall back to the defaults.
#[derive(Debug, Clone, Default)]
pub struct TransportOverrides {
    /// `stdio` or `http`.
    pub mode: Option<String>,
    /// HTTP port.
    pub port: Option<u16>,
}

#[cfg(feature = "http")]
fn default_host() -> String {
    "127.0.0.1".to_string()
}

#[cfg(feature = "http")]
fn default_rpc_path() -> String {
    "/mcp".to_string()
}

#[cfg(feature = "http")]
fn default_cors() -> bool {
    true
}

#[cfg(feature = "http")]
const DEFAULT_HTTP_PORT: u16 = 8080;

fn env_var(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

impl Default for TransportConfig {
    fn default() -> Self {
        #[cfg(feature = "stdio")]
        {
            return Self::Stdio;
        }

        #[cfg(all(not(feature = "stdio"), feature = "http"))]
        {
            return Self::Http(HttpConfig::default());
        }

        #[cfg(not(any(feature = "stdio", feature = "http")))]
        {
            compile_error!("At least one transport feature must be enabled: stdio or http");
        }
    }
}

#[cfg(feature = "http")]
impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            port: DEFAULT_HTTP_PORT,
            host: default_host(),
            rpc_path: default_rpc_path(),
            enable_cors: default_cors(),
            base_url: None,
        }
    }
}

#[cfg(feature = "http")]
impl HttpConfig {
    /// URL under which the server is reachable, for logging.
    pub fn public_url(&self) -> String {
        self.base_url
            .clone()
            .unwrap_or_else(|| format!("http://localhost:{}", self.port))
    }
}

impl TransportConfig {
    /// Create a STDIO transport config.
    #[cfg(feature = "stdio")]
    pub fn stdio() -> Self {
        Self::Stdio
    }

    /// Create an HTTP transport config.
    #[cfg(feature = "http")]
    pub fn http(port: u16, host: impl Into<String>) -> Self {
        Self::Http(HttpConfig {
            port,
            host: host.into(),
            ..Default::default()
        })
    }

    /// Load transport config from environment variables only.
    pub fn from_env() -> TransportResult<Self> {
        Self::resolve(&TransportOverrides::default())
    }

    /// Resolve the transport from environment variables and CLI overrides.
    ///
    /// The mode comes from `MCP_TRANSPORT` or `MCP_MODE`, then `--mode`, then
    /// `stdio`. The port comes from `MCP_HTTP_PORT` or `MCP_PORT`, then
    /// `--port`, then 8080.
    pub fn resolve(overrides: &TransportOverrides) -> TransportResult<Self> {
        let mode = env_var("MCP_TRANSPORT")
            .or_else(|| env_var("MCP_MODE"))
            .or_else(|| overrides.mode.clone())
            .unwrap_or_else(|| "stdio".to_string());

        match mode.trim().to_lowercase().as_str() {
            #[cfg(feature = "stdio")]
            "stdio" => Ok(Self::Stdio),
            #[cfg(feature = "http")]
            "http" => {
                let port = env_var("MCP_HTTP_PORT")
                    .or_else(|| env_var("MCP_PORT"))
                    .and_then(|p| p.trim().parse().ok())
                    .or(overrides.port)
                    .unwrap_or(DEFAULT_HTTP_PORT);
                let host = env_var("MCP_HTTP_HOST").unwrap_or_else(default_host);
                let rpc_path = env_var("MCP_HTTP_PATH").unwrap_or_else(default_rpc_path);
                let enable_cors = env_var("MCP_HTTP_CORS")
                    .map(|v| v.to_lowercase() != "false" && v != "0")
                    .unwrap_or(true);
                let base_url = env_var("MCP_BASE_URL");
                Ok(Self::Http(HttpConfig {
                    port,
                    host,
                    rpc_path,
                    enable_cors,
                    base_url,
                }))
            }
            _ => Err(TransportError::invalid_mode(mode)),
        }
    }

    /// Get a description of this transport for logging.
    pub fn description(&self) -> String {
        match self {
            #[cfg(feature = "stdio")]
            Self::Stdio => "STDIO (standard MCP mode)".to_string(),
            #[cfg(feature = "http")]
            Self::Http(cfg) => format!("HTTP on {}:{}{}", cfg.host, cfg.port, cfg.rpc_path),
        }
    }

    /// Check if this transport is the standard STDIO mode.
    pub fn is_stdio(&self) -> bool {
        #[cfg(feature = "stdio")]
        {
            matches!(self, Self::Stdio)
        }
        #[cfg(not(feature = "stdio"))]
        {
            false
        }
    }
}
