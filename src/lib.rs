//! BoardGameGeek MCP Server Library
//!
//! An MCP server that exposes BoardGameGeek data as tools and prompts, over
//! STDIO or HTTP (JSON-RPC plus a small REST API).
//!
//! # Architecture
//!
//! - **bgg**: Blocking client for XML API2 and the companion price and
//!   recommendation services
//! - **core**: Configuration, error handling, the MCP server and transports
//! - **domains**: Business logic organized by bounded contexts
//!   - **tools**: BoardGameGeek tools, including search ranking and trade matching
//!   - **prompts**: Multi-step prompt templates built on the tools
//!
//! # Example
//!
//! ```rust,no_run
//! use bgg_mcp_server::core::{Config, McpServer, TransportService};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = Config::from_env()?;
//!     let transport = TransportService::new(config.transport.clone());
//!     transport.run(McpServer::new(config)).await?;
//!     Ok(())
//! }
//! ```

pub mod bgg;
pub mod core;
pub mod domains;

// Re-export commonly used types for convenience
pub use core::{Config, Error, McpServer, Result};
