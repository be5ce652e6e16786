//! Tools domain module.
//!
//! Tools are the BoardGameGeek operations MCP clients can call.
//!
//! ## Architecture
//!
//! - `definitions/` - Individual tool implementations (one file per tool)
//! - `context.rs` - Configuration and client factory shared by every call
//! - `router.rs` - Dynamic ToolRouter builder for the STDIO transport
//! - `registry.rs` - Central tool registry and HTTP dispatch
//! - `error.rs` - Tool-specific error types
//!
//! ## Adding a New Tool
//!
//! 1. Create a new file in `definitions/bgg/` implementing `ToolDefinition`
//! 2. Export it in `definitions/bgg/mod.rs`
//! 3. Add route in `router.rs` using `with_route()`
//! 4. Register in `registry.rs` for HTTP support

mod context;
pub mod definitions;
mod error;
mod registry;
pub mod router;

pub use context::{ApiFactory, ToolContext};
pub use definitions::ToolDefinition;
pub use error::ToolError;
pub use registry::ToolRegistry;
pub use router::build_tool_router;

#[cfg(test)]
pub(crate) use context::test_support;
