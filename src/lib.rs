//! Gmail Tools Library
//!
//! Four Gmail operations (plus draft creation) exposed as tools to two host
//! shapes: a WebAssembly-style single-buffer guest interface and an MCP
//! server speaking JSON-RPC over stdio. Both shapes sit on the same
//! [`ToolProvider`], implemented for the Gmail REST API by [`GmailGateway`].

pub mod config;
pub mod error;
pub mod gmail;
pub mod guest;
pub mod mcp;
pub mod tools;

pub use config::Config;
pub use error::{GmailToolsError, Result, ToolError};
pub use gmail::GmailGateway;
pub use guest::ChannelAdapter;
pub use mcp::McpAdapter;
pub use tools::{ToolId, ToolOutcome, ToolProvider};
