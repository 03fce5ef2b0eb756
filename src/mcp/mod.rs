//! MCP (Model Context Protocol) host shape
//!
//! Serves the tool catalog over line-delimited JSON-RPC on stdio.

pub mod adapter;
pub mod server;
pub mod types;

pub use adapter::McpAdapter;
pub use server::McpServer;
