//! Gmail API module
//!
//! Wire types, message helpers, tool arguments and the operation gateway.

pub mod gateway;
pub mod params;
pub mod types;
pub mod utils;

pub use gateway::GmailGateway;
