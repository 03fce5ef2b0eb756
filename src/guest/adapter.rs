//! Synchronous channel-shaped host adapter
//!
//! Each call binds the arguments to the input channel, runs the channel
//! handler, captures whatever it wrote and turns that text back into a
//! [`ToolOutcome`]. The previous bindings come back when the
//! [`ChannelScope`] drops, whatever path the call took.

use std::panic::{self, AssertUnwindSafe};

use serde_json::{json, Value};
use tokio::runtime::Runtime;
use tracing::{debug, warn};

use crate::error::{ConfigError, Result};
use crate::guest::channel::ChannelScope;
use crate::guest::handlers::{self, SUCCESS};
use crate::tools::{panic_message, ToolDescriptor, ToolId, ToolOutcome, ToolProvider};

/// Host adapter for the single-buffer guest convention
pub struct ChannelAdapter<P> {
    provider: P,
    runtime: Runtime,
}

impl<P: ToolProvider> ChannelAdapter<P> {
    /// Wrap a provider; network calls block on a private current-thread runtime
    pub fn new(provider: P) -> Result<Self> {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(|e| ConfigError::Runtime {
                message: e.to_string(),
            })?;

        Ok(Self { provider, runtime })
    }

    pub fn list_tools(&self) -> Vec<ToolDescriptor> {
        self.provider.list_tools()
    }

    /// Invoke a tool by name. Never panics and never returns an error: every
    /// failure is folded into [`ToolOutcome::Failure`].
    pub fn invoke(&self, tool_name: &str, arguments: Value) -> ToolOutcome {
        let tool: ToolId = match tool_name.parse() {
            Ok(tool) => tool,
            Err(e) => {
                warn!(tool = tool_name, "unknown tool");
                return ToolOutcome::failure(e.to_string());
            }
        };

        let scope = ChannelScope::install(arguments.to_string());
        let code = panic::catch_unwind(AssertUnwindSafe(|| {
            handlers::handle_tool_call(tool, &self.provider, &self.runtime)
        }));
        let captured = scope.captured_output();
        drop(scope);

        match code {
            Ok(SUCCESS) => {
                debug!(%tool, "guest call succeeded");
                success_from(captured.unwrap_or_default())
            }
            Ok(code) => {
                debug!(%tool, code, "guest call failed");
                failure_from(tool, captured)
            }
            Err(payload) => {
                let message = panic_message(payload);
                warn!(%tool, error = %message, "guest call panicked");
                ToolOutcome::failure(message)
            }
        }
    }
}

/// Captured success text as JSON, or wrapped as `{message}` when it is not JSON
fn success_from(captured: String) -> ToolOutcome {
    match serde_json::from_str(&captured) {
        Ok(result) => ToolOutcome::success(result),
        Err(_) => ToolOutcome::success(json!({ "message": captured })),
    }
}

/// The `error` field of captured JSON, else the raw text, else a per-tool default
fn failure_from(tool: ToolId, captured: Option<String>) -> ToolOutcome {
    let captured = match captured.filter(|text| !text.is_empty()) {
        Some(text) => text,
        None => return ToolOutcome::failure(tool.failure_fallback()),
    };

    let message = serde_json::from_str::<Value>(&captured)
        .ok()
        .and_then(|value| value.get("error").and_then(Value::as_str).map(str::to_string))
        .unwrap_or(captured);

    ToolOutcome::failure(message)
}
