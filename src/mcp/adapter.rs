//! Structured request/response host adapter
//!
//! Tool calls arrive with a name and an arguments object and leave as MCP
//! content blocks: pretty-printed JSON on success, a prefixed message flagged
//! as an error on failure.

use std::sync::Arc;

use serde_json::Value;
use tracing::warn;

use crate::tools::{
    arguments_object, panic_message, ToolDescriptor, ToolId, ToolInvocation, ToolOutcome,
    ToolProvider,
};

use super::types::{CallToolResult, Tool};

/// Host adapter for the JSON-RPC tool-server convention
pub struct McpAdapter<P> {
    provider: Arc<P>,
}

impl<P> Clone for McpAdapter<P> {
    fn clone(&self) -> Self {
        Self {
            provider: Arc::clone(&self.provider),
        }
    }
}

impl<P: ToolProvider + 'static> McpAdapter<P> {
    pub fn new(provider: P) -> Self {
        Self {
            provider: Arc::new(provider),
        }
    }

    pub fn descriptors(&self) -> Vec<ToolDescriptor> {
        self.provider.list_tools()
    }

    /// Tool listing for `tools/list`
    pub fn list_tools(&self) -> Vec<Tool> {
        self.descriptors().iter().map(Tool::from).collect()
    }

    /// Invoke a tool and return the outcome unrendered
    pub async fn invoke(&self, tool_name: &str, arguments: Value) -> ToolOutcome {
        let tool: ToolId = match tool_name.parse() {
            Ok(tool) => tool,
            Err(e) => {
                warn!(tool = tool_name, "unknown tool");
                return ToolOutcome::failure(e.to_string());
            }
        };

        let arguments = match arguments_object(arguments) {
            Ok(arguments) => arguments,
            Err(e) => return ToolOutcome::failure(e.to_string()),
        };

        // A dedicated task turns a panic anywhere in the call into a JoinError.
        let provider = Arc::clone(&self.provider);
        let task = tokio::spawn(async move {
            provider
                .invoke(ToolInvocation::new(tool, arguments))
                .await
        });

        match task.await {
            Ok(outcome) => outcome,
            Err(e) if e.is_panic() => {
                let message = panic_message(e.into_panic());
                warn!(%tool, error = %message, "tool call panicked");
                ToolOutcome::failure(message)
            }
            Err(e) => ToolOutcome::failure(e.to_string()),
        }
    }

    /// Invoke a tool and render the outcome as MCP content
    pub async fn call_tool(&self, tool_name: &str, arguments: Value) -> CallToolResult {
        let outcome = self.invoke(tool_name, arguments).await;
        render(tool_name.parse().ok(), outcome)
    }
}

fn render(tool: Option<ToolId>, outcome: ToolOutcome) -> CallToolResult {
    match outcome {
        ToolOutcome::Success { result } => match serde_json::to_string_pretty(&result) {
            Ok(text) => CallToolResult::text(text),
            Err(e) => CallToolResult::error(e.to_string()),
        },
        ToolOutcome::Failure { message } => match tool {
            Some(tool) => CallToolResult::error(format!("{}: {}", tool.error_prefix(), message)),
            None => CallToolResult::error(message),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use serde_json::json;

    #[derive(Default)]
    struct Counting {
        calls: AtomicUsize,
    }

    impl ToolProvider for Counting {
        async fn invoke(&self, invocation: ToolInvocation) -> ToolOutcome {
            self.calls.fetch_add(1, Ordering::SeqCst);
            match invocation.tool {
                ToolId::ListEmails => ToolOutcome::success(json!([{"id": "a"}])),
                ToolId::ModifyEmail => panic!("label service gone"),
                _ => ToolOutcome::failure("Failed to send email: quota"),
            }
        }
    }

    #[tokio::test]
    async fn test_unknown_tool() {
        let adapter = McpAdapter::new(Counting::default());
        let result = adapter.call_tool("delete_email", json!({})).await;
        assert!(result.is_error);
        assert_eq!(result.first_text(), Some("Unknown tool: delete_email"));
        assert_eq!(adapter.provider.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_success_is_pretty_json() {
        let adapter = McpAdapter::new(Counting::default());
        let result = adapter.call_tool("list_emails", json!({})).await;
        assert!(!result.is_error);
        assert_eq!(
            result.first_text(),
            Some(serde_json::to_string_pretty(&json!([{"id": "a"}])).unwrap().as_str())
        );
    }

    #[tokio::test]
    async fn test_failure_is_prefixed() {
        let adapter = McpAdapter::new(Counting::default());
        let result = adapter.call_tool("send_email", json!({})).await;
        assert!(result.is_error);
        assert_eq!(
            result.first_text(),
            Some("Error sending email: Failed to send email: quota")
        );
    }

    #[tokio::test]
    async fn test_panic_is_contained() {
        let adapter = McpAdapter::new(Counting::default());
        let result = adapter.call_tool("modify_email", json!({})).await;
        assert!(result.is_error);
        assert_eq!(
            result.first_text(),
            Some("Error modifying email: label service gone")
        );
    }

    #[tokio::test]
    async fn test_non_object_arguments() {
        let adapter = McpAdapter::new(Counting::default());
        let outcome = adapter.invoke("list_emails", json!([1, 2])).await;
        assert!(!outcome.is_success());
        assert_eq!(adapter.provider.calls.load(Ordering::SeqCst), 0);
    }
}
