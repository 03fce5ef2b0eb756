//! Guest-shaped host interface
//!
//! Mirrors the WebAssembly plugin convention: the host hands the guest one
//! input buffer, the guest writes one output buffer and returns an integer.
//! [`call`] and [`describe`] are the two exports.

pub mod adapter;
pub mod channel;
pub mod handlers;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::error;

use crate::tools::catalog::FieldSpec;
use crate::tools::{ToolOutcome, ToolProvider};

pub use adapter::ChannelAdapter;

/// Request document read by [`call`]
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CallToolRequest {
    pub tool_id: String,

    #[serde(default)]
    pub arguments: Value,
}

/// Tool entry written by [`describe`]
#[derive(Debug, Clone, Serialize)]
pub struct GuestTool {
    pub id: &'static str,
    pub label: &'static str,
    pub description: &'static str,
    pub parameters: Vec<FieldSpec>,
}

/// Document written by [`describe`]
#[derive(Debug, Clone, Serialize)]
pub struct ListToolsResult {
    pub tools: Vec<GuestTool>,
}

/// `call` export: read a [`CallToolRequest`], write the [`ToolOutcome`].
///
/// Returns 0 whenever an outcome was produced, including failures; 1 only
/// when the request itself could not be read.
pub fn call<P: ToolProvider>(adapter: &ChannelAdapter<P>) -> i32 {
    let request = match read_request() {
        Ok(request) => request,
        Err(message) => {
            write(&ToolOutcome::failure(message));
            return handlers::FAILURE;
        }
    };

    let outcome = adapter.invoke(&request.tool_id, request.arguments);
    write(&outcome);
    handlers::SUCCESS
}

/// `describe` export: write the simplified tool listing
pub fn describe<P: ToolProvider>(adapter: &ChannelAdapter<P>) -> i32 {
    let listing = ListToolsResult {
        tools: adapter
            .list_tools()
            .iter()
            .map(|d| GuestTool {
                id: d.id.as_str(),
                label: d.label,
                description: d.description,
                parameters: d.fields(),
            })
            .collect(),
    };

    write(&listing);
    handlers::SUCCESS
}

fn read_request() -> Result<CallToolRequest, String> {
    let input = channel::input_string().map_err(|e| format!("Failed to read input: {}", e))?;
    serde_json::from_str(&input).map_err(|e| format!("Invalid request: {}", e))
}

fn write<T: Serialize>(value: &T) {
    let result = serde_json::to_string(value)
        .map_err(|e| e.to_string())
        .and_then(|text| channel::output_string(&text).map_err(|e| e.to_string()));

    if let Err(e) = result {
        error!(error = %e, "failed to write guest output");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    use crate::guest::channel::ChannelScope;
    use crate::tools::ToolInvocation;

    struct Fixed;

    impl ToolProvider for Fixed {
        async fn invoke(&self, _invocation: ToolInvocation) -> ToolOutcome {
            ToolOutcome::success(json!({"message": "Email sent successfully", "id": "x1"}))
        }
    }

    fn output_of(scope: &ChannelScope) -> Value {
        serde_json::from_str(&scope.captured_output().unwrap()).unwrap()
    }

    #[test]
    fn test_call_export() {
        let adapter = ChannelAdapter::new(Fixed).unwrap();
        let scope = ChannelScope::install(
            json!({"toolId": "send_email", "arguments": {"accessToken": "t"}}).to_string(),
        );

        assert_eq!(call(&adapter), 0);
        assert_eq!(
            output_of(&scope),
            json!({"status": "success", "result": {"message": "Email sent successfully", "id": "x1"}})
        );
    }

    #[test]
    fn test_call_export_unknown_tool() {
        let adapter = ChannelAdapter::new(Fixed).unwrap();
        let scope = ChannelScope::install(r#"{"toolId": "delete_email"}"#);

        assert_eq!(call(&adapter), 0);
        assert_eq!(
            output_of(&scope),
            json!({"status": "error", "error": "Unknown tool: delete_email"})
        );
    }

    #[test]
    fn test_call_export_bad_request() {
        let adapter = ChannelAdapter::new(Fixed).unwrap();
        let scope = ChannelScope::install("{");

        assert_eq!(call(&adapter), 1);
        assert_eq!(output_of(&scope)["status"], "error");
    }

    #[test]
    fn test_describe_export() {
        let adapter = ChannelAdapter::new(Fixed).unwrap();
        let scope = ChannelScope::install("");

        assert_eq!(describe(&adapter), 0);
        let output = output_of(&scope);
        let tools = output["tools"].as_array().unwrap();
        assert_eq!(tools.len(), 5);
        assert_eq!(tools[0]["id"], "list_emails");
        assert_eq!(tools[0]["label"], "List Emails");
        assert_eq!(
            tools[0]["parameters"][0],
            json!({"name": "accessToken", "type": "string", "description": "Google API OAuth2 access token", "optional": false})
        );
    }
}
