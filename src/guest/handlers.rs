//! Channel-level tool handlers
//!
//! A handler reads its arguments from the input channel, runs the tool and
//! writes JSON to the output channel: the result on success, `{"error": ...}`
//! on failure. The integer return code is 0 for success, 1 for failure.

use serde_json::{json, Map, Value};
use tokio::runtime::Runtime;
use tracing::error;

use crate::error::ValidationError;
use crate::guest::channel;
use crate::tools::{ToolId, ToolInvocation, ToolOutcome, ToolProvider};

pub const SUCCESS: i32 = 0;
pub const FAILURE: i32 = 1;

/// Run `tool` against the currently bound channels
pub fn handle_tool_call<P: ToolProvider>(tool: ToolId, provider: &P, runtime: &Runtime) -> i32 {
    let arguments = match read_arguments() {
        Some(arguments) => arguments,
        None => {
            emit(&json!({ "error": ValidationError::InvalidJson.to_string() }).to_string());
            return FAILURE;
        }
    };

    match runtime.block_on(provider.invoke(ToolInvocation::new(tool, arguments))) {
        ToolOutcome::Success { result } => {
            let text = serde_json::to_string_pretty(&result).unwrap_or_else(|_| result.to_string());
            emit(&text);
            SUCCESS
        }
        ToolOutcome::Failure { message } => {
            emit(&json!({ "error": message }).to_string());
            FAILURE
        }
    }
}

/// The input channel must hold a JSON object (or `null` for no arguments)
fn read_arguments() -> Option<Map<String, Value>> {
    let input = match channel::input_string() {
        Ok(input) => input,
        Err(e) => {
            error!(error = %e, "failed to read input channel");
            return None;
        }
    };

    match serde_json::from_str::<Value>(&input).ok()? {
        Value::Object(map) => Some(map),
        Value::Null => Some(Map::new()),
        _ => None,
    }
}

fn emit(text: &str) {
    if let Err(e) = channel::output_string(text) {
        error!(error = %e, "failed to write output channel");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::guest::channel::ChannelScope;

    struct Echo;

    impl ToolProvider for Echo {
        async fn invoke(&self, invocation: ToolInvocation) -> ToolOutcome {
            match invocation.arguments.get("fail") {
                Some(Value::String(message)) => ToolOutcome::failure(message.clone()),
                _ => ToolOutcome::success(Value::Object(invocation.arguments)),
            }
        }
    }

    fn runtime() -> Runtime {
        tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .unwrap()
    }

    #[test]
    fn test_success_writes_result() {
        let scope = ChannelScope::install(r#"{"x": 1}"#);
        let code = handle_tool_call(ToolId::ListEmails, &Echo, &runtime());
        assert_eq!(code, SUCCESS);
        let output: Value = serde_json::from_str(&scope.captured_output().unwrap()).unwrap();
        assert_eq!(output, json!({"x": 1}));
    }

    #[test]
    fn test_failure_writes_error_object() {
        let scope = ChannelScope::install(r#"{"fail": "nope"}"#);
        let code = handle_tool_call(ToolId::SendEmail, &Echo, &runtime());
        assert_eq!(code, FAILURE);
        assert_eq!(scope.captured_output().unwrap(), r#"{"error":"nope"}"#);
    }

    #[test]
    fn test_invalid_input() {
        let scope = ChannelScope::install("not json");
        let code = handle_tool_call(ToolId::SendEmail, &Echo, &runtime());
        assert_eq!(code, FAILURE);
        assert_eq!(
            scope.captured_output().unwrap(),
            r#"{"error":"Invalid JSON input"}"#
        );
    }
}
