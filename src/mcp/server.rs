//! MCP Server implementation
//!
//! Line-delimited JSON-RPC over stdio. Tool errors never surface as JSON-RPC
//! errors; they come back as `isError` results.

use serde_json::Value;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt, BufReader};
use tracing::{debug, error, info};

use crate::error::Result;
use crate::mcp::adapter::McpAdapter;
use crate::mcp::types::*;
use crate::tools::ToolProvider;

/// MCP Server info
const SERVER_NAME: &str = "google-gmail-server";
const SERVER_VERSION: &str = env!("CARGO_PKG_VERSION");

/// MCP Server for the Gmail tools
pub struct McpServer<P> {
    adapter: McpAdapter<P>,

    /// Whether the client sent `notifications/initialized`
    initialized: bool,
}

impl<P: ToolProvider + 'static> McpServer<P> {
    pub fn new(provider: P) -> Self {
        Self {
            adapter: McpAdapter::new(provider),
            initialized: false,
        }
    }

    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    /// Run the server on stdio until stdin closes
    pub async fn run_stdio(&mut self) -> Result<()> {
        info!("Google Gmail MCP server running on stdio");
        let stdin = BufReader::new(tokio::io::stdin());
        let stdout = tokio::io::stdout();
        self.serve(stdin, stdout).await
    }

    /// Serve requests from `reader`, one JSON message per line
    pub async fn serve<R, W>(&mut self, reader: R, mut writer: W) -> Result<()>
    where
        R: AsyncBufRead + Unpin,
        W: AsyncWrite + Unpin,
    {
        let mut lines = reader.lines();

        while let Some(line) = lines.next_line().await? {
            if line.trim().is_empty() {
                continue;
            }

            if let Some(response) = self.handle_message(&line).await {
                let mut text = serde_json::to_string(&response)?;
                text.push('\n');
                writer.write_all(text.as_bytes()).await?;
                writer.flush().await?;
            }
        }

        debug!("input closed, shutting down");
        Ok(())
    }

    /// Handle one incoming JSON-RPC message; `None` for notifications
    pub async fn handle_message(&mut self, message: &str) -> Option<JsonRpcResponse> {
        let request: JsonRpcRequest = match serde_json::from_str(message) {
            Ok(req) => req,
            Err(e) => {
                error!(error = %e, "unparseable message");
                return Some(JsonRpcResponse::error(None, JsonRpcError::parse_error(e.to_string())));
            }
        };

        if request.jsonrpc != JSONRPC_VERSION {
            return Some(JsonRpcResponse::error(
                request.id,
                JsonRpcError::invalid_request(format!("Unsupported jsonrpc version: {}", request.jsonrpc)),
            ));
        }

        let id = request.id.clone();
        let outcome = match request.method.as_str() {
            methods::INITIALIZE => self.handle_initialize(),
            methods::INITIALIZED => {
                self.initialized = true;
                return None;
            }
            methods::PING => Ok(serde_json::json!({})),
            methods::LIST_TOOLS => self.handle_list_tools(),
            methods::CALL_TOOL => self.handle_call_tool(request.params).await,
            other => Err(JsonRpcError::method_not_found(other)),
        };

        // Requests without an id are notifications and get no reply.
        id.as_ref()?;

        Some(match outcome {
            Ok(result) => JsonRpcResponse::success(id, result),
            Err(error) => JsonRpcResponse::error(id, error),
        })
    }

    fn handle_initialize(&self) -> std::result::Result<Value, JsonRpcError> {
        let result = InitializeResult {
            protocol_version: MCP_VERSION.to_string(),
            server_info: ServerInfo {
                name: SERVER_NAME.to_string(),
                version: SERVER_VERSION.to_string(),
            },
            capabilities: ServerCapabilities {
                tools: Some(ToolsCapability {}),
            },
        };

        to_result(&result)
    }

    fn handle_list_tools(&self) -> std::result::Result<Value, JsonRpcError> {
        to_result(&ListToolsResult {
            tools: self.adapter.list_tools(),
        })
    }

    async fn handle_call_tool(&self, params: Option<Value>) -> std::result::Result<Value, JsonRpcError> {
        let params: CallToolParams = match params {
            Some(p) => serde_json::from_value(p)
                .map_err(|e| JsonRpcError::invalid_params(format!("Invalid tool parameters: {}", e)))?,
            None => return Err(JsonRpcError::invalid_params("Missing tool parameters")),
        };

        debug!(tool = %params.name, "tools/call");
        let result = self.adapter.call_tool(&params.name, params.arguments).await;
        to_result(&result)
    }
}

fn to_result<T: serde::Serialize>(value: &T) -> std::result::Result<Value, JsonRpcError> {
    serde_json::to_value(value).map_err(|e| JsonRpcError::internal_error(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    use crate::tools::{ToolInvocation, ToolOutcome};

    struct Static;

    impl ToolProvider for Static {
        async fn invoke(&self, _invocation: ToolInvocation) -> ToolOutcome {
            ToolOutcome::success(json!({"ok": true}))
        }
    }

    fn request(id: i64, method: &str, params: Option<Value>) -> String {
        let mut request = json!({"jsonrpc": "2.0", "id": id, "method": method});
        if let Some(p) = params {
            request["params"] = p;
        }
        request.to_string()
    }

    #[tokio::test]
    async fn test_initialize() {
        let mut server = McpServer::new(Static);
        let response = server.handle_message(&request(1, "initialize", None)).await.unwrap();
        let result = response.result.unwrap();
        assert_eq!(result["serverInfo"]["name"], SERVER_NAME);
        assert_eq!(result["protocolVersion"], MCP_VERSION);
        assert!(result["capabilities"]["tools"].is_object());
    }

    #[tokio::test]
    async fn test_initialized_notification() {
        let mut server = McpServer::new(Static);
        let response = server
            .handle_message(r#"{"jsonrpc":"2.0","method":"notifications/initialized"}"#)
            .await;
        assert!(response.is_none());
        assert!(server.is_initialized());
    }

    #[tokio::test]
    async fn test_list_tools() {
        let mut server = McpServer::new(Static);
        let response = server.handle_message(&request(2, "tools/list", None)).await.unwrap();
        let tools = response.result.unwrap()["tools"].as_array().unwrap().clone();
        let names: Vec<&str> = tools.iter().map(|t| t["name"].as_str().unwrap()).collect();
        assert_eq!(
            names,
            ["list_emails", "search_emails", "send_email", "modify_email", "create_draft"]
        );
        assert_eq!(tools[1]["inputSchema"]["required"], json!(["accessToken", "query"]));
    }

    #[tokio::test]
    async fn test_call_tool_without_params() {
        let mut server = McpServer::new(Static);
        let response = server.handle_message(&request(3, "tools/call", None)).await.unwrap();
        assert_eq!(response.error.unwrap().code, -32602);
    }

    #[tokio::test]
    async fn test_unknown_method_and_parse_error() {
        let mut server = McpServer::new(Static);
        let response = server.handle_message(&request(4, "resources/list", None)).await.unwrap();
        assert_eq!(response.error.unwrap().code, -32601);

        let response = server.handle_message("{not json").await.unwrap();
        assert_eq!(response.error.unwrap().code, -32700);
        assert!(response.id.is_none());
    }

    #[tokio::test]
    async fn test_serve_over_buffers() {
        let mut server = McpServer::new(Static);
        let input = format!(
            "{}\n\n{}\n",
            request(1, "ping", None),
            request(
                2,
                "tools/call",
                Some(json!({"name": "list_emails", "arguments": {"accessToken": "t"}}))
            )
        );
        let mut output = Vec::new();

        server.serve(input.as_bytes(), &mut output).await.unwrap();

        let lines: Vec<Value> = String::from_utf8(output)
            .unwrap()
            .lines()
            .map(|l| serde_json::from_str(l).unwrap())
            .collect();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0]["result"], json!({}));
        assert_eq!(
            lines[1]["result"]["content"][0]["text"],
            serde_json::to_string_pretty(&json!({"ok": true})).unwrap()
        );
    }
}
