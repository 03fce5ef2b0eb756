//! Tool contract shared by both host adapters
//!
//! A host adapter only ever needs two capabilities from the layer below it:
//! listing the tool descriptors and invoking a tool by id. Both are expressed
//! by [`ToolProvider`].

pub mod catalog;

use std::any::Any;
use std::fmt;
use std::future::Future;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::ToolError;

pub use catalog::{ParamSpec, ParamType, ToolDescriptor};

/// Closed set of tool ids
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ToolId {
    ListEmails,
    SearchEmails,
    SendEmail,
    ModifyEmail,
    CreateDraft,
}

impl ToolId {
    pub const ALL: [ToolId; 5] = [
        ToolId::ListEmails,
        ToolId::SearchEmails,
        ToolId::SendEmail,
        ToolId::ModifyEmail,
        ToolId::CreateDraft,
    ];

    /// Wire name of the tool
    pub fn as_str(&self) -> &'static str {
        match self {
            ToolId::ListEmails => "list_emails",
            ToolId::SearchEmails => "search_emails",
            ToolId::SendEmail => "send_email",
            ToolId::ModifyEmail => "modify_email",
            ToolId::CreateDraft => "create_draft",
        }
    }

    /// Prefix for human-readable failure text in the JSON-RPC shape
    pub fn error_prefix(&self) -> &'static str {
        match self {
            ToolId::ListEmails => "Error fetching emails",
            ToolId::SearchEmails => "Error searching emails",
            ToolId::SendEmail => "Error sending email",
            ToolId::ModifyEmail => "Error modifying email",
            ToolId::CreateDraft => "Error creating draft",
        }
    }

    /// Failure message used when a channel handler fails without writing output
    pub fn failure_fallback(&self) -> &'static str {
        match self {
            ToolId::ListEmails => "Failed to list emails",
            ToolId::SearchEmails => "Failed to search emails",
            ToolId::SendEmail => "Failed to send email",
            ToolId::ModifyEmail => "Failed to modify email",
            ToolId::CreateDraft => "Failed to create draft",
        }
    }
}

impl fmt::Display for ToolId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ToolId {
    type Err = ToolError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ToolId::ALL
            .into_iter()
            .find(|tool| tool.as_str() == s)
            .ok_or_else(|| ToolError::UnknownTool {
                name: s.to_string(),
            })
    }
}

/// A single incoming tool call
#[derive(Debug, Clone)]
pub struct ToolInvocation {
    pub tool: ToolId,
    pub arguments: Map<String, Value>,
}

impl ToolInvocation {
    pub fn new(tool: ToolId, arguments: Map<String, Value>) -> Self {
        Self { tool, arguments }
    }
}

/// Outcome of a tool call: exactly one of success or failure
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum ToolOutcome {
    Success {
        result: Value,
    },
    #[serde(rename = "error")]
    Failure {
        #[serde(rename = "error")]
        message: String,
    },
}

impl ToolOutcome {
    pub fn success(result: Value) -> Self {
        ToolOutcome::Success { result }
    }

    pub fn failure(message: impl Into<String>) -> Self {
        ToolOutcome::Failure {
            message: message.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, ToolOutcome::Success { .. })
    }
}

impl From<Result<Value, ToolError>> for ToolOutcome {
    fn from(result: Result<Value, ToolError>) -> Self {
        match result {
            Ok(value) => ToolOutcome::success(value),
            Err(e) => ToolOutcome::failure(e.to_string()),
        }
    }
}

/// Capability set a host adapter depends on
pub trait ToolProvider: Send + Sync {
    /// Descriptors for every tool this provider can invoke
    fn list_tools(&self) -> Vec<ToolDescriptor> {
        catalog::descriptors().to_vec()
    }

    /// Run one tool call to completion
    fn invoke(&self, invocation: ToolInvocation) -> impl Future<Output = ToolOutcome> + Send;
}

/// Turn host-supplied arguments into an argument map; `null` means "no arguments"
pub fn arguments_object(arguments: Value) -> Result<Map<String, Value>, ToolError> {
    match arguments {
        Value::Object(map) => Ok(map),
        Value::Null => Ok(Map::new()),
        other => Err(crate::error::ValidationError::InvalidParameter {
            name: "arguments".to_string(),
            message: format!("expected an object, got {}", other),
        }
        .into()),
    }
}

/// Best-effort text of a panic payload
pub fn panic_message(payload: Box<dyn Any + Send>) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "tool call panicked".to_string()
    }
}
