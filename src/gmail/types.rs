//! Gmail API type definitions
//!
//! These types mirror the subset of Gmail API requests and responses the tools
//! touch. Response types default every field so partial bodies still decode.
//! Message details are read as untyped JSON (see `utils::summarize`), so
//! [`Message`] only carries what send and modify responses are read for.

use serde::{Deserialize, Serialize};

/// A Gmail message
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct Message {
    /// Message ID
    #[serde(default)]
    pub id: String,

    /// Thread ID
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thread_id: Option<String>,

    /// Label IDs
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub label_ids: Vec<String>,
}

/// List of messages response
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct MessageList {
    /// Messages in this page; absent when the mailbox view is empty
    #[serde(default)]
    pub messages: Vec<MessageRef>,

    /// Next page token (not followed)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next_page_token: Option<String>,

    /// Result size estimate
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result_size_estimate: Option<u32>,
}

/// Reference to a message (id and thread_id only)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MessageRef {
    /// Message ID
    pub id: String,

    /// Thread ID
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thread_id: Option<String>,
}

/// A Gmail draft
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Draft {
    /// Draft ID
    #[serde(default)]
    pub id: String,

    /// Underlying message
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<Message>,
}

/// Request to send a message
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SendMessageRequest {
    /// Base64url-encoded RFC 2822 message
    pub raw: String,
}

/// Request to create a draft
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateDraftRequest {
    /// Draft message
    pub message: SendMessageRequest,
}

/// Request to modify message labels
///
/// Both lists are always serialized, empty or not.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct ModifyMessageRequest {
    pub add_label_ids: Vec<String>,
    pub remove_label_ids: Vec<String>,
}

/// Per-message summary returned by list and search
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct EmailSummary {
    pub id: String,
    pub subject: String,
    pub from: String,
    pub date: String,
}

/// Result of a send or modify call
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct MessageAck {
    /// Human-readable confirmation
    pub message: String,

    /// Gmail-assigned ID
    pub id: String,
}

impl MessageAck {
    pub fn new(message: impl Into<String>, id: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            id: id.into(),
        }
    }
}
