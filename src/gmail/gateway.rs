//! Gmail operation gateway
//!
//! One method per tool. Every method is a stateless request/response
//! transformation: arguments in, Gmail REST calls out, a normalized result or
//! a [`ToolError`] back. The gateway holds only the HTTP client and the
//! configuration, so clones can run calls concurrently.

use std::sync::Arc;

use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tokio::task::JoinSet;
use tracing::{debug, info, warn};

use crate::config::Config;
use crate::error::{ToolError, ValidationError};
use crate::gmail::params::{self, ComposeArgs, MailboxQueryArgs, ModifyArgs};
use crate::gmail::types::*;
use crate::gmail::utils::{create_email_message, encode_raw_message, summarize, OutgoingEmail};
use crate::tools::{catalog, ToolId, ToolInvocation, ToolOutcome, ToolProvider};

const INVALID_RESPONSE: &str = "Invalid response from Gmail";

/// Gmail REST gateway
#[derive(Clone)]
pub struct GmailGateway {
    /// HTTP client
    http_client: reqwest::Client,

    config: Arc<Config>,
}

impl GmailGateway {
    /// Create a gateway with its own HTTP client
    pub fn new(config: Config) -> crate::error::Result<Self> {
        let http_client = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .build()?;

        Ok(Self {
            http_client,
            config: Arc::new(config),
        })
    }

    // ==================== Message Operations ====================

    /// List messages in the mailbox view selected by an optional query
    pub async fn list_emails(&self, args: &MailboxQueryArgs) -> Result<Vec<EmailSummary>, ToolError> {
        self.fetch_summaries(args, QueryMode::Optional).await
    }

    /// Same as [`list_emails`](Self::list_emails), but the query is mandatory
    pub async fn search_emails(&self, args: &MailboxQueryArgs) -> Result<Vec<EmailSummary>, ToolError> {
        self.fetch_summaries(args, QueryMode::Required).await
    }

    /// Send an HTML email; returns the Gmail-assigned message id
    pub async fn send_email(&self, args: &ComposeArgs) -> Result<MessageAck, ToolError> {
        let request = SendMessageRequest {
            raw: encoded_message(args),
        };
        let url = format!("{}/send", self.config.messages_url());

        let message: Message = self
            .post_json(&url, &args.access_token, &request, "Failed to send email")
            .await?;

        info!(message_id = %message.id, "email sent");
        Ok(MessageAck::new("Email sent successfully", message.id))
    }

    /// Save an HTML email as a draft
    pub async fn create_draft(&self, args: &ComposeArgs) -> Result<MessageAck, ToolError> {
        let request = CreateDraftRequest {
            message: SendMessageRequest {
                raw: encoded_message(args),
            },
        };

        let draft: Draft = self
            .post_json(
                &self.config.drafts_url(),
                &args.access_token,
                &request,
                "Failed to create draft",
            )
            .await?;

        info!(draft_id = %draft.id, "draft created");
        Ok(MessageAck::new("Draft created successfully", draft.id))
    }

    /// Add and remove labels on one message. Empty lists still issue the call.
    pub async fn modify_email(&self, args: &ModifyArgs) -> Result<MessageAck, ToolError> {
        let url = format!(
            "{}/{}/modify",
            self.config.messages_url(),
            urlencoding::encode(&args.id)
        );

        let request = ModifyMessageRequest {
            add_label_ids: args.add_labels.clone(),
            remove_label_ids: args.remove_labels.clone(),
        };

        let message: Message = self
            .post_json(&url, &args.access_token, &request, "Failed to modify email")
            .await?;

        let id = if message.id.is_empty() {
            args.id.clone()
        } else {
            message.id
        };

        info!(message_id = %id, "labels modified");
        Ok(MessageAck::new("Email modified successfully", id))
    }

    // ==================== Helpers ====================

    /// List, then fetch every message's headers concurrently.
    ///
    /// Output order follows the list call. The first failing detail fetch
    /// fails the whole call; remaining fetches are aborted with the set.
    async fn fetch_summaries(
        &self,
        args: &MailboxQueryArgs,
        mode: QueryMode,
    ) -> Result<Vec<EmailSummary>, ToolError> {
        let query = args.query();
        if mode == QueryMode::Required && query.is_empty() {
            return Err(ValidationError::EmptyField {
                field: "query".to_string(),
            }
            .into());
        }

        let max_results = args.page_size(self.config.default_max_results);
        let url = format!(
            "{}?maxResults={}&q={}",
            self.config.messages_url(),
            max_results,
            urlencoding::encode(query)
        );

        debug!(max_results, query, "listing messages");

        let response = self
            .http_client
            .get(&url)
            .bearer_auth(&args.access_token)
            .send()
            .await?;

        let list: MessageList = read_json(response, mode.failure_context()).await?;
        let count = list.messages.len();

        let mut tasks = JoinSet::new();
        for (index, msg_ref) in list.messages.into_iter().enumerate() {
            let client = self.http_client.clone();
            let url = format!(
                "{}/{}",
                self.config.messages_url(),
                urlencoding::encode(&msg_ref.id)
            );
            let token = args.access_token.clone();

            tasks.spawn(async move {
                let detail = fetch_detail(&client, &url, &token).await;
                (index, msg_ref.id, detail)
            });
        }

        let mut slots: Vec<Option<EmailSummary>> = vec![None; count];
        while let Some(joined) = tasks.join_next().await {
            let (index, id, detail) = joined.map_err(|e| ToolError::internal(e.to_string()))?;
            match detail? {
                Some(message) => slots[index] = Some(summarize(&id, &message)),
                None => warn!(message_id = %id, "skipping message with non-JSON detail body"),
            }
        }

        Ok(slots.into_iter().flatten().collect())
    }

    async fn post_json<B, T>(
        &self,
        url: &str,
        access_token: &str,
        body: &B,
        failure_context: &str,
    ) -> Result<T, ToolError>
    where
        B: serde::Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let response = self
            .http_client
            .post(url)
            .bearer_auth(access_token)
            .json(body)
            .send()
            .await?;

        read_json(response, failure_context).await
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum QueryMode {
    Optional,
    Required,
}

impl QueryMode {
    fn failure_context(&self) -> &'static str {
        match self {
            QueryMode::Optional => "Failed to fetch emails",
            QueryMode::Required => "Failed to search emails",
        }
    }
}

fn encoded_message(args: &ComposeArgs) -> String {
    let email = OutgoingEmail {
        to: args.to.clone(),
        subject: args.subject.clone(),
        body: args.body.clone(),
        cc: args.cc.clone(),
        bcc: args.bcc.clone(),
    };
    encode_raw_message(&create_email_message(&email))
}

/// Require HTTP 200 and a JSON body of the expected shape
async fn read_json<T: DeserializeOwned>(
    response: reqwest::Response,
    failure_context: &str,
) -> Result<T, ToolError> {
    let status = response.status();
    let text = response.text().await?;

    if status != StatusCode::OK {
        debug!(status = status.as_u16(), "gmail request failed");
        return Err(ToolError::upstream(format!("{}: {}", failure_context, text)));
    }

    serde_json::from_str(&text).map_err(|_| ToolError::upstream(INVALID_RESPONSE))
}

/// Fetch one message detail. `Ok(None)` when the body is not valid JSON.
async fn fetch_detail(
    client: &reqwest::Client,
    url: &str,
    access_token: &str,
) -> Result<Option<Value>, ToolError> {
    let response = client.get(url).bearer_auth(access_token).send().await?;
    let status = response.status();
    let text = response.text().await?;

    if status != StatusCode::OK {
        return Err(ToolError::upstream(format!(
            "Failed to fetch email details: {}",
            text
        )));
    }

    Ok(serde_json::from_str(&text).ok())
}

impl ToolProvider for GmailGateway {
    async fn invoke(&self, invocation: ToolInvocation) -> ToolOutcome {
        let tool = invocation.tool;
        let result = self.dispatch(invocation).await;

        match &result {
            Ok(_) => debug!(%tool, "tool call succeeded"),
            Err(e) => warn!(%tool, kind = e.kind(), error = %e, "tool call failed"),
        }

        result.into()
    }
}

impl GmailGateway {
    async fn dispatch(&self, invocation: ToolInvocation) -> Result<Value, ToolError> {
        let ToolInvocation { tool, arguments } = invocation;
        catalog::descriptor(tool).check_required(&arguments)?;

        match tool {
            ToolId::ListEmails => {
                let args = params::parse(&arguments)?;
                Ok(serde_json::to_value(self.list_emails(&args).await?)?)
            }
            ToolId::SearchEmails => {
                let args = params::parse(&arguments)?;
                Ok(serde_json::to_value(self.search_emails(&args).await?)?)
            }
            ToolId::SendEmail => {
                let args = params::parse(&arguments)?;
                Ok(serde_json::to_value(self.send_email(&args).await?)?)
            }
            ToolId::ModifyEmail => {
                let args = params::parse(&arguments)?;
                Ok(serde_json::to_value(self.modify_email(&args).await?)?)
            }
            ToolId::CreateDraft => {
                let args = params::parse(&arguments)?;
                Ok(serde_json::to_value(self.create_draft(&args).await?)?)
            }
        }
    }
}
