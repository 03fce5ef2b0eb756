//! Tool arguments
//!
//! Each tool's argument map is decoded into one of these structs. Required
//! presence is checked against the catalog first; these add type checking
//! and the non-empty rules. `validate` messages carry the wire name of the
//! field so errors read the way callers spell the argument.

use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::{Map, Value};
use validator::Validate;

use crate::error::{ToolError, ValidationError};

/// Arguments for `list_emails` and `search_emails`
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct MailboxQueryArgs {
    #[validate(length(min = 1, message = "accessToken"))]
    pub access_token: String,

    /// Page size; absent, zero or negative means the configured default
    #[serde(default)]
    pub max_results: Option<f64>,

    #[serde(default)]
    pub query: Option<String>,
}

impl MailboxQueryArgs {
    pub fn page_size(&self, default: u32) -> u32 {
        match self.max_results {
            Some(n) if n >= 1.0 => n.min(u32::MAX as f64) as u32,
            _ => default,
        }
    }

    pub fn query(&self) -> &str {
        self.query.as_deref().unwrap_or("")
    }
}

/// Arguments for `send_email` and `create_draft`
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ComposeArgs {
    #[validate(length(min = 1, message = "accessToken"))]
    pub access_token: String,

    #[validate(length(min = 1, message = "to"))]
    pub to: String,

    pub subject: String,

    pub body: String,

    #[serde(default)]
    pub cc: Option<String>,

    #[serde(default)]
    pub bcc: Option<String>,
}

/// Arguments for `modify_email`
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ModifyArgs {
    #[validate(length(min = 1, message = "accessToken"))]
    pub access_token: String,

    #[validate(length(min = 1, message = "id"))]
    pub id: String,

    #[serde(default, deserialize_with = "null_as_empty")]
    pub add_labels: Vec<String>,

    #[serde(default, deserialize_with = "null_as_empty")]
    pub remove_labels: Vec<String>,
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Ok(Option::<Vec<String>>::deserialize(deserializer)?.unwrap_or_default())
}

/// Decode and validate an argument map
pub fn parse<T>(arguments: &Map<String, Value>) -> Result<T, ToolError>
where
    T: DeserializeOwned + Validate,
{
    let args: T = serde_json::from_value(Value::Object(arguments.clone())).map_err(|e| {
        ValidationError::InvalidParameter {
            name: "arguments".to_string(),
            message: e.to_string(),
        }
    })?;

    args.validate().map_err(|errors| {
        let mut fields: Vec<String> = errors
            .field_errors()
            .into_iter()
            .flat_map(|(name, errs)| {
                errs.iter().map(move |e| {
                    e.message
                        .as_ref()
                        .map(|m| m.to_string())
                        .unwrap_or_else(|| name.to_string())
                })
            })
            .collect();
        fields.sort();

        ValidationError::EmptyField {
            field: fields.into_iter().next().unwrap_or_default(),
        }
    })?;

    Ok(args)
}
