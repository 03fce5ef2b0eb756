//! Tool catalog
//!
//! Static descriptors for every tool, plus the two export formats hosts
//! consume: JSON Schema (`tools/list`) and the simplified per-field listing
//! (guest `describe`). Parameter names here are the argument names the
//! gateway reads; the required ones are checked before any call is made.

use serde::Serialize;
use serde_json::{json, Map, Value};

use crate::error::ValidationError;
use crate::tools::ToolId;

/// Primitive type of a tool parameter
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParamType {
    String,
    Number,
    StringArray,
}

impl ParamType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ParamType::String => "string",
            ParamType::Number => "number",
            ParamType::StringArray => "array",
        }
    }

    fn json_schema(&self, description: &str) -> Value {
        match self {
            ParamType::StringArray => json!({
                "type": "array",
                "items": {"type": "string"},
                "description": description,
            }),
            _ => json!({
                "type": self.as_str(),
                "description": description,
            }),
        }
    }
}

/// One tool parameter
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParamSpec {
    pub name: &'static str,
    pub param_type: ParamType,
    pub description: &'static str,
    pub required: bool,
}

/// Simplified per-field form of a parameter
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct FieldSpec {
    pub name: &'static str,
    #[serde(rename = "type")]
    pub field_type: &'static str,
    pub description: &'static str,
    pub optional: bool,
}

/// Static description of a tool
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolDescriptor {
    pub id: ToolId,
    pub label: &'static str,
    pub description: &'static str,
    pub parameters: &'static [ParamSpec],
}

impl ToolDescriptor {
    /// JSON Schema object describing the arguments
    pub fn input_schema(&self) -> Value {
        let properties: Map<String, Value> = self
            .parameters
            .iter()
            .map(|p| (p.name.to_string(), p.param_type.json_schema(p.description)))
            .collect();

        json!({
            "type": "object",
            "properties": properties,
            "required": self.required().collect::<Vec<_>>(),
        })
    }

    /// Simplified `{name, type, description, optional}` listing
    pub fn fields(&self) -> Vec<FieldSpec> {
        self.parameters
            .iter()
            .map(|p| FieldSpec {
                name: p.name,
                field_type: p.param_type.as_str(),
                description: p.description,
                optional: !p.required,
            })
            .collect()
    }

    /// Names of the required parameters, in declaration order
    pub fn required(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.parameters.iter().filter(|p| p.required).map(|p| p.name)
    }

    /// Fail on the first required parameter that is absent or `null`
    pub fn check_required(&self, arguments: &Map<String, Value>) -> Result<(), ValidationError> {
        match self
            .required()
            .find(|name| arguments.get(*name).map_or(true, Value::is_null))
        {
            Some(field) => Err(ValidationError::MissingField {
                field: field.to_string(),
            }),
            None => Ok(()),
        }
    }
}

const ACCESS_TOKEN: ParamSpec = ParamSpec {
    name: "accessToken",
    param_type: ParamType::String,
    description: "Google API OAuth2 access token",
    required: true,
};

const MAX_RESULTS: ParamSpec = ParamSpec {
    name: "maxResults",
    param_type: ParamType::Number,
    description: "Maximum number of emails to return (default: 10)",
    required: false,
};

const MESSAGE_PARAMS: &[ParamSpec] = &[
    ACCESS_TOKEN,
    ParamSpec {
        name: "to",
        param_type: ParamType::String,
        description: "Recipient email address",
        required: true,
    },
    ParamSpec {
        name: "subject",
        param_type: ParamType::String,
        description: "Email subject",
        required: true,
    },
    ParamSpec {
        name: "body",
        param_type: ParamType::String,
        description: "Email body (HTML)",
        required: true,
    },
    ParamSpec {
        name: "cc",
        param_type: ParamType::String,
        description: "CC recipients (comma-separated)",
        required: false,
    },
    ParamSpec {
        name: "bcc",
        param_type: ParamType::String,
        description: "BCC recipients (comma-separated)",
        required: false,
    },
];

static DESCRIPTORS: [ToolDescriptor; 5] = [
    ToolDescriptor {
        id: ToolId::ListEmails,
        label: "List Emails",
        description: "List recent emails from the Gmail mailbox",
        parameters: &[
            ACCESS_TOKEN,
            MAX_RESULTS,
            ParamSpec {
                name: "query",
                param_type: ParamType::String,
                description: "Search query to filter emails",
                required: false,
            },
        ],
    },
    ToolDescriptor {
        id: ToolId::SearchEmails,
        label: "Search Emails",
        description: "Search emails with a Gmail query",
        parameters: &[
            ACCESS_TOKEN,
            ParamSpec {
                name: "query",
                param_type: ParamType::String,
                description: "Gmail search query (e.g., \"from:example@gmail.com has:attachment\")",
                required: true,
            },
            MAX_RESULTS,
        ],
    },
    ToolDescriptor {
        id: ToolId::SendEmail,
        label: "Send Email",
        description: "Send a new HTML email",
        parameters: MESSAGE_PARAMS,
    },
    ToolDescriptor {
        id: ToolId::ModifyEmail,
        label: "Modify Email",
        description: "Modify email labels (archive, trash, mark read/unread)",
        parameters: &[
            ACCESS_TOKEN,
            ParamSpec {
                name: "id",
                param_type: ParamType::String,
                description: "Email ID",
                required: true,
            },
            ParamSpec {
                name: "addLabels",
                param_type: ParamType::StringArray,
                description: "Label IDs to add",
                required: false,
            },
            ParamSpec {
                name: "removeLabels",
                param_type: ParamType::StringArray,
                description: "Label IDs to remove",
                required: false,
            },
        ],
    },
    ToolDescriptor {
        id: ToolId::CreateDraft,
        label: "Create Draft",
        description: "Save a new HTML email as a draft",
        parameters: MESSAGE_PARAMS,
    },
];

/// Every descriptor, in catalog order
pub fn descriptors() -> &'static [ToolDescriptor] {
    &DESCRIPTORS
}

/// Descriptor for one tool
pub fn descriptor(tool: ToolId) -> &'static ToolDescriptor {
    DESCRIPTORS
        .iter()
        .find(|d| d.id == tool)
        .unwrap_or_else(|| unreachable!("every tool id has a descriptor"))
}
