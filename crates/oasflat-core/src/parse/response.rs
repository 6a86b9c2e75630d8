use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use super::schema::Schema;

/// A response definition.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Response {
    #[serde(default)]
    pub description: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub schema: Option<Schema>,

    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub headers: IndexMap<String, serde_json::Value>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub examples: Option<serde_json::Value>,

    #[serde(flatten)]
    pub extensions: IndexMap<String, serde_json::Value>,
}

impl Response {
    pub fn with_schema(description: impl Into<String>, schema: Schema) -> Self {
        Self {
            description: description.into(),
            schema: Some(schema),
            ..Default::default()
        }
    }
}

/// A reference or inline response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ResponseOrRef {
    Ref {
        #[serde(rename = "$ref")]
        ref_path: String,
    },
    Response(Response),
}
