use serde::{Deserialize, Serialize};

use super::schema::Schema;

/// Parameter location.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ParameterLocation {
    Query,
    Header,
    Path,
    FormData,
    Body,
}

/// An API parameter. Only `in: body` parameters carry a `schema`; the
/// `type`/`format`/`items` keys of the other locations stay in `extensions`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Parameter {
    pub name: String,

    #[serde(rename = "in")]
    pub location: ParameterLocation,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(default)]
    pub required: bool,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub schema: Option<Schema>,

    #[serde(flatten)]
    pub extensions: indexmap::IndexMap<String, serde_json::Value>,
}

impl Parameter {
    /// A required body parameter carrying `schema`.
    pub fn body(name: impl Into<String>, schema: Schema) -> Self {
        Self {
            name: name.into(),
            location: ParameterLocation::Body,
            description: None,
            required: true,
            schema: Some(schema),
            extensions: Default::default(),
        }
    }

    pub fn is_body(&self) -> bool {
        self.location == ParameterLocation::Body
    }
}

/// A reference or inline parameter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ParameterOrRef {
    Ref {
        #[serde(rename = "$ref")]
        ref_path: String,
    },
    Parameter(Parameter),
}
