use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use super::operation::PathItem;
use super::parameter::Parameter;
use super::response::Response;
use super::schema::Schema;

/// Info object describing the API.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Info {
    pub title: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    pub version: String,

    #[serde(rename = "termsOfService", skip_serializing_if = "Option::is_none")]
    pub terms_of_service: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub contact: Option<Contact>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub license: Option<License>,
}

/// Contact information.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Contact {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

/// License information.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct License {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

/// Tag definition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tag {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Top-level Swagger 2.0 document.
///
/// `definitions` is always present after deserialization, empty if the
/// document had none, so flattening can register new models unconditionally.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SwaggerSpec {
    pub swagger: String,

    pub info: Info,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub host: Option<String>,

    #[serde(rename = "basePath", skip_serializing_if = "Option::is_none")]
    pub base_path: Option<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub schemes: Vec<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub consumes: Vec<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub produces: Vec<String>,

    #[serde(default)]
    pub paths: IndexMap<String, PathItem>,

    #[serde(default)]
    pub definitions: IndexMap<String, Schema>,

    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub parameters: IndexMap<String, Parameter>,

    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub responses: IndexMap<String, Response>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<Tag>,

    /// Vendor extensions and sections this model keeps opaque
    /// (`securityDefinitions`, `security`, `externalDocs`).
    #[serde(flatten)]
    pub extensions: IndexMap<String, serde_json::Value>,
}

impl SwaggerSpec {
    /// An empty document with the given title and version.
    pub fn new(title: &str, version: &str) -> Self {
        Self {
            swagger: "2.0".to_string(),
            info: Info {
                title: title.to_string(),
                description: None,
                version: version.to_string(),
                terms_of_service: None,
                contact: None,
                license: None,
            },
            host: None,
            base_path: None,
            schemes: Vec::new(),
            consumes: Vec::new(),
            produces: Vec::new(),
            paths: IndexMap::new(),
            definitions: IndexMap::new(),
            parameters: IndexMap::new(),
            responses: IndexMap::new(),
            tags: Vec::new(),
            extensions: IndexMap::new(),
        }
    }
}
