pub mod operation;
pub mod parameter;
pub mod response;
pub mod schema;
pub mod spec;

use crate::error::ParseError;
use spec::SwaggerSpec;

/// Parse a Swagger 2.0 document from YAML.
pub fn from_yaml(input: &str) -> Result<SwaggerSpec, ParseError> {
    let spec: SwaggerSpec = serde_yaml_ng::from_str(input)?;
    validate_version(&spec)?;
    Ok(spec)
}

/// Parse a Swagger 2.0 document from JSON.
pub fn from_json(input: &str) -> Result<SwaggerSpec, ParseError> {
    let spec: SwaggerSpec = serde_json::from_str(input)?;
    validate_version(&spec)?;
    Ok(spec)
}

/// Serialize a document to YAML.
pub fn to_yaml(spec: &SwaggerSpec) -> Result<String, ParseError> {
    Ok(serde_yaml_ng::to_string(spec)?)
}

/// Serialize a document to pretty-printed JSON.
pub fn to_json(spec: &SwaggerSpec) -> Result<String, ParseError> {
    Ok(serde_json::to_string_pretty(spec)?)
}

fn validate_version(spec: &SwaggerSpec) -> Result<(), ParseError> {
    if !spec.swagger.starts_with("2.") {
        return Err(ParseError::UnsupportedVersion(spec.swagger.clone()));
    }
    Ok(())
}
