use std::fs;
use std::path::Path;

use serde::Deserialize;

use crate::error::ConfigError;

/// Options for inline schema flattening, loaded from `.oasflat.yaml`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct FlattenConfig {
    /// Give every inline schema its own definition instead of reusing a
    /// structurally identical one generated earlier.
    pub skip_matches: bool,
}

/// Default config file name.
pub const CONFIG_FILE_NAME: &str = ".oasflat.yaml";

/// Load config from a YAML file. Returns `None` if the file doesn't exist.
pub fn load_config(path: &Path) -> Result<Option<FlattenConfig>, ConfigError> {
    if !path.exists() {
        return Ok(None);
    }
    let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let config: FlattenConfig =
        serde_yaml_ng::from_str(&content).map_err(|source| ConfigError::Yaml {
            path: path.to_path_buf(),
            source,
        })?;
    Ok(Some(config))
}

/// Generate the default config file content.
pub fn default_config_content() -> &'static str {
    r#"# oasflat configuration

# true: every inline schema gets its own definition, even when an identical
# one was already generated elsewhere in the document.
skip_matches: false
"#
}
