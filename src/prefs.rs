//! Last-used format and quality, remembered between runs.

use std::fs;
use std::io;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ConvertError;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Preferences {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quality: Option<i64>,
}

impl Preferences {
    /// A file that does not exist yet yields empty preferences.
    pub fn load(path: &Path) -> Result<Self, ConvertError> {
        let contents = match fs::read_to_string(path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Self::default()),
            Err(e) => return Err(ConvertError::filesystem(path, e)),
        };
        serde_json::from_str(&contents).map_err(|e| ConvertError::filesystem(path, e.into()))
    }

    pub fn save(&self, path: &Path) -> Result<(), ConvertError> {
        let json = serde_json::to_string_pretty(self)
            .map_err(|e| ConvertError::filesystem(path, e.into()))?;
        fs::write(path, json).map_err(|e| ConvertError::filesystem(path, e))
    }

    /// Values given now take precedence over the remembered ones.
    pub fn merged_with(&self, format: Option<&str>, quality: Option<i64>) -> Self {
        Self {
            format: format.map(str::to_owned).or_else(|| self.format.clone()),
            quality: quality.or(self.quality),
        }
    }
}
