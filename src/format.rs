//! Output formats, their default quality and the set of accepted input extensions.

use std::path::Path;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use strum::{EnumString, IntoStaticStr, VariantArray};

use crate::error::ConvertError;

/// Extensions accepted as conversion inputs, compared case-insensitively.
pub const SUPPORTED_INPUT_EXTENSIONS: &[&str] = &[
    "jpg", "jpeg", "png", "gif", "webp", "avif", "tiff", "heic", "heif",
];

/// Target format of a conversion.
///
/// `jpg`/`jpeg` and `heic`/`heif` encode identically but are kept apart
/// because the spelling chosen by the caller ends up in the output file name.
#[derive(
    EnumString,
    IntoStaticStr,
    VariantArray,
    Serialize,
    Deserialize,
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
#[serde(rename_all = "lowercase")]
pub enum TargetFormat {
    Jpg,
    Jpeg,
    Png,
    WebP,
    Avif,
    Gif,
    Tiff,
    Heic,
    Heif,
}

impl TargetFormat {
    /// Parses a user-supplied format name, e.g. `"webp"` or `"JPG"`.
    pub fn parse(name: &str) -> Result<Self, ConvertError> {
        Self::from_str(name).map_err(|_| ConvertError::UnsupportedFormat(name.to_owned()))
    }

    /// Quality used when the caller does not pick one.
    /// GIF has no quality knob, only encoder effort.
    pub fn default_quality(&self) -> Option<u8> {
        match self {
            Self::Jpg | Self::Jpeg | Self::Png | Self::WebP | Self::Tiff => Some(80),
            Self::Avif => Some(65),
            Self::Heic | Self::Heif => Some(75),
            Self::Gif => None,
        }
    }

    /// Extension written after `-compressed.` in derived output names.
    pub fn extension(&self) -> &'static str {
        self.into()
    }
}

impl std::fmt::Display for TargetFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.extension())
    }
}

/// Rejects inputs whose extension is not one the converter accepts.
pub fn check_input_extension(path: &Path) -> Result<(), ConvertError> {
    let extension = path
        .extension()
        .map(|ext| ext.to_string_lossy().to_ascii_lowercase())
        .unwrap_or_default();
    if SUPPORTED_INPUT_EXTENSIONS.contains(&extension.as_str()) {
        Ok(())
    } else if extension.is_empty() {
        Err(ConvertError::UnsupportedFileExtension(String::from("(none)")))
    } else {
        Err(ConvertError::UnsupportedFileExtension(format!(".{extension}")))
    }
}
