//! Per-file conversion requests, as supplied by a caller, and their validation.

use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::{Axis, ConvertError};
use crate::format::{check_input_extension, TargetFormat};
use crate::geometry::{FitMode, ResizeSpec};
use crate::output_path::OutputTarget;

pub const DEFAULT_FORMAT: &str = "webp";

/// One input file plus everything needed to convert it, unchecked.
///
/// Numbers are kept wide and signed so out-of-range input from a CLI or an IPC
/// payload turns into a validation error instead of a parse failure.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ConversionRequest {
    pub input_path: PathBuf,
    pub output: OutputTarget,
    pub format: String,
    pub quality: Option<i64>,
    pub width: Option<i64>,
    pub height: Option<i64>,
    pub fit: FitMode,
    pub allow_enlarge: bool,
}

impl Default for ConversionRequest {
    fn default() -> Self {
        Self {
            input_path: PathBuf::new(),
            output: OutputTarget::Sibling,
            format: String::from(DEFAULT_FORMAT),
            quality: None,
            width: None,
            height: None,
            fit: FitMode::default(),
            allow_enlarge: false,
        }
    }
}

impl ConversionRequest {
    pub fn new(input_path: impl Into<PathBuf>) -> Self {
        Self {
            input_path: input_path.into(),
            ..Default::default()
        }
    }

    /// Checks the request before any codec work happens.
    ///
    /// Checks run in a fixed order: input existence, input extension,
    /// quality range, dimensions, target format.
    pub fn validate(&self) -> Result<ValidRequest, ConvertError> {
        check_input_exists(&self.input_path)?;
        check_input_extension(&self.input_path)?;

        let quality = self.quality.map(validate_quality).transpose()?;
        let width = self
            .width
            .map(|value| validate_dimension(Axis::Width, value))
            .transpose()?;
        let height = self
            .height
            .map(|value| validate_dimension(Axis::Height, value))
            .transpose()?;
        let format = TargetFormat::parse(&self.format)?;

        Ok(ValidRequest {
            input_path: self.input_path.clone(),
            output: self.output.clone(),
            format,
            quality,
            resize: ResizeSpec::new(width, height, self.fit, self.allow_enlarge),
        })
    }
}

/// A request that passed validation; the types now carry the invariants.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidRequest {
    pub input_path: PathBuf,
    pub output: OutputTarget,
    pub format: TargetFormat,
    /// Within `1..=100`.
    pub quality: Option<u8>,
    /// `None` means no resize; output dimensions equal input dimensions.
    pub resize: Option<ResizeSpec>,
}

fn check_input_exists(path: &Path) -> Result<(), ConvertError> {
    match path.try_exists() {
        Ok(true) => Ok(()),
        Ok(false) => Err(ConvertError::InputNotFound(path.to_path_buf())),
        Err(e) => Err(ConvertError::filesystem(path, e)),
    }
}

fn validate_quality(quality: i64) -> Result<u8, ConvertError> {
    match u8::try_from(quality) {
        Ok(q @ 1..=100) => Ok(q),
        _ => Err(ConvertError::InvalidQuality(quality)),
    }
}

fn validate_dimension(axis: Axis, value: i64) -> Result<u32, ConvertError> {
    match u32::try_from(value) {
        Ok(v) if v >= 1 => Ok(v),
        _ => Err(ConvertError::InvalidDimension { axis, value }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    use std::fs;

    fn existing_file(dir: &tempfile::TempDir, name: &str) -> PathBuf {
        let path = dir.path().join(name);
        fs::write(&path, b"not really an image").unwrap();
        path
    }

    #[test]
    fn defaults() {
        let request = ConversionRequest::new("/a/b.png");
        assert_eq!(request.format, "webp");
        assert_eq!(request.fit, FitMode::Cover);
        assert!(!request.allow_enlarge);
        assert_eq!(request.output, OutputTarget::Sibling);
    }

    #[test]
    fn valid_request() {
        let dir = tempfile::tempdir().unwrap();
        let input = existing_file(&dir, "photo.JPG");
        let request = ConversionRequest {
            format: String::from("AVIF"),
            quality: Some(40),
            width: Some(100),
            fit: FitMode::Inside,
            ..ConversionRequest::new(&input)
        };
        let valid = request.validate().unwrap();
        assert_eq!(valid.format, TargetFormat::Avif);
        assert_eq!(valid.quality, Some(40));
        assert_eq!(
            valid.resize,
            Some(ResizeSpec {
                width: Some(100),
                height: None,
                fit: FitMode::Inside,
                allow_enlarge: false,
            })
        );
    }

    #[test]
    fn no_dimensions_means_no_resize() {
        let dir = tempfile::tempdir().unwrap();
        let input = existing_file(&dir, "photo.png");
        assert_eq!(ConversionRequest::new(&input).validate().unwrap().resize, None);
    }

    #[test]
    fn missing_input_is_checked_first() {
        // every other field is invalid too, the missing file must win
        let request = ConversionRequest {
            format: String::from("bmp"),
            quality: Some(0),
            width: Some(-1),
            ..ConversionRequest::new("/definitely/not/here.txt")
        };
        assert_eq!(request.validate().unwrap_err().kind(), ErrorKind::InputNotFound);
    }

    #[test]
    fn extension_is_checked_before_options() {
        let dir = tempfile::tempdir().unwrap();
        let input = existing_file(&dir, "notes.txt");
        let request = ConversionRequest {
            quality: Some(0),
            ..ConversionRequest::new(&input)
        };
        assert_eq!(
            request.validate().unwrap_err().kind(),
            ErrorKind::UnsupportedFileExtension
        );
    }

    #[test]
    fn quality_range() {
        let dir = tempfile::tempdir().unwrap();
        let input = existing_file(&dir, "photo.png");
        for bad in [0, 101, -5, 1000] {
            let request = ConversionRequest {
                quality: Some(bad),
                ..ConversionRequest::new(&input)
            };
            let err = request.validate().unwrap_err();
            assert_eq!(err.kind(), ErrorKind::InvalidQuality, "{bad}");
        }
        for good in [1, 50, 100] {
            let request = ConversionRequest {
                quality: Some(good),
                ..ConversionRequest::new(&input)
            };
            assert!(request.validate().is_ok(), "{good}");
        }
    }

    #[test]
    fn dimensions_must_be_positive() {
        let dir = tempfile::tempdir().unwrap();
        let input = existing_file(&dir, "photo.png");
        let request = ConversionRequest {
            width: Some(0),
            ..ConversionRequest::new(&input)
        };
        let err = request.validate().unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidDimension);
        assert_eq!(err.to_string(), "Width must be a positive number, got 0");

        let request = ConversionRequest {
            height: Some(-20),
            ..ConversionRequest::new(&input)
        };
        assert_eq!(request.validate().unwrap_err().kind(), ErrorKind::InvalidDimension);

        let request = ConversionRequest {
            height: Some(i64::from(u32::MAX) + 1),
            ..ConversionRequest::new(&input)
        };
        assert_eq!(request.validate().unwrap_err().kind(), ErrorKind::InvalidDimension);
    }

    #[test]
    fn unknown_target_format() {
        let dir = tempfile::tempdir().unwrap();
        let input = existing_file(&dir, "photo.png");
        let request = ConversionRequest {
            format: String::from("bmp"),
            ..ConversionRequest::new(&input)
        };
        assert_eq!(request.validate().unwrap_err().kind(), ErrorKind::UnsupportedFormat);
    }

    #[test]
    fn deserializes_ipc_payload() {
        let json = r#"{
            "inputPath": "/photos/a.heic",
            "output": {"directory": "/exports"},
            "format": "jpg",
            "quality": 70,
            "width": 1920,
            "fit": "inside",
            "allowEnlarge": true
        }"#;
        let request: ConversionRequest = serde_json::from_str(json).unwrap();
        assert_eq!(request.input_path, PathBuf::from("/photos/a.heic"));
        assert_eq!(request.output, OutputTarget::Directory(PathBuf::from("/exports")));
        assert_eq!(request.format, "jpg");
        assert_eq!(request.quality, Some(70));
        assert_eq!(request.width, Some(1920));
        assert_eq!(request.height, None);
        assert_eq!(request.fit, FitMode::Inside);
        assert!(request.allow_enlarge);
    }
}
