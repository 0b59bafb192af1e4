//! Error taxonomy shared by validation, path derivation, the codec and the orchestrator.

use std::io;
use std::path::PathBuf;

use serde::Serialize;
use strum::IntoStaticStr;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConvertError {
    #[error("File not found: {}", .0.display())]
    InputNotFound(PathBuf),

    #[error("Unsupported file type: {0}")]
    UnsupportedFileExtension(String),

    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),

    #[error("Quality must be a number between 1 and 100, got {0}")]
    InvalidQuality(i64),

    #[error("{axis} must be a positive number, got {value}")]
    InvalidDimension { axis: Axis, value: i64 },

    #[error(
        "Output path must be within the input directory or use an absolute path: {}",
        .0.display()
    )]
    PathTraversalRejected(PathBuf),

    /// Anything the underlying image libraries reject while decoding, resizing or encoding.
    #[error("{0}")]
    Codec(String),

    #[error("unable to access `{}': {source}", path.display())]
    Filesystem {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::Display)]
pub enum Axis {
    Width,
    Height,
}

/// Fieldless mirror of [`ConvertError`], carried by batch failure records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, IntoStaticStr)]
pub enum ErrorKind {
    InputNotFound,
    UnsupportedFileExtension,
    UnsupportedFormat,
    InvalidQuality,
    InvalidDimension,
    PathTraversalRejected,
    CodecError,
    FilesystemError,
}

impl ConvertError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::InputNotFound(_) => ErrorKind::InputNotFound,
            Self::UnsupportedFileExtension(_) => ErrorKind::UnsupportedFileExtension,
            Self::UnsupportedFormat(_) => ErrorKind::UnsupportedFormat,
            Self::InvalidQuality(_) => ErrorKind::InvalidQuality,
            Self::InvalidDimension { .. } => ErrorKind::InvalidDimension,
            Self::PathTraversalRejected(_) => ErrorKind::PathTraversalRejected,
            Self::Codec(_) => ErrorKind::CodecError,
            Self::Filesystem { .. } => ErrorKind::FilesystemError,
        }
    }

    pub fn filesystem(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::Filesystem {
            path: path.into(),
            source,
        }
    }
}

#[macro_export]
macro_rules! codec_err {
    ($($arg:tt)*) => {
        $crate::error::ConvertError::Codec(format!(
            "{} @ {}:{}:{}",
            format_args!($($arg)*),
            file!(),
            line!(),
            column!()
        ))
    };
}

#[macro_export]
macro_rules! codec_try {
    ($expr:expr $(,)?) => {
        match $expr {
            std::result::Result::Ok(val) => val,
            std::result::Result::Err(err) => {
                return std::result::Result::Err($crate::codec_err!("{}", err));
            }
        }
    };
}
