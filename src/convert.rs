//! Converting a single file: validate, decode, resize, encode, measure.

use std::fs;
use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::{debug, warn};

use crate::codec::Codec;
use crate::error::ConvertError;
use crate::format::TargetFormat;
use crate::output_path::derive_output_path;
use crate::params::FormatParams;
use crate::report::savings_percent;
use crate::request::ConversionRequest;

/// Per-file progress checkpoints, in percent.
pub mod checkpoint {
    pub const STARTED: u8 = 0;
    pub const INPUT_READ: u8 = 20;
    pub const DECODED: u8 = 40;
    pub const RESIZED: u8 = 60;
    pub const PARAMS_RESOLVED: u8 = 80;
    pub const WRITTEN: u8 = 90;
    pub const DONE: u8 = 100;
}

/// Measurements of one successful conversion.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConversionResult {
    pub input_path: PathBuf,
    pub output_path: PathBuf,
    pub format: TargetFormat,
    pub original_size_bytes: u64,
    pub new_size_bytes: u64,
    /// Negative if the output is larger than the input.
    pub savings_percent: f64,
    pub original_width: u32,
    pub original_height: u32,
    pub new_width: u32,
    pub new_height: u32,
}

/// Runs the whole conversion of one file, calling `on_progress` with the
/// per-file percentage as each checkpoint is reached.
///
/// Nothing is written unless validation and output path derivation succeed.
pub fn convert_file<C: Codec>(
    codec: &C,
    request: &ConversionRequest,
    mut on_progress: impl FnMut(u8),
) -> Result<ConversionResult, ConvertError> {
    on_progress(checkpoint::STARTED);
    let valid = request.validate()?;
    let input = valid.input_path.as_path();

    let original_size_bytes = file_size(input)?;
    let output_path = derive_output_path(input, &valid.output, valid.format)?;
    on_progress(checkpoint::INPUT_READ);

    let image = codec.decode(input)?;
    let (original_width, original_height) = codec.dimensions(&image);
    debug!(original_width, original_height, "decoded");
    on_progress(checkpoint::DECODED);

    let image = match &valid.resize {
        Some(spec) => codec.resize(image, spec)?,
        None => image,
    };
    on_progress(checkpoint::RESIZED);

    let params = FormatParams::resolve(&request.format, valid.quality)?;
    on_progress(checkpoint::PARAMS_RESOLVED);

    codec.write_to_file(&image, &params, &output_path)?;
    on_progress(checkpoint::WRITTEN);

    let new_size_bytes = file_size(&output_path)?;
    let (new_width, new_height) = match codec.probe(&output_path) {
        Ok(dimensions) => dimensions,
        Err(e) => {
            // the encoder for a format may be compiled in while its decoder is not
            warn!("cannot read back {}: {e}", output_path.display());
            codec.dimensions(&image)
        }
    };
    on_progress(checkpoint::DONE);

    Ok(ConversionResult {
        input_path: valid.input_path.clone(),
        output_path,
        format: valid.format,
        original_size_bytes,
        new_size_bytes,
        savings_percent: savings_percent(original_size_bytes, new_size_bytes),
        original_width,
        original_height,
        new_width,
        new_height,
    })
}

fn file_size(path: &Path) -> Result<u64, ConvertError> {
    fs::metadata(path)
        .map(|metadata| metadata.len())
        .map_err(|e| ConvertError::filesystem(path, e))
}
