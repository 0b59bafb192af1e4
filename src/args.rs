//! Command-line arguments of the `dpix` binary.

use std::path::PathBuf;

use clap::{ArgAction, Parser};

use crate::geometry::FitMode;
use crate::output_path::OutputTarget;
use crate::prefs::Preferences;
use crate::request::{ConversionRequest, DEFAULT_FORMAT};

/// Compress and optimize images with ease
#[derive(Parser, Debug)]
#[command(name = "dpix", disable_help_flag = true, disable_version_flag = true)]
pub struct Cli {
    /// Input image paths
    #[arg(value_name = "INPUT", required_unless_present = "version")]
    pub inputs: Vec<PathBuf>,

    /// Output path (default: input-compressed.ext)
    #[arg(short, long, value_name = "PATH", conflicts_with = "output_dir")]
    pub output: Option<PathBuf>,

    /// Write every output into this directory as NAME-compressed.FORMAT
    #[arg(short = 'd', long, value_name = "DIR")]
    pub output_dir: Option<PathBuf>,

    /// Resize width (maintains aspect ratio if height not specified)
    #[arg(short, long, allow_negative_numbers = true)]
    pub width: Option<i64>,

    /// Resize height (maintains aspect ratio if width not specified)
    #[arg(short = 'h', long, allow_negative_numbers = true)]
    pub height: Option<i64>,

    /// Quality (1-100, default varies by format)
    #[arg(short, long, allow_negative_numbers = true)]
    pub quality: Option<i64>,

    /// Output format (jpg, jpeg, png, webp, avif, gif, tiff, heic, heif) [default: webp]
    #[arg(short, long)]
    pub format: Option<String>,

    /// How to fit the image into width x height
    #[arg(long, value_enum, default_value_t = FitMode::Cover)]
    pub fit: FitMode,

    /// Do not enlarge images smaller than the specified dimensions
    #[arg(long)]
    pub no_enlarge: bool,

    /// Convert up to this many files at once
    #[arg(short, long, default_value_t = 1, value_parser = clap::value_parser!(u16).range(1..))]
    pub jobs: u16,

    /// Print the results as JSON instead of a summary
    #[arg(long)]
    pub json: bool,

    /// Remember the format and quality in this file and use them as defaults
    #[arg(long, value_name = "FILE")]
    pub prefs: Option<PathBuf>,

    /// More log output; repeat for even more
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,

    /// Print version
    #[arg(short = 'V', long)]
    pub version: bool,

    /// Print help
    #[arg(long, action = ArgAction::Help)]
    pub help: Option<bool>,
}

impl Cli {
    /// Format and quality given on the command line, with remembered values filling the gaps.
    pub fn preferences(&self, remembered: &Preferences) -> Preferences {
        remembered.merged_with(self.format.as_deref(), self.quality)
    }

    /// The request applied to every input file.
    pub fn template(&self, remembered: &Preferences) -> ConversionRequest {
        let prefs = self.preferences(remembered);
        let output = match (&self.output, &self.output_dir) {
            (Some(file), _) => OutputTarget::File(file.clone()),
            (None, Some(dir)) => OutputTarget::Directory(dir.clone()),
            (None, None) => OutputTarget::Sibling,
        };
        ConversionRequest {
            input_path: PathBuf::new(),
            output,
            format: prefs.format.unwrap_or_else(|| String::from(DEFAULT_FORMAT)),
            quality: prefs.quality,
            width: self.width,
            height: self.height,
            fit: self.fit,
            // enlarging is opt-out on the command line
            allow_enlarge: !self.no_enlarge,
        }
    }

    /// One file with no batch-only options: errors are terminal and reported as such.
    pub fn is_single_file(&self) -> bool {
        self.inputs.len() == 1 && self.output_dir.is_none() && !self.json
    }

    pub fn resize_requested(&self) -> bool {
        self.width.is_some() || self.height.is_some()
    }

    /// Default log filter when `RUST_LOG` is not set.
    pub fn log_level(&self) -> &'static str {
        match self.verbose {
            0 => "warn",
            1 => "info",
            _ => "debug",
        }
    }
}
