//! Encoder parameters derived from a target format and an optional quality.

use serde::Serialize;

use crate::error::ConvertError;
use crate::format::TargetFormat;

const PNG_COMPRESSION_LEVEL: u8 = 9;
const WEBP_EFFORT: u8 = 6;
const AVIF_EFFORT: u8 = 6;
const GIF_EFFORT: u8 = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TiffCompression {
    Lzw,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum HeifCompression {
    Hevc,
}

/// Codec-specific settings handed to the encoder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "format", rename_all = "lowercase")]
pub enum FormatParams {
    Jpeg {
        quality: u8,
        progressive: bool,
        /// Prefer the trellis-quantising, mozjpeg-style encoder when one is available.
        mozjpeg: bool,
    },
    Png {
        quality: u8,
        compression_level: u8,
        progressive: bool,
    },
    WebP {
        quality: u8,
        effort: u8,
    },
    Avif {
        quality: u8,
        effort: u8,
    },
    Gif {
        effort: u8,
    },
    Tiff {
        quality: u8,
        compression: TiffCompression,
    },
    Heif {
        quality: u8,
        compression: HeifCompression,
    },
}

/// Explicit quality wins, otherwise the format's default.
pub fn resolve_quality(format: TargetFormat, quality: Option<u8>) -> Option<u8> {
    quality.or(format.default_quality())
}

impl FormatParams {
    /// Builds encoder settings for an already parsed format.
    pub fn for_format(format: TargetFormat, quality: Option<u8>) -> Self {
        // GIF is the only format without a default quality and it ignores quality anyway
        let q = resolve_quality(format, quality).unwrap_or(80);
        match format {
            TargetFormat::Jpg | TargetFormat::Jpeg => Self::Jpeg {
                quality: q,
                progressive: true,
                mozjpeg: true,
            },
            TargetFormat::Png => Self::Png {
                quality: q,
                compression_level: PNG_COMPRESSION_LEVEL,
                progressive: true,
            },
            TargetFormat::WebP => Self::WebP {
                quality: q,
                effort: WEBP_EFFORT,
            },
            TargetFormat::Avif => Self::Avif {
                quality: q,
                effort: AVIF_EFFORT,
            },
            TargetFormat::Gif => Self::Gif { effort: GIF_EFFORT },
            TargetFormat::Tiff => Self::Tiff {
                quality: q,
                compression: TiffCompression::Lzw,
            },
            TargetFormat::Heic | TargetFormat::Heif => Self::Heif {
                quality: q,
                compression: HeifCompression::Hevc,
            },
        }
    }

    /// Builds encoder settings from a format name as typed by a user.
    ///
    /// The name is checked here even if the request was validated before:
    /// the target format is unrelated to the input file's extension.
    pub fn resolve(format: &str, quality: Option<u8>) -> Result<Self, ConvertError> {
        Ok(Self::for_format(TargetFormat::parse(format)?, quality))
    }

    pub fn quality(&self) -> Option<u8> {
        match *self {
            Self::Jpeg { quality, .. }
            | Self::Png { quality, .. }
            | Self::WebP { quality, .. }
            | Self::Avif { quality, .. }
            | Self::Tiff { quality, .. }
            | Self::Heif { quality, .. } => Some(quality),
            Self::Gif { .. } => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    use quickcheck_macros::quickcheck;
    use strum::VariantArray;

    #[test]
    fn jpeg_uses_progressive_mozjpeg() {
        let expected = FormatParams::Jpeg {
            quality: 85,
            progressive: true,
            mozjpeg: true,
        };
        assert_eq!(FormatParams::resolve("jpeg", Some(85)).unwrap(), expected);
        let expected = FormatParams::Jpeg {
            quality: 75,
            progressive: true,
            mozjpeg: true,
        };
        assert_eq!(FormatParams::resolve("jpg", Some(75)).unwrap(), expected);
    }

    #[test]
    fn png_uses_max_compression() {
        let expected = FormatParams::Png {
            quality: 90,
            compression_level: 9,
            progressive: true,
        };
        assert_eq!(FormatParams::resolve("png", Some(90)).unwrap(), expected);
    }

    #[test]
    fn webp_and_avif_use_effort_six() {
        assert_eq!(
            FormatParams::resolve("webp", Some(80)).unwrap(),
            FormatParams::WebP {
                quality: 80,
                effort: 6
            }
        );
        assert_eq!(
            FormatParams::resolve("avif", Some(65)).unwrap(),
            FormatParams::Avif {
                quality: 65,
                effort: 6
            }
        );
    }

    #[test]
    fn tiff_and_heif_compression() {
        assert_eq!(
            FormatParams::resolve("tiff", Some(80)).unwrap(),
            FormatParams::Tiff {
                quality: 80,
                compression: TiffCompression::Lzw
            }
        );
        for name in ["heic", "heif"] {
            assert_eq!(
                FormatParams::resolve(name, Some(70)).unwrap(),
                FormatParams::Heif {
                    quality: 70,
                    compression: HeifCompression::Hevc
                }
            );
        }
    }

    #[test]
    fn defaults_apply_without_quality() {
        assert_eq!(
            FormatParams::resolve("webp", None).unwrap(),
            FormatParams::WebP {
                quality: 80,
                effort: 6
            }
        );
        assert_eq!(
            FormatParams::resolve("avif", None).unwrap(),
            FormatParams::Avif {
                quality: 65,
                effort: 6
            }
        );
    }

    #[test]
    fn unsupported_format_fails() {
        let err = FormatParams::resolve("bmp", Some(80)).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::UnsupportedFormat);
        assert_eq!(err.to_string(), "Unsupported format: bmp");
    }

    #[test]
    fn resolve_quality_falls_back_to_table() {
        for format in TargetFormat::VARIANTS {
            assert_eq!(resolve_quality(*format, None), format.default_quality());
        }
    }

    #[quickcheck]
    fn explicit_quality_is_kept(quality: u8) {
        let quality = quality.clamp(1, 100);
        for format in TargetFormat::VARIANTS {
            assert_eq!(resolve_quality(*format, Some(quality)), Some(quality));
        }
    }

    #[quickcheck]
    fn gif_ignores_quality(quality: Option<u8>) {
        assert_eq!(
            FormatParams::resolve("gif", quality).unwrap(),
            FormatParams::Gif { effort: 10 }
        );
    }
}
