//! The production [`Codec`], built on the `image` crate, `fast_image_resize`
//! and the per-format encoders.

use std::io::Cursor;
use std::path::Path;

use fast_image_resize::{ResizeOptions, Resizer};
use image::{ColorType, DynamicImage, GenericImage, ImageDecoder, ImageReader, Limits};

use crate::codec::Codec;
use crate::encoders;
use crate::error::ConvertError;
use crate::geometry::{FitMode, ResizePlan, ResizeSpec};
use crate::params::FormatParams;
use crate::{codec_err, codec_try};

#[derive(Debug, Clone)]
pub struct Image {
    pub icc: Option<Vec<u8>>,
    pub pixels: DynamicImage,
}

impl From<DynamicImage> for Image {
    fn from(pixels: DynamicImage) -> Self {
        Self { icc: None, pixels }
    }
}

/// Guesses the input format from file contents, not from the extension.
#[derive(Debug, Default, Clone, Copy)]
pub struct ImageRsCodec;

impl Codec for ImageRsCodec {
    type Image = Image;

    fn decode(&self, path: &Path) -> Result<Image, ConvertError> {
        let reader = ImageReader::open(path).map_err(|e| ConvertError::filesystem(path, e))?;
        let reader = codec_try!(reader.with_guessed_format());
        let mut decoder = codec_try!(reader.into_decoder());
        // a broken ICC chunk should not make the whole image unreadable
        let icc = decoder.icc_profile().unwrap_or_default();
        let pixels = codec_try!(DynamicImage::from_decoder(decoder));
        Ok(Image { icc, pixels })
    }

    fn dimensions(&self, image: &Image) -> (u32, u32) {
        (image.pixels.width(), image.pixels.height())
    }

    fn resize(&self, image: Image, spec: &ResizeSpec) -> Result<Image, ConvertError> {
        let (width, height) = self.dimensions(&image);
        let Some(plan) = spec.plan(width, height) else {
            return Ok(image);
        };
        let pixels = apply_plan(&image.pixels, &plan)?;
        Ok(Image { pixels, ..image })
    }

    fn encode(&self, image: &Image, params: &FormatParams) -> Result<Vec<u8>, ConvertError> {
        let mut buffer = Cursor::new(Vec::new());
        match *params {
            #[cfg(feature = "jpeg")]
            FormatParams::Jpeg {
                quality,
                progressive,
                mozjpeg,
            } => encoders::jpeg::encode(image, &mut buffer, quality, progressive, mozjpeg)?,
            #[cfg(feature = "png")]
            FormatParams::Png {
                compression_level,
                progressive,
                ..
            } => encoders::png::encode(image, &mut buffer, compression_level, progressive)?,
            #[cfg(feature = "webp")]
            FormatParams::WebP { quality, effort } => {
                encoders::webp::encode(image, &mut buffer, quality, effort)?
            }
            #[cfg(feature = "avif")]
            FormatParams::Avif { quality, effort } => {
                encoders::avif::encode(image, &mut buffer, quality, effort)?
            }
            #[cfg(feature = "gif")]
            FormatParams::Gif { effort } => encoders::gif::encode(image, &mut buffer, effort)?,
            #[cfg(feature = "tiff")]
            FormatParams::Tiff { compression, .. } => {
                encoders::tiff::encode(image, &mut buffer, compression)?
            }
            FormatParams::Heif { .. } => {
                return Err(codec_err!("no encode delegate for this image format `HEIF'"));
            }
            #[allow(unreachable_patterns)]
            other => {
                return Err(codec_err!(
                    "no encode delegate for this image format: {other:?}"
                ));
            }
        }
        Ok(buffer.into_inner())
    }

    fn probe(&self, path: &Path) -> Result<(u32, u32), ConvertError> {
        let reader = ImageReader::open(path).map_err(|e| ConvertError::filesystem(path, e))?;
        let reader = codec_try!(reader.with_guessed_format());
        Ok(codec_try!(reader.into_dimensions()))
    }
}

/// Every buffer a plan allocates is charged against the same allocation budget
/// `image` applies when decoding.
fn apply_plan(pixels: &DynamicImage, plan: &ResizePlan) -> Result<DynamicImage, ConvertError> {
    let mut limits = Limits::default();
    let color = pixels.color();
    if plan.resample != (pixels.width(), pixels.height()) {
        reserve(&mut limits, plan.resample, color)?;
    }
    if plan.output != plan.resample {
        reserve(&mut limits, plan.output, color)?;
    }

    let resampled = resample(pixels, plan.resample)?;
    let (width, height) = plan.output;
    if plan.needs_crop() {
        // cover keeps the center of the image
        let x = (plan.resample.0 - width.min(plan.resample.0)) / 2;
        let y = (plan.resample.1 - height.min(plan.resample.1)) / 2;
        Ok(resampled.crop_imm(x, y, width, height))
    } else if plan.needs_padding() {
        debug_assert_eq!(plan.fit, FitMode::Contain);
        let mut canvas = DynamicImage::new(width, height, color);
        let x = (width - plan.resample.0) / 2;
        let y = (height - plan.resample.1) / 2;
        codec_try!(canvas.copy_from(&resampled, x, y));
        Ok(canvas)
    } else {
        Ok(resampled)
    }
}

fn reserve(
    limits: &mut Limits,
    (width, height): (u32, u32),
    color: ColorType,
) -> Result<(), ConvertError> {
    limits
        .reserve_buffer(width, height, color)
        .map_err(|e| codec_err!("cannot resize to {width}x{height}: {e}"))
}

fn resample(pixels: &DynamicImage, (width, height): (u32, u32)) -> Result<DynamicImage, ConvertError> {
    if pixels.width() == width && pixels.height() == height {
        return Ok(pixels.clone());
    }
    let mut resizer = Resizer::new();
    let mut resized = DynamicImage::new(width, height, pixels.color());
    let options = ResizeOptions::default();
    codec_try!(resizer.resize(pixels, &mut resized, Some(&options)));
    Ok(resized)
}
