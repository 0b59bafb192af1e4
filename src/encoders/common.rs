//! Helpers shared between all encoders

use std::borrow::Cow;

use image::{DynamicImage, ImageEncoder};

use crate::image_rs::Image;

pub fn write_icc(encoder: &mut impl ImageEncoder, image: &Image) {
    if let Some(icc) = image.icc.clone() {
        let _ = encoder.set_icc_profile(icc); // ignore UnsupportedError
    };
}

/// Converts to Rgb8, or Rgba8 if any pixel is actually transparent.
pub fn to_8bit_rgb_maybe_a(pixels: &DynamicImage) -> Cow<'_, DynamicImage> {
    use DynamicImage::*;
    match pixels {
        ImageRgb8(_) | ImageRgba8(_) => Cow::Borrowed(pixels),
        _ if !pixels.color().has_alpha() => Cow::Owned(ImageRgb8(pixels.to_rgb8())),
        _ => {
            let rgba = pixels.to_rgba8();
            if rgba.pixels().all(|p| p.0[3] == u8::MAX) {
                Cow::Owned(ImageRgb8(pixels.to_rgb8()))
            } else {
                Cow::Owned(ImageRgba8(rgba))
            }
        }
    }
}

/// 8-bit gray or RGB with the alpha channel dropped, for formats that cannot store alpha.
pub fn to_8bit_opaque(pixels: &DynamicImage) -> Cow<'_, DynamicImage> {
    use DynamicImage::*;
    match pixels {
        ImageLuma8(_) | ImageRgb8(_) => Cow::Borrowed(pixels),
        ImageLumaA8(_) | ImageLuma16(_) | ImageLumaA16(_) => {
            Cow::Owned(ImageLuma8(pixels.to_luma8()))
        }
        _ => Cow::Owned(ImageRgb8(pixels.to_rgb8())),
    }
}

/// Floating-point pixels narrowed to 16 bits, for integer-only formats.
pub fn to_integer_precision(pixels: &DynamicImage) -> Cow<'_, DynamicImage> {
    use DynamicImage::*;
    match pixels {
        ImageRgb32F(_) => Cow::Owned(ImageRgb16(pixels.to_rgb16())),
        ImageRgba32F(_) => Cow::Owned(ImageRgba16(pixels.to_rgba16())),
        _ => Cow::Borrowed(pixels),
    }
}
