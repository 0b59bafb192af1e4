use std::io::Write;

use webp::{Encoder, WebPConfig, WebPMemory};

use crate::encoders::common::to_8bit_rgb_maybe_a;
use crate::{codec_err, codec_try, error::ConvertError, image_rs::Image};

/// libwebp's slowest and most thorough method.
const MAX_METHOD: u8 = 6;

/// Lossy WebP at the given quality. `effort` becomes libwebp's `method`, 0 to 6.
pub fn encode<W: Write>(
    image: &Image,
    writer: &mut W,
    quality: u8,
    effort: u8,
) -> Result<(), ConvertError> {
    let mut config =
        WebPConfig::new().map_err(|()| codec_err!("WebP encoding failed: invalid libwebp version"))?;
    config.lossless = 0;
    config.quality = f32::from(quality);
    config.method = i32::from(effort.min(MAX_METHOD));
    tracing::debug!(quality, method = config.method, "encoding WebP");

    // libwebp only takes 8-bit RGB or RGBA input
    let pixels = to_8bit_rgb_maybe_a(&image.pixels);
    let encoder = Encoder::from_image(&pixels).map_err(|e| codec_err!("WebP encoding failed: {e}"))?;
    let webp: WebPMemory = encoder
        .encode_advanced(&config)
        .map_err(|e| codec_err!("WebP encoding failed: {e:?}"))?;
    // TODO: `webp` crate doesn't support setting the ICC profile:
    // https://github.com/jaredforth/webp/issues/41
    codec_try!(writer.write_all(&webp));
    Ok(())
}
