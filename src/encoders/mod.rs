//! One module per output format, each writing an [`Image`](crate::image_rs::Image)
//! with format-specific parameters.

pub mod common;

#[cfg(feature = "avif")]
pub mod avif;
#[cfg(feature = "gif")]
pub mod gif;
#[cfg(feature = "jpeg")]
pub mod jpeg;
#[cfg(feature = "png")]
pub mod png;
#[cfg(feature = "tiff")]
pub mod tiff;
#[cfg(feature = "webp")]
pub mod webp;
