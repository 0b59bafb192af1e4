//! `dpix` converts batches of images to another format, optionally resizing them,
//! and reports how much smaller each file got.
//!
//! All pixel work goes through a [`Codec`](codec::Codec); [`ImageRsCodec`](image_rs::ImageRsCodec)
//! is the one shipped with the crate.

#![forbid(unsafe_code)]

#[cfg(feature = "hardened_malloc")]
#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

pub mod args;
pub mod codec;
pub mod convert;
mod encoders;
pub mod error;
pub mod format;
pub mod geometry;
pub mod help;
pub mod image_rs;
pub mod output_path;
pub mod params;
pub mod plan;
pub mod prefs;
pub mod report;
pub mod request;
mod utils;
