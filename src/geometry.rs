//! Resize policy: how a requested width/height and fit mode map onto output dimensions.
//!
//! The planning here is pure arithmetic so any codec, real or fake, agrees on the
//! dimension contract. Pixel work is left to the codec.

use serde::{Deserialize, Serialize};

use crate::utils::fraction::Fraction;

/// How an image is mapped into the target box.
#[derive(
    clap::ValueEnum,
    Serialize,
    Deserialize,
    Debug,
    Default,
    Clone,
    Copy,
    PartialEq,
    Eq,
)]
#[serde(rename_all = "lowercase")]
pub enum FitMode {
    /// Scale to cover the box, then crop the overflow.
    #[default]
    Cover,
    /// Scale to fit inside the box, then pad to its exact size.
    Contain,
    /// Stretch to the box, ignoring aspect ratio.
    Fill,
    /// Scale so both sides are at most the box, preserving aspect ratio.
    Inside,
    /// Scale so both sides are at least the box, preserving aspect ratio.
    Outside,
}

/// A requested resize. At least one of `width`/`height` is set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ResizeSpec {
    pub width: Option<u32>,
    pub height: Option<u32>,
    pub fit: FitMode,
    pub allow_enlarge: bool,
}

/// What the codec has to do to satisfy a [`ResizeSpec`] for a particular source.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResizePlan {
    /// Size the source is resampled to.
    pub resample: (u32, u32),
    /// Final canvas size after cropping or padding.
    pub output: (u32, u32),
    pub fit: FitMode,
}

impl ResizePlan {
    pub fn needs_crop(&self) -> bool {
        self.resample.0 > self.output.0 || self.resample.1 > self.output.1
    }

    pub fn needs_padding(&self) -> bool {
        self.resample.0 < self.output.0 || self.resample.1 < self.output.1
    }
}

impl ResizeSpec {
    /// Returns `None` when neither dimension was requested.
    pub fn new(
        width: Option<u32>,
        height: Option<u32>,
        fit: FitMode,
        allow_enlarge: bool,
    ) -> Option<Self> {
        if width.is_none() && height.is_none() {
            return None;
        }
        Some(Self {
            width,
            height,
            fit,
            allow_enlarge,
        })
    }

    /// Plans the resize of a `src_width`x`src_height` image.
    ///
    /// Returns `None` if the image should be left as it is, either because it already
    /// has the requested size or because honoring the request would enlarge it
    /// and enlarging is not allowed.
    pub fn plan(&self, src_width: u32, src_height: u32) -> Option<ResizePlan> {
        let src_width = src_width.max(1);
        let src_height = src_height.max(1);

        let plan = match (self.width, self.height) {
            (None, None) => return None,
            // a single bound always preserves aspect ratio, regardless of fit
            (Some(width), None) => {
                let height = Fraction::new(width, src_width).scale(src_height);
                ResizePlan {
                    resample: (width, height),
                    output: (width, height),
                    fit: self.fit,
                }
            }
            (None, Some(height)) => {
                let width = Fraction::new(height, src_height).scale(src_width);
                ResizePlan {
                    resample: (width, height),
                    output: (width, height),
                    fit: self.fit,
                }
            }
            (Some(width), Some(height)) => {
                let scale_x = Fraction::new(width, src_width);
                let scale_y = Fraction::new(height, src_height);
                match self.fit {
                    FitMode::Fill => ResizePlan {
                        resample: (width, height),
                        output: (width, height),
                        fit: self.fit,
                    },
                    FitMode::Cover => ResizePlan {
                        resample: scaled(src_width, src_height, scale_x.max(scale_y)),
                        output: (width, height),
                        fit: self.fit,
                    },
                    FitMode::Contain => ResizePlan {
                        resample: scaled(src_width, src_height, scale_x.min(scale_y)),
                        output: (width, height),
                        fit: self.fit,
                    },
                    FitMode::Inside => {
                        let size = scaled(src_width, src_height, scale_x.min(scale_y));
                        ResizePlan {
                            resample: size,
                            output: size,
                            fit: self.fit,
                        }
                    }
                    FitMode::Outside => {
                        let size = scaled(src_width, src_height, scale_x.max(scale_y));
                        ResizePlan {
                            resample: size,
                            output: size,
                            fit: self.fit,
                        }
                    }
                }
            }
        };

        let (resample_width, resample_height) = plan.resample;
        let enlarges = resample_width > src_width || resample_height > src_height;
        if enlarges && !self.allow_enlarge {
            return None;
        }
        if plan.resample == (src_width, src_height) && plan.output == plan.resample {
            return None;
        }
        Some(plan)
    }

    /// Output dimensions for a source of the given size.
    pub fn output_dimensions(&self, src_width: u32, src_height: u32) -> (u32, u32) {
        self.plan(src_width, src_height)
            .map(|plan| plan.output)
            .unwrap_or((src_width, src_height))
    }
}

fn scaled(width: u32, height: u32, factor: Fraction) -> (u32, u32) {
    (factor.scale(width), factor.scale(height))
}
