//! The image codec the orchestrator delegates all pixel work to.

use std::path::Path;

use crate::error::ConvertError;
use crate::geometry::ResizeSpec;
use crate::params::FormatParams;

/// Decode, resize, encode and write images.
///
/// The orchestrator only sequences these calls, so a fake implementation
/// returning fixed sizes is enough to exercise path, validation and
/// aggregation logic. Implementations are shared across worker threads.
pub trait Codec: Send + Sync {
    /// Decoded image, including whatever metadata the codec carries along.
    type Image;

    fn decode(&self, path: &Path) -> Result<Self::Image, ConvertError>;

    fn dimensions(&self, image: &Self::Image) -> (u32, u32);

    /// Applies `spec`. Returning the image unchanged is correct when the
    /// planned resize is a no-op or would enlarge a guarded image.
    fn resize(&self, image: Self::Image, spec: &ResizeSpec) -> Result<Self::Image, ConvertError>;

    fn encode(&self, image: &Self::Image, params: &FormatParams) -> Result<Vec<u8>, ConvertError>;

    /// Encodes `image` and writes it to `path`, replacing any existing file.
    fn write_to_file(
        &self,
        image: &Self::Image,
        params: &FormatParams,
        path: &Path,
    ) -> Result<(), ConvertError> {
        let bytes = self.encode(image, params)?;
        std::fs::write(path, bytes).map_err(|e| ConvertError::filesystem(path, e))
    }

    /// Reads just enough of an encoded file to report its dimensions.
    fn probe(&self, path: &Path) -> Result<(u32, u32), ConvertError>;
}
