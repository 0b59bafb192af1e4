#![allow(dead_code)]

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::time::Duration;

use dpix::codec::Codec;
use dpix::codec_err;
use dpix::error::ConvertError;
use dpix::geometry::ResizeSpec;
use dpix::params::FormatParams;

/// Deterministic stand-in for a real codec.
///
/// Every decodable input is `source` pixels large, every encoding is
/// `encoded_len` bytes. Inputs whose file name starts with `corrupt` fail to
/// decode, inputs starting with `slow` take a while to decode.
pub struct FakeCodec {
    pub source: (u32, u32),
    pub encoded_len: usize,
    written: Mutex<HashMap<PathBuf, (u32, u32)>>,
    params_seen: Mutex<Vec<FormatParams>>,
}

impl FakeCodec {
    pub fn new(source: (u32, u32), encoded_len: usize) -> Self {
        Self {
            source,
            encoded_len,
            written: Mutex::new(HashMap::new()),
            params_seen: Mutex::new(Vec::new()),
        }
    }

    pub fn params_seen(&self) -> Vec<FormatParams> {
        self.params_seen.lock().unwrap().clone()
    }
}

fn name_starts_with(path: &Path, prefix: &str) -> bool {
    path.file_name()
        .map(|name| name.to_string_lossy().starts_with(prefix))
        .unwrap_or(false)
}

impl Codec for FakeCodec {
    type Image = (u32, u32);

    fn decode(&self, path: &Path) -> Result<(u32, u32), ConvertError> {
        fs::read(path).map_err(|e| ConvertError::filesystem(path, e))?;
        if name_starts_with(path, "corrupt") {
            return Err(codec_err!("Input file contains unsupported image format"));
        }
        if name_starts_with(path, "slow") {
            std::thread::sleep(Duration::from_millis(150));
        }
        Ok(self.source)
    }

    fn dimensions(&self, image: &(u32, u32)) -> (u32, u32) {
        *image
    }

    fn resize(&self, image: (u32, u32), spec: &ResizeSpec) -> Result<(u32, u32), ConvertError> {
        Ok(spec.output_dimensions(image.0, image.1))
    }

    fn encode(&self, _image: &(u32, u32), params: &FormatParams) -> Result<Vec<u8>, ConvertError> {
        self.params_seen.lock().unwrap().push(*params);
        Ok(vec![0xAB; self.encoded_len])
    }

    fn write_to_file(
        &self,
        image: &(u32, u32),
        params: &FormatParams,
        path: &Path,
    ) -> Result<(), ConvertError> {
        let bytes = self.encode(image, params)?;
        fs::write(path, bytes).map_err(|e| ConvertError::filesystem(path, e))?;
        self.written
            .lock()
            .unwrap()
            .insert(path.to_path_buf(), *image);
        Ok(())
    }

    fn probe(&self, path: &Path) -> Result<(u32, u32), ConvertError> {
        self.written
            .lock()
            .unwrap()
            .get(path)
            .copied()
            .ok_or_else(|| codec_err!("never wrote {}", path.display()))
    }
}

/// Creates `name` in `dir` filled with `size` bytes.
pub fn input_file(dir: &Path, name: &str, size: usize) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, vec![7u8; size]).unwrap();
    path
}
