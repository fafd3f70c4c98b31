// src/engine/io.rs
//
// I/O collaborators: Source enum, decode to PixelBuffer, encode to disk.

use crate::engine::buffer::PixelBuffer;
use crate::error::{MosaicError, Result};
use image::{GrayImage, RgbImage};
use memmap2::Mmap;
use std::fs::File;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Image source - supports in-memory data, memory-mapped files, and paths.
#[derive(Clone, Debug)]
pub enum Source {
    /// In-memory encoded image data
    Memory(Arc<Vec<u8>>),
    /// Memory-mapped file (zero-copy access)
    Mapped(Arc<Mmap>),
    /// File path, read when decoded
    Path(PathBuf),
}

impl Source {
    pub fn from_memory(data: Vec<u8>) -> Self {
        Source::Memory(Arc::new(data))
    }

    /// Open a file as a memory-mapped source.
    pub fn open(path: &Path) -> Result<Self> {
        let display = path.display().to_string();
        if !path.exists() {
            return Err(MosaicError::file_not_found(display));
        }
        let file = File::open(path).map_err(|e| MosaicError::file_read_failed(display.clone(), e))?;
        // SAFETY: the mapping is read-only and lives as long as the Arc;
        // truncating the file underneath it is outside our contract.
        let mmap =
            unsafe { Mmap::map(&file) }.map_err(|e| MosaicError::mmap_failed(display, e))?;
        Ok(Source::Mapped(Arc::new(mmap)))
    }

    /// Decode the source into an RGB pixel buffer.
    pub fn decode(&self) -> Result<PixelBuffer> {
        let decoded = match self {
            Source::Memory(data) => decode_bytes(data),
            Source::Mapped(mmap) => decode_bytes(mmap),
            Source::Path(path) => Source::open(path)?.decode(),
        }?;
        Ok(decoded)
    }
}

fn decode_bytes(data: &[u8]) -> Result<PixelBuffer> {
    let image = image::load_from_memory(data)
        .map_err(|e| MosaicError::decode_failed(e.to_string()))?;
    let rgb = image.into_rgb8();
    let (width, height) = rgb.dimensions();
    // An RgbImage always holds exactly width * height * 3 bytes, so this
    // only fails for a degenerate zero-dimension decode.
    PixelBuffer::from_raw(width, height, 3, rgb.into_raw())
        .ok_or_else(|| MosaicError::decode_failed(format!("empty image ({width}x{height})")))
}

/// Load and decode the image at `path` into an RGB buffer.
pub fn load(path: &Path) -> Result<PixelBuffer> {
    let buffer = Source::open(path)?.decode()?;
    tracing::debug!(
        path = %path.display(),
        width = buffer.width(),
        height = buffer.height(),
        "image loaded"
    );
    Ok(buffer)
}

/// Encode `buffer` and write it to `path`; the format follows the file
/// extension. The in-memory buffer is untouched, so a failed save can be
/// retried by the caller.
pub fn save(path: &Path, buffer: &PixelBuffer) -> Result<()> {
    let (width, height) = (buffer.width(), buffer.height());
    let result = match buffer.channels() {
        3 => RgbImage::from_raw(width, height, buffer.as_raw().to_vec())
            .ok_or_else(|| MosaicError::encode_failed("buffer length mismatch"))?
            .save(path),
        1 => GrayImage::from_raw(width, height, buffer.as_raw().to_vec())
            .ok_or_else(|| MosaicError::encode_failed("buffer length mismatch"))?
            .save(path),
        other => return Err(MosaicError::unsupported_channel_count(other)),
    };
    result.map_err(|e| match e {
        image::ImageError::IoError(io) => {
            MosaicError::file_write_failed(path.display().to_string(), io)
        }
        other => MosaicError::encode_failed(other.to_string()),
    })?;
    tracing::debug!(path = %path.display(), "image saved");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCategory;

    fn checker(width: u32, height: u32) -> PixelBuffer {
        let mut buf = PixelBuffer::new(width, height, 3);
        for row in 0..height {
            for col in 0..width {
                let v = if (row + col) % 2 == 0 { 255 } else { 10 };
                buf.pixel_mut(row, col).copy_from_slice(&[v, 0, 255 - v]);
            }
        }
        buf
    }

    #[test]
    fn test_load_missing_file() {
        let err = load(Path::new("no/such/image.png")).unwrap_err();
        assert_eq!(err.category(), ErrorCategory::Load);
        assert!(matches!(err, MosaicError::FileNotFound { .. }));
    }

    #[test]
    fn test_decode_garbage_bytes() {
        let err = Source::from_memory(vec![0u8; 64]).decode().unwrap_err();
        assert!(matches!(err, MosaicError::DecodeFailed { .. }));
    }

    #[test]
    fn test_png_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.png");
        let original = checker(6, 4);
        save(&path, &original).unwrap();
        let reloaded = load(&path).unwrap();
        // PNG is lossless, so the pixels survive exactly.
        assert_eq!(reloaded, original);
    }

    #[test]
    fn test_save_to_missing_directory() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing").join("out.png");
        let err = save(&path, &checker(2, 2)).unwrap_err();
        assert_eq!(err.category(), ErrorCategory::Save);
    }

    #[test]
    fn test_save_rejects_two_channel_buffer() {
        let dir = tempfile::tempdir().unwrap();
        let buf = PixelBuffer::new(2, 2, 2);
        let err = save(&dir.path().join("out.png"), &buf).unwrap_err();
        assert!(matches!(err, MosaicError::UnsupportedChannelCount { channels: 2 }));
    }

    #[test]
    fn test_gray_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("gray.png");
        let data: Vec<u8> = (0..20).map(|v| v * 12).collect();
        let original = PixelBuffer::from_raw(5, 4, 1, data).unwrap();
        save(&path, &original).unwrap();
        let reloaded = load(&path).unwrap();
        // The loader normalizes to RGB; a gray source comes back with all
        // three channels equal.
        assert_eq!(reloaded.channels(), 3);
        for row in 0..4 {
            for col in 0..5 {
                let v = original.pixel(row, col)[0];
                assert_eq!(reloaded.pixel(row, col), &[v, v, v]);
            }
        }
    }
}
