//! RAW heightmap read/write.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;
use std::sync::Arc;
use thiserror::Error;

use crate::mask::ScalarMask;
use crate::symmetry::SymmetryHierarchy;

/// Errors that can occur while reading or writing RAW heightmaps.
#[derive(Error, Debug)]
pub enum RawError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Invalid height scale: {0}")]
    InvalidHeightScale(f32),
    #[error("RAW file is {actual} bytes, expected {expected} for a {size}x{size} map")]
    SizeMismatch { size: usize, expected: u64, actual: u64 },
}

/// RAW sample layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RawFormat {
    /// 16-bit unsigned integer, little-endian, scaled by the height scale.
    #[default]
    R16LittleEndian,
    /// 32-bit float, little-endian, heights stored as-is.
    R32Float,
}

impl RawFormat {
    fn bytes_per_sample(self) -> u64 {
        match self {
            RawFormat::R16LittleEndian => 2,
            RawFormat::R32Float => 4,
        }
    }
}

/// Returns the expected file size of a `size`x`size` RAW heightmap.
pub fn expected_file_size(size: usize, format: RawFormat) -> u64 {
    (size as u64) * (size as u64) * format.bytes_per_sample()
}

/// Writes a heightmap in row-major order.
///
/// # Arguments
/// * `heightmap` - Heights to write
/// * `path` - Output file path
/// * `format` - Sample layout
/// * `height_scale` - Height written as `u16::MAX` (R16 only)
pub fn write_heightmap_raw(
    heightmap: &ScalarMask,
    path: &Path,
    format: RawFormat,
    height_scale: f32,
) -> Result<(), RawError> {
    if format != RawFormat::R32Float && height_scale <= 0.0 {
        return Err(RawError::InvalidHeightScale(height_scale));
    }

    let file = File::create(path)?;
    let mut writer = BufWriter::new(file);
    let quantize = |h: f32| ((h / height_scale).clamp(0.0, 1.0) * 65535.0).round() as u16;

    for &height in heightmap.values() {
        match format {
            RawFormat::R16LittleEndian => writer.write_all(&quantize(height).to_le_bytes())?,
            RawFormat::R32Float => writer.write_all(&height.to_le_bytes())?,
        }
    }

    writer.flush()?;
    Ok(())
}

/// Reads a `size`x`size` heightmap written by [`write_heightmap_raw`] or any
/// tool using the same layout.
pub fn read_heightmap_raw(
    path: &Path,
    size: usize,
    format: RawFormat,
    height_scale: f32,
    symmetry: Arc<SymmetryHierarchy>,
) -> Result<ScalarMask, RawError> {
    if format != RawFormat::R32Float && height_scale <= 0.0 {
        return Err(RawError::InvalidHeightScale(height_scale));
    }
    let bytes = std::fs::read(path)?;
    let expected = expected_file_size(size, format);
    if bytes.len() as u64 != expected {
        return Err(RawError::SizeMismatch { size, expected, actual: bytes.len() as u64 });
    }

    let scale = height_scale / 65535.0;
    let values: Vec<f32> = match format {
        RawFormat::R16LittleEndian => bytes
            .chunks_exact(2)
            .map(|b| u16::from_le_bytes([b[0], b[1]]) as f32 * scale)
            .collect(),
        RawFormat::R32Float => bytes
            .chunks_exact(4)
            .map(|b| f32::from_le_bytes([b[0], b[1], b[2], b[3]]))
            .collect(),
    };
    Ok(ScalarMask::from_values(size, values, symmetry))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::symmetry::Symmetry;
    use tempfile::tempdir;

    fn symmetry() -> Arc<SymmetryHierarchy> {
        Arc::new(SymmetryHierarchy::uniform(Symmetry::Point).unwrap())
    }

    fn ramp(size: usize) -> ScalarMask {
        let values = (0..size * size).map(|i| i as f32 * 0.25).collect();
        ScalarMask::from_values(size, values, symmetry())
    }

    #[test]
    fn test_r32_preserves_heights() {
        let heightmap = ramp(16);
        let dir = tempdir().unwrap();
        let path = dir.path().join("height.raw");

        write_heightmap_raw(&heightmap, &path, RawFormat::R32Float, 1.0).unwrap();
        assert_eq!(std::fs::metadata(&path).unwrap().len(), expected_file_size(16, RawFormat::R32Float));

        let read = read_heightmap_raw(&path, 16, RawFormat::R32Float, 1.0, symmetry()).unwrap();
        assert_eq!(read.values(), heightmap.values());
    }

    #[test]
    fn test_r16_content() {
        let mut heightmap = ScalarMask::new(2, symmetry());
        heightmap.set(1, 0, 50.0).set(0, 1, 100.0).set(1, 1, 250.0);
        let dir = tempdir().unwrap();
        let path = dir.path().join("height.r16");

        write_heightmap_raw(&heightmap, &path, RawFormat::R16LittleEndian, 100.0).unwrap();
        let data = std::fs::read(&path).unwrap();
        assert_eq!(data.len(), 8);
        assert_eq!(u16::from_le_bytes([data[0], data[1]]), 0);
        assert_eq!(u16::from_le_bytes([data[2], data[3]]), 32768);
        assert_eq!(u16::from_le_bytes([data[4], data[5]]), 65535);
        // Clamped to the scale.
        assert_eq!(u16::from_le_bytes([data[6], data[7]]), 65535);

        let read = read_heightmap_raw(&path, 2, RawFormat::R16LittleEndian, 100.0, symmetry()).unwrap();
        assert!((read.get(1, 0) - 50.0).abs() < 0.01);
    }

    #[test]
    fn test_wrong_size_rejected() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("height.raw");
        write_heightmap_raw(&ramp(8), &path, RawFormat::R32Float, 1.0).unwrap();

        let result = read_heightmap_raw(&path, 16, RawFormat::R32Float, 1.0, symmetry());
        assert!(matches!(result, Err(RawError::SizeMismatch { expected: 1024, actual: 256, .. })));
    }

    #[test]
    fn test_invalid_scale() {
        let dir = tempdir().unwrap();
        let result = write_heightmap_raw(&ramp(4), &dir.path().join("h.r16"), RawFormat::R16LittleEndian, 0.0);
        assert!(matches!(result, Err(RawError::InvalidHeightScale(_))));
    }
}
