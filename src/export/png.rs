//! PNG export for masks and heightmaps.

use std::fs::File;
use std::io::BufWriter;
use std::path::Path;
use image::codecs::png::{CompressionType, FilterType, PngEncoder};
use image::{ExtendedColorType, ImageEncoder};
use thiserror::Error;

use crate::mask::{BooleanMask, ScalarMask};

/// Errors that can occur during PNG export.
#[derive(Error, Debug)]
pub enum PngExportError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Image encoding error: {0}")]
    Image(#[from] image::ImageError),
    #[error("Invalid value range: min ({0}) >= max ({1})")]
    InvalidRange(f32, f32),
}

/// Encoder settings shared by every PNG written here.
#[derive(Debug, Clone)]
pub struct PngExportOptions {
    pub compression: CompressionType,
    pub filter: FilterType,
}

impl Default for PngExportOptions {
    fn default() -> Self {
        Self {
            compression: CompressionType::Default,
            filter: FilterType::Adaptive,
        }
    }
}

impl PngExportOptions {
    /// Fast settings for throwaway debug dumps.
    pub fn fast() -> Self {
        Self {
            compression: CompressionType::Fast,
            filter: FilterType::NoFilter,
        }
    }
}

/// Writes a boolean mask as an 8-bit grayscale PNG (true = white).
pub fn export_mask_png(mask: &BooleanMask, path: &Path, options: &PngExportOptions) -> Result<(), PngExportError> {
    let data: Vec<u8> = mask.grid().cells().iter().map(|&c| if c { 255 } else { 0 }).collect();
    write_png(&data, mask.size() as u32, ExtendedColorType::L8, path, options)
}

/// Writes a scalar mask as a 16-bit grayscale PNG, mapping `[min, max]` to
/// the full 16-bit range. Values outside the range are clamped.
///
/// # Arguments
/// * `mask` - The values to write
/// * `path` - Output file path
/// * `min_value` - Value written as black
/// * `max_value` - Value written as white
pub fn export_scalar_png(
    mask: &ScalarMask,
    path: &Path,
    min_value: f32,
    max_value: f32,
    options: &PngExportOptions,
) -> Result<(), PngExportError> {
    if min_value >= max_value {
        return Err(PngExportError::InvalidRange(min_value, max_value));
    }
    let range = max_value - min_value;
    let data: Vec<u16> = mask
        .values()
        .iter()
        .map(|&v| (((v - min_value) / range).clamp(0.0, 1.0) * 65535.0).round() as u16)
        .collect();
    write_png(bytemuck::cast_slice(&data), mask.size() as u32, ExtendedColorType::L16, path, options)
}

/// Writes a scalar mask stretched over its own value range. A flat mask is
/// written black.
pub fn export_scalar_png_auto(mask: &ScalarMask, path: &Path, options: &PngExportOptions) -> Result<(), PngExportError> {
    let (min, max) = mask.range();
    let max = if max > min { max } else { min + 1.0 };
    export_scalar_png(mask, path, min, max, options)
}

fn write_png(
    bytes: &[u8],
    size: u32,
    color: ExtendedColorType,
    path: &Path,
    options: &PngExportOptions,
) -> Result<(), PngExportError> {
    let file = File::create(path)?;
    let writer = BufWriter::new(file);
    let encoder = PngEncoder::new_with_quality(writer, options.compression, options.filter);
    encoder.write_image(bytes, size, size, color)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use crate::symmetry::{Symmetry, SymmetryHierarchy};
    use tempfile::tempdir;

    fn symmetry() -> Arc<SymmetryHierarchy> {
        Arc::new(SymmetryHierarchy::uniform(Symmetry::X).unwrap())
    }

    #[test]
    fn test_export_mask_png() {
        let mut mask = BooleanMask::new(32, 0, symmetry());
        mask.fill_circle(glam::Vec2::splat(16.0), 8.0, true);

        let dir = tempdir().unwrap();
        let path = dir.path().join("mask.png");
        export_mask_png(&mask, &path, &PngExportOptions::fast()).unwrap();

        let img = image::open(&path).unwrap().into_luma8();
        assert_eq!(img.dimensions(), (32, 32));
        assert_eq!(img.get_pixel(16, 16)[0], 255);
        assert_eq!(img.get_pixel(0, 0)[0], 0);
    }

    #[test]
    fn test_export_scalar_png_is_16_bit() {
        let values: Vec<f32> = (0..16 * 16).map(|i| (i % 16) as f32).collect();
        let mask = ScalarMask::from_values(16, values, symmetry());

        let dir = tempdir().unwrap();
        let path = dir.path().join("scalar.png");
        export_scalar_png_auto(&mask, &path, &PngExportOptions::default()).unwrap();

        let img = image::open(&path).unwrap().into_luma16();
        assert_eq!(img.get_pixel(0, 3)[0], 0);
        assert_eq!(img.get_pixel(15, 3)[0], 65535);
    }

    #[test]
    fn test_flat_scalar_exports() {
        let mask = ScalarMask::new(8, symmetry());
        let dir = tempdir().unwrap();
        export_scalar_png_auto(&mask, &dir.path().join("flat.png"), &PngExportOptions::fast()).unwrap();
    }

    #[test]
    fn test_invalid_range() {
        let mask = ScalarMask::new(8, symmetry());
        let dir = tempdir().unwrap();
        let result = export_scalar_png(&mask, &dir.path().join("x.png"), 1.0, -1.0, &PngExportOptions::default());
        assert!(matches!(result, Err(PngExportError::InvalidRange(_, _))));
    }
}
