//! Map folder import and export.

use std::path::Path;
use std::sync::Arc;
use thiserror::Error;
use tracing::debug;

use crate::export::{
    export_scalar_png, read_heightmap_raw, write_heightmap_raw, PngExportError, PngExportOptions, RawError,
    RawFormat,
};
use crate::map::GameMap;
use crate::mask::ScalarMask;
use crate::symmetry::SymmetryHierarchy;
use super::document::MapDocument;

/// Name of the document inside a map folder.
pub const MAP_FILE: &str = "map.json";

/// Errors that can occur while reading or writing a map folder.
#[derive(Error, Debug)]
pub enum MapIoError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Invalid map document: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Image decoding error: {0}")]
    Image(#[from] image::ImageError),
    #[error("PNG export error: {0}")]
    Png(#[from] PngExportError),
    #[error("RAW heightmap error: {0}")]
    Raw(#[from] RawError),
    #[error("Unsupported heightmap file: {0}")]
    UnsupportedHeightmap(String),
    #[error("Heightmap is {width}x{height}, expected {expected}x{expected}")]
    SizeMismatch { expected: usize, width: u32, height: u32 },
    #[error("Map size must be positive")]
    EmptyMap,
    #[error("Spawns must come in symmetric pairs, got {0}")]
    OddSpawnCount(usize),
    #[error("Spawn {index} at ({x}, {y}) is outside the map")]
    SpawnOutOfBounds { index: usize, x: f32, y: f32 },
}

/// Heightmap encodings recognised by file extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeightmapFormat {
    /// 16-bit grayscale PNG (`.png`).
    Png16,
    /// RAW samples (`.raw`/`.r32` float, `.r16` 16-bit little-endian).
    Raw(RawFormat),
}

impl HeightmapFormat {
    pub fn from_file_name(name: &str) -> Result<Self, MapIoError> {
        let extension = Path::new(name)
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase);
        match extension.as_deref() {
            Some("png") => Ok(HeightmapFormat::Png16),
            Some("raw") | Some("r32") => Ok(HeightmapFormat::Raw(RawFormat::R32Float)),
            Some("r16") => Ok(HeightmapFormat::Raw(RawFormat::R16LittleEndian)),
            _ => Err(MapIoError::UnsupportedHeightmap(name.to_string())),
        }
    }
}

/// Reads `map.json` from `dir`.
pub fn load_document(dir: &Path) -> Result<MapDocument, MapIoError> {
    let text = std::fs::read_to_string(dir.join(MAP_FILE))?;
    Ok(serde_json::from_str(&text)?)
}

/// Reads a map folder into a [`GameMap`] whose masks use `symmetry`.
///
/// Returns the document too, so the export can keep its inputs.
pub fn load_map(dir: &Path, symmetry: Arc<SymmetryHierarchy>) -> Result<(MapDocument, GameMap), MapIoError> {
    let document = load_document(dir)?;
    if document.size == 0 {
        return Err(MapIoError::EmptyMap);
    }
    if document.spawns.len() % 2 != 0 {
        return Err(MapIoError::OddSpawnCount(document.spawns.len()));
    }
    let limit = document.size as f32;
    for (index, spawn) in document.spawns.iter().enumerate() {
        if spawn.x < 0.0 || spawn.y < 0.0 || spawn.x >= limit || spawn.y >= limit {
            return Err(MapIoError::SpawnOutOfBounds { index, x: spawn.x, y: spawn.y });
        }
    }

    let heightmap = load_heightmap(dir, &document, symmetry)?;
    debug!(
        size = document.size,
        spawns = document.spawns.len(),
        heightmap = %document.heightmap,
        "map folder loaded"
    );
    let map = GameMap::new(heightmap, document.water, document.spawns.clone(), document.mex_count);
    Ok((document, map))
}

fn load_heightmap(dir: &Path, document: &MapDocument, symmetry: Arc<SymmetryHierarchy>) -> Result<ScalarMask, MapIoError> {
    let path = dir.join(&document.heightmap);
    let size = document.size;
    match HeightmapFormat::from_file_name(&document.heightmap)? {
        HeightmapFormat::Png16 => {
            let image = image::open(&path)?.into_luma16();
            let (width, height) = image.dimensions();
            if width as usize != size || height as usize != size {
                return Err(MapIoError::SizeMismatch { expected: size, width, height });
            }
            let scale = document.height_scale / 65535.0;
            let values = image.into_raw().into_iter().map(|v| v as f32 * scale).collect();
            Ok(ScalarMask::from_values(size, values, symmetry))
        }
        HeightmapFormat::Raw(format) => {
            Ok(read_heightmap_raw(&path, size, format, document.height_scale, symmetry)?)
        }
    }
}

/// Writes `map` to `dir`: the heightmap in the document's format and a
/// `map.json` listing every placed entity.
pub fn save_map(dir: &Path, document: &MapDocument, map: &GameMap) -> Result<(), MapIoError> {
    std::fs::create_dir_all(dir)?;

    let path = dir.join(&document.heightmap);
    match HeightmapFormat::from_file_name(&document.heightmap)? {
        HeightmapFormat::Png16 => {
            export_scalar_png(map.heightmap(), &path, 0.0, document.height_scale, &PngExportOptions::default())?;
        }
        HeightmapFormat::Raw(format) => {
            write_heightmap_raw(map.heightmap(), &path, format, document.height_scale)?;
        }
    }

    let output = document.with_entities(map);
    std::fs::write(dir.join(MAP_FILE), serde_json::to_string_pretty(&output)?)?;
    Ok(())
}
