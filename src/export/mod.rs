//! Export module for writing masks and heightmaps to image and RAW files.
//!
//! PNG output covers debug dumps of intermediate masks; RAW covers heightmap
//! interchange with external tools.

mod png;
mod raw;

pub use png::{
    export_mask_png,
    export_scalar_png,
    export_scalar_png_auto,
    PngExportError,
    PngExportOptions,
};
pub use raw::{expected_file_size, read_heightmap_raw, write_heightmap_raw, RawError, RawFormat};
