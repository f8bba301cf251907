//! Core library for packing sprite images into texture atlases.
//!
//! - Algorithms: Basic (row sweep), Skyline (segment heap), MaxRects
//!   (BSSF/BLSF/BAF/BL/CP)
//! - Pipeline: trim, dedup, multi-bin spillover, autosize, compositing
//! - The descriptor model is serde-serializable; exporters are registered
//!   by file extension and a symmetric unpack pipeline restores the
//!   original images.
//!
//! Quick example:
//! ```ignore
//! use spritepack_core::{PackOptions, Packer};
//! # fn main() -> spritepack_core::Result<()> {
//! let opts = PackOptions::builder()
//!     .max_size(1024, 1024)
//!     .trim(true)
//!     .build();
//! let out = Packer::new(opts)?.pack_sprites("./sprites")?;
//! println!("atlases: {}", out.atlas_info.atlases.len());
//! # Ok(()) }
//! ```

pub mod config;
pub mod error;
pub mod export;
pub mod export_template;
pub mod export_tpsheet;
pub mod imageops;
pub mod model;
pub mod packer;
pub mod pipeline;
pub mod samedetect;
pub mod unpack;
pub mod util;

pub use config::*;
pub use error::*;
pub use export::*;
pub use export_template::*;
pub use export_tpsheet::*;
pub use model::*;
pub use packer::*;
pub use pipeline::*;
pub use unpack::*;

/// Convenience prelude bringing the primary APIs into scope.
pub mod prelude {
    pub use crate::config::{Algorithm, Heuristic, PackOptions, PackOptionsBuilder};
    pub use crate::error::{Result, SpritePackError};
    pub use crate::export::{Exporter, ExporterManager, JsonExporter};
    pub use crate::model::{Atlas, AtlasInfo, Bin, Meta, Rect, Rectangle, Size, Sprite};
    pub use crate::pipeline::{PackOutput, Packer};
    pub use crate::unpack::{unpack_sprites, UnpackOptions};
}
