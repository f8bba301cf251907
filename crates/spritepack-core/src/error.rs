use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SpritePackError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("image error: {0}")]
    Image(#[from] image::ImageError),

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("invalid dimensions: width and height must be greater than 0 (got {width}x{height})")]
    InvalidDimensions { width: u32, height: u32 },

    #[error("unsupported format: {0}")]
    UnsupportedFormat(String),

    #[error("image file for atlas '{name}' not found in {dir}")]
    AtlasImageNotFound { name: String, dir: PathBuf },

    #[error("descriptor error: {0}")]
    Descriptor(#[from] serde_json::Error),

    #[error("template error: {0}")]
    Template(String),

    #[error("encoding error: {0}")]
    Encode(String),
}

impl From<handlebars::TemplateError> for SpritePackError {
    fn from(e: handlebars::TemplateError) -> Self {
        Self::Template(e.to_string())
    }
}

impl From<handlebars::RenderError> for SpritePackError {
    fn from(e: handlebars::RenderError) -> Self {
        Self::Template(e.to_string())
    }
}

pub type Result<T> = std::result::Result<T, SpritePackError>;
