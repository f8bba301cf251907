//! The inverse pipeline: reconstruct the original sprite images from an
//! atlas image plus its descriptor.

use crate::error::{Result, SpritePackError};
use crate::export::ExporterManager;
use crate::imageops;
use image::RgbaImage;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

/// Where to find the atlas images and where to write the sprites; both
/// default to the descriptor's directory.
#[derive(Debug, Default, Clone)]
pub struct UnpackOptions {
    pub atlas_dir: Option<PathBuf>,
    pub output_dir: Option<PathBuf>,
}

const PROBE_EXTS: &[&str] = &[".png", ".jpg", ".jpeg", ".bmp", ".tiff", ".webp"];

/// Reads the descriptor at `descriptor_path`, locates each atlas image and
/// writes every sprite back out under its own file name.
pub fn unpack_sprites(descriptor_path: impl AsRef<Path>, opts: UnpackOptions) -> Result<()> {
    let descriptor_path = descriptor_path.as_ref();
    let default_dir = descriptor_path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from("."));
    let atlas_dir = opts.atlas_dir.unwrap_or_else(|| default_dir.clone());
    let output_dir = opts.output_dir.unwrap_or(default_dir);
    fs::create_dir_all(&output_dir)?;

    let info = ExporterManager::with_defaults().import(descriptor_path)?;

    for atlas in &info.atlases {
        // the stored name carries the image extension; strip one if present
        let base = Path::new(&atlas.name)
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| atlas.name.clone());
        let atlas_img = load_atlas_image(&atlas_dir, &base)?;

        for sprite in &atlas.sprites {
            let frame = sprite.frame;
            let mut img = RgbaImage::new(frame.w, frame.h);
            imageops::blit(&atlas_img, &mut img, frame.x, frame.y, 0, 0, frame.w, frame.h);
            if sprite.rotated {
                // undo the 270 degree rotation applied at pack time
                img = imageops::rotate90(&img);
            }
            if sprite.trimmed {
                let mut canvas = RgbaImage::new(sprite.src_rect.w, sprite.src_rect.h);
                let (w, h) = img.dimensions();
                imageops::blit(
                    &img,
                    &mut canvas,
                    0,
                    0,
                    sprite.trimmed_rect.x,
                    sprite.trimmed_rect.y,
                    w,
                    h,
                );
                img = canvas;
            }
            imageops::save_image(output_dir.join(&sprite.file_name), &img)?;
        }
        info!(
            atlas = %atlas.name,
            sprites = atlas.sprites.len(),
            "atlas unpacked"
        );
    }
    Ok(())
}

fn load_atlas_image(dir: &Path, base: &str) -> Result<RgbaImage> {
    for ext in PROBE_EXTS {
        let candidate = dir.join(format!("{base}{ext}"));
        if candidate.is_file() {
            return imageops::load_image(&candidate);
        }
    }
    Err(SpritePackError::AtlasImageNotFound {
        name: base.to_string(),
        dir: dir.to_path_buf(),
    })
}
