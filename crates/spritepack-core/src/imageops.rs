//! Image facade: decode/encode, counter-clockwise rotations, opaque-bounds
//! scan and raw RGBA blits. Pixel work fans out by row across the rayon pool;
//! rows are disjoint so no synchronization is needed.

use crate::error::{Result, SpritePackError};
use crate::model::Rectangle;
use image::{DynamicImage, ImageFormat, ImageReader, RgbaImage};
use rayon::prelude::*;
use std::fs;
use std::path::Path;

/// Decodes `path` into non-premultiplied RGBA8. Premultiplied and exotic
/// pixel layouts are normalized by the generic conversion.
pub fn load_image(path: impl AsRef<Path>) -> Result<RgbaImage> {
    let img = ImageReader::open(path)?.with_guessed_format()?.decode()?;
    Ok(img.to_rgba8())
}

/// Reads image dimensions from the header without a full decode.
pub fn image_dimensions(path: impl AsRef<Path>) -> Result<(u32, u32)> {
    Ok(image::image_dimensions(path)?)
}

/// Encodes `img` to `path`, choosing the format from the file extension.
/// JPEG output drops the alpha channel. Parent directories are created.
pub fn save_image(path: impl AsRef<Path>, img: &RgbaImage) -> Result<()> {
    let path = path.as_ref();
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|s| s.to_ascii_lowercase())
        .unwrap_or_default();
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    match ext.as_str() {
        "png" => img.save_with_format(path, ImageFormat::Png)?,
        "jpg" | "jpeg" => {
            let rgb = DynamicImage::ImageRgba8(img.clone()).to_rgb8();
            rgb.save_with_format(path, ImageFormat::Jpeg)?;
        }
        "bmp" => img.save_with_format(path, ImageFormat::Bmp)?,
        "tiff" => img.save_with_format(path, ImageFormat::Tiff)?,
        "webp" => img.save_with_format(path, ImageFormat::WebP)?,
        other => return Err(SpritePackError::UnsupportedFormat(format!(".{other}"))),
    }
    Ok(())
}

/// Rotates 90 degrees counter-clockwise.
pub fn rotate90(src: &RgbaImage) -> RgbaImage {
    let (sw, sh) = src.dimensions();
    let mut dst = RgbaImage::new(sh, sw);
    let dw = sh as usize;
    let spix = src.as_raw().as_slice();
    let buf: &mut [u8] = &mut dst;
    buf.par_chunks_exact_mut(dw * 4)
        .enumerate()
        .for_each(|(y, row)| {
            // dst(x, y) = src(sw - 1 - y, x)
            let sx = (sw as usize - 1) - y;
            for x in 0..dw {
                let si = (x * sw as usize + sx) * 4;
                row[x * 4..x * 4 + 4].copy_from_slice(&spix[si..si + 4]);
            }
        });
    dst
}

/// Rotates 180 degrees.
pub fn rotate180(src: &RgbaImage) -> RgbaImage {
    let (sw, sh) = src.dimensions();
    let mut dst = RgbaImage::new(sw, sh);
    let dw = sw as usize;
    let spix = src.as_raw().as_slice();
    let buf: &mut [u8] = &mut dst;
    buf.par_chunks_exact_mut(dw * 4)
        .enumerate()
        .for_each(|(y, row)| {
            let sy = (sh as usize - 1) - y;
            for x in 0..dw {
                let si = (sy * sw as usize + (sw as usize - 1 - x)) * 4;
                row[x * 4..x * 4 + 4].copy_from_slice(&spix[si..si + 4]);
            }
        });
    dst
}

/// Rotates 270 degrees counter-clockwise (90 clockwise).
pub fn rotate270(src: &RgbaImage) -> RgbaImage {
    let (sw, sh) = src.dimensions();
    let mut dst = RgbaImage::new(sh, sw);
    let dw = sh as usize;
    let spix = src.as_raw().as_slice();
    let buf: &mut [u8] = &mut dst;
    buf.par_chunks_exact_mut(dw * 4)
        .enumerate()
        .for_each(|(y, row)| {
            // dst(x, y) = src(y, sh - 1 - x)
            for x in 0..dw {
                let si = ((sh as usize - 1 - x) * sw as usize + y) * 4;
                row[x * 4..x * 4 + 4].copy_from_slice(&spix[si..si + 4]);
            }
        });
    dst
}

/// Returns the bounding box of pixels whose alpha exceeds `tolerance`.
/// When no pixel qualifies, the full image bounds are returned unchanged.
pub fn opaque_bounds(img: &RgbaImage, tolerance: u8) -> Rectangle {
    let (w, h) = img.dimensions();
    if w == 0 || h == 0 {
        return Rectangle::new(0, 0, w, h);
    }
    let stride = w as usize * 4;
    let rows: Vec<Option<(u32, u32)>> = img
        .as_raw()
        .par_chunks_exact(stride)
        .map(|row| {
            let mut span: Option<(u32, u32)> = None;
            for x in 0..w as usize {
                if row[x * 4 + 3] > tolerance {
                    let x = x as u32;
                    span = Some(match span {
                        None => (x, x),
                        Some((lo, _)) => (lo, x),
                    });
                }
            }
            span
        })
        .collect();

    let mut min_x = u32::MAX;
    let mut max_x = 0;
    let mut min_y = u32::MAX;
    let mut max_y = 0;
    for (y, span) in rows.iter().enumerate() {
        if let Some((lo, hi)) = span {
            min_x = min_x.min(*lo);
            max_x = max_x.max(*hi);
            if min_y == u32::MAX {
                min_y = y as u32;
            }
            max_y = y as u32;
        }
    }
    if min_x == u32::MAX {
        return Rectangle::new(0, 0, w, h);
    }
    Rectangle::new(min_x, min_y, max_x - min_x + 1, max_y - min_y + 1)
}

/// Copies a `w x h` region from `src` at `(sx, sy)` into `dst` at `(dx, dy)`,
/// replacing destination pixels. The region is clipped against both images.
#[allow(clippy::too_many_arguments)]
pub fn blit(src: &RgbaImage, dst: &mut RgbaImage, sx: u32, sy: u32, dx: u32, dy: u32, w: u32, h: u32) {
    let (sw, sh) = src.dimensions();
    let (dw, dh) = dst.dimensions();
    if sx >= sw || sy >= sh || dx >= dw || dy >= dh {
        return;
    }
    let cw = w.min(sw - sx).min(dw - dx) as usize;
    let ch = h.min(sh - sy).min(dh - dy) as usize;
    let sstride = sw as usize * 4;
    let dstride = dw as usize * 4;
    let row_bytes = cw * 4;
    let spix = src.as_raw().as_slice();
    let dpix: &mut [u8] = &mut *dst;
    for row in 0..ch {
        let si = (sy as usize + row) * sstride + sx as usize * 4;
        let di = (dy as usize + row) * dstride + dx as usize * 4;
        dpix[di..di + row_bytes].copy_from_slice(&spix[si..si + row_bytes]);
    }
}
