//! The packing pipeline: pre-stage scan, multi-bin driver with autosize, and
//! the compositor that renders placed sprites onto atlas rasters.

use crate::config::PackOptions;
use crate::error::Result;
use crate::imageops;
use crate::model::{Atlas, AtlasInfo, Bin, Meta, Rect, Rectangle, Size, Sprite};
use crate::packer::{create_algo, PackAlgo};
use crate::samedetect::{self, SameDetectInfo};
use crate::util::{self, base_name};
use image::RgbaImage;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

pub const REPO: &str = "https://github.com/spritepack/spritepack";
pub const FORMAT: &str = "RGBA8888";

/// Result of one sprite pack: the descriptor tree plus the rendered atlas
/// rasters, index-aligned with `atlas_info.atlases`.
pub struct PackOutput {
    pub atlas_info: AtlasInfo,
    pub images: Vec<RgbaImage>,
}

/// Owns the algorithm state, the pre-stage maps and the same-detect info for
/// the duration of one pack call. One pack at a time per instance; separate
/// instances are independent.
pub struct Packer {
    algo: Box<dyn PackAlgo>,
    options: PackOptions,
    same_info: SameDetectInfo,
    input_dir: PathBuf,
}

struct SourceInfo {
    file_name: String,
    size: Size,
    trimmed: Rectangle,
}

impl Packer {
    pub fn new(options: PackOptions) -> Result<Self> {
        options.validate()?;
        let algo = create_algo(options.algorithm);
        Ok(Self {
            algo,
            options,
            same_info: SameDetectInfo::default(),
            input_dir: PathBuf::new(),
        })
    }

    pub fn options(&self) -> &PackOptions {
        &self.options
    }

    /// Packs raw rectangles into as many bins as needed and returns the bins
    /// in creation order. Requests that fit nowhere are dropped after a
    /// warning.
    pub fn pack_rects(&mut self, mut reqs: Vec<Rect>) -> Vec<Bin> {
        if reqs.is_empty() {
            return Vec::new();
        }
        self.algo.init(&self.options);

        if self.options.sort {
            reqs.sort_by(|a, b| b.area().cmp(&a.area()));
        }

        let padding = self.options.padding;
        if padding != 0 {
            for r in &mut reqs {
                r.w += padding;
                r.h += padding;
            }
        }

        let mut bins = self.pack_in_bins(reqs);

        // Padding models a right/bottom gutter owned by each placement:
        // positions stay put, only the reported size shrinks back.
        if padding != 0 {
            for bin in &mut bins {
                for r in &mut bin.placed {
                    r.w -= padding;
                    r.h -= padding;
                }
            }
        }
        bins
    }

    fn pack_in_bins(&mut self, reqs: Vec<Rect>) -> Vec<Bin> {
        let mut bins = Vec::new();
        let mut remaining = reqs;
        while !remaining.is_empty() {
            self.algo.reset(self.options.max_w, self.options.max_h);
            let (placed, rejected) = self.algo.pack(&remaining);
            if placed.is_empty() {
                warn!(
                    count = remaining.len(),
                    "unable to pack remaining rectangles"
                );
                break;
            }
            let used_area: u64 = placed.iter().map(Rect::area).sum();
            let bin = if rejected.is_empty() && self.options.auto_size {
                self.autosize(placed, used_area)
            } else {
                Bin::new(self.options.max_w, self.options.max_h, placed, used_area)
            };
            debug!(
                w = bin.w,
                h = bin.h,
                placed = bin.placed.len(),
                fill = format!("{:.2}%", bin.fill_rate() * 100.0),
                "bin sealed"
            );
            bins.push(bin);
            remaining = rejected;
        }
        bins
    }

    /// Binary-searches the smallest square side that still fits the placed
    /// set; on success the bin takes that size and the placements of the
    /// final successful iteration.
    fn autosize(&mut self, placed: Vec<Rect>, used_area: u64) -> Bin {
        // Re-pack from the original orientations so rotation flags stay
        // relative to the request, not to the previous placement.
        let reqs: Vec<Rect> = placed
            .iter()
            .map(|r| {
                let (w, h) = if r.is_rotated { (r.h, r.w) } else { (r.w, r.h) };
                Rect::sized(w, h, r.id)
            })
            .collect();

        let mut low = (used_area as f64).sqrt().ceil() as u32;
        let mut high = self.options.max_w.max(self.options.max_h);
        low = low.max(1);
        let mut best: Option<(u32, Vec<Rect>)> = None;
        while low <= high {
            let mid = low + (high - low) / 2;
            self.algo.reset(mid, mid);
            let (packs, unpacked) = self.algo.pack(&reqs);
            if unpacked.is_empty() {
                best = Some((mid, packs));
                high = mid - 1;
            } else {
                low = mid + 1;
            }
        }
        match best {
            Some((side, packs)) => Bin::new(side, side, packs, used_area),
            None => {
                warn!("cannot autosize bin, keeping maximum dimensions");
                Bin::new(self.options.max_w, self.options.max_h, placed, used_area)
            }
        }
    }

    /// Packs every sprite file directly under `input_dir` (natural order).
    pub fn pack_sprites(&mut self, input_dir: impl AsRef<Path>) -> Result<PackOutput> {
        let paths = util::list_file_paths(&input_dir)?;
        self.pack_sprite_files(input_dir.as_ref(), paths)
    }

    /// Packs the given sprite files. `input_dir` is the directory the
    /// compositor loads pixels from; `paths` are expected in natural order.
    pub fn pack_sprite_files(
        &mut self,
        input_dir: &Path,
        mut paths: Vec<PathBuf>,
    ) -> Result<PackOutput> {
        if self.options.same_detect {
            let (unique, info) = samedetect::find_duplicates(&paths)?;
            paths = unique;
            self.same_info = info;
        }
        self.input_dir = input_dir.to_path_buf();

        let meta = Meta {
            repo: REPO.into(),
            format: FORMAT.into(),
            version: self.options.version.clone(),
            timestamp: chrono::Local::now().format("%Y-%m-%d %H:%M:%S").to_string(),
        };

        let (reqs, sources) = self.scan_sources(&paths);
        let bins = self.pack_rects(reqs);
        if bins.is_empty() {
            warn!("no sprites could be packed");
        }

        let mut atlases = Vec::with_capacity(bins.len());
        for (index, bin) in bins.iter().enumerate() {
            let mut size = Size::new(bin.w, bin.h);
            if self.options.power_of_two {
                size = size.to_power_of_two();
            }
            let name = if bins.len() == 1 {
                format!("{}{}", self.options.name, self.options.img_ext)
            } else {
                format!("{}_{}{}", self.options.name, index, self.options.img_ext)
            };
            let mut sprites = Vec::with_capacity(bin.placed.len());
            for rect in &bin.placed {
                let source = &sources[&rect.id];
                let sprite = Sprite {
                    file_name: source.file_name.clone(),
                    frame: rect.to_rectangle(),
                    src_rect: source.size,
                    trimmed_rect: source.trimmed,
                    rotated: rect.is_rotated,
                    trimmed: self.options.trim,
                };
                if self.options.same_detect {
                    if let Some(dupes) = self.same_info.base_to_dupes.get(&source.file_name) {
                        // duplicates share the canonical placement but keep
                        // their own file names
                        let replayed = dupes.iter().map(|dupe| Sprite {
                            file_name: dupe.clone(),
                            ..sprite.clone()
                        });
                        sprites.push(sprite.clone());
                        sprites.extend(replayed);
                        continue;
                    }
                }
                sprites.push(sprite);
            }
            atlases.push(Atlas {
                name,
                size,
                sprites,
            });
        }

        let atlas_info = AtlasInfo { meta, atlases };
        let images = self.render_atlases(&atlas_info)?;
        Ok(PackOutput { atlas_info, images })
    }

    /// Scans sources into packing requests. Unreadable or undecodable files
    /// are skipped with a diagnostic; their ids are not reused.
    fn scan_sources(&self, paths: &[PathBuf]) -> (Vec<Rect>, HashMap<usize, SourceInfo>) {
        let mut reqs = Vec::with_capacity(paths.len());
        let mut sources = HashMap::with_capacity(paths.len());
        for (id, path) in paths.iter().enumerate() {
            if self.options.trim {
                let img = match imageops::load_image(path) {
                    Ok(img) => img,
                    Err(e) => {
                        warn!(path = %path.display(), error = %e, "skipping unreadable sprite");
                        continue;
                    }
                };
                let (w, h) = img.dimensions();
                let bounds = imageops::opaque_bounds(&img, self.options.tolerance);
                reqs.push(Rect::sized(bounds.w, bounds.h, id));
                sources.insert(
                    id,
                    SourceInfo {
                        file_name: base_name(path),
                        size: Size::new(w, h),
                        trimmed: bounds,
                    },
                );
            } else {
                let (w, h) = match imageops::image_dimensions(path) {
                    Ok(dims) => dims,
                    Err(e) => {
                        warn!(path = %path.display(), error = %e, "skipping unreadable sprite");
                        continue;
                    }
                };
                reqs.push(Rect::sized(w, h, id));
                sources.insert(
                    id,
                    SourceInfo {
                        file_name: base_name(path),
                        size: Size::new(w, h),
                        trimmed: Rectangle::default(),
                    },
                );
            }
        }
        (reqs, sources)
    }

    /// Renders each atlas: transparent canvas, then a replacing blit per
    /// sprite. Duplicates are skipped; the canonical copy already carries
    /// the pixels.
    fn render_atlases(&self, info: &AtlasInfo) -> Result<Vec<RgbaImage>> {
        let mut images = Vec::with_capacity(info.atlases.len());
        for atlas in &info.atlases {
            let mut canvas = RgbaImage::new(atlas.size.w, atlas.size.h);
            for sprite in &atlas.sprites {
                if self.options.same_detect && self.same_info.is_duplicate(&sprite.file_name) {
                    continue;
                }
                let mut src = imageops::load_image(self.input_dir.join(&sprite.file_name))?;
                let content = if sprite.trimmed {
                    sprite.trimmed_rect
                } else {
                    Rectangle::new(0, 0, sprite.src_rect.w, sprite.src_rect.h)
                };
                let (sx, sy) = if sprite.rotated {
                    src = imageops::rotate270(&src);
                    // content origin inside the rotated raster
                    (
                        sprite.src_rect.h - content.y - content.h,
                        content.x,
                    )
                } else {
                    (content.x, content.y)
                };
                imageops::blit(
                    &src,
                    &mut canvas,
                    sx,
                    sy,
                    sprite.frame.x,
                    sprite.frame.y,
                    sprite.frame.w,
                    sprite.frame.h,
                );
            }
            images.push(canvas);
        }
        Ok(images)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{Algorithm, PackOptions};

    #[test]
    fn empty_request_list_yields_no_bins() {
        let mut packer = Packer::new(PackOptions::default()).unwrap();
        assert!(packer.pack_rects(Vec::new()).is_empty());
    }

    #[test]
    fn oversized_requests_are_dropped_with_no_bins() {
        let opts = PackOptions::builder()
            .max_size(64, 64)
            .algorithm(Algorithm::Basic)
            .build();
        let mut packer = Packer::new(opts).unwrap();
        let bins = packer.pack_rects(vec![Rect::sized(100, 100, 0)]);
        assert!(bins.is_empty());
    }

    #[test]
    fn sort_is_stable_for_equal_areas() {
        let opts = PackOptions::builder()
            .max_size(512, 512)
            .algorithm(Algorithm::Basic)
            .build();
        let mut packer = Packer::new(opts).unwrap();
        let reqs = vec![
            Rect::sized(16, 16, 0),
            Rect::sized(16, 16, 1),
            Rect::sized(16, 16, 2),
        ];
        let bins = packer.pack_rects(reqs);
        let ids: Vec<usize> = bins[0].placed.iter().map(|r| r.id).collect();
        assert_eq!(ids, [0, 1, 2]);
    }
}
