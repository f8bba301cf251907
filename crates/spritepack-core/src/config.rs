use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Packing algorithms.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Algorithm {
    /// Greedy left-to-right rows; fast baseline.
    #[default]
    Basic,
    /// Min-heap of skyline segments with a multi-criterion placement score.
    Skyline,
    /// Free-rectangle list with selectable heuristics; best quality offline.
    MaxRects,
}

impl FromStr for Algorithm {
    type Err = ();
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "basic" | "row" => Ok(Self::Basic),
            "skyline" => Ok(Self::Skyline),
            "maxrects" => Ok(Self::MaxRects),
            _ => Err(()),
        }
    }
}

/// Placement heuristics for the maxrects algorithm.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Heuristic {
    #[default]
    BestShortSideFit,
    BestLongSideFit,
    BestAreaFit,
    BottomLeftFit,
    ContactPointFit,
}

impl FromStr for Heuristic {
    type Err = ();
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "bssf" | "bestshortsidefit" => Ok(Self::BestShortSideFit),
            "blsf" | "bestlongsidefit" => Ok(Self::BestLongSideFit),
            "baf" | "bestareafit" => Ok(Self::BestAreaFit),
            "bl" | "bottomleftfit" => Ok(Self::BottomLeftFit),
            "cp" | "contactpointfit" => Ok(Self::ContactPointFit),
            _ => Err(()),
        }
    }
}

/// Packing configuration.
///
/// `version` is stamped into the descriptor metadata; it is injected here so
/// no process-global state is involved.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PackOptions {
    /// Maximum atlas width in pixels.
    pub max_w: u32,
    /// Maximum atlas height in pixels.
    pub max_h: u32,
    /// Shrink each full bin to its tightest feasible square.
    pub auto_size: bool,
    /// Inset added to each request before packing and subtracted from each
    /// placement afterwards (right/bottom gutter).
    pub padding: u32,
    pub algorithm: Algorithm,
    /// Only consulted when `algorithm` is `MaxRects`.
    pub heuristic: Heuristic,
    /// Allow 90 degree rotation attempts in all packers.
    pub allow_rotate: bool,
    /// Sort requests by area descending before packing (stable).
    pub sort: bool,
    /// Trim transparent edges and pack the opaque bounds only.
    pub trim: bool,
    /// Alpha threshold for trimming; a pixel is opaque when alpha > tolerance.
    pub tolerance: u8,
    /// Detect byte-identical inputs and pack each class once.
    pub same_detect: bool,
    /// Round the reported atlas size up to powers of two per dimension.
    pub power_of_two: bool,
    /// Base file name for atlases and the descriptor.
    pub name: String,
    /// Output image extension, dot-prefixed.
    pub img_ext: String,
    /// Version string reported in descriptor metadata.
    pub version: String,
}

impl Default for PackOptions {
    fn default() -> Self {
        Self {
            max_w: 512,
            max_h: 512,
            auto_size: false,
            padding: 0,
            algorithm: Algorithm::default(),
            heuristic: Heuristic::default(),
            allow_rotate: false,
            sort: true,
            trim: false,
            tolerance: 0,
            same_detect: false,
            power_of_two: false,
            name: "atlas".into(),
            img_ext: ".png".into(),
            version: env!("CARGO_PKG_VERSION").into(),
        }
    }
}

const IMG_EXTS: &[&str] = &[".png", ".jpg", ".jpeg", ".bmp", ".tiff", ".webp"];

impl PackOptions {
    pub fn builder() -> PackOptionsBuilder {
        PackOptionsBuilder::new()
    }

    /// Validates the configuration; packing is not attempted on error.
    pub fn validate(&self) -> crate::error::Result<()> {
        use crate::error::SpritePackError;

        if self.max_w == 0 || self.max_h == 0 {
            return Err(SpritePackError::InvalidDimensions {
                width: self.max_w,
                height: self.max_h,
            });
        }
        if !IMG_EXTS.contains(&self.img_ext.as_str()) {
            return Err(SpritePackError::InvalidConfig(format!(
                "img_ext must be one of {:?}, got {:?}",
                IMG_EXTS, self.img_ext
            )));
        }
        if self.name.is_empty() {
            return Err(SpritePackError::InvalidConfig("name is empty".into()));
        }
        Ok(())
    }
}

/// Fluent builder for `PackOptions`.
#[derive(Debug, Default, Clone)]
pub struct PackOptionsBuilder {
    opts: PackOptions,
}

impl PackOptionsBuilder {
    pub fn new() -> Self {
        Self {
            opts: PackOptions::default(),
        }
    }
    pub fn max_size(mut self, w: u32, h: u32) -> Self {
        self.opts.max_w = w;
        self.opts.max_h = h;
        self
    }
    pub fn auto_size(mut self, v: bool) -> Self {
        self.opts.auto_size = v;
        self
    }
    pub fn padding(mut self, v: u32) -> Self {
        self.opts.padding = v;
        self
    }
    pub fn algorithm(mut self, v: Algorithm) -> Self {
        self.opts.algorithm = v;
        self
    }
    pub fn heuristic(mut self, v: Heuristic) -> Self {
        self.opts.heuristic = v;
        self
    }
    pub fn allow_rotate(mut self, v: bool) -> Self {
        self.opts.allow_rotate = v;
        self
    }
    pub fn sort(mut self, v: bool) -> Self {
        self.opts.sort = v;
        self
    }
    pub fn trim(mut self, v: bool) -> Self {
        self.opts.trim = v;
        self
    }
    pub fn tolerance(mut self, v: u8) -> Self {
        self.opts.tolerance = v;
        self
    }
    pub fn same_detect(mut self, v: bool) -> Self {
        self.opts.same_detect = v;
        self
    }
    pub fn power_of_two(mut self, v: bool) -> Self {
        self.opts.power_of_two = v;
        self
    }
    pub fn name(mut self, v: impl Into<String>) -> Self {
        self.opts.name = v.into();
        self
    }
    pub fn img_ext(mut self, v: impl Into<String>) -> Self {
        self.opts.img_ext = v.into();
        self
    }
    pub fn version(mut self, v: impl Into<String>) -> Self {
        self.opts.version = v.into();
        self
    }
    pub fn build(self) -> PackOptions {
        self.opts
    }
}
