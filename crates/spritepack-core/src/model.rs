use serde::{Deserialize, Serialize};
use tracing::warn;

/// Width/height pair in pixels.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Size {
    pub w: u32,
    pub h: u32,
}

impl Size {
    /// Creates a size, clamping zero dimensions to 1.
    pub fn new(w: u32, h: u32) -> Self {
        let (w, h) = clamp_dims(w, h);
        Self { w, h }
    }

    /// Returns the size with width and height swapped.
    pub fn rotated(self) -> Self {
        Self {
            w: self.h,
            h: self.w,
        }
    }

    /// Rounds each dimension up to the next power of two.
    pub fn to_power_of_two(self) -> Self {
        Self {
            w: next_power_of_two(self.w),
            h: next_power_of_two(self.h),
        }
    }

    pub fn area(self) -> u64 {
        self.w as u64 * self.h as u64
    }
}

/// Non-negative point in atlas space.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Point {
    pub x: u32,
    pub y: u32,
}

/// Plain axis-aligned rectangle as it appears in descriptors.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Rectangle {
    pub x: u32,
    pub y: u32,
    pub w: u32,
    pub h: u32,
}

impl Rectangle {
    pub fn new(x: u32, y: u32, w: u32, h: u32) -> Self {
        Self { x, y, w, h }
    }

    /// True when every field is zero; drives `trimmedRect` omission.
    pub fn is_zero(&self) -> bool {
        self.x == 0 && self.y == 0 && self.w == 0 && self.h == 0
    }
}

/// A packing rectangle with value semantics: every mutator returns a new
/// instance. `id` is the stable index assigned by the pre-stage and survives
/// sorting and rotation so the compositor can locate the source pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rect {
    pub x: u32,
    pub y: u32,
    pub w: u32,
    pub h: u32,
    pub id: usize,
    pub is_rotated: bool,
}

impl Rect {
    /// Creates an unplaced request rectangle, clamping zero dimensions to 1.
    pub fn sized(w: u32, h: u32, id: usize) -> Self {
        let (w, h) = clamp_dims(w, h);
        Self {
            x: 0,
            y: 0,
            w,
            h,
            id,
            is_rotated: false,
        }
    }

    /// Plain geometric rectangle; used for free-list bookkeeping.
    pub(crate) fn at(x: u32, y: u32, w: u32, h: u32) -> Self {
        Self {
            x,
            y,
            w,
            h,
            id: 0,
            is_rotated: false,
        }
    }

    pub fn area(&self) -> u64 {
        self.w as u64 * self.h as u64
    }

    /// Returns a copy with width/height swapped and the rotation flag
    /// toggled. Four applications yield the original rectangle.
    pub fn rotated(&self) -> Self {
        Self {
            w: self.h,
            h: self.w,
            is_rotated: !self.is_rotated,
            ..*self
        }
    }

    pub fn with_pos(&self, x: u32, y: u32) -> Self {
        Self { x, y, ..*self }
    }

    /// Exclusive right edge (`x + w`).
    pub fn right(&self) -> u32 {
        self.x + self.w
    }

    /// Exclusive bottom edge (`y + h`).
    pub fn bottom(&self) -> u32 {
        self.y + self.h
    }

    /// True if `self` lies entirely within `other`.
    pub fn contained_in(&self, other: &Rect) -> bool {
        self.x >= other.x
            && self.y >= other.y
            && self.right() <= other.right()
            && self.bottom() <= other.bottom()
    }

    pub fn to_rectangle(&self) -> Rectangle {
        Rectangle::new(self.x, self.y, self.w, self.h)
    }
}

/// One packed bin: the atlas area plus the rectangles placed into it.
///
/// Invariant: every placed rectangle lies within `[0,w) x [0,h)` and no two
/// placed rectangles overlap. `used_area` is the sum of placed areas at the
/// time the bin was sealed.
#[derive(Debug, Clone)]
pub struct Bin {
    pub w: u32,
    pub h: u32,
    pub placed: Vec<Rect>,
    pub used_area: u64,
}

impl Bin {
    pub fn new(w: u32, h: u32, placed: Vec<Rect>, used_area: u64) -> Self {
        Self {
            w,
            h,
            placed,
            used_area,
        }
    }

    pub fn area(&self) -> u64 {
        self.w as u64 * self.h as u64
    }

    /// Used area divided by bin area, in `[0, 1]`.
    pub fn fill_rate(&self) -> f64 {
        if self.area() == 0 {
            0.0
        } else {
            self.used_area as f64 / self.area() as f64
        }
    }
}

/// Descriptor metadata block.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Meta {
    pub repo: String,
    pub format: String,
    pub version: String,
    pub timestamp: String,
}

/// One sprite placement inside an atlas.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Sprite {
    /// Source file name (base name, no directory).
    #[serde(rename = "filename")]
    pub file_name: String,
    /// Placement in the atlas, post-trim, post-rotation.
    pub frame: Rectangle,
    /// Original untrimmed image size.
    #[serde(rename = "srcRect")]
    pub src_rect: Size,
    /// Offset and size of the opaque content inside the original canvas;
    /// all-zero (and omitted from JSON) when the sprite was not trimmed.
    #[serde(
        rename = "trimmedRect",
        default,
        skip_serializing_if = "Rectangle::is_zero"
    )]
    pub trimmed_rect: Rectangle,
    pub rotated: bool,
    pub trimmed: bool,
}

/// One output atlas: image name, final size and sprite placements.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Atlas {
    pub name: String,
    pub size: Size,
    pub sprites: Vec<Sprite>,
}

/// The full descriptor: metadata plus the atlases in creation order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AtlasInfo {
    pub meta: Meta,
    pub atlases: Vec<Atlas>,
}

fn clamp_dims(w: u32, h: u32) -> (u32, u32) {
    if w == 0 || h == 0 {
        warn!(w, h, "rect dimensions must be positive, clamping to 1x1");
        (w.max(1), h.max(1))
    } else {
        (w, h)
    }
}

pub(crate) fn next_power_of_two(n: u32) -> u32 {
    n.max(1).next_power_of_two()
}
