use crate::config::{Algorithm, PackOptions};
use crate::model::Rect;

pub mod maxrects;
pub mod row;
pub mod skyline;

/// Common contract for all packing algorithms.
///
/// `pack` attempts to place each request into the current bin. Placed
/// rectangles carry their assigned position (possibly rotated, with
/// `is_rotated` set) and keep their original id; their order follows the
/// algorithm's own placement order. Rejected rectangles preserve input
/// order. The algorithm is single-use between `init`/`reset` calls.
pub trait PackAlgo {
    /// Binds options and resets state to an empty `max_w x max_h` bin.
    fn init(&mut self, opts: &PackOptions);
    /// Re-initializes for a `w x h` bin, keeping rotation/heuristic settings.
    fn reset(&mut self, w: u32, h: u32);
    /// Returns `(placed, rejected)`.
    fn pack(&mut self, reqs: &[Rect]) -> (Vec<Rect>, Vec<Rect>);
}

/// Instantiates the algorithm selected by `algorithm`.
pub fn create_algo(algorithm: Algorithm) -> Box<dyn PackAlgo> {
    match algorithm {
        Algorithm::Basic => Box::new(row::RowPacker::default()),
        Algorithm::Skyline => Box::new(skyline::SkylinePacker::default()),
        Algorithm::MaxRects => Box::new(maxrects::MaxRectsPacker::default()),
    }
}
