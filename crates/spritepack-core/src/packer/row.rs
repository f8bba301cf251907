use super::PackAlgo;
use crate::config::PackOptions;
use crate::model::Rect;

/// Greedy row packer: a cursor sweeps left to right in input order and wraps
/// to a new row at the tallest rectangle seen so far.
#[derive(Debug, Default)]
pub struct RowPacker {
    w: u32,
    h: u32,
    allow_rotate: bool,
}

impl PackAlgo for RowPacker {
    fn init(&mut self, opts: &PackOptions) {
        self.w = opts.max_w;
        self.h = opts.max_h;
        self.allow_rotate = opts.allow_rotate;
    }

    fn reset(&mut self, w: u32, h: u32) {
        self.w = w;
        self.h = h;
    }

    fn pack(&mut self, reqs: &[Rect]) -> (Vec<Rect>, Vec<Rect>) {
        let mut placed = Vec::with_capacity(reqs.len());
        let mut rejected = Vec::new();
        let (mut cx, mut cy) = (0u32, 0u32);
        let mut row_max_h = 0u32;

        for req in reqs {
            if cx + req.w > self.w {
                cx = 0;
                cy += row_max_h;
                row_max_h = 0;
            }
            let fitted = if cx + req.w <= self.w && cy + req.h <= self.h {
                Some(req.with_pos(cx, cy))
            } else if self.allow_rotate && cx + req.h <= self.w && cy + req.w <= self.h {
                Some(req.rotated().with_pos(cx, cy))
            } else {
                None
            };
            match fitted {
                Some(rect) => {
                    cx += rect.w;
                    row_max_h = row_max_h.max(rect.h);
                    placed.push(rect);
                }
                None => rejected.push(*req),
            }
        }
        (placed, rejected)
    }
}
