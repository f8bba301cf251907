use super::PackAlgo;
use crate::config::PackOptions;
use crate::model::Rect;
use std::cmp::Ordering;
use std::collections::BinaryHeap;

/// One horizontal segment of the skyline contour.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Segment {
    x: u32,
    y: u32,
    len: u32,
}

// Inverted ordering so the max-heap pops the lowest (y, x) first.
impl Ord for Segment {
    fn cmp(&self, other: &Self) -> Ordering {
        (other.y, other.x).cmp(&(self.y, self.x))
    }
}

impl PartialOrd for Segment {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Skyline packer: a min-priority queue of contour segments; each iteration
/// pops the lowest segment, scores every unplaced request against it and the
/// neighbouring heights, and places the best scorer at the left or right end
/// of the segment.
#[derive(Debug, Default)]
pub struct SkylinePacker {
    w: u32,
    h: u32,
    allow_rotate: bool,
    queue: BinaryHeap<Segment>,
}

impl PackAlgo for SkylinePacker {
    fn init(&mut self, opts: &PackOptions) {
        self.w = opts.max_w;
        self.h = opts.max_h;
        self.allow_rotate = opts.allow_rotate;
        self.seed();
    }

    fn reset(&mut self, w: u32, h: u32) {
        self.w = w;
        self.h = h;
        self.seed();
    }

    fn pack(&mut self, reqs: &[Rect]) -> (Vec<Rect>, Vec<Rect>) {
        let mut placed = Vec::with_capacity(reqs.len());
        let mut used = vec![false; reqs.len()];

        while placed.len() < reqs.len() {
            let Some(seg) = self.queue.pop() else { break };
            let (hl, hr) = self.neighbour_heights(&seg);
            match self.select_best(&seg, hl, hr, &used, reqs) {
                Some((idx, score, rotate)) => {
                    placed.push(self.place(reqs[idx], &seg, rotate, hl, hr, score));
                    used[idx] = true;
                }
                None => self.combine(seg),
            }
        }

        let rejected = reqs
            .iter()
            .zip(&used)
            .filter(|(_, used)| !**used)
            .map(|(r, _)| *r)
            .collect();
        (placed, rejected)
    }
}

impl SkylinePacker {
    fn seed(&mut self) {
        self.queue.clear();
        self.queue.push(Segment {
            x: 0,
            y: 0,
            len: self.w,
        });
    }

    /// Heights of the segments touching `seg` on the left and right; a
    /// missing neighbour counts as the bin wall.
    fn neighbour_heights(&self, seg: &Segment) -> (u32, u32) {
        let mut hl = self.h - seg.y;
        let mut hr = hl;
        let mut found = 0;
        for line in self.queue.iter() {
            if line.x + line.len == seg.x {
                hl = line.y - seg.y;
                found += 1;
            } else if line.x == seg.x + seg.len {
                hr = line.y - seg.y;
                found += 1;
            }
            if found == 2 {
                break;
            }
        }
        (hl, hr)
    }

    fn select_best(
        &self,
        seg: &Segment,
        hl: u32,
        hr: u32,
        used: &[bool],
        reqs: &[Rect],
    ) -> Option<(usize, i32, bool)> {
        let mut best_idx = 0usize;
        let mut best_score = -1;
        let mut best_rotate = false;
        for (i, req) in reqs.iter().enumerate() {
            if used[i] {
                continue;
            }
            let score = self.score(req.w, req.h, seg, hl, hr);
            if score > best_score {
                best_score = score;
                best_idx = i;
                best_rotate = false;
            }
            if self.allow_rotate {
                let score = self.score(req.h, req.w, seg, hl, hr);
                if score > best_score {
                    best_score = score;
                    best_idx = i;
                    best_rotate = true;
                }
            }
        }
        (best_score >= 0).then_some((best_idx, best_score, best_rotate))
    }

    /// Placement score of a `w x h` footprint on `seg` given the neighbour
    /// heights. Returns -1 when the footprint does not fit; the remaining
    /// enumeration is exhaustive under the fit precondition.
    fn score(&self, w: u32, h: u32, seg: &Segment, hl: u32, hr: u32) -> i32 {
        if seg.len < w || seg.y + h > self.h {
            return -1;
        }
        let (hi, lo) = if hl >= hr { (hl, hr) } else { (hr, hl) };
        if w == seg.len && h == hi {
            7
        } else if w == seg.len && h == lo {
            6
        } else if w == seg.len && h > hi {
            5
        } else if w < seg.len && h == hi {
            4
        } else if w == seg.len && h < hi && h > lo {
            3
        } else if w < seg.len && h == lo {
            2
        } else if w == seg.len && h < lo {
            1
        } else if w < seg.len && h != hi {
            0
        } else {
            unreachable!("skyline score fell through: w={w} h={h} hi={hi} lo={lo} seg={seg:?}")
        }
    }

    fn place(
        &mut self,
        rect: Rect,
        seg: &Segment,
        rotate: bool,
        hl: u32,
        hr: u32,
        score: i32,
    ) -> Rect {
        if (hl >= hr && score == 2) || (hl < hr && (score == 4 || score == 0)) {
            self.place_right(rect, seg, rotate)
        } else {
            self.place_left(rect, seg, rotate)
        }
    }

    fn place_left(&mut self, rect: Rect, seg: &Segment, rotate: bool) -> Rect {
        let mut packed = rect.with_pos(seg.x, seg.y);
        if rotate {
            packed = packed.rotated();
        }
        self.push_segment(seg.x, seg.y + packed.h, packed.w);
        self.push_segment(seg.x + packed.w, seg.y, seg.len - packed.w);
        packed
    }

    fn place_right(&mut self, rect: Rect, seg: &Segment, rotate: bool) -> Rect {
        let packed = if rotate {
            rect.with_pos(seg.x + seg.len - rect.h, seg.y).rotated()
        } else {
            rect.with_pos(seg.x + seg.len - rect.w, seg.y)
        };
        self.push_segment(seg.x, seg.y, seg.len - packed.w);
        self.push_segment(packed.x, seg.y + packed.h, packed.w);
        packed
    }

    fn push_segment(&mut self, x: u32, y: u32, len: u32) {
        if len > 0 {
            self.queue.push(Segment { x, y, len });
        }
    }

    /// No request fits on `seg`: merge it with an adjacent queued segment,
    /// adopting the neighbour's (lower) height, or discard it when isolated.
    fn combine(&mut self, seg: Segment) {
        let mut merged = None;
        for line in self.queue.iter() {
            if seg.y > line.y {
                continue;
            }
            if seg.x == line.x + line.len {
                merged = Some((
                    *line,
                    Segment {
                        x: line.x,
                        y: line.y,
                        len: line.len + seg.len,
                    },
                ));
                break;
            }
            if seg.x + seg.len == line.x {
                merged = Some((
                    *line,
                    Segment {
                        x: seg.x,
                        y: line.y,
                        len: line.len + seg.len,
                    },
                ));
                break;
            }
        }
        if let Some((victim, combined)) = merged {
            let mut removed = false;
            self.queue.retain(|line| {
                if !removed && *line == victim {
                    removed = true;
                    false
                } else {
                    true
                }
            });
            self.queue.push(combined);
        }
    }
}
