use super::PackAlgo;
use crate::config::{Heuristic, PackOptions};
use crate::model::Rect;

/// Maximal-rectangles packer: a list of maximal free rectangles, split on
/// every placement and pruned of contained entries. Placement position is
/// chosen by the configured heuristic (lower score wins).
#[derive(Debug, Default)]
pub struct MaxRectsPacker {
    w: u32,
    h: u32,
    allow_rotate: bool,
    heuristic: Heuristic,
    free: Vec<Rect>,
    used: Vec<Rect>,
}

impl PackAlgo for MaxRectsPacker {
    fn init(&mut self, opts: &PackOptions) {
        self.w = opts.max_w;
        self.h = opts.max_h;
        self.allow_rotate = opts.allow_rotate;
        self.heuristic = opts.heuristic;
        self.seed();
    }

    fn reset(&mut self, w: u32, h: u32) {
        self.w = w;
        self.h = h;
        self.seed();
    }

    fn pack(&mut self, reqs: &[Rect]) -> (Vec<Rect>, Vec<Rect>) {
        let mut placed = Vec::with_capacity(reqs.len());
        let mut rejected = Vec::new();
        for req in reqs {
            match self.insert(*req) {
                Some(rect) => placed.push(rect),
                None => rejected.push(*req),
            }
        }
        (placed, rejected)
    }
}

impl MaxRectsPacker {
    fn seed(&mut self) {
        self.free = vec![Rect::at(0, 0, self.w, self.h)];
        self.used.clear();
    }

    fn insert(&mut self, rect: Rect) -> Option<Rect> {
        let best = self.find_best_position(rect)?;
        self.place(best);
        Some(best)
    }

    fn find_best_position(&self, rect: Rect) -> Option<Rect> {
        let mut best: Option<Rect> = None;
        let mut best_score = i64::MAX;
        for fr in &self.free {
            if fr.w >= rect.w && fr.h >= rect.h {
                let score = self.score(fr, rect.w, rect.h);
                if score < best_score {
                    best = Some(rect.with_pos(fr.x, fr.y));
                    best_score = score;
                }
            }
            if self.allow_rotate && fr.w >= rect.h && fr.h >= rect.w {
                let score = self.score(fr, rect.h, rect.w);
                if score < best_score {
                    best = Some(rect.with_pos(fr.x, fr.y).rotated());
                    best_score = score;
                }
            }
        }
        best
    }

    fn score(&self, fr: &Rect, w: u32, h: u32) -> i64 {
        match self.heuristic {
            Heuristic::BestShortSideFit => ((fr.w - w).min(fr.h - h)) as i64,
            Heuristic::BestLongSideFit => ((fr.w - w).max(fr.h - h)) as i64,
            Heuristic::BestAreaFit => (fr.area() - w as u64 * h as u64) as i64,
            Heuristic::BottomLeftFit => (fr.y + h) as i64,
            Heuristic::ContactPointFit => -(self.contact_length(fr.x, fr.y, w, h) as i64),
        }
    }

    /// Total edge length the candidate placement shares with the bin border
    /// and previously placed rectangles.
    fn contact_length(&self, x: u32, y: u32, w: u32, h: u32) -> u64 {
        let mut contact = 0u64;
        if x == 0 || x + w == self.w {
            contact += h as u64;
        }
        if y == 0 || y + h == self.h {
            contact += w as u64;
        }
        for u in &self.used {
            if x == u.right() || x + w == u.x {
                contact += overlap_1d(y, y + h, u.y, u.bottom()) as u64;
            }
            if y == u.bottom() || y + h == u.y {
                contact += overlap_1d(x, x + w, u.x, u.right()) as u64;
            }
        }
        contact
    }

    fn place(&mut self, node: Rect) {
        let mut i = 0;
        while i < self.free.len() {
            let fr = self.free[i];
            if overlaps(&fr, &node) {
                self.free.remove(i);
                self.split(fr, &node);
            } else {
                i += 1;
            }
        }
        self.prune();
        self.used.push(node);
    }

    /// Pushes the up-to-four fragments of `fr` that lie outside `node`.
    fn split(&mut self, fr: Rect, node: &Rect) {
        if node.y > fr.y {
            self.free.push(Rect::at(fr.x, fr.y, fr.w, node.y - fr.y));
        }
        if node.bottom() < fr.bottom() {
            self.free
                .push(Rect::at(fr.x, node.bottom(), fr.w, fr.bottom() - node.bottom()));
        }
        if node.x > fr.x {
            self.free.push(Rect::at(fr.x, fr.y, node.x - fr.x, fr.h));
        }
        if node.right() < fr.right() {
            self.free
                .push(Rect::at(node.right(), fr.y, fr.right() - node.right(), fr.h));
        }
    }

    /// Drops every free rectangle contained in another.
    fn prune(&mut self) {
        let mut i = 0;
        while i < self.free.len() {
            let mut removed = false;
            let mut j = i + 1;
            while j < self.free.len() {
                if self.free[i].contained_in(&self.free[j]) {
                    self.free.remove(i);
                    removed = true;
                    break;
                }
                if self.free[j].contained_in(&self.free[i]) {
                    self.free.remove(j);
                } else {
                    j += 1;
                }
            }
            if !removed {
                i += 1;
            }
        }
    }
}

fn overlap_1d(a1: u32, a2: u32, b1: u32, b2: u32) -> u32 {
    a2.min(b2).saturating_sub(a1.max(b1))
}

fn overlaps(a: &Rect, b: &Rect) -> bool {
    !(a.x >= b.right() || b.x >= a.right() || a.y >= b.bottom() || b.y >= a.bottom())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::PackOptions;

    fn packer(w: u32, h: u32, heuristic: Heuristic, rotate: bool) -> MaxRectsPacker {
        let opts = PackOptions::builder()
            .max_size(w, h)
            .heuristic(heuristic)
            .allow_rotate(rotate)
            .build();
        let mut p = MaxRectsPacker::default();
        p.init(&opts);
        p
    }

    fn no_contained_free_rects(p: &MaxRectsPacker) -> bool {
        for i in 0..p.free.len() {
            for j in 0..p.free.len() {
                if i != j && p.free[i].contained_in(&p.free[j]) {
                    return false;
                }
            }
        }
        true
    }

    #[test]
    fn prune_leaves_no_contained_rects() {
        for heuristic in [
            Heuristic::BestShortSideFit,
            Heuristic::BestLongSideFit,
            Heuristic::BestAreaFit,
            Heuristic::BottomLeftFit,
            Heuristic::ContactPointFit,
        ] {
            let mut p = packer(200, 200, heuristic, true);
            let reqs: Vec<Rect> = [(64, 64), (32, 64), (64, 32), (48, 48), (16, 80), (80, 16)]
                .iter()
                .enumerate()
                .map(|(i, (w, h))| Rect::sized(*w, *h, i))
                .collect();
            let (placed, rejected) = p.pack(&reqs);
            assert_eq!(placed.len() + rejected.len(), reqs.len());
            assert!(no_contained_free_rects(&p), "{heuristic:?}");
        }
    }

    #[test]
    fn contact_point_prefers_edges() {
        let mut p = packer(100, 100, Heuristic::ContactPointFit, false);
        let (placed, _) = p.pack(&[Rect::sized(10, 10, 0)]);
        // first placement hugs the bin corner where contact is maximal
        assert_eq!((placed[0].x, placed[0].y), (0, 0));
    }

    #[test]
    fn perfect_fit_consumes_free_rect() {
        let mut p = packer(64, 64, Heuristic::BestAreaFit, false);
        let (placed, rejected) = p.pack(&[Rect::sized(64, 64, 0), Rect::sized(1, 1, 1)]);
        assert_eq!(placed.len(), 1);
        assert_eq!(rejected.len(), 1);
        assert!(p.free.is_empty());
    }
}
