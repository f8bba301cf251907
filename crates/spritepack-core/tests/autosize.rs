use rand::{Rng, SeedableRng};
use spritepack_core::prelude::*;

#[test]
fn sixteen_squares_shrink_to_tight_square() {
    let opts = PackOptions::builder()
        .max_size(1024, 1024)
        .algorithm(Algorithm::Basic)
        .auto_size(true)
        .build();
    let mut packer = Packer::new(opts).unwrap();
    let reqs: Vec<Rect> = (0..16).map(|i| Rect::sized(64, 64, i)).collect();
    let bins = packer.pack_rects(reqs);
    assert_eq!(bins.len(), 1);
    assert_eq!((bins[0].w, bins[0].h), (256, 256));
    assert_eq!(bins[0].fill_rate(), 1.0);
}

#[test]
fn autosized_bin_stays_within_monotonic_bounds() {
    let mut rng = rand::rngs::StdRng::seed_from_u64(7);
    let reqs: Vec<Rect> = (0..40)
        .map(|i| Rect::sized(rng.gen_range(4..=80), rng.gen_range(4..=80), i))
        .collect();
    for algorithm in [Algorithm::Basic, Algorithm::Skyline, Algorithm::MaxRects] {
        let opts = PackOptions::builder()
            .max_size(1024, 1024)
            .algorithm(algorithm)
            .allow_rotate(true)
            .auto_size(true)
            .build();
        let mut packer = Packer::new(opts).unwrap();
        let bins = packer.pack_rects(reqs.clone());
        assert_eq!(bins.len(), 1, "{algorithm:?}");
        let bin = &bins[0];
        assert_eq!(bin.w, bin.h, "{algorithm:?}");
        let min_side = (bin.used_area as f64).sqrt().ceil() as u32;
        assert!(bin.w >= min_side, "{algorithm:?}");
        assert!(bin.w <= 1024, "{algorithm:?}");
        // the shrunk bin still holds every placement
        for r in &bin.placed {
            assert!(r.right() <= bin.w && r.bottom() <= bin.h, "{algorithm:?}");
        }
        assert_eq!(bin.placed.len(), reqs.len(), "{algorithm:?}");
    }
}

#[test]
fn rotation_flags_stay_relative_to_requests_after_autosize() {
    let opts = PackOptions::builder()
        .max_size(512, 512)
        .algorithm(Algorithm::MaxRects)
        .allow_rotate(true)
        .auto_size(true)
        .build();
    let mut packer = Packer::new(opts).unwrap();
    let reqs = vec![
        Rect::sized(120, 30, 0),
        Rect::sized(30, 120, 1),
        Rect::sized(60, 60, 2),
    ];
    let bins = packer.pack_rects(reqs.clone());
    for placed in &bins[0].placed {
        let req = &reqs[placed.id];
        if placed.is_rotated {
            assert_eq!((placed.w, placed.h), (req.h, req.w));
        } else {
            assert_eq!((placed.w, placed.h), (req.w, req.h));
        }
    }
}

#[test]
fn autosize_skipped_when_bin_overflows() {
    // two bins: only the full-fitting one may shrink; the spill bin with
    // rejects keeps maximum dimensions until its own turn succeeds
    let opts = PackOptions::builder()
        .max_size(256, 256)
        .algorithm(Algorithm::Basic)
        .auto_size(true)
        .build();
    let mut packer = Packer::new(opts).unwrap();
    let reqs: Vec<Rect> = (0..5).map(|i| Rect::sized(128, 128, i)).collect();
    let bins = packer.pack_rects(reqs);
    assert_eq!(bins.len(), 2);
    assert_eq!((bins[0].w, bins[0].h), (256, 256));
    // final bin holds one 128x128 and shrinks to it
    assert_eq!((bins[1].w, bins[1].h), (128, 128));
}
