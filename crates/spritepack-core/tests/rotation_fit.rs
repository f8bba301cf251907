use spritepack_core::prelude::*;

fn pack_one(algorithm: Algorithm, allow_rotate: bool) -> Vec<Bin> {
    let opts = PackOptions::builder()
        .max_size(100, 400)
        .algorithm(algorithm)
        .allow_rotate(allow_rotate)
        .sort(false)
        .build();
    let mut packer = Packer::new(opts).unwrap();
    packer.pack_rects(vec![Rect::sized(400, 50, 0)])
}

#[test]
fn tall_bin_forces_rotation_in_every_algorithm() {
    for algorithm in [Algorithm::Basic, Algorithm::Skyline, Algorithm::MaxRects] {
        let bins = pack_one(algorithm, true);
        assert_eq!(bins.len(), 1, "{algorithm:?}");
        let placed = &bins[0].placed;
        assert_eq!(placed.len(), 1, "{algorithm:?}");
        let r = &placed[0];
        assert!(r.is_rotated, "{algorithm:?}");
        assert_eq!((r.w, r.h), (50, 400), "{algorithm:?}");
        assert!(r.right() <= bins[0].w && r.bottom() <= bins[0].h);
        assert_eq!(r.id, 0);
    }
}

#[test]
fn without_rotation_nothing_fits() {
    for algorithm in [Algorithm::Basic, Algorithm::Skyline, Algorithm::MaxRects] {
        let bins = pack_one(algorithm, false);
        assert!(bins.is_empty(), "{algorithm:?}");
    }
}
