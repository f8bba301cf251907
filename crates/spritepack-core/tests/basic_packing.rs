use spritepack_core::packer::row::RowPacker;
use spritepack_core::packer::PackAlgo;
use spritepack_core::prelude::*;

fn row_packer(w: u32, h: u32) -> RowPacker {
    let opts = PackOptions::builder().max_size(w, h).build();
    let mut p = RowPacker::default();
    p.init(&opts);
    p
}

#[test]
fn fixed_uniform_grid() {
    let reqs: Vec<Rect> = (0..100).map(|i| Rect::sized(64, 64, i)).collect();
    let mut p = row_packer(512, 512);
    let (placed, rejected) = p.pack(&reqs);
    assert_eq!(placed.len(), 64);
    assert_eq!(rejected.len(), 36);
    for r in &placed {
        assert_eq!(r.x % 64, 0);
        assert_eq!(r.y % 64, 0);
    }
}

#[test]
fn wrap_advances_by_tallest_in_row() {
    let reqs = vec![
        Rect::sized(300, 100, 0),
        Rect::sized(300, 100, 1),
        Rect::sized(300, 100, 2),
    ];
    let mut p = row_packer(500, 500);
    let (placed, rejected) = p.pack(&reqs);
    assert!(rejected.is_empty());
    let at: Vec<(u32, u32)> = placed.iter().map(|r| (r.x, r.y)).collect();
    assert_eq!(at, [(0, 0), (0, 100), (0, 200)]);
}

#[test]
fn mixed_heights_wrap_below_tallest() {
    let reqs = vec![
        Rect::sized(200, 50, 0),
        Rect::sized(200, 120, 1),
        Rect::sized(200, 30, 2),
    ];
    let mut p = row_packer(500, 500);
    let (placed, _) = p.pack(&reqs);
    assert_eq!((placed[0].x, placed[0].y), (0, 0));
    assert_eq!((placed[1].x, placed[1].y), (200, 0));
    // third wraps below the 120-tall rectangle, not the 50-tall one
    assert_eq!((placed[2].x, placed[2].y), (0, 120));
}

#[test]
fn rejected_preserves_input_order() {
    let reqs = vec![
        Rect::sized(90, 10, 0),
        Rect::sized(200, 10, 1),
        Rect::sized(150, 10, 2),
        Rect::sized(90, 10, 3),
    ];
    let mut p = row_packer(100, 100);
    let (placed, rejected) = p.pack(&reqs);
    assert_eq!(placed.len(), 2);
    let ids: Vec<usize> = rejected.iter().map(|r| r.id).collect();
    assert_eq!(ids, [1, 2]);
}

#[test]
fn driver_spills_uniform_set_across_bins() {
    let opts = PackOptions::builder()
        .max_size(512, 512)
        .algorithm(Algorithm::Basic)
        .build();
    let mut packer = Packer::new(opts).unwrap();
    let reqs: Vec<Rect> = (0..100).map(|i| Rect::sized(64, 64, i)).collect();
    let bins = packer.pack_rects(reqs);
    let counts: Vec<usize> = bins.iter().map(|b| b.placed.len()).collect();
    assert_eq!(counts, [64, 36]);
}
