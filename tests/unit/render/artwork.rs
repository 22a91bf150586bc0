use super::*;

fn px(img: &PreparedImage, x: u32, y: u32) -> [u8; 4] {
    let i = (y as usize * img.width as usize + x as usize) * 4;
    let p = &img.rgba8_premul[i..i + 4];
    [p[0], p[1], p[2], p[3]]
}

#[test]
fn rejects_unusable_sizes() {
    assert!(Artwork::new(0, 4, Rgba8::BLACK).is_err());
    assert!(Artwork::new(4, 70_000, Rgba8::BLACK).is_err());
}

#[test]
fn base_is_filled_opaque() {
    let img = Artwork::new(6, 4, Rgba8::rgba(0, 0, 255, 10))
        .unwrap()
        .finish()
        .unwrap();
    assert_eq!((img.width, img.height), (6, 4));
    assert!(img.rgba8_premul.chunks_exact(4).all(|p| p == [0, 0, 255, 255]));
}

#[test]
fn disc_covers_its_centre_only() {
    let mut art = Artwork::new(32, 32, Rgba8::BLACK).unwrap();
    art.disc(Point::new(16.0, 16.0), 6.0, Rgba8::WHITE);
    art.disc(Point::new(2.0, 2.0), 4.0, Rgba8::WHITE.fade(0.0));
    let img = art.finish().unwrap();
    assert_eq!(px(&img, 16, 16), [255, 255, 255, 255]);
    assert_eq!(px(&img, 2, 2), [0, 0, 0, 255]);
    assert_eq!(px(&img, 30, 30), [0, 0, 0, 255]);
}

#[test]
fn glow_fades_towards_the_rim() {
    let mut art = Artwork::new(64, 64, Rgba8::BLACK).unwrap();
    art.glow(Point::new(32.0, 32.0), 24.0, Rgba8::WHITE).unwrap();
    let img = art.finish().unwrap();
    let centre = px(&img, 32, 32)[0];
    let mid = px(&img, 44, 32)[0];
    let rim = px(&img, 54, 32)[0];
    assert!(centre > 230, "centre={centre}");
    assert!(centre > mid && mid > rim, "{centre} {mid} {rim}");
    assert_eq!(px(&img, 2, 2), [0, 0, 0, 255]);
}

#[test]
fn radial_leaves_the_outside_alone() {
    let mut art = Artwork::new(40, 40, Rgba8::rgb(0, 255, 0)).unwrap();
    art.radial(
        Point::new(20.0, 20.0),
        10.0,
        &[(0.0, Rgba8::rgb(255, 0, 0)), (1.0, Rgba8::rgb(255, 0, 0))],
    )
    .unwrap();
    let img = art.finish().unwrap();
    let inside = px(&img, 20, 20);
    assert!(inside[0] > 240 && inside[1] < 15, "inside={inside:?}");
    assert_eq!(px(&img, 1, 1), [0, 255, 0, 255]);
}

#[test]
fn vertical_linear_ramps_top_to_bottom() {
    let mut art = Artwork::new(8, 64, Rgba8::rgb(255, 0, 0)).unwrap();
    art.linear(
        Point::ORIGIN,
        Point::new(0.0, 64.0),
        &[(0.0, Rgba8::BLACK), (1.0, Rgba8::WHITE)],
    )
    .unwrap();
    let img = art.finish().unwrap();
    let column: Vec<u8> = (0..64).map(|y| px(&img, 4, y)[1]).collect();
    assert!(column[0] < 16, "top={}", column[0]);
    assert!(column[63] > 239, "bottom={}", column[63]);
    assert!(column.windows(2).all(|w| w[0] <= w[1]), "{column:?}");
    // Channels stay grey; the red base is fully covered.
    let mid = px(&img, 4, 32);
    assert!(mid[0].abs_diff(mid[1]) <= 2, "mid={mid:?}");
}

#[test]
fn diagonal_linear_covers_every_corner() {
    let mut art = Artwork::new(30, 20, Rgba8::rgb(255, 0, 0)).unwrap();
    art.linear(
        Point::ORIGIN,
        Point::new(30.0, 20.0),
        &[(0.0, Rgba8::BLACK), (1.0, Rgba8::rgb(0, 0, 255))],
    )
    .unwrap();
    let img = art.finish().unwrap();
    for (x, y) in [(0, 0), (29, 0), (0, 19), (29, 19)] {
        let p = px(&img, x, y);
        assert!(p[0] < 8, "corner ({x},{y}) still shows the base: {p:?}");
    }
    assert!(px(&img, 29, 19)[2] > px(&img, 0, 0)[2]);
}
