use super::*;

fn px(s: &Surface, x: u32, y: u32) -> [u8; 4] {
    let i = ((y * s.width() + x) * 4) as usize;
    let d = s.data();
    [d[i], d[i + 1], d[i + 2], d[i + 3]]
}

fn desc(ops: Vec<DrawOp>) -> FrameDescriptor {
    FrameDescriptor { progress: 0.0, ops }
}

fn solid_image(w: u32, h: u32, c: Rgba8) -> PreparedImage {
    let mut bytes = Vec::new();
    for _ in 0..w * h {
        bytes.extend_from_slice(&c.to_premul());
    }
    PreparedImage::from_premul(w, h, bytes).unwrap()
}

#[test]
fn clear_and_rect_fill_expected_pixels() {
    let mut s = Surface::new(8, 8).unwrap();
    let mut p = Painter::without_text();
    p.paint(
        &mut s,
        &desc(vec![
            DrawOp::Clear {
                color: Rgba8::rgb(0, 0, 255),
            },
            DrawOp::Rect {
                rect: Rect::new(2.0, 2.0, 6.0, 6.0),
                color: Rgba8::rgb(255, 0, 0),
            },
        ]),
        None,
    )
    .unwrap();
    assert_eq!(px(&s, 0, 0), [0, 0, 255, 255]);
    assert_eq!(px(&s, 3, 3), [255, 0, 0, 255]);
    assert_eq!(px(&s, 7, 7), [0, 0, 255, 255]);
}

#[test]
fn circle_and_line_cover_their_centres_only() {
    let mut s = Surface::new(32, 32).unwrap();
    let mut p = Painter::without_text();
    p.paint(
        &mut s,
        &desc(vec![
            DrawOp::Clear {
                color: Rgba8::BLACK,
            },
            DrawOp::Circle {
                center: Point::new(8.0, 8.0),
                radius: 4.0,
                color: Rgba8::WHITE,
            },
            DrawOp::Line {
                from: Point::new(0.0, 24.5),
                to: Point::new(32.0, 24.5),
                width: 3.0,
                color: Rgba8::rgb(0, 255, 0),
            },
        ]),
        None,
    )
    .unwrap();
    assert_eq!(px(&s, 8, 8), [255, 255, 255, 255]);
    assert_eq!(px(&s, 20, 8), [0, 0, 0, 255]);
    assert_eq!(px(&s, 16, 24), [0, 255, 0, 255]);
    assert_eq!(px(&s, 16, 16), [0, 0, 0, 255]);
}

#[test]
fn transparent_ops_leave_pixels_untouched() {
    let mut s = Surface::new(8, 8).unwrap();
    let mut p = Painter::without_text();
    p.paint(
        &mut s,
        &desc(vec![
            DrawOp::Clear {
                color: Rgba8::BLACK,
            },
            DrawOp::Rect {
                rect: Rect::new(0.0, 0.0, 8.0, 8.0),
                color: Rgba8::rgba(255, 255, 255, 0),
            },
            DrawOp::Line {
                from: Point::new(1.0, 1.0),
                to: Point::new(1.0, 1.0),
                width: 4.0,
                color: Rgba8::WHITE,
            },
        ]),
        None,
    )
    .unwrap();
    assert!(s.data().chunks_exact(4).all(|c| c == [0, 0, 0, 255]));
}

#[test]
fn backdrop_is_skipped_until_an_image_is_supplied() {
    let ops = vec![
        DrawOp::Clear {
            color: Rgba8::BLACK,
        },
        DrawOp::Backdrop { opacity: 1.0 },
    ];
    let mut s = Surface::new(16, 16).unwrap();
    let mut p = Painter::without_text();
    p.paint(&mut s, &desc(ops.clone()), None).unwrap();
    assert_eq!(px(&s, 8, 8), [0, 0, 0, 255]);

    let img = solid_image(4, 4, Rgba8::rgb(200, 100, 50));
    p.paint(&mut s, &desc(ops), Some(&img)).unwrap();
    for (x, y) in [(8, 8), (15, 15)] {
        let got = px(&s, x, y);
        for (c, want) in got.iter().zip([200u8, 100, 50, 255]) {
            assert!(c.abs_diff(want) <= 2, "pixel ({x},{y}) = {got:?}");
        }
    }
}

#[test]
fn half_opacity_backdrop_blends_over_clear() {
    let mut s = Surface::new(8, 8).unwrap();
    let mut p = Painter::without_text();
    let img = solid_image(2, 2, Rgba8::WHITE);
    p.paint(
        &mut s,
        &desc(vec![
            DrawOp::Clear {
                color: Rgba8::BLACK,
            },
            DrawOp::Backdrop { opacity: 0.5 },
        ]),
        Some(&img),
    )
    .unwrap();
    let [r, g, b, a] = px(&s, 4, 4);
    assert_eq!(a, 255);
    assert!((120..=136).contains(&r), "r={r}");
    assert_eq!(r, g);
    assert_eq!(g, b);
}

#[test]
fn vertical_gradient_darkens_downwards() {
    let mut s = Surface::new(4, 40).unwrap();
    let mut p = Painter::without_text();
    p.paint(
        &mut s,
        &desc(vec![
            DrawOp::Clear {
                color: Rgba8::WHITE,
            },
            DrawOp::VerticalGradient {
                y0: 20.0,
                y1: 40.0,
                stops: vec![
                    (0.0, Rgba8::rgba(0, 0, 0, 0)),
                    (1.0, Rgba8::rgba(0, 0, 0, 255)),
                ],
            },
        ]),
        None,
    )
    .unwrap();
    assert_eq!(px(&s, 2, 5), [255, 255, 255, 255]);
    let upper = px(&s, 2, 22)[0];
    let lower = px(&s, 2, 37)[0];
    assert!(upper > lower, "upper={upper} lower={lower}");
}

#[test]
fn text_without_fonts_is_skipped() {
    let mut s = Surface::new(16, 16).unwrap();
    let mut p = Painter::without_text();
    p.paint(
        &mut s,
        &desc(vec![
            DrawOp::Clear {
                color: Rgba8::BLACK,
            },
            DrawOp::Text {
                text: "16".to_string(),
                role: TextRole::Bold,
                size_px: 12.0,
                anchor: Point::new(8.0, 8.0),
                align: TextAlign::Center,
                baseline: TextBaseline::Middle,
                color: Rgba8::WHITE,
            },
        ]),
        None,
    )
    .unwrap();
    assert!(s.data().chunks_exact(4).all(|c| c == [0, 0, 0, 255]));
}

#[test]
fn star_path_alternates_radii() {
    let path = star_path(Point::new(0.0, 0.0), 10.0, 4.0, 5, 0.0);
    let pts: Vec<Point> = path
        .elements()
        .iter()
        .filter_map(|el| match el {
            kurbo::PathEl::MoveTo(p) | kurbo::PathEl::LineTo(p) => Some(*p),
            _ => None,
        })
        .collect();
    assert_eq!(pts.len(), 10);
    assert!((pts[0].to_vec2().hypot() - 10.0).abs() < 1e-9);
    assert!((pts[1].to_vec2().hypot() - 4.0).abs() < 1e-9);
    // First tip points straight up.
    assert!((pts[0].y + 10.0).abs() < 1e-9);
}

#[test]
fn gradient_sampling_clamps_outside_stops() {
    let stops = [(0.2, Rgba8::BLACK), (0.8, Rgba8::WHITE)];
    assert_eq!(sample_gradient(&stops, 0.0), Rgba8::BLACK);
    assert_eq!(sample_gradient(&stops, 1.0), Rgba8::WHITE);
    let mid = sample_gradient(&stops, 0.5);
    assert!((120..=135).contains(&mid.r));
}
