use super::*;
use crate::{
    encode::{pipeline::encode_wish, sink::InMemorySink},
    foundation::core::Canvas,
    timeline::config::TimelineConfig,
    wish::model::WishSpec,
};

fn timeline(frames: u64) -> Timeline {
    let mut cfg = TimelineConfig::standard();
    cfg.canvas = Canvas::new(40, 40).unwrap();
    cfg.total_frames = frames;
    let wish = WishSpec::from_json(
        r#"{"occasion":"anniversary","recipientName":"Sam","message":"Ten years","date":"05/06/2014"}"#,
    )
    .unwrap();
    Timeline::new(wish, cfg).unwrap()
}

#[test]
fn frame_index_wraps_modulo_total() {
    let tl = timeline(4);
    let mut painter = Painter::without_text();
    let mut player = LivePlayer::new(&tl).unwrap();

    let rendered: Vec<u64> = (0..9)
        .map(|_| player.tick(&tl, &mut painter, None).unwrap().0)
        .collect();
    assert_eq!(rendered, vec![0, 1, 2, 3, 0, 1, 2, 3, 0]);
    assert_eq!(player.frame_index(), FrameIndex(1));
    assert_eq!(player.loops(), 2);
}

#[test]
fn wraparound_resets_burst_pools() {
    let tl = timeline(10);
    let mut painter = Painter::without_text();
    let mut player = LivePlayer::new(&tl).unwrap();

    for _ in 0..9 {
        player.tick(&tl, &mut painter, None).unwrap();
    }
    let before = player.particles().counts();
    assert!(before.confetti > 0);
    assert!(before.crackers > 0);

    player.tick(&tl, &mut painter, None).unwrap();
    let after = player.particles().counts();
    assert_eq!(after.confetti, 0);
    assert_eq!(after.crackers, 0);
}

#[test]
fn pointer_feeds_the_aura_pool() {
    let tl = timeline(6);
    let mut painter = Painter::without_text();
    let mut player = LivePlayer::new(&tl).unwrap();
    player
        .tick(&tl, &mut painter, Some(Point::new(20.0, 20.0)))
        .unwrap();
    assert!(player.particles().counts().aura > 0);
}

#[test]
fn first_pass_without_pointer_matches_the_encoded_clip() {
    let tl = timeline(8);
    let mut painter = Painter::without_text();

    let mut sink = InMemorySink::new();
    encode_wish(&tl, &mut painter, &mut sink).unwrap();

    let mut player = LivePlayer::new(&tl).unwrap();
    for (idx, frame) in sink.frames() {
        let rendered = player.tick(&tl, &mut painter, None).unwrap();
        assert_eq!(rendered, *idx);
        assert_eq!(player.surface().data(), frame.data.as_slice());
    }
}
