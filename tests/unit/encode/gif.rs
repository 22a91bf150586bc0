use super::*;

fn solid(w: u32, h: u32, px: [u8; 4]) -> FrameRGBA {
    FrameRGBA {
        width: w,
        height: h,
        data: px.repeat((w * h) as usize),
        premultiplied: true,
    }
}

fn cfg(w: u32, h: u32) -> SinkConfig {
    SinkConfig {
        width: w,
        height: h,
        delay_ms: 50,
    }
}

#[test]
fn delay_rounds_to_centiseconds() {
    assert_eq!(delay_centis(50), 5);
    assert_eq!(delay_centis(60), 6);
    assert_eq!(delay_centis(44), 4);
    assert_eq!(delay_centis(45), 5);
    assert_eq!(delay_centis(1), 1);
    assert_eq!(delay_centis(u32::MAX), u16::MAX);
}

#[test]
fn encodes_a_looping_gif_with_every_frame() {
    let mut sink = GifSink::new(Rgba8::BLACK);
    sink.begin(cfg(8, 6)).unwrap();
    for i in 0..3u64 {
        let shade = (i * 100) as u8;
        sink.push_frame(FrameIndex(i), &solid(8, 6, [shade, 0, 0, 255]), 50)
            .unwrap();
    }
    let bytes = sink.finish().unwrap();
    assert_eq!(&bytes[..6], b"GIF89a");

    let mut opts = ::gif::DecodeOptions::new();
    opts.set_color_output(::gif::ColorOutput::RGBA);
    let mut dec = opts.read_info(bytes.as_slice()).unwrap();
    assert_eq!((dec.width(), dec.height()), (8, 6));
    let mut delays = Vec::new();
    let mut reds = Vec::new();
    while let Some(frame) = dec.read_next_frame().unwrap() {
        delays.push(frame.delay);
        reds.push(frame.buffer[0]);
    }
    assert_eq!(dec.repeat(), ::gif::Repeat::Infinite);
    assert_eq!(delays, vec![5, 5, 5]);
    assert!(reds[0] < reds[1] && reds[1] < reds[2], "reds={reds:?}");
}

#[test]
fn transparent_pixels_flatten_over_background() {
    let mut sink = GifSink::new(Rgba8::rgb(0, 0, 255)).with_speed(1);
    sink.begin(cfg(4, 4)).unwrap();
    sink.push_frame(FrameIndex(0), &solid(4, 4, [0, 0, 0, 0]), 50)
        .unwrap();
    let bytes = sink.finish().unwrap();

    let mut opts = ::gif::DecodeOptions::new();
    opts.set_color_output(::gif::ColorOutput::RGBA);
    let mut dec = opts.read_info(bytes.as_slice()).unwrap();
    let frame = dec.read_next_frame().unwrap().unwrap();
    let px = &frame.buffer[..4];
    assert!(px[0] < 8 && px[1] < 8 && px[2] > 247, "px={px:?}");
}

#[test]
fn rejects_out_of_order_and_mismatched_frames() {
    let mut sink = GifSink::new(Rgba8::BLACK);
    assert!(
        sink.push_frame(FrameIndex(0), &solid(2, 2, [0, 0, 0, 255]), 50)
            .is_err()
    );
    assert!(sink.finish().is_err());

    sink.begin(cfg(2, 2)).unwrap();
    sink.push_frame(FrameIndex(1), &solid(2, 2, [0, 0, 0, 255]), 50)
        .unwrap();
    let err = sink
        .push_frame(FrameIndex(1), &solid(2, 2, [0, 0, 0, 255]), 50)
        .unwrap_err();
    assert!(matches!(err, MagicWishError::Encode(_)));
    let err = sink
        .push_frame(FrameIndex(2), &solid(3, 2, [0, 0, 0, 255]), 50)
        .unwrap_err();
    assert!(matches!(err, MagicWishError::Validation(_)));
    assert!(!sink.finish().unwrap().is_empty());
}

#[test]
fn begin_validates_geometry_and_delay() {
    let mut sink = GifSink::new(Rgba8::BLACK);
    assert!(sink.begin(cfg(0, 2)).is_err());
    assert!(
        sink.begin(SinkConfig {
            width: 2,
            height: 2,
            delay_ms: 0
        })
        .is_err()
    );
}

#[test]
fn restarting_discards_an_unfinished_stream() {
    let mut sink = GifSink::new(Rgba8::BLACK);
    sink.begin(cfg(4, 4)).unwrap();
    sink.push_frame(FrameIndex(0), &solid(4, 4, [255, 0, 0, 255]), 50)
        .unwrap();
    sink.push_frame(FrameIndex(1), &solid(4, 4, [255, 0, 0, 255]), 50)
        .unwrap();

    sink.begin(cfg(2, 2)).unwrap();
    sink.push_frame(FrameIndex(0), &solid(2, 2, [0, 0, 255, 255]), 50)
        .unwrap();
    let bytes = sink.finish().unwrap();

    let mut dec = ::gif::DecodeOptions::new()
        .read_info(bytes.as_slice())
        .unwrap();
    assert_eq!((dec.width(), dec.height()), (2, 2));
    let mut frames = 0;
    while dec.read_next_frame().unwrap().is_some() {
        frames += 1;
    }
    assert_eq!(frames, 1);
}

#[test]
fn abort_allows_a_fresh_stream() {
    let mut sink = GifSink::new(Rgba8::BLACK);
    sink.begin(cfg(2, 2)).unwrap();
    sink.push_frame(FrameIndex(3), &solid(2, 2, [0, 0, 0, 255]), 50)
        .unwrap();
    sink.abort();
    assert!(sink.finish().is_err());

    sink.begin(cfg(2, 2)).unwrap();
    sink.push_frame(FrameIndex(0), &solid(2, 2, [0, 0, 0, 255]), 50)
        .unwrap();
    assert_eq!(&sink.finish().unwrap()[..6], b"GIF89a");
}
