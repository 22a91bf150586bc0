use super::*;

fn frame() -> FrameRGBA {
    FrameRGBA {
        width: 1,
        height: 1,
        data: vec![1, 2, 3, 255],
        premultiplied: true,
    }
}

#[test]
fn in_memory_sink_records_frames_and_delays() {
    let mut sink = InMemorySink::new();
    assert!(sink.push_frame(FrameIndex(0), &frame(), 50).is_err());

    let cfg = SinkConfig {
        width: 1,
        height: 1,
        delay_ms: 50,
    };
    sink.begin(cfg).unwrap();
    sink.push_frame(FrameIndex(0), &frame(), 50).unwrap();
    sink.push_frame(FrameIndex(1), &frame(), 50).unwrap();
    assert!(!sink.is_finished());
    assert!(sink.finish().unwrap().is_empty());

    assert!(sink.is_finished());
    assert_eq!(sink.config(), Some(cfg));
    assert_eq!(sink.frames().len(), 2);
    assert_eq!(sink.frames()[1].0, FrameIndex(1));
    assert_eq!(sink.delays(), &[50, 50]);
}

#[test]
fn begin_resets_previous_capture() {
    let mut sink = InMemorySink::new();
    let cfg = SinkConfig {
        width: 1,
        height: 1,
        delay_ms: 60,
    };
    sink.begin(cfg).unwrap();
    sink.push_frame(FrameIndex(0), &frame(), 60).unwrap();
    sink.finish().unwrap();
    sink.begin(cfg).unwrap();
    assert!(sink.frames().is_empty());
    assert!(sink.delays().is_empty());
    assert!(!sink.is_finished());
}
