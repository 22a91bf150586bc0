use super::*;

#[test]
fn presets_validate() {
    TimelineConfig::standard().validate().unwrap();
    TimelineConfig::cinematic().validate().unwrap();
}

#[test]
fn preset_lengths_and_delays() {
    let s = TimelineConfig::standard();
    assert_eq!((s.total_frames, s.delay_ms), (480, 50));
    assert_eq!(s.theme, Theme::Dark);
    assert!(!s.effects.glitter);

    let c = TimelineConfig::preset("Cinematic").unwrap();
    assert_eq!((c.total_frames, c.delay_ms), (600, 60));
    assert_eq!(c.theme, Theme::Light);
    assert!(c.effects.floating_glyphs && c.effects.glitter);
    assert_eq!(c.timings.finale_start, 0.75);

    assert!(TimelineConfig::preset("fast").is_err());
}

#[test]
fn partial_json_fills_defaults() {
    let cfg = TimelineConfig::from_json(r#"{ "total_frames": 24, "theme": "auto" }"#).unwrap();
    assert_eq!(cfg.total_frames, 24);
    assert_eq!(cfg.theme, Theme::Auto);
    assert_eq!(cfg.delay_ms, 50);
    assert_eq!(cfg.timings, StageTimings::STANDARD);
}

#[test]
fn rejects_zero_lengths() {
    let mut cfg = TimelineConfig::standard();
    cfg.total_frames = 0;
    assert!(cfg.validate().is_err());

    let mut cfg = TimelineConfig::standard();
    cfg.delay_ms = 0;
    assert!(cfg.validate().is_err());

    let mut cfg = TimelineConfig::standard();
    cfg.canvas.width = 0;
    assert!(cfg.validate().is_err());
}

#[test]
fn rejects_stage_reordering() {
    let mut t = StageTimings::STANDARD;
    t.proof.start = 0.4;
    assert!(t.validate().is_err(), "proof may not start before the reveal ends");

    let mut t = StageTimings::STANDARD;
    t.finale_start = 0.85;
    assert!(t.validate().is_err(), "finale must start while the proof is visible");

    let mut t = StageTimings::STANDARD;
    t.proof_diagonal_gate = 0.25;
    assert!(t.validate().is_err());

    let mut t = StageTimings::STANDARD;
    t.grid_fade = Window::new(0.8, 0.7);
    assert!(t.validate().is_err());

    let mut t = StageTimings::STANDARD;
    t.cell_stagger = 0.08;
    assert!(t.validate().is_err());
}

#[test]
fn window_local_maps_linearly() {
    let w = Window::new(0.5, 0.75);
    assert_eq!(w.local(0.5), 0.0);
    assert_eq!(w.local(0.625), 0.5);
    assert!((w.local(0.8) - 1.2).abs() < 1e-9);
}

#[test]
fn progress_uses_total_frames() {
    let cfg = TimelineConfig::standard();
    assert_eq!(cfg.progress(FrameIndex(240)), 0.5);
    assert_eq!(cfg.progress(FrameIndex(0)), 0.0);
}
