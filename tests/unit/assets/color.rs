use super::*;
use serde_json::json;

#[test]
fn parses_hex_rgb_and_rgba() {
    assert_eq!(Rgba8::parse_hex("#ff0000").unwrap(), Rgba8::rgb(255, 0, 0));
    assert_eq!(Rgba8::parse_hex("4FACFE").unwrap(), Rgba8::rgb(0x4f, 0xac, 0xfe));
    let c = Rgba8::parse_hex("#0000ff80").unwrap();
    assert_eq!(c, Rgba8::rgba(0, 0, 255, 128));
}

#[test]
fn rejects_short_and_garbage_hex() {
    assert!(Rgba8::parse_hex("#fff").is_err());
    assert!(Rgba8::parse_hex("#gg0000").is_err());
    assert!(Rgba8::parse_hex("#ffé000").is_err());
}

#[test]
fn serde_uses_hex_strings() {
    let c: Rgba8 = serde_json::from_value(json!("#0a0a0f")).unwrap();
    assert_eq!(c, Rgba8::rgb(10, 10, 15));
    assert_eq!(serde_json::to_value(c).unwrap(), json!("#0a0a0f"));
    assert_eq!(
        serde_json::to_value(c.fade(0.5)).unwrap(),
        json!("#0a0a0f80")
    );
}

#[test]
fn hsl_primary_red() {
    assert_eq!(Rgba8::from_hsla(0.0, 1.0, 0.5, 1.0), Rgba8::rgb(255, 0, 0));
    assert_eq!(Rgba8::from_hsla(360.0, 0.0, 1.0, 1.0), Rgba8::WHITE);
}

#[test]
fn premul_and_mix() {
    assert_eq!(Rgba8::rgba(255, 128, 0, 128).to_premul(), [128, 64, 0, 128]);
    assert_eq!(Rgba8::BLACK.mix(Rgba8::WHITE, 0.5), Rgba8::rgb(128, 128, 128));
    assert!(Rgba8::WHITE.luminance() > 0.99);
    assert!(Rgba8::BLACK.luminance() < 0.01);
}
