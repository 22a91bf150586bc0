use super::*;

#[test]
fn display_prefixes_are_stable() {
    assert!(
        MagicWishError::validation("x")
            .to_string()
            .contains("validation error:")
    );
    assert!(MagicWishError::parse("x").to_string().contains("parse error:"));
    assert!(MagicWishError::asset("x").to_string().contains("asset error:"));
    assert!(
        MagicWishError::encode("x")
            .to_string()
            .contains("encode error:")
    );
    assert!(
        MagicWishError::serde("x")
            .to_string()
            .contains("serialization error:")
    );
}

#[test]
fn other_preserves_source() {
    let base = std::io::Error::other("boom");
    let err = MagicWishError::Other(anyhow::Error::new(base));
    assert!(err.to_string().contains("boom"));
}

#[test]
fn json_errors_map_to_serde() {
    let err: MagicWishError = serde_json::from_str::<u32>("nope").unwrap_err().into();
    assert!(matches!(err, MagicWishError::Serde(_)));
}
