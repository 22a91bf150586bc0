use super::*;

const BRUSH: TextBrushRgba8 = TextBrushRgba8 {
    r: 255,
    g: 255,
    b: 255,
    a: 255,
};

#[test]
fn empty_set_has_no_faces() {
    let set = FontSet::empty();
    assert!(set.is_empty());
    assert!(set.face(TextRole::Title).is_none());
    assert!(FontSet::from_database(&usvg::fontdb::Database::new()).is_empty());
}

#[test]
fn from_bytes_shares_one_buffer_across_roles() {
    assert!(FontSet::from_bytes(Vec::new()).is_err());
    let set = FontSet::from_bytes(vec![1, 2, 3]).unwrap();
    let body = set.face(TextRole::Body).unwrap();
    let msg = set.face(TextRole::Message).unwrap();
    assert!(Arc::ptr_eq(&body.bytes, &msg.bytes));
}

#[test]
fn from_bytes_keeps_each_role_style() {
    let set = FontSet::from_bytes(vec![1, 2, 3]).unwrap();
    let traits = |role| {
        let f = set.face(role).unwrap();
        (f.weight, f.italic)
    };
    assert_eq!(traits(TextRole::Body), (400, false));
    assert_eq!(traits(TextRole::Bold), (700, false));
    assert_eq!(traits(TextRole::Title), (700, false));
    assert_eq!(traits(TextRole::Message), (400, true));
}

#[test]
fn set_overrides_a_single_role() {
    let mut set = FontSet::empty();
    set.set(
        TextRole::Bold,
        FontFace {
            bytes: Arc::new(vec![0u8; 4]),
            index: 0,
            weight: 700,
            italic: false,
        },
    );
    assert!(!set.is_empty());
    assert_eq!(set.face(TextRole::Bold).unwrap().weight, 700);
    assert!(set.face(TextRole::Body).is_none());
}

#[test]
fn shaping_without_a_face_yields_none() {
    let mut engine = TextEngine::new(FontSet::empty());
    assert!(!engine.has_fonts());
    assert!(
        engine
            .shape("16", TextRole::Body, 20.0, BRUSH)
            .unwrap()
            .is_none()
    );
    assert!(engine.shape("16", TextRole::Body, 0.0, BRUSH).is_err());
}

#[test]
fn garbage_font_bytes_are_an_asset_error() {
    let mut engine = TextEngine::new(FontSet::from_bytes(vec![0u8; 64]).unwrap());
    let err = engine
        .shape("16", TextRole::Body, 20.0, BRUSH)
        .err()
        .unwrap();
    assert!(matches!(err, MagicWishError::Asset(_)));
}

#[test]
fn system_fonts_shape_digits_when_available() {
    let set = FontSet::system();
    if set.is_empty() {
        return;
    }
    let mut engine = TextEngine::new(set);
    let shaped = engine
        .shape("2024", TextRole::Bold, 32.0, BRUSH)
        .unwrap()
        .unwrap();
    assert!(shaped.width() > 0.0);
    assert!(shaped.height() > 0.0);
    assert!(shaped.first_baseline() > 0.0);
    assert!(shaped.first_baseline() <= shaped.height());
}
