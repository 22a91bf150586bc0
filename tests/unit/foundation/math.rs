use super::*;

#[test]
fn fnv_is_stable_for_known_input() {
    let mut h = Fnv1a64::new_default();
    h.write_bytes(b"a");
    assert_eq!(h.finish(), 0xaf63_dc4c_8601_ec8c);
}

#[test]
fn write_str_separates_fields() {
    let mut a = Fnv1a64::new_default();
    a.write_str("ab");
    a.write_str("c");
    let mut b = Fnv1a64::new_default();
    b.write_str("a");
    b.write_str("bc");
    assert_ne!(a.finish(), b.finish());
}

#[test]
fn hash_unit_is_deterministic_and_bounded() {
    for i in 0..256 {
        let v = hash_unit(7, i, 3);
        assert_eq!(v, hash_unit(7, i, 3));
        assert!((0.0..1.0).contains(&v));
    }
    assert_ne!(hash_unit(7, 1, 3), hash_unit(8, 1, 3));
}

#[test]
fn ramp_clamps_both_ends() {
    assert_eq!(ramp(0.1, 0.2, 0.4), 0.0);
    assert!((ramp(0.3, 0.2, 0.4) - 0.5).abs() < 1e-12);
    assert_eq!(ramp(0.9, 0.2, 0.4), 1.0);
    assert_eq!(ramp(0.5, 0.5, 0.5), 1.0);
}

#[test]
fn mul_div255_rounds() {
    assert_eq!(mul_div255_u16(255, 255), 255);
    assert_eq!(mul_div255_u16(128, 255), 128);
    assert_eq!(mul_div255_u16(0, 200), 0);
}
