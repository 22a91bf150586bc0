use super::*;

#[test]
fn date_30_03_2007_echoes_and_sums_to_60() {
    let g = build(30, 3, 20, 7);
    assert_eq!(g.magic_constant(), 60);
    assert_eq!(g.cells()[0], [30, 3, 20, 7]);
    assert!(g.is_magic());
    assert_eq!(g.offset(), 1);
    assert_eq!(
        g.rows(),
        [[30, 3, 20, 7], [8, 19, 0, 33], [1, 32, 9, 18], [21, 6, 31, 2]]
    );
}

#[test]
fn negative_k1_falls_back() {
    let g = build(0, 0, 0, 1);
    assert_eq!(g.magic_constant(), 1);
    assert_eq!(g.cells()[0], [0, 0, 0, 1]);
    assert!(g.is_magic());
    assert_ne!(g.offset(), 1);
}

#[test]
fn all_zero_uses_k0() {
    let g = build(0, 0, 0, 0);
    assert_eq!(g.offset(), 0);
    assert_eq!(g.rows(), [[0; 4]; 4]);
    assert!(g.is_magic());
}

#[test]
fn k_minus_one_is_preferred_over_zero() {
    // B=0 breaks k=1 (B-3k); k=-1 only needs A>=3, C>=1, D>=2.
    let g = build(5, 0, 5, 5);
    assert_eq!(g.offset(), -1);
    assert!(g.is_magic());
}

#[test]
fn magic_invariant_holds_for_all_small_inputs() {
    // Exhaustive over a coarse lattice plus every day/month pairing at a few centuries.
    let lattice = [0u32, 1, 2, 3, 4, 7, 12, 19, 20, 31, 50, 99];
    for &a in &lattice {
        for &b in &lattice {
            for &c in &lattice {
                for &d in &lattice {
                    let g = build(a, b, c, d);
                    assert_eq!(g.cells()[0], [a, b, c, d]);
                    assert_eq!(g.magic_constant(), u64::from(a + b + c + d));
                    assert!(g.is_magic(), "{a},{b},{c},{d}");
                }
            }
        }
    }
    for a in 1..=31 {
        for b in 1..=12 {
            for (c, d) in [(19, 99), (20, 0), (20, 7), (20, 24)] {
                let g = build(a, b, c, d);
                assert!(g.is_magic());
                assert_eq!(g.cells()[0], [a, b, c, d]);
            }
        }
    }
}

#[test]
fn columns_and_diagonals_are_read_correctly() {
    let g = build(30, 3, 20, 7);
    assert_eq!(g.columns()[0], [30, 8, 1, 21]);
    assert_eq!(g.diagonals()[0], [30, 19, 9, 2]);
    assert_eq!(g.diagonals()[1], [7, 0, 32, 21]);
}

#[test]
fn builds_from_parsed_date() {
    let q = crate::square::date::parse_date("30/03/2007").unwrap();
    assert_eq!(build_from_date(q), build(30, 3, 20, 7));
}
