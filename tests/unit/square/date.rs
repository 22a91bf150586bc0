use super::*;

#[test]
fn parses_canonical_date() {
    let q = parse_date("30/03/2007").unwrap();
    assert_eq!(
        q,
        DateQuadruple {
            day: 30,
            month: 3,
            century: 20,
            year_in_century: 7
        }
    );
    assert_eq!(q.sum(), 60);
}

#[test]
fn century_and_remainder_split() {
    let q = parse_date("01/01/1999").unwrap();
    assert_eq!((q.century, q.year_in_century), (19, 99));
    let q = parse_date("01/01/2000").unwrap();
    assert_eq!((q.century, q.year_in_century), (20, 0));
}

#[test]
fn short_fields_and_whitespace_are_accepted() {
    let q = parse_date(" 3/3/2007 ").unwrap();
    assert_eq!(q.as_array(), [3, 3, 20, 7]);
}

#[test]
fn calendar_legality_is_not_checked() {
    assert!(parse_date("31/02/2024").is_ok());
}

#[test]
fn malformed_dates_are_parse_errors() {
    for bad in ["", "30-03-2007", "30/03", "30/03/2007/1", "aa/03/2007", "30//2007", "-1/03/2007"] {
        let err = parse_date(bad).unwrap_err();
        assert!(
            matches!(err, crate::MagicWishError::Parse(_)),
            "{bad:?} gave {err}"
        );
    }
}
