use super::*;

#[test]
fn test_display_matches_variant() {
    assert_eq!(ErrorCode::E2002.to_string(), "E2002");
    assert_eq!(format!("{}", ErrorCode::E9001), "E9001");
}

#[test]
fn test_internal_codes() {
    assert!(ErrorCode::E9001.is_internal());
    assert!(!ErrorCode::E3001.is_internal());
}
