use super::*;

#[test]
fn test_names_round_trip() {
    for ty in NumericType::ALL {
        assert_eq!(NumericType::from_name(ty.name()), Some(ty));
    }
    assert_eq!(NumericType::from_name("int"), None);
}

#[test]
fn test_integer_ranges() {
    assert!(NumericType::I8.fits_int(-128));
    assert!(!NumericType::I8.fits_int(128));
    assert!(NumericType::U8.fits_int(255));
    assert!(!NumericType::U8.fits_int(-1));
    assert!(NumericType::U64.fits_int(i128::from(u64::MAX)));
    assert!(NumericType::F32.fits_int(i128::from(i64::MAX)));
}

#[test]
fn test_classification() {
    assert!(NumericType::F32.is_float());
    assert!(NumericType::U16.is_integer());
    assert!(!NumericType::F64.is_integer());
}

#[test]
fn test_round_float_single_precision() {
    let rounded = NumericType::F32.round_float(2.2);
    assert_ne!(rounded, 2.2);
    assert_eq!(rounded, f64::from(2.2_f32));
    assert_eq!(NumericType::F64.round_float(2.2), 2.2);
}

#[test]
fn test_type_accessors() {
    let ty = Type::from(NumericType::I32);
    assert!(ty.is_numeric());
    assert_eq!(ty.as_numeric(), Some(NumericType::I32));
    assert_eq!(Type::Str.as_numeric(), None);
    assert_eq!(Type::Record(DeclId::new(3)).as_record(), Some(DeclId::new(3)));
}
