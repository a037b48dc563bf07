use super::*;
use proptest::prelude::*;

#[test]
fn test_narrow_in_range() {
    assert_eq!(
        MinorUnits::from_accumulated(113_000).unwrap(),
        MinorUnits::new(113_000)
    );
    assert_eq!(
        MinorUnits::from_accumulated(i128::from(i64::MIN)).unwrap(),
        MinorUnits::new(i64::MIN)
    );
}

#[test]
fn test_narrow_overflow_is_fatal() {
    let too_big = i128::from(i64::MAX) + 1;
    let err = MinorUnits::from_accumulated(too_big).unwrap_err();
    assert_eq!(err.error_code(), "OVERFLOW");

    let too_small = i128::from(i64::MIN) - 1;
    assert!(MinorUnits::from_accumulated(too_small).is_err());
}

#[test]
fn test_checked_add_overflow() {
    let max = MinorUnits::new(i64::MAX);
    assert!(max.checked_add(MinorUnits::new(1)).is_err());
    assert_eq!(
        max.checked_sub(MinorUnits::new(1)).unwrap(),
        MinorUnits::new(i64::MAX - 1)
    );
}

#[test]
fn test_total_narrows_once() {
    let amounts = [MinorUnits::new(i64::MAX), MinorUnits::new(i64::MAX)];
    assert!(MinorUnits::total(amounts).is_err());

    // Intermediate overflow at i64 width is fine at accumulator width.
    let amounts = [
        MinorUnits::new(i64::MAX),
        MinorUnits::new(i64::MAX),
        MinorUnits::new(-i64::MAX),
        MinorUnits::new(-i64::MAX),
    ];
    assert_eq!(MinorUnits::total(amounts).unwrap(), MinorUnits::ZERO);
}

#[test]
fn test_to_major_string() {
    assert_eq!(MinorUnits::new(113_000).to_major_string(), "1130.00");
    assert_eq!(MinorUnits::new(5).to_major_string(), "0.05");
    assert_eq!(MinorUnits::new(-1205).to_major_string(), "-12.05");
    assert_eq!(MinorUnits::ZERO.to_major_string(), "0.00");
}

#[test]
fn test_sign_helpers() {
    assert!(MinorUnits::new(1).is_positive());
    assert!(MinorUnits::new(-1).is_negative());
    assert!(MinorUnits::ZERO.is_zero());
    assert!(!MinorUnits::ZERO.is_positive());
}

proptest! {
    /// Widen-then-narrow is lossless for every 64-bit amount.
    #[test]
    fn prop_widen_narrow_round_trip(amount in any::<i64>()) {
        let m = MinorUnits::new(amount);
        prop_assert_eq!(MinorUnits::from_accumulated(m.widen()).unwrap(), m);
    }

    /// Checked add agrees with i128 arithmetic whenever it succeeds.
    #[test]
    fn prop_checked_add_matches_wide(a in any::<i64>(), b in any::<i64>()) {
        let wide = i128::from(a) + i128::from(b);
        match MinorUnits::new(a).checked_add(MinorUnits::new(b)) {
            Ok(sum) => prop_assert_eq!(i128::from(sum.value()), wide),
            Err(_) => prop_assert!(i64::try_from(wide).is_err()),
        }
    }
}
