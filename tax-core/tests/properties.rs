//! Property tests for the built-in schedule.

use proptest::prelude::*;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use tax_core::calculations::{
    bracket_index_of, bracket_of, compute_scenarios, incremental_tax, sample_yield_curve,
    total_tax,
};
use tax_core::BracketTable;

/// Up to 2,000,000,000.00 CLP, in cents.
fn amount() -> impl Strategy<Value = Decimal> {
    (0i64..=200_000_000_000).prop_map(|cents| Decimal::new(cents, 2))
}

proptest! {
    #[test]
    fn incremental_tax_of_nothing_is_zero(base in amount()) {
        prop_assert_eq!(incremental_tax(base, Decimal::ZERO).unwrap(), Decimal::ZERO);
    }

    #[test]
    fn incremental_tax_is_additive_across_splits(
        base in amount(),
        a in amount(),
        b in amount(),
    ) {
        let split = incremental_tax(base, a).unwrap() + incremental_tax(base + a, b).unwrap();
        let whole = incremental_tax(base, a + b).unwrap();

        prop_assert_eq!(split, whole);
    }

    #[test]
    fn bracket_index_is_within_schedule(income in amount()) {
        let index = bracket_index_of(income).unwrap();

        prop_assert!((1..=8).contains(&index));
    }

    #[test]
    fn bracket_of_contains_income(income in amount()) {
        let bracket = bracket_of(income).unwrap();
        let index = bracket_index_of(income).unwrap();

        prop_assert!(bracket.contains(income));
        prop_assert_eq!(&BracketTable::igc_2025().brackets()[index - 1], bracket);
    }

    #[test]
    fn total_tax_never_decreases(income in amount(), extra in amount()) {
        prop_assert!(total_tax(income + extra).unwrap() >= total_tax(income).unwrap());
    }

    #[test]
    fn optimal_scenario_stays_within_available_and_headroom(
        base in amount(),
        available in amount(),
    ) {
        let set = compute_scenarios(base, available).unwrap();

        prop_assert!(set.optimal.extra_amount <= available);
        prop_assert!(set.optimal.extra_amount <= set.full.extra_amount);
        if let Some(upper) = set.base.bracket.upper {
            prop_assert!(base + set.optimal.extra_amount <= upper);
        }
        prop_assert!(set.optimal.yield_percent >= set.full.yield_percent);
    }

    #[test]
    fn curve_ends_at_full_scenario(base in amount(), max_extra in amount()) {
        let curve = sample_yield_curve(base, max_extra).unwrap();
        let set = compute_scenarios(base, max_extra).unwrap();

        prop_assert_eq!(curve.len(), 11);
        prop_assert_eq!(curve[10].gross_extra, max_extra);
        prop_assert_eq!(curve[10].incremental_tax, set.full.incremental_tax);
    }
}

#[test]
fn total_tax_is_continuous_at_each_lower_threshold() {
    let table = BracketTable::igc_2025();

    for pair in table.brackets().windows(2) {
        let threshold = pair[1].lower;
        let left = total_tax(threshold - dec!(0.000001)).unwrap();
        let right = total_tax(threshold).unwrap();

        assert!((right - left).abs() < dec!(0.000001), "jump at {threshold}");
    }
}

#[test]
fn literal_scenarios() {
    assert_eq!(total_tax(dec!(0)).unwrap(), dec!(0));
    assert_eq!(total_tax(dec!(10901628)).unwrap(), dec!(0.00));
    assert_eq!(total_tax(dec!(100000000)).unwrap(), dec!(16168447.04));
    assert_eq!(bracket_index_of(dec!(100000000)).unwrap(), 7);

    let expected = total_tax(dec!(25000000)).unwrap() - total_tax(dec!(20000000)).unwrap();
    assert_eq!(incremental_tax(dec!(20000000), dec!(5000000)).unwrap(), expected);

    let headroom = bracket_of(dec!(20000000)).unwrap().upper.unwrap() - dec!(20000000);
    let set = compute_scenarios(dec!(20000000), dec!(10000000)).unwrap();
    assert_eq!(set.optimal.extra_amount, dec!(10000000).min(headroom));
}
