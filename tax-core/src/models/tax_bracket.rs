use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// One tier of a progressive schedule.
///
/// Tax owed for an income inside the bracket is `income * factor - deduction`.
/// The interval is half-open: `lower <= income < upper`, and `upper` is
/// `None` for the top bracket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxBracket {
    pub lower: Decimal,
    pub upper: Option<Decimal>,
    pub factor: Decimal,
    pub deduction: Decimal,
}

impl TaxBracket {
    pub const fn new(
        lower: Decimal,
        upper: Option<Decimal>,
        factor: Decimal,
        deduction: Decimal,
    ) -> Self {
        Self {
            lower,
            upper,
            factor,
            deduction,
        }
    }

    /// Returns `true` when `income` falls in `[lower, upper)`.
    pub fn contains(
        &self,
        income: Decimal,
    ) -> bool {
        income >= self.lower && self.upper.is_none_or(|upper| income < upper)
    }

    /// Evaluates the bracket formula without checking membership.
    pub fn tax_for(
        &self,
        income: Decimal,
    ) -> Decimal {
        income * self.factor - self.deduction
    }

    /// Amount that can be added to `income` before reaching `upper`.
    ///
    /// `None` means the bracket is unbounded.
    pub fn headroom(
        &self,
        income: Decimal,
    ) -> Option<Decimal> {
        self.upper.map(|upper| upper - income)
    }

    pub fn is_unbounded(&self) -> bool {
        self.upper.is_none()
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;

    fn second_bracket() -> TaxBracket {
        TaxBracket::new(
            dec!(10901628),
            Some(dec!(24225840)),
            dec!(0.040),
            dec!(436065.12),
        )
    }

    #[test]
    fn contains_includes_lower_bound() {
        assert!(second_bracket().contains(dec!(10901628)));
    }

    #[test]
    fn contains_excludes_upper_bound() {
        assert!(!second_bracket().contains(dec!(24225840)));
        assert!(second_bracket().contains(dec!(24225839.99)));
    }

    #[test]
    fn contains_rejects_income_below_lower() {
        assert!(!second_bracket().contains(dec!(10901627.99)));
    }

    #[test]
    fn unbounded_bracket_contains_large_income() {
        let top = TaxBracket::new(dec!(250333680), None, dec!(0.400), dec!(31348236.96));

        assert!(top.contains(dec!(999999999999)));
        assert!(top.is_unbounded());
        assert_eq!(top.headroom(dec!(300000000)), None);
    }

    #[test]
    fn tax_for_applies_factor_and_deduction() {
        let result = second_bracket().tax_for(dec!(20000000));

        // 20,000,000 × 0.04 − 436,065.12
        assert_eq!(result, dec!(363934.88));
    }

    #[test]
    fn headroom_measures_distance_to_upper() {
        assert_eq!(second_bracket().headroom(dec!(20000000)), Some(dec!(4225840)));
    }
}
