//! The bracket schedule and its validation.
//!
//! A [`BracketTable`] is an ordered, immutable list of [`TaxBracket`]s that
//! covers every non-negative income exactly once. Tables built through
//! [`BracketTable::new`] are checked for:
//!
//! - at least one bracket, the first starting at zero
//! - contiguous, non-empty `[lower, upper)` ranges
//! - only the last bracket unbounded
//! - factors in `[0, 1]` and non-decreasing
//! - non-negative deductions
//! - continuity of the tax formula at every boundary (within one cent)
//!
//! The built-in 2025 Impuesto Global Complementario schedule is available as
//! [`BracketTable::igc_2025`].

use std::sync::LazyLock;

use rust_decimal::Decimal;
use serde::Serialize;
use thiserror::Error;

use super::TaxBracket;

/// Largest tolerated jump in the tax formula at a bracket boundary.
const CONTINUITY_TOLERANCE: Decimal = Decimal::from_parts(1, 0, 0, false, 2);

/// Annual taxable income tiers for the 2025 Impuesto Global Complementario (CLP).
const IGC_2025_BRACKETS: [TaxBracket; 8] = [
    TaxBracket::new(
        Decimal::ZERO,
        Some(Decimal::from_parts(10_901_628, 0, 0, false, 0)),
        Decimal::ZERO,
        Decimal::ZERO,
    ),
    TaxBracket::new(
        Decimal::from_parts(10_901_628, 0, 0, false, 0),
        Some(Decimal::from_parts(24_225_840, 0, 0, false, 0)),
        Decimal::from_parts(40, 0, 0, false, 3),
        Decimal::from_parts(43_606_512, 0, 0, false, 2),
    ),
    TaxBracket::new(
        Decimal::from_parts(24_225_840, 0, 0, false, 0),
        Some(Decimal::from_parts(40_376_400, 0, 0, false, 0)),
        Decimal::from_parts(80, 0, 0, false, 3),
        Decimal::from_parts(140_509_872, 0, 0, false, 2),
    ),
    TaxBracket::new(
        Decimal::from_parts(40_376_400, 0, 0, false, 0),
        Some(Decimal::from_parts(56_526_960, 0, 0, false, 0)),
        Decimal::from_parts(135, 0, 0, false, 3),
        Decimal::from_parts(362_580_072, 0, 0, false, 2),
    ),
    TaxBracket::new(
        Decimal::from_parts(56_526_960, 0, 0, false, 0),
        Some(Decimal::from_parts(72_677_520, 0, 0, false, 0)),
        Decimal::from_parts(230, 0, 0, false, 3),
        Decimal::from_parts(899_586_192, 0, 0, false, 2),
    ),
    TaxBracket::new(
        Decimal::from_parts(72_677_520, 0, 0, false, 0),
        Some(Decimal::from_parts(96_903_360, 0, 0, false, 0)),
        Decimal::from_parts(304, 0, 0, false, 3),
        Decimal::from_parts(1_437_399_840, 0, 0, false, 2),
    ),
    TaxBracket::new(
        Decimal::from_parts(96_903_360, 0, 0, false, 0),
        Some(Decimal::from_parts(250_333_680, 0, 0, false, 0)),
        Decimal::from_parts(350, 0, 0, false, 3),
        Decimal::from_parts(1_883_155_296, 0, 0, false, 2),
    ),
    TaxBracket::new(
        Decimal::from_parts(250_333_680, 0, 0, false, 0),
        None,
        Decimal::from_parts(400, 0, 0, false, 3),
        Decimal::from_parts(3_134_823_696, 0, 0, false, 2),
    ),
];

static IGC_2025: LazyLock<BracketTable> = LazyLock::new(|| {
    let brackets = IGC_2025_BRACKETS.to_vec();
    debug_assert_eq!(validate(&brackets), Ok(()));
    BracketTable { brackets }
});

/// Reasons a bracket list is rejected. Bracket numbers are 1-based.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum BracketTableError {
    #[error("bracket table is empty")]
    Empty,

    #[error("first bracket must start at 0, got {0}")]
    FirstLowerNotZero(Decimal),

    #[error("bracket {bracket} starts at {found}, expected {expected}")]
    NotContiguous {
        bracket: usize,
        expected: Decimal,
        found: Decimal,
    },

    #[error("bracket {0} is unbounded but is not the last bracket")]
    UnboundedBeforeLast(usize),

    #[error("last bracket must be unbounded")]
    BoundedLast,

    #[error("bracket {0} has an empty income range")]
    EmptyRange(usize),

    #[error("bracket {bracket} factor must be between 0 and 1, got {factor}")]
    FactorOutOfRange { bracket: usize, factor: Decimal },

    #[error("bracket {0} factor is lower than the previous bracket's")]
    DecreasingFactor(usize),

    #[error("bracket {bracket} deduction must be non-negative, got {deduction}")]
    NegativeDeduction { bracket: usize, deduction: Decimal },

    #[error("tax jumps from {below} to {above} at the start of bracket {bracket}")]
    Discontinuous {
        bracket: usize,
        below: Decimal,
        above: Decimal,
    },
}

/// Ordered, validated tax schedule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BracketTable {
    brackets: Vec<TaxBracket>,
}

impl BracketTable {
    /// Builds a table after checking every schedule invariant.
    ///
    /// # Errors
    ///
    /// Returns the first [`BracketTableError`] found, scanning brackets in
    /// ascending order.
    pub fn new(brackets: Vec<TaxBracket>) -> Result<Self, BracketTableError> {
        validate(&brackets)?;
        Ok(Self { brackets })
    }

    /// The 8-tier 2025 Impuesto Global Complementario schedule.
    pub fn igc_2025() -> &'static BracketTable {
        &IGC_2025
    }

    /// Skips validation so lookups can be exercised against broken tables.
    #[cfg(test)]
    pub(crate) fn unchecked(brackets: Vec<TaxBracket>) -> Self {
        Self { brackets }
    }

    pub fn brackets(&self) -> &[TaxBracket] {
        &self.brackets
    }

    pub fn iter(&self) -> std::slice::Iter<'_, TaxBracket> {
        self.brackets.iter()
    }

    pub fn len(&self) -> usize {
        self.brackets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.brackets.is_empty()
    }

    /// The highest bracket, used as the lookup fallback.
    pub fn top_bracket(&self) -> &TaxBracket {
        // Validated tables are never empty.
        &self.brackets[self.brackets.len() - 1]
    }
}

impl<'a> IntoIterator for &'a BracketTable {
    type Item = &'a TaxBracket;
    type IntoIter = std::slice::Iter<'a, TaxBracket>;

    fn into_iter(self) -> Self::IntoIter {
        self.brackets.iter()
    }
}

fn validate(brackets: &[TaxBracket]) -> Result<(), BracketTableError> {
    let first = brackets.first().ok_or(BracketTableError::Empty)?;
    if !first.lower.is_zero() {
        return Err(BracketTableError::FirstLowerNotZero(first.lower));
    }

    let last_index = brackets.len() - 1;
    for (i, bracket) in brackets.iter().enumerate() {
        let number = i + 1;

        if bracket.factor < Decimal::ZERO || bracket.factor > Decimal::ONE {
            return Err(BracketTableError::FactorOutOfRange {
                bracket: number,
                factor: bracket.factor,
            });
        }
        if bracket.deduction < Decimal::ZERO {
            return Err(BracketTableError::NegativeDeduction {
                bracket: number,
                deduction: bracket.deduction,
            });
        }

        match bracket.upper {
            None if i != last_index => return Err(BracketTableError::UnboundedBeforeLast(number)),
            Some(_) if i == last_index => return Err(BracketTableError::BoundedLast),
            Some(upper) if upper <= bracket.lower => {
                return Err(BracketTableError::EmptyRange(number));
            }
            _ => {}
        }

        if i == 0 {
            continue;
        }
        let previous = &brackets[i - 1];

        let expected = previous.upper.unwrap_or(Decimal::MAX);
        if bracket.lower != expected {
            return Err(BracketTableError::NotContiguous {
                bracket: number,
                expected,
                found: bracket.lower,
            });
        }
        if bracket.factor < previous.factor {
            return Err(BracketTableError::DecreasingFactor(number));
        }

        let below = previous.tax_for(bracket.lower);
        let above = bracket.tax_for(bracket.lower);
        if (above - below).abs() > CONTINUITY_TOLERANCE {
            return Err(BracketTableError::Discontinuous {
                bracket: number,
                below,
                above,
            });
        }
    }

    Ok(())
}
