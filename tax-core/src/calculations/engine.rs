//! Bracket lookup and tax evaluation.
//!
//! Tax owed on an income is `income * factor - deduction` for the bracket
//! whose half-open range `[lower, upper)` contains it. An income sitting
//! exactly on a boundary belongs to the higher bracket.
//!
//! The incremental tax of an extra amount is the difference of two total-tax
//! evaluations, so it is correct even when the extra amount spans several
//! brackets.
//!
//! # Example
//!
//! ```
//! use rust_decimal_macros::dec;
//! use tax_core::calculations::TaxEngine;
//!
//! let engine = TaxEngine::igc_2025();
//!
//! assert_eq!(engine.total_tax(dec!(100000000)).unwrap(), dec!(16168447.04));
//! assert_eq!(engine.bracket_index_of(dec!(100000000)).unwrap(), 7);
//! ```

use rust_decimal::Decimal;
use thiserror::Error;
use tracing::warn;

use super::common::ensure_non_negative;
use crate::models::{BracketTable, TaxBracket};

/// Errors raised for inputs the schedule cannot be evaluated on.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TaxEngineError {
    /// An amount was negative.
    #[error("invalid input: {field} must be non-negative, got {value}")]
    NegativeAmount { field: &'static str, value: Decimal },

    /// An amount derived from the inputs does not fit in a [`Decimal`].
    #[error("invalid input: {field} is too large to evaluate")]
    AmountOutOfRange { field: &'static str },
}

/// Evaluates a [`BracketTable`].
#[derive(Debug, Clone, Copy)]
pub struct TaxEngine<'a> {
    table: &'a BracketTable,
}

impl TaxEngine<'static> {
    /// Engine over the built-in 2025 schedule.
    pub fn igc_2025() -> Self {
        Self::new(BracketTable::igc_2025())
    }
}

impl Default for TaxEngine<'static> {
    fn default() -> Self {
        Self::igc_2025()
    }
}

impl<'a> TaxEngine<'a> {
    pub fn new(table: &'a BracketTable) -> Self {
        Self { table }
    }

    pub fn table(&self) -> &'a BracketTable {
        self.table
    }

    /// Total tax owed on `income`.
    ///
    /// # Errors
    ///
    /// Returns [`TaxEngineError::NegativeAmount`] for a negative income.
    pub fn total_tax(
        &self,
        income: Decimal,
    ) -> Result<Decimal, TaxEngineError> {
        ensure_non_negative("income", income)?;
        Ok(self.lookup(income).tax_for(income))
    }

    /// Additional tax owed when `extra_income` is added to `base_income`.
    ///
    /// # Errors
    ///
    /// Returns [`TaxEngineError`] if either amount is negative or their sum
    /// overflows.
    pub fn incremental_tax(
        &self,
        base_income: Decimal,
        extra_income: Decimal,
    ) -> Result<Decimal, TaxEngineError> {
        ensure_non_negative("base income", base_income)?;
        ensure_non_negative("extra income", extra_income)?;
        let combined = combined_income(base_income, extra_income)?;

        Ok(self.total_tax(combined)? - self.total_tax(base_income)?)
    }

    /// The bracket containing `income`.
    ///
    /// Falls back to the top bracket if no range matches.
    pub fn bracket_of(
        &self,
        income: Decimal,
    ) -> Result<&'a TaxBracket, TaxEngineError> {
        ensure_non_negative("income", income)?;
        Ok(self.lookup(income))
    }

    /// 1-based number of the bracket containing `income`.
    ///
    /// Returns the table length if no range matches.
    pub fn bracket_index_of(
        &self,
        income: Decimal,
    ) -> Result<usize, TaxEngineError> {
        ensure_non_negative("income", income)?;
        Ok(self
            .table
            .iter()
            .position(|bracket| bracket.contains(income))
            .map_or(self.table.len(), |i| i + 1))
    }

    fn lookup(
        &self,
        income: Decimal,
    ) -> &'a TaxBracket {
        self.table
            .iter()
            .find(|bracket| bracket.contains(income))
            .unwrap_or_else(|| {
                warn!(%income, "no bracket matched; using top bracket");
                self.table.top_bracket()
            })
    }
}

/// `base + extra`, failing instead of overflowing.
pub(crate) fn combined_income(
    base_income: Decimal,
    extra_income: Decimal,
) -> Result<Decimal, TaxEngineError> {
    base_income
        .checked_add(extra_income)
        .ok_or(TaxEngineError::AmountOutOfRange {
            field: "base income plus extra income",
        })
}
