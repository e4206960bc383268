use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::TaxBracket;

/// Where an income lands in the schedule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BracketPlacement {
    pub income: Decimal,
    pub bracket: TaxBracket,
    /// 1-based bracket number.
    pub index: usize,
}

/// Outcome of adding `extra_amount` on top of the base income.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Scenario {
    pub extra_amount: Decimal,
    pub incremental_tax: Decimal,
    /// `extra_amount - incremental_tax`.
    pub net_benefit: Decimal,
    /// Share of `extra_amount` kept after tax, in percent. Zero when nothing
    /// is added.
    pub yield_percent: Decimal,
    /// Placement of base income plus `extra_amount`.
    pub resulting: BracketPlacement,
}

impl Scenario {
    pub fn resulting_income(&self) -> Decimal {
        self.resulting.income
    }

    pub fn resulting_bracket_index(&self) -> usize {
        self.resulting.index
    }
}

/// Full and bracket-bounded exercise of the same extra income.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScenarioSet {
    pub base: BracketPlacement,
    /// All of the available extra income is added.
    pub full: Scenario,
    /// Only as much as fits before the base income's bracket ends.
    pub optimal: Scenario,
}

impl ScenarioSet {
    /// Whether exercising everything pushes income into a higher bracket.
    pub fn full_crosses_bracket(&self) -> bool {
        self.full.resulting.index > self.base.index
    }
}
