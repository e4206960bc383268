use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::calculations::common::yield_percent;

/// One sample of the extra-income curve.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct YieldCurvePoint {
    /// Portion of the maximum extra amount, from 0 to 1 in steps of 0.1.
    pub extra_fraction: Decimal,
    pub gross_extra: Decimal,
    pub incremental_tax: Decimal,
    pub net_extra: Decimal,
}

impl YieldCurvePoint {
    /// `extra_fraction` expressed as a percentage (0 to 100).
    pub fn percent(&self) -> Decimal {
        self.extra_fraction * Decimal::ONE_HUNDRED
    }

    pub fn yield_percent(&self) -> Decimal {
        yield_percent(self.net_extra, self.gross_extra)
    }
}
