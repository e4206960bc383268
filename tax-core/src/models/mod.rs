mod bracket_table;
mod scenario;
mod scenario_request;
mod tax_bracket;
mod yield_curve_point;

pub use bracket_table::{BracketTable, BracketTableError};
pub use scenario::{BracketPlacement, Scenario, ScenarioSet};
pub use scenario_request::{MONTHS_PER_YEAR, ScenarioRequest};
pub use tax_bracket::TaxBracket;
pub use yield_curve_point::YieldCurvePoint;
