pub mod calculations;
pub mod models;

pub use calculations::{ScenarioCalculator, TaxEngine, TaxEngineError, YieldCurveSampler};
pub use models::*;
