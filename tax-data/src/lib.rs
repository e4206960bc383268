//! External data collaborators for the tax planner: live exchange rates,
//! batch request files and curve exports.

pub mod curve_export;
pub mod exchange_rate;
pub mod factory;
pub mod loader;
pub mod mindicador;

pub use curve_export::write_curve;
pub use exchange_rate::{
    ExchangeRate, ExchangeRateProvider, ExchangeRateUnavailable, FixedRateProvider,
};
pub use factory::{
    FixedRateFactory, MindicadorFactory, ProviderFactory, ProviderRegistry, RateSourceConfig,
};
pub use loader::{ScenarioLoaderError, ScenarioRequestLoader, ScenarioRequestRecord};
pub use mindicador::{MindicadorProvider, parse_indicator_response};
