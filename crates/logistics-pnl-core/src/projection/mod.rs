//! Single-year P&L projection for a 3PL warehouse operator.
//!
//! A [`baseline::BaselineStatement`] (prior-period actuals) and a
//! [`params::ScenarioParameters`] lever set go in; a fresh
//! [`engine::ProjectedStatement`] comes out. Calibration constants live in
//! [`drivers::DriverConfig`].

pub mod baseline;
pub mod drivers;
pub mod engine;
pub mod params;

pub use baseline::BaselineStatement;
pub use drivers::{CovenantThresholds, DriverConfig, ValuationTiers};
pub use engine::{
    project, project_with_drivers, run_projection, DriverBreakdown, ProjectedStatement,
};
pub use params::ScenarioParameters;
