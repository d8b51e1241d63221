//! Seeding application for banking gateway load tests.
//!
//! Wires [`seed_data`] to a real gateway: settings come from OrthoConfig,
//! the [`outbound::gateway::GatewayHttpClient`] adapter implements every
//! seeding port over HTTP, and [`run_scenario`] builds or reuses one
//! scenario's dump.

mod config;
pub mod outbound;
mod startup;

pub use config::SeederSettings;
pub use startup::{
    ResolvedScenario, SeedRunOutcome, StartupError, build_gateways, resolve_scenario,
    run_scenario,
};
