//! Seeding entry-point: builds or reuses one load-test scenario's dump.

use color_eyre::eyre::Result;
use ortho_config::OrthoConfig;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

use seeder::{SeederSettings, run_scenario};

/// Application bootstrap.
#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;

    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let settings = SeederSettings::load_from_iter(std::env::args_os())?;
    let outcome = run_scenario(&settings).await?;
    info!(
        scenario = %outcome.scenario,
        path = %outcome.dump_path,
        reused = outcome.reused,
        "seed data ready"
    );
    Ok(())
}
