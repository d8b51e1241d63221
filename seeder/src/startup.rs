//! Startup wiring for one seeding run.
//!
//! Resolves the configured scenario, picks the gateway adapter, then builds
//! (or reuses) the scenario's dump.

use std::fmt;
use std::sync::Arc;

use camino::Utf8PathBuf;
use reqwest::Url;
use seed_data::{
    CatalogueError, CatalogueScenario, InMemoryGateway, ScenarioCatalogue, ScenarioError,
    ScenarioSeeder, SeedCounts, SeedDumps, SeedGateways, SeedsBuilder, SeedsPlan, SeedsScenario,
    find_builtin_scenario,
};
use thiserror::Error;
use tracing::info;

use crate::config::SeederSettings;
use crate::outbound::gateway::GatewayHttpClient;

/// Errors returned while wiring or executing a seeding run.
#[derive(Debug, Error)]
pub enum StartupError {
    /// The configured gateway URL does not parse.
    #[error("invalid gateway url '{url}': {message}")]
    InvalidGatewayUrl {
        /// The rejected value.
        url: String,
        /// Parser error description.
        message: String,
    },
    /// The HTTP client could not be constructed.
    #[error("failed to build gateway HTTP client: {0}")]
    HttpClient(#[from] reqwest::Error),
    /// The scenario catalogue could not be loaded.
    #[error("scenario catalogue error: {0}")]
    Catalogue(#[from] CatalogueError),
    /// Neither the catalogue nor the built-in scenarios know the name.
    #[error("unknown scenario '{name}'")]
    UnknownScenario {
        /// The requested scenario name.
        name: String,
    },
    /// Building or loading the scenario failed.
    #[error(transparent)]
    Scenario(#[from] ScenarioError),
}

/// A scenario found in the catalogue or among the built-in presets.
#[derive(Clone)]
pub enum ResolvedScenario {
    /// Loaded from the configured catalogue file.
    Catalogue(CatalogueScenario),
    /// Compiled into the seed-data crate.
    Builtin(&'static dyn SeedsScenario),
}

impl ResolvedScenario {
    /// Returns where the scenario was found, for logging.
    #[must_use]
    pub const fn origin(&self) -> &'static str {
        match self {
            Self::Catalogue(_) => "catalogue",
            Self::Builtin(_) => "builtin",
        }
    }
}

impl fmt::Debug for ResolvedScenario {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResolvedScenario")
            .field("origin", &self.origin())
            .field("scenario", &self.scenario())
            .finish()
    }
}

impl SeedsScenario for ResolvedScenario {
    fn scenario(&self) -> &str {
        match self {
            Self::Catalogue(scenario) => scenario.scenario(),
            Self::Builtin(scenario) => scenario.scenario(),
        }
    }

    fn plan(&self) -> SeedsPlan {
        match self {
            Self::Catalogue(scenario) => scenario.plan(),
            Self::Builtin(scenario) => scenario.plan(),
        }
    }
}

/// Summary of a finished seeding run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeedRunOutcome {
    /// Name of the seeded scenario.
    pub scenario: String,
    /// Location of the scenario's dump.
    pub dump_path: Utf8PathBuf,
    /// Entity totals in the seeded or reused result.
    pub counts: SeedCounts,
    /// Whether an existing dump was reused instead of seeding.
    pub reused: bool,
}

/// Find the configured scenario, searching the catalogue before the presets.
///
/// # Errors
///
/// Returns [`StartupError::Catalogue`] when a configured catalogue cannot be
/// loaded and [`StartupError::UnknownScenario`] when no source knows the
/// name.
pub fn resolve_scenario(settings: &SeederSettings) -> Result<ResolvedScenario, StartupError> {
    let name = settings.scenario();

    if let Some(path) = settings.catalogue_path() {
        let catalogue = ScenarioCatalogue::from_file(path)?;
        if let Ok(scenario) = catalogue.find_scenario(name) {
            return Ok(ResolvedScenario::Catalogue(scenario.clone()));
        }
    }

    find_builtin_scenario(name)
        .map(ResolvedScenario::Builtin)
        .ok_or_else(|| StartupError::UnknownScenario {
            name: name.to_owned(),
        })
}

/// Wire the gateway adapters: in-memory for dry runs, HTTP otherwise.
///
/// # Errors
///
/// Returns [`StartupError::InvalidGatewayUrl`] or
/// [`StartupError::HttpClient`] when the HTTP adapter cannot be built.
pub fn build_gateways(settings: &SeederSettings) -> Result<SeedGateways, StartupError> {
    if settings.dry_run {
        info!("dry run: seeding against the in-memory gateway");
        return Ok(SeedGateways::from_shared(&Arc::new(InMemoryGateway::new())));
    }

    let raw_url = settings.gateway_url();
    let base_url = Url::parse(raw_url).map_err(|error| StartupError::InvalidGatewayUrl {
        url: raw_url.to_owned(),
        message: error.to_string(),
    })?;
    let client = GatewayHttpClient::new(base_url, settings.timeout())?;
    info!(gateway_url = %client.base_url(), "seeding against the HTTP gateway");
    Ok(SeedGateways::from_shared(&Arc::new(client)))
}

/// Seed the configured scenario and persist its dump.
///
/// With `reuse_dump` set and a dump already present, the dump is loaded and
/// no gateway call is made.
///
/// # Examples
///
/// ```rust,no_run
/// use seeder::{SeederSettings, run_scenario};
///
/// # async fn run() -> Result<(), Box<dyn std::error::Error>> {
/// let settings = SeederSettings {
///     scenario: Some("existing_user_issue_virtual_card".to_owned()),
///     dumps_dir: Some("dumps".into()),
///     gateway_url: None,
///     timeout_seconds: None,
///     concurrency: Some(8),
///     catalogue_path: None,
///     reuse_dump: false,
///     dry_run: true,
/// };
/// let outcome = run_scenario(&settings).await?;
/// assert_eq!(outcome.counts.users, 300);
/// # Ok(())
/// # }
/// ```
///
/// # Errors
///
/// Returns [`StartupError`] when wiring fails or the scenario cannot be
/// built, loaded or saved.
pub async fn run_scenario(settings: &SeederSettings) -> Result<SeedRunOutcome, StartupError> {
    let scenario = resolve_scenario(settings)?;
    let gateways = build_gateways(settings)?;
    let builder = SeedsBuilder::new(gateways).with_concurrency(settings.concurrency());
    let concurrency = builder.concurrency();
    let seeder = ScenarioSeeder::new(builder, SeedDumps::new(settings.dumps_dir()));

    let name = scenario.scenario();
    let reused = settings.reuse_dump && seeder.dumps().exists(name);
    info!(
        scenario = name,
        origin = scenario.origin(),
        concurrency = concurrency.get(),
        reuse_dump = settings.reuse_dump,
        "seeding run started"
    );

    let result = seeder.build_or_load(&scenario, settings.reuse_dump).await?;
    let dump_path = seeder.dumps().dump_path(name).map_err(ScenarioError::from)?;
    let counts = result.counts();
    info!(
        scenario = name,
        path = %dump_path,
        user_count = counts.users,
        account_count = counts.accounts,
        card_count = counts.cards,
        operation_count = counts.operations,
        reused,
        "seeding run finished"
    );

    Ok(SeedRunOutcome {
        scenario: name.to_owned(),
        dump_path,
        counts,
        reused,
    })
}

#[cfg(test)]
mod tests {
    //! Unit tests for scenario resolution and gateway wiring.

    use rstest::{fixture, rstest};

    use super::*;

    #[fixture]
    fn settings() -> SeederSettings {
        SeederSettings {
            scenario: None,
            dumps_dir: None,
            gateway_url: None,
            timeout_seconds: None,
            concurrency: None,
            catalogue_path: None,
            reuse_dump: false,
            dry_run: false,
        }
    }

    #[rstest]
    fn default_scenario_resolves_to_builtin(settings: SeederSettings) {
        let scenario = resolve_scenario(&settings).expect("builtin scenario");

        assert_eq!(scenario.origin(), "builtin");
        assert_eq!(scenario.scenario(), "existing_user_get_operations");
    }

    #[rstest]
    fn unknown_scenarios_are_reported(mut settings: SeederSettings) {
        settings.scenario = Some("missing".to_owned());

        let error = resolve_scenario(&settings).expect_err("scenario is unknown");
        assert!(matches!(
            error,
            StartupError::UnknownScenario { ref name } if name == "missing"
        ));
    }

    #[rstest]
    fn unreadable_catalogue_fails_resolution(mut settings: SeederSettings) {
        settings.catalogue_path = Some("target/no-such-dir/catalogue.json".into());

        let error = resolve_scenario(&settings).expect_err("catalogue is missing");
        assert!(matches!(error, StartupError::Catalogue(CatalogueError::IoError { .. })));
    }

    #[rstest]
    fn invalid_gateway_url_is_rejected(mut settings: SeederSettings) {
        settings.gateway_url = Some("not a url".to_owned());

        let error = build_gateways(&settings).err().expect("url is invalid");
        assert!(matches!(error, StartupError::InvalidGatewayUrl { .. }));
    }

    #[rstest]
    fn http_gateway_builds_for_valid_url(settings: SeederSettings) {
        assert!(build_gateways(&settings).is_ok());
    }
}
