//! Named scenarios and the seeder that builds and persists them.
//!
//! A scenario couples a dump-safe name with a [`SeedsPlan`]. Building a
//! scenario runs the plan through [`SeedsBuilder`] and, only when every call
//! succeeded, replaces the scenario's dump. Load tests later read the dump
//! back instead of talking to the gateway.

mod presets;

use thiserror::Error;
use tracing::{info, warn};

pub use presets::{
    ExistingUserGetOperations, ExistingUserIssueVirtualCard, PRESET_USER_COUNT,
    builtin_scenarios, find_builtin_scenario,
};

use crate::builder::{SeedBuildError, SeedsBuilder};
use crate::dumps::SeedDumps;
use crate::error::DumpError;
use crate::plan::SeedsPlan;
use crate::result::SeedsResult;

/// A named, plan-backed seeding scenario.
pub trait SeedsScenario: Send + Sync {
    /// Returns the scenario name, also used as the dump file stem.
    fn scenario(&self) -> &str;

    /// Returns the plan describing the data to seed.
    fn plan(&self) -> SeedsPlan;
}

/// Errors raised while building or loading a scenario.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ScenarioError {
    /// Seeding failed; nothing was persisted.
    #[error("failed to build scenario '{scenario}': {source}")]
    Build {
        /// Name of the scenario being built.
        scenario: String,
        /// The build failure.
        source: SeedBuildError,
    },
    /// Saving or loading the dump failed.
    #[error(transparent)]
    Dump(#[from] DumpError),
}

/// Builds scenarios and persists their results.
#[derive(Clone)]
pub struct ScenarioSeeder {
    builder: SeedsBuilder,
    dumps: SeedDumps,
}

impl ScenarioSeeder {
    /// Creates a seeder from a builder and a dump store.
    #[must_use]
    pub const fn new(builder: SeedsBuilder, dumps: SeedDumps) -> Self {
        Self { builder, dumps }
    }

    /// Returns the dump store.
    #[must_use]
    pub const fn dumps(&self) -> &SeedDumps {
        &self.dumps
    }

    /// Builds `scenario` and replaces its dump.
    ///
    /// The scenario name is validated before any gateway call is made.
    ///
    /// # Errors
    ///
    /// Returns [`ScenarioError::Build`] when seeding fails, leaving any
    /// previous dump untouched, and [`ScenarioError::Dump`] when the name is
    /// unusable or the dump cannot be written.
    pub async fn build<S>(&self, scenario: &S) -> Result<SeedsResult, ScenarioError>
    where
        S: SeedsScenario + ?Sized,
    {
        let name = scenario.scenario();
        let path = self.dumps.dump_path(name)?;
        info!(scenario = name, path = %path, "seeding scenario");

        let result = self
            .builder
            .build(&scenario.plan())
            .await
            .map_err(|source| {
                warn!(scenario = name, error = %source, "scenario seeding failed");
                ScenarioError::Build {
                    scenario: name.to_owned(),
                    source,
                }
            })?;

        let saved = self.dumps.save(&result, name)?;
        info!(scenario = name, path = %saved, users = result.users.len(), "scenario seeded");
        Ok(result)
    }

    /// Loads the persisted result of `scenario`.
    ///
    /// # Errors
    ///
    /// Returns [`ScenarioError::Dump`] wrapping [`DumpError::NotFound`] when
    /// the scenario was never built, or another [`DumpError`] when the dump
    /// is unreadable.
    pub fn load<S>(&self, scenario: &S) -> Result<SeedsResult, ScenarioError>
    where
        S: SeedsScenario + ?Sized,
    {
        Ok(self.dumps.load(scenario.scenario())?)
    }

    /// Loads the existing dump when `reuse` is set and one exists, otherwise
    /// builds the scenario.
    ///
    /// # Errors
    ///
    /// Returns the errors of [`Self::load`] or [`Self::build`].
    pub async fn build_or_load<S>(
        &self,
        scenario: &S,
        reuse: bool,
    ) -> Result<SeedsResult, ScenarioError>
    where
        S: SeedsScenario + ?Sized,
    {
        if reuse && self.dumps.exists(scenario.scenario()) {
            info!(scenario = scenario.scenario(), "reusing existing seed dump");
            return self.load(scenario);
        }
        self.build(scenario).await
    }
}

#[cfg(test)]
mod tests {
    //! Unit tests for scenario seeding orchestration.

    use std::sync::Arc;

    use rstest::rstest;

    use super::*;
    use crate::in_memory_gateway::{CallKind, InMemoryGateway};
    use crate::plan::SeedUsersPlan;
    use crate::ports::SeedGateways;

    struct Named(&'static str);

    impl SeedsScenario for Named {
        fn scenario(&self) -> &str {
            self.0
        }

        fn plan(&self) -> SeedsPlan {
            SeedsPlan::new(SeedUsersPlan {
                count: 1,
                ..SeedUsersPlan::default()
            })
        }
    }

    #[rstest]
    #[tokio::test]
    async fn invalid_names_fail_before_any_gateway_call() {
        let gateway = Arc::new(InMemoryGateway::new());
        let seeder = ScenarioSeeder::new(
            SeedsBuilder::new(SeedGateways::from_shared(&gateway)),
            SeedDumps::new("never-created"),
        );

        let error = seeder
            .build(&Named("../escape"))
            .await
            .expect_err("name is rejected");

        assert!(matches!(
            error,
            ScenarioError::Dump(DumpError::InvalidScenarioName { .. })
        ));
        assert_eq!(gateway.call_count(CallKind::CreateUser), 0);
    }

    #[test]
    fn build_error_names_the_scenario() {
        let error = ScenarioError::Build {
            scenario: "smoke".to_owned(),
            source: SeedBuildError::Gateway {
                step: crate::builder::SeedStep::CreateUser,
                source: crate::ports::GatewayError::timeout("30s"),
            },
        };

        assert_eq!(
            error.to_string(),
            "failed to build scenario 'smoke': failed to create user: gateway request timed out: 30s"
        );
    }
}
