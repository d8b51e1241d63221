//! Seeder configuration loaded via OrthoConfig.

use std::num::NonZeroUsize;
use std::time::Duration;

use camino::{Utf8Path, Utf8PathBuf};
use ortho_config::OrthoConfig;
use serde::Deserialize;

const DEFAULT_SCENARIO: &str = "existing_user_get_operations";
const DEFAULT_DUMPS_DIR: &str = "./dumps";
const DEFAULT_GATEWAY_URL: &str = "http://localhost:8003";
const DEFAULT_TIMEOUT_SECONDS: u64 = 30;

/// Configuration values controlling one seeding run.
///
/// Values come from `SEEDS_*` environment variables, configuration files and
/// command-line flags.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "SEEDS")]
pub struct SeederSettings {
    /// Scenario to build or load.
    pub scenario: Option<String>,
    /// Directory holding one dump per scenario.
    pub dumps_dir: Option<Utf8PathBuf>,
    /// Base URL of the HTTP gateway.
    pub gateway_url: Option<String>,
    /// Per-request timeout in seconds.
    pub timeout_seconds: Option<u64>,
    /// Number of users seeded concurrently.
    pub concurrency: Option<usize>,
    /// Optional scenario catalogue searched before the built-in scenarios.
    pub catalogue_path: Option<Utf8PathBuf>,
    /// Reuse an existing dump instead of seeding again.
    #[ortho_config(default = false)]
    pub reuse_dump: bool,
    /// Seed against the in-memory gateway instead of HTTP.
    #[ortho_config(default = false)]
    pub dry_run: bool,
}

impl SeederSettings {
    /// Return the configured scenario name, falling back to the default.
    #[must_use]
    pub fn scenario(&self) -> &str {
        self.scenario.as_deref().unwrap_or(DEFAULT_SCENARIO)
    }

    /// Return the configured dumps directory, falling back to the default.
    #[must_use]
    pub fn dumps_dir(&self) -> Utf8PathBuf {
        self.dumps_dir
            .clone()
            .unwrap_or_else(|| Utf8PathBuf::from(DEFAULT_DUMPS_DIR))
    }

    /// Return the configured gateway base URL, falling back to the default.
    #[must_use]
    pub fn gateway_url(&self) -> &str {
        self.gateway_url.as_deref().unwrap_or(DEFAULT_GATEWAY_URL)
    }

    /// Return the per-request timeout; zero is raised to one second.
    #[must_use]
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(
            self.timeout_seconds
                .unwrap_or(DEFAULT_TIMEOUT_SECONDS)
                .max(1),
        )
    }

    /// Return the user-build pool size; zero and absent both mean one.
    #[must_use]
    pub fn concurrency(&self) -> NonZeroUsize {
        self.concurrency
            .and_then(NonZeroUsize::new)
            .unwrap_or(NonZeroUsize::MIN)
    }

    /// Return the catalogue path when one is configured.
    #[must_use]
    pub fn catalogue_path(&self) -> Option<&Utf8Path> {
        self.catalogue_path.as_deref()
    }
}

#[cfg(test)]
mod tests {
    //! Unit tests for seeder configuration parsing.

    use super::*;
    use std::ffi::OsString;

    use env_lock::lock_env;
    use rstest::rstest;

    const VARS: [&str; 8] = [
        "SEEDS_SCENARIO",
        "SEEDS_DUMPS_DIR",
        "SEEDS_GATEWAY_URL",
        "SEEDS_TIMEOUT_SECONDS",
        "SEEDS_CONCURRENCY",
        "SEEDS_CATALOGUE_PATH",
        "SEEDS_REUSE_DUMP",
        "SEEDS_DRY_RUN",
    ];

    fn load_from_empty_args() -> SeederSettings {
        SeederSettings::load_from_iter([OsString::from("seed-scenario")])
            .expect("config should load")
    }

    #[rstest]
    fn default_values_are_used_when_missing() {
        let _guard = lock_env(VARS.map(|name| (name, None::<String>)));

        let settings = load_from_empty_args();
        assert_eq!(settings.scenario(), DEFAULT_SCENARIO);
        assert_eq!(settings.dumps_dir(), Utf8PathBuf::from(DEFAULT_DUMPS_DIR));
        assert_eq!(settings.gateway_url(), DEFAULT_GATEWAY_URL);
        assert_eq!(settings.timeout(), Duration::from_secs(30));
        assert_eq!(settings.concurrency(), NonZeroUsize::MIN);
        assert!(settings.catalogue_path().is_none());
        assert!(!settings.reuse_dump);
        assert!(!settings.dry_run);
    }

    #[rstest]
    fn environment_overrides_are_respected() {
        let _guard = lock_env([
            ("SEEDS_SCENARIO", Some("nightly".to_owned())),
            ("SEEDS_DUMPS_DIR", Some("/tmp/seed-dumps".to_owned())),
            ("SEEDS_GATEWAY_URL", Some("http://gateway:9000".to_owned())),
            ("SEEDS_TIMEOUT_SECONDS", Some("5".to_owned())),
            ("SEEDS_CONCURRENCY", Some("8".to_owned())),
            ("SEEDS_CATALOGUE_PATH", Some("/etc/seeds/catalogue.json".to_owned())),
            ("SEEDS_REUSE_DUMP", Some("true".to_owned())),
            ("SEEDS_DRY_RUN", Some("true".to_owned())),
        ]);

        let settings = load_from_empty_args();
        assert_eq!(settings.scenario(), "nightly");
        assert_eq!(settings.dumps_dir(), Utf8PathBuf::from("/tmp/seed-dumps"));
        assert_eq!(settings.gateway_url(), "http://gateway:9000");
        assert_eq!(settings.timeout(), Duration::from_secs(5));
        assert_eq!(settings.concurrency().get(), 8);
        assert_eq!(
            settings.catalogue_path(),
            Some(Utf8Path::new("/etc/seeds/catalogue.json"))
        );
        assert!(settings.reuse_dump);
        assert!(settings.dry_run);
    }

    #[rstest]
    fn zero_values_are_clamped() {
        let _guard = lock_env([
            ("SEEDS_TIMEOUT_SECONDS", Some("0".to_owned())),
            ("SEEDS_CONCURRENCY", Some("0".to_owned())),
        ]);

        let settings = load_from_empty_args();
        assert_eq!(settings.timeout(), Duration::from_secs(1));
        assert_eq!(settings.concurrency(), NonZeroUsize::MIN);
    }
}
