//! Scenario catalogue types and JSON parsing.
//!
//! A catalogue lets operators define scenarios without recompiling: each
//! entry pairs a dump-safe name with a [`SeedsPlan`]. Catalogue entries
//! implement [`SeedsScenario`] and run through the same seeder as the
//! built-in presets.

use std::collections::HashSet;
use std::io;

use camino::Utf8Path;
use cap_std::{ambient_authority, fs::Dir};
use serde::Deserialize;

use crate::error::CatalogueError;
use crate::plan::SeedsPlan;
use crate::scenario::SeedsScenario;
use crate::validation::is_valid_scenario_name;

/// Current supported catalogue version.
const SUPPORTED_VERSION: u32 = 1;

/// A versioned set of named scenarios.
///
/// # Example
///
/// ```
/// use seed_data::{ScenarioCatalogue, SeedsScenario};
///
/// let json = r#"{
///     "version": 1,
///     "scenarios": [
///         {"name": "smoke", "plan": {"users": {"count": 2}}}
///     ]
/// }"#;
///
/// let catalogue = ScenarioCatalogue::from_json(json).expect("valid catalogue");
/// let scenario = catalogue.find_scenario("smoke").expect("scenario exists");
///
/// assert_eq!(scenario.plan().users.count, 2);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScenarioCatalogue {
    version: u32,
    scenarios: Vec<CatalogueScenario>,
}

impl ScenarioCatalogue {
    /// Parses a catalogue from a JSON string.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogueError`] if:
    /// - The JSON is malformed or a plan has unknown fields
    /// - The version is unsupported
    /// - The scenarios array is empty
    /// - A name is not dump-safe or appears twice
    pub fn from_json(json: &str) -> Result<Self, CatalogueError> {
        let raw: RawCatalogue =
            serde_json::from_str(json).map_err(|err| CatalogueError::ParseError {
                message: err.to_string(),
            })?;

        Self::from_raw(raw)
    }

    /// Loads a catalogue from a JSON file.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogueError`] if the file cannot be read or parsed.
    pub fn from_file(path: &Utf8Path) -> Result<Self, CatalogueError> {
        let contents = read_catalogue(path).map_err(|err| CatalogueError::IoError {
            path: path.to_path_buf(),
            message: err.to_string(),
        })?;

        Self::from_json(&contents)
    }

    fn from_raw(raw: RawCatalogue) -> Result<Self, CatalogueError> {
        if raw.version != SUPPORTED_VERSION {
            return Err(CatalogueError::UnsupportedVersion {
                expected: SUPPORTED_VERSION,
                actual: raw.version,
            });
        }
        if raw.scenarios.is_empty() {
            return Err(CatalogueError::EmptyScenarios);
        }

        let mut seen = HashSet::new();
        for (index, scenario) in raw.scenarios.iter().enumerate() {
            if !is_valid_scenario_name(&scenario.name) {
                return Err(CatalogueError::InvalidScenarioName {
                    index,
                    name: scenario.name.clone(),
                });
            }
            if !seen.insert(scenario.name.as_str()) {
                return Err(CatalogueError::DuplicateScenarioName {
                    name: scenario.name.clone(),
                });
            }
        }

        let scenarios = raw
            .scenarios
            .into_iter()
            .map(|scenario| CatalogueScenario {
                name: scenario.name,
                plan: scenario.plan,
            })
            .collect();

        Ok(Self {
            version: raw.version,
            scenarios,
        })
    }

    /// Returns the catalogue version.
    #[must_use]
    pub const fn version(&self) -> u32 {
        self.version
    }

    /// Returns all scenarios in declaration order.
    #[must_use]
    pub fn scenarios(&self) -> &[CatalogueScenario] {
        &self.scenarios
    }

    /// Finds a scenario by name.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogueError::ScenarioNotFound`] if no scenario with the
    /// given name exists.
    pub fn find_scenario(&self, name: &str) -> Result<&CatalogueScenario, CatalogueError> {
        self.scenarios
            .iter()
            .find(|scenario| scenario.name == name)
            .ok_or_else(|| CatalogueError::ScenarioNotFound {
                name: name.to_owned(),
            })
    }
}

/// A named plan loaded from a catalogue.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogueScenario {
    name: String,
    plan: SeedsPlan,
}

impl SeedsScenario for CatalogueScenario {
    fn scenario(&self) -> &str {
        &self.name
    }

    fn plan(&self) -> SeedsPlan {
        self.plan
    }
}

fn read_catalogue(path: &Utf8Path) -> io::Result<String> {
    let parent = path
        .parent()
        .filter(|parent| !parent.as_str().is_empty())
        .unwrap_or_else(|| Utf8Path::new("."));
    let file_name = path.file_name().ok_or_else(|| {
        io::Error::new(io::ErrorKind::InvalidInput, "catalogue path must be a file")
    })?;
    Dir::open_ambient_dir(parent, ambient_authority())?.read_to_string(file_name)
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawCatalogue {
    version: u32,
    scenarios: Vec<RawScenario>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawScenario {
    name: String,
    #[serde(default)]
    plan: SeedsPlan,
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    const VALID_JSON: &str = r#"{
        "version": 1,
        "scenarios": [
            {
                "name": "nightly",
                "plan": {
                    "users": {
                        "count": 50,
                        "credit_card_accounts": {
                            "count": 1,
                            "purchase_operations": {"count": 10}
                        }
                    }
                }
            },
            {"name": "users-only", "plan": {"users": {"count": 5}}}
        ]
    }"#;

    #[test]
    fn parses_valid_catalogue() {
        let catalogue = ScenarioCatalogue::from_json(VALID_JSON).expect("valid catalogue");

        assert_eq!(catalogue.version(), 1);
        assert_eq!(catalogue.scenarios().len(), 2);
    }

    #[test]
    fn finds_scenario_by_name() {
        let catalogue = ScenarioCatalogue::from_json(VALID_JSON).expect("valid catalogue");
        let scenario = catalogue.find_scenario("nightly").expect("scenario found");

        assert_eq!(scenario.scenario(), "nightly");
        assert_eq!(scenario.plan().users.count, 50);
        assert_eq!(
            scenario
                .plan()
                .users
                .credit_card_accounts
                .purchase_operations
                .count,
            10
        );
    }

    #[test]
    fn returns_error_for_unknown_scenario() {
        let catalogue = ScenarioCatalogue::from_json(VALID_JSON).expect("valid catalogue");

        assert_eq!(
            catalogue.find_scenario("missing"),
            Err(CatalogueError::ScenarioNotFound {
                name: "missing".to_owned()
            })
        );
    }

    #[rstest]
    #[case::malformed_json("not valid json")]
    #[case::missing_version(r#"{"scenarios": [{"name": "a"}]}"#)]
    #[case::unknown_plan_field(
        r#"{"version": 1, "scenarios": [{"name": "a", "plan": {"users": {"loans": 1}}}]}"#
    )]
    fn rejects_json_with_parse_error(#[case] json: &str) {
        assert!(matches!(
            ScenarioCatalogue::from_json(json),
            Err(CatalogueError::ParseError { .. })
        ));
    }

    #[rstest]
    #[case::unsupported_version(
        r#"{"version": 2, "scenarios": [{"name": "a"}]}"#,
        CatalogueError::UnsupportedVersion { expected: 1, actual: 2 }
    )]
    #[case::empty_scenarios(r#"{"version": 1, "scenarios": []}"#, CatalogueError::EmptyScenarios)]
    #[case::invalid_name(
        r#"{"version": 1, "scenarios": [{"name": "ok"}, {"name": "../escape"}]}"#,
        CatalogueError::InvalidScenarioName { index: 1, name: "../escape".to_owned() }
    )]
    #[case::duplicate_name(
        r#"{"version": 1, "scenarios": [{"name": "twice"}, {"name": "twice"}]}"#,
        CatalogueError::DuplicateScenarioName { name: "twice".to_owned() }
    )]
    fn rejects_invalid_catalogue(#[case] json: &str, #[case] expected: CatalogueError) {
        assert_eq!(ScenarioCatalogue::from_json(json), Err(expected));
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let path = Utf8Path::new("target/no-such-dir/catalogue.json");

        assert!(matches!(
            ScenarioCatalogue::from_file(path),
            Err(CatalogueError::IoError { .. })
        ));
    }

    #[test]
    fn omitted_plan_defaults_to_empty() {
        let catalogue = ScenarioCatalogue::from_json(r#"{"version": 1, "scenarios": [{"name": "noop"}]}"#)
            .expect("valid catalogue");
        let scenario = catalogue.find_scenario("noop").expect("scenario found");

        assert_eq!(scenario.plan(), SeedsPlan::default());
    }
}
