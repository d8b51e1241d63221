//! Scenario dump persistence.
//!
//! Each scenario persists its [`SeedsResult`] as pretty-printed JSON at
//! `<dumps_dir>/<scenario>_seeds.json`. Saves replace the previous dump
//! atomically; loads distinguish a missing dump from an unreadable, corrupt
//! or mis-shaped one.

use std::io;

use camino::{Utf8Path, Utf8PathBuf};
use cap_std::{ambient_authority, fs::Dir};
use serde_json::error::Category;
use tracing::debug;

use crate::atomic_io::write_atomic;
use crate::error::DumpError;
use crate::result::SeedsResult;
use crate::validation::scenario_name_violation;

/// Suffix appended to the scenario name to form the dump file name.
pub const DUMP_FILE_SUFFIX: &str = "_seeds.json";

/// Directory of scenario dumps.
///
/// # Example
///
/// ```
/// use seed_data::SeedDumps;
///
/// let dumps = SeedDumps::new("dumps");
/// let path = dumps.dump_path("smoke").expect("valid scenario name");
///
/// assert_eq!(path.as_str(), "dumps/smoke_seeds.json");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeedDumps {
    dir: Utf8PathBuf,
}

impl SeedDumps {
    /// Creates a dump store rooted at `dir`. The directory is created on the
    /// first save.
    #[must_use]
    pub fn new(dir: impl Into<Utf8PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Returns the dump directory.
    #[must_use]
    pub fn dir(&self) -> &Utf8Path {
        &self.dir
    }

    /// Returns the dump path for `scenario`.
    ///
    /// # Errors
    ///
    /// Returns [`DumpError::InvalidScenarioName`] when `scenario` is not a
    /// safe file stem.
    pub fn dump_path(&self, scenario: &str) -> Result<Utf8PathBuf, DumpError> {
        Ok(self.dir.join(dump_file_name(scenario)?))
    }

    /// Returns `true` when a dump exists for `scenario`.
    #[must_use]
    pub fn exists(&self, scenario: &str) -> bool {
        let Ok(file_name) = dump_file_name(scenario) else {
            return false;
        };
        Dir::open_ambient_dir(&self.dir, ambient_authority())
            .is_ok_and(|dir| dir.is_file(&file_name))
    }

    /// Persists `result` as the dump for `scenario`, replacing any previous
    /// dump, and returns the dump path.
    ///
    /// # Errors
    ///
    /// Returns [`DumpError::InvalidScenarioName`] for unsafe names,
    /// [`DumpError::Serialize`] if the result cannot be encoded and
    /// [`DumpError::Write`] if the directory or file cannot be written.
    pub fn save(&self, result: &SeedsResult, scenario: &str) -> Result<Utf8PathBuf, DumpError> {
        let file_name = dump_file_name(scenario)?;
        let path = self.dir.join(&file_name);
        let json = serde_json::to_string_pretty(result).map_err(|err| DumpError::Serialize {
            message: err.to_string(),
        })?;

        let write_error = |err: io::Error| DumpError::Write {
            path: path.clone(),
            message: err.to_string(),
        };
        Dir::create_ambient_dir_all(&self.dir, ambient_authority()).map_err(write_error)?;
        let dir = Dir::open_ambient_dir(&self.dir, ambient_authority()).map_err(write_error)?;
        write_atomic(&dir, &file_name, &json).map_err(write_error)?;

        debug!(path = %path, scenario, bytes = json.len(), "saved seed dump");
        Ok(path)
    }

    /// Loads the dump for `scenario`.
    ///
    /// # Errors
    ///
    /// Returns [`DumpError::NotFound`] when no dump exists,
    /// [`DumpError::Io`] when it cannot be read, [`DumpError::Corrupt`] when
    /// it is not JSON and [`DumpError::Schema`] when it does not describe a
    /// valid result tree.
    pub fn load(&self, scenario: &str) -> Result<SeedsResult, DumpError> {
        let file_name = dump_file_name(scenario)?;
        let path = self.dir.join(&file_name);

        let contents = read_dump(&self.dir, &file_name).map_err(|err| {
            if err.kind() == io::ErrorKind::NotFound {
                DumpError::NotFound { path: path.clone() }
            } else {
                DumpError::Io {
                    path: path.clone(),
                    message: err.to_string(),
                }
            }
        })?;

        let result: SeedsResult = serde_json::from_str(&contents).map_err(|err| {
            let message = err.to_string();
            match err.classify() {
                Category::Data => DumpError::Schema {
                    path: path.clone(),
                    message,
                },
                Category::Io | Category::Syntax | Category::Eof => DumpError::Corrupt {
                    path: path.clone(),
                    message,
                },
            }
        })?;
        result.validate().map_err(|err| DumpError::Schema {
            path: path.clone(),
            message: err.to_string(),
        })?;

        debug!(path = %path, scenario, users = result.users.len(), "loaded seed dump");
        Ok(result)
    }

    /// Deletes the dump for `scenario`. A missing dump is not an error.
    ///
    /// # Errors
    ///
    /// Returns [`DumpError::Write`] if an existing dump cannot be removed.
    pub fn remove(&self, scenario: &str) -> Result<(), DumpError> {
        let file_name = dump_file_name(scenario)?;
        let outcome = Dir::open_ambient_dir(&self.dir, ambient_authority())
            .and_then(|dir| dir.remove_file(&file_name));
        match outcome {
            Ok(()) => {
                debug!(scenario, "removed seed dump");
                Ok(())
            }
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(err) => Err(DumpError::Write {
                path: self.dir.join(&file_name),
                message: err.to_string(),
            }),
        }
    }
}

fn dump_file_name(scenario: &str) -> Result<String, DumpError> {
    match scenario_name_violation(scenario) {
        Some(reason) => Err(DumpError::InvalidScenarioName {
            name: scenario.to_owned(),
            reason,
        }),
        None => Ok(format!("{scenario}{DUMP_FILE_SUFFIX}")),
    }
}

fn read_dump(dir: &Utf8Path, file_name: &str) -> io::Result<String> {
    Dir::open_ambient_dir(dir, ambient_authority())?.read_to_string(file_name)
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[test]
    fn dump_path_appends_suffix() {
        let dumps = SeedDumps::new("/var/seeds");
        assert_eq!(
            dumps.dump_path("existing_user_get_operations").expect("valid name"),
            Utf8PathBuf::from("/var/seeds/existing_user_get_operations_seeds.json")
        );
    }

    #[rstest]
    #[case::empty("")]
    #[case::parent("..")]
    #[case::nested("a/b")]
    fn unsafe_names_are_rejected_before_io(#[case] scenario: &str) {
        let dumps = SeedDumps::new("unused-dir");

        assert!(matches!(
            dumps.load(scenario),
            Err(DumpError::InvalidScenarioName { .. })
        ));
        assert!(matches!(
            dumps.save(&SeedsResult::default(), scenario),
            Err(DumpError::InvalidScenarioName { .. })
        ));
        assert!(!dumps.exists(scenario));
    }
}
