//! Error types for the seed-data crate.
//!
//! This module defines semantic error enums for identifier construction,
//! result validation, dump persistence, scenario catalogues and sampling,
//! following the project's error handling conventions with `thiserror`.

use camino::Utf8PathBuf;
use thiserror::Error;

/// Errors raised when a raw string cannot become a typed identifier.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IdentifierError {
    /// The identifier was empty or contained only whitespace.
    #[error("{kind} identifier must not be empty")]
    Empty {
        /// Entity the identifier belongs to (`user`, `account`, ...).
        kind: &'static str,
    },
}

/// Errors raised when a result tree breaks its structural invariants.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ResultValidationError {
    /// The same identifier appears twice among siblings.
    #[error("duplicate {kind} identifier '{id}' under {parent}")]
    DuplicateIdentifier {
        /// Entity kind of the duplicated identifier.
        kind: &'static str,
        /// The duplicated identifier value.
        id: String,
        /// Description of the owning node.
        parent: String,
    },
}

/// Errors raised while saving or loading scenario dumps.
///
/// `NotFound` is the "no seed data available" condition: callers handle it by
/// building the scenario first. Malformed documents are reported as `Corrupt`
/// and well-formed documents with the wrong shape as `Schema`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DumpError {
    /// The scenario name cannot be used as a dump file stem.
    #[error("invalid scenario name '{name}': {reason}")]
    InvalidScenarioName {
        /// The rejected scenario name.
        name: String,
        /// Why the name was rejected.
        reason: &'static str,
    },

    /// No dump exists for the scenario.
    #[error("no seed data available at '{path}'; build the scenario first")]
    NotFound {
        /// Path where the dump was expected.
        path: Utf8PathBuf,
    },

    /// The dump or its directory could not be read.
    #[error("failed to read seed dump at '{path}': {message}")]
    Io {
        /// Path being read.
        path: Utf8PathBuf,
        /// Description of the I/O error.
        message: String,
    },

    /// The dump could not be written.
    #[error("failed to write seed dump at '{path}': {message}")]
    Write {
        /// Path being written.
        path: Utf8PathBuf,
        /// Description of the I/O error.
        message: String,
    },

    /// The dump is not valid JSON.
    #[error("seed dump at '{path}' is corrupt: {message}")]
    Corrupt {
        /// Path of the corrupt dump.
        path: Utf8PathBuf,
        /// Parser error message.
        message: String,
    },

    /// The dump is valid JSON but does not match the result schema.
    #[error("seed dump at '{path}' does not match the result schema: {message}")]
    Schema {
        /// Path of the mismatching dump.
        path: Utf8PathBuf,
        /// Description of the mismatch.
        message: String,
    },

    /// The result could not be serialized.
    #[error("failed to serialize seed result: {message}")]
    Serialize {
        /// Serializer error message.
        message: String,
    },
}

/// Errors that can occur when parsing or querying a scenario catalogue.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CatalogueError {
    /// The catalogue file could not be read.
    #[error("failed to read scenario catalogue at '{path}': {message}")]
    IoError {
        /// Path to the catalogue file.
        path: Utf8PathBuf,
        /// Description of the I/O error.
        message: String,
    },

    /// The catalogue JSON is malformed or has the wrong shape.
    #[error("invalid scenario catalogue JSON: {message}")]
    ParseError {
        /// Description of the parse error.
        message: String,
    },

    /// The catalogue version is not supported.
    #[error("unsupported catalogue version: expected {expected}, found {actual}")]
    UnsupportedVersion {
        /// Expected version number.
        expected: u32,
        /// Version found in the catalogue.
        actual: u32,
    },

    /// The catalogue defines no scenarios.
    #[error("scenario catalogue contains no scenarios")]
    EmptyScenarios,

    /// A scenario name is not usable as a dump file stem.
    #[error("invalid scenario name '{name}' at index {index}")]
    InvalidScenarioName {
        /// Index of the scenario in the catalogue.
        index: usize,
        /// The rejected name.
        name: String,
    },

    /// Two scenarios share a name.
    #[error("scenario '{name}' is defined more than once")]
    DuplicateScenarioName {
        /// The duplicated name.
        name: String,
    },

    /// The requested scenario is not in the catalogue.
    #[error("scenario '{name}' not found in catalogue")]
    ScenarioNotFound {
        /// The scenario name that was not found.
        name: String,
    },
}

/// Errors returned by the sampling access modes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum SamplingError {
    /// Random sampling was attempted on a snapshot with no users.
    #[error("seed snapshot contains no users")]
    Empty,
    /// The draining queue has handed out every user.
    #[error("seed user queue is exhausted")]
    Exhausted,
}
