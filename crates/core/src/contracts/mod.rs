//! Versioned contract registry.
//!
//! A contracts directory holds one JSON object per `<name>.v<N>.json` file,
//! example fixtures under `examples/<name>.v<N>.<label>.json`, and a golden map
//! (`contracts.golden.json`) pinning the canonical SHA-256 of every published
//! version. Published versions are immutable: a new schema means a new `N`.
//!
//! The executor reads its safety limits from the latest `actuator` contract.

mod golden;
mod limits;
mod registry;

pub use golden::{canonical_hash, GoldenHashes, GOLDEN_FILE, LAST_UPDATED_KEY};
pub use limits::load_actuator_limits;
pub use registry::{Contract, ContractIssue, ContractRegistry, IssueKind};

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ContractError {
    #[error("Contracts directory not found: {0}")]
    DirectoryNotFound(PathBuf),

    #[error("Failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid JSON in {path}: {message}")]
    Parse { path: PathBuf, message: String },

    #[error("{0} must be a JSON object at top level")]
    NotAnObject(String),

    #[error("No contract named '{0}'")]
    NotFound(String),

    #[error("Published contract {file} changed: golden {expected}, current {actual}")]
    ImmutableVersion {
        file: String,
        expected: String,
        actual: String,
    },
}
