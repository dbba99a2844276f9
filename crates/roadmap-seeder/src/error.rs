//! Error types for roadmap seeding
//!
//! Command failures never abort a seeding run; they surface here so the
//! seeder can print and count them. Dataset and config errors are fatal
//! and happen before the first command is issued.

use std::path::PathBuf;

/// A canister call could not be executed at all
#[derive(Debug, thiserror::Error)]
pub enum CommandError {
    /// The program could not be started (missing `dfx`, permissions, ...)
    #[error("failed to spawn `{program}`: {source}")]
    Spawn {
        /// Program that failed to start
        program: String,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },
}

/// Roadmap dataset loading errors
#[derive(Debug, thiserror::Error)]
pub enum DatasetError {
    /// Dataset file could not be read
    #[error("failed to read dataset {}: {source}", .path.display())]
    Io {
        /// Dataset path
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// JSON dataset is malformed
    #[error("invalid JSON dataset: {0}")]
    Json(#[from] serde_json::Error),

    /// YAML dataset is malformed
    #[error("invalid YAML dataset: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// Extension is neither JSON nor YAML
    #[error("unsupported dataset format: {}", .0.display())]
    UnsupportedFormat(PathBuf),

    /// Task status cannot be written as a variant tag
    #[error("invalid task status {0:?}: expected an identifier such as ToDo")]
    InvalidStatus(String),
}

/// Seeder configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Config file could not be read
    #[error("failed to read config {}: {source}", .path.display())]
    Io {
        /// Config path
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// Config file is not valid TOML for [`crate::SeederConfig`]
    #[error("invalid config: {0}")]
    Parse(#[from] toml::de::Error),

    /// Unknown identifier source name
    #[error("unknown id source {0:?}: expected `listing` or `create-reply`")]
    UnknownIdSource(String),
}
