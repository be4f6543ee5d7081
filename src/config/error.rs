//! Errors raised while reading or writing `config.yml`.

use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// `save` was called before `load` picked a file
    #[error("No configuration file selected; load one first")]
    NoFilePath,

    #[error("Home directory could not be determined")]
    NoHomeDirectory,

    #[error("Unknown log level '{0}' (expected off, error, warn, info, debug or trace)")]
    InvalidLogLevel(String),

    #[error("Cannot read {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    /// Covers creating the directory as well as writing the file
    #[error("Cannot write {path}: {source}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Malformed YAML in {path}: {source}")]
    Parse {
        path: PathBuf,
        source: serde_yaml::Error,
    },

    #[error("Cannot encode configuration as YAML: {0}")]
    Encode(#[source] serde_yaml::Error),
}
