//! Configuration management module.
//!
//! This module handles loading and saving the YAML configuration file that
//! points the client at an API instance and sets the log level.

mod error;

pub use error::ConfigError;

use crate::error::AppResult;
use serde::{Deserialize, Serialize};
use std::{
    fs,
    io::Write,
    path::{Path, PathBuf},
    time::Duration,
};

const FILE_NAME: &str = "config.yml";
const DEFAULT_DIRECTORY_PATH: &str = ".config/todolist-sync";
const DEFAULT_BASE_URL: &str = "https://social-network.samuraijs.com/api/1.1";

/// Oversees management of configuration file.
///
#[derive(Clone, Debug, PartialEq)]
pub struct Config {
    pub base_url: String,
    pub api_key: Option<String>,
    pub log_level: log::LevelFilter,
    pub request_timeout: Duration,
    file_path: Option<PathBuf>,
}

/// Define the on-disk layout of the configuration file.
///
#[derive(Debug, Serialize, Deserialize)]
struct FileSpec {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    #[serde(default = "default_log_level")]
    pub log_level: String,
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_request_timeout_secs() -> u64 {
    30
}

impl Default for Config {
    fn default() -> Self {
        Config::new()
    }
}

impl Config {
    /// Return a new instance with default values.
    ///
    pub fn new() -> Config {
        Config {
            base_url: default_base_url(),
            api_key: None,
            log_level: log::LevelFilter::Info,
            request_timeout: Duration::from_secs(default_request_timeout_secs()),
            file_path: None,
        }
    }

    /// Try to load an existing configuration from the disk using the custom
    /// directory if provided. A missing file leaves the defaults in place.
    ///
    pub fn load(&mut self, custom_path: Option<&str>) -> AppResult<()> {
        let dir_path = match custom_path {
            Some(path) => Path::new(&path).to_path_buf(),
            None => Config::default_path()?,
        };

        if !dir_path.exists() {
            fs::create_dir_all(&dir_path).map_err(|source| ConfigError::Write {
                path: dir_path.clone(),
                source,
            })?;
        }

        let file_path = dir_path.join(Path::new(FILE_NAME));
        if file_path.exists() {
            let contents = fs::read_to_string(&file_path).map_err(|source| ConfigError::Read {
                path: file_path.clone(),
                source,
            })?;
            let data: FileSpec =
                serde_yaml::from_str(&contents).map_err(|source| ConfigError::Parse {
                    path: file_path.clone(),
                    source,
                })?;
            self.apply(data)?;
        }
        self.file_path = Some(file_path);

        Ok(())
    }

    /// Attempt to serialize the configuration data and write it to the disk.
    ///
    pub fn save(&self) -> AppResult<()> {
        let file_path = self.file_path.as_ref().ok_or(ConfigError::NoFilePath)?;
        let data = FileSpec {
            base_url: self.base_url.clone(),
            api_key: self.api_key.clone(),
            log_level: self.log_level.to_string().to_lowercase(),
            request_timeout_secs: self.request_timeout.as_secs(),
        };
        let content = serde_yaml::to_string(&data).map_err(ConfigError::Encode)?;
        let write_failed = |source| ConfigError::Write {
            path: file_path.clone(),
            source,
        };

        if let Some(parent) = file_path.parent() {
            fs::create_dir_all(parent).map_err(write_failed)?;
        }
        let mut file = fs::File::create(file_path).map_err(write_failed)?;
        write!(file, "{}", content).map_err(write_failed)?;
        file.flush().map_err(write_failed)?;
        Ok(())
    }

    /// Override the log level with a name such as `debug`.
    ///
    pub fn set_log_level(&mut self, level: &str) -> Result<(), ConfigError> {
        self.log_level = level
            .parse()
            .map_err(|_| ConfigError::InvalidLogLevel(level.to_string()))?;
        Ok(())
    }

    pub fn file_path(&self) -> Option<&Path> {
        self.file_path.as_deref()
    }

    fn apply(&mut self, data: FileSpec) -> Result<(), ConfigError> {
        self.base_url = data.base_url;
        self.api_key = data.api_key.filter(|key| !key.is_empty());
        self.request_timeout = Duration::from_secs(data.request_timeout_secs);
        self.set_log_level(&data.log_level)
    }

    /// Returns the path buffer for the default configuration directory or an
    /// error if the home directory could not be found.
    ///
    fn default_path() -> AppResult<PathBuf> {
        match dirs::home_dir() {
            Some(home) => Ok(home.join(Path::new(DEFAULT_DIRECTORY_PATH))),
            None => Err(ConfigError::NoHomeDirectory.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AppError;

    #[test]
    fn load_without_file_keeps_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = Config::new();
        config.load(dir.path().to_str()).unwrap();
        assert_eq!(config.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.api_key, None);
        assert_eq!(config.log_level, log::LevelFilter::Info);
        assert_eq!(config.file_path(), Some(dir.path().join(FILE_NAME).as_path()));
    }

    #[test]
    fn load_reads_file_values() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path().join(FILE_NAME),
            "base_url: http://localhost:8080\napi_key: secret\nlog_level: debug\nrequest_timeout_secs: 5\n",
        )
        .unwrap();

        let mut config = Config::new();
        config.load(dir.path().to_str()).unwrap();
        assert_eq!(config.base_url, "http://localhost:8080");
        assert_eq!(config.api_key.as_deref(), Some("secret"));
        assert_eq!(config.log_level, log::LevelFilter::Debug);
        assert_eq!(config.request_timeout, Duration::from_secs(5));
    }

    #[test]
    fn load_creates_missing_directory() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("nested/config");
        let mut config = Config::new();
        config.load(nested.to_str()).unwrap();
        assert!(nested.exists());
    }

    #[test]
    fn load_rejects_unknown_log_level() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join(FILE_NAME), "log_level: loud\n").unwrap();
        let mut config = Config::new();
        let error = config.load(dir.path().to_str()).unwrap_err();
        assert!(error.to_string().contains("loud"));
    }

    #[test]
    fn save_then_load_keeps_values() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = Config::new();
        config.load(dir.path().to_str()).unwrap();
        config.api_key = Some("key".to_string());
        config.set_log_level("warn").unwrap();
        config.save().unwrap();

        let mut reloaded = Config::new();
        reloaded.load(dir.path().to_str()).unwrap();
        assert_eq!(reloaded, config);
    }

    #[test]
    fn save_without_path_fails() {
        let error = Config::new().save().unwrap_err();
        assert!(matches!(error, AppError::Config(ConfigError::NoFilePath)));
    }
}
