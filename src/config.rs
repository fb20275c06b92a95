//! Runtime configuration, read from the environment once at startup.

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{anyhow, Result};
use directories::BaseDirs;

/// Folder name used beneath the user's home directory for application data.
const DATA_DIR_NAME: &str = ".recipe-book";
/// JSON store file name inside the data directory.
const DATA_FILE_NAME: &str = "recipes.json";
/// Log file name inside the data directory.
const LOG_FILE_NAME: &str = "recipe-book.log";

pub const DEFAULT_MODEL: &str = "gemini-2.5-flash";
pub const DEFAULT_TIMEOUT_SECS: u64 = 60;

pub const ENV_DATA: &str = "RECIPE_BOOK_DATA";
pub const ENV_LOG: &str = "RECIPE_BOOK_LOG";
pub const ENV_API_KEY: &str = "GEMINI_API_KEY";
pub const ENV_MODEL: &str = "RECIPE_BOOK_MODEL";
pub const ENV_TIMEOUT: &str = "RECIPE_BOOK_TIMEOUT_SECS";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Location of the JSON recipe store.
    pub data_file: PathBuf,
    /// Where log output goes; the terminal itself belongs to the TUI.
    pub log_file: PathBuf,
    /// Assistant API key. `None` disables the assistant.
    pub api_key: Option<String>,
    pub model: String,
    pub request_timeout: Duration,
}

impl Config {
    /// Read the process environment, defaulting paths to the user's home.
    pub fn from_env() -> Result<Self> {
        let base_dirs = BaseDirs::new().ok_or_else(|| anyhow!("could not locate home directory"))?;
        Ok(Self::from_lookup(
            |key| std::env::var(key).ok(),
            base_dirs.home_dir(),
        ))
    }

    /// Build a configuration from an arbitrary variable lookup. Blank values
    /// count as unset.
    pub fn from_lookup<F>(lookup: F, home: &Path) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| {
            lookup(key)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };
        let data_dir = home.join(DATA_DIR_NAME);

        let request_timeout = get(ENV_TIMEOUT)
            .and_then(|raw| raw.parse::<u64>().ok())
            .unwrap_or(DEFAULT_TIMEOUT_SECS)
            .clamp(5, 300);

        Self {
            data_file: get(ENV_DATA)
                .map(PathBuf::from)
                .unwrap_or_else(|| data_dir.join(DATA_FILE_NAME)),
            log_file: get(ENV_LOG)
                .map(PathBuf::from)
                .unwrap_or_else(|| data_dir.join(LOG_FILE_NAME)),
            api_key: get(ENV_API_KEY),
            model: get(ENV_MODEL).unwrap_or_else(|| DEFAULT_MODEL.to_string()),
            request_timeout: Duration::from_secs(request_timeout),
        }
    }

    pub fn assistant_enabled(&self) -> bool {
        self.api_key.is_some()
    }
}
