//! `medreg.toml`: operator defaults for paths and knobs. Every value has a
//! working default and every value can be overridden by a CLI flag, so the
//! file is optional.

use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::CliError;

pub const DEFAULT_CONFIG_FILE: &str = "medreg.toml";

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Registry database path.
    pub store: PathBuf,
    /// Row failures logged verbatim per dataset before counting kicks in.
    pub failure_log_cap: usize,
    /// Timeout for --url downloads, in seconds.
    pub fetch_timeout_secs: u64,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            store: PathBuf::from("medreg.db"),
            failure_log_cap: 20,
            fetch_timeout_secs: 30,
        }
    }
}

impl Config {
    pub fn from_toml(text: &str) -> Result<Config, CliError> {
        let config: Config = toml::from_str(text)
            .map_err(|e| CliError::usage(format!("invalid config: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Explicit path must exist; the default path is used only when present.
    pub fn load(explicit: Option<&Path>) -> Result<Config, CliError> {
        match explicit {
            Some(path) => {
                let text = fs::read_to_string(path).map_err(|e| {
                    CliError::usage(format!("cannot read config {}: {}", path.display(), e))
                })?;
                Config::from_toml(&text)
            }
            None => {
                let path = Path::new(DEFAULT_CONFIG_FILE);
                if path.exists() {
                    let text = fs::read_to_string(path).map_err(|e| {
                        CliError::usage(format!("cannot read config {}: {}", path.display(), e))
                    })?;
                    Config::from_toml(&text)
                } else {
                    Ok(Config::default())
                }
            }
        }
    }

    fn validate(&self) -> Result<(), CliError> {
        if self.store.as_os_str().is_empty() {
            return Err(CliError::usage("config: store path must not be empty"));
        }
        if self.fetch_timeout_secs == 0 {
            return Err(CliError::usage("config: fetch_timeout_secs must be positive"));
        }
        Ok(())
    }
}
