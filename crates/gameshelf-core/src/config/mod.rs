//! Environment-driven configuration

use std::env;
use std::path::PathBuf;
use thiserror::Error;

const CLIENT_ID_VAR: &str = "CLIENT_ID";
const CLIENT_SECRET_VAR: &str = "CLIENT_SECRET";
const GAMES_FOLDER_VAR: &str = "GAMES_FOLDER";
const DRY_RUN_VAR: &str = "DRY_RUN";

const DEFAULT_GAMES_FOLDER: &str = "/games";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable {0}")]
    MissingVar(&'static str),
}

/// Startup configuration resolved from the environment.
#[derive(Debug, Clone)]
pub struct Config {
    pub client_id: String,
    pub client_secret: String,
    pub games_folder: PathBuf,
    pub dry_run: bool,
}

impl Config {
    /// Read configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Read configuration through an injected variable lookup.
    pub fn from_lookup<F>(get: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let client_id = require(&get, CLIENT_ID_VAR)?;
        let client_secret = require(&get, CLIENT_SECRET_VAR)?;
        let games_folder = get(GAMES_FOLDER_VAR)
            .filter(|value| !value.is_empty())
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_GAMES_FOLDER));
        let dry_run = get(DRY_RUN_VAR).as_deref().map(parse_bool).unwrap_or(false);

        Ok(Self {
            client_id,
            client_secret,
            games_folder,
            dry_run,
        })
    }
}

fn require<F>(get: &F, name: &'static str) -> Result<String, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    get(name)
        .filter(|value| !value.is_empty())
        .ok_or(ConfigError::MissingVar(name))
}

fn parse_bool(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "true" | "1" | "yes"
    )
}
