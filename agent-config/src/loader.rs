//! Configuration loaders.
//!
//! Every environment-based loader has a `from_lookup` twin taking a key
//! lookup function, so callers (and tests) can supply values without touching
//! the process environment.

use anyhow::{Context, Result, bail};
use serde_json::Value;
use tracing::debug;

use crate::schema::{ModelEndpoint, RegistryConfig, flag};

const FALLBACK_DESCRIPTION_VAR: &str = "AGENT_TOOLS_FALLBACK_DESCRIPTION";
const SCHEMA_TITLES_VAR: &str = "AGENT_TOOLS_SCHEMA_TITLES";

/// Loads a `.env` file from the current directory or its parents, if any.
///
/// Variables already present in the environment take precedence.
///
/// # Errors
///
/// Returns an error when a `.env` file exists but cannot be read or parsed.
pub fn load_dotenv() -> Result<()> {
    match dotenvy::dotenv() {
        Ok(path) => {
            debug!(path = %path.display(), "loaded environment file");
            Ok(())
        }
        Err(err) if err.not_found() => Ok(()),
        Err(err) => Err(err).context("failed to load .env file"),
    }
}

impl RegistryConfig {
    /// Parses settings from JSON text; missing keys keep their defaults.
    ///
    /// # Errors
    ///
    /// Returns an error when `text` is not a valid settings object.
    pub fn from_json(text: &str) -> Result<Self> {
        serde_json::from_str(text).context("invalid registry configuration")
    }

    /// Reads settings from `AGENT_TOOLS_*` environment variables.
    ///
    /// # Errors
    ///
    /// Returns an error when a variable is set to something other than a
    /// boolean.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Reads settings through `lookup`, which maps variable names to values.
    ///
    /// # Errors
    ///
    /// Returns an error when a variable is set to something other than a
    /// boolean.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let read = |key: &str| -> Result<Option<bool>> {
            lookup(key)
                .map(|raw| {
                    flag::deserialize(Value::String(raw))
                        .with_context(|| format!("invalid value for {key}"))
                })
                .transpose()
        };

        let mut config = Self::default();
        if let Some(enabled) = read(FALLBACK_DESCRIPTION_VAR)? {
            config.fallback_description = enabled;
        }
        if let Some(enabled) = read(SCHEMA_TITLES_VAR)? {
            config.schema_titles = enabled;
        }
        Ok(config)
    }
}

impl ModelEndpoint {
    /// Reads `API_KEY`, `BASE_URL` and `MODEL` from the environment.
    ///
    /// # Errors
    ///
    /// Returns an error naming the first variable that is unset or blank.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Reads the endpoint settings through `lookup`.
    ///
    /// # Errors
    ///
    /// Returns an error naming the first variable that is unset or blank.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let require = |key: &str| -> Result<String> {
            match lookup(key) {
                Some(value) if !value.trim().is_empty() => Ok(value.trim().to_owned()),
                _ => bail!("environment variable {key} is not set"),
            }
        };

        Ok(Self {
            api_key: require("API_KEY")?,
            base_url: require("BASE_URL")?,
            model: require("MODEL")?,
        })
    }
}
