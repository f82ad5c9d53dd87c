use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;
use thiserror::Error;

use crate::diagnosis::DiagnosticPolicy;

pub const DEFAULT_CATALOG_PATH: &str = "data/diagnostic_cheat_sheet.json";
pub const DEFAULT_LLM_TIMEOUT_MS: u64 = 2000;

pub const ENV_CATALOG_PATH: &str = "JAIMES_CATALOG_PATH";
pub const ENV_SESSION_DIR: &str = "JAIMES_SESSION_DIR";
pub const ENV_LLM_URL: &str = "JAIMES_LLM_URL";
pub const ENV_LLM_TIMEOUT_MS: &str = "JAIMES_LLM_TIMEOUT_MS";
pub const ENV_MAX_TURNS: &str = "JAIMES_MAX_TURNS";

#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("invalid value for {key}: {value:?}")]
    InvalidValue { key: String, value: String },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct JaimesConfig {
    pub catalog_path: Option<PathBuf>,
    /// `None` keeps sessions in memory.
    pub session_dir: Option<PathBuf>,
    /// `None` prints missions instead of calling a model.
    pub llm_url: Option<String>,
    pub llm_timeout_ms: u64,
    pub policy: DiagnosticPolicy,
}

impl Default for JaimesConfig {
    fn default() -> Self {
        Self {
            catalog_path: Some(PathBuf::from(DEFAULT_CATALOG_PATH)),
            session_dir: None,
            llm_url: None,
            llm_timeout_ms: DEFAULT_LLM_TIMEOUT_MS,
            policy: DiagnosticPolicy::default(),
        }
    }
}

impl JaimesConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Defaults overridden by whatever `lookup` returns. Empty values are ignored.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let mut config = Self::default();

        if let Some(path) = get(ENV_CATALOG_PATH) {
            config.catalog_path = Some(PathBuf::from(path));
        }
        if let Some(dir) = get(ENV_SESSION_DIR) {
            config.session_dir = Some(PathBuf::from(dir));
        }
        if let Some(url) = get(ENV_LLM_URL) {
            config.llm_url = Some(url.trim_end_matches('/').to_string());
        }
        if let Some(raw) = get(ENV_LLM_TIMEOUT_MS) {
            config.llm_timeout_ms = parse(ENV_LLM_TIMEOUT_MS, &raw)?;
        }
        if let Some(raw) = get(ENV_MAX_TURNS) {
            let max_turns: u32 = parse(ENV_MAX_TURNS, &raw)?;
            if max_turns == 0 {
                return Err(ConfigError::InvalidValue {
                    key: ENV_MAX_TURNS.to_string(),
                    value: raw,
                });
            }
            config.policy.max_turns = max_turns;
        }

        Ok(config)
    }

    pub fn llm_timeout(&self) -> Duration {
        Duration::from_millis(self.llm_timeout_ms)
    }
}

fn parse<T: FromStr>(key: &str, raw: &str) -> Result<T, ConfigError> {
    raw.trim().parse().map_err(|_| ConfigError::InvalidValue {
        key: key.to_string(),
        value: raw.to_string(),
    })
}
