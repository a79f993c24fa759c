//! # Configuration
//!
//! `relgraph.toml` with three sections:
//!
//! ```toml
//! [source]
//! members = "data/members.json"
//! relations = "data/relations.json"
//! # or: api_url = "https://repository.example.org/api"
//!
//! [server]
//! host = "127.0.0.1"
//! port = 8080
//! rate_limit = 100
//!
//! [filters]
//! memberStatus = "active"
//! ```
//!
//! Resolution order (highest priority first):
//! 1. CLI flags
//! 2. Environment variables (`RELGRAPH_RATE_LIMIT`, `RELGRAPH_CORS_ORIGINS`)
//! 3. Config file
//! 4. Compiled defaults

use relgraph_core::{FilterState, RelgraphError};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Config file looked up in the working directory when `--config` is absent.
pub const DEFAULT_CONFIG_FILE: &str = "relgraph.toml";

/// Default rate limit: 100 requests per second.
pub const DEFAULT_RATE_LIMIT: u32 = 100;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RelgraphConfig {
    pub source: SourceConfig,
    pub server: ServerConfig,
    /// Initial filter state of a served session.
    pub filters: FilterState,
}

/// Where snapshots come from: local JSON files or the member repository.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SourceConfig {
    pub members: Option<PathBuf>,
    pub relations: Option<PathBuf>,
    pub patrons: Option<PathBuf>,
    pub referrals: Option<PathBuf>,
    /// Base URL of the member repository. Takes precedence over files.
    pub api_url: Option<String>,
    /// Re-fetch period for a served session; `None` disables refreshing.
    pub refresh_secs: Option<u64>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Requests per second; 0 disables rate limiting.
    pub rate_limit: u32,
    /// Allowed CORS origins. Empty means localhost only; `["*"]` allows all.
    pub cors_origins: Vec<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8080,
            rate_limit: DEFAULT_RATE_LIMIT,
            cors_origins: Vec::new(),
        }
    }
}

impl ServerConfig {
    #[must_use]
    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl RelgraphConfig {
    /// Load the configuration.
    ///
    /// An explicit `path` must exist. Without one, [`DEFAULT_CONFIG_FILE`] is
    /// read if present, otherwise defaults are used. Environment overrides are
    /// applied last.
    pub fn load(path: Option<&Path>) -> Result<Self, RelgraphError> {
        let mut config = match path {
            Some(path) => Self::from_file(path)?,
            None => {
                let fallback = Path::new(DEFAULT_CONFIG_FILE);
                if fallback.is_file() {
                    Self::from_file(fallback)?
                } else {
                    Self::default()
                }
            }
        };

        config.apply_env_overrides();
        config.validate()?;
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self, RelgraphError> {
        let contents = std::fs::read_to_string(path).map_err(|e| {
            RelgraphError::ConfigError(format!("cannot read '{}': {}", path.display(), e))
        })?;
        tracing::debug!("Loaded configuration from {}", path.display());
        Self::from_toml(&contents)
    }

    pub fn from_toml(contents: &str) -> Result<Self, RelgraphError> {
        toml::from_str(contents).map_err(|e| RelgraphError::ConfigError(e.to_string()))
    }

    /// Apply `RELGRAPH_RATE_LIMIT` and `RELGRAPH_CORS_ORIGINS`.
    pub fn apply_env_overrides(&mut self) {
        self.apply_overrides(
            std::env::var("RELGRAPH_RATE_LIMIT").ok().as_deref(),
            std::env::var("RELGRAPH_CORS_ORIGINS").ok().as_deref(),
        );
    }

    fn apply_overrides(&mut self, rate_limit: Option<&str>, cors_origins: Option<&str>) {
        if let Some(raw) = rate_limit {
            match raw.trim().parse() {
                Ok(rps) => self.server.rate_limit = rps,
                Err(_) => tracing::warn!("Ignoring invalid RELGRAPH_RATE_LIMIT '{}'", raw),
            }
        }
        if let Some(raw) = cors_origins {
            self.server.cors_origins = raw
                .split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string)
                .collect();
        }
    }

    pub fn validate(&self) -> Result<(), RelgraphError> {
        if self.source.members.is_some() != self.source.relations.is_some() {
            return Err(RelgraphError::ConfigError(
                "source.members and source.relations must be set together".to_string(),
            ));
        }
        if self.source.patrons.is_some() != self.source.referrals.is_some() {
            return Err(RelgraphError::ConfigError(
                "source.patrons and source.referrals must be set together".to_string(),
            ));
        }
        if self.source.refresh_secs == Some(0) {
            return Err(RelgraphError::ConfigError(
                "source.refresh_secs must be greater than 0".to_string(),
            ));
        }
        self.filters
            .validate()
            .map_err(|e| RelgraphError::ConfigError(format!("filters: {}", e)))
    }
}
