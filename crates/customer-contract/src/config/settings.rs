// crates/customer-contract/src/config/settings.rs
// ============================================================================
// Module: Suite Settings
// Description: Typed suite configuration with TOML loading and validation.
// Purpose: Fail closed on malformed base URLs, headers, and sink settings.
// Dependencies: serde, thiserror, toml, url, reqwest
// ============================================================================

//! ## Overview
//! [`SuiteConfig`] carries everything a suite run needs before the HTTP
//! client is built: target URL, strictness, optional auth and header
//! injection, timeouts, and where reports and events go.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;
use std::fmt;
use std::fs;
use std::path::Path;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use reqwest::header::HeaderName;
use reqwest::header::HeaderValue;
use serde::Deserialize;
use serde::Serialize;
use thiserror::Error;
use url::Url;

use super::env::SuiteEnv;
use super::env::apply_env_overrides;
use super::env::read_env_strict;
use crate::scenarios::ScenarioName;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Base URL used when no override is configured.
pub const DEFAULT_BASE_URL: &str = "http://localhost:10000";

/// Maximum accepted configuration file size in bytes.
const MAX_CONFIG_FILE_SIZE: usize = 64 * 1024;

// ============================================================================
// SECTION: Config Types
// ============================================================================

/// Strictness applied to scenario checks.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SuiteMode {
    /// Every status and payload check fails the scenario on mismatch.
    #[default]
    Strict,
    /// Only always-enforced checks fail; other mismatches are logged.
    Diagnostic,
}

impl SuiteMode {
    /// Returns a stable label for the mode.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Strict => "strict",
            Self::Diagnostic => "diagnostic",
        }
    }
}

impl fmt::Display for SuiteMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SuiteMode {
    type Err = ConfigError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "strict" => Ok(Self::Strict),
            "diagnostic" => Ok(Self::Diagnostic),
            other => Err(ConfigError::Invalid(format!(
                "mode must be strict or diagnostic, got {other}"
            ))),
        }
    }
}

/// Destination for structured suite events.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventLogTarget {
    /// JSON lines on stderr.
    #[default]
    Stderr,
    /// JSON lines appended to `event_log_path`.
    File,
    /// Events are discarded.
    None,
}

/// Typed suite configuration.
///
/// # Invariants
/// - `validate` has succeeded before the value is handed to a suite.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SuiteConfig {
    /// Base URL of the customer API under test.
    pub base_url: String,
    /// Check strictness.
    pub mode: SuiteMode,
    /// Optional bearer token attached to every request.
    pub auth_token: Option<String>,
    /// Adds `Accept: application/json` to every request.
    pub accept_json: bool,
    /// Extra headers attached to every request.
    pub extra_headers: BTreeMap<String, String>,
    /// Optional request timeout in seconds; absent uses the client default.
    pub timeout_secs: Option<u64>,
    /// Optional report output directory.
    pub run_root: Option<PathBuf>,
    /// Event sink selection.
    pub event_log: EventLogTarget,
    /// Event log path when `event_log = "file"`.
    pub event_log_path: Option<PathBuf>,
    /// Scenario subset; empty runs every scenario.
    pub scenarios: Vec<ScenarioName>,
}

impl Default for SuiteConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            mode: SuiteMode::default(),
            auth_token: None,
            accept_json: false,
            extra_headers: BTreeMap::new(),
            timeout_secs: None,
            run_root: None,
            event_log: EventLogTarget::default(),
            event_log_path: None,
            scenarios: Vec::new(),
        }
    }
}

impl SuiteConfig {
    /// Loads configuration from an optional TOML file and the environment.
    ///
    /// When `path` is `None`, `CUSTOMER_CONTRACT_CONFIG` is consulted; when
    /// neither is set the built-in defaults are used as the base layer.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when the file cannot be read or parsed, an
    /// environment value is malformed, or validation fails.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let config = Self::load_layers(path)?;
        config.validate()?;
        Ok(config)
    }

    /// Loads the file and environment layers without validating them, so a
    /// caller can apply further overrides before [`SuiteConfig::validate`].
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when the file cannot be read or parsed, or an
    /// environment value is malformed.
    pub fn load_layers(path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut config = match resolve_path(path)? {
            Some(path) => Self::read_file(&path)?,
            None => Self::default(),
        };
        apply_env_overrides(&mut config)?;
        Ok(config)
    }

    /// Parses configuration from a TOML string without env overrides.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when parsing or validation fails.
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: Self =
            toml::from_str(content).map_err(|err| ConfigError::Parse(err.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Reads a TOML file into configuration without validating it.
    fn read_file(path: &Path) -> Result<Self, ConfigError> {
        let bytes = fs::read(path).map_err(|err| ConfigError::Io(err.to_string()))?;
        if bytes.len() > MAX_CONFIG_FILE_SIZE {
            return Err(ConfigError::Invalid("config file exceeds size limit".to_string()));
        }
        let content = std::str::from_utf8(&bytes)
            .map_err(|_| ConfigError::Invalid("config file must be utf-8".to_string()))?;
        toml::from_str(content).map_err(|err| ConfigError::Parse(err.to_string()))
    }

    /// Validates the configuration for internal consistency.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] describing the first violation found.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.parsed_base_url()?;
        if let Some(token) = &self.auth_token
            && token.trim().is_empty()
        {
            return Err(ConfigError::Invalid("auth_token must not be empty".to_string()));
        }
        if self.timeout_secs == Some(0) {
            return Err(ConfigError::Invalid("timeout_secs must be greater than zero".to_string()));
        }
        for (name, value) in &self.extra_headers {
            HeaderName::from_bytes(name.as_bytes())
                .map_err(|_| ConfigError::Invalid(format!("invalid header name: {name}")))?;
            HeaderValue::from_str(value)
                .map_err(|_| ConfigError::Invalid(format!("invalid value for header {name}")))?;
        }
        if self.event_log == EventLogTarget::File && self.event_log_path.is_none() {
            return Err(ConfigError::Invalid(
                "event_log_path is required when event_log = \"file\"".to_string(),
            ));
        }
        for (index, name) in self.scenarios.iter().enumerate() {
            if self.scenarios[..index].contains(name) {
                return Err(ConfigError::Invalid(format!("duplicate scenario: {name}")));
            }
        }
        Ok(())
    }

    /// Parses and checks the base URL.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] for unparsable URLs, non-HTTP schemes,
    /// or URLs without a host.
    pub fn parsed_base_url(&self) -> Result<Url, ConfigError> {
        let url = Url::parse(&self.base_url)
            .map_err(|err| ConfigError::Invalid(format!("invalid base_url: {err}")))?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(ConfigError::Invalid(format!(
                "base_url scheme must be http or https, got {}",
                url.scheme()
            )));
        }
        if url.host_str().is_none() {
            return Err(ConfigError::Invalid("base_url must include a host".to_string()));
        }
        Ok(url)
    }

    /// Returns the configured request timeout.
    #[must_use]
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_secs.map(Duration::from_secs)
    }

    /// Returns the scenarios to run, in declaration order.
    #[must_use]
    pub fn plan(&self) -> Vec<ScenarioName> {
        if self.scenarios.is_empty() {
            return ScenarioName::ALL.to_vec();
        }
        ScenarioName::ALL.iter().copied().filter(|name| self.scenarios.contains(name)).collect()
    }
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Configuration loading or validation errors.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// I/O failure while reading configuration.
    #[error("config io error: {0}")]
    Io(String),
    /// TOML parsing error.
    #[error("config parse error: {0}")]
    Parse(String),
    /// Invalid configuration data.
    #[error("invalid config: {0}")]
    Invalid(String),
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Resolves the config path from the caller or the environment.
fn resolve_path(path: Option<&Path>) -> Result<Option<PathBuf>, ConfigError> {
    if let Some(path) = path {
        return Ok(Some(path.to_path_buf()));
    }
    let name = SuiteEnv::ConfigPath.as_str();
    match read_env_strict(name)? {
        Some(value) if value.trim().is_empty() => {
            Err(ConfigError::Invalid(format!("{name} must not be empty")))
        }
        Some(value) => Ok(Some(PathBuf::from(value))),
        None => Ok(None),
    }
}
