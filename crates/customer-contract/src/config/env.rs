// crates/customer-contract/src/config/env.rs
// ============================================================================
// Module: Suite Environment
// Description: Environment-backed overrides for the contract suite.
// Purpose: Centralize env parsing with strict UTF-8 validation.
// Dependencies: std
// ============================================================================

//! ## Overview
//! Environment values are parsed with strict UTF-8 enforcement to avoid silent
//! misconfiguration. Invalid UTF-8 and empty values fail closed.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::path::PathBuf;

use super::settings::ConfigError;
use super::settings::SuiteConfig;
use super::settings::SuiteMode;

// ============================================================================
// SECTION: Environment Constants
// ============================================================================

/// Environment keys for suite configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SuiteEnv {
    /// Optional TOML configuration path.
    ConfigPath,
    /// Base URL override.
    BaseUrl,
    /// Mode override (`strict` or `diagnostic`).
    Mode,
    /// Bearer token override.
    AuthToken,
    /// Accept-JSON header switch (`true`/`false` or `1`/`0`).
    AcceptJson,
    /// Timeout override in seconds (positive integer).
    TimeoutSeconds,
    /// Report output directory override.
    RunRoot,
}

impl SuiteEnv {
    /// Every key, in documentation order.
    pub const ALL: [Self; 7] = [
        Self::ConfigPath,
        Self::BaseUrl,
        Self::Mode,
        Self::AuthToken,
        Self::AcceptJson,
        Self::TimeoutSeconds,
        Self::RunRoot,
    ];

    /// Returns the canonical environment variable name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::ConfigPath => "CUSTOMER_CONTRACT_CONFIG",
            Self::BaseUrl => "CUSTOMER_CONTRACT_BASE_URL",
            Self::Mode => "CUSTOMER_CONTRACT_MODE",
            Self::AuthToken => "CUSTOMER_CONTRACT_AUTH_TOKEN",
            Self::AcceptJson => "CUSTOMER_CONTRACT_ACCEPT_JSON",
            Self::TimeoutSeconds => "CUSTOMER_CONTRACT_TIMEOUT_SEC",
            Self::RunRoot => "CUSTOMER_CONTRACT_RUN_ROOT",
        }
    }
}

// ============================================================================
// SECTION: Overrides
// ============================================================================

/// Applies environment overrides on top of an existing configuration.
///
/// # Errors
///
/// Returns an error when an environment value is not valid UTF-8, is empty,
/// or fails validation (for example, an invalid timeout or boolean value).
pub fn apply_env_overrides(config: &mut SuiteConfig) -> Result<(), ConfigError> {
    if let Some(base_url) = read_env_nonempty(SuiteEnv::BaseUrl.as_str())? {
        config.base_url = base_url;
    }
    if let Some(mode) = read_env_nonempty(SuiteEnv::Mode.as_str())? {
        config.mode = mode.parse::<SuiteMode>()?;
    }
    if let Some(token) = read_env_nonempty(SuiteEnv::AuthToken.as_str())? {
        config.auth_token = Some(token);
    }
    if let Some(accept) = parse_bool_env(
        SuiteEnv::AcceptJson.as_str(),
        read_env_nonempty(SuiteEnv::AcceptJson.as_str())?,
    )? {
        config.accept_json = accept;
    }
    if let Some(raw) = read_env_nonempty(SuiteEnv::TimeoutSeconds.as_str())? {
        config.timeout_secs = Some(parse_timeout_seconds(SuiteEnv::TimeoutSeconds.as_str(), &raw)?);
    }
    if let Some(run_root) = read_env_nonempty(SuiteEnv::RunRoot.as_str())? {
        config.run_root = Some(PathBuf::from(run_root));
    }
    Ok(())
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Reads an environment variable and enforces UTF-8 validity.
///
/// # Errors
///
/// Returns an error when the environment variable contains invalid UTF-8.
pub fn read_env_strict(name: &str) -> Result<Option<String>, ConfigError> {
    std::env::var_os(name).map_or(Ok(None), |raw| {
        raw.into_string()
            .map(Some)
            .map_err(|_| ConfigError::Invalid(format!("{name} must be valid UTF-8")))
    })
}

/// Reads an environment variable and rejects empty values.
fn read_env_nonempty(name: &str) -> Result<Option<String>, ConfigError> {
    match read_env_strict(name)? {
        Some(value) if value.trim().is_empty() => {
            Err(ConfigError::Invalid(format!("{name} must not be empty")))
        }
        Some(value) => Ok(Some(value)),
        None => Ok(None),
    }
}

/// Parses a positive number of seconds.
fn parse_timeout_seconds(name: &str, raw: &str) -> Result<u64, ConfigError> {
    let secs: u64 = raw.trim().parse().map_err(|_| {
        ConfigError::Invalid(format!("{name} must be a positive integer number of seconds"))
    })?;
    if secs == 0 {
        return Err(ConfigError::Invalid(format!("{name} must be greater than zero")));
    }
    Ok(secs)
}

/// Parses an optional boolean environment value.
fn parse_bool_env(name: &str, raw: Option<String>) -> Result<Option<bool>, ConfigError> {
    let Some(value) = raw else {
        return Ok(None);
    };
    let trimmed = value.trim();
    if trimmed.eq_ignore_ascii_case("true") || trimmed == "1" {
        return Ok(Some(true));
    }
    if trimmed.eq_ignore_ascii_case("false") || trimmed == "0" {
        return Ok(Some(false));
    }
    Err(ConfigError::Invalid(format!("{name} must be 1, 0, true, or false")))
}
