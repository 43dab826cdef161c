// crates/customer-contract/src/error.rs
// ============================================================================
// Module: Contract Errors
// Description: Failure taxonomy for suite setup and scenario execution.
// Purpose: Classify assertion, transport, and decode failures distinctly.
// Dependencies: reqwest, thiserror
// ============================================================================

//! ## Overview
//! Every scenario failure is terminal for that scenario and never retried.
//! The variants here let the report say which kind of failure occurred.

use std::io;

use thiserror::Error;

use crate::config::ConfigError;
use crate::scenarios::ScenarioName;

/// Errors raised while setting up or running the contract suite.
#[derive(Debug, Error)]
pub enum ContractError {
    /// Configuration could not be loaded or validated.
    #[error(transparent)]
    Config(#[from] ConfigError),
    /// The HTTP client could not be constructed.
    #[error("failed to build http client: {0}")]
    ClientBuild(#[source] reqwest::Error),
    /// The request never produced a response.
    #[error("{operation} failed: {source}")]
    Transport {
        /// Request label, e.g. `GET /customer/5`.
        operation: String,
        /// Underlying transport error.
        #[source]
        source: reqwest::Error,
    },
    /// The response body did not match the expected JSON shape.
    #[error("{operation} returned an undecodable body: {message}")]
    Decode {
        /// Request label.
        operation: String,
        /// Decoder message with a body excerpt.
        message: String,
    },
    /// An enforced check did not hold.
    #[error("{scenario}: {check} expected {expected}, got {actual}")]
    Assertion {
        /// Scenario that owns the check.
        scenario: ScenarioName,
        /// Check label.
        check: String,
        /// Expected value, rendered.
        expected: String,
        /// Observed value, rendered.
        actual: String,
    },
    /// The fixture seeder failed.
    #[error("fixture seeding failed: {0}")]
    Seed(String),
    /// The suite client was used after teardown.
    #[error("suite client already released")]
    Released,
    /// Report artifacts could not be written.
    #[error("report io error: {0}")]
    Report(#[from] io::Error),
}

impl ContractError {
    /// Returns a stable label for the failure class.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Config(_) => "config",
            Self::ClientBuild(_) => "client_build",
            Self::Transport {
                ..
            } => "transport",
            Self::Decode {
                ..
            } => "decode",
            Self::Assertion {
                ..
            } => "assertion",
            Self::Seed(_) => "seed",
            Self::Released => "released",
            Self::Report(_) => "report",
        }
    }
}
