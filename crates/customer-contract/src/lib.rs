// crates/customer-contract/src/lib.rs
// ============================================================================
// Module: Customer Contract Library
// Description: Contract verification suite for the customer REST resource.
// Purpose: Run CRUD scenarios against a customer API and report outcomes.
// Dependencies: reqwest, serde, serde_json, thiserror, toml, url
// ============================================================================

//! ## Overview
//! This crate verifies that a customer REST API honors its contract: each
//! scenario issues HTTP calls through one shared client and checks the status
//! code and JSON payload against a canonical fixture dataset.
//!
//! The suite is acquired with [`ContractSuite::setup`] and released on
//! [`ContractSuite::teardown`] or on drop, so a failing scenario never leaks
//! the client. Strictness is selected with [`SuiteMode`].

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod checks;
pub mod client;
pub mod config;
pub mod customer;
pub mod error;
pub mod events;
pub mod fixtures;
pub mod report;
pub mod scenarios;
pub mod suite;

// ============================================================================
// SECTION: Re-exports
// ============================================================================

pub use client::ApiResponse;
pub use client::CustomerApiClient;
pub use client::TranscriptEntry;
pub use config::ConfigError;
pub use config::EventLogTarget;
pub use config::SuiteConfig;
pub use config::SuiteMode;
pub use customer::Customer;
pub use customer::NewCustomer;
pub use error::ContractError;
pub use fixtures::FixtureLedger;
pub use fixtures::FixtureSeeder;
pub use fixtures::FixtureSet;
pub use fixtures::NoopSeeder;
pub use scenarios::ScenarioFailure;
pub use scenarios::ScenarioName;
pub use scenarios::ScenarioOutcome;
pub use scenarios::ScenarioStatus;
pub use suite::ContractSuite;
pub use suite::SuiteReport;
