// crates/customer-contract/src/config/mod.rs
// ============================================================================
// Module: Suite Configuration
// Description: Centralized configuration for the customer contract suite.
// Purpose: Provide typed access to TOML, environment, and default settings.
// Dependencies: serde, toml, url, reqwest
// ============================================================================

//! ## Overview
//! Suite configuration is layered: built-in defaults, an optional TOML file,
//! then environment variables. The result is validated once and stays
//! immutable for the lifetime of a suite run.

// ============================================================================
// SECTION: Modules
// ============================================================================

mod env;
mod settings;

// ============================================================================
// SECTION: Tests
// ============================================================================


// ============================================================================
// SECTION: Re-exports
// ============================================================================

pub use env::SuiteEnv;
pub use env::apply_env_overrides;
pub use env::read_env_strict;
pub use settings::ConfigError;
pub use settings::DEFAULT_BASE_URL;
pub use settings::EventLogTarget;
pub use settings::SuiteConfig;
pub use settings::SuiteMode;
