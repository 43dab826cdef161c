// crates/customer-contract/tests/helpers/mod.rs
// ============================================================================
// Module: Contract Test Helpers
// Description: Shared helpers for customer contract integration tests.
// Purpose: Provide the customer stub and suite construction shortcuts.
// Dependencies: customer-contract, axum
// ============================================================================

//! ## Overview
//! Shared helpers for customer contract integration tests.
//! Invariants:
//! - Each test spawns its own stub on an ephemeral port.
//! - Stub state is reset through the fixture seeder before scenarios run.

#![allow(dead_code, reason = "Shared helpers are reused across multiple test suites.")]

pub mod customer_stub;
pub mod harness;
