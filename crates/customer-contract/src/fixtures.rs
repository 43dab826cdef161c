// crates/customer-contract/src/fixtures.rs
// ============================================================================
// Module: Fixture Data
// Description: Canonical customer dataset and seed/reset hook.
// Purpose: Pin the rows scenarios rely on and track in-run mutations.
// Dependencies: async-trait
// ============================================================================

//! ## Overview
//! Scenarios assume the server already holds a known dataset. [`FixtureSet`]
//! pins that dataset and the scenario inputs, [`FixtureSeeder`] is the hook an
//! operator implements to (re)provision the server before a run, and
//! [`FixtureLedger`] tracks the rows a run itself created or deleted so the
//! expected collection size stays accurate.
//!
//! Without a real seeder, mutating scenarios leave the server changed and a
//! second run against the same server will not match the fixture set.

// ============================================================================
// SECTION: Imports
// ============================================================================

use async_trait::async_trait;

use crate::customer::Customer;
use crate::customer::NewCustomer;
use crate::error::ContractError;

// ============================================================================
// SECTION: Fixture Set
// ============================================================================

/// Dataset and scenario inputs the suite verifies against.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FixtureSet {
    /// Rows seeded on the server, in collection order.
    pub rows: Vec<Customer>,
    /// Body submitted by the create scenario.
    pub create_input: NewCustomer,
    /// Body submitted by the create-then-get scenario.
    pub round_trip_input: NewCustomer,
    /// Identifier read by the get-one scenario.
    pub get_one_id: i64,
    /// Identifier removed by the delete scenario.
    pub delete_id: i64,
    /// Identifier rewritten by the update scenarios.
    pub update_id: i64,
    /// Replacement fields submitted by the update scenarios.
    pub update_input: NewCustomer,
}

impl FixtureSet {
    /// Returns the canonical dataset.
    #[must_use]
    pub fn canonical() -> Self {
        Self {
            rows: vec![
                Customer::new(1, "John", "Doe", "john.doe@example.com"),
                Customer::new(2, "Jane", "Smith", "jane.smith@example.com"),
                Customer::new(3, "Alice", "Jones", "alice.jones@example.com"),
                Customer::new(4, "Michael", "Brown", "michael.brown@example.com"),
                Customer::new(5, "Emily", "Davis", "emily.davis@example.com"),
                Customer::new(6, "David", "Wilson", "david.wilson@example.com"),
                Customer::new(7, "Sarah", "Taylor", "sarah.taylor@example.com"),
            ],
            create_input: NewCustomer::new("PlaywrightF1", "PlaywrightL1", "email1@email.com"),
            round_trip_input: NewCustomer::new("PlaywrightF2", "PlaywrightL2", "email2@email.com"),
            get_one_id: 5,
            delete_id: 6,
            update_id: 7,
            update_input: NewCustomer::new("Baraneetharan", "Ramasamy", "baranee@email.com"),
        }
    }

    /// Returns the seeded row for an identifier.
    #[must_use]
    pub fn row(&self, id: i64) -> Option<&Customer> {
        self.rows.iter().find(|row| row.id == id)
    }

    /// Returns the first seeded row in collection order.
    #[must_use]
    pub fn first(&self) -> Option<&Customer> {
        self.rows.first()
    }

    /// Returns the `PUT` body for the update scenarios.
    #[must_use]
    pub fn update_body(&self) -> Customer {
        self.update_input.clone().with_id(self.update_id)
    }
}

impl Default for FixtureSet {
    fn default() -> Self {
        Self::canonical()
    }
}

// ============================================================================
// SECTION: Ledger
// ============================================================================

/// Mutations a run has confirmed against the server.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FixtureLedger {
    /// Rows present when the run started.
    seeded: usize,
    /// Identifiers the run created.
    created: Vec<i64>,
    /// Identifiers the run deleted.
    deleted: Vec<i64>,
}

impl FixtureLedger {
    /// Starts a ledger for a freshly seeded dataset.
    #[must_use]
    pub fn new(fixtures: &FixtureSet) -> Self {
        Self {
            seeded: fixtures.rows.len(),
            created: Vec::new(),
            deleted: Vec::new(),
        }
    }

    /// Records a server-confirmed creation.
    pub fn record_created(&mut self, id: i64) {
        if !self.created.contains(&id) {
            self.created.push(id);
        }
    }

    /// Records a server-confirmed deletion.
    pub fn record_deleted(&mut self, id: i64) {
        if !self.deleted.contains(&id) {
            self.deleted.push(id);
        }
    }

    /// Returns identifiers created during the run.
    #[must_use]
    pub fn created(&self) -> &[i64] {
        &self.created
    }

    /// Returns identifiers deleted during the run.
    #[must_use]
    pub fn deleted(&self) -> &[i64] {
        &self.deleted
    }

    /// Returns the collection size the server should report now.
    #[must_use]
    pub fn expected_rows(&self) -> usize {
        self.seeded.saturating_add(self.created.len()).saturating_sub(self.deleted.len())
    }
}

// ============================================================================
// SECTION: Seeder
// ============================================================================

/// Provisions the server with a fixture set before a run.
#[async_trait]
pub trait FixtureSeeder: Send + Sync {
    /// Resets the server so it holds exactly `fixtures.rows`.
    ///
    /// # Errors
    ///
    /// Returns [`ContractError::Seed`] when provisioning fails.
    async fn reset(&self, fixtures: &FixtureSet) -> Result<(), ContractError>;

    /// Returns true when the seeder does not touch the server.
    fn is_noop(&self) -> bool {
        false
    }
}

/// Seeder for servers provisioned out of band.
pub struct NoopSeeder;

#[async_trait]
impl FixtureSeeder for NoopSeeder {
    async fn reset(&self, _fixtures: &FixtureSet) -> Result<(), ContractError> {
        Ok(())
    }

    fn is_noop(&self) -> bool {
        true
    }
}
