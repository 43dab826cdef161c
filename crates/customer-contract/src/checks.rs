// crates/customer-contract/src/checks.rs
// ============================================================================
// Module: Scenario Checks
// Description: Mode-aware equality checks with observation capture.
// Purpose: Decide per check whether a mismatch fails the scenario or is logged.
// Dependencies: serde
// ============================================================================

//! ## Overview
//! Each check carries an [`Enforcement`]. In strict mode every mismatch is an
//! assertion failure. In diagnostic mode only [`Enforcement::Always`] checks
//! fail; the rest are recorded and emitted as `check_observed` events.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fmt;

use serde::Serialize;

use crate::client::ApiResponse;
use crate::config::SuiteMode;
use crate::customer::Customer;
use crate::customer::NewCustomer;
use crate::error::ContractError;
use crate::events::SuiteEvent;
use crate::events::SuiteEventKind;
use crate::events::SuiteEventSink;
use crate::scenarios::ScenarioName;

// ============================================================================
// SECTION: Types
// ============================================================================

/// When a check mismatch fails its scenario.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Enforcement {
    /// Fails in every mode.
    Always,
    /// Fails in strict mode; logged in diagnostic mode.
    StrictOnly,
}

/// Result of one evaluated check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CheckRecord {
    /// Check label.
    pub check: String,
    /// Enforcement level.
    pub enforcement: Enforcement,
    /// Whether expected and actual matched.
    pub passed: bool,
    /// Expected value, rendered.
    pub expected: String,
    /// Observed value, rendered.
    pub actual: String,
}

/// Check recorder for one scenario execution.
pub struct Checks<'a> {
    /// Scenario that owns the checks.
    scenario: ScenarioName,
    /// Active strictness.
    mode: SuiteMode,
    /// Destination for observed mismatches.
    sink: &'a dyn SuiteEventSink,
    /// Evaluated checks, in order.
    records: Vec<CheckRecord>,
    /// Status of the last response passed to [`Checks::expect_status`].
    last_status: Option<u16>,
}

impl<'a> Checks<'a> {
    /// Starts a recorder.
    #[must_use]
    pub fn new(scenario: ScenarioName, mode: SuiteMode, sink: &'a dyn SuiteEventSink) -> Self {
        Self {
            scenario,
            mode,
            sink,
            records: Vec::new(),
            last_status: None,
        }
    }

    /// Checks that two values are equal.
    ///
    /// # Errors
    ///
    /// Returns [`ContractError::Assertion`] when the values differ and the
    /// check is enforced in the active mode.
    pub fn expect_eq<T>(
        &mut self,
        check: &str,
        enforcement: Enforcement,
        expected: &T,
        actual: &T,
    ) -> Result<(), ContractError>
    where
        T: PartialEq + fmt::Display + ?Sized,
    {
        self.evaluate(
            check,
            enforcement,
            expected == actual,
            expected.to_string(),
            actual.to_string(),
        )
    }

    /// Checks a predicate whose values were rendered by the caller.
    ///
    /// # Errors
    ///
    /// Returns [`ContractError::Assertion`] when `passed` is false and the
    /// check is enforced in the active mode.
    pub fn expect_that(
        &mut self,
        check: &str,
        enforcement: Enforcement,
        passed: bool,
        expected: &str,
        actual: String,
    ) -> Result<(), ContractError> {
        self.evaluate(check, enforcement, passed, expected.to_string(), actual)
    }

    /// Checks a response status code. Status checks are always enforced.
    ///
    /// # Errors
    ///
    /// Returns [`ContractError::Assertion`] when the status differs.
    pub fn expect_status(
        &mut self,
        response: &ApiResponse,
        expected: u16,
    ) -> Result<(), ContractError> {
        self.last_status = Some(response.status);
        self.expect_eq("status", Enforcement::Always, &expected, &response.status)
    }

    /// Checks the three data fields of a customer against submitted values.
    ///
    /// # Errors
    ///
    /// Returns [`ContractError::Assertion`] on the first enforced mismatch.
    pub fn expect_fields(
        &mut self,
        prefix: &str,
        enforcement: Enforcement,
        expected: &NewCustomer,
        actual: &Customer,
    ) -> Result<(), ContractError> {
        self.expect_eq(
            &format!("{prefix}.firstName"),
            enforcement,
            expected.first_name.as_str(),
            actual.first_name.as_str(),
        )?;
        self.expect_eq(
            &format!("{prefix}.lastName"),
            enforcement,
            expected.last_name.as_str(),
            actual.last_name.as_str(),
        )?;
        self.expect_eq(
            &format!("{prefix}.email"),
            enforcement,
            expected.email.as_str(),
            actual.email.as_str(),
        )
    }

    /// Checks a whole customer record, identifier included.
    ///
    /// # Errors
    ///
    /// Returns [`ContractError::Assertion`] on the first enforced mismatch.
    pub fn expect_customer(
        &mut self,
        prefix: &str,
        enforcement: Enforcement,
        expected: &Customer,
        actual: &Customer,
    ) -> Result<(), ContractError> {
        self.expect_eq(&format!("{prefix}.id"), enforcement, &expected.id, &actual.id)?;
        self.expect_fields(prefix, enforcement, &expected.fields(), actual)
    }

    /// Returns the status of the last checked response, even when it
    /// mismatched.
    #[must_use]
    pub const fn last_status(&self) -> Option<u16> {
        self.last_status
    }

    /// Returns the evaluated checks.
    #[must_use]
    pub fn into_records(self) -> Vec<CheckRecord> {
        self.records
    }

    /// Records a check and applies the enforcement rule.
    fn evaluate(
        &mut self,
        check: &str,
        enforcement: Enforcement,
        passed: bool,
        expected: String,
        actual: String,
    ) -> Result<(), ContractError> {
        self.records.push(CheckRecord {
            check: check.to_string(),
            enforcement,
            passed,
            expected: expected.clone(),
            actual: actual.clone(),
        });
        if passed {
            return Ok(());
        }
        if self.is_enforced(enforcement) {
            return Err(ContractError::Assertion {
                scenario: self.scenario,
                check: check.to_string(),
                expected,
                actual,
            });
        }
        self.sink.record(&SuiteEvent::new(SuiteEventKind::CheckObserved {
            scenario: self.scenario,
            check: check.to_string(),
            expected,
            actual,
        }));
        Ok(())
    }

    /// Returns true when a mismatch at this level fails the scenario.
    const fn is_enforced(&self, enforcement: Enforcement) -> bool {
        match (self.mode, enforcement) {
            (_, Enforcement::Always) | (SuiteMode::Strict, Enforcement::StrictOnly) => true,
            (SuiteMode::Diagnostic, Enforcement::StrictOnly) => false,
        }
    }
}
