// crates/customer-contract/src/scenarios.rs
// ============================================================================
// Module: Contract Scenarios
// Description: Request/assert scenarios for the customer resource.
// Purpose: Verify CRUD status codes and payloads against the fixture set.
// Dependencies: serde
// ============================================================================

//! ## Overview
//! Each scenario is a standalone async function taking the shared, read-only
//! [`ScenarioContext`], the scenario's [`Checks`] recorder, and, when it
//! mutates rows, the run's [`FixtureLedger`]. Status codes are always
//! enforced; payload checks are enforced only in strict mode. A failed run
//! keeps the checks evaluated before the failure and the last status seen.
//!
//! Declaration order matters: `create` runs before `list`, so the ledger
//! folds the new row into the expected collection size.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fmt;
use std::str::FromStr;

use serde::Deserialize;
use serde::Serialize;

use crate::checks::CheckRecord;
use crate::checks::Checks;
use crate::checks::Enforcement;
use crate::client::CustomerApiClient;
use crate::config::ConfigError;
use crate::config::SuiteMode;
use crate::customer::Customer;
use crate::error::ContractError;
use crate::events::SuiteEventSink;
use crate::fixtures::FixtureLedger;
use crate::fixtures::FixtureSet;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Status for `POST /customer`.
const STATUS_CREATED: u16 = 201;
/// Status for reads and updates.
const STATUS_OK: u16 = 200;
/// Status for `DELETE /customer/{id}`.
const STATUS_NO_CONTENT: u16 = 204;

// ============================================================================
// SECTION: Types
// ============================================================================

/// Scenario identifiers, in declaration order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ScenarioName {
    /// `POST /customer` echoes the submitted fields.
    Create,
    /// `GET /customer` returns the fixture collection.
    List,
    /// Two `GET /customer` calls return the same order.
    ListStable,
    /// `GET /customer/{id}` returns the fixture row.
    GetOne,
    /// `DELETE /customer/{id}` returns 204 and the row is gone.
    Delete,
    /// `PUT /customer/{id}` echoes the submitted fields.
    Update,
    /// A created row reads back identically.
    CreateThenGet,
    /// Repeating an update yields the same state.
    UpdateIdempotent,
}

impl ScenarioName {
    /// Every scenario in declaration order.
    pub const ALL: [Self; 8] = [
        Self::Create,
        Self::List,
        Self::ListStable,
        Self::GetOne,
        Self::Delete,
        Self::Update,
        Self::CreateThenGet,
        Self::UpdateIdempotent,
    ];

    /// Returns a stable label for the scenario.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Create => "create",
            Self::List => "list",
            Self::ListStable => "list-stable",
            Self::GetOne => "get-one",
            Self::Delete => "delete",
            Self::Update => "update",
            Self::CreateThenGet => "create-then-get",
            Self::UpdateIdempotent => "update-idempotent",
        }
    }
}

impl fmt::Display for ScenarioName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ScenarioName {
    type Err = ConfigError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let trimmed = raw.trim();
        Self::ALL
            .into_iter()
            .find(|name| name.as_str() == trimmed)
            .ok_or_else(|| ConfigError::Invalid(format!("unknown scenario: {trimmed}")))
    }
}

/// Final scenario status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ScenarioStatus {
    /// Every enforced check held.
    Pass,
    /// An enforced check, the transport, or decoding failed.
    Fail,
}

/// Outcome of one scenario.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScenarioOutcome {
    /// Scenario identifier.
    pub scenario: ScenarioName,
    /// Final status.
    pub status: ScenarioStatus,
    /// HTTP status of the last response, when one arrived.
    pub http_status: Option<u16>,
    /// Checks evaluated before completion.
    pub checks: Vec<CheckRecord>,
    /// Failure class label when failed.
    pub error_kind: Option<&'static str>,
    /// Failure message when failed.
    pub error: Option<String>,
    /// Wall-clock duration.
    pub duration_ms: u64,
}

impl ScenarioOutcome {
    /// Builds a passing outcome.
    fn passed(scenario: ScenarioName, checks: Checks<'_>) -> Self {
        Self {
            scenario,
            status: ScenarioStatus::Pass,
            http_status: checks.last_status(),
            checks: checks.into_records(),
            error_kind: None,
            error: None,
            duration_ms: 0,
        }
    }

    /// Builds a failing outcome from an error raised before any check ran.
    #[must_use]
    pub fn failed(scenario: ScenarioName, err: &ContractError) -> Self {
        Self {
            scenario,
            status: ScenarioStatus::Fail,
            http_status: None,
            checks: Vec::new(),
            error_kind: Some(err.kind()),
            error: Some(err.to_string()),
            duration_ms: 0,
        }
    }

    /// Builds a failing outcome that keeps the checks evaluated so far and the
    /// last status received.
    fn interrupted(scenario: ScenarioName, err: &ContractError, checks: Checks<'_>) -> Self {
        Self {
            http_status: checks.last_status(),
            checks: checks.into_records(),
            ..Self::failed(scenario, err)
        }
    }

    /// Returns true when the scenario passed.
    #[must_use]
    pub fn is_pass(&self) -> bool {
        self.status == ScenarioStatus::Pass
    }

    /// Returns checks that mismatched without failing the scenario.
    pub fn observations(&self) -> impl Iterator<Item = &CheckRecord> {
        self.checks.iter().filter(|record| !record.passed)
    }
}

/// A failed scenario run: the recorded outcome plus the error that ended it.
#[derive(Debug)]
pub struct ScenarioFailure {
    /// Outcome with the partial checks and last observed status.
    pub outcome: ScenarioOutcome,
    /// Error that stopped the scenario.
    pub error: ContractError,
}

/// Read-only inputs shared by every scenario in a run.
#[derive(Clone, Copy)]
pub struct ScenarioContext<'a> {
    /// Shared HTTP client.
    pub client: &'a CustomerApiClient,
    /// Check strictness.
    pub mode: SuiteMode,
    /// Dataset and inputs.
    pub fixtures: &'a FixtureSet,
    /// Destination for observed mismatches.
    pub sink: &'a dyn SuiteEventSink,
}

impl<'a> ScenarioContext<'a> {
    /// Starts a check recorder for a scenario.
    #[must_use]
    pub fn checks(&self, scenario: ScenarioName) -> Checks<'a> {
        Checks::new(scenario, self.mode, self.sink)
    }

    /// Returns the fixture row for an identifier.
    fn fixture_row(&self, id: i64) -> Result<&'a Customer, ContractError> {
        self.fixtures.row(id).ok_or_else(|| {
            ContractError::Config(ConfigError::Invalid(format!("fixture set has no row {id}")))
        })
    }
}

// ============================================================================
// SECTION: Dispatch
// ============================================================================

/// Runs one scenario by name.
///
/// # Errors
///
/// Returns the first enforced assertion, transport, or decode failure along
/// with the checks evaluated before it.
pub async fn run_scenario(
    name: ScenarioName,
    ctx: &ScenarioContext<'_>,
    ledger: &mut FixtureLedger,
) -> Result<ScenarioOutcome, Box<ScenarioFailure>> {
    let mut checks = ctx.checks(name);
    let result = match name {
        ScenarioName::Create => create(ctx, &mut checks, ledger).await,
        ScenarioName::List => list(ctx, &mut checks, ledger).await,
        ScenarioName::ListStable => list_stable(ctx, &mut checks).await,
        ScenarioName::GetOne => get_one(ctx, &mut checks).await,
        ScenarioName::Delete => delete(ctx, &mut checks, ledger).await,
        ScenarioName::Update => update(ctx, &mut checks).await,
        ScenarioName::CreateThenGet => create_then_get(ctx, &mut checks, ledger).await,
        ScenarioName::UpdateIdempotent => update_idempotent(ctx, &mut checks).await,
    };
    match result {
        Ok(()) => Ok(ScenarioOutcome::passed(name, checks)),
        Err(error) => Err(Box::new(ScenarioFailure {
            outcome: ScenarioOutcome::interrupted(name, &error, checks),
            error,
        })),
    }
}

// ============================================================================
// SECTION: Scenarios
// ============================================================================

/// `POST /customer` returns 201 and echoes the submitted fields.
///
/// # Errors
///
/// Returns the first enforced assertion, transport, or decode failure.
pub async fn create(
    ctx: &ScenarioContext<'_>,
    checks: &mut Checks<'_>,
    ledger: &mut FixtureLedger,
) -> Result<(), ContractError> {
    let input = &ctx.fixtures.create_input;
    let response = ctx.client.create_customer(input).await?;
    checks.expect_status(&response, STATUS_CREATED)?;
    let created: Customer = response.json()?;
    ledger.record_created(created.id);
    checks.expect_fields("body", Enforcement::StrictOnly, input, &created)
}

/// `GET /customer` returns the live collection with the fixture row first.
///
/// # Errors
///
/// Returns the first enforced assertion, transport, or decode failure.
pub async fn list(
    ctx: &ScenarioContext<'_>,
    checks: &mut Checks<'_>,
    ledger: &FixtureLedger,
) -> Result<(), ContractError> {
    let response = ctx.client.list_customers().await?;
    checks.expect_status(&response, STATUS_OK)?;
    let rows: Vec<Customer> = response.json()?;
    checks.expect_eq(
        "body.length",
        Enforcement::StrictOnly,
        &ledger.expected_rows(),
        &rows.len(),
    )?;
    let Some(expected) = ctx.fixtures.first() else {
        return Ok(());
    };
    match rows.first() {
        Some(actual) => {
            checks.expect_fields("body[0]", Enforcement::StrictOnly, &expected.fields(), actual)
        }
        None => checks.expect_that(
            "body[0]",
            Enforcement::StrictOnly,
            false,
            &format!("customer {}", expected.id),
            "empty collection".to_string(),
        ),
    }
}

/// Two consecutive `GET /customer` calls return the same identifier order.
///
/// # Errors
///
/// Returns the first enforced assertion, transport, or decode failure.
pub async fn list_stable(
    ctx: &ScenarioContext<'_>,
    checks: &mut Checks<'_>,
) -> Result<(), ContractError> {
    let first = ctx.client.list_customers().await?;
    checks.expect_status(&first, STATUS_OK)?;
    let second = ctx.client.list_customers().await?;
    checks.expect_status(&second, STATUS_OK)?;
    let first_rows: Vec<Customer> = first.json()?;
    let second_rows: Vec<Customer> = second.json()?;
    checks.expect_eq(
        "order",
        Enforcement::StrictOnly,
        id_order(&first_rows).as_str(),
        id_order(&second_rows).as_str(),
    )
}

/// `GET /customer/{id}` returns the fixture row.
///
/// # Errors
///
/// Returns the first enforced assertion, transport, or decode failure.
pub async fn get_one(
    ctx: &ScenarioContext<'_>,
    checks: &mut Checks<'_>,
) -> Result<(), ContractError> {
    let expected = ctx.fixture_row(ctx.fixtures.get_one_id)?;
    let response = ctx.client.get_customer(expected.id).await?;
    checks.expect_status(&response, STATUS_OK)?;
    let actual: Customer = response.json()?;
    checks.expect_customer("body", Enforcement::StrictOnly, expected, &actual)
}

/// `DELETE /customer/{id}` returns 204 with an empty body, and the row no
/// longer reads back with 200.
///
/// # Errors
///
/// Returns the first enforced assertion or transport failure.
pub async fn delete(
    ctx: &ScenarioContext<'_>,
    checks: &mut Checks<'_>,
    ledger: &mut FixtureLedger,
) -> Result<(), ContractError> {
    let id = ctx.fixtures.delete_id;
    let response = ctx.client.delete_customer(id).await?;
    checks.expect_status(&response, STATUS_NO_CONTENT)?;
    ledger.record_deleted(id);
    checks.expect_eq("body", Enforcement::StrictOnly, "", response.body.trim())?;
    let follow_up = ctx.client.get_customer(id).await?;
    checks.expect_that(
        "followUp.status",
        Enforcement::StrictOnly,
        follow_up.status != STATUS_OK,
        "non-200",
        follow_up.status.to_string(),
    )
}

/// `PUT /customer/{id}` returns 200 and echoes the submitted fields.
///
/// # Errors
///
/// Returns the first enforced assertion, transport, or decode failure.
pub async fn update(
    ctx: &ScenarioContext<'_>,
    checks: &mut Checks<'_>,
) -> Result<(), ContractError> {
    let body = ctx.fixtures.update_body();
    let response = ctx.client.update_customer(body.id, &body).await?;
    checks.expect_status(&response, STATUS_OK)?;
    let updated: Customer = response.json()?;
    checks.expect_fields("body", Enforcement::StrictOnly, &ctx.fixtures.update_input, &updated)?;
    checks.expect_eq("body.id", Enforcement::StrictOnly, &body.id, &updated.id)
}

/// A created row reads back field-for-field through `GET /customer/{id}`.
///
/// # Errors
///
/// Returns the first enforced assertion, transport, or decode failure.
pub async fn create_then_get(
    ctx: &ScenarioContext<'_>,
    checks: &mut Checks<'_>,
    ledger: &mut FixtureLedger,
) -> Result<(), ContractError> {
    let input = &ctx.fixtures.round_trip_input;
    let created_response = ctx.client.create_customer(input).await?;
    checks.expect_status(&created_response, STATUS_CREATED)?;
    let created: Customer = created_response.json()?;
    ledger.record_created(created.id);
    checks.expect_fields("created", Enforcement::StrictOnly, input, &created)?;
    let fetched_response = ctx.client.get_customer(created.id).await?;
    checks.expect_status(&fetched_response, STATUS_OK)?;
    let fetched: Customer = fetched_response.json()?;
    checks.expect_customer("fetched", Enforcement::StrictOnly, &created, &fetched)
}

/// The same `PUT` issued twice returns 200 and the same object both times.
///
/// # Errors
///
/// Returns the first enforced assertion, transport, or decode failure.
pub async fn update_idempotent(
    ctx: &ScenarioContext<'_>,
    checks: &mut Checks<'_>,
) -> Result<(), ContractError> {
    let body = ctx.fixtures.update_body();
    let first_response = ctx.client.update_customer(body.id, &body).await?;
    checks.expect_status(&first_response, STATUS_OK)?;
    let second_response = ctx.client.update_customer(body.id, &body).await?;
    checks.expect_status(&second_response, STATUS_OK)?;
    let first: Customer = first_response.json()?;
    let second: Customer = second_response.json()?;
    checks.expect_customer("second", Enforcement::StrictOnly, &first, &second)?;
    checks.expect_fields("second", Enforcement::StrictOnly, &ctx.fixtures.update_input, &second)
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Renders the identifier order of a collection.
fn id_order(rows: &[Customer]) -> String {
    let ids: Vec<String> = rows.iter().map(|row| row.id.to_string()).collect();
    format!("[{}]", ids.join(","))
}
