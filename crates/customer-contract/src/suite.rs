// crates/customer-contract/src/suite.rs
// ============================================================================
// Module: Contract Suite
// Description: Scoped suite lifecycle around one shared HTTP client.
// Purpose: Run scenarios in declaration order and release the client always.
// Dependencies: serde
// ============================================================================

//! ## Overview
//! [`ContractSuite`] is the RAII handle for a run: [`ContractSuite::setup`]
//! builds the client and seeds fixtures, scenarios run one at a time on the
//! shared client, and the client is released by [`ContractSuite::teardown`]
//! or, if the caller bails out early or panics, by `Drop`.
//!
//! A failing scenario never aborts its siblings; [`ContractSuite::run_all`]
//! records the failure and moves on.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::sync::Arc;
use std::time::Instant;
use std::time::SystemTime;
use std::time::UNIX_EPOCH;

use serde::Serialize;

use crate::client::CustomerApiClient;
use crate::client::TranscriptEntry;
use crate::config::SuiteConfig;
use crate::config::SuiteMode;
use crate::error::ContractError;
use crate::events::SuiteEvent;
use crate::events::SuiteEventKind;
use crate::events::SuiteEventSink;
use crate::events::sink_from_config;
use crate::fixtures::FixtureLedger;
use crate::fixtures::FixtureSeeder;
use crate::fixtures::FixtureSet;
use crate::fixtures::NoopSeeder;
use crate::scenarios::ScenarioContext;
use crate::scenarios::ScenarioFailure;
use crate::scenarios::ScenarioName;
use crate::scenarios::ScenarioOutcome;
use crate::scenarios::run_scenario;

// ============================================================================
// SECTION: Report
// ============================================================================

/// Aggregated result of a suite run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SuiteReport {
    /// Base URL under test.
    pub base_url: String,
    /// Check strictness.
    pub mode: SuiteMode,
    /// Run start (milliseconds since epoch).
    pub started_at_ms: u64,
    /// Report time (milliseconds since epoch).
    pub ended_at_ms: u64,
    /// Scenario outcomes in execution order.
    pub outcomes: Vec<ScenarioOutcome>,
    /// Operator-facing notes about the run.
    pub notes: Vec<String>,
    /// Request/response transcript.
    #[serde(skip)]
    pub transcript: Vec<TranscriptEntry>,
}

impl SuiteReport {
    /// Returns true when no scenario failed.
    #[must_use]
    pub fn passed(&self) -> bool {
        self.outcomes.iter().all(ScenarioOutcome::is_pass)
    }

    /// Returns the number of failed scenarios.
    #[must_use]
    pub fn failed_count(&self) -> usize {
        self.outcomes.iter().filter(|outcome| !outcome.is_pass()).count()
    }

    /// Returns the latest outcome for a scenario.
    #[must_use]
    pub fn outcome(&self, name: ScenarioName) -> Option<&ScenarioOutcome> {
        self.outcomes.iter().rev().find(|outcome| outcome.scenario == name)
    }
}

// ============================================================================
// SECTION: Suite
// ============================================================================

/// Scoped handle owning the shared client for one run.
pub struct ContractSuite {
    /// Validated configuration.
    config: SuiteConfig,
    /// Dataset and scenario inputs.
    fixtures: FixtureSet,
    /// Shared client; `None` once released.
    client: Option<CustomerApiClient>,
    /// Event destination.
    sink: Arc<dyn SuiteEventSink>,
    /// Mutations confirmed during the run.
    ledger: FixtureLedger,
    /// Outcomes recorded so far.
    outcomes: Vec<ScenarioOutcome>,
    /// Transcript captured at release.
    released_transcript: Vec<TranscriptEntry>,
    /// Operator-facing notes.
    notes: Vec<String>,
    /// Run start (milliseconds since epoch).
    started_at_ms: u64,
}

impl ContractSuite {
    /// Acquires the client, seeds fixtures, and emits `suite_setup`.
    ///
    /// # Errors
    ///
    /// Returns an error when configuration is invalid, the client cannot be
    /// built, or the seeder fails.
    pub async fn setup(
        config: SuiteConfig,
        fixtures: FixtureSet,
        seeder: &dyn FixtureSeeder,
        sink: Arc<dyn SuiteEventSink>,
    ) -> Result<Self, ContractError> {
        config.validate()?;
        let client = CustomerApiClient::new(&config)?;
        seeder.reset(&fixtures).await?;
        let mut notes = Vec::new();
        if seeder.is_noop() {
            notes.push(
                "fixtures assumed pre-seeded; create, delete, and update leave the server mutated"
                    .to_string(),
            );
        }
        sink.record(&SuiteEvent::new(SuiteEventKind::SuiteSetup {
            base_url: config.base_url.clone(),
            mode: config.mode,
        }));
        let ledger = FixtureLedger::new(&fixtures);
        Ok(Self {
            config,
            fixtures,
            client: Some(client),
            sink,
            ledger,
            outcomes: Vec::new(),
            released_transcript: Vec::new(),
            notes,
            started_at_ms: now_millis(),
        })
    }

    /// Sets up a suite with the canonical fixtures, no seeding, and the
    /// configured event sink.
    ///
    /// # Errors
    ///
    /// Returns an error when the event sink cannot be opened or setup fails.
    pub async fn from_config(config: SuiteConfig) -> Result<Self, ContractError> {
        let sink = sink_from_config(&config)?;
        Self::setup(config, FixtureSet::canonical(), &NoopSeeder, sink).await
    }

    /// Returns the active configuration.
    #[must_use]
    pub const fn config(&self) -> &SuiteConfig {
        &self.config
    }

    /// Returns the fixture set.
    #[must_use]
    pub const fn fixtures(&self) -> &FixtureSet {
        &self.fixtures
    }

    /// Returns the run's mutation ledger.
    #[must_use]
    pub const fn ledger(&self) -> &FixtureLedger {
        &self.ledger
    }

    /// Returns the shared client.
    ///
    /// # Errors
    ///
    /// Returns [`ContractError::Released`] after teardown.
    pub fn client(&self) -> Result<&CustomerApiClient, ContractError> {
        self.client.as_ref().ok_or(ContractError::Released)
    }

    /// Returns true while the client is held.
    #[must_use]
    pub const fn is_active(&self) -> bool {
        self.client.is_some()
    }

    /// Runs one scenario and records its outcome.
    ///
    /// # Errors
    ///
    /// Returns the scenario's failure; the failure is also recorded.
    pub async fn run(&mut self, name: ScenarioName) -> Result<ScenarioOutcome, ContractError> {
        self.sink.record(&SuiteEvent::new(SuiteEventKind::ScenarioStarted {
            scenario: name,
        }));
        let started = Instant::now();
        let (mut outcome, result) = match self.client.as_ref() {
            Some(client) => {
                let ctx = ScenarioContext {
                    client,
                    mode: self.config.mode,
                    fixtures: &self.fixtures,
                    sink: self.sink.as_ref(),
                };
                match run_scenario(name, &ctx, &mut self.ledger).await {
                    Ok(outcome) => (outcome, Ok(())),
                    Err(failure) => {
                        let ScenarioFailure {
                            outcome,
                            error,
                        } = *failure;
                        (outcome, Err(error))
                    }
                }
            }
            None => {
                let outcome = ScenarioOutcome::failed(name, &ContractError::Released);
                (outcome, Err(ContractError::Released))
            }
        };
        let duration_ms = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX);
        outcome.duration_ms = duration_ms;
        self.sink.record(&SuiteEvent::new(SuiteEventKind::ScenarioFinished {
            scenario: name,
            status: outcome.status,
            http_status: outcome.http_status,
            error_kind: outcome.error_kind,
            error: outcome.error.clone(),
            duration_ms,
        }));
        self.outcomes.push(outcome.clone());
        result.map(|()| outcome)
    }

    /// Runs every planned scenario in declaration order.
    pub async fn run_all(&mut self) -> SuiteReport {
        for name in self.config.plan() {
            let _ = self.run(name).await;
        }
        self.report()
    }

    /// Returns a snapshot report of the run so far.
    #[must_use]
    pub fn report(&self) -> SuiteReport {
        let transcript = self
            .client
            .as_ref()
            .map_or_else(|| self.released_transcript.clone(), CustomerApiClient::transcript);
        SuiteReport {
            base_url: self.config.base_url.clone(),
            mode: self.config.mode,
            started_at_ms: self.started_at_ms,
            ended_at_ms: now_millis(),
            outcomes: self.outcomes.clone(),
            notes: self.notes.clone(),
            transcript,
        }
    }

    /// Releases the client and returns the final report.
    #[must_use]
    pub fn teardown(mut self) -> SuiteReport {
        self.release();
        self.report()
    }

    /// Drops the client and emits `suite_teardown`; later calls are no-ops.
    fn release(&mut self) {
        let Some(client) = self.client.take() else {
            return;
        };
        self.released_transcript = client.transcript();
        drop(client);
        self.sink.record(&SuiteEvent::new(SuiteEventKind::SuiteTeardown {
            scenarios_run: self.outcomes.len(),
            scenarios_failed: self.outcomes.iter().filter(|outcome| !outcome.is_pass()).count(),
        }));
    }
}

impl Drop for ContractSuite {
    fn drop(&mut self) {
        self.release();
    }
}

/// Returns the current time in milliseconds since the epoch.
fn now_millis() -> u64 {
    let millis = SystemTime::now().duration_since(UNIX_EPOCH).unwrap_or_default().as_millis();
    u64::try_from(millis).unwrap_or(u64::MAX)
}
