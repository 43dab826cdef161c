// crates/customer-contract/src/events.rs
// ============================================================================
// Module: Suite Events
// Description: Structured JSON-line events for suite lifecycle and checks.
// Purpose: Emit run logs without binding the suite to a logging backend.
// Dependencies: serde, serde_json
// ============================================================================

//! ## Overview
//! This module defines event payloads and sinks for suite logging. Events are
//! serialized as one JSON object per line so operators can route them to any
//! log pipeline. Diagnostic-mode mismatches surface here as `check_observed`.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fs::OpenOptions;
use std::io;
use std::io::Write;
use std::path::Path;
use std::sync::Arc;
use std::sync::Mutex;
use std::time::SystemTime;
use std::time::UNIX_EPOCH;

use serde::Serialize;

use crate::config::EventLogTarget;
use crate::config::SuiteConfig;
use crate::config::SuiteMode;
use crate::scenarios::ScenarioName;
use crate::scenarios::ScenarioStatus;

// ============================================================================
// SECTION: Types
// ============================================================================

/// Event kinds emitted during a suite run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum SuiteEventKind {
    /// Client acquired and fixtures prepared.
    SuiteSetup {
        /// Base URL under test.
        base_url: String,
        /// Check strictness.
        mode: SuiteMode,
    },
    /// A scenario is about to issue requests.
    ScenarioStarted {
        /// Scenario identifier.
        scenario: ScenarioName,
    },
    /// A check mismatched without failing the scenario.
    CheckObserved {
        /// Scenario identifier.
        scenario: ScenarioName,
        /// Check label.
        check: String,
        /// Expected value, rendered.
        expected: String,
        /// Observed value, rendered.
        actual: String,
    },
    /// A scenario completed.
    ScenarioFinished {
        /// Scenario identifier.
        scenario: ScenarioName,
        /// Final status.
        status: ScenarioStatus,
        /// HTTP status of the last response, when one arrived.
        http_status: Option<u16>,
        /// Failure class label when failed.
        error_kind: Option<&'static str>,
        /// Failure message when failed.
        error: Option<String>,
        /// Wall-clock duration.
        duration_ms: u64,
    },
    /// Client released.
    SuiteTeardown {
        /// Scenarios run before teardown.
        scenarios_run: usize,
        /// Scenarios that failed.
        scenarios_failed: usize,
    },
}

/// Timestamped suite event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SuiteEvent {
    /// Event timestamp (milliseconds since epoch).
    pub timestamp_ms: u64,
    /// Event payload.
    #[serde(flatten)]
    pub kind: SuiteEventKind,
}

impl SuiteEvent {
    /// Creates a new event with a consistent timestamp.
    #[must_use]
    pub fn new(kind: SuiteEventKind) -> Self {
        let millis = SystemTime::now().duration_since(UNIX_EPOCH).unwrap_or_default().as_millis();
        let timestamp_ms = u64::try_from(millis).unwrap_or(u64::MAX);
        Self {
            timestamp_ms,
            kind,
        }
    }
}

// ============================================================================
// SECTION: Trait
// ============================================================================

/// Sink for suite events.
pub trait SuiteEventSink: Send + Sync {
    /// Record an event.
    fn record(&self, event: &SuiteEvent);
}

/// Sink that logs JSON lines to stderr.
pub struct StderrEventSink;

impl SuiteEventSink for StderrEventSink {
    fn record(&self, event: &SuiteEvent) {
        if let Ok(payload) = serde_json::to_string(event) {
            let _ = writeln!(std::io::stderr(), "{payload}");
        }
    }
}

/// Sink that appends JSON lines to a file.
pub struct FileEventSink {
    /// File handle used for append-only logging.
    file: Mutex<std::fs::File>,
}

impl FileEventSink {
    /// Opens the event log in append mode.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be opened.
    pub fn new(path: &Path) -> io::Result<Self> {
        let file = OpenOptions::new().create(true).append(true).open(path)?;
        Ok(Self {
            file: Mutex::new(file),
        })
    }
}

impl SuiteEventSink for FileEventSink {
    fn record(&self, event: &SuiteEvent) {
        if let Ok(payload) = serde_json::to_string(event)
            && let Ok(mut file) = self.file.lock()
        {
            let _ = writeln!(file, "{payload}");
            let _ = file.flush();
        }
    }
}

/// Sink that keeps events in memory.
#[derive(Default, Clone)]
pub struct MemoryEventSink {
    /// Recorded events shared across clones.
    events: Arc<Mutex<Vec<SuiteEvent>>>,
}

impl MemoryEventSink {
    /// Returns a snapshot of recorded events.
    #[must_use]
    pub fn events(&self) -> Vec<SuiteEvent> {
        self.events.lock().map_or_else(|_| Vec::new(), |events| events.clone())
    }
}

impl SuiteEventSink for MemoryEventSink {
    fn record(&self, event: &SuiteEvent) {
        if let Ok(mut events) = self.events.lock() {
            events.push(event.clone());
        }
    }
}

/// No-op event sink.
pub struct NoopEventSink;

impl SuiteEventSink for NoopEventSink {
    fn record(&self, _event: &SuiteEvent) {}
}

// ============================================================================
// SECTION: Construction
// ============================================================================

/// Builds the sink selected by configuration.
///
/// # Errors
///
/// Returns an error when the file sink cannot open its log.
pub fn sink_from_config(config: &SuiteConfig) -> io::Result<Arc<dyn SuiteEventSink>> {
    match (config.event_log, &config.event_log_path) {
        (EventLogTarget::Stderr, _) => Ok(Arc::new(StderrEventSink)),
        (EventLogTarget::None, _) => Ok(Arc::new(NoopEventSink)),
        (EventLogTarget::File, Some(path)) => Ok(Arc::new(FileEventSink::new(path)?)),
        (EventLogTarget::File, None) => Err(io::Error::new(
            io::ErrorKind::InvalidInput,
            "event_log_path is required for the file event sink",
        )),
    }
}
