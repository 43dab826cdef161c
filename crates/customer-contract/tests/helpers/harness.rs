// crates/customer-contract/tests/helpers/harness.rs
// ============================================================================
// Module: Suite Harness
// Description: Suite construction helpers for integration tests.
// Purpose: Wire a stub, a memory sink, and configuration into a suite.
// Dependencies: customer-contract
// ============================================================================

use std::net::SocketAddr;
use std::net::TcpListener;
use std::sync::Arc;

use customer_contract::ContractError;
use customer_contract::ContractSuite;
use customer_contract::FixtureSeeder;
use customer_contract::FixtureSet;
use customer_contract::SuiteConfig;
use customer_contract::SuiteMode;
use customer_contract::events::MemoryEventSink;
use customer_contract::events::SuiteEventKind;

use super::customer_stub::CustomerStubHandle;

/// Builds a configuration pointing at `base_url`.
pub fn config_for(base_url: &str, mode: SuiteMode) -> SuiteConfig {
    SuiteConfig {
        base_url: base_url.to_string(),
        mode,
        ..SuiteConfig::default()
    }
}

/// Sets up a suite against the stub, reset to the canonical fixtures.
pub async fn suite_for_stub(
    stub: &CustomerStubHandle,
    config: SuiteConfig,
    sink: &MemoryEventSink,
) -> Result<ContractSuite, ContractError> {
    ContractSuite::setup(config, FixtureSet::canonical(), &stub.seeder(), Arc::new(sink.clone()))
        .await
}

/// Sets up a suite with an explicit seeder.
pub async fn suite_with_seeder(
    config: SuiteConfig,
    seeder: &dyn FixtureSeeder,
    sink: &MemoryEventSink,
) -> Result<ContractSuite, ContractError> {
    ContractSuite::setup(config, FixtureSet::canonical(), seeder, Arc::new(sink.clone())).await
}

/// Returns an address that nothing listens on.
pub fn allocate_closed_addr() -> Result<SocketAddr, String> {
    let listener =
        TcpListener::bind("127.0.0.1:0").map_err(|err| format!("bind failed: {err}"))?;
    let addr = listener.local_addr().map_err(|err| format!("local addr failed: {err}"))?;
    drop(listener);
    Ok(addr)
}

/// Counts `suite_teardown` events.
pub fn teardown_count(sink: &MemoryEventSink) -> usize {
    sink.events()
        .iter()
        .filter(|event| matches!(event.kind, SuiteEventKind::SuiteTeardown { .. }))
        .count()
}

/// Returns the labels of `check_observed` events.
pub fn observed_checks(sink: &MemoryEventSink) -> Vec<String> {
    sink.events()
        .into_iter()
        .filter_map(|event| match event.kind {
            SuiteEventKind::CheckObserved {
                check, ..
            } => Some(check),
            _ => None,
        })
        .collect()
}
