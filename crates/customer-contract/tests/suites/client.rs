// crates/customer-contract/tests/suites/client.rs
// ============================================================================
// Module: Client Tests
// Description: HTTP client behavior observed from the server side.
// Purpose: Ensure default headers and request bodies reach the API intact.
// Dependencies: customer-contract, helpers
// ============================================================================

//! ## Overview
//! HTTP client behavior observed from the server side.
//! Invariants:
//! - Configured headers are attached to every request.
//! - No authorization header is sent unless a token is configured.

#![allow(
    clippy::expect_used,
    clippy::panic_in_result_fn,
    reason = "Test-only assertions inside fallible test bodies."
)]

use customer_contract::Customer;
use customer_contract::CustomerApiClient;
use customer_contract::FixtureSet;
use customer_contract::ScenarioName;
use customer_contract::SuiteMode;
use customer_contract::events::MemoryEventSink;
use helpers::customer_stub::spawn_customer_stub;
use helpers::harness::config_for;
use helpers::harness::suite_for_stub;
use serde_json::json;

use crate::helpers;

#[tokio::test(flavor = "multi_thread")]
async fn configured_headers_are_forwarded() -> Result<(), Box<dyn std::error::Error>> {
    let stub = spawn_customer_stub(&FixtureSet::canonical())?;
    let sink = MemoryEventSink::default();
    let mut config = config_for(stub.base_url(), SuiteMode::Strict);
    config.auth_token = Some("secret-token".to_string());
    config.accept_json = true;
    config.extra_headers.insert("x-request-source".to_string(), "contract-suite".to_string());
    let mut suite = suite_for_stub(&stub, config, &sink).await?;

    suite.run(ScenarioName::GetOne).await?;
    suite.run(ScenarioName::List).await?;
    let requests = stub.requests();
    assert_eq!(requests.len(), 2);
    for request in &requests {
        assert_eq!(
            request.headers.get("authorization").map(String::as_str),
            Some("Bearer secret-token")
        );
        assert_eq!(request.headers.get("accept").map(String::as_str), Some("application/json"));
        assert_eq!(
            request.headers.get("x-request-source").map(String::as_str),
            Some("contract-suite")
        );
    }
    Ok(())
}

#[tokio::test(flavor = "multi_thread")]
async fn authorization_is_omitted_without_token() -> Result<(), Box<dyn std::error::Error>> {
    let stub = spawn_customer_stub(&FixtureSet::canonical())?;
    let sink = MemoryEventSink::default();
    let mut suite =
        suite_for_stub(&stub, config_for(stub.base_url(), SuiteMode::Strict), &sink).await?;

    suite.run(ScenarioName::List).await?;
    let requests = stub.requests();
    let request = requests.first().ok_or("no request recorded")?;
    assert_eq!(request.method, "GET");
    assert_eq!(request.path, "/customer");
    assert!(!request.headers.contains_key("authorization"));
    Ok(())
}

#[tokio::test(flavor = "multi_thread")]
async fn update_body_carries_numeric_id() -> Result<(), Box<dyn std::error::Error>> {
    let stub = spawn_customer_stub(&FixtureSet::canonical())?;
    let sink = MemoryEventSink::default();
    let mut suite =
        suite_for_stub(&stub, config_for(stub.base_url(), SuiteMode::Strict), &sink).await?;

    suite.run(ScenarioName::Update).await?;
    let report = suite.teardown();
    let entry = report.transcript.first().ok_or("missing transcript entry")?;
    assert_eq!(entry.method, "PUT");
    assert_eq!(entry.path, "/customer/7");
    assert_eq!(
        entry.request,
        Some(json!({
            "id": 7,
            "firstName": "Baraneetharan",
            "lastName": "Ramasamy",
            "email": "baranee@email.com"
        }))
    );
    Ok(())
}

#[tokio::test(flavor = "multi_thread")]
async fn client_decodes_rows_and_reports_missing_ones() -> Result<(), Box<dyn std::error::Error>> {
    let stub = spawn_customer_stub(&FixtureSet::canonical())?;
    let client = CustomerApiClient::new(&config_for(stub.base_url(), SuiteMode::Strict))?;

    let listed = client.list_customers().await?;
    assert!(listed.is_success());
    let rows: Vec<Customer> = listed.json()?;
    assert_eq!(rows, FixtureSet::canonical().rows);

    let missing = client.get_customer(99).await?;
    assert_eq!(missing.status, 404);
    assert!(!missing.is_success());
    let err = missing.json::<Customer>().expect_err("error body is not a customer");
    assert_eq!(err.kind(), "decode");

    let transcript = client.transcript();
    let sequences: Vec<u64> = transcript.iter().map(|entry| entry.sequence).collect();
    assert_eq!(sequences, vec![1, 2]);
    Ok(())
}
