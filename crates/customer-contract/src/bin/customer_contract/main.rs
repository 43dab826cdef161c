// crates/customer-contract/src/bin/customer_contract/main.rs
// ============================================================================
// Module: Customer Contract Runner
// Description: Command-line runner for the customer contract suite.
// Purpose: Run the suite against a live API and write report artifacts.
// Dependencies: clap, customer-contract, tokio
// ============================================================================

//! ## Overview
//! Loads configuration (TOML file, environment, then flags), runs every
//! planned scenario against the configured base URL, writes the report, and
//! exits non-zero when any scenario fails.


// ============================================================================
// SECTION: Imports
// ============================================================================

use std::io::Write;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use clap::ValueEnum;
use customer_contract::ContractSuite;
use customer_contract::ScenarioName;
use customer_contract::SuiteConfig;
use customer_contract::SuiteMode;
use customer_contract::report::ReportArtifacts;
use customer_contract::report::ReportGuard;

// ============================================================================
// SECTION: CLI
// ============================================================================

/// Customer API contract runner.
#[derive(Parser, Debug)]
#[command(name = "customer-contract", version)]
struct Cli {
    /// TOML configuration path (overrides `CUSTOMER_CONTRACT_CONFIG`).
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,
    /// Base URL of the customer API.
    #[arg(long, value_name = "URL")]
    base_url: Option<String>,
    /// Check strictness.
    #[arg(long, value_enum)]
    mode: Option<ModeArg>,
    /// Bearer token attached to every request.
    #[arg(long, value_name = "TOKEN")]
    auth_token: Option<String>,
    /// Run only the named scenarios (repeatable).
    #[arg(long = "only", value_name = "SCENARIO")]
    only: Vec<String>,
    /// Report output directory.
    #[arg(long, value_name = "DIR")]
    report_dir: Option<PathBuf>,
}

/// CLI spelling of [`SuiteMode`].
#[derive(Debug, Clone, Copy, ValueEnum)]
enum ModeArg {
    /// Enforce every check.
    Strict,
    /// Enforce status checks only; log payload mismatches.
    Diagnostic,
}

impl From<ModeArg> for SuiteMode {
    fn from(value: ModeArg) -> Self {
        match value {
            ModeArg::Strict => Self::Strict,
            ModeArg::Diagnostic => Self::Diagnostic,
        }
    }
}

// ============================================================================
// SECTION: Entry Point
// ============================================================================

/// Runner entry point returning an exit code.
#[tokio::main(flavor = "multi_thread")]
async fn main() -> ExitCode {
    match run(Cli::parse()).await {
        Ok(code) => code,
        Err(message) => {
            let _ = write_stderr_line(&message);
            ExitCode::FAILURE
        }
    }
}

/// Executes one suite run.
async fn run(cli: Cli) -> Result<ExitCode, String> {
    let config = resolve_config(&cli)?;
    let mut guard = ReportGuard::new(
        ReportArtifacts::for_config(&config)
            .map_err(|err| format!("failed to create report directory: {err}"))?,
    );
    let mut suite = ContractSuite::from_config(config)
        .await
        .map_err(|err| format!("suite setup failed: {err}"))?;
    suite.run_all().await;
    let report = suite.teardown();
    guard.finish(&report).map_err(|err| format!("failed to write report: {err}"))?;

    for outcome in &report.outcomes {
        let line = match &outcome.error {
            Some(error) => format!("FAIL {} - {error}", outcome.scenario),
            None => format!("pass {}", outcome.scenario),
        };
        write_stdout_line(&line).map_err(|err| format!("stdout write failed: {err}"))?;
    }
    write_stdout_line(&format!(
        "{} of {} scenarios failed; report: {}",
        report.failed_count(),
        report.outcomes.len(),
        guard.artifacts().root().display()
    ))
    .map_err(|err| format!("stdout write failed: {err}"))?;

    Ok(if report.passed() { ExitCode::SUCCESS } else { ExitCode::FAILURE })
}

/// Layers CLI flags over file and environment configuration, then validates
/// the merged result.
fn resolve_config(cli: &Cli) -> Result<SuiteConfig, String> {
    let mut config =
        SuiteConfig::load_layers(cli.config.as_deref()).map_err(|err| err.to_string())?;
    if let Some(base_url) = &cli.base_url {
        config.base_url.clone_from(base_url);
    }
    if let Some(mode) = cli.mode {
        config.mode = mode.into();
    }
    if let Some(token) = &cli.auth_token {
        config.auth_token = Some(token.clone());
    }
    if !cli.only.is_empty() {
        config.scenarios = cli
            .only
            .iter()
            .map(|raw| raw.parse::<ScenarioName>())
            .collect::<Result<Vec<_>, _>>()
            .map_err(|err| err.to_string())?;
    }
    if let Some(dir) = &cli.report_dir {
        config.run_root = Some(dir.clone());
    }
    config.validate().map_err(|err| err.to_string())?;
    Ok(config)
}

// ============================================================================
// SECTION: Output
// ============================================================================

/// Writes a line to stdout.
fn write_stdout_line(message: &str) -> std::io::Result<()> {
    let mut stdout = std::io::stdout();
    writeln!(&mut stdout, "{message}")
}

/// Writes a line to stderr.
fn write_stderr_line(message: &str) -> std::io::Result<()> {
    let mut stderr = std::io::stderr();
    writeln!(&mut stderr, "{message}")
}
