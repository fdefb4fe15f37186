// crates/plan-contract-cli/src/main.rs
// ============================================================================
// Module: Plan Contract CLI Entry Point
// Description: Command dispatcher for running contract scenarios.
// Purpose: Run, list, and configure strategic-plan contract checks.
// Dependencies: clap, plan-contract-core, thiserror, tokio, tracing-subscriber
// ============================================================================

//! ## Overview
//! `plan-contract run` executes scenarios against the configured target and
//! writes per-scenario artifacts; `list` prints the catalog; `check-config`
//! resolves and prints the configuration without sending any request.
//!
//! Exit status is non-zero when any scenario fails or the configuration is
//! invalid. Security posture: credentials come from the environment or the
//! config file only and are never printed.

// ============================================================================
// SECTION: Modules
// ============================================================================

mod logging;

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::io::Write;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Args;
use clap::Parser;
use clap::Subcommand;
use plan_contract_core::HarnessConfig;
use plan_contract_core::RunArtifacts;
use plan_contract_core::ScenarioId;
use plan_contract_core::ScenarioOutcome;
use plan_contract_core::config::parse_timeout_seconds;
use plan_contract_core::run_scenarios;
use thiserror::Error;

use crate::logging::init_logging;

// ============================================================================
// SECTION: CLI Types
// ============================================================================

/// Top-level CLI definition.
#[derive(Parser, Debug)]
#[command(name = "plan-contract", version, about = "Strategic-plan HTTP contract checks")]
struct Cli {
    /// Emit logs as JSON lines.
    #[arg(long, global = true)]
    json_logs: bool,
    /// Selected subcommand to execute.
    #[command(subcommand)]
    command: Commands,
}

/// Supported subcommands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Run contract scenarios against the target.
    Run(RunCommand),
    /// List the available scenarios.
    List,
    /// Resolve and print the configuration without contacting the target.
    CheckConfig(TargetArgs),
}

/// Arguments for `run`.
#[derive(Args, Debug)]
struct RunCommand {
    /// Scenario to run (repeatable); all scenarios when omitted.
    #[arg(long = "scenario", value_name = "NAME", value_parser = parse_scenario)]
    scenarios: Vec<ScenarioId>,
    /// Target and artifact settings.
    #[command(flatten)]
    target: TargetArgs,
}

/// Settings that override the config file and environment.
#[derive(Args, Debug, Default)]
struct TargetArgs {
    /// TOML config file (overrides `PLAN_CONTRACT_CONFIG`).
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,
    /// Target origin, e.g. `http://localhost:3000`.
    #[arg(long, value_name = "URL")]
    base_url: Option<String>,
    /// Per-request timeout in whole seconds.
    #[arg(long, value_name = "SECONDS")]
    timeout_sec: Option<String>,
    /// Artifact directory.
    #[arg(long, value_name = "DIR")]
    run_root: Option<PathBuf>,
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// CLI error wrapper.
#[derive(Debug, Error)]
#[error("{message}")]
struct CliError {
    /// Human-readable error message.
    message: String,
}

impl CliError {
    /// Constructs a new [`CliError`].
    const fn new(message: String) -> Self {
        Self {
            message,
        }
    }
}

/// CLI result alias for fallible operations.
type CliResult<T> = Result<T, CliError>;

// ============================================================================
// SECTION: Entry Point
// ============================================================================

/// CLI entry point returning an exit code.
#[tokio::main(flavor = "multi_thread")]
async fn main() -> ExitCode {
    match run().await {
        Ok(code) => code,
        Err(err) => emit_error(&err.to_string()),
    }
}

/// Executes the command dispatcher.
async fn run() -> CliResult<ExitCode> {
    let cli = Cli::parse();
    init_logging(cli.json_logs).map_err(CliError::new)?;
    match cli.command {
        Commands::Run(command) => command_run(command).await,
        Commands::List => command_list(),
        Commands::CheckConfig(target) => command_check_config(&target),
    }
}

// ============================================================================
// SECTION: Commands
// ============================================================================

/// Executes `run`.
async fn command_run(command: RunCommand) -> CliResult<ExitCode> {
    let config = resolve_config(&command.target)?;
    let scenarios =
        if command.scenarios.is_empty() { ScenarioId::ALL.to_vec() } else { command.scenarios };
    let artifacts = RunArtifacts::new(config.run_root.as_deref()).map_err(|err| {
        CliError::new(format!("failed to create artifact directory: {err}"))
    })?;

    let outcomes = run_scenarios(&scenarios, &config).await;
    for outcome in &outcomes {
        if let Err(err) = artifacts.write_outcome(outcome) {
            tracing::warn!(scenario = outcome.scenario.as_str(), error = %err, "failed to write artifacts");
        }
        write_stdout_line(&outcome_line(outcome)).map_err(|err| output_error("stdout", &err))?;
    }

    let failed = outcomes.iter().filter(|outcome| !outcome.passed()).count();
    write_stdout_line(&format!(
        "{} passed, {failed} failed; artifacts in {}",
        outcomes.len() - failed,
        artifacts.root().display()
    ))
    .map_err(|err| output_error("stdout", &err))?;
    Ok(if failed == 0 { ExitCode::SUCCESS } else { ExitCode::FAILURE })
}

/// Executes `list`.
fn command_list() -> CliResult<ExitCode> {
    for scenario in ScenarioId::ALL {
        let scope = if scenario.requires_admin() { "admin" } else { "public" };
        write_stdout_line(&format!(
            "{:<18} {:<6} {}",
            scenario.as_str(),
            scope,
            scenario.description()
        ))
        .map_err(|err| output_error("stdout", &err))?;
    }
    Ok(ExitCode::SUCCESS)
}

/// Executes `check-config`.
fn command_check_config(target: &TargetArgs) -> CliResult<ExitCode> {
    let config = resolve_config(target)?;
    for line in config_lines(&config) {
        write_stdout_line(&line).map_err(|err| output_error("stdout", &err))?;
    }
    Ok(ExitCode::SUCCESS)
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Loads file and environment layers, then applies CLI flags.
fn resolve_config(target: &TargetArgs) -> CliResult<HarnessConfig> {
    let mut config = HarnessConfig::load(target.config.as_deref()).map_err(config_error)?;
    if let Some(base_url) = &target.base_url {
        config = config.with_base_url(base_url).map_err(config_error)?;
    }
    if let Some(raw) = &target.timeout_sec {
        let timeout = parse_timeout_seconds("--timeout-sec", raw).map_err(config_error)?;
        config = config.with_timeout(timeout);
    }
    if let Some(run_root) = &target.run_root {
        config = config.with_run_root(run_root.clone());
    }
    config.validate().map_err(config_error)?;
    Ok(config)
}

/// Parses a `--scenario` value.
fn parse_scenario(raw: &str) -> Result<ScenarioId, String> {
    raw.parse()
}

/// Renders one result line.
fn outcome_line(outcome: &ScenarioOutcome) -> String {
    let mut line = match outcome.error() {
        None => format!(
            "PASS {} ({} checks, {} requests, {} ms)",
            outcome.scenario,
            outcome.checks.len(),
            outcome.request_count(),
            outcome.elapsed.as_millis()
        ),
        Some(err) => format!("FAIL {} [{}] {err}", outcome.scenario, err.kind()),
    };
    if !outcome.cleanup.is_clean() {
        let left: Vec<String> =
            outcome.cleanup.failed.iter().map(|(id, _)| id.to_string()).collect();
        line.push_str(&format!("; cleanup left {}", left.join(", ")));
    }
    line
}

/// Renders the resolved configuration; credentials are reduced to presence.
fn config_lines(config: &HarnessConfig) -> Vec<String> {
    let admin = config.admin.as_ref().map_or_else(
        || "not configured".to_string(),
        |admin| format!("{} (password set)", admin.email),
    );
    let run_root = config
        .run_root
        .as_ref()
        .map_or_else(|| "default".to_string(), |path| path.display().to_string());
    vec![
        format!("base_url: {}", config.base_url),
        format!("timeout_sec: {}", config.timeout.as_secs()),
        format!("admin: {admin}"),
        format!("session_cookies: {}", config.session_cookie_prefixes.join(", ")),
        format!("run_root: {run_root}"),
    ]
}

/// Wraps a configuration error.
fn config_error(err: plan_contract_core::ConfigError) -> CliError {
    CliError::new(err.to_string())
}

// ============================================================================
// SECTION: Output Helpers
// ============================================================================

/// Writes a single line to stdout.
fn write_stdout_line(message: &str) -> std::io::Result<()> {
    let mut stdout = std::io::stdout();
    writeln!(&mut stdout, "{message}")
}

/// Writes a single line to stderr.
fn write_stderr_line(message: &str) -> std::io::Result<()> {
    let mut stderr = std::io::stderr();
    writeln!(&mut stderr, "{message}")
}

/// Formats an output error.
fn output_error(stream: &str, error: &std::io::Error) -> CliError {
    CliError::new(format!("failed to write to {stream}: {error}"))
}

/// Emits an error message to stderr and returns a failure exit code.
fn emit_error(message: &str) -> ExitCode {
    let _ = write_stderr_line(&format!("error: {message}"));
    ExitCode::FAILURE
}
