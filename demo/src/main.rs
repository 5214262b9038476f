//! PARLEY Demo CLI
//!
//! Runs offline agent scenarios against scripted completions and prints the
//! iteration trace of each. No network access or credentials are needed.
//!
//! Usage:
//!   cargo run -p demo -- run-all
//!   cargo run -p demo -- greeting
//!   cargo run -p demo -- correction
//!   cargo run -p demo -- schema
//!   cargo run -p demo -- --config my-agent.toml greeting

mod scenarios;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use parley_contracts::error::{ParleyError, ParleyResult};
use parley_core::AgentConfig;
use parley_trace::InMemoryTraceWriter;

use scenarios::{correction, greeting};

/// Settings used when `--config` is not given.
const DEFAULT_CONFIG: &str = include_str!("../config/agent.toml");

// ── CLI definition ───────────────────────────────────────────────────────────

/// PARLEY: reason-and-act agents that talk to each other.
#[derive(Parser)]
#[command(
    name = "demo",
    about = "PARLEY offline agent demo",
    long_about = "Runs scripted PARLEY scenarios showing function dispatch,\n\
                  agent-to-agent delegation, corrective feedback, and the iteration bound."
)]
struct Cli {
    /// Agent config TOML (defaults to the bundled config/agent.toml).
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run every scenario in sequence.
    RunAll,
    /// Agent1 greets Alice by delegating to Agent2.
    Greeting,
    /// A model that never answers runs into the iteration bound.
    Correction,
    /// Print Agent1's tool definitions and output schema.
    Schema,
}

// ── Entry point ──────────────────────────────────────────────────────────────

fn main() {
    // Set RUST_LOG=info to see every model response as it is decoded.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_target(false)
        .compact()
        .init();

    let cli = Cli::parse();

    let result = load_config(cli.config.as_ref()).and_then(|config| {
        print_banner(&config);
        match cli.command {
            Command::RunAll => run_all(&config),
            Command::Greeting => greeting::run_scenario(&config),
            Command::Correction => correction::run_scenario(&config),
            Command::Schema => print_schema(&config),
        }
    });

    if let Err(e) = result {
        eprintln!("Demo error: {}", e);
        std::process::exit(1);
    }
}

fn load_config(path: Option<&PathBuf>) -> ParleyResult<AgentConfig> {
    match path {
        Some(path) => AgentConfig::from_file(path),
        None => AgentConfig::from_toml_str(DEFAULT_CONFIG),
    }
}

// ── Scenario dispatch ────────────────────────────────────────────────────────

fn run_all(config: &AgentConfig) -> ParleyResult<()> {
    greeting::run_scenario(config)?;
    correction::run_scenario(config)?;
    Ok(())
}

fn print_schema(config: &AgentConfig) -> ParleyResult<()> {
    let (agent1, _agent2) = greeting::build_agents(config, &InMemoryTraceWriter::new())?;
    let rendered = agent1.with_agent(|agent| {
        serde_json::to_string_pretty(&serde_json::json!({
            "tools": agent.tools(),
            "response_schema": agent.response_schema(),
        }))
    })?;
    let rendered = rendered.map_err(|e| ParleyError::SchemaBuild {
        reason: format!("failed to render schema: {e}"),
    })?;
    println!("{rendered}");
    Ok(())
}

// ── Banner ───────────────────────────────────────────────────────────────────

fn print_banner(config: &AgentConfig) {
    println!();
    println!("PARLEY: reason-and-act agent harness");
    println!("Offline demo (scripted completions)");
    println!("====================================");
    println!();
    println!("Per iteration:");
    println!("  [1] Transcript sent to the model, constrained to the output schema");
    println!("  [2] Final Answer present     → call ends");
    println!("  [3] Action Input present     → function dispatched, result appended");
    println!("  [4] Neither                  → corrective message appended");
    println!();
    println!(
        "model = {}, max_iterations = {}, strict_validation = {}",
        config.model, config.max_iterations, config.strict_validation
    );
    println!();
}
