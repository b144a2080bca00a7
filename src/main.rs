use clap::{Parser, Subcommand};
use serde::Serialize;
use tracing_subscriber::EnvFilter;

use testrig::config::FileConfig;
use testrig::{resolve, select_strategy, HarnessConfig, Strategy, Target, WireProvider};

#[derive(Parser)]
#[command(name = "testrig", version, about = "Resolve and probe hardware test sessions")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Report which acquisition strategy the current environment selects,
    /// without acquiring anything.
    Check {
        /// Target to resolve for; defaults to the config file, then `sim`.
        #[arg(long)]
        target: Option<String>,
        /// Emit the report as JSON.
        #[arg(long)]
        json: bool,
    },
    /// Acquire a session end-to-end and verify it is alive.
    Ping {
        /// Target to resolve for; defaults to the config file, then `sim`.
        #[arg(long)]
        target: Option<String>,
    },
}

fn main() -> anyhow::Result<()> {
    init_tracing();
    let cli = Cli::parse();
    match cli.command {
        Command::Check { target, json } => check(target, json),
        Command::Ping { target } => ping(target),
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_level(true)
        .with_timer(tracing_subscriber::fmt::time::UtcTime::rfc_3339())
        .init();
}

/// `--target` flag, else the config file, else `sim`.
fn effective_target(flag: Option<String>) -> anyhow::Result<Target> {
    if let Some(name) = flag {
        return Ok(name.parse()?);
    }
    if let Some(name) = FileConfig::load()?.target {
        return Ok(name.parse()?);
    }
    Ok(Target::Sim)
}

#[derive(Serialize)]
struct CheckReport {
    target: Target,
    simulator_available: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    strategy: Option<Strategy>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

fn check(target: Option<String>, json: bool) -> anyhow::Result<()> {
    let target = effective_target(target)?;
    let config = HarnessConfig::from_env()?;

    let report = match select_strategy(target, &config) {
        Ok(strategy) => CheckReport {
            target,
            simulator_available: testrig::sim::available(),
            strategy: Some(strategy),
            error: None,
        },
        Err(err) => CheckReport {
            target,
            simulator_available: testrig::sim::available(),
            strategy: None,
            error: Some(err.to_string()),
        },
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!("target: {}", report.target);
        println!(
            "simulator backend: {}",
            if report.simulator_available {
                "available"
            } else {
                "not compiled in"
            }
        );
        match (&report.strategy, &report.error) {
            (Some(strategy), _) => println!("strategy: {strategy}"),
            (None, Some(error)) => println!("cannot resolve: {error}"),
            (None, None) => {}
        }
    }

    if report.error.is_some() {
        std::process::exit(1);
    }
    Ok(())
}

fn ping(target: Option<String>) -> anyhow::Result<()> {
    let target = effective_target(target)?;
    let config = HarnessConfig::from_env()?;

    let peer = resolve(target, &config, &WireProvider, |_, mut session| {
        session.ping().map(|()| session.peer().to_string())
    })??;

    println!("session to {peer} is live");
    Ok(())
}
