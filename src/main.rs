//! Command-line entry point.
//!
//! Loads a read plan, opens the serial link once, runs the session, and
//! maps the terminal state to the exit code: a completed run exits zero,
//! abandonment (resident OS, unreachable endpoint) exits nonzero.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use log::{error, info};

use diskmon::error::Result;
use diskmon::{FileLog, ReadPlan, SerialTransport, Session, SessionOutcome};

/// Read raw disk sectors through a serial debug monitor.
#[derive(Parser)]
#[command(name = "diskmon", version, about)]
struct Cli {
    /// Read plan (TOML).
    plan: PathBuf,

    /// Override the serial device path from the plan.
    #[arg(long)]
    device: Option<String>,

    /// Override the log destination from the plan.
    #[arg(long)]
    log: Option<PathBuf>,
}

fn main() -> ExitCode {
    // Initialize logging (set RUST_LOG=debug for protocol-level detail)
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    match run(cli) {
        Ok(SessionOutcome::Completed { sectors }) => {
            info!("done: {} sector(s) logged", sectors);
            ExitCode::SUCCESS
        }
        Ok(SessionOutcome::OsResident) => {
            error!("abandoning ship: a resident OS owns the link");
            ExitCode::FAILURE
        }
        Ok(SessionOutcome::Unreachable) => {
            error!("abandoning ship: no endpoint answered the probe");
            ExitCode::FAILURE
        }
        Err(e) => {
            error!("{}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<SessionOutcome> {
    let mut plan = ReadPlan::from_path(&cli.plan)?;
    if let Some(device) = cli.device {
        plan.link.path = device;
    }
    if let Some(log) = cli.log {
        plan.log = log;
    }

    let addresses = plan.addresses();
    info!(
        "using {} at {} baud; {} sector(s) planned, logging to {}",
        plan.link.path,
        plan.link.baud,
        addresses.len(),
        plan.log.display()
    );

    let transport = SerialTransport::open(&plan.link)?;
    let mut sink = FileLog::create(&plan.log)?;

    Session::builder(transport)
        .probe_config(&plan.probe)
        .build()
        .run(&addresses, &mut sink)
}
