//! Exports Ceph cluster connection facts to `<output>.<format>`.
//!
//! Run on an admin node with a readable `/etc/ceph`. Progress is printed to
//! stdout; diagnostics go to stderr through `tracing` (`-v` or `RUST_LOG`).
//! Any failure prints `Unable to continue: <reason>` and exits with status 4.

use std::io;
use std::process::ExitCode;

use anyhow::{Context as _, Result};
use ceph_export::cli::Cli;
use ceph_export::{Context, EXIT_FAILURE_CODE, SystemCli, SystemResolver, run};
use clap::Parser;
use tracing::debug;
use tracing_subscriber::EnvFilter;

fn main() -> ExitCode {
    let cli = Cli::parse();
    if let Err(err) = init_tracing(&cli) {
        eprintln!("{err:#}");
    }

    let settings = cli.settings();
    let system = SystemCli::default();
    let ctx = Context {
        cli: &system,
        resolver: &SystemResolver,
    };

    let outcome = run(&settings, &ctx, &mut io::stdout().lock());
    match outcome {
        Ok(_) => ExitCode::SUCCESS,
        Err(err) => {
            debug!(kind = err.kind(), "export aborted: {err:?}");
            println!("Unable to continue: {err}");
            ExitCode::from(EXIT_FAILURE_CODE as u8)
        }
    }
}

fn init_tracing(cli: &Cli) -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(cli.log_directive()))
        .context("invalid log filter")?;
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .try_init()
        .map_err(|err| anyhow::anyhow!("unable to install log subscriber: {err}"))
}
