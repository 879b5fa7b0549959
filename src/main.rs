use std::io::{self, IsTerminal};

use anyhow::{bail, Context, Result};
use clap::Parser;
use tracing::{info, span, Level};
use tracing_subscriber::prelude::*;
use tracing_subscriber::{EnvFilter, Registry};

use seqsplit::config::BatchConfig;
use seqsplit::msa::GreedyConsistencyEngine;

mod cli;

/// Stderr logging, `RUST_LOG` overrides the level chosen by `-v`.
fn init_logging(verbose: u8) {
    let default_level = match verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };

    let filter_layer = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_level));

    let stderr_log = tracing_subscriber::fmt::layer()
        .with_target(false)
        .with_file(false)
        .with_writer(io::stderr)
        .with_ansi(io::stderr().is_terminal())
        .with_filter(filter_layer);

    Registry::default().with(stderr_log).init();
}

fn msa_subcommand(args: &cli::MsaArgs, verbose: u8) -> Result<()> {
    let span = span!(Level::INFO, "msa_subcommand");
    let _enter = span.enter();

    let config = args.to_config(verbose > 0);
    config.validate()
        .context("Invalid arguments")?;

    let batch = BatchConfig::from(&config);
    let graph = seqsplit::run_batch(&GreedyConsistencyEngine, &batch)
        .with_context(|| format!("Could not build the interval graph of {} file(s)", batch.seqfiles.len()))?;

    info!("Interval graph with {} nodes and {} arcs.", graph.node_count(), graph.arc_count());

    Ok(())
}

fn main() -> Result<()> {
    let args = cli::CliArgs::parse();
    init_logging(args.verbose);

    match &args.command {
        Some(cli::CliSubcommand::Msa(v)) => msa_subcommand(v, args.verbose)?,
        None => bail!("No subcommand given."),
    }

    Ok(())
}
