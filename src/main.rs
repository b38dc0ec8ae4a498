//! insurance-prep - Main Entry Point

use clap::Parser;
use insurance_prep::cli::Cli;

fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "insurance_prep=info".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    Cli::parse().run()
}
