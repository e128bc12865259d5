//! `acme-dns-route53` entry point
//!
//! Operator harness around the Route53 DNS-01 challenge. Options come from
//! flags, then the config file, then the `AWS_*` environment. Ctrl-C stops an
//! in-flight propagation wait; a change already submitted stays submitted.

mod cli;
mod commands;
mod config;

use std::process::ExitCode;

use acme_dns_route53_core::{Cancellation, ProcessEnv, Route53Challenge};
use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use cli::Cli;

#[tokio::main]
async fn main() -> ExitCode {
    // Logs go to stderr; stdout carries command output
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .without_time()
                .with_ansi(false),
        )
        .with(EnvFilter::from_default_env().add_directive(tracing::Level::INFO.into()))
        .init();

    let cli = Cli::parse();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("{e:#}");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<()> {
    let file = config::load_config(cli.config.as_deref())?;
    let options = config::merge_options(cli.options.to_options(), file);
    let resolved = options
        .resolve(&ProcessEnv)
        .context("Failed to resolve AWS configuration")?;
    tracing::debug!("Resolved {resolved:?}");

    let challenge =
        Route53Challenge::from_config(&resolved).context("Failed to create Route53 client")?;

    let (handle, cancellation) = Cancellation::new();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::warn!("Interrupted, cancelling the propagation wait");
            handle.cancel();
        }
    });

    commands::run(&challenge, cli.command, &cancellation).await
}
