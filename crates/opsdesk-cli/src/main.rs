//! Opsdesk CLI Application
//!
//! Command-line interface for the daily operations reconciliation console.

mod args;
mod cli;
mod renderer;

use std::time::Duration;

use anyhow::Result;
use args::{Args, Commands};
use clap::Parser;
use cli::{Cli, ListArgs};
use log::info;
use opsdesk_core::{BatchAction, ConsoleBuilder};
use renderer::TerminalRenderer;
use Commands::*;

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init();

    let Args {
        api_url,
        token,
        timeout_ms,
        fixture,
        preferences_file,
        no_color,
        command,
    } = Args::parse();

    let mut builder = ConsoleBuilder::new()
        .with_token(token)
        .with_timeout(Duration::from_millis(timeout_ms))
        .with_preferences_path(preferences_file.as_ref());
    if let Some(url) = api_url {
        builder = builder.with_api_url(url);
    }
    if let Some(path) = fixture {
        builder = builder.with_fixture(path);
    }

    let renderer = TerminalRenderer::new(!no_color);
    let cli = Cli::new(builder, preferences_file, renderer);

    info!("Opsdesk started");

    match command {
        Some(List(args)) => cli.list(&args).await,
        Some(Conflicts(args)) => cli.conflicts(&args).await,
        Some(Edit(args)) => cli.edit(args).await,
        Some(Reconfirm(args)) => cli.reconfirm(&args).await,
        Some(ServiceOrders(args)) => cli.batch(BatchAction::ServiceOrders, &args).await,
        Some(SendConfirmations(args)) => cli.batch(BatchAction::Confirmations, &args).await,
        Some(Columns { command }) => cli.columns(command).await,
        None => cli.list(&ListArgs::default()).await,
    }
}
