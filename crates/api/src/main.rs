//! StillMint - stay still, earn tokens
//!
//! Main entry point for the `stillmint` command-line app.
//!
//! Results are printed to stdout as JSON; logs and live session progress go
//! to stderr.

#![allow(clippy::print_stdout, clippy::print_stderr)]

use std::process::ExitCode;

use anyhow::Context;
use clap::Parser;
use serde::Serialize;
use stillmint_infra::scheduling::SessionProgress;
use stillmint_lib::cli::{Cli, Command};
use stillmint_lib::utils::logging::init_tracing;
use stillmint_lib::{commands, AppContext};
use tracing::{info, warn};

#[tokio::main]
async fn main() -> ExitCode {
    // Load .env before configuration so STILLMINT_* variables from it apply.
    let dotenv = dotenvy::dotenv();

    let cli = Cli::parse();

    match run(cli.command, dotenv).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("stillmint: {e:#}");
            ExitCode::FAILURE
        }
    }
}

async fn run(
    command: Command,
    dotenv: Result<std::path::PathBuf, dotenvy::Error>,
) -> anyhow::Result<()> {
    let config = stillmint_infra::config::load_or_default().context("failed to load configuration")?;
    init_tracing(&config.log_level);

    match dotenv {
        Ok(path) => info!(path = %path.display(), "loaded .env"),
        Err(e) if e.not_found() => {}
        Err(e) => warn!(error = %e, "could not load .env file"),
    }

    let ctx = AppContext::new_with_config(config).await.context("failed to start StillMint")?;

    let shutdown = ctx.shutdown_token();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            warn!("interrupt received; cancelling session");
            shutdown.cancel();
        }
    });

    let result = execute(&ctx, command).await;
    ctx.shutdown().await?;
    result
}

async fn execute(ctx: &AppContext, command: Command) -> anyhow::Result<()> {
    match command {
        Command::Register(args) => {
            let profile = commands::register_user(ctx, args.into_request()).await?;
            print_json(&profile)
        }
        Command::Login { email, password } => {
            let profile = commands::login_user(ctx, &email, password.expose()).await?;
            print_json(&profile)
        }
        Command::Meditate(args) => {
            let request = args.into_request();
            let summary = commands::meditate(ctx, request, Some(Box::new(print_progress)))
                .await
                .context("meditation session failed")?;
            print_json(&summary)
        }
        Command::History { user_id } => {
            let history = commands::get_session_history(ctx, &user_id).await?;
            print_json(&history)
        }
        Command::Balance { user_id } => {
            let balance = commands::get_balance(ctx, &user_id).await?;
            print_json(&balance)
        }
        Command::Health => {
            let health = ctx.health_check().await;
            print_json(&health)?;
            anyhow::ensure!(health.is_healthy, "StillMint is unhealthy");
            Ok(())
        }
    }
}

fn print_progress(progress: SessionProgress) {
    eprintln!(
        "{:>4}s left  violations {:>2}  {}  [{}]",
        progress.remaining_seconds,
        progress.violation_count,
        if progress.still { "still " } else { "MOVING" },
        progress.phase
    );
}

fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
