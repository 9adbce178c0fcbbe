#![allow(clippy::nursery)]
#![allow(clippy::pedantic)]
#![allow(clippy::unused_async)]

use anyhow::Context;
use clap::Parser;
use imagine_config::ImagineConfig;

mod cli;
mod commands;
mod context;
mod notifier;
mod output;
mod progress;
mod routes;
mod ui;
mod views;

#[tokio::main]
async fn main() {
    if let Err(error) = run().await {
        eprintln!("imagine error: {error:#}");
        std::process::exit(1);
    }
}

async fn run() -> anyhow::Result<()> {
    let cli = cli::Cli::parse();
    init_tracing(cli.quiet, cli.verbose)?;

    let flags = cli.global_flags();
    ui::init(&flags);

    let config = ImagineConfig::load_with_dotenv().context("failed to load imagine configuration")?;
    let ctx = context::AppContext::init(config, &flags)
        .context("failed to initialize imagine application context")?;

    let result = async {
        ctx.apply_organization_override(&flags).await?;
        commands::dispatch::dispatch(cli.command, &ctx, &flags).await
    }
    .await;

    if result.is_err() && ctx.client.session().login_required() {
        return result.context("session ended — run `imagine auth login` to sign in again");
    }
    result
}

fn init_tracing(quiet: bool, verbose: bool) -> anyhow::Result<()> {
    let level = if quiet {
        "error"
    } else if verbose {
        "debug"
    } else {
        "warn"
    };

    let filter = tracing_subscriber::EnvFilter::try_from_env("IMAGINE_LOG")
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|error| anyhow::anyhow!("failed to initialize tracing subscriber: {error}"))?;

    Ok(())
}
