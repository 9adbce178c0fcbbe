use anyhow::Context;
use imagine_core::entities::{RateLimitConfig, RateLimitConfigCreate, RateLimitConfigUpdate};

use crate::cli::subcommands::RateLimitCommands;
use crate::cli::subcommands::rate_limits::{RateLimitCreateArgs, RateLimitUpdateArgs};
use crate::cli::{GlobalFlags, OutputFormat};
use crate::commands::shared::feedback::notify_failure;
use crate::context::AppContext;
use crate::views::{self, ViewState, refresh_after};

pub const COLUMNS: &[&str] = &[
    "id",
    "endpoint_pattern",
    "requests_per_minute",
    "requests_per_hour",
    "is_active",
];

/// Handle `imagine rate-limits <subcommand>`.
pub async fn handle(action: &RateLimitCommands, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    ctx.require_session("rate-limits")?;
    match action {
        RateLimitCommands::List => {
            let state = views::load("Loading rate limits", ctx.client.list_rate_limits()).await;
            render(state, flags.format)
        }
        RateLimitCommands::Create(args) => create(args, ctx, flags).await,
        RateLimitCommands::Update(args) => update(args, ctx, flags).await,
        RateLimitCommands::Delete(args) => {
            let client = &ctx.client;
            let ((), list) = refresh_after(
                client.notifier(),
                "Rate limit deleted",
                client.delete_rate_limit(&args.id),
                || client.list_rate_limits(),
            )
            .await
            .with_context(|| format!("rate-limits delete {}", args.id))?;
            render(list, flags.format)
        }
    }
}

fn render(state: ViewState<Vec<RateLimitConfig>>, format: OutputFormat) -> anyhow::Result<()> {
    views::render_list(state, COLUMNS, "No rate limits configured; server defaults apply.", format)
}

async fn create(args: &RateLimitCreateArgs, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    let client = &ctx.client;
    let payload = RateLimitConfigCreate {
        endpoint_pattern: args.endpoint.clone(),
        requests_per_minute: args.per_minute,
        requests_per_hour: args.per_hour,
    };
    match refresh_after(
        client.notifier(),
        "Rate limit created",
        client.create_rate_limit(&payload),
        || client.list_rate_limits(),
    )
    .await
    {
        Ok((_, list)) => render(list, flags.format),
        Err(error) => {
            notify_failure(client.notifier(), &error, "Failed to create rate limit");
            Err(error).context("rate-limits create")
        }
    }
}

async fn update(args: &RateLimitUpdateArgs, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    let client = &ctx.client;
    let payload = RateLimitConfigUpdate {
        requests_per_minute: args.per_minute,
        requests_per_hour: args.per_hour,
        is_active: args.active,
    };
    if payload == RateLimitConfigUpdate::default() {
        anyhow::bail!("nothing to update: pass --per-minute, --per-hour or --active");
    }
    let (_, list) = refresh_after(
        client.notifier(),
        "Rate limit updated",
        client.update_rate_limit(&args.id, &payload),
        || client.list_rate_limits(),
    )
    .await
    .with_context(|| format!("rate-limits update {}", args.id))?;
    render(list, flags.format)
}
