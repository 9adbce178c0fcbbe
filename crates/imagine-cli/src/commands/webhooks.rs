use anyhow::Context;
use imagine_core::entities::{WebhookCreate, WebhookDelivery, WebhookEndpoint, WebhookUpdate};
use imagine_core::enums::WebhookEvent;
use serde::Serialize;

use crate::cli::subcommands::WebhookCommands;
use crate::cli::subcommands::webhooks::{WebhookCreateArgs, WebhookUpdateArgs};
use crate::cli::{GlobalFlags, OutputFormat};
use crate::commands::shared::feedback::notify_failure;
use crate::commands::shared::parse::parse_enum;
use crate::context::AppContext;
use crate::output;
use crate::views::{self, ViewState, refresh_after};

pub const COLUMNS: &[&str] = &["id", "url", "events", "active", "failures", "last_triggered"];
const DELIVERY_COLUMNS: &[&str] = &["created_at", "event_type", "success", "response", "attempt", "error"];

#[derive(Serialize)]
struct WebhookRow {
    id: String,
    url: String,
    events: String,
    active: bool,
    failures: u32,
    last_triggered: String,
}

impl From<&WebhookEndpoint> for WebhookRow {
    fn from(hook: &WebhookEndpoint) -> Self {
        Self {
            id: hook.id.clone(),
            url: hook.url.clone(),
            events: hook.events.join(", "),
            active: hook.is_active,
            failures: hook.failure_count,
            last_triggered: hook
                .last_triggered_at
                .map_or_else(|| "never".into(), |at| at.format("%Y-%m-%d %H:%M").to_string()),
        }
    }
}

#[derive(Serialize)]
struct DeliveryRow {
    created_at: String,
    event_type: String,
    success: bool,
    response: String,
    attempt: u32,
    error: String,
}

impl From<&WebhookDelivery> for DeliveryRow {
    fn from(delivery: &WebhookDelivery) -> Self {
        Self {
            created_at: delivery.created_at.format("%Y-%m-%d %H:%M:%S").to_string(),
            event_type: delivery.event_type.clone(),
            success: delivery.success,
            response: delivery
                .response_status
                .map_or_else(|| "-".into(), |status| status.to_string()),
            attempt: delivery.attempt,
            error: delivery.error_message.clone().unwrap_or_default(),
        }
    }
}

/// Handle `imagine webhooks <subcommand>`.
pub async fn handle(action: &WebhookCommands, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    ctx.require_session("webhooks")?;
    match action {
        WebhookCommands::List => show(ctx, flags).await,
        WebhookCommands::Create(args) => create(args, ctx, flags).await,
        WebhookCommands::Update(args) => update(args, ctx, flags).await,
        WebhookCommands::Toggle(args) => toggle(&args.id, ctx, flags).await,
        WebhookCommands::Delete(args) => delete(&args.id, ctx, flags).await,
        WebhookCommands::Test(args) => test(&args.id, ctx, flags).await,
        WebhookCommands::Deliveries(args) => deliveries(&args.id, ctx, flags).await,
    }
}

/// The webhooks screen.
pub async fn show(ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    let state = views::load("Loading webhooks", ctx.client.list_webhooks()).await;
    render(state, flags.format)
}

fn render(state: ViewState<Vec<WebhookEndpoint>>, format: OutputFormat) -> anyhow::Result<()> {
    let Some(hooks) = state.into_result()? else {
        output::output_empty("No webhooks configured.", format);
        return Ok(());
    };
    if format != OutputFormat::Table {
        return output::output(&hooks, format);
    }
    let rows = hooks.iter().map(WebhookRow::from).collect::<Vec<_>>();
    output::output_rows(&rows, COLUMNS, format)
}

fn parse_events(raw: &[String]) -> anyhow::Result<Vec<WebhookEvent>> {
    let mut events = Vec::with_capacity(raw.len());
    for value in raw {
        let event: WebhookEvent = parse_enum(value, "webhook event")?;
        if !events.contains(&event) {
            events.push(event);
        }
    }
    Ok(events)
}

async fn create(args: &WebhookCreateArgs, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    let client = &ctx.client;
    let payload = WebhookCreate {
        url: args.url.clone(),
        events: parse_events(&args.events)?,
        description: args.description.clone(),
    };
    let (hook, list) = match refresh_after(
        client.notifier(),
        "Webhook created",
        client.create_webhook(&payload),
        || client.list_webhooks(),
    )
    .await
    {
        Ok(done) => done,
        Err(error) => {
            notify_failure(client.notifier(), &error, "Failed to create webhook");
            return Err(error).context("webhooks create");
        }
    };

    if flags.format != OutputFormat::Table {
        return output::output(&hook, flags.format);
    }
    if let Some(secret) = &hook.secret {
        println!("Signing secret (shown once, store it now): {secret}");
    }
    render(list, flags.format)
}

async fn update(args: &WebhookUpdateArgs, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    let client = &ctx.client;
    let payload = WebhookUpdate {
        url: args.url.clone(),
        events: if args.events.is_empty() {
            None
        } else {
            Some(parse_events(&args.events)?)
        },
        description: args.description.clone(),
        is_active: None,
    };
    if payload == WebhookUpdate::default() {
        anyhow::bail!("nothing to update: pass --url, --event or --description");
    }
    let ((), list) = refresh_after(
        client.notifier(),
        "Webhook updated",
        async { client.update_webhook(&args.id, &payload).await.map(|_| ()) },
        || client.list_webhooks(),
    )
    .await
    .with_context(|| format!("webhooks update {}", args.id))?;
    render(list, flags.format)
}

/// Flip `is_active` based on the endpoint's current state.
async fn toggle(id: &str, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    let client = &ctx.client;
    let hooks = client.list_webhooks().await.context("webhooks toggle")?;
    let current = hooks
        .iter()
        .find(|hook| hook.id == id)
        .ok_or_else(|| anyhow::anyhow!("webhook '{id}' not found"))?;
    let activate = !current.is_active;
    let payload = WebhookUpdate {
        is_active: Some(activate),
        ..WebhookUpdate::default()
    };
    let message = if activate { "Webhook enabled" } else { "Webhook disabled" };
    let ((), list) = refresh_after(
        client.notifier(),
        message,
        async { client.update_webhook(id, &payload).await.map(|_| ()) },
        || client.list_webhooks(),
    )
    .await
    .with_context(|| format!("webhooks toggle {id}"))?;
    render(list, flags.format)
}

async fn delete(id: &str, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    let client = &ctx.client;
    let ((), list) = refresh_after(
        client.notifier(),
        "Webhook deleted",
        client.delete_webhook(id),
        || client.list_webhooks(),
    )
    .await
    .with_context(|| format!("webhooks delete {id}"))?;
    render(list, flags.format)
}

async fn test(id: &str, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    let client = &ctx.client;
    match client.test_webhook(id).await {
        Ok(ack) => {
            client.notifier().success("Test webhook queued");
            if flags.format == OutputFormat::Table && ack.is_empty() {
                return Ok(());
            }
            output::output(&ack, flags.format)
        }
        Err(error) => {
            notify_failure(client.notifier(), &error, "Failed to send test webhook");
            Err(error).with_context(|| format!("webhooks test {id}"))
        }
    }
}

async fn deliveries(id: &str, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    let state = views::load("Loading deliveries", ctx.client.webhook_deliveries(id)).await;
    let Some(deliveries) = state.into_result()? else {
        output::output_empty("No deliveries yet.", flags.format);
        return Ok(());
    };
    if flags.format != OutputFormat::Table {
        return output::output(&deliveries, flags.format);
    }
    let rows = deliveries.iter().map(DeliveryRow::from).collect::<Vec<_>>();
    output::output_rows(&rows, DELIVERY_COLUMNS, flags.format)
}
