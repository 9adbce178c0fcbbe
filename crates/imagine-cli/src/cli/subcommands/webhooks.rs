use clap::{Args, Subcommand};

/// Webhook endpoint commands.
#[derive(Clone, Debug, Subcommand)]
pub enum WebhookCommands {
    /// List endpoints.
    List,
    /// Register an endpoint. The signing secret is shown once.
    Create(WebhookCreateArgs),
    /// Change URL, events or description.
    Update(WebhookUpdateArgs),
    /// Flip an endpoint between active and inactive.
    Toggle(WebhookIdArgs),
    /// Delete an endpoint.
    Delete(WebhookIdArgs),
    /// Send a test event.
    Test(WebhookIdArgs),
    /// Show delivery attempts.
    Deliveries(WebhookIdArgs),
}

#[derive(Clone, Debug, Args)]
pub struct WebhookCreateArgs {
    /// Target URL (http or https).
    pub url: String,
    /// Event to subscribe to, e.g. job.completed (repeatable).
    #[arg(long = "event", required = true)]
    pub events: Vec<String>,
    #[arg(long)]
    pub description: Option<String>,
}

#[derive(Clone, Debug, Args)]
pub struct WebhookUpdateArgs {
    /// Webhook id.
    pub id: String,
    #[arg(long)]
    pub url: Option<String>,
    /// Replaces the subscribed events (repeatable).
    #[arg(long = "event")]
    pub events: Vec<String>,
    #[arg(long)]
    pub description: Option<String>,
}

#[derive(Clone, Debug, Args)]
pub struct WebhookIdArgs {
    /// Webhook id.
    pub id: String,
}
