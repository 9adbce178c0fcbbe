use clap::{Args, Subcommand};

use crate::cli::subcommands::{
    AuthCommands, BatchCommands, ExperimentCommands, ExportCommands, JobCommands, OrgCommands,
    ProductCommands, RateLimitCommands, WebhookCommands,
};

/// Top-level command tree. One command per dashboard screen.
#[derive(Clone, Debug, Subcommand)]
pub enum Commands {
    /// Authentication and session.
    Auth {
        #[command(subcommand)]
        action: AuthCommands,
    },
    /// Organization statistics, recent activity and category breakdown.
    Dashboard,
    /// Product catalog.
    Products {
        #[command(subcommand)]
        action: ProductCommands,
    },
    /// Create a product from image files and follow its processing live.
    Upload(UploadArgs),
    /// Show the analysis of one product image.
    Analysis(AnalysisArgs),
    /// Processing jobs.
    Jobs {
        #[command(subcommand)]
        action: JobCommands,
    },
    /// Batch processing.
    Batch {
        #[command(subcommand)]
        action: BatchCommands,
    },
    /// Data exports.
    Exports {
        #[command(subcommand)]
        action: ExportCommands,
    },
    /// Webhook endpoints of the active organization.
    Webhooks {
        #[command(subcommand)]
        action: WebhookCommands,
    },
    /// Organizations and membership.
    Org {
        #[command(subcommand)]
        action: OrgCommands,
    },
    /// Model A/B experiments (admin).
    #[command(name = "ab-testing")]
    AbTesting {
        #[command(subcommand)]
        action: ExperimentCommands,
    },
    /// API rate limits (admin).
    #[command(name = "rate-limits")]
    RateLimits {
        #[command(subcommand)]
        action: RateLimitCommands,
    },
    /// Open a dashboard path such as `/products/<id>` or `/settings/webhooks`.
    Open(OpenArgs),
}

/// Arguments for `imagine upload`.
#[derive(Clone, Debug, Args)]
pub struct UploadArgs {
    /// Product title.
    #[arg(long)]
    pub title: String,
    /// Product description.
    #[arg(long)]
    pub description: Option<String>,
    /// Product category (e.g. footwear, home_garden).
    #[arg(long)]
    pub category: Option<String>,
    /// Image files. Non-image files are skipped; the first image is uploaded.
    #[arg(required = true)]
    pub files: Vec<String>,
    /// Return after the upload instead of following processing.
    #[arg(long)]
    pub no_follow: bool,
    /// Upload straight to object storage through a presigned URL.
    #[arg(long)]
    pub presigned: bool,
}

/// Arguments for `imagine analysis`.
#[derive(Clone, Debug, Args)]
pub struct AnalysisArgs {
    /// Product image id.
    pub image_id: String,
}

/// Arguments for `imagine open`.
#[derive(Clone, Debug, Args)]
pub struct OpenArgs {
    /// Dashboard path, e.g. `/dashboard` or `/analysis/<image-id>`.
    pub path: String,
}
