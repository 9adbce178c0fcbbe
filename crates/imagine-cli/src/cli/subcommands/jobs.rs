use clap::{Args, Subcommand};

/// Processing job commands.
#[derive(Clone, Debug, Subcommand)]
pub enum JobCommands {
    /// List processing jobs.
    List(JobListArgs),
    /// Show one job with its steps.
    Get(JobGetArgs),
}

#[derive(Clone, Debug, Args)]
pub struct JobListArgs {
    /// Status filter (queued, processing, completed, failed, cancelled).
    #[arg(long)]
    pub status: Option<String>,
    /// Job type filter (single, batch).
    #[arg(long)]
    pub job_type: Option<String>,
    #[arg(long)]
    pub page: Option<u32>,
    #[arg(long)]
    pub page_size: Option<u32>,
}

#[derive(Clone, Debug, Args)]
pub struct JobGetArgs {
    /// Job id.
    pub job_id: String,
}

/// Batch processing commands.
#[derive(Clone, Debug, Subcommand)]
pub enum BatchCommands {
    /// Queue analysis for several images of one product.
    Create(BatchCreateArgs),
    /// Show the status of a batch job.
    Status(JobGetArgs),
}

#[derive(Clone, Debug, Args)]
pub struct BatchCreateArgs {
    /// Product id.
    #[arg(long)]
    pub product_id: String,
    /// Image ids to process.
    #[arg(required = true)]
    pub image_ids: Vec<String>,
}
