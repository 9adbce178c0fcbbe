use anyhow::Context;
use imagine_core::entities::{JobQuery, JobStep, ProcessingJob};
use serde::Serialize;

use crate::cli::subcommands::JobCommands;
use crate::cli::subcommands::jobs::JobListArgs;
use crate::cli::{GlobalFlags, OutputFormat};
use crate::commands::shared::parse::parse_optional_enum;
use crate::context::AppContext;
use crate::output;
use crate::views::{self, format_processing_time};

pub const COLUMNS: &[&str] = &[
    "id",
    "job_type",
    "status",
    "progress",
    "failed",
    "created_at",
];

#[derive(Serialize)]
struct JobRow {
    id: String,
    job_type: String,
    status: String,
    progress: String,
    failed: u32,
    created_at: String,
}

impl From<&ProcessingJob> for JobRow {
    fn from(job: &ProcessingJob) -> Self {
        Self {
            id: job.id.clone(),
            job_type: job.job_type.to_string(),
            status: job.status.to_string(),
            progress: format!("{}/{}", job.processed_images, job.total_images),
            failed: job.failed_images,
            created_at: job.created_at.format("%Y-%m-%d %H:%M").to_string(),
        }
    }
}

#[derive(Serialize)]
struct StepRow {
    step: String,
    status: String,
    duration: String,
    error: String,
}

impl From<&JobStep> for StepRow {
    fn from(step: &JobStep) -> Self {
        Self {
            step: step.step_name.clone(),
            status: step.status.to_string(),
            duration: format_processing_time(step.duration_ms.map(|ms| ms as f64)),
            error: step.error_message.clone().unwrap_or_default(),
        }
    }
}

/// Handle `imagine jobs <subcommand>`.
pub async fn handle(action: &JobCommands, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    ctx.require_session("jobs")?;
    match action {
        JobCommands::List(args) => list(args, ctx, flags).await,
        JobCommands::Get(args) => {
            let job = ctx
                .client
                .get_job(&args.job_id)
                .await
                .with_context(|| format!("jobs get {}", args.job_id))?;
            render_job(&job, flags.format)
        }
    }
}

async fn list(args: &JobListArgs, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    let query = JobQuery {
        page: args.page,
        page_size: Some(ctx.page_size(args.page_size, flags)),
        status: parse_optional_enum(args.status.as_deref(), "status")?,
        job_type: parse_optional_enum(args.job_type.as_deref(), "job type")?,
    };
    let state = views::load("Loading jobs", ctx.client.list_jobs(&query)).await;
    let Some(jobs) = state.into_result()? else {
        output::output_empty("No processing jobs yet.", flags.format);
        return Ok(());
    };
    if flags.format != OutputFormat::Table {
        return output::output(&jobs, flags.format);
    }

    let rows = jobs.items.iter().map(JobRow::from).collect::<Vec<_>>();
    output::output_rows(&rows, COLUMNS, flags.format)?;
    println!("{} shown · {} total", rows.len(), jobs.total);
    Ok(())
}

/// One job as a summary plus its step table.
pub fn render_job(job: &ProcessingJob, format: OutputFormat) -> anyhow::Result<()> {
    if format != OutputFormat::Table {
        return output::output(job, format);
    }

    output::output(&JobRow::from(job), format)?;
    println!("completion: {:.0}%", job.completion_ratio() * 100.0);
    if let Some(error) = &job.error_message {
        println!("error: {error}");
    }
    if !job.steps.is_empty() {
        output::heading("Steps", format);
        let steps = job.steps.iter().map(StepRow::from).collect::<Vec<_>>();
        output::output_rows(&steps, &["step", "status", "duration", "error"], format)?;
    }
    Ok(())
}
