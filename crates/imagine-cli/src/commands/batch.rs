use anyhow::Context;
use imagine_core::entities::BatchCreateRequest;

use crate::cli::GlobalFlags;
use crate::cli::subcommands::BatchCommands;
use crate::commands::jobs::render_job;
use crate::commands::shared::feedback::notify_failure;
use crate::context::AppContext;

/// Handle `imagine batch <subcommand>`.
pub async fn handle(action: &BatchCommands, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    ctx.require_session("batch")?;
    let client = &ctx.client;
    match action {
        BatchCommands::Create(args) => {
            let payload = BatchCreateRequest {
                product_id: args.product_id.clone(),
                image_ids: args.image_ids.clone(),
            };
            match client.create_batch(&payload).await {
                Ok(job) => {
                    client
                        .notifier()
                        .success(&format!("Batch queued: {} images", job.total_images));
                    render_job(&job, flags.format)
                }
                Err(error) => {
                    notify_failure(client.notifier(), &error, "Failed to start batch");
                    Err(error).with_context(|| format!("batch create for product {}", args.product_id))
                }
            }
        }
        BatchCommands::Status(args) => {
            let job = client
                .batch_status(&args.job_id)
                .await
                .with_context(|| format!("batch status {}", args.job_id))?;
            render_job(&job, flags.format)
        }
    }
}
