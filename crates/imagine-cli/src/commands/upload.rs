//! `imagine upload`: create a product, upload its first image, and follow
//! the processing pipeline live.

use std::path::Path;

use anyhow::Context;
use imagine_client::{ClientError, LiveError};
use imagine_core::entities::{
    PresignedUrlRequest, Product, ProductCreate, ProcessingUpdate, ProcessingUpdateKind,
};
use imagine_core::enums::{StepName, StepStatus};
use serde::Serialize;

use crate::cli::GlobalFlags;
use crate::cli::root_commands::UploadArgs;
use crate::commands::shared::feedback::notify_failure;
use crate::commands::shared::parse::parse_optional_enum;
use crate::context::AppContext;
use crate::output::output;
use crate::progress::Progress;
use crate::views::format_file_size;

pub const LIVE_UNAVAILABLE: &str = "Live updates unavailable. Check results on the product page later.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
enum Outcome {
    Completed,
    Failed,
    Unavailable,
    NotFollowed,
}

#[derive(Serialize)]
struct SkippedFile {
    file: String,
    reason: String,
}

#[derive(Serialize)]
struct UploadResponse {
    product_id: String,
    image_id: String,
    job_id: String,
    file: String,
    size: String,
    skipped: Vec<SkippedFile>,
    outcome: Outcome,
    steps: Vec<StepReport>,
}

struct ImageFile {
    path: String,
    file_name: String,
    content_type: &'static str,
}

pub async fn handle(args: &UploadArgs, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    ctx.require_session("upload")?;
    let client = &ctx.client;

    let (mut images, mut skipped) = partition_files(&args.files);
    if images.is_empty() {
        anyhow::bail!("no image files to upload (accepted: jpg, jpeg, png, gif, webp, bmp, tif, tiff)");
    }
    let image = images.remove(0);
    for extra in images {
        skipped.push(SkippedFile {
            file: extra.path,
            reason: "only the first image is uploaded".into(),
        });
    }
    for file in &skipped {
        tracing::warn!(file = %file.file, reason = %file.reason, "skipping file");
    }

    let bytes = tokio::fs::read(&image.path)
        .await
        .with_context(|| format!("failed to read {}", image.path))?;
    let size = format_file_size(u64::try_from(bytes.len()).unwrap_or(u64::MAX));

    let payload = ProductCreate {
        title: args.title.clone(),
        description: args.description.clone(),
        category: parse_optional_enum(args.category.as_deref(), "category")?,
    };
    let product = match client.create_product(&payload).await {
        Ok(product) => product,
        Err(error) => {
            notify_failure(client.notifier(), &error, "Failed to create product");
            return Err(error).context("upload: product was not created");
        }
    };

    let progress = Progress::spinner(&format!("Uploading {} ({size})", image.file_name));
    let uploaded = if args.presigned {
        upload_presigned(ctx, &product, &image, bytes).await
    } else {
        client
            .direct_upload(&product.id, &image.file_name, image.content_type, bytes)
            .await
            .map(|r| (r.image_id, r.job_id))
    };
    progress.finish_clear();
    let (image_id, job_id) = match uploaded {
        Ok(ids) => ids,
        Err(error) => {
            notify_failure(client.notifier(), &error, "Upload failed");
            return Err(error)
                .with_context(|| format!("upload failed; product {} was created without images", product.id));
        }
    };
    client.notifier().success("Upload complete! Processing started.");

    let follow = !args.no_follow && ctx.config.general.follow_uploads;
    let (outcome, steps) = if follow {
        follow_job(ctx, &job_id).await
    } else {
        (Outcome::NotFollowed, PipelineTracker::default().report())
    };

    output(
        &UploadResponse {
            product_id: product.id,
            image_id,
            job_id,
            file: image.path,
            size,
            skipped,
            outcome,
            steps,
        },
        flags.format,
    )
}

async fn upload_presigned(
    ctx: &AppContext,
    product: &Product,
    image: &ImageFile,
    bytes: Vec<u8>,
) -> Result<(String, String), ClientError> {
    let client = &ctx.client;
    let presigned = client
        .presigned_url(&PresignedUrlRequest {
            product_id: product.id.clone(),
            filename: image.file_name.clone(),
            content_type: image.content_type.to_string(),
            file_size_bytes: u64::try_from(bytes.len()).unwrap_or(u64::MAX),
        })
        .await?;
    client
        .upload_to_presigned_url(&presigned.upload_url, image.content_type, bytes)
        .await?;
    let confirmed = client.confirm_upload(&presigned.image_id).await?;
    Ok((confirmed.image_id, confirmed.job_id))
}

/// Follow live updates until the job ends. Channel failures degrade to a
/// static notice; they never fail the command.
async fn follow_job(ctx: &AppContext, job_id: &str) -> (Outcome, Vec<StepReport>) {
    let client = &ctx.client;
    let mut tracker = PipelineTracker::default();
    let total = u64::try_from(StepName::PIPELINE.len()).unwrap_or(5);
    let progress = Progress::steps(total, "Waiting for pipeline");

    let channel = match client.live_channel() {
        Ok(channel) => channel,
        Err(error) => return unavailable(ctx, &progress, &error, tracker),
    };
    let mut stream = match channel.connect(job_id).await {
        Ok(stream) => stream,
        Err(error) => return unavailable(ctx, &progress, &error, tracker),
    };

    while let Some(item) = stream.next().await {
        let update = match item {
            Ok(update) => update,
            Err(error) => return unavailable(ctx, &progress, &error, tracker),
        };
        if let Some(line) = tracker.apply(&update) {
            progress.println(&line);
        }
        progress.set_position(tracker.finished_steps());
        if let Some(label) = tracker.running_label() {
            progress.set_message(label);
        }

        match update.kind {
            ProcessingUpdateKind::JobComplete => {
                progress.finish_ok("Analysis complete");
                client.notifier().success("Analysis complete!");
                return (Outcome::Completed, tracker.report());
            }
            ProcessingUpdateKind::JobFailed => {
                progress.finish_err("Processing failed");
                client.notifier().error("Processing failed");
                return (Outcome::Failed, tracker.report());
            }
            ProcessingUpdateKind::StepUpdate => {}
        }
    }

    tracing::debug!(job_id, "live stream ended before a terminal update");
    progress.finish_clear();
    client.notifier().info(LIVE_UNAVAILABLE);
    (Outcome::Unavailable, tracker.report())
}

fn unavailable(
    ctx: &AppContext,
    progress: &Progress,
    error: &LiveError,
    tracker: PipelineTracker,
) -> (Outcome, Vec<StepReport>) {
    tracing::warn!(%error, "live updates failed");
    progress.finish_err("Live updates unavailable");
    ctx.client.notifier().info(LIVE_UNAVAILABLE);
    (Outcome::Unavailable, tracker.report())
}

// ---------------------------------------------------------------------------
// File selection
// ---------------------------------------------------------------------------

fn partition_files(paths: &[String]) -> (Vec<ImageFile>, Vec<SkippedFile>) {
    let mut images = Vec::new();
    let mut skipped = Vec::new();
    for path in paths {
        let file_name = Path::new(path)
            .file_name()
            .map_or_else(|| path.clone(), |name| name.to_string_lossy().into_owned());
        match image_content_type(path) {
            Some(content_type) => images.push(ImageFile {
                path: path.clone(),
                file_name,
                content_type,
            }),
            None => skipped.push(SkippedFile {
                file: path.clone(),
                reason: "not an image".into(),
            }),
        }
    }
    (images, skipped)
}

/// Image MIME type from the file extension.
fn image_content_type(path: &str) -> Option<&'static str> {
    let ext = Path::new(path).extension()?.to_str()?.to_ascii_lowercase();
    match ext.as_str() {
        "jpg" | "jpeg" => Some("image/jpeg"),
        "png" => Some("image/png"),
        "gif" => Some("image/gif"),
        "webp" => Some("image/webp"),
        "bmp" => Some("image/bmp"),
        "tif" | "tiff" => Some("image/tiff"),
        _ => None,
    }
}

// ---------------------------------------------------------------------------
// Pipeline tracking
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
struct StepReport {
    step: &'static str,
    label: &'static str,
    status: StepStatus,
}

/// Status of each pipeline step as reported by live updates.
#[derive(Debug)]
struct PipelineTracker {
    steps: Vec<(StepName, StepStatus)>,
}

impl Default for PipelineTracker {
    fn default() -> Self {
        Self {
            steps: StepName::PIPELINE
                .iter()
                .map(|step| (*step, StepStatus::Pending))
                .collect(),
        }
    }
}

impl PipelineTracker {
    /// Record a step update. Returns a line to print when a step finishes.
    fn apply(&mut self, update: &ProcessingUpdate) -> Option<String> {
        let (name, status) = (update.step_name()?, update.step_status()?);
        let slot = self.steps.iter_mut().find(|(step, _)| *step == name)?;
        if slot.1 == status {
            return None;
        }
        slot.1 = status;
        match status {
            StepStatus::Completed => Some(format!("✔ {}", name.label())),
            StepStatus::Failed => Some(format!("✖ {} failed", name.label())),
            StepStatus::Skipped => Some(format!("- {} skipped", name.label())),
            StepStatus::Pending | StepStatus::Running | StepStatus::Unknown => None,
        }
    }

    fn finished_steps(&self) -> u64 {
        let finished = self.steps.iter().filter(|(_, s)| s.is_finished()).count();
        u64::try_from(finished).unwrap_or(u64::MAX)
    }

    fn running_label(&self) -> Option<&'static str> {
        self.steps
            .iter()
            .find(|(_, status)| *status == StepStatus::Running)
            .map(|(step, _)| step.label())
    }

    fn report(&self) -> Vec<StepReport> {
        self.steps
            .iter()
            .map(|(step, status)| StepReport {
                step: step.as_str(),
                label: step.label(),
                status: *status,
            })
            .collect()
    }
}
