use anyhow::Context;
use imagine_core::entities::{ExportFilter, ExportJob, ExportRequest};
use serde::Serialize;

use crate::cli::subcommands::ExportCommands;
use crate::cli::subcommands::exports::ExportCreateArgs;
use crate::cli::{GlobalFlags, OutputFormat};
use crate::commands::shared::feedback::notify_failure;
use crate::commands::shared::parse::{parse_enum, parse_timestamp};
use crate::context::AppContext;
use crate::output;
use crate::views::{self, ViewState, format_file_size, refresh_after};

pub const COLUMNS: &[&str] = &["id", "export_type", "status", "rows", "size", "created_at", "download"];

#[derive(Serialize)]
struct ExportRow {
    id: String,
    export_type: String,
    status: String,
    rows: String,
    size: String,
    created_at: String,
    download: String,
}

impl From<&ExportJob> for ExportRow {
    fn from(export: &ExportJob) -> Self {
        Self {
            id: export.id.clone(),
            export_type: export.export_type.to_string(),
            status: export.status.to_string(),
            rows: export.row_count.map_or_else(|| "-".into(), |n| n.to_string()),
            size: export.file_size_bytes.map_or_else(|| "-".into(), format_file_size),
            created_at: export.created_at.format("%Y-%m-%d %H:%M").to_string(),
            download: export.ready_download().unwrap_or("-").to_string(),
        }
    }
}

/// Handle `imagine exports <subcommand>`.
pub async fn handle(action: &ExportCommands, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    ctx.require_session("exports")?;
    match action {
        ExportCommands::List => show(ctx, flags).await,
        ExportCommands::Create(args) => create(args, ctx, flags).await,
        ExportCommands::Get(args) => get(&args.id, ctx, flags).await,
        ExportCommands::Delete(args) => delete(&args.id, ctx, flags).await,
    }
}

/// The exports screen.
pub async fn show(ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    let state = views::load("Loading exports", ctx.client.list_exports()).await;
    render(state, flags.format)
}

fn render(state: ViewState<Vec<ExportJob>>, format: OutputFormat) -> anyhow::Result<()> {
    let Some(exports) = state.into_result()? else {
        output::output_empty("No exports yet.", format);
        return Ok(());
    };
    if format != OutputFormat::Table {
        return output::output(&exports, format);
    }
    let rows = exports.iter().map(ExportRow::from).collect::<Vec<_>>();
    output::output_rows(&rows, COLUMNS, format)
}

fn build_request(args: &ExportCreateArgs) -> anyhow::Result<ExportRequest> {
    let filters = ExportFilter {
        date_from: args
            .date_from
            .as_deref()
            .map(|raw| parse_timestamp(raw, "date-from"))
            .transpose()?,
        date_to: args
            .date_to
            .as_deref()
            .map(|raw| parse_timestamp(raw, "date-to"))
            .transpose()?,
        status: args.status.clone(),
        category: args.category.clone(),
        product_ids: (!args.product_ids.is_empty()).then(|| args.product_ids.clone()),
    };
    if let (Some(from), Some(to)) = (filters.date_from, filters.date_to)
        && from > to
    {
        anyhow::bail!("--date-from must not be after --date-to");
    }
    Ok(ExportRequest {
        export_type: parse_enum(&args.export_type, "export type")?,
        filters,
    })
}

async fn create(args: &ExportCreateArgs, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    let client = &ctx.client;
    let request = build_request(args)?;
    match refresh_after(
        client.notifier(),
        "Export started",
        client.create_export(&request),
        || client.list_exports(),
    )
    .await
    {
        Ok((export, list)) => {
            tracing::debug!(export_id = %export.id, "export requested");
            render(list, flags.format)
        }
        Err(error) => {
            notify_failure(client.notifier(), &error, "Failed to start export");
            Err(error).context("exports create")
        }
    }
}

async fn get(id: &str, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    let export = ctx
        .client
        .get_export(id)
        .await
        .with_context(|| format!("exports get {id}"))?;
    if flags.format != OutputFormat::Table {
        return output::output(&export, flags.format);
    }
    output::output(&ExportRow::from(&export), flags.format)?;
    match (export.ready_download(), &export.error_message) {
        (Some(url), _) => println!("download: {url}"),
        (None, Some(error)) => println!("error: {error}"),
        (None, None) if !export.status.is_terminal() => {
            println!("Export is still {}; check again shortly.", export.status);
        }
        (None, None) => {}
    }
    Ok(())
}

async fn delete(id: &str, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    let client = &ctx.client;
    let ((), list) = refresh_after(
        client.notifier(),
        "Export deleted",
        client.delete_export(id),
        || client.list_exports(),
    )
    .await
    .with_context(|| format!("exports delete {id}"))?;
    render(list, flags.format)
}

#[cfg(test)]
mod tests {
    use imagine_core::enums::ExportType;
    use pretty_assertions::assert_eq;

    use super::*;

    fn args(export_type: &str) -> ExportCreateArgs {
        ExportCreateArgs {
            export_type: export_type.into(),
            date_from: None,
            date_to: None,
            status: None,
            category: None,
            product_ids: Vec::new(),
        }
    }

    #[test]
    fn request_omits_unset_filters() {
        let request = build_request(&args("analysis-pdf")).unwrap();
        assert_eq!(request.export_type, ExportType::AnalysisPdf);
        assert_eq!(request.filters, ExportFilter::default());
    }

    #[test]
    fn request_parses_dates_and_products() {
        let mut create = args("products_csv");
        create.date_from = Some("2025-01-01".into());
        create.date_to = Some("2025-02-01T00:00:00Z".into());
        create.product_ids = vec!["p-1".into(), "p-2".into()];

        let request = build_request(&create).unwrap();
        assert_eq!(
            request.filters.date_from.map(|d| d.to_rfc3339()),
            Some("2025-01-01T00:00:00+00:00".to_string())
        );
        assert_eq!(request.filters.product_ids, Some(vec!["p-1".to_string(), "p-2".to_string()]));
    }

    #[test]
    fn inverted_date_range_is_rejected() {
        let mut create = args("analysis_csv");
        create.date_from = Some("2025-03-01".into());
        create.date_to = Some("2025-01-01".into());
        assert!(build_request(&create).is_err());
    }

    #[test]
    fn download_only_for_completed_exports() {
        let export: ExportJob = serde_json::from_value(serde_json::json!({
            "id": "e-1",
            "export_type": "analysis_csv",
            "status": "processing",
            "file_size_bytes": null,
            "row_count": null,
            "expires_at": null,
            "download_url": "https://files.example.com/e-1.csv",
            "created_at": "2025-01-01T00:00:00Z"
        }))
        .unwrap();
        assert_eq!(ExportRow::from(&export).download, "-");

        let done = ExportJob {
            status: imagine_core::enums::ExportStatus::Completed,
            file_size_bytes: Some(2048),
            ..export
        };
        let row = ExportRow::from(&done);
        assert_eq!(row.download, "https://files.example.com/e-1.csv");
        assert_eq!(row.size, "2.0 KB");
    }
}
