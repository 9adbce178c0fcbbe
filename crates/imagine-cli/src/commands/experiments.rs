use anyhow::Context;
use imagine_core::entities::{
    AbExperiment, AbExperimentCreate, AbExperimentUpdate, AbVariantCreate, AbVariantStats,
};
use serde::Serialize;

use crate::cli::subcommands::ExperimentCommands;
use crate::cli::subcommands::experiments::ExperimentCreateArgs;
use crate::cli::{GlobalFlags, OutputFormat};
use crate::commands::shared::feedback::notify_failure;
use crate::commands::shared::parse::parse_variant;
use crate::context::AppContext;
use crate::output;
use crate::views::{self, ViewState, format_confidence, format_processing_time, refresh_after};

pub const COLUMNS: &[&str] = &["id", "name", "model_type", "active", "variants", "created_at"];
const RESULT_COLUMNS: &[&str] = &["model_version", "samples", "avg_confidence", "avg_time"];

#[derive(Serialize)]
struct ExperimentRow {
    id: String,
    name: String,
    model_type: String,
    active: bool,
    variants: String,
    created_at: String,
}

impl From<&AbExperiment> for ExperimentRow {
    fn from(experiment: &AbExperiment) -> Self {
        let variants = experiment
            .variants
            .iter()
            .map(|v| {
                let control = if v.is_control { " (control)" } else { "" };
                format!("{} {}%{control}", v.model_version, v.weight)
            })
            .collect::<Vec<_>>()
            .join(", ");
        Self {
            id: experiment.id.clone(),
            name: experiment.name.clone(),
            model_type: experiment.model_type.clone(),
            active: experiment.is_active,
            variants,
            created_at: experiment.created_at.format("%Y-%m-%d").to_string(),
        }
    }
}

#[derive(Serialize)]
struct ResultRow {
    model_version: String,
    samples: u64,
    avg_confidence: String,
    avg_time: String,
}

impl From<&AbVariantStats> for ResultRow {
    fn from(stats: &AbVariantStats) -> Self {
        Self {
            model_version: stats.model_version.clone(),
            samples: stats.sample_count,
            avg_confidence: stats
                .avg_confidence
                .map_or_else(|| "N/A".into(), |c| format_confidence(Some(c), 1)),
            avg_time: format_processing_time(stats.avg_processing_time_ms),
        }
    }
}

/// Handle `imagine ab-testing <subcommand>`.
pub async fn handle(action: &ExperimentCommands, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    ctx.require_session("ab-testing")?;
    match action {
        ExperimentCommands::List => show(ctx, flags).await,
        ExperimentCommands::Create(args) => create(args, ctx, flags).await,
        ExperimentCommands::Toggle(args) => toggle(&args.id, ctx, flags).await,
        ExperimentCommands::Delete(args) => delete(&args.id, ctx, flags).await,
        ExperimentCommands::Results(args) => results(&args.id, ctx, flags).await,
    }
}

/// The A/B testing screen.
pub async fn show(ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    let state = views::load("Loading experiments", ctx.client.list_experiments()).await;
    render(state, flags.format)
}

fn render(state: ViewState<Vec<AbExperiment>>, format: OutputFormat) -> anyhow::Result<()> {
    let Some(experiments) = state.into_result()? else {
        output::output_empty("No experiments yet.", format);
        return Ok(());
    };
    if format != OutputFormat::Table {
        return output::output(&experiments, format);
    }
    let rows = experiments.iter().map(ExperimentRow::from).collect::<Vec<_>>();
    output::output_rows(&rows, COLUMNS, format)
}

/// Variants in the given order; the first is the control.
fn build_request(args: &ExperimentCreateArgs) -> anyhow::Result<AbExperimentCreate> {
    let variants = args
        .variants
        .iter()
        .enumerate()
        .map(|(index, raw)| {
            parse_variant(raw).map(|(model_version, weight)| AbVariantCreate {
                model_version,
                weight,
                is_control: index == 0,
            })
        })
        .collect::<anyhow::Result<Vec<_>>>()?;
    Ok(AbExperimentCreate {
        name: args.name.trim().to_string(),
        model_type: args.model_type.clone(),
        variants,
    })
}

async fn create(args: &ExperimentCreateArgs, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    let client = &ctx.client;
    let request = build_request(args)?;
    match refresh_after(
        client.notifier(),
        "Experiment created",
        client.create_experiment(&request),
        || client.list_experiments(),
    )
    .await
    {
        Ok((_, list)) => render(list, flags.format),
        Err(error) => {
            notify_failure(client.notifier(), &error, "Failed to create experiment");
            Err(error).context("ab-testing create")
        }
    }
}

async fn toggle(id: &str, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    let client = &ctx.client;
    let experiments = client.list_experiments().await.context("ab-testing toggle")?;
    let current = experiments
        .iter()
        .find(|experiment| experiment.id == id)
        .ok_or_else(|| anyhow::anyhow!("experiment '{id}' not found"))?;
    let payload = AbExperimentUpdate {
        is_active: Some(!current.is_active),
    };
    let message = if current.is_active {
        "Experiment paused"
    } else {
        "Experiment activated"
    };
    let (_, list) = refresh_after(
        client.notifier(),
        message,
        client.update_experiment(id, &payload),
        || client.list_experiments(),
    )
    .await
    .with_context(|| format!("ab-testing toggle {id}"))?;
    render(list, flags.format)
}

async fn delete(id: &str, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    let client = &ctx.client;
    let ((), list) = refresh_after(
        client.notifier(),
        "Experiment deleted",
        client.delete_experiment(id),
        || client.list_experiments(),
    )
    .await
    .with_context(|| format!("ab-testing delete {id}"))?;
    render(list, flags.format)
}

async fn results(id: &str, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    let state = views::load("Loading results", ctx.client.experiment_results(id)).await;
    let Some(stats) = state.into_result()? else {
        output::output_empty("No results yet.", flags.format);
        return Ok(());
    };
    if flags.format != OutputFormat::Table {
        return output::output(&stats, flags.format);
    }
    let rows = stats.iter().map(ResultRow::from).collect::<Vec<_>>();
    output::output_rows(&rows, RESULT_COLUMNS, flags.format)
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn args(variants: &[&str]) -> ExperimentCreateArgs {
        ExperimentCreateArgs {
            name: " classifier v2 ".into(),
            model_type: "classification".into(),
            variants: variants.iter().map(|v| (*v).to_string()).collect(),
        }
    }

    #[test]
    fn first_variant_is_control() {
        let request = build_request(&args(&["v1:50", "v2:50"])).unwrap();
        assert_eq!(request.name, "classifier v2");
        assert!(request.variants[0].is_control);
        assert!(!request.variants[1].is_control);
        assert_eq!(request.variants[1].model_version, "v2");
    }

    #[test]
    fn malformed_variant_is_rejected() {
        let err = build_request(&args(&["v1:50", "v2"])).unwrap_err();
        assert!(err.to_string().contains("version:weight"));
    }

    #[test]
    fn result_row_shows_na_without_samples() {
        let row = ResultRow::from(&AbVariantStats {
            variant_id: "var-1".into(),
            model_version: "v1".into(),
            sample_count: 0,
            avg_confidence: None,
            avg_processing_time_ms: None,
        });
        assert_eq!(row.avg_confidence, "N/A");
        assert_eq!(row.avg_time, "N/A");

        let row = ResultRow::from(&AbVariantStats {
            avg_confidence: Some(0.912),
            avg_processing_time_ms: Some(420.0),
            sample_count: 12,
            ..AbVariantStats {
                variant_id: "var-2".into(),
                model_version: "v2".into(),
                sample_count: 0,
                avg_confidence: None,
                avg_processing_time_ms: None,
            }
        });
        assert_eq!(row.avg_confidence, "91.2%");
        assert_eq!(row.avg_time, "420ms");
    }
}
