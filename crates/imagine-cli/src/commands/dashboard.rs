use imagine_core::entities::{CategoryDistribution, DashboardStats, RecentActivity};
use serde::Serialize;

use crate::cli::{GlobalFlags, OutputFormat};
use crate::context::AppContext;
use crate::output::{self, heading};
use crate::progress::Progress;
use crate::views::{ViewState, format_processing_time};

const BAR_WIDTH: usize = 24;

#[derive(Serialize)]
struct DashboardResponse {
    stats: DashboardStats,
    categories: Vec<CategoryDistribution>,
    recent_activity: Vec<RecentActivity>,
}

#[derive(Serialize)]
struct StatsView {
    total_products: u64,
    images_uploaded: u64,
    analyses_completed: u64,
    defects_detected: u64,
    active_jobs: u64,
    avg_processing_time: String,
}

#[derive(Serialize)]
struct CategoryRow {
    category: String,
    count: u64,
    share: String,
}

/// Stats are required; category and activity loads are best-effort and
/// only logged when they fail.
pub async fn handle(ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    ctx.require_session("dashboard")?;
    let client = &ctx.client;

    let progress = Progress::spinner("Loading dashboard");
    let (stats, categories, recent) = tokio::join!(
        client.dashboard_stats(),
        client.category_distribution(),
        client.recent_activity(),
    );
    progress.finish_clear();

    let Some(stats) = ViewState::from_record(stats).into_result()? else {
        return Ok(());
    };
    let categories = best_effort("category distribution", ViewState::from_result(categories));
    let recent_activity = best_effort("recent activity", ViewState::from_result(recent));

    if flags.format != OutputFormat::Table {
        return output::output(
            &DashboardResponse {
                stats,
                categories,
                recent_activity,
            },
            flags.format,
        );
    }

    output::output(&stats_view(&stats), flags.format)?;

    if !categories.is_empty() {
        heading("Category Distribution", flags.format);
        output::output_rows(&category_rows(&categories), &["category", "count", "share"], flags.format)?;
    }
    if !recent_activity.is_empty() {
        heading("Recent Activity", flags.format);
        output::output_rows(
            &recent_activity,
            &["job_type", "total_images", "status", "created_at"],
            flags.format,
        )?;
    }
    Ok(())
}

fn best_effort<T>(what: &str, state: ViewState<Vec<T>>) -> Vec<T> {
    match state {
        ViewState::Loaded(items) => items,
        ViewState::Error(error) => {
            tracing::warn!(%error, "dashboard {what} unavailable");
            Vec::new()
        }
        ViewState::Empty | ViewState::Loading => Vec::new(),
    }
}

fn stats_view(stats: &DashboardStats) -> StatsView {
    StatsView {
        total_products: stats.total_products,
        images_uploaded: stats.total_images,
        analyses_completed: stats.completed_analyses,
        defects_detected: stats.total_defects,
        active_jobs: stats.active_jobs,
        avg_processing_time: format_processing_time(stats.avg_processing_time_ms),
    }
}

fn category_rows(categories: &[CategoryDistribution]) -> Vec<CategoryRow> {
    let max = categories.iter().map(|c| c.count).max().unwrap_or(1).max(1);
    categories
        .iter()
        .map(|c| CategoryRow {
            category: c.category.clone(),
            count: c.count,
            share: category_bar(c.count, max, BAR_WIDTH),
        })
        .collect()
}

/// Bar whose length is `count` relative to the largest category.
fn category_bar(count: u64, max: u64, width: usize) -> String {
    let filled = if max == 0 {
        0
    } else {
        usize::try_from(count.saturating_mul(width as u64) / max).unwrap_or(width)
    };
    "#".repeat(filled.min(width))
}
