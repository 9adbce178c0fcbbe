//! Screen view-model shared by every command.
//!
//! A screen issues its loads, folds each result into a [`ViewState`], and
//! renders that. Writes never patch a loaded list in place: the list is
//! fetched again after the write succeeds.

use std::fmt::Display;
use std::future::Future;

use imagine_client::Notifier;
use imagine_core::Page;
use imagine_core::entities::JobListResponse;
use serde::Serialize;

use crate::cli::OutputFormat;
use crate::output;
use crate::progress::Progress;

#[derive(Debug, Clone, PartialEq)]
pub enum ViewState<T> {
    Loading,
    Loaded(T),
    Empty,
    Error(String),
}

/// Whether a loaded value should show the empty state.
pub trait IsEmpty {
    fn is_empty_view(&self) -> bool;
}

impl<T> IsEmpty for Vec<T> {
    fn is_empty_view(&self) -> bool {
        self.is_empty()
    }
}

impl<T> IsEmpty for Page<T> {
    fn is_empty_view(&self) -> bool {
        self.is_empty()
    }
}

impl IsEmpty for JobListResponse {
    fn is_empty_view(&self) -> bool {
        self.items.is_empty()
    }
}

impl<T: IsEmpty> ViewState<T> {
    pub fn from_result<E: Display>(result: Result<T, E>) -> Self {
        match result {
            Ok(value) if value.is_empty_view() => Self::Empty,
            Ok(value) => Self::Loaded(value),
            Err(error) => Self::Error(error.to_string()),
        }
    }
}

impl<T> ViewState<T> {
    /// Single records are never empty.
    pub fn from_record<E: Display>(result: Result<T, E>) -> Self {
        match result {
            Ok(value) => Self::Loaded(value),
            Err(error) => Self::Error(error.to_string()),
        }
    }

    /// `Loaded` value, `None` for `Empty`, and the message as an error.
    pub fn into_result(self) -> anyhow::Result<Option<T>> {
        match self {
            Self::Loaded(value) => Ok(Some(value)),
            Self::Empty => Ok(None),
            Self::Error(message) => Err(anyhow::anyhow!(message)),
            Self::Loading => Err(anyhow::anyhow!("view rendered before its load finished")),
        }
    }
}

/// Run a list load behind a spinner.
pub async fn load<T, E, F>(label: &str, future: F) -> ViewState<T>
where
    T: IsEmpty,
    E: Display,
    F: Future<Output = Result<T, E>>,
{
    let progress = Progress::spinner(label);
    let state = ViewState::from_result(future.await);
    progress.finish_clear();
    state
}

/// Run a single-record load behind a spinner.
pub async fn load_record<T, E, F>(label: &str, future: F) -> ViewState<T>
where
    E: Display,
    F: Future<Output = Result<T, E>>,
{
    let progress = Progress::spinner(label);
    let state = ViewState::from_record(future.await);
    progress.finish_clear();
    state
}

/// Render a list state. `Empty` prints `empty_message`.
pub fn render_list<T: Serialize>(
    state: ViewState<Vec<T>>,
    columns: &[&str],
    empty_message: &str,
    format: OutputFormat,
) -> anyhow::Result<()> {
    match state.into_result()? {
        Some(items) => output::output_rows(&items, columns, format),
        None => {
            output::output_empty(empty_message, format);
            Ok(())
        }
    }
}

/// Run `mutation`; on success announce `success` and reload the affected
/// list. A failed mutation skips the reload and is returned as is.
pub async fn refresh_after<W, R, E, M, F, Fut>(
    notifier: &dyn Notifier,
    success: &str,
    mutation: M,
    reload: F,
) -> Result<(W, ViewState<R>), E>
where
    R: IsEmpty,
    E: Display,
    M: Future<Output = Result<W, E>>,
    F: FnOnce() -> Fut,
    Fut: Future<Output = Result<R, E>>,
{
    let written = mutation.await?;
    notifier.success(success);
    let reloaded = ViewState::from_result(reload().await);
    Ok((written, reloaded))
}

/// Milliseconds as `N/A`, `850ms` or `1.2s`.
#[must_use]
pub fn format_processing_time(ms: Option<f64>) -> String {
    match ms {
        None => String::from("N/A"),
        Some(ms) if ms <= 0.0 || !ms.is_finite() => String::from("N/A"),
        Some(ms) if ms < 1000.0 => format!("{}ms", ms.round()),
        Some(ms) => format!("{:.1}s", ms / 1000.0),
    }
}

/// Byte counts as `B`, `KB` or `MB` with one decimal above bytes.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn format_file_size(bytes: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = 1024 * 1024;
    if bytes < KB {
        format!("{bytes} B")
    } else if bytes < MB {
        format!("{:.1} KB", bytes as f64 / KB as f64)
    } else {
        format!("{:.1} MB", bytes as f64 / MB as f64)
    }
}

/// Fraction in `[0, 1]` as a whole-or-one-decimal percentage.
#[must_use]
pub fn format_confidence(value: Option<f64>, decimals: usize) -> String {
    format!("{:.decimals$}%", value.unwrap_or(0.0) * 100.0)
}
