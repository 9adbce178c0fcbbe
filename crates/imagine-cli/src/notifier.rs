//! Terminal notification sink.

use imagine_client::{Notification, NotificationLevel, Notifier};

use crate::ui;

/// Prints notifications to stderr with a status glyph and mirrors them to
/// tracing. Success and info lines are suppressed by `--quiet`; errors never
/// are.
#[derive(Debug, Default, Clone, Copy)]
pub struct TerminalNotifier;

impl Notifier for TerminalNotifier {
    fn notify(&self, notification: Notification) {
        tracing::debug!(level = ?notification.level, message = %notification.message, "notify");
        if let Some(line) = format_line(&notification, ui::prefs().notices) {
            eprintln!("{line}");
        }
    }
}

fn format_line(notification: &Notification, notices: bool) -> Option<String> {
    let glyph = match notification.level {
        NotificationLevel::Error => "✖",
        NotificationLevel::Success if notices => "✔",
        NotificationLevel::Info if notices => "ℹ",
        NotificationLevel::Success | NotificationLevel::Info => return None,
    };
    Some(format!("{glyph} {}", notification.message))
}
