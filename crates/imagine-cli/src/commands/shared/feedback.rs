use imagine_client::{ClientError, Notifier};

/// Whether the request pipeline has already shown a message for `error`.
#[must_use]
pub const fn pipeline_notified(error: &ClientError) -> bool {
    matches!(
        error,
        ClientError::Network(_)
            | ClientError::Server { .. }
            | ClientError::RateLimited { .. }
            | ClientError::Validation { detail: Some(_) }
    )
}

/// Show the screen's own failure message unless the pipeline already did.
pub fn notify_failure(notifier: &dyn Notifier, error: &ClientError, fallback: &str) {
    if !pipeline_notified(error) {
        notifier.error(fallback);
    }
}

#[cfg(test)]
mod tests {
    use imagine_client::MemoryNotifier;

    use super::*;

    #[test]
    fn fallback_only_for_unannounced_errors() {
        let notifier = MemoryNotifier::default();

        notify_failure(&notifier, &ClientError::Server { status: 502 }, "Upload failed");
        notify_failure(
            &notifier,
            &ClientError::Validation {
                detail: Some("File too large".into()),
            },
            "Upload failed",
        );
        assert!(notifier.messages().is_empty());

        notify_failure(&notifier, &ClientError::Unauthorized, "Login failed");
        notify_failure(&notifier, &ClientError::Validation { detail: None }, "Upload failed");
        assert_eq!(
            notifier.messages(),
            vec!["Login failed".to_string(), "Upload failed".to_string()]
        );
    }
}
