//! User-facing collaborators: transient notifications and destructive-action confirmation.

use async_trait::async_trait;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Success,
    Error,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Success => f.write_str("SUCCESS"),
            Severity::Error => f.write_str("ERROR"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub severity: Severity,
    pub summary: String,
    pub detail: String,
}

impl Notification {
    pub fn success(detail: impl Into<String>) -> Self {
        Self {
            severity: Severity::Success,
            summary: "Success".to_string(),
            detail: detail.into(),
        }
    }

    pub fn error(detail: impl Into<String>) -> Self {
        Self::error_with_summary("Error", detail)
    }

    pub fn error_with_summary(summary: impl Into<String>, detail: impl Into<String>) -> Self {
        Self {
            severity: Severity::Error,
            summary: summary.into(),
            detail: detail.into(),
        }
    }
}

impl fmt::Display for Notification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}: {}", self.severity, self.summary, self.detail)
    }
}

/// Fire-and-forget message display.
#[cfg_attr(test, mockall::automock)]
pub trait NotificationSink: Send + Sync {
    fn notify(&self, notification: Notification);
}

/// Gate for destructive actions. Resolves to `true` only when the user accepts.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ConfirmationPrompt: Send + Sync {
    async fn confirm(&self, message: &str) -> bool;
}
