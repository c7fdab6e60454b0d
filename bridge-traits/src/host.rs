//! Host UI Affordances
//!
//! Dialogs and toasts the admin panel offers to plugins. Only the rename
//! orchestrator uses these; the naming core never prompts.

use async_trait::async_trait;

use crate::error::Result;

/// A yes/no confirmation dialog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfirmRequest {
    pub title: String,
    pub content: String,
    /// Label of the positive choice
    pub confirm_label: String,
    /// Label of the cancel choice
    pub cancel_label: String,
}

impl ConfirmRequest {
    pub fn new(title: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            content: content.into(),
            confirm_label: "Confirm".to_string(),
            cancel_label: "Go back".to_string(),
        }
    }

    pub fn confirm_label(mut self, label: impl Into<String>) -> Self {
        self.confirm_label = label.into();
        self
    }

    pub fn cancel_label(mut self, label: impl Into<String>) -> Self {
        self.cancel_label = label.into();
        self
    }
}

/// Blocking-style confirmation owned by the host.
#[async_trait]
pub trait ConfirmationPrompt: Send + Sync {
    /// Resolves to `true` only when the user picked the positive choice.
    async fn confirm(&self, request: ConfirmRequest) -> Result<bool>;
}

/// Non-blocking user notifications.
#[async_trait]
pub trait Notifier: Send + Sync {
    /// Success/info toast
    async fn notice(&self, message: &str) -> Result<()>;

    /// Failure toast
    async fn alert(&self, message: &str) -> Result<()>;
}
