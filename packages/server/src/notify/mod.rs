//! Notification gateway: staff alert and submitter confirmation emails.

mod mailgun;
pub mod templates;

pub use mailgun::MailgunNotifier;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::models::contact::ContactDraft;

/// Everything a notification needs to know about one submission.
#[derive(Debug, Clone, Copy)]
pub struct Notice<'a> {
    pub draft: &'a ContactDraft,
    /// Stored identity. `None` when persistence was skipped.
    pub contact_id: Option<Uuid>,
    pub submitted_at: DateTime<Utc>,
}

#[derive(Debug, thiserror::Error)]
pub enum NotifyError {
    #[error("email provider is not configured")]
    NotConfigured,
    #[error("email provider timed out")]
    Timeout,
    #[error("email transport failed: {0}")]
    Transport(String),
    #[error("email provider rejected the message ({status}): {body}")]
    Provider { status: u16, body: String },
}

#[async_trait]
pub trait Notifier: Send + Sync {
    fn is_configured(&self) -> bool;

    /// Alerts staff about a new lead. Replies go to the submitter.
    async fn notify_staff(&self, notice: &Notice<'_>) -> Result<(), NotifyError>;

    /// Confirms receipt to the submitter.
    async fn notify_user(&self, notice: &Notice<'_>) -> Result<(), NotifyError>;
}
