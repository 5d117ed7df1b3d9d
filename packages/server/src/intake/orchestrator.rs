use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::{error, info, instrument, warn};
use uuid::Uuid;

use super::validation::{self, Validation};
use crate::models::contact::{Contact, ContactDraft, ContactForm, FieldError, RequestContext};
use crate::notify::{Notice, Notifier, NotifyError};
use crate::store::{ContactStore, StoreError};

/// What to do with a submission while storage is unreachable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DurabilityPolicy {
    /// Accept the submission and rely on the staff email alone.
    BestEffort,
    /// Refuse the submission.
    Required,
}

impl DurabilityPolicy {
    pub fn from_required(required: bool) -> Self {
        if required {
            Self::Required
        } else {
            Self::BestEffort
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IntakeReceipt {
    /// `None` when the submission was accepted without being stored.
    pub id: Option<Uuid>,
    /// Whether the staff notification was delivered to the provider.
    pub email_sent: bool,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, thiserror::Error)]
pub enum IntakeError {
    #[error("submission rejected by validation")]
    Invalid(Vec<FieldError>),
    #[error("storage unavailable and durability is required")]
    Unavailable,
    /// Storage refused a draft that passed validation.
    #[error("validated submission rejected by storage: {0}")]
    Contract(String),
    #[error("submission failed: {0}")]
    Internal(String),
}

/// Runs one submission through validate, persist, notify staff, confirm to the
/// user and flag the record, in that order.
///
/// Only validation and persistence can fail the request. Email problems are
/// logged and surface as `email_sent = false`.
pub struct Orchestrator {
    store: Arc<dyn ContactStore>,
    notifier: Arc<dyn Notifier>,
    policy: DurabilityPolicy,
}

impl Orchestrator {
    pub fn new(
        store: Arc<dyn ContactStore>,
        notifier: Arc<dyn Notifier>,
        policy: DurabilityPolicy,
    ) -> Self {
        Self {
            store,
            notifier,
            policy,
        }
    }

    pub fn policy(&self) -> DurabilityPolicy {
        self.policy
    }

    #[instrument(skip_all)]
    pub async fn handle(
        &self,
        form: &ContactForm,
        ctx: RequestContext,
    ) -> Result<IntakeReceipt, IntakeError> {
        let submitted_at = Utc::now();

        let draft = match validation::validate(form, ctx) {
            Validation::Valid(draft) => draft,
            Validation::Invalid(errors) => {
                info!(fields = errors.len(), "Submission failed validation");
                return Err(IntakeError::Invalid(errors));
            }
        };

        let contact = self.persist(&draft).await?;
        let contact_id = contact.map(|c| c.id);

        let notice = Notice {
            draft: &draft,
            contact_id,
            submitted_at,
        };

        let email_sent = self.notify_staff(&notice).await;
        if email_sent {
            self.notify_user(&notice).await;
            if let Some(id) = contact_id {
                self.mark_email_sent(id).await;
            }
        }

        info!(
            contact_id = ?contact_id,
            email_sent,
            interest = %draft.service_interest,
            "Contact submission processed"
        );

        Ok(IntakeReceipt {
            id: contact_id,
            email_sent,
            timestamp: submitted_at,
        })
    }

    /// `Ok(None)` means storage was skipped under the best-effort policy.
    ///
    /// The write is attempted even while storage is marked down, so a
    /// recovered database is picked up by the next submission.
    async fn persist(&self, draft: &ContactDraft) -> Result<Option<Contact>, IntakeError> {
        let was_down = !self.store.is_available();
        match self.store.create(draft.clone()).await {
            Ok(contact) => {
                if was_down {
                    info!(step = "persist", "Storage reachable again");
                }
                Ok(Some(contact))
            }
            Err(StoreError::Unavailable) => self.storage_down(),
            Err(StoreError::Invalid(detail)) => {
                error!(step = "persist", error = %detail, interest = %draft.service_interest, "Storage rejected a validated submission");
                Err(IntakeError::Contract(detail))
            }
            Err(e) => {
                error!(step = "persist", error = %e, "Failed to store submission");
                Err(IntakeError::Internal(e.to_string()))
            }
        }
    }

    fn storage_down(&self) -> Result<Option<Contact>, IntakeError> {
        match self.policy {
            DurabilityPolicy::BestEffort => {
                warn!(step = "persist", "Storage unavailable, continuing without a stored record");
                Ok(None)
            }
            DurabilityPolicy::Required => {
                error!(step = "persist", "Storage unavailable, refusing submission");
                Err(IntakeError::Unavailable)
            }
        }
    }

    async fn notify_staff(&self, notice: &Notice<'_>) -> bool {
        match self.notifier.notify_staff(notice).await {
            Ok(()) => true,
            Err(NotifyError::NotConfigured) => {
                warn!(step = "notify_staff", "Email not configured, staff notification skipped");
                false
            }
            Err(e) => {
                error!(step = "notify_staff", contact_id = ?notice.contact_id, error = %e, "Staff notification failed");
                false
            }
        }
    }

    async fn notify_user(&self, notice: &Notice<'_>) {
        if let Err(e) = self.notifier.notify_user(notice).await {
            warn!(step = "notify_user", contact_id = ?notice.contact_id, error = %e, "Confirmation email failed");
        }
    }

    async fn mark_email_sent(&self, id: Uuid) {
        if let Err(e) = self.store.mark_email_sent(id, Utc::now()).await {
            warn!(step = "mark_email_sent", contact_id = %id, error = %e, "Failed to flag notification on record");
        }
    }
}
