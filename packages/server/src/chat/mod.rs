//! Chat widget backend: canned replies, conversation history and support tickets.
//!
//! Every chat turn is stored as a contact record tagged with its session, so
//! staff see chat traffic next to form leads.

mod reply;

pub use reply::{Reply, reply_to};

use std::sync::Arc;

use chrono::{DateTime, Utc};
use common::{
    CHAT_MESSAGE_SOURCE, CHAT_REPLY_SOURCE, ContactStatus, Priority, SUPPORT_TICKET_SOURCE,
    ServiceInterest, TicketPriority,
};
use serde_json::json;
use tracing::{error, info, instrument, warn};
use uuid::Uuid;

use crate::intake::DurabilityPolicy;
use crate::intake::validation::{COMPANY_MAX, MESSAGE_MAX, NAME_MAX, PHONE_MAX};
use crate::intake::{email, html};
use crate::models::chat::{ChatMessageRequest, ChatUserInfo, TicketRequest};
use crate::models::contact::{Contact, ContactDraft, FieldError, RequestContext};
use crate::notify::{Notice, Notifier};
use crate::store::{ContactStore, StoreError};

pub const SESSION_MAX: usize = 100;
pub const SUBJECT_MAX: usize = 200;
pub const CATEGORY_MAX: usize = 50;
/// Most turns returned for one conversation.
pub const HISTORY_LIMIT: u64 = 100;

pub const ANONYMOUS_NAME: &str = "Anonymous User";
pub const ASSISTANT_NAME: &str = "Site Assistant";
pub const ASSISTANT_EMAIL: &str = "assistant@chat.local";
const DEFAULT_CATEGORY: &str = "technical";

#[derive(Debug, thiserror::Error)]
pub enum ChatError {
    #[error("chat request rejected by validation")]
    Invalid(Vec<FieldError>),
    #[error("storage unavailable")]
    Unavailable,
    #[error("chat request failed: {0}")]
    Internal(String),
}

impl From<StoreError> for ChatError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Unavailable => ChatError::Unavailable,
            other => ChatError::Internal(other.to_string()),
        }
    }
}

/// Result of one visitor message.
#[derive(Debug)]
pub struct Exchange {
    pub session_id: String,
    pub reply: &'static Reply,
    /// `None` when the visitor message could not be stored.
    pub message_id: Option<Uuid>,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug)]
pub struct TicketReceipt {
    /// Reference quoted to the visitor.
    pub reference: String,
    pub contact_id: Uuid,
    pub priority: TicketPriority,
    pub category: String,
    pub email_sent: bool,
}

/// Visitor identity after validation, ready to store.
struct Visitor {
    name: String,
    email: String,
    phone: Option<String>,
    company: Option<String>,
}

fn trimmed(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

fn char_len(value: &str) -> usize {
    value.chars().count()
}

/// Letters, digits, `-` and `_`.
pub fn is_session_id(raw: &str) -> bool {
    (1..=SESSION_MAX).contains(&raw.len())
        && raw
            .bytes()
            .all(|b| b.is_ascii_alphanumeric() || b == b'-' || b == b'_')
}

/// Supplied session id, or a fresh one.
fn session(raw: &Option<String>, errors: &mut Vec<FieldError>) -> String {
    match trimmed(raw) {
        Some(id) if is_session_id(id) => id.to_string(),
        Some(_) => {
            errors.push(session_error());
            String::new()
        }
        None => format!("chat_{}", Uuid::now_v7().simple()),
    }
}

fn session_error() -> FieldError {
    FieldError::new(
        "sessionId",
        "session_invalid",
        format!("Session id must be 1 to {SESSION_MAX} letters, digits, '-' or '_'"),
    )
}

fn bounded(
    value: Option<&str>,
    max: usize,
    field: &str,
    errors: &mut Vec<FieldError>,
) -> Option<String> {
    match value {
        Some(v) if char_len(v) > max => {
            errors.push(FieldError::new(
                field,
                &format!("{field}_invalid"),
                format!("{field} must be at most {max} characters"),
            ));
            None
        }
        other => other.map(html::escape),
    }
}

fn visitor(info: Option<&ChatUserInfo>, session: &str, errors: &mut Vec<FieldError>) -> Visitor {
    let info = info.cloned().unwrap_or_default();

    let name = bounded(trimmed(&info.name), NAME_MAX, "name", errors)
        .unwrap_or_else(|| ANONYMOUS_NAME.to_string());

    let email = match trimmed(&info.email) {
        Some(raw) => email::normalize(raw).unwrap_or_else(|| {
            errors.push(FieldError::new(
                "email",
                "email_invalid",
                "Please provide a valid email address",
            ));
            String::new()
        }),
        None => format!("anonymous_{session}@chat.local"),
    };

    Visitor {
        name,
        email,
        phone: bounded(trimmed(&info.phone), PHONE_MAX, "phone", errors),
        company: bounded(trimmed(&info.company), COMPANY_MAX, "company", errors),
    }
}

fn required_text(
    value: &Option<String>,
    max: usize,
    field: &str,
    errors: &mut Vec<FieldError>,
) -> String {
    match trimmed(value) {
        Some(v) if char_len(v) <= max => html::escape(v),
        _ => {
            errors.push(FieldError::new(
                field,
                &format!("{field}_invalid"),
                format!("{field} is required and must be at most {max} characters"),
            ));
            String::new()
        }
    }
}

fn ticket_reference(at: DateTime<Utc>) -> String {
    format!(
        "SUP-{}-{:03}",
        at.timestamp_millis(),
        Uuid::new_v4().as_u128() % 1000
    )
}

/// Stores chat turns and tickets through the same gateways as the contact form.
pub struct ChatDesk {
    store: Arc<dyn ContactStore>,
    notifier: Arc<dyn Notifier>,
    policy: DurabilityPolicy,
}

impl ChatDesk {
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

    /// Records a visitor message and the assistant's reply.
    ///
    /// Under the best-effort policy the reply is still returned while storage
    /// is down.
    #[instrument(skip_all)]
    pub async fn message(
        &self,
        req: &ChatMessageRequest,
        ctx: RequestContext,
    ) -> Result<Exchange, ChatError> {
        let mut errors = Vec::new();
        let session_id = session(&req.session_id, &mut errors);
        let raw = trimmed(&req.message).filter(|m| char_len(m) <= MESSAGE_MAX);
        if raw.is_none() {
            errors.push(FieldError::new(
                "message",
                "message_invalid",
                format!("Message is required and must be at most {MESSAGE_MAX} characters"),
            ));
        }
        let visitor = visitor(req.user_info.as_ref(), &session_id, &mut errors);
        let Some(raw) = raw.filter(|_| errors.is_empty()) else {
            info!(fields = errors.len(), "Chat message failed validation");
            return Err(ChatError::Invalid(errors));
        };

        let timestamp = Utc::now();
        let reply = reply_to(raw);

        let draft = ContactDraft {
            name: visitor.name,
            email: visitor.email,
            message: html::escape(raw),
            phone: visitor.phone,
            company: visitor.company,
            service_interest: ServiceInterest::Other,
            source: CHAT_MESSAGE_SOURCE.to_string(),
            status: ContactStatus::New,
            priority: ServiceInterest::Other.lead_priority(),
            ip_address: ctx.ip_address.clone(),
            user_agent: ctx.user_agent.clone(),
            session_id: Some(session_id.clone()),
            metadata: Some(json!({ "messageType": "user_message" })),
        };

        let message_id = match self.store.create(draft).await {
            Ok(contact) => Some(contact.id),
            Err(StoreError::Unavailable) if self.policy == DurabilityPolicy::BestEffort => {
                warn!(step = "persist", session = %session_id, "Storage unavailable, replying without a stored message");
                None
            }
            Err(e) => {
                error!(step = "persist", session = %session_id, error = %e, "Failed to store chat message");
                return Err(e.into());
            }
        };

        if let Some(parent) = message_id {
            self.store_reply(&session_id, reply, parent, ctx).await;
        }

        info!(session = %session_id, reply = %reply.kind, stored = message_id.is_some(), "Chat message processed");

        Ok(Exchange {
            session_id,
            reply,
            message_id,
            timestamp,
        })
    }

    async fn store_reply(
        &self,
        session_id: &str,
        reply: &Reply,
        parent: Uuid,
        ctx: RequestContext,
    ) {
        let draft = ContactDraft {
            name: ASSISTANT_NAME.to_string(),
            email: ASSISTANT_EMAIL.to_string(),
            message: reply.message.to_string(),
            phone: None,
            company: None,
            service_interest: ServiceInterest::Other,
            source: CHAT_REPLY_SOURCE.to_string(),
            status: ContactStatus::Closed,
            priority: Priority::Low,
            ip_address: ctx.ip_address,
            user_agent: ctx.user_agent,
            session_id: Some(session_id.to_string()),
            metadata: Some(json!({
                "messageType": "assistant_reply",
                "replyType": reply.kind,
                "quickActions": reply.quick_actions,
                "parentMessageId": parent,
            })),
        };
        if let Err(e) = self.store.create(draft).await {
            warn!(step = "persist_reply", session = %session_id, error = %e, "Failed to store assistant reply");
        }
    }

    /// Turns of one session, oldest first.
    #[instrument(skip(self))]
    pub async fn conversation(&self, session_id: &str) -> Result<Vec<Contact>, ChatError> {
        if !is_session_id(session_id) {
            return Err(ChatError::Invalid(vec![session_error()]));
        }
        let turns = self
            .store
            .conversation(
                session_id,
                &[CHAT_MESSAGE_SOURCE, CHAT_REPLY_SOURCE],
                HISTORY_LIMIT,
            )
            .await?;
        Ok(turns)
    }

    /// Opens a support ticket. A ticket is never accepted without being stored.
    #[instrument(skip_all)]
    pub async fn open_ticket(
        &self,
        req: &TicketRequest,
        ctx: RequestContext,
    ) -> Result<TicketReceipt, ChatError> {
        let mut errors = Vec::new();
        let session_id = session(&req.session_id, &mut errors);
        let subject = required_text(&req.subject, SUBJECT_MAX, "subject", &mut errors);
        let description = required_text(&req.description, MESSAGE_MAX, "description", &mut errors);

        let priority = match trimmed(&req.priority) {
            None => TicketPriority::default(),
            Some(raw) => raw.to_lowercase().parse::<TicketPriority>().unwrap_or_else(|e| {
                errors.push(FieldError::new("priority", "priority_invalid", e.to_string()));
                TicketPriority::default()
            }),
        };

        let category = bounded(trimmed(&req.category), CATEGORY_MAX, "category", &mut errors)
            .unwrap_or_else(|| DEFAULT_CATEGORY.to_string());

        let visitor = visitor(req.user_info.as_ref(), &session_id, &mut errors);
        if !errors.is_empty() {
            info!(fields = errors.len(), "Support ticket failed validation");
            return Err(ChatError::Invalid(errors));
        }

        let submitted_at = Utc::now();
        let reference = ticket_reference(submitted_at);

        let draft = ContactDraft {
            name: visitor.name,
            email: visitor.email,
            message: format!("[SUPPORT TICKET]\nSubject: {subject}\n\nDescription:\n{description}"),
            phone: visitor.phone,
            company: visitor.company,
            service_interest: ServiceInterest::Other,
            source: SUPPORT_TICKET_SOURCE.to_string(),
            status: ContactStatus::New,
            priority: priority.lead_priority(),
            ip_address: ctx.ip_address,
            user_agent: ctx.user_agent,
            session_id: Some(session_id.clone()),
            metadata: Some(json!({
                "ticketId": reference,
                "priority": priority,
                "category": category,
                "status": "open",
            })),
        };

        let contact = self.store.create(draft.clone()).await.map_err(|e| {
            error!(step = "persist", ticket = %reference, error = %e, "Failed to store support ticket");
            ChatError::from(e)
        })?;

        let notice = Notice {
            draft: &draft,
            contact_id: Some(contact.id),
            submitted_at,
        };
        let email_sent = match self.notifier.notify_staff(&notice).await {
            Ok(()) => {
                if let Err(e) = self.store.mark_email_sent(contact.id, Utc::now()).await {
                    warn!(step = "mark_email_sent", contact_id = %contact.id, error = %e, "Failed to flag notification on record");
                }
                true
            }
            Err(e) => {
                warn!(step = "notify_staff", ticket = %reference, error = %e, "Ticket alert not sent");
                false
            }
        };

        info!(ticket = %reference, contact_id = %contact.id, priority = %priority, email_sent, "Support ticket opened");

        Ok(TicketReceipt {
            reference,
            contact_id: contact.id,
            priority,
            category,
            email_sent,
        })
    }
}
