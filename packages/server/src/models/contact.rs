use chrono::{DateTime, Utc};
use common::{ContactStatus, Priority, ServiceInterest};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::entity::contact;

/// Contact form payload as posted by the site, JSON or form-encoded.
///
/// Every field is optional so that a missing value surfaces as a field error
/// from validation instead of a deserialization failure.
#[derive(Debug, Default, Clone, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ContactForm {
    /// Full name (2-100 characters).
    #[schema(example = "Jane Doe")]
    pub name: Option<String>,
    #[schema(example = "jane@example.com")]
    pub email: Option<String>,
    /// Inquiry text (10-2000 characters).
    #[schema(example = "I'd like a quote for data engineering services please.")]
    pub message: Option<String>,
    /// At most 20 characters.
    pub phone: Option<String>,
    /// At most 100 characters.
    pub company: Option<String>,
    /// One of the service interest labels. Unknown values are recorded as `other`.
    #[serde(alias = "service_interest")]
    #[schema(example = "consulting")]
    pub service_interest: Option<String>,
    /// Honeypot field hidden from real visitors. Must be empty.
    pub website: Option<String>,
}

/// Request metadata captured alongside a submission. Recorded verbatim, never trusted.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct RequestContext {
    pub ip_address: Option<String>,
    pub user_agent: Option<String>,
}

/// A validated, normalized submission that has not been stored yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContactDraft {
    pub name: String,
    pub email: String,
    pub message: String,
    pub phone: Option<String>,
    pub company: Option<String>,
    pub service_interest: ServiceInterest,
    pub source: String,
    pub status: ContactStatus,
    pub priority: Priority,
    pub ip_address: Option<String>,
    pub user_agent: Option<String>,
    /// Set for chat widget records.
    pub session_id: Option<String>,
    pub metadata: Option<serde_json::Value>,
}

/// A stored lead.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Contact {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub message: String,
    pub phone: Option<String>,
    pub company: Option<String>,
    pub service_interest: ServiceInterest,
    pub source: String,
    pub status: ContactStatus,
    pub priority: Priority,
    pub notes: Option<String>,
    pub ip_address: Option<String>,
    pub user_agent: Option<String>,
    pub session_id: Option<String>,
    #[schema(value_type = Option<Object>)]
    pub metadata: Option<serde_json::Value>,
    pub email_sent: bool,
    pub email_sent_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<contact::Model> for Contact {
    fn from(m: contact::Model) -> Self {
        Self {
            id: m.id,
            name: m.name,
            email: m.email,
            message: m.message,
            phone: m.phone,
            company: m.company,
            service_interest: m.service_interest,
            source: m.source,
            status: m.status,
            priority: m.priority,
            notes: m.notes,
            ip_address: m.ip_address,
            user_agent: m.user_agent,
            session_id: m.session_id,
            metadata: m.metadata,
            email_sent: m.email_sent,
            email_sent_at: m.email_sent_at,
            created_at: m.created_at,
            updated_at: m.updated_at,
        }
    }
}

/// One rejected field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, utoipa::ToSchema)]
pub struct FieldError {
    #[schema(example = "name")]
    pub field: String,
    /// Machine-readable code, e.g. `name_invalid`.
    #[schema(example = "name_invalid")]
    pub code: String,
    #[schema(example = "Name must be between 2 and 100 characters")]
    pub message: String,
}

impl FieldError {
    pub fn new(field: &str, code: &str, message: impl Into<String>) -> Self {
        Self {
            field: field.to_string(),
            code: code.to_string(),
            message: message.into(),
        }
    }
}

/// `data` member of a successful submission response.
#[derive(Debug, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SubmissionReceipt {
    /// Stored identity, or null when the submission could not be persisted.
    pub id: Option<String>,
    /// Whether the staff notification went out.
    pub email_sent: bool,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct SubmitContactResponse {
    pub success: bool,
    #[schema(example = "Thank you for reaching out. We will get back to you shortly.")]
    pub message: String,
    pub data: SubmissionReceipt,
}

/// Query parameters for the lead list.
#[derive(Debug, Default, Deserialize, utoipa::IntoParams)]
#[serde(rename_all = "camelCase")]
pub struct ContactListQuery {
    /// Filter by status label.
    pub status: Option<String>,
    /// Filter by priority label.
    pub priority: Option<String>,
    /// Filter by service interest label.
    #[serde(alias = "service_interest")]
    pub service_interest: Option<String>,
    /// Filter by origin channel, e.g. `website` or `chat_support_ticket`.
    pub source: Option<String>,
    /// Page size (1-200, default 50).
    pub limit: Option<u64>,
    /// Number of records to skip (default 0).
    pub skip: Option<u64>,
    /// Sort key, `-` prefix for descending. One of `createdAt`, `updatedAt`, `priority`, `status`, `name`. Default `-createdAt`.
    #[param(example = "-createdAt")]
    pub sort: Option<String>,
}

/// Lead as shown in list views. Client address and user agent are left out.
#[derive(Debug, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ContactListItem {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub message: String,
    pub phone: Option<String>,
    pub company: Option<String>,
    pub service_interest: ServiceInterest,
    pub source: String,
    pub status: ContactStatus,
    pub priority: Priority,
    pub notes: Option<String>,
    pub email_sent: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Contact> for ContactListItem {
    fn from(c: Contact) -> Self {
        Self {
            id: c.id,
            name: c.name,
            email: c.email,
            message: c.message,
            phone: c.phone,
            company: c.company,
            service_interest: c.service_interest,
            source: c.source,
            status: c.status,
            priority: c.priority,
            notes: c.notes,
            email_sent: c.email_sent,
            created_at: c.created_at,
            updated_at: c.updated_at,
        }
    }
}

#[derive(Debug, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ContactListData {
    pub contacts: Vec<ContactListItem>,
    pub pagination: super::shared::Pagination,
}

#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct ContactListResponse {
    pub success: bool,
    pub data: ContactListData,
}

#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct ContactResponse {
    pub success: bool,
    pub data: Contact,
}

/// Request body for a triage update.
#[derive(Debug, Deserialize, utoipa::ToSchema)]
pub struct UpdateStatusRequest {
    #[schema(example = "contacted")]
    pub status: String,
    pub priority: Option<String>,
    /// Free-text notes (at most 2000 characters).
    pub notes: Option<String>,
}

#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct UpdateStatusResponse {
    pub success: bool,
    pub message: String,
    pub data: Contact,
}

#[derive(Debug, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct InterestCount {
    pub service_interest: ServiceInterest,
    pub count: u64,
}

#[derive(Debug, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ContactSummaryData {
    pub total: u64,
    pub new_contacts: u64,
    pub contacted: u64,
    pub qualified: u64,
    pub closed: u64,
    /// Lead counts per service interest, most requested first.
    pub service_interest: Vec<InterestCount>,
}

#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct ContactSummaryResponse {
    pub success: bool,
    pub data: ContactSummaryData,
}
