//! Persistence gateway for contact submissions.

mod sea;

pub use sea::SeaOrmContactStore;

use std::collections::HashMap;
use std::str::FromStr;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use common::{ContactStatus, Priority, ServiceInterest};
use sea_orm::{DbErr, SqlErr};
use uuid::Uuid;

use crate::models::contact::{Contact, ContactDraft};

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("storage unavailable")]
    Unavailable,
    #[error("conflict: {0}")]
    Conflict(String),
    /// The backend rejected a value. Validated drafts should never trigger this.
    #[error("invalid record: {0}")]
    Invalid(String),
    #[error("record not found")]
    NotFound,
    #[error("storage backend error: {0}")]
    Backend(String),
}

impl From<DbErr> for StoreError {
    fn from(err: DbErr) -> Self {
        if let Some(SqlErr::UniqueConstraintViolation(detail)) = err.sql_err() {
            return StoreError::Conflict(detail);
        }
        match err {
            DbErr::ConnectionAcquire(_) | DbErr::Conn(_) => StoreError::Unavailable,
            DbErr::RecordNotFound(_) | DbErr::RecordNotUpdated => StoreError::NotFound,
            DbErr::Type(msg) | DbErr::Json(msg) | DbErr::AttrNotSet(msg) => {
                StoreError::Invalid(msg)
            }
            e @ DbErr::TryIntoErr { .. } => StoreError::Invalid(e.to_string()),
            other => StoreError::Backend(other.to_string()),
        }
    }
}

/// Equality filters for the lead list. `None` matches everything.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContactFilter {
    pub status: Option<ContactStatus>,
    pub priority: Option<Priority>,
    pub service_interest: Option<ServiceInterest>,
    pub source: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortKey {
    CreatedAt,
    UpdatedAt,
    Priority,
    Status,
    Name,
}

/// Sort order for the lead list, parsed from `createdAt` / `-createdAt` style keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ContactSort {
    pub key: SortKey,
    pub descending: bool,
}

impl Default for ContactSort {
    fn default() -> Self {
        Self {
            key: SortKey::CreatedAt,
            descending: true,
        }
    }
}

impl FromStr for ContactSort {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let (descending, name) = match s.strip_prefix('-') {
            Some(rest) => (true, rest),
            None => (false, s.strip_prefix('+').unwrap_or(s)),
        };
        let key = match name {
            "createdAt" | "created_at" => SortKey::CreatedAt,
            "updatedAt" | "updated_at" => SortKey::UpdatedAt,
            "priority" => SortKey::Priority,
            "status" => SortKey::Status,
            "name" => SortKey::Name,
            _ => {
                return Err(format!(
                    "Invalid sort '{s}'. Valid keys: createdAt, updatedAt, priority, status, name (prefix with - for descending)"
                ));
            }
        };
        Ok(Self { key, descending })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub limit: u64,
    pub skip: u64,
}

pub const DEFAULT_PAGE_LIMIT: u64 = 50;
pub const MAX_PAGE_LIMIT: u64 = 200;

impl PageRequest {
    pub fn new(limit: Option<u64>, skip: Option<u64>) -> Self {
        Self {
            limit: limit.unwrap_or(DEFAULT_PAGE_LIMIT).clamp(1, MAX_PAGE_LIMIT),
            skip: skip.unwrap_or(0),
        }
    }
}

#[derive(Debug, Clone)]
pub struct ContactPage {
    pub contacts: Vec<Contact>,
    /// Matching records across all pages.
    pub total: u64,
}

/// Staff triage change. `None` leaves the field untouched.
#[derive(Debug, Clone)]
pub struct TriageUpdate {
    pub status: ContactStatus,
    pub priority: Option<Priority>,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct ContactSummary {
    pub total: u64,
    pub by_status: HashMap<ContactStatus, u64>,
    /// Most requested first.
    pub by_interest: Vec<(ServiceInterest, u64)>,
}

impl ContactSummary {
    pub fn status_count(&self, status: ContactStatus) -> u64 {
        self.by_status.get(&status).copied().unwrap_or(0)
    }
}

#[async_trait]
pub trait ContactStore: Send + Sync {
    /// Outcome of the most recent storage call. Refreshed by every call, so a
    /// `false` here never stops the next write from being attempted.
    fn is_available(&self) -> bool;

    /// Stores a validated draft verbatim, assigning identity and timestamps.
    async fn create(&self, draft: ContactDraft) -> Result<Contact, StoreError>;

    async fn get(&self, id: Uuid) -> Result<Contact, StoreError>;

    async fn list(
        &self,
        filter: ContactFilter,
        sort: ContactSort,
        page: PageRequest,
    ) -> Result<ContactPage, StoreError>;

    async fn mark_email_sent(&self, id: Uuid, at: DateTime<Utc>) -> Result<(), StoreError>;

    async fn update_triage(&self, id: Uuid, update: TriageUpdate) -> Result<Contact, StoreError>;

    async fn summary(&self) -> Result<ContactSummary, StoreError>;

    /// Records of one chat session with the given sources, oldest first.
    async fn conversation(
        &self,
        session_id: &str,
        sources: &[&str],
        limit: u64,
    ) -> Result<Vec<Contact>, StoreError>;

    /// Idempotent. Run once at startup.
    async fn ensure_indexes(&self) -> Result<(), StoreError>;
}
