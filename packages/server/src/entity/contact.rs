use common::{ContactStatus, Priority, ServiceInterest};
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// A lead captured by the website contact form or the chat widget.
///
/// Only `email_sent`, `email_sent_at`, `status`, `priority`, `notes` and
/// `updated_at` change after insert.
#[sea_orm::model]
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "contact")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,

    pub name: String,
    pub email: String,
    #[sea_orm(column_type = "Text")]
    pub message: String,
    pub phone: Option<String>,
    pub company: Option<String>,
    pub service_interest: ServiceInterest,
    /// Origin channel: "website" for form submissions, `chat_*` for the chat widget.
    pub source: String,
    pub status: ContactStatus,
    pub priority: Priority,
    #[sea_orm(column_type = "Text", nullable)]
    pub notes: Option<String>,

    pub ip_address: Option<String>,
    pub user_agent: Option<String>,

    /// Chat conversation this record belongs to.
    pub session_id: Option<String>,
    /// Channel-specific detail such as ticket reference or reply menu.
    #[sea_orm(column_type = "Json", nullable)]
    pub metadata: Option<Json>,

    pub email_sent: bool,
    pub email_sent_at: Option<DateTimeUtc>,

    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

impl ActiveModelBehavior for ActiveModel {}
