use chrono::{DateTime, Utc};
use common::{CHAT_REPLY_SOURCE, ReplyKind, TicketPriority};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::contact::Contact;

/// Visitor details the chat widget may attach. All optional.
#[derive(Debug, Default, Clone, Deserialize, utoipa::ToSchema)]
pub struct ChatUserInfo {
    #[schema(example = "Jane Doe")]
    pub name: Option<String>,
    #[schema(example = "jane@example.com")]
    pub email: Option<String>,
    pub phone: Option<String>,
    pub company: Option<String>,
}

#[derive(Debug, Default, Clone, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ChatMessageRequest {
    /// Visitor text (1-2000 characters).
    #[schema(example = "Our API integration is broken")]
    pub message: Option<String>,
    pub user_info: Option<ChatUserInfo>,
    /// Conversation to append to. A new one is started when absent.
    #[schema(example = "session_01")]
    pub session_id: Option<String>,
}

#[derive(Debug, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ChatReplyData {
    pub message: String,
    #[serde(rename = "type")]
    pub kind: ReplyKind,
    pub quick_actions: Vec<String>,
    pub timestamp: DateTime<Utc>,
    /// Stored identity of the visitor message, or null when it could not be stored.
    pub message_id: Option<Uuid>,
    pub session_id: String,
}

#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct ChatMessageResponse {
    pub success: bool,
    pub response: ChatReplyData,
}

/// One turn of a conversation, visitor or assistant.
#[derive(Debug, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ConversationEntry {
    pub id: Uuid,
    pub message: String,
    pub sender: String,
    #[serde(rename = "isAI")]
    pub is_ai: bool,
    pub timestamp: DateTime<Utc>,
    /// Reply type for assistant turns, `text` for visitor turns.
    #[serde(rename = "type")]
    #[schema(example = "text")]
    pub kind: String,
    pub quick_actions: Vec<String>,
}

impl From<Contact> for ConversationEntry {
    fn from(c: Contact) -> Self {
        let metadata = c.metadata.as_ref();
        let kind = metadata
            .and_then(|m| m.get("replyType"))
            .and_then(|v| v.as_str())
            .unwrap_or("text")
            .to_string();
        let quick_actions = metadata
            .and_then(|m| m.get("quickActions"))
            .and_then(|v| v.as_array())
            .map(|actions| {
                actions
                    .iter()
                    .filter_map(|a| a.as_str().map(str::to_string))
                    .collect()
            })
            .unwrap_or_default();

        Self {
            id: c.id,
            is_ai: c.source == CHAT_REPLY_SOURCE,
            message: c.message,
            sender: c.name,
            timestamp: c.created_at,
            kind,
            quick_actions,
        }
    }
}

#[derive(Debug, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ConversationResponse {
    pub success: bool,
    pub session_id: String,
    pub conversations: Vec<ConversationEntry>,
}

#[derive(Debug, Default, Clone, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TicketRequest {
    /// 1-200 characters.
    #[schema(example = "Dashboard not loading")]
    pub subject: Option<String>,
    /// 1-2000 characters.
    pub description: Option<String>,
    /// `low`, `medium`, `high` or `urgent`. Defaults to `medium`.
    #[schema(example = "high")]
    pub priority: Option<String>,
    /// Free-form category, at most 50 characters. Defaults to `technical`.
    #[schema(example = "technical")]
    pub category: Option<String>,
    pub user_info: Option<ChatUserInfo>,
    pub session_id: Option<String>,
}

#[derive(Debug, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TicketData {
    /// Reference quoted to the visitor, e.g. `SUP-1718000000000-042`.
    pub id: String,
    /// Stored identity of the ticket record.
    pub contact_id: Uuid,
    #[schema(example = "created")]
    pub status: &'static str,
    pub priority: TicketPriority,
    pub category: String,
    #[schema(example = "2-4 hours")]
    pub estimated_response: &'static str,
    pub message: String,
}

#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct TicketResponse {
    pub success: bool,
    pub ticket: TicketData,
}
