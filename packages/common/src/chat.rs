//! Labels for the site chat widget and the support tickets it opens.

#[cfg(feature = "sea-orm")]
use sea_orm::prelude::StringLen;

use crate::contact::Priority;
use crate::label::labelled_enum;

/// Lead source of a message typed into the chat widget.
pub const CHAT_MESSAGE_SOURCE: &str = "chat_widget";
/// Lead source of the assistant's canned reply to a chat message.
pub const CHAT_REPLY_SOURCE: &str = "chat_ai_response";
/// Lead source of a support ticket opened from the chat widget.
pub const SUPPORT_TICKET_SOURCE: &str = "chat_support_ticket";

labelled_enum! {
    /// Which canned menu the assistant answered with.
    "reply type" enum ReplyKind {
        Welcome => "welcome",
        SupportMenu => "support_menu",
        ServiceMenu => "service_menu",
        AgentTransfer => "agent_transfer",
        Clarification => "clarification",
    }
}

labelled_enum! {
    "ticket priority" enum TicketPriority {
        Low => "low",
        Medium => "medium",
        High => "high",
        Urgent => "urgent",
    }
}

impl Default for TicketPriority {
    fn default() -> Self {
        Self::Medium
    }
}

impl TicketPriority {
    /// Response time quoted back to the visitor.
    pub fn estimated_response(&self) -> &'static str {
        match self {
            Self::Urgent => "< 1 hour",
            Self::High => "2-4 hours",
            Self::Medium => "4-8 hours",
            Self::Low => "8-24 hours",
        }
    }

    /// Lead priority recorded for the ticket.
    pub fn lead_priority(&self) -> Priority {
        match self {
            Self::Urgent | Self::High => Priority::High,
            Self::Medium => Priority::Medium,
            Self::Low => Priority::Low,
        }
    }
}
