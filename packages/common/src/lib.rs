mod label;

pub mod chat;
pub mod contact;
pub mod content;

pub use chat::{
    CHAT_MESSAGE_SOURCE, CHAT_REPLY_SOURCE, ReplyKind, SUPPORT_TICKET_SOURCE, TicketPriority,
};
pub use contact::{ContactStatus, Priority, ServiceInterest, WEBSITE_SOURCE};
pub use content::{Availability, Department, ServiceCategory, TeamCategory};
pub use label::ParseLabelError;
