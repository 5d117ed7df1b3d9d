pub mod chat;
pub mod contact;
pub mod content;
pub mod health;
pub mod shared;
