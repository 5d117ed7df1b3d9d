pub mod contact;
pub mod service;
pub mod team_member;
