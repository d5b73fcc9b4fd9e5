pub mod auth;
pub mod pastor_messages;
pub mod storage;
