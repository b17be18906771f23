//! Request handlers.

pub mod chat;
pub mod diagnostics;
pub mod health;
