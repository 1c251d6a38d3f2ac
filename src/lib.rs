//! Knowledge base for public procurement questions and answers.
//!
//! Entries are tagged automatically from their text ([`tagging`]) and
//! retrieved with a heuristic relevance ranking ([`search`]). The HTTP API
//! lives in [`api`]; [`chat`] answers search commands sent over a chat
//! webhook.

pub mod api;
pub mod auth;
pub mod chat;
pub mod config;
pub mod error;
pub mod knowledge;
pub mod metrics;
pub mod models;
pub mod search;
pub mod state;
pub mod tagging;

pub use error::{AppError, Result};
