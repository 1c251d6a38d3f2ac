pub mod handlers;
pub mod routes;

pub use routes::*;

use crate::auth::Authenticator;
use crate::chat::ChatRelay;
use crate::knowledge::KnowledgeService;
use axum::extract::FromRef;
use std::sync::Arc;
use std::time::Instant;

/// Default and maximum `limite` for listings
pub const DEFAULT_PAGE_SIZE: usize = 20;
pub const MAX_PAGE_SIZE: usize = 100;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub service: Arc<KnowledgeService>,
    pub authenticator: Arc<dyn Authenticator>,
    pub chat: Option<Arc<ChatRelay>>,
    pub started_at: Instant,
    pub max_page_size: usize,
}

impl AppState {
    pub fn new(service: Arc<KnowledgeService>, authenticator: Arc<dyn Authenticator>) -> Self {
        Self {
            service,
            authenticator,
            chat: None,
            started_at: Instant::now(),
            max_page_size: MAX_PAGE_SIZE,
        }
    }

    /// Enable the chat webhook relay
    pub fn with_chat(mut self, chat: Arc<ChatRelay>) -> Self {
        self.chat = Some(chat);
        self
    }

    pub fn with_max_page_size(mut self, max_page_size: usize) -> Self {
        self.max_page_size = max_page_size;
        self
    }
}

impl FromRef<AppState> for Arc<dyn Authenticator> {
    fn from_ref(state: &AppState) -> Self {
        state.authenticator.clone()
    }
}
