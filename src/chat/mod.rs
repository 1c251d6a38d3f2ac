//! Chat webhook relay: answers `/buscar <termo>` messages with ranked
//! search results.

mod format;
mod relay;
mod sender;

pub use format::{format_results, usage};
pub use relay::{ChatRelay, IncomingMessage, WebhookEvent};
pub use sender::ChatSender;
