use super::{format_results, usage, ChatSender};
use crate::config::ChatConfig;
use crate::error::Result;
use crate::knowledge::KnowledgeService;
use crate::metrics::CHAT_MESSAGES_TOTAL;
use serde::Deserialize;
use std::sync::Arc;

/// Webhook body posted by the messaging provider
#[derive(Debug, Clone, Default, Deserialize)]
pub struct WebhookEvent {
    #[serde(default)]
    pub message: IncomingMessage,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct IncomingMessage {
    #[serde(default)]
    pub text: String,
    /// Sender address replies go to
    #[serde(default)]
    pub from: String,
}

/// Answers search commands received over chat
pub struct ChatRelay {
    service: Arc<KnowledgeService>,
    sender: ChatSender,
    command: String,
}

impl ChatRelay {
    pub fn new(service: Arc<KnowledgeService>, sender: ChatSender, command: String) -> Self {
        Self {
            service,
            sender,
            command,
        }
    }

    /// Build a relay from configuration; the API token is read from the
    /// environment variable named by `token_env`
    pub fn from_config(service: Arc<KnowledgeService>, config: &ChatConfig) -> Result<Self> {
        let token = config
            .token_env
            .as_deref()
            .and_then(|name| std::env::var(name).ok());
        if token.is_none() {
            tracing::warn!("Chat relay enabled without an API token");
        }

        let sender = ChatSender::new(config.api_url.clone(), token, config.timeout_secs)?;
        Ok(Self::new(service, sender, config.command.clone()))
    }

    /// Reply text for a message, or `None` when the message is not a command
    pub async fn reply_for(&self, text: &str) -> Result<Option<String>> {
        let Some(rest) = text.trim_start().strip_prefix(self.command.as_str()) else {
            return Ok(None);
        };

        let query = rest.trim();
        if query.is_empty() {
            return Ok(Some(usage(&self.command)));
        }

        let outcome = self.service.smart_search(query).await?;
        Ok(Some(format_results(query, &outcome)))
    }

    /// Handle one incoming message, delivering the reply if there is one
    pub async fn handle(&self, message: &IncomingMessage) -> Result<()> {
        if message.from.is_empty() {
            CHAT_MESSAGES_TOTAL.with_label_values(&["ignored"]).inc();
            tracing::debug!("Chat message without sender ignored");
            return Ok(());
        }

        let Some(reply) = self.reply_for(&message.text).await? else {
            CHAT_MESSAGES_TOTAL.with_label_values(&["ignored"]).inc();
            return Ok(());
        };

        match self.sender.send_text(&message.from, &reply).await {
            Ok(()) => {
                CHAT_MESSAGES_TOTAL.with_label_values(&["replied"]).inc();
                Ok(())
            }
            Err(e) => {
                CHAT_MESSAGES_TOTAL.with_label_values(&["failed"]).inc();
                Err(e)
            }
        }
    }

    /// Handle a message on a background task; failures are logged only
    pub fn dispatch(self: &Arc<Self>, message: IncomingMessage) {
        let relay = Arc::clone(self);
        tokio::spawn(async move {
            if let Err(e) = relay.handle(&message).await {
                tracing::error!(to = %message.from, error = %e, "Failed to answer chat message");
            }
        });
    }
}
