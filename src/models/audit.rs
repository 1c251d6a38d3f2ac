use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};
use uuid::Uuid;

/// Record of a state-changing action
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditEvent {
    pub id: Uuid,
    pub user: String,
    pub action: AuditAction,
    pub resource: AuditResource,
    pub resource_id: u64,
    pub details: Option<String>,
    pub timestamp: DateTime<Utc>,
}

impl AuditEvent {
    pub fn new(
        user: impl Into<String>,
        action: AuditAction,
        resource: AuditResource,
        resource_id: u64,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            user: user.into(),
            action,
            resource,
            resource_id,
            details: None,
            timestamp: Utc::now(),
        }
    }

    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, EnumString, Display)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum AuditAction {
    Criar,
    Votar,
    Validar,
    Comentar,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, EnumString, Display)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum AuditResource {
    Conhecimento,
    Comentario,
}
