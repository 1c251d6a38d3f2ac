use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// A comment attached to an entry
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Comment {
    /// Sequence number within the entry, starting at 1
    pub id: u64,

    #[serde(rename = "conhecimento_id")]
    pub entry_id: u64,

    #[serde(rename = "autor")]
    pub author: String,

    /// Job title of the author
    #[serde(rename = "cargo")]
    pub role: Option<String>,

    #[serde(rename = "texto")]
    pub text: String,

    #[serde(rename = "data")]
    pub created_at: DateTime<Utc>,

    #[serde(rename = "tipo")]
    pub kind: CommentKind,

    #[serde(rename = "votos")]
    pub votes: i32,

    /// Comment this one replies to
    #[serde(rename = "resposta_para")]
    pub reply_to: Option<u64>,
}

impl Comment {
    /// Create an unsaved comment; the store assigns `id`
    pub fn new(entry_id: u64, author: String, text: String) -> Self {
        Self {
            id: 0,
            entry_id,
            author,
            role: None,
            text,
            created_at: Utc::now(),
            kind: CommentKind::default(),
            votes: 0,
            reply_to: None,
        }
    }
}

#[derive(
    Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, EnumString, Display,
)]
pub enum CommentKind {
    #[default]
    #[serde(rename = "comentario")]
    #[strum(serialize = "comentario")]
    Remark,
    #[serde(rename = "duvida")]
    #[strum(serialize = "duvida")]
    Question,
    #[serde(rename = "correcao")]
    #[strum(serialize = "correcao")]
    Correction,
    #[serde(rename = "exemplo")]
    #[strum(serialize = "exemplo")]
    Example,
}
