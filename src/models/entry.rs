use crate::search::SearchableEntry;
use crate::tagging::detect_entry_tags;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// A question/answer record of the knowledge base.
///
/// Rust field names are English; the JSON representation keeps the
/// Portuguese names used by the web front-end.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Entry {
    /// Identifier assigned by the store
    pub id: u64,

    #[serde(rename = "titulo")]
    pub title: String,

    #[serde(rename = "pergunta")]
    pub question: String,

    #[serde(rename = "resposta")]
    pub answer: String,

    /// Procurement modality the entry is about
    #[serde(rename = "modalidade")]
    pub modality: Option<Modality>,

    /// Process phase the entry is about
    #[serde(rename = "fase")]
    pub phase: Option<ProcessPhase>,

    /// Tags given by the author
    pub tags: Vec<String>,

    /// Tags detected from title, question and answer at creation
    #[serde(rename = "tags_automaticas")]
    pub automatic_tags: Vec<String>,

    #[serde(rename = "autor")]
    pub author: String,

    pub campus: String,

    #[serde(rename = "data_criacao")]
    pub created_at: DateTime<Utc>,

    #[serde(rename = "votos_positivos")]
    pub upvotes: u32,

    #[serde(rename = "votos_negativos")]
    pub downvotes: u32,

    #[serde(rename = "visualizacoes")]
    pub views: u64,

    pub status: EntryStatus,

    /// "Name (role)" of whoever validated the entry
    #[serde(rename = "validado_por")]
    pub validated_by: Option<String>,

    #[serde(rename = "data_validacao")]
    pub validated_at: Option<DateTime<Utc>>,
}

impl Entry {
    /// Create a new, unsaved entry.
    ///
    /// Automatic tags are computed here, once, from the concatenated title,
    /// question and answer. The id stays 0 until the store assigns one.
    pub fn new(
        title: String,
        question: String,
        answer: String,
        author: String,
        campus: String,
    ) -> Self {
        let automatic_tags = detect_entry_tags(&title, &question, &answer)
            .into_iter()
            .collect();

        Self {
            id: 0,
            title,
            question,
            answer,
            modality: None,
            phase: None,
            tags: Vec::new(),
            automatic_tags,
            author,
            campus,
            created_at: Utc::now(),
            upvotes: 0,
            downvotes: 0,
            views: 0,
            status: EntryStatus::New,
            validated_by: None,
            validated_at: None,
        }
    }

    pub fn with_modality(mut self, modality: Option<Modality>) -> Self {
        self.modality = modality;
        self
    }

    pub fn with_phase(mut self, phase: Option<ProcessPhase>) -> Self {
        self.phase = phase;
        self
    }

    pub fn with_tags(mut self, tags: Vec<String>) -> Self {
        self.tags = tags;
        self
    }

    /// Net vote balance used to order listings
    pub fn net_votes(&self) -> i64 {
        i64::from(self.upvotes) - i64::from(self.downvotes)
    }

    /// Apply a vote to the counters
    pub fn apply_vote(&mut self, kind: VoteKind) {
        match kind {
            VoteKind::Positive => self.upvotes += 1,
            VoteKind::Negative => self.downvotes += 1,
        }
    }

    /// Mark the entry as validated by `validator` acting as `role`
    pub fn validate(&mut self, validator: &str, role: &str) {
        self.status = EntryStatus::Validated;
        self.validated_by = Some(format!("{} ({})", validator, role));
        self.validated_at = Some(Utc::now());
    }

    pub fn is_validated(&self) -> bool {
        self.status == EntryStatus::Validated
    }

    /// Manual and automatic tags together
    pub fn all_tags(&self) -> impl Iterator<Item = &String> {
        self.tags.iter().chain(self.automatic_tags.iter())
    }
}

impl SearchableEntry for Entry {
    fn title(&self) -> &str {
        &self.title
    }

    fn question(&self) -> &str {
        &self.question
    }

    fn answer(&self) -> &str {
        &self.answer
    }

    fn manual_tags(&self) -> &[String] {
        &self.tags
    }

    fn automatic_tags(&self) -> &[String] {
        &self.automatic_tags
    }
}

/// Procurement modality
#[derive(
    Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, EnumString, Display,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum Modality {
    PregaoEletronico,
    DispensaEletronica,
    Concorrencia,
    Inexigibilidade,
    Concurso,
    Leilao,
}

/// Phase of the procurement process
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, EnumString, Display)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum ProcessPhase {
    Planejamento,
    Selecao,
    Contratacao,
    Execucao,
}

/// Editorial status of an entry
#[derive(
    Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, EnumString, Display,
)]
pub enum EntryStatus {
    #[default]
    #[serde(rename = "novo")]
    #[strum(serialize = "novo")]
    New,
    #[serde(rename = "validado")]
    #[strum(serialize = "validado")]
    Validated,
    #[serde(rename = "em_revisao")]
    #[strum(serialize = "em_revisao")]
    UnderReview,
    #[serde(rename = "desatualizado")]
    #[strum(serialize = "desatualizado")]
    Outdated,
}

/// Direction of a vote
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, EnumString, Display)]
pub enum VoteKind {
    #[serde(rename = "positivo")]
    #[strum(serialize = "positivo")]
    Positive,
    #[serde(rename = "negativo")]
    #[strum(serialize = "negativo")]
    Negative,
}
