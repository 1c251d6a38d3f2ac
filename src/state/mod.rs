pub mod cache;
pub mod factory;
pub mod sled_store;
pub mod store;

pub use cache::*;
pub use factory::{create_in_memory_store, create_store};
pub use sled_store::SledStore;
pub use store::*;

use crate::error::Result;
use crate::models::{AuditEvent, Comment, Entry, EntryStatus, Modality, ProcessPhase, Vote};
use async_trait::async_trait;

/// Trait for knowledge base storage operations
#[async_trait]
pub trait KnowledgeStore: Send + Sync {
    /// Save a new entry, assigning the next identifier
    async fn insert_entry(&self, entry: Entry) -> Result<Entry>;

    /// Get an entry by ID
    async fn get_entry(&self, id: u64) -> Result<Option<Entry>>;

    /// Replace a stored entry
    async fn update_entry(&self, entry: &Entry) -> Result<()>;

    /// Apply `change` to a stored entry atomically and return the result.
    ///
    /// Concurrent votes and other changes to the same entry are never lost.
    /// `change` may run more than once. `None` if the entry does not exist.
    async fn modify_entry(
        &self,
        id: u64,
        change: &(dyn for<'e> Fn(&'e mut Entry) + Send + Sync),
    ) -> Result<Option<Entry>>;

    /// List entries matching the filter, best voted first, paginated
    async fn list_entries(&self, filter: &EntryFilter) -> Result<Vec<Entry>>;

    /// Every entry, ordered by ID
    async fn all_entries(&self) -> Result<Vec<Entry>>;

    /// Record a vote and update the entry counters.
    ///
    /// Fails with a validation error if the user already voted on the entry.
    async fn record_vote(&self, vote: &Vote) -> Result<Entry>;

    /// Number of distinct users that have voted
    async fn voter_count(&self) -> Result<u64>;

    /// Attach a comment to an entry, assigning its sequence number
    async fn add_comment(&self, comment: Comment) -> Result<Comment>;

    /// Comments of an entry, oldest first
    async fn list_comments(&self, entry_id: u64) -> Result<Vec<Comment>>;

    /// Append an audit record
    async fn record_audit(&self, event: &AuditEvent) -> Result<()>;

    /// Most recent audit records, newest first
    async fn recent_audit(&self, limit: usize) -> Result<Vec<AuditEvent>>;
}

/// Filter for listing entries
#[derive(Debug, Clone)]
pub struct EntryFilter {
    pub modality: Option<Modality>,
    pub phase: Option<ProcessPhase>,
    pub status: Option<EntryStatus>,
    /// Tag present in the manual or automatic tags
    pub tag: Option<String>,
    /// Case-insensitive text contained in title, question or answer
    pub text: Option<String>,
    pub offset: usize,
    pub limit: usize,
}

impl Default for EntryFilter {
    fn default() -> Self {
        Self {
            modality: None,
            phase: None,
            status: None,
            tag: None,
            text: None,
            offset: 0,
            limit: 20,
        }
    }
}

impl EntryFilter {
    /// Whether an entry passes every predicate of the filter
    pub fn matches(&self, entry: &Entry) -> bool {
        let modality_match = self.modality.is_none() || entry.modality == self.modality;
        let phase_match = self.phase.is_none() || entry.phase == self.phase;
        let status_match = self.status.map_or(true, |s| entry.status == s);
        let tag_match = self
            .tag
            .as_ref()
            .map_or(true, |tag| entry.all_tags().any(|t| t == tag));
        let text_match = self.text.as_ref().map_or(true, |text| {
            let needle = text.to_lowercase();
            entry.title.to_lowercase().contains(&needle)
                || entry.question.to_lowercase().contains(&needle)
                || entry.answer.to_lowercase().contains(&needle)
        });

        modality_match && phase_match && status_match && tag_match && text_match
    }

    /// Key identifying this filter in the listing cache
    pub fn cache_key(&self) -> String {
        format!(
            "m={:?}|f={:?}|s={:?}|t={:?}|q={:?}|o={}|l={}",
            self.modality,
            self.phase,
            self.status,
            self.tag,
            self.text.as_ref().map(|t| t.to_lowercase()),
            self.offset,
            self.limit
        )
    }

    /// Filter, order by net votes (stable over `entries` order) and paginate
    pub fn apply(&self, entries: Vec<Entry>) -> Vec<Entry> {
        let mut selected: Vec<Entry> = entries.into_iter().filter(|e| self.matches(e)).collect();

        selected.sort_by(|a, b| b.net_votes().cmp(&a.net_votes()));

        selected
            .into_iter()
            .skip(self.offset)
            .take(self.limit)
            .collect()
    }
}
