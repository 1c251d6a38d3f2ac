use crate::error::{AppError, Result};
use crate::models::{AuditEvent, Comment, Entry, Vote};
use crate::state::{EntryFilter, KnowledgeStore};
use async_trait::async_trait;
use dashmap::DashMap;
use parking_lot::RwLock;
use std::collections::HashSet;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// In-memory knowledge store (for development and testing)
#[derive(Clone)]
pub struct InMemoryStore {
    entries: Arc<DashMap<u64, Entry>>,
    comments: Arc<DashMap<u64, Vec<Comment>>>,
    /// user -> entries the user voted on
    votes: Arc<DashMap<String, HashSet<u64>>>,
    audit_log: Arc<RwLock<Vec<AuditEvent>>>,
    next_id: Arc<AtomicU64>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self {
            entries: Arc::new(DashMap::new()),
            comments: Arc::new(DashMap::new()),
            votes: Arc::new(DashMap::new()),
            audit_log: Arc::new(RwLock::new(Vec::new())),
            next_id: Arc::new(AtomicU64::new(1)),
        }
    }

    fn not_found(id: u64) -> AppError {
        AppError::NotFound(format!("Entry {} not found", id))
    }
}

impl Default for InMemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl KnowledgeStore for InMemoryStore {
    async fn insert_entry(&self, mut entry: Entry) -> Result<Entry> {
        entry.id = self.next_id.fetch_add(1, Ordering::SeqCst);
        self.entries.insert(entry.id, entry.clone());
        self.comments.entry(entry.id).or_default();

        tracing::debug!(entry_id = entry.id, "Entry saved");
        Ok(entry)
    }

    async fn get_entry(&self, id: u64) -> Result<Option<Entry>> {
        Ok(self.entries.get(&id).map(|entry| entry.clone()))
    }

    async fn update_entry(&self, entry: &Entry) -> Result<()> {
        match self.entries.get_mut(&entry.id) {
            Some(mut stored) => {
                *stored = entry.clone();
                tracing::debug!(entry_id = entry.id, "Entry updated");
                Ok(())
            }
            None => Err(Self::not_found(entry.id)),
        }
    }

    async fn modify_entry(
        &self,
        id: u64,
        change: &(dyn for<'e> Fn(&'e mut Entry) + Send + Sync),
    ) -> Result<Option<Entry>> {
        Ok(self.entries.get_mut(&id).map(|mut entry| {
            change(entry.value_mut());
            entry.value().clone()
        }))
    }

    async fn list_entries(&self, filter: &EntryFilter) -> Result<Vec<Entry>> {
        let entries = self.all_entries().await?;
        Ok(filter.apply(entries))
    }

    async fn all_entries(&self) -> Result<Vec<Entry>> {
        let mut entries: Vec<Entry> = self
            .entries
            .iter()
            .map(|entry| entry.value().clone())
            .collect();
        entries.sort_by_key(|e| e.id);
        Ok(entries)
    }

    async fn record_vote(&self, vote: &Vote) -> Result<Entry> {
        if !self.entries.contains_key(&vote.entry_id) {
            return Err(Self::not_found(vote.entry_id));
        }

        // Holding the user's shard guard serialises concurrent votes by the same user.
        let mut voted = self.votes.entry(vote.user.clone()).or_default();
        if voted.contains(&vote.entry_id) {
            return Err(AppError::Validation(format!(
                "User {} has already voted on entry {}",
                vote.user, vote.entry_id
            )));
        }

        let updated = {
            let mut entry = self
                .entries
                .get_mut(&vote.entry_id)
                .ok_or_else(|| Self::not_found(vote.entry_id))?;
            entry.apply_vote(vote.kind);
            entry.clone()
        };
        voted.insert(vote.entry_id);

        tracing::debug!(entry_id = vote.entry_id, user = %vote.user, kind = %vote.kind, "Vote recorded");
        Ok(updated)
    }

    async fn voter_count(&self) -> Result<u64> {
        Ok(self.votes.len() as u64)
    }

    async fn add_comment(&self, mut comment: Comment) -> Result<Comment> {
        if !self.entries.contains_key(&comment.entry_id) {
            return Err(Self::not_found(comment.entry_id));
        }

        let mut comments = self.comments.entry(comment.entry_id).or_default();
        comment.id = comments.len() as u64 + 1;
        comments.push(comment.clone());

        tracing::debug!(entry_id = comment.entry_id, comment_id = comment.id, "Comment added");
        Ok(comment)
    }

    async fn list_comments(&self, entry_id: u64) -> Result<Vec<Comment>> {
        Ok(self
            .comments
            .get(&entry_id)
            .map(|comments| comments.clone())
            .unwrap_or_default())
    }

    async fn record_audit(&self, event: &AuditEvent) -> Result<()> {
        self.audit_log.write().push(event.clone());
        Ok(())
    }

    async fn recent_audit(&self, limit: usize) -> Result<Vec<AuditEvent>> {
        Ok(self.audit_log.read().iter().rev().take(limit).cloned().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{AuditAction, AuditResource, EntryStatus, Modality, VoteKind};

    fn entry(title: &str, answer: &str) -> Entry {
        Entry::new(
            title.to_string(),
            "Pergunta".to_string(),
            answer.to_string(),
            "Autor".to_string(),
            "Capivari".to_string(),
        )
    }

    #[tokio::test]
    async fn test_insert_assigns_sequential_ids() {
        let store = InMemoryStore::new();

        let first = store.insert_entry(entry("Primeiro", "")).await.unwrap();
        let second = store.insert_entry(entry("Segundo", "")).await.unwrap();

        assert_eq!(first.id, 1);
        assert_eq!(second.id, 2);
        assert_eq!(store.get_entry(2).await.unwrap().unwrap().title, "Segundo");
        assert!(store.get_entry(3).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_update_missing_entry() {
        let store = InMemoryStore::new();
        let mut orphan = entry("Órfão", "");
        orphan.id = 42;

        let result = store.update_entry(&orphan).await;
        assert!(matches!(result, Err(AppError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_list_with_filter_orders_by_votes() {
        let store = InMemoryStore::new();

        let a = store
            .insert_entry(entry("Pregão A", "").with_modality(Some(Modality::PregaoEletronico)))
            .await
            .unwrap();
        let b = store
            .insert_entry(entry("Pregão B", "").with_modality(Some(Modality::PregaoEletronico)))
            .await
            .unwrap();
        store
            .insert_entry(entry("Dispensa", "").with_modality(Some(Modality::DispensaEletronica)))
            .await
            .unwrap();

        store
            .record_vote(&Vote::new(b.id, "ana".to_string(), VoteKind::Positive))
            .await
            .unwrap();

        let filter = EntryFilter {
            modality: Some(Modality::PregaoEletronico),
            ..Default::default()
        };
        let listed = store.list_entries(&filter).await.unwrap();
        let ids: Vec<u64> = listed.iter().map(|e| e.id).collect();
        assert_eq!(ids, vec![b.id, a.id]);
    }

    #[tokio::test]
    async fn test_list_by_tag_and_text_with_pagination() {
        let store = InMemoryStore::new();
        for i in 0..5 {
            store
                .insert_entry(entry(&format!("Impugnação {}", i), "Prazo de 3 dias úteis"))
                .await
                .unwrap();
        }
        store.insert_entry(entry("Outro", "")).await.unwrap();

        let filter = EntryFilter {
            tag: Some("prazo".to_string()),
            text: Some("IMPUGNAÇÃO".to_string()),
            offset: 1,
            limit: 3,
            ..Default::default()
        };
        let listed = store.list_entries(&filter).await.unwrap();
        assert_eq!(listed.len(), 3);
        assert_eq!(listed[0].id, 2);

        let by_status = EntryFilter {
            status: Some(EntryStatus::Validated),
            ..Default::default()
        };
        assert!(store.list_entries(&by_status).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_one_vote_per_user_per_entry() {
        let store = InMemoryStore::new();
        let e = store.insert_entry(entry("Votável", "")).await.unwrap();

        let updated = store
            .record_vote(&Vote::new(e.id, "ana".to_string(), VoteKind::Positive))
            .await
            .unwrap();
        assert_eq!(updated.upvotes, 1);

        let again = store
            .record_vote(&Vote::new(e.id, "ana".to_string(), VoteKind::Negative))
            .await;
        assert!(matches!(again, Err(AppError::Validation(_))));

        let other = store
            .record_vote(&Vote::new(e.id, "bruno".to_string(), VoteKind::Negative))
            .await
            .unwrap();
        assert_eq!((other.upvotes, other.downvotes), (1, 1));
        assert_eq!(store.voter_count().await.unwrap(), 2);

        let missing = store
            .record_vote(&Vote::new(99, "ana".to_string(), VoteKind::Positive))
            .await;
        assert!(matches!(missing, Err(AppError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_comments_are_numbered_per_entry() {
        let store = InMemoryStore::new();
        let e1 = store.insert_entry(entry("Um", "")).await.unwrap();
        let e2 = store.insert_entry(entry("Dois", "")).await.unwrap();

        let c1 = store
            .add_comment(Comment::new(e1.id, "ana".to_string(), "primeiro".to_string()))
            .await
            .unwrap();
        let c2 = store
            .add_comment(Comment::new(e1.id, "bruno".to_string(), "segundo".to_string()))
            .await
            .unwrap();
        let c3 = store
            .add_comment(Comment::new(e2.id, "ana".to_string(), "outro".to_string()))
            .await
            .unwrap();

        assert_eq!((c1.id, c2.id, c3.id), (1, 2, 1));
        assert_eq!(store.list_comments(e1.id).await.unwrap().len(), 2);
        assert!(store.list_comments(77).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_audit_log_newest_first() {
        let store = InMemoryStore::new();
        for id in 1..=3 {
            store
                .record_audit(&AuditEvent::new("ana", AuditAction::Criar, AuditResource::Conhecimento, id))
                .await
                .unwrap();
        }

        let recent = store.recent_audit(2).await.unwrap();
        let ids: Vec<u64> = recent.iter().map(|e| e.resource_id).collect();
        assert_eq!(ids, vec![3, 2]);
    }
}
