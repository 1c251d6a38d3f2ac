use crate::error::{AppError, Result};
use crate::models::{AuditEvent, Comment, Entry, Vote};
use crate::state::{EntryFilter, KnowledgeStore};
use async_trait::async_trait;
use sled::Db;
use std::path::Path;
use std::sync::Arc;

/// Persistent knowledge store using the Sled embedded database.
///
/// Keys are big-endian ids so tree iteration yields insertion order.
/// Layout:
/// - `entries`: entry id -> Entry
/// - `comments`: entry id ++ comment id -> Comment
/// - `votes`: user ++ 0x00 ++ entry id -> VoteKind
/// - `voters`: user -> ()
/// - `audit`: sled generated id -> AuditEvent
/// - `counters`: sequence name -> last id handed out
#[derive(Clone)]
pub struct SledStore {
    db: Arc<Db>,
    entries_tree: sled::Tree,
    counters_tree: sled::Tree,
    comments_tree: sled::Tree,
    votes_tree: sled::Tree,
    voters_tree: sled::Tree,
    audit_tree: sled::Tree,
}

impl SledStore {
    /// Open (or create) a store at the specified path
    pub fn new<P: AsRef<Path>>(path: P) -> Result<Self> {
        let db = sled::open(path.as_ref()).map_err(|e| {
            AppError::Database(format!("Failed to open Sled database: {}", e))
        })?;

        let entries_tree = db.open_tree("entries")?;
        let counters_tree = db.open_tree("counters")?;
        let comments_tree = db.open_tree("comments")?;
        let votes_tree = db.open_tree("votes")?;
        let voters_tree = db.open_tree("voters")?;
        let audit_tree = db.open_tree("audit")?;

        tracing::info!("Initialized Sled store at {:?}", path.as_ref());

        Ok(Self {
            db: Arc::new(db),
            entries_tree,
            counters_tree,
            comments_tree,
            votes_tree,
            voters_tree,
            audit_tree,
        })
    }

    fn entry_key(id: u64) -> [u8; 8] {
        id.to_be_bytes()
    }

    fn comment_key(entry_id: u64, comment_id: u64) -> Vec<u8> {
        let mut key = entry_id.to_be_bytes().to_vec();
        key.extend_from_slice(&comment_id.to_be_bytes());
        key
    }

    fn comment_sequence_key(entry_id: u64) -> Vec<u8> {
        let mut key = b"comments/".to_vec();
        key.extend_from_slice(&entry_id.to_be_bytes());
        key
    }

    fn vote_key(user: &str, entry_id: u64) -> Vec<u8> {
        let mut key = user.as_bytes().to_vec();
        key.push(0);
        key.extend_from_slice(&entry_id.to_be_bytes());
        key
    }

    fn read_entry(&self, id: u64) -> Result<Option<Entry>> {
        match self.entries_tree.get(Self::entry_key(id))? {
            Some(bytes) => Ok(Some(bincode::deserialize(&bytes)?)),
            None => Ok(None),
        }
    }

    fn write_entry(&self, entry: &Entry) -> Result<()> {
        let bytes = bincode::serialize(entry)?;
        self.entries_tree.insert(Self::entry_key(entry.id), bytes)?;
        Ok(())
    }

    /// Bump the named counter and return the new value, starting at 1
    fn next_sequence(&self, key: &[u8]) -> Result<u64> {
        let updated = self.counters_tree.update_and_fetch(key, |current| {
            let last = current
                .and_then(|bytes| <[u8; 8]>::try_from(bytes).ok())
                .map_or(0, u64::from_be_bytes);
            Some((last + 1).to_be_bytes().to_vec())
        })?;

        updated
            .and_then(|bytes| <[u8; 8]>::try_from(bytes.as_ref()).ok())
            .map(u64::from_be_bytes)
            .ok_or_else(|| {
                AppError::Database(format!(
                    "Counter {} is corrupted",
                    String::from_utf8_lossy(key)
                ))
            })
    }

    /// Read-modify-write of one entry inside `update_and_fetch`.
    ///
    /// `change` is re-run if another writer got there first.
    fn modify(&self, id: u64, change: impl Fn(&mut Entry)) -> Result<Option<Entry>> {
        let mut failure = None;
        let updated = self
            .entries_tree
            .update_and_fetch(Self::entry_key(id), |current| {
                failure = None;
                let bytes = current?;
                let changed = bincode::deserialize::<Entry>(bytes).and_then(|mut stored| {
                    change(&mut stored);
                    bincode::serialize(&stored)
                });
                match changed {
                    Ok(next) => Some(next),
                    Err(e) => {
                        failure = Some(e);
                        Some(bytes.to_vec())
                    }
                }
            })?;

        if let Some(e) = failure {
            return Err(e.into());
        }
        match updated {
            Some(bytes) => Ok(Some(bincode::deserialize(&bytes)?)),
            None => Ok(None),
        }
    }

    /// Flush pending writes to disk
    pub async fn flush(&self) -> Result<()> {
        self.db.flush_async().await?;
        Ok(())
    }
}

#[async_trait]
impl KnowledgeStore for SledStore {
    async fn insert_entry(&self, mut entry: Entry) -> Result<Entry> {
        entry.id = self.next_sequence(b"entries")?;
        self.write_entry(&entry)?;

        tracing::debug!(entry_id = entry.id, "Entry persisted");
        Ok(entry)
    }

    async fn get_entry(&self, id: u64) -> Result<Option<Entry>> {
        self.read_entry(id)
    }

    async fn update_entry(&self, entry: &Entry) -> Result<()> {
        if !self.entries_tree.contains_key(Self::entry_key(entry.id))? {
            return Err(AppError::NotFound(format!("Entry {} not found", entry.id)));
        }
        self.write_entry(entry)
    }

    async fn modify_entry(
        &self,
        id: u64,
        change: &(dyn for<'e> Fn(&'e mut Entry) + Send + Sync),
    ) -> Result<Option<Entry>> {
        self.modify(id, change)
    }

    async fn list_entries(&self, filter: &EntryFilter) -> Result<Vec<Entry>> {
        let entries = self.all_entries().await?;
        Ok(filter.apply(entries))
    }

    async fn all_entries(&self) -> Result<Vec<Entry>> {
        self.entries_tree
            .iter()
            .values()
            .map(|bytes| -> Result<Entry> { Ok(bincode::deserialize(&bytes?)?) })
            .collect()
    }

    async fn record_vote(&self, vote: &Vote) -> Result<Entry> {
        if !self.entries_tree.contains_key(Self::entry_key(vote.entry_id))? {
            return Err(AppError::NotFound(format!("Entry {} not found", vote.entry_id)));
        }

        let key = Self::vote_key(&vote.user, vote.entry_id);
        let marker = bincode::serialize(&vote.kind)?;

        // Claim the (user, entry) slot atomically before touching the counters.
        let claimed = self
            .votes_tree
            .compare_and_swap(key, None as Option<&[u8]>, Some(marker))?;
        if claimed.is_err() {
            return Err(AppError::Validation(format!(
                "User {} has already voted on entry {}",
                vote.user, vote.entry_id
            )));
        }
        self.voters_tree.insert(vote.user.as_bytes(), Vec::<u8>::new())?;

        let entry = self
            .modify(vote.entry_id, |stored| stored.apply_vote(vote.kind))?
            .ok_or_else(|| AppError::NotFound(format!("Entry {} not found", vote.entry_id)))?;

        tracing::debug!(entry_id = vote.entry_id, user = %vote.user, kind = %vote.kind, "Vote persisted");
        Ok(entry)
    }

    async fn voter_count(&self) -> Result<u64> {
        Ok(self.voters_tree.len() as u64)
    }

    async fn add_comment(&self, mut comment: Comment) -> Result<Comment> {
        if !self
            .entries_tree
            .contains_key(Self::entry_key(comment.entry_id))?
        {
            return Err(AppError::NotFound(format!(
                "Entry {} not found",
                comment.entry_id
            )));
        }

        comment.id = self.next_sequence(&Self::comment_sequence_key(comment.entry_id))?;

        let bytes = bincode::serialize(&comment)?;
        self.comments_tree
            .insert(Self::comment_key(comment.entry_id, comment.id), bytes)?;

        tracing::debug!(entry_id = comment.entry_id, comment_id = comment.id, "Comment persisted");
        Ok(comment)
    }

    async fn list_comments(&self, entry_id: u64) -> Result<Vec<Comment>> {
        self.comments_tree
            .scan_prefix(entry_id.to_be_bytes())
            .values()
            .map(|bytes| -> Result<Comment> { Ok(bincode::deserialize(&bytes?)?) })
            .collect()
    }

    async fn record_audit(&self, event: &AuditEvent) -> Result<()> {
        let id = self.db.generate_id()?;
        let bytes = bincode::serialize(event)?;
        self.audit_tree.insert(id.to_be_bytes(), bytes)?;
        Ok(())
    }

    async fn recent_audit(&self, limit: usize) -> Result<Vec<AuditEvent>> {
        self.audit_tree
            .iter()
            .values()
            .rev()
            .take(limit)
            .map(|bytes| -> Result<AuditEvent> { Ok(bincode::deserialize(&bytes?)?) })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{AuditAction, AuditResource, VoteKind};
    use tempfile::TempDir;

    fn entry(title: &str) -> Entry {
        Entry::new(
            title.to_string(),
            "Qual o prazo para recurso?".to_string(),
            "Três dias úteis.".to_string(),
            "Autor".to_string(),
            "Capivari".to_string(),
        )
    }

    #[tokio::test]
    async fn test_sled_entry_round_trip() {
        let temp_dir = TempDir::new().unwrap();
        let store = SledStore::new(temp_dir.path()).unwrap();

        let saved = store.insert_entry(entry("Recurso")).await.unwrap();
        assert_eq!(saved.id, 1);

        let loaded = store.get_entry(saved.id).await.unwrap().unwrap();
        assert_eq!(loaded, saved);
        assert!(loaded.automatic_tags.contains(&"recurso".to_string()));
    }

    #[tokio::test]
    async fn test_sled_persists_across_reopen() {
        let temp_dir = TempDir::new().unwrap();
        let id = {
            let store = SledStore::new(temp_dir.path()).unwrap();
            let saved = store.insert_entry(entry("Persistente")).await.unwrap();
            store.flush().await.unwrap();
            saved.id
        };

        let reopened = SledStore::new(temp_dir.path()).unwrap();
        let loaded = reopened.get_entry(id).await.unwrap();
        assert_eq!(loaded.map(|e| e.title), Some("Persistente".to_string()));
    }

    #[tokio::test]
    async fn test_sled_vote_once() {
        let temp_dir = TempDir::new().unwrap();
        let store = SledStore::new(temp_dir.path()).unwrap();
        let saved = store.insert_entry(entry("Votos")).await.unwrap();

        let voted = store
            .record_vote(&Vote::new(saved.id, "ana".to_string(), VoteKind::Positive))
            .await
            .unwrap();
        assert_eq!(voted.upvotes, 1);

        let repeat = store
            .record_vote(&Vote::new(saved.id, "ana".to_string(), VoteKind::Positive))
            .await;
        assert!(matches!(repeat, Err(AppError::Validation(_))));

        let stored = store.get_entry(saved.id).await.unwrap().unwrap();
        assert_eq!(stored.upvotes, 1);
        assert_eq!(store.voter_count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_sled_comments_and_listing() {
        let temp_dir = TempDir::new().unwrap();
        let store = SledStore::new(temp_dir.path()).unwrap();
        let first = store.insert_entry(entry("Primeiro")).await.unwrap();
        let second = store.insert_entry(entry("Segundo")).await.unwrap();

        store
            .record_vote(&Vote::new(second.id, "ana".to_string(), VoteKind::Positive))
            .await
            .unwrap();

        let listed = store.list_entries(&EntryFilter::default()).await.unwrap();
        let ids: Vec<u64> = listed.iter().map(|e| e.id).collect();
        assert_eq!(ids, vec![second.id, first.id]);

        for text in ["a", "b"] {
            store
                .add_comment(Comment::new(first.id, "bruno".to_string(), text.to_string()))
                .await
                .unwrap();
        }
        let comments = store.list_comments(first.id).await.unwrap();
        let numbers: Vec<u64> = comments.iter().map(|c| c.id).collect();
        assert_eq!(numbers, vec![1, 2]);
        assert!(store.list_comments(second.id).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_sled_audit_newest_first() {
        let temp_dir = TempDir::new().unwrap();
        let store = SledStore::new(temp_dir.path()).unwrap();

        for id in 1..=3 {
            store
                .record_audit(&AuditEvent::new("ana", AuditAction::Votar, AuditResource::Conhecimento, id))
                .await
                .unwrap();
        }

        let recent = store.recent_audit(10).await.unwrap();
        let ids: Vec<u64> = recent.iter().map(|e| e.resource_id).collect();
        assert_eq!(ids, vec![3, 2, 1]);
    }
}
