use crate::config::{CacheConfig, KnowledgeConfig};
use crate::error::{AppError, Result};
use crate::knowledge::{demo_entries, Statistics};
use crate::metrics::{ENTRIES_CREATED_TOTAL, SEARCHES_TOTAL, SEARCH_DURATION_SECONDS};
use crate::models::{
    AuditAction, AuditEvent, AuditResource, Comment, CommentKind, Entry, Modality, ProcessPhase,
    Vote, VoteKind,
};
use crate::search::rank;
use crate::state::{AppCache, EntryFilter, KnowledgeStore};
use std::sync::Arc;
use std::time::Duration;

const STATS_KEY: &str = "estatisticas";

/// Fields supplied by the author of a new entry
#[derive(Debug, Clone, Default)]
pub struct NewEntry {
    pub title: String,
    pub question: String,
    pub answer: String,
    pub modality: Option<Modality>,
    pub phase: Option<ProcessPhase>,
    pub tags: Vec<String>,
    /// Falls back to the configured campus
    pub campus: Option<String>,
}

/// Fields supplied by the author of a comment
#[derive(Debug, Clone, Default)]
pub struct NewComment {
    pub text: String,
    pub role: Option<String>,
    pub kind: CommentKind,
    pub reply_to: Option<u64>,
}

/// One ranked search result
#[derive(Debug, Clone)]
pub struct SearchHit {
    pub entry: Entry,
    pub score: u32,
}

/// Ranked results plus the tags detected in the query
#[derive(Debug, Clone, Default)]
pub struct SearchOutcome {
    pub hits: Vec<SearchHit>,
    pub suggested_tags: Vec<String>,
    /// Matches before the result cap was applied
    pub total_found: usize,
}

/// Knowledge base operations shared by the HTTP API and the chat relay
pub struct KnowledgeService {
    store: Arc<dyn KnowledgeStore>,
    list_cache: AppCache<String, Arc<Vec<Entry>>>,
    stats_cache: AppCache<&'static str, Statistics>,
    campus: String,
    search_result_cap: usize,
}

impl KnowledgeService {
    pub fn new(
        store: Arc<dyn KnowledgeStore>,
        cache: &CacheConfig,
        knowledge: &KnowledgeConfig,
    ) -> Self {
        let ttl = Duration::from_secs(cache.ttl_secs);
        Self {
            store,
            list_cache: AppCache::new(cache.max_capacity, ttl),
            stats_cache: AppCache::new(1, ttl),
            campus: knowledge.campus.clone(),
            search_result_cap: knowledge.search_result_cap,
        }
    }

    /// Get a reference to the underlying store
    pub fn store(&self) -> &Arc<dyn KnowledgeStore> {
        &self.store
    }

    pub fn campus(&self) -> &str {
        &self.campus
    }

    fn invalidate_caches(&self) {
        self.list_cache.invalidate_all();
        self.stats_cache.invalidate_all();
    }

    async fn audit(&self, event: AuditEvent) {
        if let Err(e) = self.store.record_audit(&event).await {
            tracing::warn!(
                error = %e,
                action = %event.action,
                resource_id = event.resource_id,
                "Failed to record audit event"
            );
        }
    }

    fn not_found(id: u64) -> AppError {
        AppError::NotFound(format!("Conhecimento {} não encontrado", id))
    }

    async fn require_entry(&self, id: u64) -> Result<Entry> {
        self.store
            .get_entry(id)
            .await?
            .ok_or_else(|| Self::not_found(id))
    }

    /// Create an entry; automatic tags are detected from its text
    pub async fn create_entry(&self, new: NewEntry, author: &str) -> Result<Entry> {
        if new.title.trim().is_empty() {
            return Err(AppError::Validation("Title must not be empty".to_string()));
        }

        let campus = new.campus.unwrap_or_else(|| self.campus.clone());
        let entry = Entry::new(new.title, new.question, new.answer, author.to_string(), campus)
            .with_modality(new.modality)
            .with_phase(new.phase)
            .with_tags(new.tags);

        let entry = self.store.insert_entry(entry).await?;
        self.invalidate_caches();
        ENTRIES_CREATED_TOTAL.inc();

        tracing::info!(
            entry_id = entry.id,
            author = %entry.author,
            automatic_tags = entry.automatic_tags.len(),
            "Knowledge entry created"
        );

        self.audit(
            AuditEvent::new(author, AuditAction::Criar, AuditResource::Conhecimento, entry.id)
                .with_details(entry.title.clone()),
        )
        .await;

        Ok(entry)
    }

    /// Filtered, vote-ordered page of entries
    pub async fn list_entries(&self, filter: &EntryFilter) -> Result<Vec<Entry>> {
        let key = filter.cache_key();
        if let Some(cached) = self.list_cache.get(&key).await {
            tracing::debug!(cache_key = %key, "Listing served from cache");
            return Ok(cached.as_ref().clone());
        }

        let entries = Arc::new(self.store.list_entries(filter).await?);
        self.list_cache.insert(key, entries.clone()).await;
        Ok(entries.as_ref().clone())
    }

    /// Fetch an entry and count the view
    pub async fn get_entry(&self, id: u64) -> Result<Entry> {
        self.store
            .modify_entry(id, &|entry: &mut Entry| entry.views += 1)
            .await?
            .ok_or_else(|| Self::not_found(id))
    }

    /// Cast `user`'s vote; a user votes at most once per entry
    pub async fn vote(&self, id: u64, user: &str, kind: VoteKind) -> Result<Entry> {
        let entry = self
            .store
            .record_vote(&Vote::new(id, user.to_string(), kind))
            .await?;
        self.invalidate_caches();

        tracing::info!(entry_id = id, user = %user, kind = %kind, "Vote recorded");
        self.audit(
            AuditEvent::new(user, AuditAction::Votar, AuditResource::Conhecimento, id)
                .with_details(kind.to_string()),
        )
        .await;

        Ok(entry)
    }

    /// Mark an entry as validated by `validator` acting as `role`
    pub async fn validate(&self, id: u64, validator: &str, role: &str) -> Result<Entry> {
        if role.trim().is_empty() {
            return Err(AppError::Validation("Role (cargo) is required".to_string()));
        }

        let role = role.trim();
        let entry = self
            .store
            .modify_entry(id, &|entry: &mut Entry| entry.validate(validator, role))
            .await?
            .ok_or_else(|| Self::not_found(id))?;
        self.invalidate_caches();

        tracing::info!(entry_id = id, validator = %validator, role = %role, "Entry validated");
        self.audit(
            AuditEvent::new(validator, AuditAction::Validar, AuditResource::Conhecimento, id)
                .with_details(role.to_string()),
        )
        .await;

        Ok(entry)
    }

    pub async fn add_comment(&self, id: u64, author: &str, new: NewComment) -> Result<Comment> {
        if new.text.trim().is_empty() {
            return Err(AppError::Validation("Comment text must not be empty".to_string()));
        }
        self.require_entry(id).await?;

        let mut comment = Comment::new(id, author.to_string(), new.text);
        comment.role = new.role;
        comment.kind = new.kind;
        comment.reply_to = new.reply_to;

        let comment = self.store.add_comment(comment).await?;

        tracing::info!(entry_id = id, comment_id = comment.id, author = %author, "Comment added");
        self.audit(
            AuditEvent::new(author, AuditAction::Comentar, AuditResource::Comentario, comment.id)
                .with_details(format!("conhecimento {}", id)),
        )
        .await;

        Ok(comment)
    }

    pub async fn list_comments(&self, id: u64) -> Result<Vec<Comment>> {
        self.require_entry(id).await?;
        self.store.list_comments(id).await
    }

    /// Dashboard statistics, cached for the configured TTL
    pub async fn statistics(&self) -> Result<Statistics> {
        if let Some(stats) = self.stats_cache.get(&STATS_KEY).await {
            return Ok(stats);
        }

        let entries = self.store.all_entries().await?;
        let voters = self.store.voter_count().await?;
        let stats = Statistics::compute(&entries, voters);

        self.stats_cache.insert(STATS_KEY, stats.clone()).await;
        Ok(stats)
    }

    /// Ranked search over every entry
    pub async fn smart_search(&self, query: &str) -> Result<SearchOutcome> {
        let entries = self.store.all_entries().await?;

        let timer = SEARCH_DURATION_SECONDS.start_timer();
        let ranked = rank(query, &entries, self.search_result_cap);
        timer.observe_duration();
        SEARCHES_TOTAL.inc();

        tracing::debug!(
            query = %query,
            total_found = ranked.total_found,
            query_tags = ranked.query_tags.len(),
            "Smart search executed"
        );

        Ok(SearchOutcome {
            hits: ranked
                .results
                .iter()
                .map(|r| SearchHit {
                    entry: r.entry.clone(),
                    score: r.score,
                })
                .collect(),
            suggested_tags: ranked.query_tags.into_iter().collect(),
            total_found: ranked.total_found,
        })
    }

    /// Load the demonstration entries into an empty store.
    ///
    /// Returns the number of entries inserted (0 when the store already has
    /// content, e.g. a reopened sled database).
    pub async fn seed_examples(&self) -> Result<usize> {
        if !self.store.all_entries().await?.is_empty() {
            tracing::debug!("Store not empty, skipping demonstration entries");
            return Ok(0);
        }

        let demos = demo_entries(&self.campus);
        let count = demos.len();
        for entry in demos {
            self.store.insert_entry(entry).await?;
        }
        self.invalidate_caches();

        tracing::info!(count, "Demonstration entries loaded");
        Ok(count)
    }
}
