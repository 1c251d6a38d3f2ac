//! Knowledge base operations: entry lifecycle, votes, validation,
//! comments, statistics and ranked search.

mod seed;
mod service;
mod stats;

pub use seed::demo_entries;
pub use service::{KnowledgeService, NewComment, NewEntry, SearchHit, SearchOutcome};
pub use stats::{Statistics, POPULAR_TAGS_LIMIT};
