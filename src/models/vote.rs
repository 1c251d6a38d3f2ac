use super::VoteKind;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One user's vote on one entry. A user votes at most once per entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Vote {
    pub entry_id: u64,
    pub user: String,
    pub kind: VoteKind,
    pub cast_at: DateTime<Utc>,
}

impl Vote {
    pub fn new(entry_id: u64, user: String, kind: VoteKind) -> Self {
        Self {
            entry_id,
            user,
            kind,
            cast_at: Utc::now(),
        }
    }
}
