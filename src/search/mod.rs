//! Ranked "smart search" over knowledge entries.
//!
//! The score is a simple weighted sum of substring matches over title,
//! question and answer, plus a bonus for every tag shared between the query
//! and the entry. Tags are derived from the query with the same detector used
//! when entries are created.

mod ranking;

pub use ranking::{
    rank, score_entry, search, RankedSearch, ScoredResult, SearchableEntry, ANSWER_WEIGHT,
    DEFAULT_RESULT_CAP, QUESTION_WEIGHT, TAG_WEIGHT, TITLE_WEIGHT,
};
