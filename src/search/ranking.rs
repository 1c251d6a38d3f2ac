use crate::tagging::{detect_tags, TagSet};

/// Maximum number of results returned by [`search`]
pub const DEFAULT_RESULT_CAP: usize = 10;

/// Score added when the query occurs in the title
pub const TITLE_WEIGHT: u32 = 10;
/// Score added when the query occurs in the question
pub const QUESTION_WEIGHT: u32 = 5;
/// Score added when the query occurs in the answer
pub const ANSWER_WEIGHT: u32 = 3;
/// Score added per query tag shared with the entry
pub const TAG_WEIGHT: u32 = 7;

/// Read-only view of an entry as seen by the ranking
pub trait SearchableEntry {
    fn title(&self) -> &str;
    fn question(&self) -> &str;
    fn answer(&self) -> &str;
    fn manual_tags(&self) -> &[String];
    fn automatic_tags(&self) -> &[String];

    /// Whether the tag was given by the author or detected automatically
    fn has_tag(&self, tag: &str) -> bool {
        self.manual_tags().iter().any(|t| t == tag)
            || self.automatic_tags().iter().any(|t| t == tag)
    }
}

/// An entry paired with its relevance for one search call
#[derive(Debug)]
pub struct ScoredResult<'a, E> {
    pub entry: &'a E,
    pub score: u32,
}

// Manual impls: `E` itself need not be Clone/PartialEq.
impl<E> Clone for ScoredResult<'_, E> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<E> Copy for ScoredResult<'_, E> {}

/// Outcome of a ranked search
#[derive(Debug)]
pub struct RankedSearch<'a, E> {
    /// Best results, highest score first, at most `cap` of them
    pub results: Vec<ScoredResult<'a, E>>,
    /// Tags detected in the query
    pub query_tags: TagSet,
    /// Number of entries that scored above zero, before truncation
    pub total_found: usize,
}

/// Rank `entries` against `query`, keeping at most [`DEFAULT_RESULT_CAP`]
/// results.
pub fn search<'a, E: SearchableEntry>(query: &str, entries: &'a [E]) -> Vec<ScoredResult<'a, E>> {
    rank(query, entries, DEFAULT_RESULT_CAP).results
}

/// Heuristic relevance ranking.
///
/// Each entry starts at zero and gains [`TITLE_WEIGHT`], [`QUESTION_WEIGHT`]
/// and [`ANSWER_WEIGHT`] when the query occurs (case-insensitively) in the
/// corresponding field, plus [`TAG_WEIGHT`] for every tag detected in the
/// query that the entry also carries. There is no normalisation, stemming or
/// term weighting.
///
/// Entries scoring zero are dropped. The sort is stable, so entries with equal
/// scores keep their input order and repeated calls return the same list.
/// A blank query yields no results. Otherwise the query is used verbatim,
/// surrounding whitespace included, as the substring needle.
pub fn rank<'a, E: SearchableEntry>(query: &str, entries: &'a [E], cap: usize) -> RankedSearch<'a, E> {
    if query.trim().is_empty() {
        return RankedSearch {
            results: Vec::new(),
            query_tags: TagSet::new(),
            total_found: 0,
        };
    }

    let query_tags = detect_tags(query);
    let needle = query.to_lowercase();

    let mut results: Vec<ScoredResult<'a, E>> = entries
        .iter()
        .filter_map(|entry| {
            let score = score_entry(&needle, &query_tags, entry);
            (score > 0).then_some(ScoredResult { entry, score })
        })
        .collect();

    results.sort_by(|a, b| b.score.cmp(&a.score));

    let total_found = results.len();
    results.truncate(cap);

    RankedSearch {
        results,
        query_tags,
        total_found,
    }
}

/// Score of one entry. `needle` must already be lower-cased.
pub fn score_entry<E: SearchableEntry>(needle: &str, query_tags: &TagSet, entry: &E) -> u32 {
    let mut score = 0;

    if !needle.is_empty() {
        if contains_ignore_case(entry.title(), needle) {
            score += TITLE_WEIGHT;
        }
        if contains_ignore_case(entry.question(), needle) {
            score += QUESTION_WEIGHT;
        }
        if contains_ignore_case(entry.answer(), needle) {
            score += ANSWER_WEIGHT;
        }
    }

    let shared_tags = query_tags.iter().filter(|tag| entry.has_tag(tag)).count() as u32;
    score + shared_tags * TAG_WEIGHT
}

fn contains_ignore_case(haystack: &str, lowered_needle: &str) -> bool {
    haystack.to_lowercase().contains(lowered_needle)
}
