use crate::models::{Entry, Modality};
use serde::{Deserialize, Serialize};

/// Number of tags reported in [`Statistics::popular_tags`]
pub const POPULAR_TAGS_LIMIT: usize = 10;

/// Aggregate figures for the dashboard
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Statistics {
    #[serde(rename = "total_conhecimentos")]
    pub total_entries: usize,

    #[serde(rename = "total_validados")]
    pub validated_entries: usize,

    /// Percentage with one decimal, e.g. "50.0%"
    #[serde(rename = "taxa_validacao")]
    pub validation_rate: String,

    /// `(tag, count)` pairs, most used first
    #[serde(rename = "tags_populares")]
    pub popular_tags: Vec<(String, usize)>,

    #[serde(rename = "modalidade_mais_comum")]
    pub most_common_modality: Option<(Modality, usize)>,

    /// Distinct users that have voted
    #[serde(rename = "usuarios_ativos")]
    pub active_users: u64,
}

impl Statistics {
    /// Compute statistics over `entries` (in id order)
    pub fn compute(entries: &[Entry], active_users: u64) -> Self {
        let total_entries = entries.len();
        let validated_entries = entries.iter().filter(|e| e.is_validated()).count();

        let rate = if total_entries > 0 {
            validated_entries as f64 / total_entries as f64 * 100.0
        } else {
            0.0
        };

        let mut popular_tags = count_in_order(entries.iter().flat_map(|e| e.all_tags().cloned()));
        popular_tags.truncate(POPULAR_TAGS_LIMIT);

        let most_common_modality = count_in_order(entries.iter().filter_map(|e| e.modality))
            .into_iter()
            .next();

        Self {
            total_entries,
            validated_entries,
            validation_rate: format!("{:.1}%", rate),
            popular_tags,
            most_common_modality,
            active_users,
        }
    }
}

/// Count occurrences, most frequent first; equal counts keep first-seen order.
fn count_in_order<T: PartialEq>(items: impl Iterator<Item = T>) -> Vec<(T, usize)> {
    let mut counts: Vec<(T, usize)> = Vec::new();
    for item in items {
        match counts.iter_mut().find(|(seen, _)| *seen == item) {
            Some((_, n)) => *n += 1,
            None => counts.push((item, 1)),
        }
    }
    counts.sort_by(|a, b| b.1.cmp(&a.1));
    counts
}
