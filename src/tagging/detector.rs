use super::patterns::{rules, ARTICLE_CITATION};
use std::collections::BTreeSet;

/// Deduplicated set of semantic tags derived from a text.
///
/// Iteration is sorted, which keeps responses stable, but callers must not
/// attach meaning to the order.
pub type TagSet = BTreeSet<String>;

/// Namespaced modality tag for electronic auctions
pub const MODALITY_PREGAO: &str = "modalidade:pregao";

/// Namespaced modality tag for procurement waivers
pub const MODALITY_DISPENSA: &str = "modalidade:dispensa";

/// Derive the tag set of a free text.
///
/// Three independent passes run over the lower-cased text:
/// 1. every rule of the static table whose pattern occurs adds its name;
/// 2. each distinct article citation ("art. 59", "artigo 75") adds `art_<n>`;
/// 3. the words "pregão"/"pregao" and "dispensa" add the namespaced
///    modality tags.
///
/// The `pregao`/`dispensa` rule tags and the `modalidade:*` tags may both be
/// present; they feed different filters.
///
/// Never fails. Text matching nothing yields an empty set.
pub fn detect_tags(text: &str) -> TagSet {
    let mut tags = TagSet::new();
    if text.is_empty() {
        return tags;
    }

    let lowered = text.to_lowercase();

    for rule in rules() {
        if rule.is_match(&lowered) {
            tags.insert(rule.tag.to_string());
        }
    }

    for captures in ARTICLE_CITATION.captures_iter(&lowered) {
        tags.insert(format!("art_{}", &captures[1]));
    }

    if lowered.contains("pregão") || lowered.contains("pregao") {
        tags.insert(MODALITY_PREGAO.to_string());
    }
    if lowered.contains("dispensa") {
        tags.insert(MODALITY_DISPENSA.to_string());
    }

    tags
}

/// Tags of an entry, computed from its concatenated title, question and answer
pub fn detect_entry_tags(title: &str, question: &str, answer: &str) -> TagSet {
    detect_tags(&format!("{} {} {}", title, question, answer))
}
