use crate::knowledge::SearchOutcome;
use std::fmt::Write;

/// Reply for a search command without a term
pub fn usage(command: &str) -> String {
    format!("Uso: {} <termo>", command)
}

/// Plain-text rendering of search results for a chat reply
pub fn format_results(query: &str, outcome: &SearchOutcome) -> String {
    if outcome.hits.is_empty() {
        return format!("Nenhum resultado encontrado para \"{}\".", query);
    }

    let mut text = format!(
        "{} resultado(s) para \"{}\":\n",
        outcome.total_found, query
    );
    for (position, hit) in outcome.hits.iter().enumerate() {
        let _ = writeln!(
            text,
            "{}. {} (#{}, relevância {})",
            position + 1,
            hit.entry.title,
            hit.entry.id,
            hit.score
        );
    }
    if !outcome.suggested_tags.is_empty() {
        let _ = write!(text, "Tags: {}", outcome.suggested_tags.join(", "));
    }

    text.trim_end().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::knowledge::SearchHit;
    use crate::models::Entry;

    fn hit(id: u64, title: &str, score: u32) -> SearchHit {
        let mut entry = Entry::new(
            title.to_string(),
            String::new(),
            String::new(),
            "Autor".to_string(),
            "Capivari".to_string(),
        );
        entry.id = id;
        SearchHit { entry, score }
    }

    #[test]
    fn test_empty_results() {
        let text = format_results("leilão", &SearchOutcome::default());
        assert_eq!(text, "Nenhum resultado encontrado para \"leilão\".");
    }

    #[test]
    fn test_numbered_results_with_tags() {
        let outcome = SearchOutcome {
            hits: vec![hit(2, "Pregão: inabilitação", 22), hit(1, "Dispensa em obras", 7)],
            suggested_tags: vec!["pregao".to_string()],
            total_found: 2,
        };

        let text = format_results("pregão", &outcome);
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "2 resultado(s) para \"pregão\":");
        assert_eq!(lines[1], "1. Pregão: inabilitação (#2, relevância 22)");
        assert_eq!(lines[2], "2. Dispensa em obras (#1, relevância 7)");
        assert_eq!(lines[3], "Tags: pregao");
    }

    #[test]
    fn test_usage() {
        assert_eq!(usage("/buscar"), "Uso: /buscar <termo>");
    }
}
