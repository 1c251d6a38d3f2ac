//! Static table of procurement terminology rules.
//!
//! Each rule pairs a tag name with a case-insensitive pattern. The table is
//! compiled once on first use and shared read-only by every caller.

use once_cell::sync::Lazy;
use regex::{Regex, RegexBuilder};

/// A named pattern whose presence anywhere in a text yields its tag
#[derive(Debug)]
pub struct PatternRule {
    /// Tag added when the pattern matches
    pub tag: &'static str,
    /// Compiled, case-insensitive pattern
    pub pattern: Regex,
}

impl PatternRule {
    /// Whether the pattern occurs anywhere in `text`
    pub fn is_match(&self, text: &str) -> bool {
        self.pattern.is_match(text)
    }
}

/// Tag name and pattern source for every rule.
///
/// Citation references accept thousands separators ("2.348/2023") as they
/// appear in published decisions. The "TR" and "ETP" acronyms only match as
/// whole words.
const RULE_SOURCES: &[(&str, &str)] = &[
    ("lei_14133", r"lei\s*(?:n[º°])?\s*14\.?133"),
    ("lei_8666", r"lei\s*(?:n[º°])?\s*8\.?666"),
    ("decreto_10024", r"decreto\s*(?:n[º°])?\s*10\.?024"),
    ("tcu", r"(?:acórdão|acordao)\s*(?:tcu\s*)?\d[\d.]*/\d{4}"),
    ("agu", r"parecer\s*(?:agu\s*)?(?:n[º°])?\s*\d[\d.]*/\d{4}"),
    ("dispensa", r"dispensa\s*(?:eletrônica|eletronica)?"),
    ("pregao", r"pregão\s*(?:eletrônico|eletronico)?"),
    ("valor_limite", r"(?:r\$|valor)\s*\d+\.?\d*"),
    ("prazo", r"\d+\s*dias?\s*(?:úteis|uteis|corridos)?"),
    ("recurso", r"recurso\s*(?:administrativo)?"),
    ("impugnacao", r"impugna[çc][ãa]o"),
    ("termo_referencia", r"termo\s*de\s*refer[êe]ncia|\btr\b"),
    ("etp", r"estudo\s*t[ée]cnico\s*preliminar|\betp\b"),
    ("pesquisa_precos", r"pesquisa\s*de\s*pre[çc]os?"),
];

/// Citation of a legal article: "art 5", "art. 59", "artigo 75"
pub(crate) static ARTICLE_CITATION: Lazy<Regex> = Lazy::new(|| {
    RegexBuilder::new(r"\bart(?:igo|\.)?\s*(\d+)")
        .case_insensitive(true)
        .build()
        .expect("Failed to compile article citation pattern")
});

/// Compiled rule table
pub static PATTERN_RULES: Lazy<Vec<PatternRule>> = Lazy::new(|| {
    RULE_SOURCES
        .iter()
        .map(|&(tag, source)| PatternRule {
            tag,
            pattern: RegexBuilder::new(source)
                .case_insensitive(true)
                .build()
                .unwrap_or_else(|e| panic!("Failed to compile pattern for tag {}: {}", tag, e)),
        })
        .collect()
});

/// All rules, in table order
pub fn rules() -> &'static [PatternRule] {
    PATTERN_RULES.as_slice()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    fn rule(tag: &str) -> &'static PatternRule {
        rules().iter().find(|r| r.tag == tag).unwrap()
    }

    #[test]
    fn test_all_rules_compile_with_unique_tags() {
        let tags: HashSet<&str> = rules().iter().map(|r| r.tag).collect();
        assert_eq!(tags.len(), RULE_SOURCES.len());
        assert_eq!(rules().len(), 14);
    }

    #[test]
    fn test_law_references() {
        assert!(rule("lei_14133").is_match("lei nº 14.133/2021"));
        assert!(rule("lei_14133").is_match("lei 14133"));
        assert!(rule("lei_14133").is_match("LEI N° 14.133"));
        assert!(rule("lei_8666").is_match("lei 8.666/93"));
        assert!(!rule("lei_8666").is_match("lei 14.133"));
        assert!(rule("decreto_10024").is_match("decreto nº 10.024"));
    }

    #[test]
    fn test_decision_references() {
        assert!(rule("tcu").is_match("acórdão tcu 1795/2023"));
        assert!(rule("tcu").is_match("Acórdão TCU 2.348/2023"));
        assert!(rule("tcu").is_match("acordao 1234/2020"));
        assert!(!rule("tcu").is_match("acórdão recente"));
        assert!(rule("agu").is_match("parecer agu nº 12/2022"));
        assert!(rule("agu").is_match("parecer 7/2019"));
    }

    #[test]
    fn test_acronyms_match_whole_words_only() {
        assert!(rule("termo_referencia").is_match("o TR foi aprovado"));
        assert!(rule("termo_referencia").is_match("termo de referência"));
        assert!(!rule("termo_referencia").is_match("contratar"));
        assert!(rule("etp").is_match("elaborar o ETP"));
        assert!(rule("etp").is_match("estudo técnico preliminar"));
        assert!(!rule("etp").is_match("setpoint"));
    }

    #[test]
    fn test_deadlines_and_values() {
        assert!(rule("prazo").is_match("3 dias úteis"));
        assert!(rule("prazo").is_match("1 dia"));
        assert!(rule("valor_limite").is_match("r$ 108.040,82"));
        assert!(rule("valor_limite").is_match("valor 50000"));
        assert!(!rule("valor_limite").is_match("valor estimado"));
    }
}
