use licita_kb::tagging::{detect_entry_tags, detect_tags, rules};
use std::collections::HashSet;

fn has(text: &str, tag: &str) -> bool {
    detect_tags(text).contains(tag)
}

#[test]
fn test_empty_text_has_no_tags() {
    assert!(detect_tags("").is_empty());
    assert!(detect_tags("   ").is_empty());
}

#[test]
fn test_law_references() {
    assert!(has("Lei nº 14.133", "lei_14133"));
    assert!(has("conforme a lei 14133/2021", "lei_14133"));
    assert!(has("LEI Nº 8.666/93", "lei_8666"));
    assert!(has("Decreto nº 10.024/2019", "decreto_10024"));
    assert!(!has("Decreto 11.986/2024", "decreto_10024"));
}

#[test]
fn test_article_citations() {
    let tags = detect_tags("artigo 59 e art. 60");
    let articles: HashSet<&str> = tags
        .iter()
        .filter(|t| t.starts_with("art_"))
        .map(String::as_str)
        .collect();
    assert_eq!(articles, HashSet::from(["art_59", "art_60"]));

    let repeated = detect_tags("art 75, art. 75 e artigo 75");
    assert_eq!(repeated.iter().filter(|t| t.starts_with("art_")).count(), 1);
}

#[test]
fn test_modality_tags_fire_with_rule_tags() {
    let tags = detect_tags("pregão eletrônico");
    assert!(tags.contains("pregao"));
    assert!(tags.contains("modalidade:pregao"));

    let tags = detect_tags("Dispensa Eletrônica");
    assert!(tags.contains("dispensa"));
    assert!(tags.contains("modalidade:dispensa"));

    // the unaccented spelling only yields the modality tag
    let tags = detect_tags("pregao");
    assert!(tags.contains("modalidade:pregao"));
    assert!(!tags.contains("pregao"));
}

#[test]
fn test_jurisprudence_and_opinions() {
    assert!(has("Acórdão TCU 2.348/2023", "tcu"));
    assert!(has("acordao 1795/2023", "tcu"));
    assert!(has("Parecer AGU nº 12/2022", "agu"));
}

#[test]
fn test_planning_documents() {
    assert!(has("Elaborar o Termo de Referência", "termo_referencia"));
    assert!(has("anexar o TR assinado", "termo_referencia"));
    assert!(has("Estudo Técnico Preliminar", "etp"));
    assert!(has("o ETP deve conter", "etp"));
    assert!(has("pesquisa de preços", "pesquisa_precos"));
    assert!(!has("contrato de obras", "termo_referencia"));
}

#[test]
fn test_deadlines_values_and_appeals() {
    assert!(has("prazo de 3 dias úteis", "prazo"));
    assert!(has("em 10 dias corridos", "prazo"));
    assert!(has("limite de R$ 108.040,82", "valor_limite"));
    assert!(has("recurso administrativo", "recurso"));
    assert!(has("impugnacao ao edital", "impugnacao"));
}

#[test]
fn test_detection_is_repeatable() {
    let text = "Pregão eletrônico, art. 59 da Lei 14.133/2021, Acórdão 1.795/2023";
    assert_eq!(detect_tags(text), detect_tags(text));
}

#[test]
fn test_entry_tags_cover_all_fields() {
    let tags = detect_entry_tags("Impugnação", "Qual o prazo?", "Três dias úteis, art. 164");
    assert!(tags.contains("impugnacao"));
    assert!(tags.contains("art_164"));
}

#[test]
fn test_rule_names_unique() {
    let names: HashSet<&str> = rules().iter().map(|r| r.tag).collect();
    assert_eq!(names.len(), rules().len());
    assert_eq!(rules().len(), 14);
}
