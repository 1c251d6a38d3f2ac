use crate::models::{Entry, EntryStatus, Modality, ProcessPhase};

/// The two demonstration entries loaded on an empty knowledge base.
///
/// Vote counters and validation are preset; automatic tags are computed as
/// for any other entry.
pub fn demo_entries(campus: &str) -> Vec<Entry> {
    let mut estimated_value = Entry::new(
        "Como calcular o valor estimado para dispensa eletrônica em obras?".to_string(),
        "Precisamos contratar uma reforma no laboratório. Como calcular corretamente o valor \
         para enquadrar em dispensa eletrônica?"
            .to_string(),
        "Para obras e serviços de engenharia, o limite para dispensa eletrônica é de \
         R$ 108.040,82 (Decreto 11.986/2024). O cálculo deve incluir: 1) Custos diretos \
         (materiais, mão de obra); 2) BDI (Benefícios e Despesas Indiretas); 3) Encargos \
         sociais e trabalhistas. Importante: considerar o somatório de todas as contratações \
         do mesmo objeto no exercício financeiro. Veja o Acórdão TCU 2.348/2023 sobre \
         fracionamento."
            .to_string(),
        "Maria Santos".to_string(),
        campus.to_string(),
    )
    .with_modality(Some(Modality::DispensaEletronica))
    .with_phase(Some(ProcessPhase::Planejamento))
    .with_tags(vec![
        "obras".to_string(),
        "valor-estimado".to_string(),
        "bdi".to_string(),
    ]);
    estimated_value.upvotes = 42;
    estimated_value.downvotes = 1;
    estimated_value.status = EntryStatus::Validated;
    estimated_value.validated_by = Some("João Silva (Coordenador)".to_string());

    let mut disqualified_bidders = Entry::new(
        "Pregão eletrônico: como proceder quando todos os licitantes são inabilitados?"
            .to_string(),
        "No pregão para aquisição de equipamentos de TI, todos os licitantes foram \
         inabilitados por não atenderem às especificações técnicas. Qual o procedimento?"
            .to_string(),
        "Conforme art. 59 da Lei 14.133/2021, quando todos os licitantes forem inabilitados, \
         a Administração poderá fixar prazo de 3 dias úteis para apresentação de nova \
         documentação. Procedimento: 1) Lavrar ata circunstanciada; 2) Notificar todos os \
         licitantes; 3) Conceder prazo para saneamento; 4) Se persistir a inabilitação, \
         declarar fracassado. O TCU orienta (Acórdão 1.795/2023) que deve-se avaliar se os \
         requisitos não estão excessivos."
            .to_string(),
        "Pedro Lima".to_string(),
        campus.to_string(),
    )
    .with_modality(Some(Modality::PregaoEletronico))
    .with_phase(Some(ProcessPhase::Selecao))
    .with_tags(vec![
        "inabilitacao".to_string(),
        "saneamento".to_string(),
        "prazo-recursal".to_string(),
    ]);
    disqualified_bidders.upvotes = 38;
    disqualified_bidders.downvotes = 2;

    vec![estimated_value, disqualified_bidders]
}
