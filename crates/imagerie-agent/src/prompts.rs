use imagerie_core::models::SearchHit;

pub const CLARIFY_PREFIX: &str = "Pour préciser:";
pub const RECOMMEND_PREFIX: &str = "Recommandation:";

pub const FORMAT_REMINDER: &str = "RAPPEL: Commence ta réponse PAR soit 'Pour préciser:' soit \
'Recommandation:' et DONNE UNE SEULE LIGNE.";

/// Asked when the model never produces a usable reply.
pub const FALLBACK_QUESTIONS: [&str; 3] = [
    "Depuis quand et quel caractère ont les céphalées (brutale / intense / progressive) ?",
    "Y a-t-il fièvre, vomissements, perte de connaissance, convulsions ou déficit neurologique focal ?",
    "La patiente est-elle enceinte, a-t-elle des antécédents majeurs (cancer, immunodépression) \
ou un traumatisme crânien récent ?",
];

const INSTRUCTIONS: &str = r#"FORMAT attendu (NE PAS répéter ces lignes dans la réponse):
- Si information MANQUANTE → la réponse DOIT COMMENCER PAR exactement: Pour préciser: [questions]
- Si information SUFFISANTE → la réponse DOIT COMMENCER PAR exactement: Recommandation: [examen - urgence - justification courte]

INSTRUCTIONS STRICTES (FR) - RÉPONDRE SUR UNE SEULE LIGNE:
1) Tu n'utilises QUE les informations écrites dans "CAS CLINIQUE". Tout non écrit est MANQUANT.
2) Vérifie: signes d'alarme (céphalée brutale, déficit neurologique, fièvre), âge >50 ans, durée, antécédents (cancer, immunodépression), grossesse, changement de pattern.
3) Si des informations manquent → TU DOIS POSER EXACTEMENT CES 3 QUESTIONS, dans CET ORDRE, sur UNE SEULE LIGNE, précédées de 'Pour préciser:' et séparées par ' | ' :
{questions}
4) Si suffisant → DONNE une recommandation concise (commence par "Recommandation:").
5) N'utilise le mot « urgence » QUE SI le CAS CLINIQUE contient au moins un signe d'alerte (brutal, déficit neurologique, convulsions, fièvre, traumatisme). En cas de doute, choisis la formulation la moins urgente.
6) RÉPONDRE UNIQUEMENT en FRANÇAIS, sur UNE SEULE LIGNE, sans préambule ni explication supplémentaire.
7) NE PAS fournir d'autres questions ni d'exemples supplémentaires.

SI TU NE PEUX PAS RESPECTER LE FORMAT CI-DESSUS, RÉPONDS EXCLUSIVEMENT AVEC UN OBJET JSON VALIDE, PAR EXEMPLE:
    {"type": "clarify", "questions": ["q1", "q2", "q3"]}
ou
    {"type": "recommendation", "text": "..."}
Le JSON doit être la SEULE chose dans la réponse (aucun autre texte).

RÉPONDS maintenant en FRANÇAIS."#;

const FORCED_NOTE: &str = "Le nombre maximal de questions est atteint: tu DOIS répondre par \
'Recommandation:' avec les informations disponibles.";

pub fn context_lines(hits: &[SearchHit]) -> String {
    hits.iter()
        .map(|h| {
            format!(
                "- {} (source: {}, motif: {})",
                h.text, h.metadata.source, h.metadata.motif
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Prompt asking the model to either clarify or recommend, grounded on `hits`.
pub fn build_prompt(vignette: &str, hits: &[SearchHit], forced: bool) -> String {
    let questions = FALLBACK_QUESTIONS
        .iter()
        .map(|q| format!("     - {}", q))
        .collect::<Vec<_>>()
        .join("\n");
    let mut prompt = format!(
        "GUIDELINES (source: RAG local):\n{}\n\nCAS CLINIQUE:\n{}\n\n{}",
        context_lines(hits),
        vignette,
        INSTRUCTIONS.replace("{questions}", &questions)
    );
    if forced {
        prompt.push_str("\n\n");
        prompt.push_str(FORCED_NOTE);
    }
    prompt
}

pub fn with_reminder(prompt: &str) -> String {
    format!("{}\n\n{}", prompt, FORMAT_REMINDER)
}

#[cfg(test)]
mod tests {
    use super::*;
    use imagerie_core::models::GuidelineMetadata;

    #[test]
    fn test_prompt_contains_context_and_case() {
        let hits = vec![SearchHit {
            id: "1".to_string(),
            text: "Scanner cérébral en urgence".to_string(),
            metadata: GuidelineMetadata {
                motif: "céphalée".to_string(),
                source: "HAS".to_string(),
            },
            distance: 0.2,
        }];
        let prompt = build_prompt("femme de 30 ans, céphalée", &hits, false);
        assert!(prompt.contains("- Scanner cérébral en urgence (source: HAS, motif: céphalée)"));
        assert!(prompt.contains("CAS CLINIQUE:\nfemme de 30 ans, céphalée"));
        assert!(prompt.contains("     - Depuis quand"));
        assert!(!prompt.contains("{questions}"));
        assert!(!prompt.contains("nombre maximal"));

        assert!(build_prompt("x", &hits, true).ends_with(FORCED_NOTE));
    }

    #[test]
    fn test_reminder_suffix() {
        assert!(with_reminder("P").ends_with(FORMAT_REMINDER));
    }
}
