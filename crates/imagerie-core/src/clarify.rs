//! Rule-based clarification questions for the retrieval path.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::text::{contains_any, normalize};

pub const AGE_QUESTION: &str = "Quel âge a le patient ?";
pub const DESCRIPTION_QUESTION: &str =
    "Pouvez-vous décrire plus précisément les symptômes, leur localisation et leur évolution ?";

const HEADACHE_QUESTION: &str = "Pouvez-vous préciser les caractéristiques de ces céphalées ?\n\
- Sont-elles brutales (en coup de tonnerre) ou progressives ?\n\
- Y a-t-il des signes associés : fièvre, vomissements, troubles visuels, déficit neurologique ?";
const ABDOMINAL_QUESTION: &str = "Pouvez-vous préciser la localisation de la douleur abdominale ?\n\
- Fosse iliaque droite (FID) ?\n\
- Épigastre, hypochondre droit, lombaire ?\n\
- Y a-t-il de la fièvre ou des signes associés ?";
const NEURO_QUESTION: &str = "Pouvez-vous préciser les troubles neurologiques ?\n\
- Troubles moteurs (faiblesse, paralysie) ?\n\
- Troubles sensitifs (engourdissements, paresthésies) ?\n\
- Troubles de la marche, de l'équilibre, cognitifs ?";

const HEADACHE_FOLLOW_UP: &str = "Pour mieux vous orienter, pouvez-vous préciser :\n\
- Ces céphalées sont-elles brutales (en coup de tonnerre) ou progressives ?\n\
- Y a-t-il des signes associés : fièvre, vomissements, troubles de la vision, déficit neurologique ?";
const ABDOMINAL_FOLLOW_UP: &str = "Pour préciser l'indication d'imagerie, pouvez-vous me dire :\n\
- Où se situe exactement la douleur (fosse iliaque droite, épigastre, etc.) ?\n\
- Y a-t-il de la fièvre, des nausées, des vomissements ?";
const NEURO_FOLLOW_UP: &str = "Pour orienter l'imagerie neurologique :\n\
- S'agit-il de troubles moteurs (faiblesse, paralysie) ou sensitifs (engourdissements) ?\n\
- Y a-t-il des troubles de la marche, de l'équilibre, de la mémoire ?";
const GENERIC_FOLLOW_UP: &str = "Pouvez-vous me donner quelques précisions supplémentaires sur :\n\
- L'évolution des symptômes (brutal, progressif) ?\n\
- Les signes associés (fièvre, nausées, troubles neurologiques) ?\n\
- Le contexte (antécédents, traitements en cours) ?";

const MIN_DESCRIPTION_WORDS: usize = 5;
const MIN_FOLLOW_UP_WORDS: usize = 6;

const HEADACHE_TERMS: &[&str] = &["cephalee", "mal de tete"];

static DURATION: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\b(depuis|\d+\s*(h|heures?|jours?|semaines?|mois|ans?))\b").unwrap()
});

fn word_count(text: &str) -> usize {
    text.split_whitespace().count()
}

fn has_age(case: &str) -> bool {
    contains_any(case, &["ans", "age", "annees"])
}

/// The single most important missing piece, if any: age first, then a
/// fuller description, then domain-specific qualifiers.
pub fn critical_question(vignette: &str) -> Option<&'static str> {
    let case = normalize(vignette);

    if !has_age(&case) {
        return Some(AGE_QUESTION);
    }
    if word_count(&case) < MIN_DESCRIPTION_WORDS {
        return Some(DESCRIPTION_QUESTION);
    }
    if contains_any(&case, HEADACHE_TERMS)
        && !contains_any(
            &case,
            &["brutal", "progressif", "pulsatile", "tension", "vomissement", "fievre"],
        )
    {
        return Some(HEADACHE_QUESTION);
    }
    if contains_any(&case, &["abdominale", "ventre"])
        && !contains_any(
            &case,
            &["fid", "fosse iliaque", "epigastre", "hypochondre", "lombaire", "sous-costale"],
        )
    {
        return Some(ABDOMINAL_QUESTION);
    }
    if contains_any(&case, &["trouble", "faiblesse", "paralysie", "engourdissement"])
        && !contains_any(
            &case,
            &["moteur", "sensitif", "marche", "parole", "vision", "cognitif"],
        )
    {
        return Some(NEURO_QUESTION);
    }
    None
}

/// Whether a general follow-up is worth asking. Only ever true on the first exchange.
pub fn needs_follow_up(vignette: &str, first_interaction: bool) -> bool {
    if !first_interaction {
        return false;
    }
    let case = normalize(vignette);
    if word_count(&case) < MIN_FOLLOW_UP_WORDS {
        return true;
    }
    if contains_any(&case, HEADACHE_TERMS)
        && !contains_any(
            &case,
            &["brutal", "progressif", "chronique", "fievre", "vomissement"],
        )
    {
        return true;
    }
    case.contains("douleur")
        && case.contains("abdomen")
        && !contains_any(&case, &["fid", "epigastre", "hypochondre", "fievre"])
}

pub fn follow_up_question(vignette: &str) -> &'static str {
    let case = normalize(vignette);
    if contains_any(&case, &["cephalee", "mal de tete", "crane"]) {
        HEADACHE_FOLLOW_UP
    } else if contains_any(&case, &["abdomen", "ventre", "douleur", "mal"]) {
        ABDOMINAL_FOLLOW_UP
    } else if contains_any(&case, &["trouble", "faiblesse", "neurologique"]) {
        NEURO_FOLLOW_UP
    } else {
        GENERIC_FOLLOW_UP
    }
}

/// Whether `case` already contains an answer to `question`.
///
/// True when the question was appended verbatim with an answer, or when the
/// case already covers the topic the question asks about.
pub fn question_answered(question: &str, case: &str) -> bool {
    let q = normalize(question.trim());
    let case = normalize(case);

    if !q.is_empty() && has_recorded_answer(&q, &case) {
        return true;
    }
    if contains_any(&q, &["depuis quand", "duree", "evolution"]) {
        return DURATION.is_match(&case)
            || contains_any(&case, &["brutal", "progressi", "intense", "soudain"]);
    }
    if contains_any(&q, &["fievre", "vomissement", "deficit"]) {
        return contains_any(&case, &["fievre", "vomissement", "deficit", "febrile"]);
    }
    if contains_any(&q, &["enceinte", "cancer", "traumatisme", "antecedent"]) {
        return contains_any(&case, &["enceinte", "grossesse", "cancer", "traumatisme", "antecedent"]);
    }
    if contains_any(&q, &["age"]) {
        return has_age(&case);
    }
    false
}

/// True when the first pending question asks for the symptom duration and
/// the first answer of `input` does not give one.
pub fn needs_duration(questions: &[String], input: &str) -> bool {
    let Some(first) = questions.first() else {
        return false;
    };
    if !contains_any(&normalize(first), &["depuis quand", "duree"]) {
        return false;
    }
    let answer = input.split(['|', ',', ';']).next().unwrap_or_default();
    !DURATION.is_match(&normalize(answer))
}

/// Splice a duration into the first answer of `input`, leaving the other
/// answers in place.
pub fn add_duration(input: &str, duration: &str) -> String {
    let duration = duration.trim();
    let duration = if normalize(duration).starts_with("depuis") {
        duration.to_string()
    } else {
        format!("depuis {}", duration)
    };
    let (first, rest) = input.split_at(input.find(['|', ',', ';']).unwrap_or(input.len()));
    let first = first.trim();
    if first.is_empty() {
        format!("{}{}", duration, rest)
    } else {
        format!("{} {}{}", first, duration, rest)
    }
}

/// An appended `"<question>: <answer>"` pair with a non-empty answer.
fn has_recorded_answer(q: &str, case: &str) -> bool {
    let key = format!("{}:", q);
    case.match_indices(&key).any(|(at, _)| {
        case[at + key.len()..]
            .split([',', '\n'])
            .next()
            .is_some_and(|answer| !answer.trim().is_empty())
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_age_first() {
        assert_eq!(critical_question("céphalée brutale avec fièvre"), Some(AGE_QUESTION));
    }

    #[test]
    fn test_short_description() {
        assert_eq!(critical_question("homme 40 ans"), Some(DESCRIPTION_QUESTION));
    }

    #[test]
    fn test_headache_without_qualifier() {
        let q = critical_question("femme de 40 ans avec céphalées depuis hier soir").unwrap();
        assert!(q.contains("caractéristiques de ces céphalées"));
        assert_eq!(
            critical_question("femme de 40 ans avec céphalées brutales depuis hier"),
            None
        );
    }

    #[test]
    fn test_follow_up_only_first_round() {
        let case = "femme de 40 ans, céphalées depuis deux jours";
        assert!(needs_follow_up(case, true));
        assert!(!needs_follow_up(case, false));
        assert!(follow_up_question(case).starts_with("Pour mieux vous orienter"));
    }

    #[test]
    fn test_generic_follow_up() {
        assert!(follow_up_question("toux sèche chez un fumeur").starts_with("Pouvez-vous me donner"));
    }

    #[test]
    fn test_question_answered() {
        let case = "céphalée, Depuis quand ?: 2 jours";
        assert!(question_answered("Depuis quand ?", case));
        assert!(question_answered(
            "Y a-t-il fièvre, vomissements ou déficit ?",
            "céphalée fébrile"
        ));
        assert!(!question_answered("Antécédents de cancer ?", "céphalée fébrile"));
        assert!(question_answered("Porteur d'un pacemaker ?", "céphalée, Porteur d'un pacemaker ?: oui"));
        assert!(!question_answered(
            "Porteur d'un pacemaker ?",
            "céphalée, Porteur d'un pacemaker ?: , Fièvre ?: non"
        ));
        assert!(!question_answered("Porteur d'un pacemaker ?", "céphalée, Porteur d'un pacemaker ?:"));
    }

    #[test]
    fn test_duration_follow_up() {
        let questions = vec!["Depuis quand ?".to_string(), "Fièvre ?".to_string()];
        assert!(needs_duration(&questions, "brutale, non"));
        assert!(!needs_duration(&questions, "2 jours, non"));
        assert!(!needs_duration(&["Fièvre ?".to_string()], "non"));

        assert_eq!(add_duration("brutale, non", "3 jours"), "brutale depuis 3 jours, non");
        assert_eq!(add_duration("", "depuis hier"), "depuis hier");
        assert!(!needs_duration(&questions, &add_duration("brutale, non", "3 jours")));
    }
}
