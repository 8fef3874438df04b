//! Text folding and negation detection for French clinical notes.
//!
//! All keyword tables in this crate are written in folded form (lowercase,
//! no diacritics) and matched against [`normalize`]d input.

use once_cell::sync::Lazy;
use regex::Regex;
use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

/// Lookback, in characters, inspected for a negation cue before a finding.
pub const NEGATION_WINDOW: usize = 30;

static NEGATION_CUE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\b(pas|sans|aucune?|ni|non|absence|jamais|ne)\b").unwrap());

// Segment of the form "<question> ?: <answer>" as appended by the dialogue.
static QUESTION_ANSWER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?s)^(?P<q>.*)\?\s*:\s*(?P<a>.*)$").unwrap());
static YES_NO: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(oui|o|yes|y|non|n|no)\b").unwrap());

/// NFKD-decompose, drop combining marks, lowercase, and unify apostrophes and hyphens.
pub fn normalize(text: &str) -> String {
    text.nfkd()
        .filter(|c| !is_combining_mark(*c))
        .map(|c| match c {
            '\u{2019}' | '\u{2018}' | '`' => '\'',
            '\u{2010}' | '\u{2011}' | '\u{2012}' | '\u{2013}' => '-',
            _ => c,
        })
        .collect::<String>()
        .to_lowercase()
}

pub fn contains_any(folded: &str, needles: &[&str]) -> bool {
    needles.iter().any(|n| folded.contains(n))
}

/// Whether the match starting at byte `start` in `folded` is negated.
///
/// The lookback stops at the previous clause separator so "pas de fièvre,
/// céphalée brutale" keeps the headache positive.
pub fn is_negated_at(folded: &str, start: usize) -> bool {
    let before = &folded[..start];
    let clause = before
        .rfind([',', ';', '.', '|', '\n'])
        .map(|i| &before[i + 1..])
        .unwrap_or(before);
    let window: String = {
        let chars: Vec<char> = clause.chars().collect();
        let from = chars.len().saturating_sub(NEGATION_WINDOW);
        chars[from..].iter().collect()
    };
    NEGATION_CUE.is_match(&window)
}

/// Split on separators that start a new statement: a newline, or a
/// `,` `;` `|` followed by an uppercase letter. Appended answers always
/// start with a capitalised question, free-text clauses usually do not.
pub fn segments(text: &str) -> Vec<&str> {
    let mut out = Vec::new();
    let mut start = 0;
    for (i, c) in text.char_indices() {
        let boundary = match c {
            '\n' => true,
            ',' | ';' | '|' => text[i + 1..]
                .trim_start()
                .chars()
                .next()
                .is_some_and(char::is_uppercase),
            _ => false,
        };
        if boundary {
            out.push(&text[start..i]);
            start = i + c.len_utf8();
        }
    }
    out.push(&text[start..]);
    out.into_iter()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .collect()
}

fn yes_no(answer: &str) -> Option<bool> {
    let caps = YES_NO.captures(answer.trim())?;
    Some(matches!(&caps[1], "oui" | "o" | "yes" | "y"))
}

// Affirmed / negated mentions of `pattern` in free text.
fn clause_polarity(folded: &str, pattern: &Regex) -> Option<bool> {
    let mut seen = false;
    for m in pattern.find_iter(folded) {
        seen = true;
        if !is_negated_at(folded, m.start()) {
            return Some(true);
        }
    }
    seen.then_some(false)
}

fn segment_polarity(folded: &str, pattern: &Regex) -> Option<bool> {
    let Some(caps) = QUESTION_ANSWER.captures(folded) else {
        return clause_polarity(folded, pattern);
    };
    let (question, answer) = (&caps["q"], &caps["a"]);
    if pattern.is_match(question) {
        if let Some(yes) = yes_no(answer) {
            return Some(yes);
        }
    }
    clause_polarity(answer, pattern)
}

/// Polarity of `pattern` (written in folded form) over `text`.
///
/// `Some(true)` when at least one mention is affirmed, `Some(false)` when
/// every mention is negated or answered "non", `None` when never mentioned.
/// A mention inside an answered question takes the answer's polarity.
pub fn polarity(text: &str, pattern: &Regex) -> Option<bool> {
    let mut seen = false;
    for segment in segments(text) {
        match segment_polarity(&normalize(segment), pattern) {
            Some(true) => return Some(true),
            Some(false) => seen = true,
            None => {}
        }
    }
    seen.then_some(false)
}

/// Plain-phrase convenience over [`is_negated_at`]: negated when every
/// occurrence of `phrase` is preceded by a cue.
pub fn is_negated(text: &str, phrase: &str) -> bool {
    let folded = normalize(text);
    let phrase = normalize(phrase);
    let mut starts = folded.match_indices(&phrase).map(|(i, _)| i).peekable();
    if starts.peek().is_none() {
        return false;
    }
    starts.all(|i| is_negated_at(&folded, i))
}

/// The phrase occurs and at least one occurrence is not negated.
pub fn is_present(text: &str, phrase: &str) -> bool {
    let folded = normalize(text);
    let phrase = normalize(phrase);
    folded
        .match_indices(&phrase)
        .any(|(i, _)| !is_negated_at(&folded, i))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fold_strips_accents() {
        assert_eq!(normalize("Céphalée BRUTALE, fièvre"), "cephalee brutale, fievre");
        assert_eq!(normalize("l’enfant"), "l'enfant");
    }

    #[test]
    fn test_negation_in_same_clause() {
        assert!(is_negated("Patient sans fièvre", "fièvre"));
        assert!(is_negated("pas de déficit moteur", "déficit"));
        assert!(!is_negated("fièvre à 39", "fièvre"));
    }

    #[test]
    fn test_negation_stops_at_clause() {
        let note = "pas de fièvre, céphalée brutale";
        assert!(is_present(note, "brutale"));
        assert!(!is_present(note, "fièvre"));
    }

    #[test]
    fn test_absent_phrase_is_neither() {
        assert!(!is_negated("céphalée", "fièvre"));
        assert!(!is_present("céphalée", "fièvre"));
    }

    #[test]
    fn test_polarity_with_answered_question() {
        let re = Regex::new(r"\bfievre\b").unwrap();
        assert_eq!(polarity("céphalée, Fièvre ?: non", &re), Some(false));
        assert_eq!(polarity("céphalée, Fièvre ?: oui", &re), Some(true));
        assert_eq!(polarity("céphalée", &re), None);
    }

    #[test]
    fn test_question_wording_is_not_a_finding() {
        let re = Regex::new(r"\bfievre\b").unwrap();
        let case = "céphalée, Y a-t-il fièvre, vomissements ou déficit ?: non";
        assert_eq!(polarity(case, &re), Some(false));

        let case = "céphalée, Y a-t-il fièvre, vomissements ou déficit ?: vomissements";
        assert_eq!(polarity(case, &re), None);

        let case = "céphalée fébrile à 39, Antécédent de cancer ?: non";
        let febrile = Regex::new(r"\bfebrile\b").unwrap();
        assert_eq!(polarity(case, &febrile), Some(true));
    }

    #[test]
    fn test_segments() {
        assert_eq!(
            segments("pas de fièvre, céphalée, Fièvre ?: non; Grossesse ?: oui"),
            vec!["pas de fièvre, céphalée", "Fièvre ?: non", "Grossesse ?: oui"]
        );
    }
}
