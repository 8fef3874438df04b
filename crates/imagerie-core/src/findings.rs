//! Structured facts extracted from a free-text clinical vignette.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;

use crate::text::{normalize, polarity};

pub const MAX_AGE: u32 = 120;
pub const MAX_PREGNANCY_WEEKS: u32 = 45;

/// Age from which pregnancy is no longer asked about.
const PREGNANCY_QUESTION_AGE_LIMIT: u32 = 50;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Sex {
    Female,
    Male,
}

/// Binary clinical signs tracked for headache triage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Sign {
    Fever,
    SuddenOnset,
    NeuroDeficit,
    Oncologic,
    Pregnancy,
    RecentSurgery,
    Pacemaker,
    Claustrophobia,
    Vertigo,
}

impl Sign {
    /// Signs that must be known before the decision tree can conclude.
    pub const REQUIRED: [Sign; 7] = [
        Sign::Fever,
        Sign::SuddenOnset,
        Sign::NeuroDeficit,
        Sign::Oncologic,
        Sign::Pregnancy,
        Sign::RecentSurgery,
        Sign::Pacemaker,
    ];

    /// Yes/no question whose wording contains the sign's own trigger word,
    /// so "<question>: oui" re-extracts to the same sign.
    pub fn question(self) -> &'static str {
        match self {
            Sign::Fever => "Fièvre ?",
            Sign::SuddenOnset => "Installation brutale (en coup de tonnerre) ?",
            Sign::NeuroDeficit => "Déficit neurologique (moteur ou sensitif) ?",
            Sign::Oncologic => "Antécédent de cancer ?",
            Sign::Pregnancy => "Grossesse en cours ?",
            Sign::RecentSurgery => "Chirurgie récente (moins de 6 semaines) ?",
            Sign::Pacemaker => "Porteur d'un pacemaker ?",
            Sign::Claustrophobia => "Claustrophobie ?",
            Sign::Vertigo => "Vertiges ?",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Sign::Fever => "fièvre",
            Sign::SuddenOnset => "début brutal",
            Sign::NeuroDeficit => "déficit neurologique",
            Sign::Oncologic => "contexte oncologique",
            Sign::Pregnancy => "grossesse",
            Sign::RecentSurgery => "chirurgie récente",
            Sign::Pacemaker => "pacemaker",
            Sign::Claustrophobia => "claustrophobie",
            Sign::Vertigo => "vertiges",
        }
    }

    fn pattern(self) -> &'static Regex {
        match self {
            Sign::Fever => &FEVER,
            Sign::SuddenOnset => &SUDDEN,
            Sign::NeuroDeficit => &DEFICIT,
            Sign::Oncologic => &ONCOLOGIC,
            Sign::Pregnancy => &PREGNANCY,
            Sign::RecentSurgery => &SURGERY,
            Sign::Pacemaker => &PACEMAKER,
            Sign::Claustrophobia => &CLAUSTRO,
            Sign::Vertigo => &VERTIGO,
        }
    }
}

/// A missing piece of information the triage still needs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Missing {
    Sign(Sign),
    PregnancyTerm,
}

impl Missing {
    pub fn question(self) -> &'static str {
        match self {
            Missing::Sign(sign) => sign.question(),
            Missing::PregnancyTerm => "Terme de la grossesse (en semaines) ?",
        }
    }
}

fn re(pattern: &str) -> Regex {
    Regex::new(pattern).unwrap()
}

static FEVER: Lazy<Regex> = Lazy::new(|| re(r"\b(fievre|febrile|fievreux|fievreuse|hyperthermie)\b"));
static SUDDEN: Lazy<Regex> =
    Lazy::new(|| re(r"\b(brutal\w*|coup de tonnerre|soudain\w*|foudroyant\w*)"));
static DEFICIT: Lazy<Regex> = Lazy::new(|| {
    re(r"\b(deficit\w*|paralys\w*|pares\w*|hemipleg\w*|hemipares\w*|aphasi\w*|troubles? (moteurs?|sensitifs?))")
});
static ONCOLOGIC: Lazy<Regex> =
    Lazy::new(|| re(r"\b(cancer\w*|oncolog\w*|tumeur\w*|metasta\w*|neoplas\w*|neoplasi\w*)"));
static PREGNANCY: Lazy<Regex> = Lazy::new(|| re(r"\b(enceinte|grossesse|gestation)\b"));
static SURGERY: Lazy<Regex> = Lazy::new(|| {
    re(r"\b(chirurg\w*|opere\w*|operation|post-?op\w*|prothese\w*|osteosynthese|materiel)")
});
static PACEMAKER: Lazy<Regex> = Lazy::new(|| re(r"\b(pace-?\s?maker|pacemaker|stimulateur cardiaque)\b"));
static CLAUSTRO: Lazy<Regex> = Lazy::new(|| re(r"\bclaustro\w*"));
static VERTIGO: Lazy<Regex> = Lazy::new(|| re(r"\bvertig\w*"));

static AGE_SUBJECT: Lazy<Regex> = Lazy::new(|| {
    re(r"\b(?:patiente?|homme|femme|enfant|garcon|fille|agee?|madame|monsieur)\D{0,12}?(\d{1,3})\s*ans\b")
});
static AGE_ANY: Lazy<Regex> = Lazy::new(|| re(r"\b(\d{1,3})\s*ans\b"));
static AGE_ANSWER: Lazy<Regex> = Lazy::new(|| re(r"\bage\b[^,;|]*\?\s*:\s*(\d{1,3})\b"));
static DURATION_CUE: Lazy<Regex> = Lazy::new(|| re(r"(depuis|il y a|pendant|durant)\s*$"));

static FEMALE: Lazy<Regex> = Lazy::new(|| re(r"\b(patiente|femme|madame|mme|fille|enceinte)\b"));
static MALE: Lazy<Regex> = Lazy::new(|| re(r"\b(patient|homme|monsieur|garcon)\b"));

static PREGNANCY_WEEKS: Lazy<Regex> = Lazy::new(|| {
    re(r"\b(?:enceinte|grossesse)[^,;|.]*?(\d{1,2})\s*(?:sa|sem|semaines?)\b")
});
static PREGNANCY_MONTHS: Lazy<Regex> =
    Lazy::new(|| re(r"\b(?:enceinte|grossesse)[^,;|.]*?(\d{1,2})\s*mois\b"));
static WEEKS_ANSWER: Lazy<Regex> =
    Lazy::new(|| re(r"\bgrossesse[^,;|]*\?\s*:\s*(\d{1,2})\b"));

/// Findings for one vignette. `None` signs were never mentioned; `Some(false)`
/// signs were explicitly denied.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ClinicalFindings {
    pub age: Option<u32>,
    pub sex: Option<Sex>,
    pub pregnancy_weeks: Option<u32>,
    pub fever: Option<bool>,
    pub sudden_onset: Option<bool>,
    pub neuro_deficit: Option<bool>,
    pub oncologic: Option<bool>,
    pub pregnancy: Option<bool>,
    pub recent_surgery: Option<bool>,
    pub pacemaker: Option<bool>,
    pub claustrophobia: Option<bool>,
    pub vertigo: Option<bool>,
}

impl ClinicalFindings {
    pub fn extract(vignette: &str) -> Self {
        let folded = normalize(vignette);

        let mut findings = ClinicalFindings {
            age: extract_age(&folded),
            sex: extract_sex(&folded),
            ..Default::default()
        };
        for sign in [
            Sign::Fever,
            Sign::SuddenOnset,
            Sign::NeuroDeficit,
            Sign::Oncologic,
            Sign::Pregnancy,
            Sign::RecentSurgery,
            Sign::Pacemaker,
            Sign::Claustrophobia,
            Sign::Vertigo,
        ] {
            findings.set(sign, polarity(vignette, sign.pattern()));
        }
        if findings.pregnancy == Some(true) {
            findings.pregnancy_weeks = extract_pregnancy_weeks(&folded);
            if findings.sex.is_none() {
                findings.sex = Some(Sex::Female);
            }
        }
        findings
    }

    pub fn get(&self, sign: Sign) -> Option<bool> {
        match sign {
            Sign::Fever => self.fever,
            Sign::SuddenOnset => self.sudden_onset,
            Sign::NeuroDeficit => self.neuro_deficit,
            Sign::Oncologic => self.oncologic,
            Sign::Pregnancy => self.pregnancy,
            Sign::RecentSurgery => self.recent_surgery,
            Sign::Pacemaker => self.pacemaker,
            Sign::Claustrophobia => self.claustrophobia,
            Sign::Vertigo => self.vertigo,
        }
    }

    pub fn set(&mut self, sign: Sign, value: Option<bool>) {
        let slot = match sign {
            Sign::Fever => &mut self.fever,
            Sign::SuddenOnset => &mut self.sudden_onset,
            Sign::NeuroDeficit => &mut self.neuro_deficit,
            Sign::Oncologic => &mut self.oncologic,
            Sign::Pregnancy => &mut self.pregnancy,
            Sign::RecentSurgery => &mut self.recent_surgery,
            Sign::Pacemaker => &mut self.pacemaker,
            Sign::Claustrophobia => &mut self.claustrophobia,
            Sign::Vertigo => &mut self.vertigo,
        };
        *slot = value;
    }

    /// True only when the sign was affirmed.
    pub fn has(&self, sign: Sign) -> bool {
        self.get(sign) == Some(true)
    }

    /// Red flags that call for urgent imaging.
    pub fn red_flags(&self) -> bool {
        self.has(Sign::Fever)
            || self.has(Sign::SuddenOnset)
            || self.has(Sign::NeuroDeficit)
            || self.has(Sign::Vertigo)
    }

    fn pregnancy_relevant(&self) -> bool {
        self.sex != Some(Sex::Male)
            && self.age.map_or(true, |age| age < PREGNANCY_QUESTION_AGE_LIMIT)
    }

    /// Required information still unknown, in asking order.
    pub fn missing(&self) -> Vec<Missing> {
        let mut missing: Vec<Missing> = Sign::REQUIRED
            .iter()
            .copied()
            .filter(|&sign| sign != Sign::Pregnancy || self.pregnancy_relevant())
            .filter(|&sign| self.get(sign).is_none())
            .map(Missing::Sign)
            .collect();
        if self.pregnancy == Some(true) && self.pregnancy_weeks.is_none() {
            missing.push(Missing::PregnancyTerm);
        }
        missing
    }

    pub fn is_complete(&self) -> bool {
        self.missing().is_empty()
    }

    /// Human-readable list of affirmed signs.
    pub fn positive_labels(&self) -> Vec<&'static str> {
        [
            Sign::Fever,
            Sign::SuddenOnset,
            Sign::NeuroDeficit,
            Sign::Oncologic,
            Sign::Pregnancy,
            Sign::RecentSurgery,
            Sign::Pacemaker,
            Sign::Claustrophobia,
            Sign::Vertigo,
        ]
        .into_iter()
        .filter(|&s| self.has(s))
        .map(Sign::label)
        .collect()
    }
}

fn bounded(value: &str, max: u32) -> Option<u32> {
    value.parse::<u32>().ok().filter(|v| *v <= max)
}

fn extract_age(folded: &str) -> Option<u32> {
    if let Some(age) = AGE_SUBJECT
        .captures_iter(folded)
        .find_map(|c| bounded(&c[1], MAX_AGE))
    {
        return Some(age);
    }
    if let Some(age) = AGE_ANSWER
        .captures_iter(folded)
        .find_map(|c| bounded(&c[1], MAX_AGE))
    {
        return Some(age);
    }
    AGE_ANY.captures_iter(folded).find_map(|c| {
        let start = c.get(0)?.start();
        if DURATION_CUE.is_match(&folded[..start]) {
            return None;
        }
        bounded(&c[1], MAX_AGE)
    })
}

fn extract_sex(folded: &str) -> Option<Sex> {
    if FEMALE.is_match(folded) {
        Some(Sex::Female)
    } else if MALE.is_match(folded) {
        Some(Sex::Male)
    } else {
        None
    }
}

fn extract_pregnancy_weeks(folded: &str) -> Option<u32> {
    if let Some(c) = PREGNANCY_WEEKS.captures(folded) {
        return bounded(&c[1], MAX_PREGNANCY_WEEKS);
    }
    if let Some(c) = PREGNANCY_MONTHS.captures(folded) {
        let months: u32 = c[1].parse().ok()?;
        return Some(months * 4).filter(|w| *w <= MAX_PREGNANCY_WEEKS);
    }
    WEEKS_ANSWER
        .captures(folded)
        .and_then(|c| bounded(&c[1], MAX_PREGNANCY_WEEKS))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_basic_extraction() {
        let f = ClinicalFindings::extract(
            "Patiente de 34 ans, enceinte de 10 SA, céphalée brutale en coup de tonnerre",
        );
        assert_eq!(f.age, Some(34));
        assert_eq!(f.sex, Some(Sex::Female));
        assert_eq!(f.pregnancy, Some(true));
        assert_eq!(f.pregnancy_weeks, Some(10));
        assert_eq!(f.sudden_onset, Some(true));
        assert_eq!(f.fever, None);
    }

    #[test]
    fn test_negated_signs_are_false() {
        let f = ClinicalFindings::extract("Homme de 60 ans, céphalées, pas de fièvre, sans déficit");
        assert_eq!(f.sex, Some(Sex::Male));
        assert_eq!(f.fever, Some(false));
        assert_eq!(f.neuro_deficit, Some(false));
        assert!(!f.red_flags());
    }

    #[test]
    fn test_duration_is_not_age() {
        let f = ClinicalFindings::extract("céphalées depuis 3 ans, femme de 42 ans");
        assert_eq!(f.age, Some(42));
        let f = ClinicalFindings::extract("migraine depuis 3 ans");
        assert_eq!(f.age, None);
    }

    #[test]
    fn test_out_of_range_age_ignored() {
        let f = ClinicalFindings::extract("patient de 150 ans");
        assert_eq!(f.age, None);
    }

    #[test]
    fn test_pregnancy_months_convert_to_weeks() {
        let f = ClinicalFindings::extract("femme enceinte de 3 mois");
        assert_eq!(f.pregnancy_weeks, Some(12));
    }

    #[test]
    fn test_missing_skips_pregnancy_for_men_and_older_patients() {
        let f = ClinicalFindings::extract("homme de 30 ans, céphalées");
        assert!(!f.missing().contains(&Missing::Sign(Sign::Pregnancy)));

        let f = ClinicalFindings::extract("femme de 70 ans, céphalées");
        assert!(!f.missing().contains(&Missing::Sign(Sign::Pregnancy)));

        let f = ClinicalFindings::extract("femme de 30 ans, céphalées");
        assert!(f.missing().contains(&Missing::Sign(Sign::Pregnancy)));
        assert_eq!(f.missing()[0], Missing::Sign(Sign::Fever));
    }

    #[test]
    fn test_answered_questions_fill_findings() {
        let mut case = String::from("femme de 30 ans, céphalées");
        for sign in Sign::REQUIRED {
            let answer = if sign == Sign::Pregnancy { "oui" } else { "non" };
            case.push_str(&format!(", {}: {}", sign.question(), answer));
        }
        case.push_str(&format!(", {}: 20", Missing::PregnancyTerm.question()));

        let f = ClinicalFindings::extract(&case);
        assert_eq!(f.pregnancy, Some(true));
        assert_eq!(f.pregnancy_weeks, Some(20));
        assert_eq!(f.fever, Some(false));
        assert_eq!(f.pacemaker, Some(false));
        assert!(f.is_complete(), "still missing {:?}", f.missing());
    }

    #[test]
    fn test_age_from_answer() {
        let f = ClinicalFindings::extract("céphalées, Quel âge a le patient ?: 45");
        assert_eq!(f.age, Some(45));
    }
}
