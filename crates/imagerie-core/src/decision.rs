//! Deterministic imaging decision for headache presentations.
//!
//! Branches are evaluated in priority order: red flags, oncologic history,
//! pregnancy, recent surgery, pacemaker, then the first-line default.

use std::fmt;

use serde::Serialize;

use crate::findings::{ClinicalFindings, Sex, Sign};

/// Below this term any irradiating exam is contraindicated.
pub const EARLY_PREGNANCY_WEEKS: u32 = 4;
/// End of the first trimester.
pub const FIRST_TRIMESTER_WEEKS: u32 = 12;

const PREGNANCY_TEST_AGE_LIMIT: u32 = 50;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Exam {
    CtWithoutContrast,
    CtWithContrast,
    MriWithoutContrast,
    DeviceCheck,
    Deferred,
    NoImaging,
}

impl Exam {
    pub fn label(self) -> &'static str {
        match self {
            Exam::CtWithoutContrast => "Scanner cérébral sans injection",
            Exam::CtWithContrast => "Scanner cérébral avec injection",
            Exam::MriWithoutContrast => "IRM cérébrale sans injection",
            Exam::DeviceCheck => "Vérification de la compatibilité IRM du dispositif",
            Exam::Deferred => "Imagerie différée",
            Exam::NoImaging => "Aucune imagerie",
        }
    }
}

impl fmt::Display for Exam {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Urgency {
    Immediate,
    Routine,
    Deferred,
}

impl Urgency {
    pub fn label(self) -> &'static str {
        match self {
            Urgency::Immediate => "urgent",
            Urgency::Routine => "programmé",
            Urgency::Deferred => "différé",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Decision {
    pub exam: Exam,
    pub urgency: Urgency,
    pub text: String,
}

impl Decision {
    fn new(exam: Exam, urgency: Urgency, text: impl Into<String>) -> Self {
        Self {
            exam,
            urgency,
            text: text.into(),
        }
    }
}

/// Pregnancy term bucket used by several branches.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Term {
    Early,
    FirstTrimester,
    Later,
    Unknown,
}

impl Term {
    /// A term in weeks that falls inside the bucket, for when the clinician
    /// only knows the range.
    pub fn representative_weeks(self) -> Option<u32> {
        match self {
            Term::Early => Some(3),
            Term::FirstTrimester => Some(8),
            Term::Later => Some(16),
            Term::Unknown => None,
        }
    }
}

pub fn pregnancy_term(findings: &ClinicalFindings) -> Option<Term> {
    if !findings.has(Sign::Pregnancy) {
        return None;
    }
    Some(match findings.pregnancy_weeks {
        Some(w) if w < EARLY_PREGNANCY_WEEKS => Term::Early,
        Some(w) if w < FIRST_TRIMESTER_WEEKS => Term::FirstTrimester,
        Some(_) => Term::Later,
        None => Term::Unknown,
    })
}

fn red_flag_headline(findings: &ClinicalFindings) -> String {
    let mut adjectives = Vec::new();
    if findings.has(Sign::Fever) {
        adjectives.push("fébrile");
    }
    if findings.has(Sign::SuddenOnset) {
        adjectives.push("brutale");
    }
    let mut headline = if adjectives.is_empty() {
        "céphalée".to_string()
    } else {
        format!("céphalée {}", adjectives.join(" et "))
    };

    let mut extras = Vec::new();
    if findings.has(Sign::NeuroDeficit) {
        extras.push("déficit neurologique");
    }
    if findings.has(Sign::Vertigo) {
        extras.push("vertige");
    }
    if !extras.is_empty() {
        headline = format!("{} ({})", headline, extras.join(", "));
    }
    headline
}

pub fn decide(findings: &ClinicalFindings) -> Decision {
    if findings.red_flags() {
        let mut text = format!(
            "La personne présente une {} évoquant une situation d'urgence. \
             Il est recommandé de l'adresser sans délai aux urgences pour la réalisation \
             d'un scanner cérébral sans injection. ",
            red_flag_headline(findings)
        );
        let exam = match pregnancy_term(findings) {
            Some(Term::Early) => {
                text.push_str(
                    "Toutefois, la grossesse étant inférieure à 4 semaines, le scanner est \
                     contre-indiqué. Il convient d'en discuter avec le service de radiologie \
                     pour une prise en charge adaptée.",
                );
                Exam::NoImaging
            }
            Some(Term::FirstTrimester) => {
                text.push_str(
                    "La grossesse étant inférieure à 3 mois, le scanner ne doit être envisagé \
                     qu'en cas d'urgence vitale, en concertation avec la radiologie.",
                );
                Exam::CtWithoutContrast
            }
            Some(Term::Later) => {
                text.push_str(
                    "La grossesse étant supérieure à 12 semaines, le scanner peut être réalisé \
                     sous les précautions habituelles.",
                );
                Exam::CtWithoutContrast
            }
            Some(Term::Unknown) => {
                text.push_str(
                    "Le terme de la grossesse n'étant pas précisé, l'indication est à discuter \
                     avec le service de radiologie.",
                );
                Exam::CtWithoutContrast
            }
            None => Exam::CtWithoutContrast,
        };
        return Decision::new(exam, Urgency::Immediate, text.trim_end());
    }

    if findings.has(Sign::Oncologic) {
        return Decision::new(
            Exam::CtWithContrast,
            Urgency::Routine,
            "Dans le cadre d'un contexte oncologique, la réalisation d'un scanner cérébral \
             avec injection est indiquée en première intention.",
        );
    }

    match pregnancy_term(findings) {
        Some(Term::Early) => {
            return Decision::new(
                Exam::NoImaging,
                Urgency::Deferred,
                "Le scanner est contre-indiqué en raison d'une grossesse débutante (moins de \
                 4 semaines). Il convient de différer l'examen ou de privilégier une approche \
                 alternative.",
            )
        }
        Some(Term::FirstTrimester) => {
            return Decision::new(
                Exam::Deferred,
                Urgency::Deferred,
                "L'IRM est contre-indiquée avant 3 mois de grossesse. Un scanner pourra être \
                 envisagé uniquement en cas d'urgence vitale, après avis spécialisé.",
            )
        }
        Some(Term::Later) => {
            return Decision::new(
                Exam::MriWithoutContrast,
                Urgency::Routine,
                "La grossesse étant supérieure à 3 mois, les examens d'imagerie peuvent être \
                 réalisés selon l'indication clinique. Une IRM cérébrale sans injection est \
                 recommandée.",
            )
        }
        Some(Term::Unknown) => {
            return Decision::new(
                Exam::Deferred,
                Urgency::Deferred,
                "Le terme de la grossesse doit être précisé avant de choisir l'examen \
                 d'imagerie.",
            )
        }
        None => {}
    }

    if findings.has(Sign::RecentSurgery) {
        return Decision::new(
            Exam::Deferred,
            Urgency::Deferred,
            "Une chirurgie récente avec pose de matériel métallique (<6 semaines) a été \
             signalée. L'IRM est contre-indiquée jusqu'à la 6e semaine postopératoire.",
        );
    }

    if findings.has(Sign::Pacemaker) {
        return Decision::new(
            Exam::DeviceCheck,
            Urgency::Routine,
            "La présence d'un pacemaker impose de vérifier la compatibilité du dispositif \
             avant toute IRM.",
        );
    }

    Decision::new(
        Exam::MriWithoutContrast,
        Urgency::Routine,
        "En l'absence de critère de gravité ou de contre-indication, une IRM cérébrale sans \
         injection est recommandée en première intention. Un scanner pourra être envisagé si \
         l'IRM est contre-indiquée ou non réalisable.",
    )
}

/// Precautions to print under the recommendation, one bullet per line.
pub fn contraindication_notes(findings: &ClinicalFindings) -> Vec<String> {
    let mut notes = Vec::new();

    let childbearing = findings.sex == Some(Sex::Female)
        && findings.age.map_or(true, |a| a < PREGNANCY_TEST_AGE_LIMIT);
    if childbearing {
        match pregnancy_term(findings) {
            Some(Term::Early) => notes.push(
                "Le scanner est strictement contre-indiqué pour une grossesse débutante (<4 semaines)."
                    .to_string(),
            ),
            Some(_) => {
                let term = findings
                    .pregnancy_weeks
                    .map(|w| format!("{} SA", w))
                    .unwrap_or_else(|| "terme non précisé".to_string());
                notes.push(format!(
                    "Grossesse confirmée ({}) : précautions d'irradiation à respecter.",
                    term
                ));
            }
            None => notes.push(
                "Chez les femmes de moins de 50 ans, un test de grossesse est recommandé avant \
                 tout examen radiologique."
                    .to_string(),
            ),
        }
    }

    notes.push(
        "Chez les patients de plus de 60 ans ou ayant des antécédents rénaux, un dosage de la \
         créatinine est nécessaire avant injection de produit de contraste."
            .to_string(),
    );
    notes.push(
        "En cas d'allergie, signaler toute réaction préalable, mais les allergies aux crustacés \
         ou à la Bétadine ne constituent pas une contre-indication au scanner iodé."
            .to_string(),
    );
    notes
}

pub fn render_notes(notes: &[String]) -> String {
    let mut out = String::from("Remarques complémentaires :");
    for note in notes {
        out.push_str("\n• ");
        out.push_str(note);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn findings(text: &str) -> ClinicalFindings {
        ClinicalFindings::extract(text)
    }

    #[test]
    fn test_red_flags_give_urgent_ct() {
        let d = decide(&findings("homme de 50 ans, céphalée brutale et fébrile"));
        assert_eq!(d.exam, Exam::CtWithoutContrast);
        assert_eq!(d.urgency, Urgency::Immediate);
        assert!(d.text.contains("céphalée fébrile et brutale"));
    }

    #[test]
    fn test_vertigo_is_a_red_flag() {
        let d = decide(&findings("homme de 50 ans, céphalée avec vertiges"));
        assert_eq!(d.urgency, Urgency::Immediate);
        assert!(d.text.contains("(vertige)"));
    }

    #[test]
    fn test_representative_weeks_stay_in_bucket() {
        for term in [Term::Early, Term::FirstTrimester, Term::Later] {
            let mut f = findings("patiente enceinte, céphalée");
            f.pregnancy_weeks = term.representative_weeks();
            assert_eq!(pregnancy_term(&f), Some(term));
        }
        assert_eq!(Term::Unknown.representative_weeks(), None);
    }

    #[test]
    fn test_red_flags_in_early_pregnancy() {
        let d = decide(&findings("patiente enceinte de 3 SA, céphalée brutale"));
        assert_eq!(d.exam, Exam::NoImaging);
        assert!(d.text.contains("inférieure à 4 semaines"));
    }

    #[test]
    fn test_oncologic_before_pregnancy() {
        let d = decide(&findings("femme de 40 ans, antécédent de cancer du sein, céphalées"));
        assert_eq!(d.exam, Exam::CtWithContrast);
    }

    #[test]
    fn test_pregnancy_branches() {
        let d = decide(&findings("patiente enceinte de 8 semaines, céphalées"));
        assert_eq!(d.exam, Exam::Deferred);
        let d = decide(&findings("patiente enceinte de 20 SA, céphalées"));
        assert_eq!(d.exam, Exam::MriWithoutContrast);
    }

    #[test]
    fn test_surgery_and_pacemaker() {
        let d = decide(&findings("homme de 45 ans, opéré il y a 2 semaines, céphalées"));
        assert_eq!(d.exam, Exam::Deferred);
        let d = decide(&findings("homme de 70 ans porteur d'un pacemaker, céphalées"));
        assert_eq!(d.exam, Exam::DeviceCheck);
    }

    #[test]
    fn test_default_mri() {
        let d = decide(&findings("homme de 30 ans, céphalées, pas de fièvre"));
        assert_eq!(d.exam, Exam::MriWithoutContrast);
        assert_eq!(d.urgency, Urgency::Routine);
    }

    #[test]
    fn test_notes() {
        let notes = contraindication_notes(&findings("femme de 30 ans"));
        assert!(notes[0].contains("test de grossesse"));
        assert_eq!(notes.len(), 3);

        let notes = contraindication_notes(&findings("homme de 70 ans"));
        assert_eq!(notes.len(), 2);

        let notes = contraindication_notes(&findings("patiente enceinte de 14 SA"));
        assert!(notes[0].contains("14 SA"));
        assert!(render_notes(&notes).starts_with("Remarques complémentaires :\n• "));
    }
}
