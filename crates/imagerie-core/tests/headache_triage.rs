use imagerie_core::decision::{contraindication_notes, decide, Exam, Urgency};
use imagerie_core::findings::Missing;
use imagerie_core::prescription::Prescription;
use imagerie_core::{ClinicalFindings, Sign};

use chrono::NaiveDate;

/// Answer every missing question the way a clinician would at the prompt.
fn answer_all(case: &mut String, answers: &[(Sign, bool)], weeks: Option<u32>) {
    loop {
        let findings = ClinicalFindings::extract(case);
        let Some(next) = findings.missing().first().copied() else {
            break;
        };
        let answer = match next {
            Missing::Sign(sign) => {
                let yes = answers
                    .iter()
                    .find(|(s, _)| *s == sign)
                    .map(|(_, v)| *v)
                    .unwrap_or(false);
                if yes { "oui" } else { "non" }.to_string()
            }
            Missing::PregnancyTerm => weeks.expect("weeks needed").to_string(),
        };
        case.push_str(&format!(", {}: {}", next.question(), answer));
    }
}

#[test]
fn test_question_loop_reaches_decision() {
    let mut case = String::from("Patiente de 32 ans, céphalées depuis ce matin");
    answer_all(&mut case, &[(Sign::Pregnancy, true)], Some(9));

    let findings = ClinicalFindings::extract(&case);
    assert!(findings.is_complete());
    assert_eq!(findings.pregnancy_weeks, Some(9));

    let decision = decide(&findings);
    assert_eq!(decision.exam, Exam::Deferred);
    assert_eq!(decision.urgency, Urgency::Deferred);

    let now = NaiveDate::from_ymd_opt(2025, 1, 2)
        .unwrap()
        .and_hms_opt(9, 30, 0)
        .unwrap();
    let text = Prescription::render(
        &findings,
        &case,
        &decision,
        &contraindication_notes(&findings),
        now,
    );
    assert!(text.contains("IMAGERIE DIFFÉRÉE RECOMMANDÉE"));
    assert!(text.contains("Grossesse confirmée (9 SA)"));
    assert!(!text.contains("β-hCG"));
}

#[test]
fn test_red_flag_answer_escalates() {
    let mut case = String::from("Homme de 58 ans, céphalées inhabituelles");
    answer_all(&mut case, &[(Sign::NeuroDeficit, true)], None);

    let findings = ClinicalFindings::extract(&case);
    assert_eq!(findings.neuro_deficit, Some(true));
    assert_eq!(findings.pregnancy, None);

    let decision = decide(&findings);
    assert_eq!(decision.exam, Exam::CtWithoutContrast);
    assert_eq!(decision.urgency, Urgency::Immediate);
    assert!(decision.text.contains("déficit neurologique"));
}
