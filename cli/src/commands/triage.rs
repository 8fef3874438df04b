use anyhow::Result;
use chrono::Local;
use console::Style;
use imagerie_config::Config;
use imagerie_core::decision::{contraindication_notes, decide, Term};
use imagerie_core::findings::{ClinicalFindings, Missing, MAX_AGE, MAX_PREGNANCY_WEEKS};
use imagerie_core::prescription::{save, save_as, Prescription, Report, REPORT_PREFIX};
use imagerie_core::text::normalize;

use super::ui;

fn parse_yes_no(answer: &str) -> Option<bool> {
    match normalize(answer.trim()).as_str() {
        "o" | "oui" | "y" | "yes" => Some(true),
        "n" | "non" | "no" => Some(false),
        _ => None,
    }
}

/// `None` when input ends.
fn ask_yes_no(question: &str) -> Result<Option<bool>> {
    loop {
        let Some(answer) = ui::read_line(&format!("{} (o/n) ", question))? else {
            return Ok(None);
        };
        match parse_yes_no(&answer) {
            Some(value) => return Ok(Some(value)),
            None => println!("Répondez par 'o' ou 'n'."),
        }
    }
}

/// Empty input leaves the value unknown.
fn ask_number(question: &str, max: u32) -> Result<Option<u32>> {
    loop {
        let Some(answer) = ui::read_line(&format!("{} ", question))? else {
            return Ok(None);
        };
        if answer.is_empty() {
            return Ok(None);
        }
        match answer.parse::<u32>() {
            Ok(n) if n <= max => return Ok(Some(n)),
            _ => println!("Entrez un nombre entre 0 et {}, ou laissez vide.", max),
        }
    }
}

/// Falls back to range questions when the exact term is not known.
fn ask_pregnancy_weeks() -> Result<Option<u32>> {
    let weeks = ask_number(
        "Terme de la grossesse en semaines (vide si inconnu) ?",
        MAX_PREGNANCY_WEEKS,
    )?;
    if weeks.is_some() {
        return Ok(weeks);
    }
    let term = match ask_yes_no("Moins de 4 semaines ?")? {
        None => return Ok(None),
        Some(true) => Term::Early,
        Some(false) => match ask_yes_no("Entre 4 et 12 semaines ?")? {
            None => return Ok(None),
            Some(true) => Term::FirstTrimester,
            Some(false) => Term::Later,
        },
    };
    Ok(term.representative_weeks())
}

pub fn handle_triage(config: &Config, vignette: &str) -> Result<()> {
    let vignette = if vignette.trim().is_empty() {
        match ui::read_line("Texte clinique> ")? {
            Some(text) if !text.is_empty() => text,
            _ => return Ok(()),
        }
    } else {
        vignette.trim().to_string()
    };

    let mut findings = ClinicalFindings::extract(&vignette);
    if findings.age.is_none() {
        findings.age = ask_number("Âge du patient (vide si inconnu) ?", MAX_AGE)?;
    }

    let mut term_asked = false;
    loop {
        let next = findings
            .missing()
            .into_iter()
            .find(|m| !(term_asked && *m == Missing::PregnancyTerm));
        let Some(item) = next else {
            break;
        };
        match item {
            Missing::Sign(sign) => {
                let Some(value) = ask_yes_no(sign.question())? else {
                    return Ok(());
                };
                findings.set(sign, Some(value));
            }
            Missing::PregnancyTerm => {
                term_asked = true;
                findings.pregnancy_weeks = ask_pregnancy_weeks()?;
            }
        }
    }

    let decision = decide(&findings);
    let notes = contraindication_notes(&findings);
    ui::print_panel(
        &format!("{} ({})", decision.exam, decision.urgency.label()),
        &decision.text,
        Style::new().green(),
    );
    println!("{}", imagerie_core::decision::render_notes(&notes));

    if ask_yes_no("Enregistrer l'ordonnance ?")? != Some(true) {
        return Ok(());
    }
    let filename = ui::read_line("Nom du fichier (vide pour un nom horodaté) : ")?;
    let now = Local::now().naive_local();
    let prescription = Prescription::render(&findings, &vignette, &decision, &notes, now);
    let path = save(&prescription, &config.core.output_dir, filename.as_deref())?;
    ui::print_success(&format!("ordonnance enregistrée : {}", path.display()));

    let report = Report::render(&findings, &vignette, &decision, &notes, now);
    let path = save_as(&report, &config.core.output_dir, None, REPORT_PREFIX)?;
    ui::print_success(&format!("rapport enregistré : {}", path.display()));
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_yes_no() {
        assert_eq!(parse_yes_no(" OUI "), Some(true));
        assert_eq!(parse_yes_no("n"), Some(false));
        assert_eq!(parse_yes_no("peut-être"), None);
    }
}
