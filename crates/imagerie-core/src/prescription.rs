//! Printable prescription and summary report.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::{Local, NaiveDateTime};
use tracing::info;

use crate::decision::{pregnancy_term, render_notes, Decision, Exam, Term};
use crate::findings::{ClinicalFindings, Sex, Sign};

const WIDTH: usize = 80;
const TO_FILL: &str = "[À COMPLÉTER]";

pub const PRESCRIPTION_PREFIX: &str = "ordonnance";
pub const REPORT_PREFIX: &str = "rapport_cephalees";

fn rule(c: char) -> String {
    std::iter::repeat(c).take(WIDTH).collect()
}

fn clinical_lines(findings: &ClinicalFindings) -> Vec<&'static str> {
    let table = [
        (Sign::Fever, "Syndrome fébrile"),
        (Sign::SuddenOnset, "Installation brutale (céphalée en coup de tonnerre)"),
        (Sign::NeuroDeficit, "Déficit moteur ou sensitif"),
        (Sign::Vertigo, "Vertige"),
        (Sign::Oncologic, "Antécédent oncologique"),
        (Sign::RecentSurgery, "Chirurgie récente (<6 semaines) avec matériel"),
        (Sign::Pacemaker, "Porteur de pacemaker"),
        (Sign::Claustrophobia, "Claustrophobie"),
    ];
    table
        .into_iter()
        .filter(|(sign, _)| findings.has(*sign))
        .map(|(_, line)| line)
        .collect()
}

fn sex_label(sex: Sex) -> &'static str {
    match sex {
        Sex::Female => "Féminin",
        Sex::Male => "Masculin",
    }
}

/// Formal prescription (ordonnance) built from the triage result.
pub struct Prescription;

impl Prescription {
    pub fn render(
        findings: &ClinicalFindings,
        vignette: &str,
        decision: &Decision,
        notes: &[String],
        now: NaiveDateTime,
    ) -> String {
        let date = now.format("%d/%m/%Y").to_string();
        let time = now.format("%H:%M").to_string();
        let heavy = rule('=');
        let light = rule('-');
        let mut out: Vec<String> = Vec::new();
        let mut push = |line: &str| out.push(line.to_string());

        push(&heavy);
        push(&format!("{}ORDONNANCE MÉDICALE", " ".repeat(28)));
        push(&heavy);
        push("");
        for line in [
            "Dr. [NOM DU MÉDECIN]",
            "[Spécialité]",
            "[Adresse du cabinet]",
            "[Code postal et ville]",
            "Tél : [Numéro de téléphone]",
            "N° RPPS : [Numéro RPPS]",
        ] {
            push(line);
        }
        push("");
        push(&format!("Date : {}", date));
        push(&format!("Heure : {}", time));
        push("");
        push(&light);
        push("");

        push("PATIENT(E) :");
        push("");
        push(&format!("Nom : {}", TO_FILL));
        push(&format!("Prénom : {}", TO_FILL));
        match findings.age {
            Some(age) => push(&format!("Âge : {} ans", age)),
            None => push(&format!("Âge : {}", TO_FILL)),
        }
        match findings.sex {
            Some(sex) => push(&format!("Sexe : {}", sex_label(sex))),
            None => push(&format!("Sexe : {}", TO_FILL)),
        }
        push(&format!("N° Sécurité Sociale : {}", TO_FILL));
        push("");
        push(&light);
        push("");

        push("MOTIF DE CONSULTATION :");
        push("");
        push(vignette);
        push("");
        push(&light);
        push("");

        push("ÉLÉMENTS CLINIQUES RECUEILLIS :");
        push("");
        if findings.has(Sign::Pregnancy) && findings.sex == Some(Sex::Female) {
            match findings.pregnancy_weeks {
                Some(w) => push(&format!(
                    "• Grossesse en cours : {} semaines d'aménorrhée",
                    w
                )),
                None => push("• Grossesse en cours : durée non précisée"),
            }
        }
        let signs = clinical_lines(findings);
        if signs.is_empty() {
            push("• Pas de signe de gravité identifié");
        }
        for sign in signs {
            push(&format!("• {}", sign));
        }
        push("");
        push(&light);
        push("");

        push("RAISONNEMENT CLINIQUE ET ARBRE DÉCISIONNEL :");
        push("");
        push("Analyse de la situation :");
        for line in reasoning_lines(findings) {
            push(line);
        }
        push("");
        push("Choix de l'examen d'imagerie :");
        push(&decision.text);
        push("");
        push(&light);
        push("");

        push("PRESCRIPTION :");
        push("");
        for line in exam_lines(findings, decision) {
            push(line);
        }
        push("");
        push(&light);
        push("");

        push("CONTRE-INDICATIONS ET PRÉCAUTIONS :");
        push("");
        push(&render_notes(notes));
        push("");

        let biology = biology_lines(findings);
        if !biology.is_empty() {
            push("");
            push("EXAMENS BIOLOGIQUES À PRÉVOIR :");
            push("");
            for line in biology {
                push(line);
            }
            push("");
        }
        push(&light);
        push("");

        push("Date et signature du praticien :");
        push("");
        push(&format!("Fait le {} à {}", date, time));
        push("");
        push("");
        push("Signature et cachet :");
        push("");
        push("");
        push("");
        push(&heavy);
        push("");
        push("Cette ordonnance a été générée avec l'assistance d'un système d'aide à la décision");
        push("clinique. Elle doit être validée par le médecin prescripteur.");
        push("");

        out.join("\n")
    }
}

fn reasoning_lines(findings: &ClinicalFindings) -> Vec<&'static str> {
    let mut lines = Vec::new();
    if findings.red_flags() {
        lines.push("• Présence de critères d'urgence :");
        if findings.has(Sign::Fever) {
            lines.push("  - Céphalée fébrile → risque de méningite ou d'infection du SNC");
        }
        if findings.has(Sign::SuddenOnset) {
            lines.push("  - Installation brutale → risque d'hémorragie méningée");
        }
        if findings.has(Sign::NeuroDeficit) {
            lines.push("  - Déficit neurologique → risque d'AVC ou de lésion focale");
        }
        if findings.has(Sign::Vertigo) {
            lines.push("  - Vertige → exploration neurologique nécessaire");
        }
        lines.push("  → Indication à une imagerie en urgence");
    } else if findings.has(Sign::Oncologic) {
        lines.push("• Contexte oncologique → surveillance des métastases cérébrales");
    } else {
        match pregnancy_term(findings) {
            Some(Term::Early) => {
                lines.push("• Grossesse < 4 semaines → contre-indication absolue au scanner")
            }
            Some(Term::FirstTrimester) => {
                lines.push("• Grossesse < 12 semaines → scanner uniquement si urgence vitale");
                lines.push("• IRM contre-indiquée au 1er trimestre");
            }
            Some(Term::Later) => {
                lines.push("• Grossesse > 12 semaines → imagerie possible avec précautions")
            }
            Some(Term::Unknown) => lines.push("• Grossesse de terme inconnu → terme à préciser"),
            None => {}
        }
    }
    lines
}

fn exam_lines(findings: &ClinicalFindings, decision: &Decision) -> Vec<&'static str> {
    let term = pregnancy_term(findings);
    match (decision.exam, term) {
        (Exam::NoImaging, _) => vec![
            "⚠️  AUCUN EXAMEN D'IMAGERIE RECOMMANDÉ",
            "    Grossesse < 4 semaines : contre-indication au scanner",
            "    IRM contre-indiquée au 1er trimestre",
            "    → Surveillance clinique et différer l'imagerie si possible",
        ],
        (Exam::Deferred, Some(Term::FirstTrimester)) => vec![
            "⚠️  IMAGERIE DIFFÉRÉE RECOMMANDÉE",
            "    Grossesse < 12 semaines sans critère d'urgence vitale",
            "    Scanner uniquement si urgence vitale (non applicable ici)",
            "    IRM contre-indiquée au 1er trimestre",
            "    → Réévaluation après le 1er trimestre",
        ],
        (Exam::Deferred, Some(Term::Unknown)) => vec![
            "⚠️  IMAGERIE DIFFÉRÉE RECOMMANDÉE",
            "    Terme de la grossesse à préciser avant tout examen",
        ],
        (Exam::Deferred, _) => vec![
            "⚠️  IRM DIFFÉRÉE",
            "    Chirurgie récente avec matériel : IRM après la 6e semaine postopératoire",
        ],
        (Exam::CtWithoutContrast, Some(Term::FirstTrimester)) => vec![
            "☐ SCANNER CÉRÉBRAL SANS INJECTION",
            "    En URGENCE VITALE (après concertation)",
            "    Indication : Critères d'urgence avec grossesse < 12 semaines",
            "    ⚠️  Nécessite avis radiologique et accord de la patiente",
        ],
        (Exam::CtWithoutContrast, _) => vec![
            "☐ SCANNER CÉRÉBRAL SANS INJECTION",
            "    En urgence",
            "    Indication : Céphalée aiguë avec critères de gravité",
        ],
        (Exam::CtWithContrast, _) => vec![
            "☐ SCANNER CÉRÉBRAL AVEC INJECTION",
            "    Indication : Contexte oncologique, recherche de métastases",
        ],
        (Exam::MriWithoutContrast, Some(_)) => vec![
            "☐ IRM CÉRÉBRALE SANS INJECTION",
            "    Indication : Céphalée sans critère d'urgence (grossesse)",
        ],
        (Exam::MriWithoutContrast, None) => vec![
            "☐ IRM CÉRÉBRALE SANS INJECTION",
            "    Indication : Céphalée sans critère d'urgence",
        ],
        (Exam::DeviceCheck, _) => vec![
            "☐ [EXAMEN D'IMAGERIE À PRÉCISER]",
            "    Vérifier la compatibilité IRM du pacemaker",
            "    → Consultation médicale pour évaluation",
        ],
    }
}

fn biology_lines(findings: &ClinicalFindings) -> Vec<&'static str> {
    let mut lines = Vec::new();
    if findings.age.is_some_and(|a| a > 60) {
        lines.push("☐ Créatininémie + calcul de la clairance (DFG)");
        lines.push("    (Avant injection de produit de contraste)");
    }
    let childbearing =
        findings.sex == Some(Sex::Female) && findings.age.map_or(true, |a| a < 50);
    if childbearing && !findings.has(Sign::Pregnancy) {
        lines.push("☐ β-hCG plasmatique (test de grossesse)");
        lines.push("    (Avant tout examen irradiant)");
    }
    lines
}

/// Short summary of a triage, kept alongside the prescription.
pub struct Report;

impl Report {
    pub fn render(
        findings: &ClinicalFindings,
        vignette: &str,
        decision: &Decision,
        notes: &[String],
        now: NaiveDateTime,
    ) -> String {
        let banner = "=".repeat(40);
        let mut out = vec![
            banner.clone(),
            "ASSISTANT MÉDICAL".to_string(),
            now.format("Date : %Y-%m-%d    Heure : %H:%M:%S").to_string(),
            banner,
            String::new(),
            "CLINICIEN - TEXTE FOURNI:".to_string(),
            vignette.to_string(),
            String::new(),
            "INFORMATIONS DÉTECTÉES:".to_string(),
        ];
        if let Some(age) = findings.age {
            out.push(format!("- Âge : {} ans", age));
        }
        if let Some(sex) = findings.sex {
            let label = if sex == Sex::Female { "femme" } else { "homme" };
            out.push(format!("- Sexe : {}", label));
        }
        if findings.has(Sign::Pregnancy) && findings.sex == Some(Sex::Female) {
            let weeks = findings
                .pregnancy_weeks
                .map(|w| w.to_string())
                .unwrap_or_else(|| "inconnue".to_string());
            out.push(format!("- Grossesse : oui ({} semaines)", weeks));
        }
        let signs: Vec<&str> = findings
            .positive_labels()
            .into_iter()
            .filter(|l| *l != Sign::Pregnancy.label())
            .collect();
        if signs.is_empty() {
            out.push("- Signes/antécédents : aucun détecté".to_string());
        } else {
            out.push("- Signes/antécédents :".to_string());
            out.extend(signs.iter().map(|s| format!("    • {}", s)));
        }
        out.push(String::new());
        out.push("RECOMMANDATION :".to_string());
        out.push(decision.text.clone());
        out.push(String::new());
        out.push("CONTRE-INDICATIONS / REMARQUES :".to_string());
        out.push(render_notes(notes));
        out.join("\n")
    }
}

pub fn default_filename(prefix: &str, now: NaiveDateTime) -> String {
    format!("{}_{}.txt", prefix, now.format("%Y%m%d_%H%M%S"))
}

/// Write a prescription under `dir`, creating it if needed. A relative
/// `filename` is placed in `dir`; none means a timestamped name.
/// Returns the absolute path written.
pub fn save(text: &str, dir: &Path, filename: Option<&str>) -> Result<PathBuf> {
    save_as(text, dir, filename, PRESCRIPTION_PREFIX)
}

pub fn save_as(text: &str, dir: &Path, filename: Option<&str>, prefix: &str) -> Result<PathBuf> {
    let name = match filename.map(str::trim).filter(|f| !f.is_empty()) {
        Some(name) => name.to_string(),
        None => default_filename(prefix, Local::now().naive_local()),
    };
    let path = Path::new(&name);
    let target = if path.is_absolute() {
        path.to_path_buf()
    } else {
        fs::create_dir_all(dir)
            .with_context(|| format!("Failed to create directory {}", dir.display()))?;
        dir.join(path)
    };

    fs::write(&target, text).with_context(|| format!("Failed to write {}", target.display()))?;
    let absolute = fs::canonicalize(&target)
        .with_context(|| format!("Failed to resolve {}", target.display()))?;
    info!("saved {}", absolute.display());
    Ok(absolute)
}
