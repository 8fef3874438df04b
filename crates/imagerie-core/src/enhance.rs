//! Query expansion before the nearest-neighbour lookup.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::text::normalize;

/// Trigger (folded) and the vocabulary appended when it appears.
const SYNONYMS: &[(&str, &str)] = &[
    // céphalées & neurologie
    ("cephalees", "mal de tête douleur crânienne migraine"),
    ("coup de tonnerre", "céphalée brutale hémorragie méningée scanner urgent"),
    ("deficit moteur", "paralysie faiblesse AVC hémiplégie scanner cérébral urgent"),
    ("vomissements matinaux", "HTIC enfant hypertension intracrânienne IRM cérébrale urgente"),
    ("troubles visuels", "vision floue diplopie sclérose plaques SEP IRM cérébrale"),
    ("photophobie", "peur lumière méningite scanner cérébral urgent"),
    ("raideur de nuque", "raideur nucale méningite scanner urgence"),
    // abdomen
    ("fosse iliaque droite", "FID appendicite McBurney échographie scanner abdominal"),
    ("fid", "fosse iliaque droite appendicite échographie scanner abdominal"),
    ("appendicite", "FID fosse iliaque droite McBurney fièvre échographie scanner"),
    ("douleur abdominale", "mal ventre FID épigastre échographie scanner"),
    ("hematurie", "sang urines lithiase calcul rénal colique néphrétique scanner"),
    ("colique nephretique", "douleur lombaire lithiase calcul rénal hématurie scanner abdomino-pelvien"),
    ("lombaire brutale", "colique néphrétique calcul rénal lithiase scanner urgence"),
    // marche & motricité
    ("troubles de la marche", "démarche instable ataxie SEP sclérose plaques IRM"),
    ("marche instable", "ataxie déséquilibre sclérose plaques SEP IRM cérébrale médullaire"),
    ("paresthesies", "fourmillements engourdissements SEP sclérose plaques IRM"),
    ("troubles sensitifs", "engourdissements fourmillements paresthésies SEP IRM"),
    // pédiatrie
    ("enfant", "pédiatrique nourrisson bébé"),
    ("vomissements enfant", "HTIC pression intracrânienne IRM cérébrale urgente pédiatrie"),
    ("cephalees enfant", "mal tête HTIC pression intracrânienne IRM urgente"),
    // terrains particuliers
    ("femme enceinte", "grossesse contre-indication scanner IRM échographie"),
    ("grossesse", "femme enceinte contre-indication scanner IRM échographie"),
    ("claustrophobie", "angoisse IRM contre-indication scanner alternative"),
    ("insuffisance renale", "contre-indication produit contraste créatinine scanner"),
    ("allergie iode", "contre-indication produit contraste scanner IRM alternative"),
];

static PATIENTE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\b(P|p)atiente\b").unwrap());
static PATIENT: Lazy<Regex> = Lazy::new(|| Regex::new(r"\b(P|p)atient\b").unwrap());

/// Rewrite `patient`/`patiente` as `homme`/`femme`, the vocabulary the
/// guidelines are written in.
pub fn normalize_gender(vignette: &str) -> String {
    if PATIENTE.is_match(vignette) {
        PATIENTE
            .replace_all(vignette, |c: &regex::Captures| {
                if &c[1] == "P" { "Femme" } else { "femme" }
            })
            .into_owned()
    } else {
        PATIENT
            .replace_all(vignette, |c: &regex::Captures| {
                if &c[1] == "P" { "Homme" } else { "homme" }
            })
            .into_owned()
    }
}

/// Gender-normalised vignette followed by the synonyms of every trigger it contains.
pub fn enhance_query(vignette: &str) -> String {
    let folded = normalize(vignette);
    let mut enhanced = normalize_gender(vignette);
    for (trigger, synonyms) in SYNONYMS {
        if folded.contains(trigger) {
            enhanced.push(' ');
            enhanced.push_str(synonyms);
        }
    }
    enhanced
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gender_normalisation() {
        assert_eq!(normalize_gender("Patient de 40 ans"), "Homme de 40 ans");
        assert_eq!(normalize_gender("patiente de 30 ans"), "femme de 30 ans");
        assert_eq!(normalize_gender("céphalées"), "céphalées");
    }

    #[test]
    fn test_synonyms_appended_in_table_order() {
        let q = enhance_query("Patiente, céphalées en coup de tonnerre");
        assert!(q.starts_with("Femme, céphalées en coup de tonnerre"));
        let migraine = q.find("migraine").unwrap();
        let meningee = q.find("méningée").unwrap();
        assert!(migraine < meningee);
    }

    #[test]
    fn test_no_trigger_leaves_text() {
        assert_eq!(enhance_query("toux sèche"), "toux sèche");
    }
}
