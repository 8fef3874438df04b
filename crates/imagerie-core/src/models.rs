use serde::{Deserialize, Deserializer, Serialize};

/// A stored clinical recommendation with its category (`motif`) and origin (`source`).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct GuidelineRecord {
    #[serde(deserialize_with = "string_or_number")]
    pub id: String,
    pub texte: String,
    #[serde(default)]
    pub motif: String,
    #[serde(default)]
    pub source: String,
}

impl GuidelineRecord {
    pub fn metadata(&self) -> GuidelineMetadata {
        GuidelineMetadata {
            motif: self.motif.clone(),
            source: self.source.clone(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct GuidelineMetadata {
    pub motif: String,
    pub source: String,
}

/// One result from the vector-search collaborator. Lower distance means more similar.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct SearchHit {
    pub id: String,
    pub text: String,
    pub metadata: GuidelineMetadata,
    pub distance: f32,
}

fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Id {
        Text(String),
        Number(u64),
    }

    Ok(match Id::deserialize(deserializer)? {
        Id::Text(s) => s,
        Id::Number(n) => n.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_numeric_id_accepted() {
        let rec: GuidelineRecord =
            serde_json::from_str(r#"{"id": 7, "texte": "IRM cérébrale"}"#).unwrap();
        assert_eq!(rec.id, "7");
        assert!(rec.motif.is_empty());
    }
}
