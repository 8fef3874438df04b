use std::sync::Arc;

use imagerie_core::guidelines::GuidelineStore;
use imagerie_core::models::GuidelineRecord;
use imagerie_core::traits::VectorSearch;
use imagerie_index::{HashEmbedder, VectorIndex};

fn record(id: &str, texte: &str, motif: &str) -> GuidelineRecord {
    GuidelineRecord {
        id: id.to_string(),
        texte: texte.to_string(),
        motif: motif.to_string(),
        source: "HAS".to_string(),
    }
}

fn store() -> GuidelineStore {
    GuidelineStore::from_records(
        Some(1),
        vec![
            record(
                "cephalee-1",
                "Céphalée brutale en coup de tonnerre : scanner cérébral sans injection en urgence",
                "céphalée",
            ),
            record(
                "lombalgie-1",
                "Lombalgie commune : pas d'imagerie avant 6 semaines",
                "lombalgie",
            ),
            record(
                "abdo-1",
                "Douleur de la fosse iliaque droite : échographie puis scanner abdominal",
                "abdomen",
            ),
        ],
    )
    .unwrap()
}

#[tokio::test]
async fn test_nearest_guideline_first() {
    let index = VectorIndex::build(&store(), Arc::new(HashEmbedder::new(512)))
        .await
        .unwrap();
    assert_eq!(index.len(), 3);

    let hits = index
        .query("céphalée brutale coup de tonnerre", 2)
        .await
        .unwrap();
    assert_eq!(hits.len(), 2);
    assert_eq!(hits[0].id, "cephalee-1");
    assert_eq!(hits[0].metadata.motif, "céphalée");
    assert!(hits[0].distance <= hits[1].distance);
}

#[tokio::test]
async fn test_empty_index_returns_nothing() {
    let empty = GuidelineStore::from_records(None, Vec::new()).unwrap();
    let index = VectorIndex::build(&empty, Arc::new(HashEmbedder::new(64)))
        .await
        .unwrap();
    assert!(index.is_empty());
    assert!(index.query("céphalée", 5).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_equal_distances_break_on_id() {
    let store = GuidelineStore::from_records(
        None,
        vec![
            record("b", "IRM cérébrale", ""),
            record("a", "IRM cérébrale", ""),
        ],
    )
    .unwrap();
    let index = VectorIndex::build(&store, Arc::new(HashEmbedder::new(64)))
        .await
        .unwrap();
    let hits = index.query("toux", 2).await.unwrap();
    let ids: Vec<&str> = hits.iter().map(|h| h.id.as_str()).collect();
    assert_eq!(ids, vec!["a", "b"]);
}
