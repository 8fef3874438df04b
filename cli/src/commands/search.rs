use anyhow::Result;
use console::Style;
use imagerie_config::Config;
use imagerie_core::classify::RecommendationClass;
use imagerie_core::enhance::enhance_query;
use imagerie_core::scoring::{explain_score, rank};
use imagerie_core::traits::VectorSearch;

use super::context::AppContext;
use super::ui;

pub async fn handle_search(config: &Config, query: &str, top: Option<usize>) -> Result<()> {
    let ctx = AppContext::build(config).await?;
    let top = top.unwrap_or(ctx.config.retrieval.top_k);

    let enhanced = enhance_query(query);
    ui::print_header(&format!("Recherche : {}", query));
    if enhanced != query {
        ui::print_key_value("Requête enrichie", &enhanced);
    }

    let hits = ctx.index.query(&enhanced, top).await?;
    if hits.is_empty() {
        println!("Aucune guideline trouvée.");
        return Ok(());
    }

    for (i, scored) in rank(query, hits).into_iter().enumerate() {
        let hit = &scored.hit;
        let class = RecommendationClass::from_score(scored.score, &hit.text);
        println!(
            "{} {} {}",
            Style::new().bold().blue().apply_to(format!("#{} [{}]", i + 1, hit.id)),
            Style::new().bold().apply_to(class),
            Style::new().dim().apply_to(format!(
                "motif: {} | source: {}",
                hit.metadata.motif, hit.metadata.source
            ))
        );
        println!("{}", hit.text);

        let breakdown = explain_score(query, &hit.text, hit.distance);
        let factors = breakdown
            .factors
            .iter()
            .map(|(name, factor)| format!("{} ×{}", name, factor))
            .collect::<Vec<_>>()
            .join(", ");
        println!(
            "{}",
            Style::new().dim().apply_to(format!(
                "distance {:.3} | base {:.3} | score {:.3}{}",
                hit.distance,
                breakdown.base,
                scored.score,
                if factors.is_empty() {
                    String::new()
                } else {
                    format!(" | {}", factors)
                }
            ))
        );
        println!();
    }
    Ok(())
}
