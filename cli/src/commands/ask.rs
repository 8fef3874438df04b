use anyhow::Result;
use imagerie_agent::{build_engine, Engine, EvalContext, Outcome};
use imagerie_config::Config;

use super::context::AppContext;
use super::ui;

pub async fn handle_ask(config: &Config, vignette: &str, json: bool) -> Result<()> {
    let ctx = AppContext::build(config).await?;
    let engine = build_engine(&ctx.config, ctx.index.clone())?;
    let outcome = engine.evaluate(vignette, EvalContext::initial()).await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&outcome)?);
        return Ok(());
    }

    match &outcome {
        Outcome::Clarify(questions) => ui::print_questions(questions),
        Outcome::Recommend(recommendation) => ui::print_recommendation(recommendation),
    }
    Ok(())
}
