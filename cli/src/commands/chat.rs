use anyhow::Result;
use console::Style;
use imagerie_agent::{build_engine, Command, DialogueState, Session};
use imagerie_config::Config;
use imagerie_core::clarify::{add_duration, needs_duration};

use super::context::AppContext;
use super::ui;

const DURATION_PROMPT: &str =
    "Précisez la durée (ex: '2 jours', '1 semaine', ou 'depuis 3 jours') : ";
const WELCOME: &str = "Décrivez le cas clinique. 'nouveau' pour un autre cas, 'quit' pour sortir.";

pub async fn handle_chat(config: &Config) -> Result<()> {
    let ctx = AppContext::build(config).await?;
    let engine = build_engine(&ctx.config, ctx.index.clone())?;
    let mut session = Session::new(engine, ctx.config.dialogue.max_clarification_rounds);

    ui::print_header("Assistant d'imagerie");
    ui::print_key_value("Guidelines", &ctx.store.len().to_string());
    ui::print_key_value("Mode", &format!("{:?}", ctx.config.dialogue.mode));
    println!("{}", Style::new().dim().apply_to(WELCOME));

    loop {
        let prompt = match session.state() {
            DialogueState::AwaitingClarification { .. } => "réponse> ",
            _ => "cas> ",
        };
        let Some(line) = ui::read_line(prompt)? else {
            break;
        };

        match Command::parse(&line) {
            Command::Quit => break,
            Command::Empty => continue,
            Command::Reset => {
                session.reset();
                println!("{}", Style::new().dim().apply_to("Nouveau cas."));
            }
            Command::Input(mut text) => {
                if let DialogueState::AwaitingClarification { questions, .. } = session.state() {
                    if needs_duration(questions, &text) {
                        let Some(duration) = ui::read_line(DURATION_PROMPT)? else {
                            break;
                        };
                        match Command::parse(&duration) {
                            Command::Quit => break,
                            Command::Input(duration) => text = add_duration(&text, &duration),
                            _ => {}
                        }
                    }
                }
                report(session.handle(&text).await);
            }
        }
    }

    Ok(())
}

fn report(result: Result<&DialogueState>) {
    match result {
        Ok(DialogueState::AwaitingClarification { questions, .. }) => ui::print_questions(questions),
        Ok(DialogueState::TerminalRecommendation { recommendation }) => {
            ui::print_recommendation(recommendation);
            println!(
                "{}",
                Style::new()
                    .dim()
                    .apply_to("Complétez le cas pour réévaluer, ou 'nouveau'.")
            );
        }
        Ok(DialogueState::AwaitingInput) => {}
        Err(e) => ui::print_error(&format!("{:#}", e)),
    }
}
