//! Clarification dialogue over a single case.
//!
//! The session owns the accumulated case text. Answers to pending questions
//! are appended as `"<question>: <answer>"` so every engine sees the whole
//! exchange as plain text.

use std::sync::Arc;

use anyhow::Result;
use imagerie_core::clarify::question_answered;
use serde::Serialize;
use tracing::{debug, info};

use crate::engine::{Engine, EvalContext, Outcome, Recommendation};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Quit,
    Reset,
    Empty,
    Input(String),
}

impl Command {
    pub fn parse(line: &str) -> Self {
        let line = line.trim();
        match line.to_lowercase().as_str() {
            "" => Command::Empty,
            "quit" | "exit" | "q" => Command::Quit,
            "nouveau" | "new" => Command::Reset,
            _ => Command::Input(line.to_string()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum DialogueState {
    AwaitingInput,
    AwaitingClarification { questions: Vec<String>, round: usize },
    TerminalRecommendation { recommendation: Recommendation },
}

pub struct Session {
    engine: Arc<dyn Engine>,
    max_rounds: usize,
    case: String,
    state: DialogueState,
}

impl Session {
    pub fn new(engine: Arc<dyn Engine>, max_rounds: usize) -> Self {
        Self {
            engine,
            max_rounds,
            case: String::new(),
            state: DialogueState::AwaitingInput,
        }
    }

    pub fn state(&self) -> &DialogueState {
        &self.state
    }

    pub fn case(&self) -> &str {
        &self.case
    }

    pub fn reset(&mut self) {
        self.case.clear();
        self.state = DialogueState::AwaitingInput;
    }

    /// Feed one line of clinician input. On error the session is left as
    /// it was before the call.
    pub async fn handle(&mut self, input: &str) -> Result<&DialogueState> {
        let input = input.trim();
        if input.is_empty() {
            return Ok(&self.state);
        }

        let saved_case = self.case.clone();
        let ctx = match &self.state {
            DialogueState::AwaitingInput => {
                self.case = input.to_string();
                EvalContext::initial()
            }
            DialogueState::AwaitingClarification { questions, round } => {
                let questions = questions.clone();
                let round = round + 1;
                self.record_answers(&questions, input);
                EvalContext {
                    round,
                    first_interaction: false,
                    forced: round >= self.max_rounds,
                }
            }
            DialogueState::TerminalRecommendation { .. } => {
                debug!("amending case after recommendation");
                self.append(input);
                EvalContext {
                    round: 0,
                    first_interaction: false,
                    forced: false,
                }
            }
        };
        if ctx.forced {
            info!("clarification limit reached after {} rounds", ctx.round);
        }

        match self.evaluate(ctx).await {
            Ok(state) => {
                self.state = state;
                Ok(&self.state)
            }
            Err(e) => {
                self.case = saved_case;
                Err(e)
            }
        }
    }

    async fn evaluate(&self, ctx: EvalContext) -> Result<DialogueState> {
        let mut outcome = self.engine.evaluate(&self.case, ctx).await?;
        if let Outcome::Clarify(questions) = &outcome {
            let answered = questions.iter().all(|q| question_answered(q, &self.case));
            if answered && !ctx.forced {
                debug!("every question already answered, forcing a recommendation");
                outcome = self.engine.evaluate(&self.case, ctx.forced()).await?;
            }
        }
        Ok(match outcome {
            Outcome::Clarify(questions) => DialogueState::AwaitingClarification {
                questions,
                round: ctx.round,
            },
            Outcome::Recommend(recommendation) => {
                DialogueState::TerminalRecommendation { recommendation }
            }
        })
    }

    /// Pair answers with questions in order. The last question takes every
    /// remaining answer, and a lone question takes the whole line. Questions
    /// left without an answer are not recorded.
    fn record_answers(&mut self, questions: &[String], input: &str) {
        let answers: Vec<&str> = if questions.len() <= 1 {
            vec![input]
        } else {
            input
                .split(['|', ',', ';'])
                .map(str::trim)
                .filter(|a| !a.is_empty())
                .collect()
        };

        for (i, question) in questions.iter().enumerate() {
            let answer = if i + 1 == questions.len() {
                answers.get(i..).unwrap_or_default().join(", ")
            } else {
                answers.get(i).copied().unwrap_or_default().to_string()
            };
            // Unanswered questions stay open for the next round.
            if answer.is_empty() {
                continue;
            }
            // Multi-line rule questions only contribute their answer.
            if question.contains('\n') {
                self.append(&answer);
            } else {
                self.append(&format!("{}: {}", question.trim(), answer));
            }
        }
    }

    fn append(&mut self, text: &str) {
        if self.case.is_empty() {
            self.case = text.to_string();
        } else {
            self.case = format!("{}, {}", self.case, text);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_command_parse() {
        assert_eq!(Command::parse("  QUIT "), Command::Quit);
        assert_eq!(Command::parse("q"), Command::Quit);
        assert_eq!(Command::parse("Nouveau"), Command::Reset);
        assert_eq!(Command::parse("   "), Command::Empty);
        assert_eq!(
            Command::parse(" céphalée brutale "),
            Command::Input("céphalée brutale".to_string())
        );
    }
}
