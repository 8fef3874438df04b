pub mod dialogue;
pub mod engine;
pub mod llm;
pub mod prompts;
pub mod reply;

pub use dialogue::{Command, DialogueState, Session};
pub use engine::{build_engine, Engine, EvalContext, Outcome, Recommendation};
pub use llm::{build_client, LlmError, OllamaClient, OpenAiClient};
pub use reply::{ask_llm, LlmReply, ReplyError};
