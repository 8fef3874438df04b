pub mod ask;
pub mod chat;
pub mod check;
pub mod context;
pub mod search;
pub mod triage;
pub mod ui;

pub use ask::handle_ask;
pub use chat::handle_chat;
pub use check::handle_check;
pub use context::load_config;
pub use search::handle_search;
pub use triage::handle_triage;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "imagerie")]
#[command(about = "Imaging recommendation assistant for clinical vignettes")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    #[arg(short, long, value_name = "FILE", global = true)]
    pub config: Option<PathBuf>,

    /// Guideline file (.json or one guideline per line .txt)
    #[arg(short, long, value_name = "FILE", global = true)]
    pub guidelines: Option<PathBuf>,

    /// Dialogue engine: llm, retrieval or decision_tree
    #[arg(short, long, global = true)]
    pub mode: Option<String>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Interactive clarification dialogue (default)
    Chat,
    /// Evaluate a single vignette without follow-up
    Ask {
        /// The clinical vignette
        #[arg(required = true)]
        vignette: Vec<String>,
        /// Print the outcome as JSON
        #[arg(long, default_value_t = false)]
        json: bool,
    },
    /// Show retrieved guidelines with their contextual score
    Search {
        /// The query string
        #[arg(required = true)]
        query: Vec<String>,

        /// Number of results
        #[arg(long)]
        top: Option<usize>,
    },
    /// Headache triage with yes/no questions and an optional prescription
    Triage {
        /// Initial vignette (prompted for when omitted)
        vignette: Vec<String>,
    },
    /// Validate a guideline file and print a summary
    Check {
        file: PathBuf,
    },
}
