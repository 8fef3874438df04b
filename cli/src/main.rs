mod commands;

use anyhow::Result;
use clap::Parser;
use commands::{
    handle_ask, handle_chat, handle_check, handle_search, handle_triage, load_config, Cli,
    Commands,
};
use imagerie_config::{Config, ErrorFormatter};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::from_default_env().add_directive("imagerie=info".parse()?))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let mut cli = Cli::parse();

    match cli.command.take().unwrap_or(Commands::Chat) {
        Commands::Chat => handle_chat(&config_or_exit(&cli)).await?,
        Commands::Ask { vignette, json } => {
            handle_ask(&config_or_exit(&cli), &vignette.join(" "), json).await?
        }
        Commands::Search { query, top } => {
            handle_search(&config_or_exit(&cli), &query.join(" "), top).await?
        }
        Commands::Triage { vignette } => handle_triage(&config_or_exit(&cli), &vignette.join(" "))?,
        Commands::Check { file } => handle_check(&file)?,
    }

    Ok(())
}

fn config_or_exit(cli: &Cli) -> Config {
    match load_config(cli) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("{}", ErrorFormatter::new(e));
            std::process::exit(2);
        }
    }
}
