use maze_bayes::config::{Cli, Command, Config};
use maze_bayes::runner::{run_classify, run_search, write_report};

use anyhow::Context;
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();
    let cli = Cli::parse();

    let config = if let Some(config_file) = cli.config.as_ref() {
        let config_str = std::fs::read_to_string(config_file)
            .with_context(|| format!("failed to read config file: {config_file}"))?;
        Config::from_yaml_str(&config_str)
            .with_context(|| format!("error with config file: {config_file}"))?
    } else {
        info!("No config file specified, using default config");
        Config::default()
    }
    .override_from_command_line(&cli)?;

    match &cli.command {
        Command::Search { maze_path, .. } => {
            let report = run_search(&config, maze_path)?;
            write_report(&config.output_path, &report)?;
        }
        Command::Classify { corpus_path, .. } => {
            let report = run_classify(&config, corpus_path)?;
            write_report(&config.output_path, &report)?;
        }
    }

    Ok(())
}
