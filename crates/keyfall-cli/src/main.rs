mod cli;
mod cli_utils;
mod commands;

use anyhow::Result;
use clap::Parser;
use cli::{Args, Command};
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize logging (info unless RUST_LOG says otherwise)
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("keyfall=info,keyfall_core=info"));
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    let config = cli_utils::load_config(&args)?;

    match args.command {
        Command::Analysis {
            input,
            project_from,
            song,
            output,
        } => commands::analysis::run(config, &input, project_from, &song, &output),
        Command::Recording {
            input,
            project_from,
            song,
            output,
        } => commands::recording::run(config, &input, project_from, &song, &output),
        Command::Template {
            bpm,
            duration,
            offset,
            sections,
            project_from,
            song,
            output,
        } => commands::template::run(
            config,
            bpm,
            duration,
            offset,
            sections.as_deref(),
            project_from,
            &song,
            &output,
        ),
        Command::Edit { action } => commands::edit::run(action, config.layout()?),
    }
}
