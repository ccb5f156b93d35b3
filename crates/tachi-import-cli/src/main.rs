mod cli;
mod commands;

use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use cli::{Args, Command};
use owo_colors::OwoColorize;
use tachi_import::{Environment, Settings};
use tracing::debug;
use tracing_subscriber::EnvFilter;

fn main() -> ExitCode {
    let args = Args::parse();

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("tachi_import=info,tachi_import_cli=info"));
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    match run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{} {:#}", "error:".red().bold(), e);
            ExitCode::FAILURE
        }
    }
}

fn run(args: Args) -> Result<()> {
    let settings = load_settings(&args)?;

    match args.command {
        Command::Validate { file, import_type } => commands::validate::run(&file, import_type),
        Command::Batch {
            file,
            charts,
            import_type,
            output,
        } => commands::batch::run(&file, &charts, import_type, &settings, output.as_deref()),
        Command::Arc {
            profile,
            base_url,
            limit,
        } => commands::arc::run(&profile, base_url.as_deref(), limit, &settings),
        Command::IrScores {
            charts,
            pbs,
            sha256,
            viewer,
        } => commands::ir_scores::run(&charts, &pbs, &sha256, viewer),
    }
}

/// Config file (explicit path, else the default one if present) with the
/// process environment applied on top.
fn load_settings(args: &Args) -> Result<Settings> {
    let mut settings = match &args.config {
        Some(path) => Settings::load(path)
            .with_context(|| format!("Failed to load config {}", path.display()))?,
        None => match Settings::default_path().filter(|p| p.exists()) {
            Some(path) => Settings::load(&path)
                .with_context(|| format!("Failed to load config {}", path.display()))?,
            None => Settings::default(),
        },
    };

    let env = Environment::from_process()?;
    settings.apply_environment(&env);
    debug!(?settings, mode = ?env.mode, "Settings loaded");

    Ok(settings)
}
