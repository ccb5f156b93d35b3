//! IR scores command: answer a chart-scores request from JSON files.

use std::path::Path;

use anyhow::{Context, Result};
use owo_colors::OwoColorize;
use tachi_import::{MemoryStore, chart_scores};

pub fn run(charts: &Path, pbs: &Path, sha256: &str, viewer: u32) -> Result<()> {
    let store = MemoryStore::load(charts, Some(pbs)).context("Failed to load IR store")?;

    let (status, response) = chart_scores(&store, sha256, viewer);
    let status_label = if response.success {
        status.green().to_string()
    } else {
        status.yellow().to_string()
    };

    eprintln!("{} {}", "status".dimmed(), status_label);
    println!("{}", serde_json::to_string_pretty(&response)?);
    Ok(())
}
