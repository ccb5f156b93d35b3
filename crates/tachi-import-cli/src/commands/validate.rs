//! Validate command: parse a document and report what it contains.

use std::path::Path;

use anyhow::Result;
use owo_colors::OwoColorize;
use tachi_import::{GameConfig, ImportSource, ImportType, ParsedImport, parse};

use super::read_json;

pub fn run(file: &Path, import_type: ImportType) -> Result<()> {
    let data = read_json(file)?;
    let config = GameConfig::standard();

    let parsed = parse(import_type, ImportSource::Document(&data), &config)?;
    let game = parsed.game();
    let context = serde_json::to_string(parsed.context())?;

    let entries = match parsed {
        ParsedImport::Scores(res) => res.into_items()?.len(),
        ParsedImport::Raw(res) => res.into_items()?.len(),
    };

    println!(
        "{} {} ({}): {} entries, context {}",
        "valid".green().bold(),
        file.display(),
        game,
        entries,
        context.dimmed()
    );
    Ok(())
}
