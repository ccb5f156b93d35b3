//! Batch command: parse a document and normalize it into canonical scores.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result, bail};
use tachi_import::{
    CanonicalScore, GameConfig, ImportSource, ImportType, MemoryStore, ParsedImport, ScoreNormalizer,
    Settings, parse,
};
use tracing::info;

use super::read_json;

pub fn run(
    file: &Path,
    charts: &Path,
    import_type: ImportType,
    settings: &Settings,
    output: Option<&Path>,
) -> Result<()> {
    let data = read_json(file)?;
    let store = MemoryStore::load(charts, None)
        .with_context(|| format!("Failed to load charts from {}", charts.display()))?;
    let config = GameConfig::standard();

    let ParsedImport::Scores(parsed) = parse(import_type, ImportSource::Document(&data), &config)?
    else {
        bail!("{} does not produce score entries", import_type);
    };

    let mut context = parsed.context.clone();
    if context.service.is_none() {
        context.service = Some(settings.service_name.clone());
    }

    let normalizer = ScoreNormalizer::new(&config, &store);
    let game = parsed.game;
    let scores = parsed
        .iterable
        .map(|entry| normalizer.normalize(&entry?, game, &context))
        .collect::<Result<Vec<CanonicalScore>, _>>()?;

    info!(game = %game, scores = scores.len(), "Normalized {}", file.display());

    let json = serde_json::to_string_pretty(&scores)?;
    match output {
        Some(path) => fs::write(path, json)
            .with_context(|| format!("Failed to write {}", path.display()))?,
        None => println!("{}", json),
    }
    Ok(())
}
