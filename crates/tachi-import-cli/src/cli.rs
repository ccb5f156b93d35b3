//! CLI argument definitions for tachi-import.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tachi_import::ImportType;

#[derive(Parser)]
#[command(name = "tachi-import")]
#[command(about = "Validate, normalize and convert rhythm game score imports", version)]
pub struct Args {
    /// Config file (default: <config dir>/tachi-import/config.toml)
    #[arg(long, value_name = "FILE", env = "TACHI_IMPORT_CONFIG")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Parse a score document without normalizing it
    Validate {
        /// JSON document to parse
        file: PathBuf,
        /// Import type of the document
        #[arg(long, default_value = "file/batch-manual")]
        import_type: ImportType,
    },
    /// Parse a score document and normalize every entry against a chart list
    Batch {
        /// JSON document to parse
        file: PathBuf,
        /// JSON array of charts to resolve entries against
        #[arg(long, value_name = "FILE")]
        charts: PathBuf,
        /// Import type of the document
        #[arg(long, default_value = "file/batch-manual")]
        import_type: ImportType,
        /// Write canonical scores here instead of stdout
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,
    },
    /// Stream a profile's ARC player bests as JSON lines
    Arc {
        /// ARC profile ID
        profile: String,
        /// ARC API base URL (overrides config)
        #[arg(long, env = "TACHI_IMPORT_ARC_BASE_URL")]
        base_url: Option<String>,
        /// Stop after this many items
        #[arg(long)]
        limit: Option<usize>,
    },
    /// Answer a beatoraja IR chart-scores request
    IrScores {
        /// JSON array of charts
        #[arg(long, value_name = "FILE")]
        charts: PathBuf,
        /// JSON array of personal bests
        #[arg(long, value_name = "FILE")]
        pbs: PathBuf,
        /// SHA-256 of the chart file
        #[arg(long)]
        sha256: String,
        /// Requesting user ID
        #[arg(long, default_value = "0")]
        viewer: u32,
    },
}
