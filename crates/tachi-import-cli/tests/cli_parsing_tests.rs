//! CLI argument parsing tests.
//!
//! These only parse arguments; no command is executed.

#[path = "../src/cli.rs"]
#[allow(dead_code)]
mod cli;

use std::path::PathBuf;

use clap::Parser;
use cli::{Args, Command};
use tachi_import::ImportType;

fn parse(args: &[&str]) -> Result<Args, clap::Error> {
    Args::try_parse_from(std::iter::once("tachi-import").chain(args.iter().copied()))
}

#[test]
fn test_validate_defaults_to_batch_manual() {
    let args = parse(&["validate", "scores.json"]).unwrap();
    match args.command {
        Command::Validate { file, import_type } => {
            assert_eq!(file, PathBuf::from("scores.json"));
            assert_eq!(import_type, ImportType::FileBatchManual);
        }
        _ => panic!("Expected Validate command"),
    }
}

#[test]
fn test_validate_with_import_type() {
    let args = parse(&["validate", "s.json", "--import-type", "ir/beatoraja"]).unwrap();
    match args.command {
        Command::Validate { import_type, .. } => assert_eq!(import_type, ImportType::IrBeatoraja),
        _ => panic!("Expected Validate command"),
    }
}

#[test]
fn test_unknown_import_type_rejected() {
    assert!(parse(&["validate", "s.json", "--import-type", "file/csv"]).is_err());
}

#[test]
fn test_batch_requires_charts() {
    assert!(parse(&["batch", "scores.json"]).is_err());
}

#[test]
fn test_batch_with_output() {
    let args = parse(&["batch", "scores.json", "--charts", "charts.json", "-o", "out.json"]).unwrap();
    match args.command {
        Command::Batch {
            file,
            charts,
            import_type,
            output,
        } => {
            assert_eq!(file, PathBuf::from("scores.json"));
            assert_eq!(charts, PathBuf::from("charts.json"));
            assert_eq!(import_type, ImportType::FileBatchManual);
            assert_eq!(output, Some(PathBuf::from("out.json")));
        }
        _ => panic!("Expected Batch command"),
    }
}

#[test]
fn test_arc_with_limit_and_base_url() {
    let args = parse(&[
        "arc",
        "profile 1",
        "--base-url",
        "http://localhost:8080",
        "--limit",
        "5",
    ])
    .unwrap();
    match args.command {
        Command::Arc {
            profile,
            base_url,
            limit,
        } => {
            assert_eq!(profile, "profile 1");
            assert_eq!(base_url.as_deref(), Some("http://localhost:8080"));
            assert_eq!(limit, Some(5));
        }
        _ => panic!("Expected Arc command"),
    }
}

#[test]
fn test_ir_scores_default_viewer() {
    let args = parse(&[
        "ir-scores",
        "--charts",
        "charts.json",
        "--pbs",
        "pbs.json",
        "--sha256",
        "abc",
    ])
    .unwrap();
    match args.command {
        Command::IrScores { sha256, viewer, .. } => {
            assert_eq!(sha256, "abc");
            assert_eq!(viewer, 0);
        }
        _ => panic!("Expected IrScores command"),
    }
}

#[test]
fn test_config_flag() {
    let args = parse(&["--config", "my.toml", "validate", "s.json"]).unwrap();
    assert_eq!(args.config, Some(PathBuf::from("my.toml")));
}

#[test]
fn test_missing_subcommand_fails() {
    assert!(parse(&[]).is_err());
}
