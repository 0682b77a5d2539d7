#![warn(clippy::all)]
#![allow(clippy::pedantic)]

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use slant_common::config_loader::check_modular_files;
use slant_common::logging::init_logging_with_exclusions;
use slant_common::{Config, Validate};

mod commands;

/// Slant - explainable bias and sentiment profiles for news articles.
#[derive(Parser, Debug)]
#[command(name = "slant")]
#[command(version = "0.1.0")]
#[command(about = "Score news articles for sentiment, loaded language and framing.", long_about = None)]
struct Cli {
    /// Read config.json and lexicons.json from this directory instead of ~/.slant
    #[arg(long, global = true)]
    config_dir: Option<PathBuf>,

    /// Override the configured log level
    #[arg(long, global = true)]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Analyze one article and print its profile as JSON
    Analyze {
        /// File holding the article body (reads stdin when omitted)
        #[arg(short, long)]
        file: Option<PathBuf>,

        /// Article URL, used as the store key and for the source name
        #[arg(long, default_value = "urn:stdin")]
        url: String,

        /// Article title, analyzed when the body is blank
        #[arg(long, default_value = "")]
        title: String,

        /// Pretty-print the JSON output
        #[arg(long)]
        pretty: bool,
    },

    /// Analyze JSON-lines articles ({"url", "title", "text"}) and print one profile per line
    Batch {
        /// JSON-lines input file (reads stdin when omitted)
        #[arg(short, long)]
        input: Option<PathBuf>,
    },

    /// Print the effective configuration
    Config,
}

/// Load config, apply env and command-line overrides, then validate the result.
fn load_config(dir: Option<&Path>, log_level: Option<&str>) -> Result<Config> {
    let mut config = match dir {
        Some(dir) => Config::load_from_dir(dir)
            .with_context(|| format!("Failed to load config from {}", dir.display()))?,
        None => Config::load()?,
    };
    config.apply_env_overrides();
    if let Some(level) = log_level {
        config.observability.log_level = level.to_string();
    }
    config.validate().map_err(|e| anyhow::anyhow!("{}", e))?;
    Ok(config)
}

/// Log which config files were read. Runs once logging is up.
fn report_config_sources(dir: Option<&Path>) -> usize {
    let files = check_modular_files(dir.map(Path::to_path_buf));
    for (file, present) in &files {
        debug!(file = %file, present, "Config file");
    }

    let found = files.iter().filter(|(_, present)| *present).count();
    if found == 0 {
        info!("Config file not found, using defaults");
    } else {
        info!(files = found, "Configuration loaded");
    }
    found
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = load_config(cli.config_dir.as_deref(), cli.log_level.as_deref())?;

    init_logging_with_exclusions(
        &config.observability.log_level,
        &config.observability.log_format,
        &config.observability.excluded_targets,
    );
    report_config_sources(cli.config_dir.as_deref());

    match cli.command {
        Commands::Analyze {
            file,
            url,
            title,
            pretty,
        } => commands::analyze(&config, file.as_deref(), url, title, pretty),
        Commands::Batch { input } => commands::batch(&config, input.as_deref()),
        Commands::Config => commands::print_config(&config, cli.config_dir.as_deref()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_analyze() {
        let cli = Cli::try_parse_from([
            "slant", "analyze", "--file", "a.txt", "--url", "https://example.com/a", "--pretty",
        ])
        .unwrap();
        match cli.command {
            Commands::Analyze {
                file, url, pretty, ..
            } => {
                assert_eq!(file, Some(PathBuf::from("a.txt")));
                assert_eq!(url, "https://example.com/a");
                assert!(pretty);
            }
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn test_parse_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from(["slant", "batch", "--log-level", "debug"]).unwrap();
        assert_eq!(cli.log_level.as_deref(), Some("debug"));
        assert!(matches!(cli.command, Commands::Batch { input: None }));
    }

    #[test]
    fn test_load_config_from_dir() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join("config.json"),
            r#"{"confidence": {"high": 0.8, "medium": 0.6}}"#,
        )
        .unwrap();

        let config = load_config(Some(dir.path()), None).unwrap();
        assert_eq!(config.confidence.high, 0.8);
    }

    #[test]
    fn test_load_config_rejects_invalid() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join("config.json"),
            r#"{"confidence": {"high": 0.5, "medium": 0.6}}"#,
        )
        .unwrap();

        assert!(load_config(Some(dir.path()), None).is_err());
    }

    #[test]
    fn test_log_level_flag_is_validated() {
        let dir = tempfile::tempdir().unwrap();

        let err = load_config(Some(dir.path()), Some("verbose")).unwrap_err();
        assert!(err.to_string().contains("observability.log_level"));

        let config = load_config(Some(dir.path()), Some("debug")).unwrap();
        assert_eq!(config.observability.log_level, "debug");
    }

    #[test]
    fn test_report_config_sources() {
        let dir = tempfile::tempdir().unwrap();
        assert_eq!(report_config_sources(Some(dir.path())), 0);

        std::fs::write(dir.path().join("lexicons.json"), "{}").unwrap();
        assert_eq!(report_config_sources(Some(dir.path())), 1);
    }
}
