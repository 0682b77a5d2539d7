//! Subcommand implementations.

use anyhow::{Context, Result};
use std::fs;
use std::io::{self, BufRead, BufReader, Read, Write};
use std::path::Path;
use tracing::{info, warn};

use slant_common::config_loader::check_modular_files;
use slant_common::Config;
use slant_core::{Article, ArticleAnalyzer, BiasLevel, InMemoryVerdictStore, VerdictStore};

fn read_input(path: Option<&Path>) -> Result<String> {
    match path {
        Some(path) => fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display())),
        None => {
            let mut buf = String::new();
            io::stdin()
                .read_to_string(&mut buf)
                .context("Failed to read stdin")?;
            Ok(buf)
        }
    }
}

/// Parse JSON-lines articles. Blank lines are skipped; malformed lines are
/// reported and skipped.
pub fn read_articles<R: BufRead>(reader: R) -> Result<Vec<Article>> {
    let mut articles = Vec::new();

    for (index, line) in reader.lines().enumerate() {
        let line = line.context("Failed to read article line")?;
        if line.trim().is_empty() {
            continue;
        }
        match serde_json::from_str::<Article>(&line) {
            Ok(article) => articles.push(article),
            Err(e) => warn!(line = index + 1, error = %e, "Skipping malformed article"),
        }
    }

    Ok(articles)
}

pub fn analyze(
    config: &Config,
    file: Option<&Path>,
    url: String,
    title: String,
    pretty: bool,
) -> Result<()> {
    let text = read_input(file)?;
    let analyzer = ArticleAnalyzer::from_config(config).context("Failed to build analyzer")?;

    let profile = analyzer.analyze(&Article { url, title, text });

    let json = if pretty {
        serde_json::to_string_pretty(&profile)?
    } else {
        serde_json::to_string(&profile)?
    };
    println!("{}", json);
    Ok(())
}

pub fn batch(config: &Config, input: Option<&Path>) -> Result<()> {
    let articles = match input {
        Some(path) => {
            let file = fs::File::open(path)
                .with_context(|| format!("Failed to open {}", path.display()))?;
            read_articles(BufReader::new(file))?
        }
        None => read_articles(io::stdin().lock())?,
    };

    let analyzer = ArticleAnalyzer::from_config(config).context("Failed to build analyzer")?;
    let store = InMemoryVerdictStore::new();

    let profiles = analyzer.analyze_batch(&articles);

    let stdout = io::stdout();
    let mut out = stdout.lock();
    let mut high_framing = 0usize;
    let mut disagreements = 0usize;

    for profile in profiles {
        if profile.framing.framing_bias == BiasLevel::High {
            high_framing += 1;
        }
        if !profile.sentiment.agreement {
            disagreements += 1;
        }
        writeln!(out, "{}", serde_json::to_string(&profile)?)?;
        store.put(profile)?;
    }

    info!(
        articles = articles.len(),
        stored = store.len()?,
        high_framing,
        disagreements,
        "Batch complete"
    );
    Ok(())
}

pub fn print_config(config: &Config, dir: Option<&Path>) -> Result<()> {
    for (file, present) in check_modular_files(dir.map(Path::to_path_buf)) {
        info!(file = %file, present, "Config file");
    }
    println!("{}", serde_json::to_string_pretty(config)?);
    Ok(())
}
