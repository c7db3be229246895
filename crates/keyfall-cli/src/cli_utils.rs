//! Common CLI utility functions shared across commands.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use keyfall_core::{Difficulty, GeneratedTier, GeneratorConfig, save_chart};
use owo_colors::OwoColorize;
use tracing::{error, info};

use crate::cli::{Args, OutputArgs};

/// Config file picked up from the working directory when `--config` is absent.
pub const DEFAULT_CONFIG_FILE: &str = "keyfall.toml";

pub const DEFAULT_ARTIST: &str = "Unknown";

/// Load the generator config and apply command-line overrides.
pub fn load_config(args: &Args) -> Result<GeneratorConfig> {
    let mut config = match &args.config {
        Some(path) => GeneratorConfig::load(path)
            .with_context(|| format!("Failed to load config {}", path.display()))?,
        None if Path::new(DEFAULT_CONFIG_FILE).exists() => {
            info!("Using {}", DEFAULT_CONFIG_FILE);
            GeneratorConfig::load(DEFAULT_CONFIG_FILE)
                .with_context(|| format!("Failed to load config {}", DEFAULT_CONFIG_FILE))?
        }
        None => GeneratorConfig::default(),
    };

    if let Some(seed) = args.seed {
        config.seed = Some(seed);
    }
    if let Some(lanes) = args.lanes {
        config.lane_count = lanes;
        // Keep the default chord pool usable on narrow layouts
        if config.chord_pool >= lanes {
            config.chord_pool = lanes.saturating_sub(1).max(1);
        }
    }
    if let Some(kind) = args.level_table {
        config.level_table = kind;
    }
    config.validate().context("Invalid generator config")?;
    Ok(config)
}

/// Requested tiers, or all four when none were given.
pub fn difficulties(output: &OutputArgs) -> Vec<Difficulty> {
    if output.difficulties.is_empty() {
        return Difficulty::all();
    }
    let mut list = output.difficulties.clone();
    list.sort();
    list.dedup();
    list
}

/// File name stem: `--stem`, else the input file's stem, else the title.
pub fn stem(output: &OutputArgs, input: Option<&Path>, title: &str) -> String {
    if let Some(stem) = &output.stem {
        return stem.clone();
    }
    input
        .and_then(|p| p.file_stem())
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| title.to_string())
}

/// Write every successful tier and print a summary.
///
/// A failed tier is reported and skipped; the others are still written.
/// Returns an error after writing if any tier failed.
pub fn write_tiers(tiers: Vec<GeneratedTier>, out_dir: &Path, stem: &str) -> Result<Vec<PathBuf>> {
    let mut written = Vec::new();
    let mut failed = 0usize;

    eprintln!("{}", "━".repeat(50).dimmed());
    for tier in tiers {
        let label = colored_difficulty(tier.difficulty);
        match tier.chart {
            Ok(chart) => match save_chart(out_dir, stem, &chart) {
                Ok(path) => {
                    eprintln!(
                        "  {:<18} Lv.{:<3} {:>5} notes  {:>4} holds  {:>4} scratch  {}",
                        label,
                        chart.difficulty.level,
                        chart.note_count(),
                        chart.hold_count(),
                        chart.scratch_count(),
                        path.display().dimmed()
                    );
                    written.push(path);
                }
                Err(e) => {
                    error!("Failed to write {} chart: {}", tier.difficulty, e);
                    eprintln!("  {:<18} {}", label, format!("write failed: {}", e).red());
                    failed += 1;
                }
            },
            Err(e) => {
                error!("Failed to generate {} chart: {}", tier.difficulty, e);
                eprintln!("  {:<18} {}", label, format!("{}", e).red());
                failed += 1;
            }
        }
    }
    eprintln!("{}", "━".repeat(50).dimmed());

    if failed > 0 {
        bail!("{} of {} tiers failed", failed, failed + written.len());
    }
    Ok(written)
}

/// Difficulty name in its tier color
pub fn colored_difficulty(difficulty: Difficulty) -> String {
    let (r, g, b) = difficulty.rgb();
    difficulty.name().truecolor(r, g, b).to_string()
}
