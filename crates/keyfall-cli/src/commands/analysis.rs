//! Analysis command: charts from a beat/onset analysis file.

use std::path::Path;

use anyhow::{Context, Result};
use keyfall_core::{AnalysisFile, ChartPipeline, Difficulty, GeneratorConfig, SongMeta};

use crate::cli::{OutputArgs, SongArgs};
use crate::cli_utils;
use crate::commands::derivation;

pub fn run(
    config: GeneratorConfig,
    input: &Path,
    project_from: Option<Difficulty>,
    song: &SongArgs,
    output: &OutputArgs,
) -> Result<()> {
    let stem = cli_utils::stem(output, Some(input), "chart");
    let title = song.title.clone().unwrap_or_else(|| stem.clone());
    eprintln!("keyfall {} - Analysis Mode", env!("CARGO_PKG_VERSION"));

    let artist = song
        .artist
        .clone()
        .unwrap_or_else(|| cli_utils::DEFAULT_ARTIST.to_string());

    let pipeline = ChartPipeline::new(config, SongMeta::new(title, artist, &song.audio))?;
    let source = AnalysisFile::new(input);
    let tiers = pipeline
        .run(
            &source,
            &cli_utils::difficulties(output),
            derivation(project_from),
        )
        .with_context(|| format!("Failed to generate charts from {}", input.display()))?;

    cli_utils::write_tiers(tiers, &output.out_dir, &stem)?;
    Ok(())
}
