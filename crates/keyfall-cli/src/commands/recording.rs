//! Recording command: chord charts from manually recorded timings.

use std::path::Path;

use anyhow::{Context, Result, bail};
use keyfall_core::{
    ChartPipeline, Difficulty, GeneratorConfig, RecordingFile, SongMeta, TimingData,
    TimingSource,
};
use tracing::info;

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
    eprintln!("keyfall {} - Recording Mode", env!("CARGO_PKG_VERSION"));

    let source = RecordingFile::new(input);
    let TimingData::Recording(recording) = source
        .fetch()
        .with_context(|| format!("Failed to read {}", input.display()))?
    else {
        bail!("{} is not a recording", source.describe());
    };
    info!(
        "Found {} recorded timings in {}",
        recording.recorded_timings.len(),
        source.describe()
    );

    let stem = cli_utils::stem(output, Some(input), "chart");
    let title = song
        .title
        .clone()
        .or_else(|| recording.title.clone())
        .unwrap_or_else(|| stem.clone());
    let artist = song
        .artist
        .clone()
        .or_else(|| recording.artist.clone())
        .unwrap_or_else(|| cli_utils::DEFAULT_ARTIST.to_string());

    let pipeline = ChartPipeline::new(config, SongMeta::new(title, artist, &song.audio))?;
    let tiers = pipeline
        .from_recording(
            &recording,
            &cli_utils::difficulties(output),
            derivation(project_from),
        )
        .with_context(|| format!("Failed to generate charts from {}", input.display()))?;

    cli_utils::write_tiers(tiers, &output.out_dir, &stem)?;
    Ok(())
}
