//! Template command: charts from a section structure at a fixed tempo.

use std::path::Path;

use anyhow::{Context, Result};
use keyfall_core::{
    ChartPipeline, Difficulty, GeneratorConfig, SectionPlanner, SongMeta, load_sections,
};

use crate::cli::{OutputArgs, SongArgs};
use crate::cli_utils;

#[allow(clippy::too_many_arguments)]
pub fn run(
    config: GeneratorConfig,
    bpm: f64,
    duration: f64,
    offset: f64,
    sections: Option<&Path>,
    base: Difficulty,
    song: &SongArgs,
    output: &OutputArgs,
) -> Result<()> {
    eprintln!("keyfall {} - Template Mode", env!("CARGO_PKG_VERSION"));

    let sections = match sections {
        Some(path) => load_sections(path)
            .with_context(|| format!("Failed to read sections {}", path.display()))?,
        None => SectionPlanner::builtin_template(),
    };

    let title = song
        .title
        .clone()
        .or_else(|| output.stem.clone())
        .unwrap_or_else(|| "untitled".to_string());
    let stem = cli_utils::stem(output, None, &title);
    let artist = song
        .artist
        .clone()
        .unwrap_or_else(|| cli_utils::DEFAULT_ARTIST.to_string());

    let pipeline = ChartPipeline::new(config, SongMeta::new(title, artist, &song.audio))?;
    let tiers = pipeline.from_template(
        &sections,
        bpm,
        duration,
        offset,
        base,
        &cli_utils::difficulties(output),
    )?;

    cli_utils::write_tiers(tiers, &output.out_dir, &stem)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use keyfall_core::load_chart;
    use std::path::PathBuf;
    use tempfile::TempDir;

    #[test]
    fn test_template_writes_every_tier() {
        let dir = TempDir::new().unwrap();
        let song = SongArgs {
            title: Some("午前四時の宮殿".to_string()),
            artist: None,
            audio: "assets/sounds/gozen4ji.mp3".to_string(),
        };
        let output = OutputArgs {
            difficulties: vec![],
            out_dir: dir.path().join("charts"),
            stem: Some("gozen4ji".to_string()),
        };
        let config = GeneratorConfig {
            seed: Some(42),
            ..Default::default()
        };

        run(config, 134.0, 248.0, 1.0, None, Difficulty::Another, &song, &output).unwrap();

        for suffix in ["beginner", "normal", "hyper", "another"] {
            let path: PathBuf = output.out_dir.join(format!("gozen4ji_{}.json", suffix));
            let chart = load_chart(&path).unwrap();
            assert_eq!(chart.title, "午前四時の宮殿");
            assert_eq!(chart.bpm, 134.0);
            assert!(chart.note_count() > 0);
        }
    }

    #[test]
    fn test_bad_bpm_fails_before_writing() {
        let dir = TempDir::new().unwrap();
        let song = SongArgs {
            title: None,
            artist: None,
            audio: "a.mp3".to_string(),
        };
        let output = OutputArgs {
            difficulties: vec![Difficulty::Hyper],
            out_dir: dir.path().join("charts"),
            stem: None,
        };
        let result = run(
            GeneratorConfig::default(),
            0.0,
            248.0,
            1.0,
            None,
            Difficulty::Another,
            &song,
            &output,
        );
        assert!(result.is_err());
        assert!(!output.out_dir.exists());
    }
}
