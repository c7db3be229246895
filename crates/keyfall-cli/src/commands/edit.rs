//! Edit command: pure chart edits applied to existing chart files.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use keyfall_core::chart::{remap_lanes, remove_scratch, with_audio_file};
use keyfall_core::{Chart, LaneLayout, load_chart, write_chart};
use owo_colors::OwoColorize;

use crate::cli::EditAction;

/// `layout` is the lane layout the charts are currently in.
pub fn run(action: EditAction, layout: LaneLayout) -> Result<()> {
    match action {
        EditAction::RemoveScratch { files, output } => {
            apply(&files, output.as_deref(), |chart| remove_scratch(chart, layout))
        }
        EditAction::RemapLanes {
            files,
            from,
            to,
            output,
        } => {
            let from = LaneLayout::new(from).context("Invalid --from lane count")?;
            let to = LaneLayout::new(to).context("Invalid --to lane count")?;
            apply(&files, output.as_deref(), |chart| remap_lanes(chart, from, to))
        }
        EditAction::SetAudio {
            files,
            audio,
            output,
        } => apply(&files, output.as_deref(), |chart| {
            with_audio_file(chart, audio.as_str())
        }),
    }
}

/// Load, edit and write back each file (or write the single file to `output`).
fn apply(files: &[PathBuf], output: Option<&Path>, edit: impl Fn(&Chart) -> Chart) -> Result<()> {
    if output.is_some() && files.len() != 1 {
        bail!("--output needs exactly one input file, got {}", files.len());
    }

    for file in files {
        let chart =
            load_chart(file).with_context(|| format!("Failed to read {}", file.display()))?;
        let edited = edit(&chart);
        let target = output.unwrap_or(file);
        write_chart(target, &edited)
            .with_context(|| format!("Failed to write {}", target.display()))?;
        eprintln!(
            "{} {}: {} -> {} notes",
            "Updated".green(),
            target.display(),
            chart.note_count(),
            edited.note_count()
        );
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use keyfall_core::{Difficulty, DifficultyInfo, Note};
    use tempfile::TempDir;

    fn write_test_chart(dir: &Path, name: &str) -> PathBuf {
        let chart = Chart {
            title: "午前四時の宮殿".to_string(),
            artist: "Unknown".to_string(),
            bpm: 134.0,
            offset: 1.0,
            audio_file: "assets/sounds/gozen4ji.mp3".to_string(),
            difficulty: DifficultyInfo {
                name: Difficulty::Hyper,
                level: 8,
            },
            notes: vec![
                Note::tap(1.0, 0),
                Note::tap(1.5, 6),
                Note::scratch(2.0, 7),
            ],
        };
        let path = dir.join(name);
        write_chart(&path, &chart).unwrap();
        path
    }

    #[test]
    fn test_remove_scratch_in_place() {
        let dir = TempDir::new().unwrap();
        let path = write_test_chart(dir.path(), "gozen4ji_hyper.json");

        let action = EditAction::RemoveScratch {
            files: vec![path.clone()],
            output: None,
        };
        run(action, LaneLayout::seven_key()).unwrap();
        assert_eq!(load_chart(&path).unwrap().scratch_count(), 0);
    }

    #[test]
    fn test_remap_to_output_file() {
        let dir = TempDir::new().unwrap();
        let path = write_test_chart(dir.path(), "gozen4ji_hyper.json");
        let out = dir.path().join("six_key.json");

        let action = EditAction::RemapLanes {
            files: vec![path.clone()],
            from: 8,
            to: 7,
            output: Some(out.clone()),
        };
        run(action, LaneLayout::seven_key()).unwrap();

        let lanes: Vec<u8> = load_chart(&out).unwrap().notes.iter().map(|n| n.lane).collect();
        assert_eq!(lanes, vec![0, 5, 6]);
        // Source untouched
        assert_eq!(load_chart(&path).unwrap().notes[2].lane, 7);
    }

    #[test]
    fn test_set_audio_on_several_files() {
        let dir = TempDir::new().unwrap();
        let files = vec![
            write_test_chart(dir.path(), "a_hyper.json"),
            write_test_chart(dir.path(), "a_another.json"),
        ];
        let action = EditAction::SetAudio {
            files: files.clone(),
            audio: "assets/sounds/cryinggirl.wav".to_string(),
            output: None,
        };
        run(action, LaneLayout::seven_key()).unwrap();
        for file in files {
            assert_eq!(
                load_chart(&file).unwrap().audio_file,
                "assets/sounds/cryinggirl.wav"
            );
        }
    }

    #[test]
    fn test_output_with_many_files_is_rejected() {
        let dir = TempDir::new().unwrap();
        let action = EditAction::RemoveScratch {
            files: vec![
                write_test_chart(dir.path(), "a.json"),
                write_test_chart(dir.path(), "b.json"),
            ],
            output: Some(dir.path().join("out.json")),
        };
        assert!(run(action, LaneLayout::seven_key()).is_err());
    }
}
