//! CLI argument definitions for keyfall.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use keyfall_core::config::timing::TEMPLATE_OFFSET_SECS;
use keyfall_core::{Difficulty, LevelTableKind};

#[derive(Parser)]
#[command(name = "keyfall")]
#[command(about = "Rhythm game chart generator", version)]
pub struct Args {
    /// Generator config file (TOML, defaults to ./keyfall.toml when present)
    #[arg(long, value_name = "FILE", env = "KEYFALL_CONFIG", global = true)]
    pub config: Option<PathBuf>,

    /// Master seed for reproducible charts
    #[arg(long, global = true)]
    pub seed: Option<u64>,

    /// Lane count including the scratch lane (8 = 7 keys + scratch)
    #[arg(long, global = true)]
    pub lanes: Option<u8>,

    /// Level table written into charts (canonical, legacy)
    #[arg(long, global = true)]
    pub level_table: Option<LevelTableKind>,

    #[command(subcommand)]
    pub command: Command,
}

/// Song metadata written into every chart
#[derive(clap::Args, Debug, Clone)]
pub struct SongArgs {
    /// Song title (defaults to the recording's title, then the file name)
    #[arg(long)]
    pub title: Option<String>,
    /// Song artist (defaults to the recording's artist, then "Unknown")
    #[arg(long)]
    pub artist: Option<String>,
    /// Audio file reference, e.g. assets/sounds/gozen4ji.mp3
    #[arg(long)]
    pub audio: String,
}

/// Where and which charts to write
#[derive(clap::Args, Debug, Clone)]
pub struct OutputArgs {
    /// Difficulty to generate (repeatable, defaults to all four)
    #[arg(long = "difficulty", short = 'd', value_name = "DIFFICULTY")]
    pub difficulties: Vec<Difficulty>,
    /// Output directory
    #[arg(long, default_value = "charts")]
    pub out_dir: PathBuf,
    /// File name stem; charts are written as <stem>_<difficulty>.json
    #[arg(long)]
    pub stem: Option<String>,
}

#[derive(Subcommand)]
pub enum Command {
    /// Generate charts from a beat/onset analysis
    Analysis {
        /// Analysis JSON file
        #[arg(long, short)]
        input: PathBuf,
        /// Generate this tier once and project the others from it
        #[arg(long, value_name = "DIFFICULTY")]
        project_from: Option<Difficulty>,
        #[command(flatten)]
        song: SongArgs,
        #[command(flatten)]
        output: OutputArgs,
    },
    /// Generate chord charts from manually recorded timings
    Recording {
        /// Raw recording JSON file
        #[arg(long, short)]
        input: PathBuf,
        /// Generate this tier once and project the others from it
        #[arg(long, value_name = "DIFFICULTY")]
        project_from: Option<Difficulty>,
        #[command(flatten)]
        song: SongArgs,
        #[command(flatten)]
        output: OutputArgs,
    },
    /// Generate charts from a section template at a fixed tempo
    Template {
        /// Tempo in beats per minute
        #[arg(long, default_value = "134")]
        bpm: f64,
        /// Song length in seconds
        #[arg(long, default_value = "248")]
        duration: f64,
        /// Chart offset in seconds
        #[arg(long, default_value_t = TEMPLATE_OFFSET_SECS)]
        offset: f64,
        /// Sections JSON file (defaults to the built-in pop song structure)
        #[arg(long, value_name = "FILE")]
        sections: Option<PathBuf>,
        /// Tier the full pattern is placed as before projection
        #[arg(long, value_name = "DIFFICULTY", default_value = "ANOTHER")]
        project_from: Difficulty,
        #[command(flatten)]
        song: SongArgs,
        #[command(flatten)]
        output: OutputArgs,
    },
    /// Edit existing chart files
    Edit {
        #[command(subcommand)]
        action: EditAction,
    },
}

#[derive(Subcommand)]
pub enum EditAction {
    /// Remove every scratch note
    RemoveScratch {
        /// Chart files to edit
        #[arg(required = true)]
        files: Vec<PathBuf>,
        /// Write to this path instead of editing in place (single file only)
        #[arg(long, short)]
        output: Option<PathBuf>,
    },
    /// Move charts to a different lane count
    RemapLanes {
        /// Chart files to edit
        #[arg(required = true)]
        files: Vec<PathBuf>,
        /// Current lane count including scratch
        #[arg(long, default_value = "8")]
        from: u8,
        /// New lane count including scratch
        #[arg(long)]
        to: u8,
        /// Write to this path instead of editing in place (single file only)
        #[arg(long, short)]
        output: Option<PathBuf>,
    },
    /// Point charts at a different audio file
    SetAudio {
        /// Chart files to edit
        #[arg(required = true)]
        files: Vec<PathBuf>,
        /// New audio file reference
        #[arg(long)]
        audio: String,
        /// Write to this path instead of editing in place (single file only)
        #[arg(long, short)]
        output: Option<PathBuf>,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_analysis() {
        let args = Args::try_parse_from([
            "keyfall",
            "--seed",
            "42",
            "analysis",
            "--input",
            "gozen4ji_analysis.json",
            "--title",
            "午前四時の宮殿",
            "--audio",
            "assets/sounds/gozen4ji.mp3",
            "-d",
            "hyper",
            "-d",
            "ANOTHER",
        ])
        .unwrap();

        assert_eq!(args.seed, Some(42));
        match args.command {
            Command::Analysis {
                input,
                project_from,
                song,
                output,
            } => {
                assert_eq!(input, PathBuf::from("gozen4ji_analysis.json"));
                assert!(project_from.is_none());
                assert_eq!(song.title.as_deref(), Some("午前四時の宮殿"));
                assert!(song.artist.is_none());
                assert_eq!(
                    output.difficulties,
                    vec![Difficulty::Hyper, Difficulty::Another]
                );
                assert_eq!(output.out_dir, PathBuf::from("charts"));
            }
            _ => panic!("Expected Analysis command"),
        }
    }

    #[test]
    fn test_parse_recording_with_projection_and_global_after_subcommand() {
        let args = Args::try_parse_from([
            "keyfall",
            "recording",
            "-i",
            "cryinggirl_raw_recording.json",
            "--audio",
            "assets/sounds/cryinggirl.wav",
            "--project-from",
            "another",
            "--lanes",
            "7",
            "--level-table",
            "legacy",
        ])
        .unwrap();

        assert_eq!(args.lanes, Some(7));
        assert_eq!(args.level_table, Some(LevelTableKind::Legacy));
        match args.command {
            Command::Recording { project_from, .. } => {
                assert_eq!(project_from, Some(Difficulty::Another));
            }
            _ => panic!("Expected Recording command"),
        }
    }

    #[test]
    fn test_parse_template_defaults() {
        let args =
            Args::try_parse_from(["keyfall", "template", "--audio", "a.mp3", "--stem", "demo"])
                .unwrap();
        match args.command {
            Command::Template {
                bpm,
                duration,
                offset,
                sections,
                project_from,
                ..
            } => {
                assert_eq!(bpm, 134.0);
                assert_eq!(duration, 248.0);
                assert_eq!(offset, 1.0);
                assert!(sections.is_none());
                assert_eq!(project_from, Difficulty::Another);
            }
            _ => panic!("Expected Template command"),
        }
    }

    #[test]
    fn test_parse_edit_remap() {
        let args = Args::try_parse_from([
            "keyfall",
            "edit",
            "remap-lanes",
            "charts/gozen4ji_hyper.json",
            "charts/gozen4ji_another.json",
            "--to",
            "7",
        ])
        .unwrap();
        match args.command {
            Command::Edit {
                action: EditAction::RemapLanes { files, from, to, .. },
            } => {
                assert_eq!(files.len(), 2);
                assert_eq!(from, 8);
                assert_eq!(to, 7);
            }
            _ => panic!("Expected Edit RemapLanes command"),
        }
    }

    #[test]
    fn test_unknown_difficulty_is_rejected() {
        let result = Args::try_parse_from([
            "keyfall",
            "template",
            "--audio",
            "a.mp3",
            "-d",
            "LEGGENDARIA",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn test_edit_requires_files() {
        assert!(Args::try_parse_from(["keyfall", "edit", "remove-scratch"]).is_err());
    }
}
