//! Chart-related types and data structures.
//!
//! This module contains:
//! - `Difficulty` - difficulty tiers (BEGINNER, NORMAL, HYPER, ANOTHER)
//! - `LaneLayout` - lane count and scratch lane
//! - `Note`, `NoteKind` - timed notes
//! - `Chart`, `SongMeta` - finished charts and their metadata
//! - `DifficultyProfile` - generation parameters per tier
//! - Pure chart edits (`remove_scratch`, `remap_lanes`, `with_audio_file`)

mod difficulty;
mod edit;
mod lanes;
mod note;
mod profile;
mod types;

pub use difficulty::*;
pub use edit::*;
pub use lanes::*;
pub use note::*;
pub use profile::{DifficultyProfile, MAX_CHORD_LEVEL};
pub use types::*;

pub(crate) use profile::check_unit;
