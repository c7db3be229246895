use serde::{Deserialize, Serialize};

use crate::chart::{Difficulty, Note};

/// Difficulty label written into a chart file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DifficultyInfo {
    pub name: Difficulty,
    pub level: u8,
}

/// Song metadata shared by every difficulty of a song
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SongMeta {
    pub title: String,
    pub artist: String,
    pub audio_file: String,
}

impl SongMeta {
    pub fn new(
        title: impl Into<String>,
        artist: impl Into<String>,
        audio_file: impl Into<String>,
    ) -> Self {
        Self {
            title: title.into(),
            artist: artist.into(),
            audio_file: audio_file.into(),
        }
    }
}

/// A playable chart for one (song, difficulty) pair.
///
/// Notes are kept sorted by time, then lane.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Chart {
    pub title: String,
    pub artist: String,
    pub bpm: f64,
    pub offset: f64,
    pub audio_file: String,
    pub difficulty: DifficultyInfo,
    pub notes: Vec<Note>,
}

impl Chart {
    pub fn note_count(&self) -> usize {
        self.notes.len()
    }

    pub fn hold_count(&self) -> usize {
        self.notes.iter().filter(|n| n.is_hold()).count()
    }

    pub fn scratch_count(&self) -> usize {
        self.notes.iter().filter(|n| n.is_scratch()).count()
    }

    /// Copy of this chart with a different note list, re-sorted.
    pub fn with_notes(&self, mut notes: Vec<Note>) -> Self {
        notes.sort_by(Note::chart_order);
        Self {
            notes,
            ..self.clone_metadata()
        }
    }

    fn clone_metadata(&self) -> Self {
        Self {
            title: self.title.clone(),
            artist: self.artist.clone(),
            bpm: self.bpm,
            offset: self.offset,
            audio_file: self.audio_file.clone(),
            difficulty: self.difficulty,
            notes: Vec::new(),
        }
    }

    /// Check that notes are in chart order.
    pub fn is_sorted(&self) -> bool {
        self.notes
            .windows(2)
            .all(|w| Note::chart_order(&w[0], &w[1]).is_le())
    }
}
