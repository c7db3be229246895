use tracing::{info, warn};

use crate::chart::{Chart, Difficulty, DifficultyInfo, LaneLayout, Note, SongMeta, round_millis};
use crate::config::LevelTable;

/// Wraps placed notes with song metadata into a finished chart.
#[derive(Debug, Clone)]
pub struct ChartAssembler {
    meta: SongMeta,
    levels: LevelTable,
    layout: LaneLayout,
}

impl ChartAssembler {
    pub fn new(meta: SongMeta, levels: LevelTable, layout: LaneLayout) -> Self {
        Self {
            meta,
            levels,
            layout,
        }
    }

    /// Merge `primary` and `overlay`, drop out-of-layout notes and sort.
    pub fn assemble(
        &self,
        difficulty: Difficulty,
        bpm: f64,
        offset: f64,
        primary: Vec<Note>,
        overlay: Vec<Note>,
    ) -> Chart {
        let mut notes = primary;
        notes.extend(overlay);

        let before = notes.len();
        notes.retain(|n| self.layout.contains(n.lane));
        if notes.len() < before {
            warn!(
                "{}: dropped {} notes outside the {}-lane layout",
                difficulty,
                before - notes.len(),
                self.layout.lane_count()
            );
        }
        notes.sort_by(Note::chart_order);

        let chart = Chart {
            title: self.meta.title.clone(),
            artist: self.meta.artist.clone(),
            bpm: bpm.round(),
            offset: round_millis(offset),
            audio_file: self.meta.audio_file.clone(),
            difficulty: DifficultyInfo {
                name: difficulty,
                level: self.levels.level(difficulty),
            },
            notes,
        };

        info!(
            "Assembled {} [{} {}]: {} notes ({} holds, {} scratches)",
            chart.title,
            difficulty,
            chart.difficulty.level,
            chart.note_count(),
            chart.hold_count(),
            chart.scratch_count()
        );
        chart
    }
}
