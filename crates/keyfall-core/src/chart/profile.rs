use serde::{Deserialize, Serialize};

use crate::chart::{Difficulty, LaneLayout};
use crate::config::LevelTable;
use crate::error::{Error, Result};

/// Highest chord preset understood by the chord generator.
pub const MAX_CHORD_LEVEL: u8 = 4;

/// Generation parameters for one difficulty tier.
///
/// Construct with [`DifficultyProfile::preset`] and adjust fields, then call
/// [`DifficultyProfile::validate`] against the chart's lane layout before use.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DifficultyProfile {
    pub difficulty: Difficulty,
    pub level: u8,
    /// Subdivisions per beat walked by the beat-grid placer.
    pub beat_divisor: u32,
    /// Lanes `0..lane_variety` are eligible in the beat-grid pass.
    pub lane_variety: u8,
    pub scratch_frequency: f64,
    /// Fraction of base notes (or recorded timings) kept.
    pub note_reduction: f64,
    /// When false, holds become taps and scratches move to key lanes.
    pub allow_holds: bool,
    /// Adds companion chord notes when projecting.
    pub densify: bool,
    /// Chord preset for recorded timing tracks (0..=4).
    pub chord_level: u8,
}

impl DifficultyProfile {
    /// Built-in profile for a difficulty on the given layout.
    ///
    /// Lane variety is capped at the layout's lane count.
    pub fn preset(difficulty: Difficulty, layout: LaneLayout, levels: &LevelTable) -> Self {
        let (beat_divisor, lane_variety, scratch_frequency, note_reduction) = match difficulty {
            Difficulty::Beginner => (1, 3, 0.1, 0.3),
            Difficulty::Normal => (2, 5, 0.15, 0.6),
            Difficulty::Hyper => (4, 7, 0.2, 0.8),
            Difficulty::Another => (8, 8, 0.25, 1.0),
        };

        Self {
            difficulty,
            level: levels.level(difficulty),
            beat_divisor,
            lane_variety: lane_variety.min(layout.lane_count()),
            scratch_frequency,
            note_reduction,
            allow_holds: difficulty != Difficulty::Beginner,
            densify: difficulty == Difficulty::Another,
            chord_level: difficulty as u8,
        }
    }

    pub fn validate(&self, layout: LaneLayout) -> Result<()> {
        let field = |name: &str| format!("profiles.{}.{}", self.difficulty, name);

        if self.level == 0 {
            return Err(Error::invalid(field("level"), "must be at least 1"));
        }
        if self.beat_divisor == 0 {
            return Err(Error::invalid(field("beat_divisor"), "must be at least 1"));
        }
        if self.lane_variety < 2 || self.lane_variety > layout.lane_count() {
            return Err(Error::invalid(
                field("lane_variety"),
                format!(
                    "must be between 2 and {}, got {}",
                    layout.lane_count(),
                    self.lane_variety
                ),
            ));
        }
        check_unit(&field("scratch_frequency"), self.scratch_frequency)?;
        check_unit(&field("note_reduction"), self.note_reduction)?;
        if self.chord_level > MAX_CHORD_LEVEL {
            return Err(Error::invalid(
                field("chord_level"),
                format!("must be at most {}, got {}", MAX_CHORD_LEVEL, self.chord_level),
            ));
        }
        Ok(())
    }
}

/// Check that a probability-like value lies in [0, 1].
pub(crate) fn check_unit(field: &str, value: f64) -> Result<()> {
    if !(0.0..=1.0).contains(&value) {
        return Err(Error::invalid(
            field,
            format!("must be within [0, 1], got {}", value),
        ));
    }
    Ok(())
}
