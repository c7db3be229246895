//! Configuration and tuning constants.
//!
//! This module contains:
//! - `GeneratorConfig` - TOML-backed generator configuration
//! - `LevelTable` - level per difficulty
//! - Placement, projection and timing constants

mod generator;
mod levels;

pub use generator::*;
pub use levels::*;

/// Note placement constants.
pub mod placement {
    /// Notes closer than this on the same lane (or any lane, for the melody
    /// overlay) conflict.
    pub const CONFLICT_WINDOW_SECS: f64 = 0.1;

    /// Probability that a non-scratch grid note becomes a hold.
    pub const HOLD_PROBABILITY: f64 = 0.1;

    /// Hold lengths in beats for grid holds.
    pub const HOLD_BEATS: [f64; 2] = [1.0, 2.0];

    /// Every Nth onset feeds the melody overlay.
    pub const MELODY_ONSET_STRIDE: usize = 3;

    /// Nothing is placed in the last second of a song.
    pub const END_MARGIN_SECS: f64 = 1.0;
}

/// Section pattern constants.
pub mod pattern {
    /// Sub-beats per beat walked inside a section.
    pub const SUB_BEATS_PER_BEAT: f64 = 4.0;

    pub const STEADY_HOLD_PROBABILITY: f64 = 0.1;
    pub const DENSE_SECOND_NOTE_PROBABILITY: f64 = 0.3;
    pub const DENSE_SCRATCH_PROBABILITY: f64 = 0.15;

    /// Hold length in beats for sustained sections.
    pub const SUSTAINED_HOLD_BEATS: f64 = 4.0;

    /// Scratch rush before dense sections: starts this many beats early.
    pub const RUSH_LEAD_BEATS: f64 = 4.0;
    pub const RUSH_SCRATCHES: usize = 4;

    /// Finale run: taps at eighth-beat spacing ending the song.
    pub const FINALE_NOTES: usize = 16;
    pub const FINALE_LEAD_SECS: f64 = 8.0;
}

/// Difficulty projection constants.
pub mod projection {
    /// Probability of adding a companion note in densified tiers.
    pub const COMPANION_PROBABILITY: f64 = 0.2;

    /// Lane distances tried for companion notes.
    pub const COMPANION_LANE_STEPS: [u8; 2] = [2, 3];
}

/// Timing input constants.
pub mod timing {
    /// Offset used when an analysis has no beats.
    pub const FALLBACK_OFFSET_SECS: f64 = 0.5;

    /// Default lane pool size for recorded timing tracks.
    pub const DEFAULT_CHORD_POOL: u8 = 6;

    /// Recordings carry no tempo of their own unless the editor saved one.
    pub const RECORDING_DEFAULT_BPM: f64 = 120.0;
    pub const RECORDING_DEFAULT_OFFSET_SECS: f64 = 0.0;

    /// Lead-in before the first section of a template chart.
    pub const TEMPLATE_OFFSET_SECS: f64 = 1.0;
}
