//! Derives a difficulty tier from a fuller base chart.

use rand::Rng;
use rand::seq::index;
use tracing::{debug, warn};

use crate::chart::{DifficultyProfile, LaneLayout, Note};
use crate::config::projection::{COMPANION_LANE_STEPS, COMPANION_PROBABILITY};
use crate::error::Result;
use crate::generate::ConflictResolver;

pub struct DifficultyProjector<'a> {
    profile: &'a DifficultyProfile,
    layout: LaneLayout,
    resolver: ConflictResolver,
}

impl<'a> DifficultyProjector<'a> {
    pub fn new(
        profile: &'a DifficultyProfile,
        layout: LaneLayout,
        resolver: ConflictResolver,
    ) -> Result<Self> {
        profile.validate(layout)?;
        Ok(Self {
            profile,
            layout,
            resolver,
        })
    }

    /// Project `base` notes onto this tier. The result is in chart order.
    pub fn project(&self, base: &[Note], rng: &mut impl Rng) -> Vec<Note> {
        let mut notes = self.subsample(base, rng);
        let sampled = notes.len();

        if !self.profile.allow_holds {
            notes = self.strip_holds_and_scratches(notes, rng);
        }
        let retained = notes.len();

        if self.profile.densify {
            self.add_companions(&mut notes, rng);
        }

        notes.sort_by(Note::chart_order);
        debug!(
            "{}: projected {} -> {} sampled, {} retained, {} after densify",
            self.profile.difficulty,
            base.len(),
            sampled,
            retained,
            notes.len()
        );
        notes
    }

    /// Uniform sample of `round(len * note_reduction)` notes, without
    /// replacement, in base order.
    fn subsample(&self, base: &[Note], rng: &mut impl Rng) -> Vec<Note> {
        let count = ((base.len() as f64 * self.profile.note_reduction).round() as usize)
            .min(base.len());
        let mut picked = index::sample(rng, base.len(), count).into_vec();
        picked.sort_unstable();
        picked.into_iter().map(|i| base[i]).collect()
    }

    /// Holds become taps; scratches move to a free key lane, or are dropped
    /// when every key lane is taken at that moment.
    fn strip_holds_and_scratches(&self, notes: Vec<Note>, rng: &mut impl Rng) -> Vec<Note> {
        let (scratches, keys): (Vec<Note>, Vec<Note>) =
            notes.into_iter().partition(|n| n.is_scratch());
        let mut kept: Vec<Note> = keys.into_iter().map(Note::into_tap).collect();
        let mut dropped = 0usize;

        for scratch in scratches {
            let free: Vec<u8> = self
                .layout
                .playable_lanes()
                .filter(|&lane| !self.resolver.conflicts_on_lane(scratch.time, lane, &kept))
                .collect();
            if free.is_empty() {
                dropped += 1;
                continue;
            }
            let lane = free[rng.random_range(0..free.len())];
            kept.push(Note::tap(scratch.time, lane));
        }

        if dropped > 0 {
            warn!(
                "{}: dropped {} scratch notes with no free key lane",
                self.profile.difficulty, dropped
            );
        }
        kept
    }

    /// Companion taps turning single notes into chords.
    fn add_companions(&self, notes: &mut Vec<Note>, rng: &mut impl Rng) {
        let playable = self.layout.playable_count();
        let mut skipped = 0usize;

        for i in 0..notes.len() {
            let note = notes[i];
            if note.lane >= self.layout.scratch_lane() {
                continue;
            }
            if !rng.random_bool(COMPANION_PROBABILITY) {
                continue;
            }
            let step = COMPANION_LANE_STEPS[rng.random_range(0..COMPANION_LANE_STEPS.len())];
            let lane = ((u16::from(note.lane) + u16::from(step)) % u16::from(playable)) as u8;
            let companion = Note::tap(note.time, lane);
            if self.resolver.note_conflicts(&companion, notes) {
                skipped += 1;
                continue;
            }
            notes.push(companion);
        }

        debug!(
            "{}: skipped {} companion notes on occupied lanes",
            self.profile.difficulty, skipped
        );
    }
}
