//! Section-driven pattern placement for charts built from a song template.
//!
//! Each section walks its own sub-beat grid (four per beat) and applies the
//! pattern of its style, gated by the section density. Dense sections are
//! announced by a scratch rush, and the song closes with a finale run.

use rand::Rng;
use tracing::debug;

use crate::chart::{LaneLayout, Note};
use crate::config::pattern::*;
use crate::error::{Error, Result};
use crate::generate::{ConflictResolver, PatternStyle, Section, SectionPlanner};

pub struct PatternPlacer {
    layout: LaneLayout,
    resolver: ConflictResolver,
}

impl PatternPlacer {
    pub fn new(layout: LaneLayout, resolver: ConflictResolver) -> Self {
        Self { layout, resolver }
    }

    /// Plan `sections` against the song duration, then place their notes.
    pub fn place(
        &self,
        sections: &[Section],
        bpm: f64,
        duration: f64,
        rng: &mut impl Rng,
    ) -> Result<Vec<Note>> {
        if !(bpm.is_finite() && bpm > 0.0) {
            return Err(Error::invalid("bpm", format!("must be positive, got {}", bpm)));
        }
        let sections = SectionPlanner::plan(duration, sections)?;
        let interval = 60.0 / bpm;
        let mut placed = Placed::default();

        for (i, section) in sections.iter().enumerate() {
            self.place_section(section, &sections[i + 1..], interval, &mut placed, rng);
        }
        for section in &sections {
            if section.pattern_style() == PatternStyle::Dense {
                self.place_scratch_rush(section.start, interval, &mut placed);
            }
        }
        self.place_finale(duration, interval, &mut placed);

        debug!(
            "Placed {} pattern notes over {} sections, dropped {} lane collisions",
            placed.notes.len(),
            sections.len(),
            placed.dropped
        );
        Ok(placed.notes)
    }

    /// Where `section` overlaps any of the `later` sections, the later one
    /// owns the time and this section places nothing.
    fn place_section(
        &self,
        section: &Section,
        later: &[Section],
        interval: f64,
        placed: &mut Placed,
        rng: &mut impl Rng,
    ) {
        let step = interval / SUB_BEATS_PER_BEAT;
        let count = (section.length() / interval * SUB_BEATS_PER_BEAT).floor() as usize;
        let playable = self.layout.playable_lanes();
        let even = self.layout.even_lanes();
        let style = section.pattern_style();

        for k in 0..count {
            let time = section.start + k as f64 * step;
            if time >= section.end {
                break;
            }
            if later.iter().any(|s| s.start <= time && time < s.end) {
                continue;
            }
            if !rng.random_bool(section.density) {
                continue;
            }

            match style {
                PatternStyle::Sparse => {
                    if k % 4 == 0 {
                        let lane = even[rng.random_range(0..even.len())];
                        self.push(placed, Note::tap(time, lane));
                    }
                }
                PatternStyle::Steady => {
                    if k % 2 == 0 {
                        let lane = rng.random_range(playable.clone());
                        if rng.random_bool(STEADY_HOLD_PROBABILITY) {
                            self.push(placed, Note::hold(time, lane, interval));
                        } else {
                            self.push(placed, Note::tap(time, lane));
                        }
                    }
                }
                PatternStyle::Dense => {
                    let main = rng.random_range(0..even.len());
                    self.push(placed, Note::tap(time, even[main]));

                    if rng.random_bool(DENSE_SECOND_NOTE_PROBABILITY) && even.len() > 1 {
                        let mut second = rng.random_range(0..even.len() - 1);
                        if second >= main {
                            second += 1;
                        }
                        self.push(placed, Note::tap(time, even[second]));
                    }
                    if rng.random_bool(DENSE_SCRATCH_PROBABILITY) {
                        self.push(placed, Note::scratch(time, self.layout.scratch_lane()));
                    }
                }
                PatternStyle::Sustained => {
                    if k % 8 == 0 {
                        let lane = rng.random_range(playable.clone());
                        self.push(
                            placed,
                            Note::hold(time, lane, interval * SUSTAINED_HOLD_BEATS),
                        );
                    }
                }
            }
        }
    }

    /// Scratches at half-beat spacing leading into a dense section.
    fn place_scratch_rush(&self, section_start: f64, interval: f64, placed: &mut Placed) {
        let rush_start = section_start - RUSH_LEAD_BEATS * interval;
        for i in 0..RUSH_SCRATCHES {
            let time = rush_start + i as f64 * interval / 2.0;
            if time < 0.0 {
                placed.dropped += 1;
                continue;
            }
            self.push(placed, Note::scratch(time, self.layout.scratch_lane()));
        }
    }

    /// Eighth-beat run across the key lanes just before the song ends.
    fn place_finale(&self, duration: f64, interval: f64, placed: &mut Placed) {
        let start = duration - FINALE_LEAD_SECS;
        if start < 0.0 {
            debug!("Song shorter than finale lead, skipping finale run");
            return;
        }
        let lanes = self.layout.playable_count();
        for i in 0..FINALE_NOTES {
            let time = start + i as f64 * interval / 8.0;
            let lane = (i % usize::from(lanes)) as u8;
            self.push(placed, Note::tap(time, lane));
        }
    }

    fn push(&self, placed: &mut Placed, note: Note) {
        if self.resolver.note_conflicts(&note, &placed.notes) {
            placed.dropped += 1;
        } else {
            placed.notes.push(note);
        }
    }
}

#[derive(Default)]
struct Placed {
    notes: Vec<Note>,
    dropped: usize,
}
