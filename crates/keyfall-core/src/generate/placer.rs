//! Beat-grid note placement for analysis-derived charts.

use rand::Rng;
use tracing::debug;

use crate::chart::{DifficultyProfile, LaneLayout, Note};
use crate::config::placement::{
    END_MARGIN_SECS, HOLD_BEATS, HOLD_PROBABILITY, MELODY_ONSET_STRIDE,
};
use crate::config::timing::FALLBACK_OFFSET_SECS;
use crate::error::Result;
use crate::generate::ConflictResolver;
use crate::timing::AnalysisTiming;

/// Notes placed for one chart, before assembly.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Placement {
    /// Beat-grid notes, in placement order.
    pub grid: Vec<Note>,
    /// Melody notes taken from onsets.
    pub overlay: Vec<Note>,
    /// First beat time, used as the chart offset.
    pub offset: f64,
}

/// Places notes on the beat grid of an analysis, then lays a melody line
/// over the gaps using detected onsets.
pub struct NotePlacer<'a> {
    profile: &'a DifficultyProfile,
    layout: LaneLayout,
    resolver: ConflictResolver,
}

impl<'a> NotePlacer<'a> {
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

    pub fn place(&self, analysis: &AnalysisTiming, rng: &mut impl Rng) -> Result<Placement> {
        analysis.validate()?;

        let grid = self.place_grid(analysis, rng);
        let offset = analysis
            .beat_times
            .first()
            .copied()
            .unwrap_or(FALLBACK_OFFSET_SECS);
        let overlay = self.place_melody(analysis, offset, &grid, rng);

        Ok(Placement {
            grid,
            overlay,
            offset,
        })
    }

    fn place_grid(&self, analysis: &AnalysisTiming, rng: &mut impl Rng) -> Vec<Note> {
        let interval = analysis.beat_interval();
        let divisor = self.profile.beat_divisor;
        let limit = analysis.duration - END_MARGIN_SECS;
        let scratch = self.layout.scratch_lane();

        let mut notes = Vec::new();
        let mut last_lane: Option<u8> = None;
        let mut collisions = 0usize;

        for (i, &beat) in analysis.beat_times.iter().enumerate() {
            if beat >= limit {
                break;
            }

            for s in 0..divisor {
                // Downbeats always, off-beats only on even beats
                if !(s == 0 || (i % 2 == 0 && s % 2 == 0)) {
                    continue;
                }
                let time = beat + f64::from(s) * interval / f64::from(divisor);

                let picked = self.pick_lane(last_lane, rng);
                let lane = if rng.random_bool(self.profile.scratch_frequency) {
                    scratch
                } else {
                    picked
                };

                let note = if lane == scratch {
                    Note::scratch(time, lane)
                } else if rng.random_bool(HOLD_PROBABILITY) {
                    let beats = HOLD_BEATS[rng.random_range(0..HOLD_BEATS.len())];
                    Note::hold(time, lane, interval * beats)
                } else {
                    Note::tap(time, lane)
                };

                if self.resolver.note_conflicts(&note, &notes) {
                    collisions += 1;
                    continue;
                }
                if lane != scratch {
                    last_lane = Some(lane);
                }
                notes.push(note);
            }
        }

        debug!(
            "{}: placed {} grid notes, dropped {} lane collisions",
            self.profile.difficulty,
            notes.len(),
            collisions
        );
        notes
    }

    /// Uniform lane in `0..lane_variety`, excluding the previous lane.
    fn pick_lane(&self, last_lane: Option<u8>, rng: &mut impl Rng) -> u8 {
        let variety = self.profile.lane_variety;
        match last_lane {
            Some(last) if last < variety => {
                let lane = rng.random_range(0..variety - 1);
                if lane >= last { lane + 1 } else { lane }
            }
            _ => rng.random_range(0..variety),
        }
    }

    fn place_melody(
        &self,
        analysis: &AnalysisTiming,
        offset: f64,
        grid: &[Note],
        rng: &mut impl Rng,
    ) -> Vec<Note> {
        let limit = analysis.duration - END_MARGIN_SECS;
        let mut overlay = Vec::new();
        let mut suppressed = 0usize;

        for &onset in analysis.onset_times.iter().step_by(MELODY_ONSET_STRIDE) {
            if onset <= offset || onset >= limit {
                continue;
            }
            if self.resolver.conflicts(onset, grid) || self.resolver.conflicts(onset, &overlay) {
                suppressed += 1;
                continue;
            }
            let lane = rng.random_range(self.layout.playable_lanes());
            // A grid hold may still be sounding on the drawn lane
            if self.resolver.conflicts_on_lane(onset, lane, grid) {
                suppressed += 1;
                continue;
            }
            overlay.push(Note::tap(onset, lane));
        }

        debug!(
            "{}: placed {} melody notes, suppressed {} conflicting onsets",
            self.profile.difficulty,
            overlay.len(),
            suppressed
        );
        overlay
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chart::Difficulty;
    use crate::config::LevelTable;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn make_analysis() -> AnalysisTiming {
        let bpm = 134.0;
        let interval = 60.0 / bpm;
        AnalysisTiming {
            bpm,
            duration: 60.0,
            beat_times: (0..120).map(|i| 1.0 + i as f64 * interval).collect(),
            onset_times: (0..400).map(|i| 1.03 + i as f64 * 0.137).collect(),
            sample_rate: Some(22050),
        }
    }

    fn profile(difficulty: Difficulty) -> DifficultyProfile {
        DifficultyProfile::preset(difficulty, LaneLayout::seven_key(), &LevelTable::canonical())
    }

    #[test]
    fn test_beginner_places_one_note_per_beat() {
        let profile = profile(Difficulty::Beginner);
        let placer =
            NotePlacer::new(&profile, LaneLayout::seven_key(), ConflictResolver::default())
                .unwrap();
        let analysis = make_analysis();
        let mut rng = StdRng::seed_from_u64(7);
        let placement = placer.place(&analysis, &mut rng).unwrap();

        let eligible = analysis
            .beat_times
            .iter()
            .filter(|&&b| b < analysis.duration - 1.0)
            .count();
        // Divisor 1: every eligible beat is a candidate; holds never exceed
        // two beats, so collisions can only shave off a few.
        assert!(placement.grid.len() <= eligible);
        assert!(placement.grid.len() + 15 >= eligible);
        assert_eq!(placement.offset, 1.0);
    }

    #[test]
    fn test_grid_lanes_within_variety_or_scratch() {
        let profile = profile(Difficulty::Normal);
        let layout = LaneLayout::seven_key();
        let placer = NotePlacer::new(&profile, layout, ConflictResolver::default()).unwrap();
        let mut rng = StdRng::seed_from_u64(11);
        let placement = placer.place(&make_analysis(), &mut rng).unwrap();

        for note in &placement.grid {
            assert!(note.lane < profile.lane_variety || note.lane == layout.scratch_lane());
            assert_eq!(note.is_scratch(), note.lane == layout.scratch_lane());
        }
        for note in &placement.overlay {
            assert!(note.lane < layout.playable_count());
        }
    }

    #[test]
    fn test_no_immediate_lane_repeat() {
        for difficulty in [Difficulty::Normal, Difficulty::Hyper, Difficulty::Another] {
            let profile = profile(difficulty);
            let layout = LaneLayout::seven_key();
            let placer = NotePlacer::new(&profile, layout, ConflictResolver::default()).unwrap();
            let mut rng = StdRng::seed_from_u64(3);
            let placement = placer.place(&make_analysis(), &mut rng).unwrap();

            let lanes: Vec<u8> = placement
                .grid
                .iter()
                .filter(|n| !layout.is_scratch(n.lane))
                .map(|n| n.lane)
                .collect();
            for pair in lanes.windows(2) {
                assert_ne!(pair[0], pair[1], "{}", difficulty);
            }
        }
    }

    #[test]
    fn test_overlay_never_near_grid_notes() {
        let profile = profile(Difficulty::Hyper);
        let placer =
            NotePlacer::new(&profile, LaneLayout::seven_key(), ConflictResolver::default())
                .unwrap();
        let mut rng = StdRng::seed_from_u64(5);
        let placement = placer.place(&make_analysis(), &mut rng).unwrap();

        for melody in &placement.overlay {
            assert!(placement.grid.iter().all(|n| (n.time - melody.time).abs() >= 0.099));
            assert!(melody.time > placement.offset);
            assert_eq!(melody.kind, crate::chart::NoteKind::Tap);
        }
    }

    #[test]
    fn test_holds_have_beat_multiple_durations() {
        let profile = profile(Difficulty::Another);
        let placer =
            NotePlacer::new(&profile, LaneLayout::seven_key(), ConflictResolver::default())
                .unwrap();
        let mut rng = StdRng::seed_from_u64(21);
        let analysis = make_analysis();
        let placement = placer.place(&analysis, &mut rng).unwrap();

        let one = (analysis.beat_interval() * 1000.0).round() / 1000.0;
        let two = (analysis.beat_interval() * 2000.0).round() / 1000.0;
        let holds: Vec<f64> = placement.grid.iter().filter_map(|n| n.duration()).collect();
        assert!(!holds.is_empty());
        assert!(holds.iter().all(|&d| d == one || d == two));
    }

    #[test]
    fn test_no_beats_uses_fallback_offset() {
        let profile = profile(Difficulty::Normal);
        let placer =
            NotePlacer::new(&profile, LaneLayout::seven_key(), ConflictResolver::default())
                .unwrap();
        let mut analysis = make_analysis();
        analysis.beat_times.clear();
        let mut rng = StdRng::seed_from_u64(1);
        let placement = placer.place(&analysis, &mut rng).unwrap();

        assert!(placement.grid.is_empty());
        assert_eq!(placement.offset, 0.5);
        assert!(!placement.overlay.is_empty());
    }

    #[test]
    fn test_zero_bpm_is_invalid_input() {
        let profile = profile(Difficulty::Normal);
        let placer =
            NotePlacer::new(&profile, LaneLayout::seven_key(), ConflictResolver::default())
                .unwrap();
        let mut analysis = make_analysis();
        analysis.bpm = 0.0;
        let mut rng = StdRng::seed_from_u64(1);
        let err = placer.place(&analysis, &mut rng).unwrap_err();
        assert!(err.is_invalid_input());
    }

    #[test]
    fn test_same_seed_same_placement() {
        let profile = profile(Difficulty::Hyper);
        let placer =
            NotePlacer::new(&profile, LaneLayout::seven_key(), ConflictResolver::default())
                .unwrap();
        let analysis = make_analysis();
        let a = placer.place(&analysis, &mut StdRng::seed_from_u64(99)).unwrap();
        let b = placer.place(&analysis, &mut StdRng::seed_from_u64(99)).unwrap();
        assert_eq!(a, b);
    }
}
