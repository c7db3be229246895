//! End-to-end chart generation for a set of difficulty tiers.

use rand::SeedableRng;
use rand::rngs::StdRng;
use tracing::{debug, info, warn};

use crate::chart::{Chart, Difficulty, LaneLayout, Note, SongMeta};
use crate::config::{GeneratorConfig, LevelTableKind};
use crate::error::Result;
use crate::generate::{
    ChartAssembler, ChordDistribution, ChordGenerator, ConflictResolver, DifficultyProjector,
    NotePlacer, PatternPlacer, Section, select_timings,
};
use crate::timing::{AnalysisTiming, RecordedTiming, TimingData, TimingSource, check_offset};

/// Spreads per-tier seeds apart (64-bit golden ratio).
const SEED_STEP: u64 = 0x9E37_79B9_7F4A_7C15;

/// Seed streams: one per tier, one per projection base.
const TIER_STREAM: u64 = 0;
const BASE_STREAM: u64 = 1;

/// How requested tiers are derived from the timing data.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Derivation {
    /// Each tier is generated from the timing data with its own profile.
    Direct,
    /// `base` is generated once and every tier is projected from it.
    Projected { base: Difficulty },
}

/// Outcome of one requested tier. A failed tier does not affect the others.
#[derive(Debug)]
pub struct GeneratedTier {
    pub difficulty: Difficulty,
    pub chart: Result<Chart>,
}

/// Notes shared by every projected tier.
struct BaseNotes {
    notes: Vec<Note>,
    bpm: f64,
    offset: f64,
}

pub struct ChartPipeline {
    config: GeneratorConfig,
    layout: LaneLayout,
    resolver: ConflictResolver,
    assembler: ChartAssembler,
}

impl ChartPipeline {
    pub fn new(config: GeneratorConfig, meta: SongMeta) -> Result<Self> {
        config.validate()?;
        if config.level_table == LevelTableKind::Legacy {
            warn!("Using legacy level table (NORMAL=7); canonical table rates NORMAL=5");
        }
        let layout = config.layout()?;
        let resolver = ConflictResolver::new(config.conflict_window);
        let assembler = ChartAssembler::new(meta, config.levels(), layout);
        Ok(Self {
            config,
            layout,
            resolver,
            assembler,
        })
    }

    pub fn layout(&self) -> LaneLayout {
        self.layout
    }

    /// Generator for one tier. With a master seed the stream depends only on
    /// the seed and the difficulty, not on which other tiers are requested.
    pub fn tier_rng(&self, difficulty: Difficulty) -> StdRng {
        self.rng(difficulty, TIER_STREAM)
    }

    fn base_rng(&self, difficulty: Difficulty) -> StdRng {
        self.rng(difficulty, BASE_STREAM)
    }

    fn rng(&self, difficulty: Difficulty, stream: u64) -> StdRng {
        match self.config.seed {
            Some(seed) => {
                let index = stream * 4 + difficulty as u64 + 1;
                StdRng::seed_from_u64(seed.wrapping_add(index.wrapping_mul(SEED_STEP)))
            }
            None => StdRng::from_os_rng(),
        }
    }

    /// Fetch timing data from `source` and generate the requested tiers.
    pub fn run(
        &self,
        source: &impl TimingSource,
        difficulties: &[Difficulty],
        derivation: Derivation,
    ) -> Result<Vec<GeneratedTier>> {
        info!(
            "Generating {} tiers from {}",
            difficulties.len(),
            source.describe()
        );
        match source.fetch()? {
            TimingData::Analysis(analysis) => {
                self.from_analysis(&analysis, difficulties, derivation)
            }
            TimingData::Recording(recording) => {
                self.from_recording(&recording, difficulties, derivation)
            }
        }
    }

    pub fn from_analysis(
        &self,
        analysis: &AnalysisTiming,
        difficulties: &[Difficulty],
        derivation: Derivation,
    ) -> Result<Vec<GeneratedTier>> {
        analysis.validate()?;
        match derivation {
            Derivation::Direct => Ok(difficulties
                .iter()
                .map(|&difficulty| GeneratedTier {
                    difficulty,
                    chart: self
                        .place_analysis(analysis, difficulty, &mut self.tier_rng(difficulty))
                        .map(|base| self.assemble(difficulty, base)),
                })
                .collect()),
            Derivation::Projected { base } => {
                let notes = self.place_analysis(analysis, base, &mut self.base_rng(base))?;
                Ok(self.project_all(&notes, difficulties))
            }
        }
    }

    pub fn from_recording(
        &self,
        recording: &RecordedTiming,
        difficulties: &[Difficulty],
        derivation: Derivation,
    ) -> Result<Vec<GeneratedTier>> {
        let timings = recording.normalized()?;
        let (bpm, offset) = recording.tempo()?;

        match derivation {
            Derivation::Direct => Ok(difficulties
                .iter()
                .map(|&difficulty| GeneratedTier {
                    difficulty,
                    chart: self
                        .place_chords(
                            &timings,
                            bpm,
                            offset,
                            difficulty,
                            &mut self.tier_rng(difficulty),
                        )
                        .map(|base| self.assemble(difficulty, base)),
                })
                .collect()),
            Derivation::Projected { base } => {
                let notes =
                    self.place_chords(&timings, bpm, offset, base, &mut self.base_rng(base))?;
                Ok(self.project_all(&notes, difficulties))
            }
        }
    }

    /// Template charts are always projected from a full pattern placed as
    /// the `base` tier.
    pub fn from_template(
        &self,
        sections: &[Section],
        bpm: f64,
        duration: f64,
        offset: f64,
        base: Difficulty,
        difficulties: &[Difficulty],
    ) -> Result<Vec<GeneratedTier>> {
        check_offset(offset)?;
        let placer = PatternPlacer::new(self.layout, self.resolver);
        let mut notes = placer.place(sections, bpm, duration, &mut self.base_rng(base))?;
        notes.sort_by(Note::chart_order);
        let base_notes = BaseNotes { notes, bpm, offset };
        Ok(self.project_all(&base_notes, difficulties))
    }

    fn place_analysis(
        &self,
        analysis: &AnalysisTiming,
        difficulty: Difficulty,
        rng: &mut StdRng,
    ) -> Result<BaseNotes> {
        let profile = self.config.profile(difficulty)?;
        let placer = NotePlacer::new(&profile, self.layout, self.resolver)?;
        let placement = placer.place(analysis, rng)?;

        let mut notes = placement.grid;
        notes.extend(placement.overlay);
        notes.sort_by(Note::chart_order);
        Ok(BaseNotes {
            notes,
            bpm: analysis.bpm,
            offset: placement.offset,
        })
    }

    fn place_chords(
        &self,
        timings: &[f64],
        bpm: f64,
        offset: f64,
        difficulty: Difficulty,
        rng: &mut StdRng,
    ) -> Result<BaseNotes> {
        let profile = self.config.profile(difficulty)?;
        let distribution = match self.config.chord_weights {
            Some(weights) => ChordDistribution::new(weights.to_vec())?,
            None => ChordDistribution::from_level(profile.chord_level)?,
        };
        let generator = ChordGenerator::with_pool_size(self.config.chord_pool, distribution)?
            .with_resolver(self.resolver);

        let selected = select_timings(timings, profile.note_reduction);
        debug!(
            "{}: kept {} of {} recorded timings",
            difficulty,
            selected.len(),
            timings.len()
        );
        Ok(BaseNotes {
            notes: generator.generate(&selected, rng),
            bpm,
            offset,
        })
    }

    fn project_all(&self, base: &BaseNotes, difficulties: &[Difficulty]) -> Vec<GeneratedTier> {
        difficulties
            .iter()
            .map(|&difficulty| GeneratedTier {
                difficulty,
                chart: self.project(base, difficulty),
            })
            .collect()
    }

    fn project(&self, base: &BaseNotes, difficulty: Difficulty) -> Result<Chart> {
        let profile = self.config.profile(difficulty)?;
        let projector = DifficultyProjector::new(&profile, self.layout, self.resolver)?;
        let notes = projector.project(&base.notes, &mut self.tier_rng(difficulty));
        Ok(self
            .assembler
            .assemble(difficulty, base.bpm, base.offset, notes, Vec::new()))
    }

    fn assemble(&self, difficulty: Difficulty, base: BaseNotes) -> Chart {
        self.assembler
            .assemble(difficulty, base.bpm, base.offset, base.notes, Vec::new())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generate::SectionPlanner;
    use crate::timing::AnalysisFile;

    fn make_pipeline(seed: u64) -> ChartPipeline {
        let config = GeneratorConfig {
            seed: Some(seed),
            ..Default::default()
        };
        ChartPipeline::new(
            config,
            SongMeta::new("クライングガール", "Unknown", "assets/sounds/cryinggirl.wav"),
        )
        .unwrap()
    }

    fn make_recording() -> RecordedTiming {
        RecordedTiming::new((0..300).map(|i| 0.5 + i as f64 * 0.35).collect())
    }

    fn charts(tiers: Vec<GeneratedTier>) -> Vec<Chart> {
        tiers.into_iter().map(|t| t.chart.unwrap()).collect()
    }

    #[test]
    fn test_tier_independent_of_requested_set() {
        let pipeline = make_pipeline(42);
        let recording = make_recording();

        let alone = charts(
            pipeline
                .from_recording(&recording, &[Difficulty::Hyper], Derivation::Direct)
                .unwrap(),
        );
        let together = charts(
            pipeline
                .from_recording(
                    &recording,
                    &[Difficulty::Another, Difficulty::Beginner, Difficulty::Hyper],
                    Derivation::Direct,
                )
                .unwrap(),
        );
        assert_eq!(alone[0], together[2]);
    }

    #[test]
    fn test_recording_direct_tiers() {
        let pipeline = make_pipeline(7);
        let tiers = charts(
            pipeline
                .from_recording(
                    &make_recording(),
                    &[Difficulty::Beginner, Difficulty::Another],
                    Derivation::Direct,
                )
                .unwrap(),
        );

        let beginner = &tiers[0];
        assert_eq!(beginner.bpm, 120.0);
        assert_eq!(beginner.offset, 0.0);
        // Chord level 0: single notes on a reduced set of timings.
        assert_eq!(beginner.note_count(), 90);
        assert!(beginner.notes.iter().all(|n| n.lane < 6));

        let another = &tiers[1];
        assert!(another.note_count() > 300);
        assert!(another.is_sorted());
    }

    #[test]
    fn test_empty_recording_is_invalid() {
        let pipeline = make_pipeline(1);
        let err = pipeline
            .from_recording(&RecordedTiming::new(vec![]), &[Difficulty::Hyper], Derivation::Direct)
            .unwrap_err();
        assert!(err.is_invalid_input());
    }

    #[test]
    fn test_recording_with_bad_tempo_is_invalid() {
        let pipeline = make_pipeline(1);
        let recording = RecordedTiming {
            bpm: Some(0.0),
            offset: Some(-3.0),
            ..make_recording()
        };
        let err = pipeline
            .from_recording(&recording, &[Difficulty::Hyper], Derivation::Direct)
            .unwrap_err();
        assert!(err.is_invalid_input());
        assert!(err.to_string().contains("bpm"));
    }

    #[test]
    fn test_template_with_negative_offset_is_invalid() {
        let pipeline = make_pipeline(1);
        let err = pipeline
            .from_template(
                &SectionPlanner::builtin_template(),
                134.0,
                248.0,
                -1.0,
                Difficulty::Another,
                &[Difficulty::Hyper],
            )
            .unwrap_err();
        assert!(err.is_invalid_input());
        assert!(err.to_string().contains("offset"));
    }

    #[test]
    fn test_template_projects_every_tier() {
        let pipeline = make_pipeline(3);
        let tiers = charts(
            pipeline
                .from_template(
                    &SectionPlanner::builtin_template(),
                    134.0,
                    248.0,
                    1.0,
                    Difficulty::Another,
                    &[
                        Difficulty::Beginner,
                        Difficulty::Normal,
                        Difficulty::Hyper,
                        Difficulty::Another,
                    ],
                )
                .unwrap(),
        );

        assert_eq!(tiers.len(), 4);
        assert!(tiers[0].note_count() < tiers[1].note_count());
        assert!(tiers[1].note_count() < tiers[2].note_count());
        assert_eq!(tiers[0].hold_count() + tiers[0].scratch_count(), 0);
        assert_eq!(tiers[1].difficulty.level, 5);
        assert!(tiers.iter().all(|c| c.offset == 1.0 && c.bpm == 134.0));
    }

    #[test]
    fn test_projected_analysis() {
        let bpm = 150.0;
        let interval = 60.0 / bpm;
        let analysis = AnalysisTiming {
            bpm,
            duration: 90.0,
            beat_times: (0..200).map(|i| 0.8 + i as f64 * interval).collect(),
            onset_times: (0..600).map(|i| 0.81 + i as f64 * 0.141).collect(),
            sample_rate: None,
        };
        let pipeline = make_pipeline(11);
        let tiers = charts(
            pipeline
                .from_analysis(
                    &analysis,
                    &[Difficulty::Normal, Difficulty::Hyper],
                    Derivation::Projected {
                        base: Difficulty::Another,
                    },
                )
                .unwrap(),
        );
        assert!(tiers[0].note_count() < tiers[1].note_count());
        assert!(tiers.iter().all(|c| c.offset == 0.8 && c.is_sorted()));
    }

    #[test]
    fn test_missing_source_is_unavailable() {
        let dir = tempfile::TempDir::new().unwrap();
        let source = AnalysisFile::new(dir.path().join("analysis.json"));
        let err = make_pipeline(1)
            .run(&source, &[Difficulty::Normal], Derivation::Direct)
            .unwrap_err();
        assert!(err.is_source_unavailable());
    }

    #[test]
    fn test_invalid_override_fails_only_that_tier() {
        let mut config = GeneratorConfig {
            seed: Some(5),
            ..Default::default()
        };
        let pipeline = ChartPipeline::new(config.clone(), SongMeta::default()).unwrap();
        // Overrides are validated up front, so break the profile after construction.
        config.profiles.insert(
            Difficulty::Hyper,
            crate::config::ProfileOverride {
                lane_variety: Some(1),
                ..Default::default()
            },
        );
        let broken = ChartPipeline {
            config,
            ..pipeline
        };

        let tiers = broken
            .from_recording(
                &make_recording(),
                &[Difficulty::Normal, Difficulty::Hyper],
                Derivation::Direct,
            )
            .unwrap();
        assert!(tiers[0].chart.is_ok());
        assert!(tiers[1].chart.as_ref().unwrap_err().is_invalid_input());
    }
}
