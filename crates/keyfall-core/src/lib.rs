pub mod chart;
pub mod config;
pub mod error;
pub mod generate;
pub mod pipeline;
pub mod storage;
pub mod timing;

pub use chart::{
    Chart, Difficulty, DifficultyInfo, DifficultyProfile, LaneLayout, Note, NoteKind, SongMeta,
};
pub use config::{GeneratorConfig, LevelTable, LevelTableKind, ProfileOverride};
pub use error::{Error, Result};
pub use generate::{
    ChartAssembler, ChordDistribution, ChordGenerator, ConflictResolver, DifficultyProjector,
    NotePlacer, PatternPlacer, PatternStyle, Placement, Section, SectionPlanner,
};
pub use pipeline::{ChartPipeline, Derivation, GeneratedTier};
pub use storage::{chart_path, load_chart, load_sections, save_chart, write_chart};
pub use timing::{
    AnalysisFile, AnalysisTiming, RecordedTiming, RecordingFile, TimingData, TimingSource,
};
