//! Note generation stages.
//!
//! This module contains:
//! - `SectionPlanner` - validates and clips song sections
//! - `NotePlacer` - beat-grid placement with a melody overlay
//! - `PatternPlacer` - section pattern placement for template charts
//! - `ChordGenerator` - chords for recorded timing tracks
//! - `ConflictResolver` - temporal conflict checks
//! - `DifficultyProjector` - derives a tier from a base chart
//! - `ChartAssembler` - wraps notes into a finished chart

mod assembler;
mod chords;
mod conflict;
mod pattern;
mod placer;
mod projector;
mod sections;

pub use assembler::*;
pub use chords::*;
pub use conflict::*;
pub use pattern::*;
pub use placer::*;
pub use projector::*;
pub use sections::*;
