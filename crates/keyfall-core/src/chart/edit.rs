//! Pure edits on finished charts. Each returns a new chart and leaves the
//! input untouched.

use tracing::{debug, warn};

use crate::chart::{Chart, LaneLayout, Note};
use crate::generate::ConflictResolver;

/// Drop every note on the scratch lane (or beyond the layout).
pub fn remove_scratch(chart: &Chart, layout: LaneLayout) -> Chart {
    let notes: Vec<Note> = chart
        .notes
        .iter()
        .filter(|n| n.lane < layout.playable_count() && !n.is_scratch())
        .copied()
        .collect();
    debug!(
        "{} [{}]: removed {} scratch notes",
        chart.title,
        chart.difficulty.name,
        chart.note_count() - notes.len()
    );
    chart.with_notes(notes)
}

/// Move a chart from one lane layout to another.
///
/// The scratch lane maps to the new scratch lane. Key lanes that no longer
/// exist fold onto the last key lane, and notes that then collide with an
/// earlier note on the same lane are dropped.
pub fn remap_lanes(chart: &Chart, from: LaneLayout, to: LaneLayout) -> Chart {
    let resolver = ConflictResolver::default();
    let mut notes: Vec<Note> = Vec::with_capacity(chart.note_count());
    let mut out_of_range = 0usize;
    let mut collisions = 0usize;

    let mut source = chart.notes.clone();
    source.sort_by(Note::chart_order);

    for note in source {
        let lane = if !from.contains(note.lane) {
            out_of_range += 1;
            continue;
        } else if from.is_scratch(note.lane) {
            to.scratch_lane()
        } else if note.lane >= to.playable_count() {
            to.playable_count() - 1
        } else {
            note.lane
        };

        let moved = Note { lane, ..note };
        if resolver.note_conflicts(&moved, &notes) {
            collisions += 1;
            continue;
        }
        notes.push(moved);
    }

    if out_of_range > 0 {
        warn!(
            "{} [{}]: dropped {} notes outside the {}-lane source layout",
            chart.title,
            chart.difficulty.name,
            out_of_range,
            from.lane_count()
        );
    }
    if collisions > 0 {
        warn!(
            "{} [{}]: dropped {} notes colliding after lane remap",
            chart.title, chart.difficulty.name, collisions
        );
    }
    chart.with_notes(notes)
}

/// Same chart pointing at a different audio file.
pub fn with_audio_file(chart: &Chart, path: impl Into<String>) -> Chart {
    Chart {
        audio_file: path.into(),
        ..chart.clone()
    }
}
