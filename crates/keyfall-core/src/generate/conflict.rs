use crate::chart::Note;
use crate::config::placement::CONFLICT_WINDOW_SECS;

/// Temporal conflict checks against already-placed notes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ConflictResolver {
    window: f64,
}

impl ConflictResolver {
    pub fn new(window: f64) -> Self {
        Self { window }
    }

    pub fn window(&self) -> f64 {
        self.window
    }

    /// True if any existing note, on any lane, lies within the window of
    /// `time`.
    pub fn conflicts(&self, time: f64, existing: &[Note]) -> bool {
        existing
            .iter()
            .any(|note| (note.time - time).abs() < self.window)
    }

    /// True if a note on `lane` lies within the window of `time`, or `time`
    /// falls inside a hold on that lane (tail included, plus the window).
    pub fn conflicts_on_lane(&self, time: f64, lane: u8, existing: &[Note]) -> bool {
        existing.iter().filter(|note| note.lane == lane).any(|note| {
            (note.time - time).abs() < self.window
                || (note.is_hold() && time >= note.time && time < note.end_time() + self.window)
        })
    }

    /// Same as [`conflicts_on_lane`](Self::conflicts_on_lane) for a whole
    /// candidate note. A candidate hold also conflicts when an existing note
    /// on its lane starts inside the hold.
    pub fn note_conflicts(&self, candidate: &Note, existing: &[Note]) -> bool {
        if self.conflicts_on_lane(candidate.time, candidate.lane, existing) {
            return true;
        }
        candidate.is_hold()
            && existing.iter().any(|note| {
                note.lane == candidate.lane
                    && note.time >= candidate.time
                    && note.time < candidate.end_time() + self.window
            })
    }
}

impl Default for ConflictResolver {
    fn default() -> Self {
        Self::new(CONFLICT_WINDOW_SECS)
    }
}
