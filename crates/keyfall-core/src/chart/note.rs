use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use crate::error::Error;

/// Round a time in seconds to millisecond precision.
pub fn round_millis(seconds: f64) -> f64 {
    (seconds * 1000.0).round() / 1000.0
}

/// Note type. A hold carries its duration, so a duration can never be
/// attached to a tap or scratch.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum NoteKind {
    Tap,
    Hold { duration: f64 },
    Scratch,
}

impl NoteKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Tap => "tap",
            Self::Hold { .. } => "hold",
            Self::Scratch => "scratch",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawNote", into = "RawNote")]
pub struct Note {
    pub time: f64,
    pub lane: u8,
    pub kind: NoteKind,
}

impl Note {
    pub fn tap(time: f64, lane: u8) -> Self {
        Self {
            time: round_millis(time),
            lane,
            kind: NoteKind::Tap,
        }
    }

    pub fn scratch(time: f64, lane: u8) -> Self {
        Self {
            time: round_millis(time),
            lane,
            kind: NoteKind::Scratch,
        }
    }

    pub fn hold(time: f64, lane: u8, duration: f64) -> Self {
        Self {
            time: round_millis(time),
            lane,
            kind: NoteKind::Hold {
                duration: round_millis(duration),
            },
        }
    }

    pub fn is_hold(&self) -> bool {
        matches!(self.kind, NoteKind::Hold { .. })
    }

    pub fn is_scratch(&self) -> bool {
        matches!(self.kind, NoteKind::Scratch)
    }

    pub fn duration(&self) -> Option<f64> {
        match self.kind {
            NoteKind::Hold { duration } => Some(duration),
            _ => None,
        }
    }

    /// Time at which the note releases (equal to `time` for non-holds).
    pub fn end_time(&self) -> f64 {
        self.time + self.duration().unwrap_or(0.0)
    }

    /// Same note as a tap, keeping time and lane.
    pub fn into_tap(self) -> Self {
        Self {
            kind: NoteKind::Tap,
            ..self
        }
    }

    /// Chart ordering: time ascending, ties broken by lane ascending.
    pub fn chart_order(a: &Note, b: &Note) -> Ordering {
        a.time.total_cmp(&b.time).then(a.lane.cmp(&b.lane))
    }
}

/// Interchange form of a note, as stored in chart files.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct RawNote {
    time: f64,
    lane: u8,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    kind: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    duration: Option<f64>,
}

impl TryFrom<RawNote> for Note {
    type Error = Error;

    fn try_from(raw: RawNote) -> Result<Self, Self::Error> {
        if !raw.time.is_finite() || raw.time < 0.0 {
            return Err(Error::invalid(
                "note.time",
                format!("must be a non-negative number, got {}", raw.time),
            ));
        }

        // Charts written from raw recordings carry no type; they are taps.
        let kind = match raw.kind.as_deref().unwrap_or("tap") {
            "tap" => NoteKind::Tap,
            "scratch" => NoteKind::Scratch,
            "hold" => match raw.duration {
                Some(duration) if duration.is_finite() && duration > 0.0 => {
                    NoteKind::Hold { duration }
                }
                other => {
                    return Err(Error::invalid(
                        "note.duration",
                        format!(
                            "hold at {}s needs a positive duration, got {:?}",
                            raw.time, other
                        ),
                    ));
                }
            },
            other => {
                return Err(Error::invalid(
                    "note.type",
                    format!("unknown note type {:?} at {}s", other, raw.time),
                ));
            }
        };

        if !matches!(kind, NoteKind::Hold { .. }) && raw.duration.is_some() {
            return Err(Error::invalid(
                "note.duration",
                format!(
                    "{} note at {}s must not carry a duration",
                    kind.as_str(),
                    raw.time
                ),
            ));
        }

        Ok(Note {
            time: raw.time,
            lane: raw.lane,
            kind,
        })
    }
}

impl From<Note> for RawNote {
    fn from(note: Note) -> Self {
        RawNote {
            time: note.time,
            lane: note.lane,
            kind: Some(note.kind.as_str().to_string()),
            duration: note.duration(),
        }
    }
}
