//! Timing source abstraction.
//!
//! Generation code only sees [`TimingData`]; where it comes from (files,
//! in-memory fixtures) is hidden behind [`TimingSource`].

use crate::error::Result;
use crate::timing::{AnalysisTiming, RecordedTiming};

/// Timing arrays for one song.
#[derive(Debug, Clone, PartialEq)]
pub enum TimingData {
    Analysis(AnalysisTiming),
    Recording(RecordedTiming),
}

impl TimingData {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Analysis(_) => "analysis",
            Self::Recording(_) => "recording",
        }
    }
}

/// Trait for anything that can supply timing data.
///
/// Failures to reach the data are reported as
/// [`Error::SourceUnavailable`](crate::Error::SourceUnavailable); problems
/// with the data itself are reported later, as invalid input.
pub trait TimingSource {
    /// Fetch the timing data.
    fn fetch(&self) -> Result<TimingData>;

    /// Short description for log lines.
    fn describe(&self) -> String;
}

impl TimingSource for TimingData {
    fn fetch(&self) -> Result<TimingData> {
        Ok(self.clone())
    }

    fn describe(&self) -> String {
        format!("in-memory {}", self.kind())
    }
}
