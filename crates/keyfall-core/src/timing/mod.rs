//! Timing inputs produced by upstream collaborators.
//!
//! This module contains:
//! - `AnalysisTiming` - beat/onset analysis of an audio file
//! - `RecordedTiming` - timestamps tapped along to the song by hand
//! - `TimingSource` - abstraction over where timing data comes from

mod file;
mod source;

pub use file::*;
pub use source::*;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::timing::{RECORDING_DEFAULT_BPM, RECORDING_DEFAULT_OFFSET_SECS};
use crate::error::{Error, Result};

/// Output of the beat/onset analysis collaborator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisTiming {
    pub bpm: f64,
    #[serde(alias = "durationSeconds")]
    pub duration: f64,
    #[serde(default, alias = "beat_times")]
    pub beat_times: Vec<f64>,
    #[serde(default, alias = "onset_times")]
    pub onset_times: Vec<f64>,
    #[serde(default, alias = "sample_rate", skip_serializing_if = "Option::is_none")]
    pub sample_rate: Option<u32>,
}

impl AnalysisTiming {
    pub fn validate(&self) -> Result<()> {
        check_bpm(self.bpm)?;
        if !(self.duration.is_finite() && self.duration > 0.0) {
            return Err(Error::invalid(
                "duration",
                format!("must be positive, got {}", self.duration),
            ));
        }
        check_times("beatTimes", &self.beat_times)?;
        if let Some(i) = self.beat_times.windows(2).position(|w| w[1] < w[0]) {
            return Err(Error::invalid(
                format!("beatTimes[{}]", i + 1),
                format!(
                    "beats must be ascending ({} follows {})",
                    self.beat_times[i + 1],
                    self.beat_times[i]
                ),
            ));
        }
        check_times("onsetTimes", &self.onset_times)?;
        Ok(())
    }

    /// Seconds per beat.
    pub fn beat_interval(&self) -> f64 {
        60.0 / self.bpm
    }
}

/// Output of the manual recording collaborator.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordedTiming {
    pub recorded_timings: Vec<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub artist: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bpm: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub offset: Option<f64>,
}

impl RecordedTiming {
    pub fn new(recorded_timings: Vec<f64>) -> Self {
        Self {
            recorded_timings,
            ..Default::default()
        }
    }

    /// Timings in ascending order without exact duplicates.
    ///
    /// Empty, negative or non-finite timings are invalid input.
    pub fn normalized(&self) -> Result<Vec<f64>> {
        if self.recorded_timings.is_empty() {
            return Err(Error::invalid("recordedTimings", "no timings recorded"));
        }
        check_times("recordedTimings", &self.recorded_timings)?;

        let mut timings = self.recorded_timings.clone();
        if !timings.is_sorted() {
            debug!("Recorded timings out of order, sorting");
            timings.sort_by(f64::total_cmp);
        }
        let before = timings.len();
        timings.dedup();
        if timings.len() < before {
            debug!(
                "Dropped {} duplicate recorded timings",
                before - timings.len()
            );
        }
        Ok(timings)
    }

    /// Chart tempo and offset, falling back to the recording defaults.
    pub fn tempo(&self) -> Result<(f64, f64)> {
        let bpm = self.bpm.unwrap_or(RECORDING_DEFAULT_BPM);
        let offset = self.offset.unwrap_or(RECORDING_DEFAULT_OFFSET_SECS);
        check_bpm(bpm)?;
        check_offset(offset)?;
        Ok((bpm, offset))
    }
}

pub(crate) fn check_bpm(bpm: f64) -> Result<()> {
    if !(bpm.is_finite() && bpm > 0.0) {
        return Err(Error::invalid("bpm", format!("must be positive, got {}", bpm)));
    }
    Ok(())
}

/// Chart offsets are seconds into the audio.
pub(crate) fn check_offset(offset: f64) -> Result<()> {
    if !(offset.is_finite() && offset >= 0.0) {
        return Err(Error::invalid(
            "offset",
            format!("must be a non-negative number of seconds, got {}", offset),
        ));
    }
    Ok(())
}

/// Every value must be a finite, non-negative number of seconds.
fn check_times(field: &str, times: &[f64]) -> Result<()> {
    if let Some((i, t)) = times
        .iter()
        .enumerate()
        .find(|(_, t)| !(t.is_finite() && **t >= 0.0))
    {
        return Err(Error::invalid(
            format!("{}[{}]", field, i),
            format!("must be a non-negative number of seconds, got {}", t),
        ));
    }
    Ok(())
}
