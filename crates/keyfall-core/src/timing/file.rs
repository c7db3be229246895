use std::fs;
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use tracing::debug;

use crate::error::{Error, Result};
use crate::timing::{AnalysisTiming, RecordedTiming, TimingData, TimingSource};

/// Analysis JSON written by the audio analysis tool.
#[derive(Debug, Clone)]
pub struct AnalysisFile {
    path: PathBuf,
}

impl AnalysisFile {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }
}

impl TimingSource for AnalysisFile {
    fn fetch(&self) -> Result<TimingData> {
        let analysis: AnalysisTiming = read_json(&self.path)?;
        debug!(
            "Loaded analysis: {:.2} BPM, {} beats, {} onsets",
            analysis.bpm,
            analysis.beat_times.len(),
            analysis.onset_times.len()
        );
        Ok(TimingData::Analysis(analysis))
    }

    fn describe(&self) -> String {
        self.path.display().to_string()
    }
}

/// Raw recording JSON saved by the chart editor.
#[derive(Debug, Clone)]
pub struct RecordingFile {
    path: PathBuf,
}

impl RecordingFile {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }
}

impl TimingSource for RecordingFile {
    fn fetch(&self) -> Result<TimingData> {
        let recording: RecordedTiming = read_json(&self.path)?;
        debug!(
            "Loaded recording: {} timings",
            recording.recorded_timings.len()
        );
        Ok(TimingData::Recording(recording))
    }

    fn describe(&self) -> String {
        self.path.display().to_string()
    }
}

/// Read and decode a JSON file, mapping every failure to an upstream error.
fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let content = fs::read_to_string(path).map_err(|e| {
        Error::SourceUnavailable(format!("cannot read {}: {}", path.display(), e))
    })?;
    serde_json::from_str(&content).map_err(|e| {
        Error::SourceUnavailable(format!("cannot parse {}: {}", path.display(), e))
    })
}
