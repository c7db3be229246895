use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::chart::{Chart, Difficulty};
use crate::error::Result;
use crate::generate::Section;

/// Path of the chart file for `stem` at `difficulty`, e.g.
/// `charts/gozen4ji_hyper.json`.
pub fn chart_path<P: AsRef<Path>>(dir: P, stem: &str, difficulty: Difficulty) -> PathBuf {
    dir.as_ref()
        .join(format!("{}_{}.json", stem, difficulty.file_suffix()))
}

/// Write `chart` as pretty JSON under `dir`, creating the directory if needed.
pub fn save_chart<P: AsRef<Path>>(dir: P, stem: &str, chart: &Chart) -> Result<PathBuf> {
    fs::create_dir_all(dir.as_ref())?;
    let path = chart_path(dir, stem, chart.difficulty.name);
    write_chart(&path, chart)?;
    Ok(path)
}

/// Write `chart` to an explicit path.
pub fn write_chart<P: AsRef<Path>>(path: P, chart: &Chart) -> Result<()> {
    let content = serde_json::to_string_pretty(chart)?;
    fs::write(path.as_ref(), format!("{}\n", content))?;
    debug!(
        "Wrote {} notes to {}",
        chart.note_count(),
        path.as_ref().display()
    );
    Ok(())
}

/// Read a chart file. Notes come back in chart order.
pub fn load_chart<P: AsRef<Path>>(path: P) -> Result<Chart> {
    let content = fs::read_to_string(path.as_ref())?;
    let chart: Chart = serde_json::from_str(&content)?;
    if chart.is_sorted() {
        Ok(chart)
    } else {
        debug!("Sorting notes of {}", path.as_ref().display());
        let notes = chart.notes.clone();
        Ok(chart.with_notes(notes))
    }
}

/// Read a JSON array of sections.
pub fn load_sections<P: AsRef<Path>>(path: P) -> Result<Vec<Section>> {
    let content = fs::read_to_string(path.as_ref())?;
    Ok(serde_json::from_str(&content)?)
}
