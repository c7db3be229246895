//! Song structure: named sections with a density and a pattern style.

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::chart::check_unit;
use crate::error::{Error, Result};

/// Note pattern used inside a section.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PatternStyle {
    /// One note per beat on even lanes (intros and outros)
    Sparse,
    /// Every half beat, occasional holds (verses)
    Steady,
    /// Every sub-beat with chords and scratches (choruses)
    Dense,
    /// Long holds every two beats (bridges)
    Sustained,
}

impl PatternStyle {
    /// Infer a style from a section name such as "verse1" or "final_chorus".
    pub fn from_section_name(name: &str) -> Self {
        let name = name.to_ascii_lowercase();
        if name.contains("chorus") {
            Self::Dense
        } else if name.starts_with("intro") || name.starts_with("outro") {
            Self::Sparse
        } else if name.starts_with("bridge") {
            Self::Sustained
        } else {
            Self::Steady
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Section {
    pub name: String,
    pub start: f64,
    pub end: f64,
    pub density: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub style: Option<PatternStyle>,
}

impl Section {
    pub fn new(name: impl Into<String>, start: f64, end: f64, density: f64) -> Self {
        Self {
            name: name.into(),
            start,
            end,
            density,
            style: None,
        }
    }

    pub fn with_style(mut self, style: PatternStyle) -> Self {
        self.style = Some(style);
        self
    }

    /// Explicit style, or the one implied by the name.
    pub fn pattern_style(&self) -> PatternStyle {
        self.style
            .unwrap_or_else(|| PatternStyle::from_section_name(&self.name))
    }

    pub fn length(&self) -> f64 {
        self.end - self.start
    }
}

/// Validates section lists against a song's duration.
pub struct SectionPlanner;

impl SectionPlanner {
    /// Validate sections for a song of `duration` seconds.
    ///
    /// Sections starting at or past the end of the song are dropped and
    /// sections running past it are clipped. Malformed sections are an error.
    pub fn plan(duration: f64, sections: &[Section]) -> Result<Vec<Section>> {
        if !(duration.is_finite() && duration > 0.0) {
            return Err(Error::invalid(
                "duration",
                format!("must be positive, got {}", duration),
            ));
        }

        let mut planned = Vec::with_capacity(sections.len());
        for (index, section) in sections.iter().enumerate() {
            let field = format!("sections[{}] ({})", index, section.name);

            if !(section.start.is_finite() && section.end.is_finite()) {
                return Err(Error::invalid(field, "start and end must be finite"));
            }
            if section.start < 0.0 {
                return Err(Error::invalid(
                    field,
                    format!("start must be non-negative, got {}", section.start),
                ));
            }
            if section.start >= section.end {
                return Err(Error::invalid(
                    field,
                    format!(
                        "start ({}) must be before end ({})",
                        section.start, section.end
                    ),
                ));
            }
            check_unit(&format!("{}.density", field), section.density)?;

            if section.start >= duration {
                warn!(
                    "Dropping section {:?}: starts at {}s, song ends at {}s",
                    section.name, section.start, duration
                );
                continue;
            }

            let mut section = section.clone();
            if section.end > duration {
                debug!(
                    "Clipping section {:?} end from {}s to {}s",
                    section.name, section.end, duration
                );
                section.end = duration;
            }
            planned.push(section);
        }

        Ok(planned)
    }

    /// Fixed structure for a four-minute pop song.
    pub fn builtin_template() -> Vec<Section> {
        vec![
            Section::new("intro", 0.0, 16.0, 0.3),
            Section::new("verse1", 16.0, 48.0, 0.5),
            Section::new("chorus1", 48.0, 80.0, 0.8),
            Section::new("verse2", 80.0, 112.0, 0.6),
            Section::new("chorus2", 112.0, 144.0, 0.9),
            Section::new("bridge", 144.0, 176.0, 0.4),
            Section::new("final_chorus", 176.0, 220.0, 1.0),
            Section::new("outro", 220.0, 248.0, 0.3),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_style_from_name() {
        assert_eq!(PatternStyle::from_section_name("intro"), PatternStyle::Sparse);
        assert_eq!(PatternStyle::from_section_name("outro"), PatternStyle::Sparse);
        assert_eq!(PatternStyle::from_section_name("verse2"), PatternStyle::Steady);
        assert_eq!(PatternStyle::from_section_name("final_chorus"), PatternStyle::Dense);
        assert_eq!(PatternStyle::from_section_name("bridge"), PatternStyle::Sustained);
        assert_eq!(PatternStyle::from_section_name("breakdown"), PatternStyle::Steady);
    }

    #[test]
    fn test_explicit_style_wins() {
        let section = Section::new("intro", 0.0, 8.0, 0.5).with_style(PatternStyle::Dense);
        assert_eq!(section.pattern_style(), PatternStyle::Dense);
    }

    #[test]
    fn test_builtin_template_is_contiguous() {
        let template = SectionPlanner::builtin_template();
        assert_eq!(template.len(), 8);
        for pair in template.windows(2) {
            assert_eq!(pair[0].end, pair[1].start);
        }
        assert_eq!(template.last().unwrap().end, 248.0);
    }

    #[test]
    fn test_plan_keeps_valid_sections() {
        let template = SectionPlanner::builtin_template();
        let planned = SectionPlanner::plan(248.0, &template).unwrap();
        assert_eq!(planned, template);
    }

    #[test]
    fn test_plan_clips_and_drops() {
        let template = SectionPlanner::builtin_template();
        let planned = SectionPlanner::plan(200.0, &template).unwrap();
        // final_chorus clipped to 200, outro dropped
        assert_eq!(planned.len(), 7);
        assert_eq!(planned[6].name, "final_chorus");
        assert_eq!(planned[6].end, 200.0);
    }

    #[test]
    fn test_plan_rejects_inverted_section() {
        let sections = vec![Section::new("verse", 10.0, 5.0, 0.5)];
        let err = SectionPlanner::plan(60.0, &sections).unwrap_err();
        assert!(err.is_invalid_input());
        assert!(err.to_string().contains("sections[0]"));
    }

    #[test]
    fn test_plan_rejects_negative_start_and_bad_density() {
        let negative = vec![Section::new("intro", -1.0, 5.0, 0.5)];
        assert!(SectionPlanner::plan(60.0, &negative).is_err());

        let dense = vec![Section::new("chorus", 0.0, 5.0, 1.2)];
        assert!(SectionPlanner::plan(60.0, &dense).is_err());
    }

    #[test]
    fn test_plan_rejects_bad_duration() {
        assert!(SectionPlanner::plan(0.0, &[]).is_err());
    }
}
