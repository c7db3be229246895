use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::chart::{Difficulty, DifficultyProfile, LaneLayout};
use crate::config::{LevelTable, LevelTableKind, placement, timing};
use crate::error::{Error, Result};

/// Per-difficulty overrides applied on top of the built-in presets
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ProfileOverride {
    pub beat_divisor: Option<u32>,
    pub lane_variety: Option<u8>,
    pub scratch_frequency: Option<f64>,
    pub note_reduction: Option<f64>,
    pub allow_holds: Option<bool>,
    pub densify: Option<bool>,
    pub chord_level: Option<u8>,
}

/// Generator configuration, usually read from `keyfall.toml`.
///
/// ```toml
/// lane_count = 7
/// seed = 42
/// level_table = "canonical"
///
/// [profiles.HYPER]
/// beat_divisor = 4
/// scratch_frequency = 0.1
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GeneratorConfig {
    pub lane_count: u8,
    pub conflict_window: f64,
    pub seed: Option<u64>,
    pub level_table: LevelTableKind,
    /// Number of key lanes (from lane 0) used for recorded-timing chords.
    pub chord_pool: u8,
    /// `[single, double, triple]` weights replacing every tier's chord preset.
    pub chord_weights: Option<[f64; 3]>,
    pub profiles: BTreeMap<Difficulty, ProfileOverride>,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            lane_count: LaneLayout::seven_key().lane_count(),
            conflict_window: placement::CONFLICT_WINDOW_SECS,
            seed: None,
            level_table: LevelTableKind::Canonical,
            chord_pool: timing::DEFAULT_CHORD_POOL,
            chord_weights: None,
            profiles: BTreeMap::new(),
        }
    }
}

impl GeneratorConfig {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> Result<Self> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        let layout = self.layout()?;
        if !(self.conflict_window.is_finite() && self.conflict_window >= 0.0) {
            return Err(Error::invalid(
                "conflict_window",
                format!("must be a non-negative number, got {}", self.conflict_window),
            ));
        }
        if self.chord_pool == 0 || self.chord_pool > layout.playable_count() {
            return Err(Error::invalid(
                "chord_pool",
                format!(
                    "must be between 1 and {} for a {}-lane layout, got {}",
                    layout.playable_count(),
                    layout.lane_count(),
                    self.chord_pool
                ),
            ));
        }
        for difficulty in self.profiles.keys() {
            self.profile(*difficulty)?;
        }
        Ok(())
    }

    pub fn layout(&self) -> Result<LaneLayout> {
        LaneLayout::new(self.lane_count)
    }

    pub fn levels(&self) -> LevelTable {
        LevelTable::from_kind(self.level_table)
    }

    /// Preset profile for `difficulty` with this config's overrides applied.
    pub fn profile(&self, difficulty: Difficulty) -> Result<DifficultyProfile> {
        let layout = self.layout()?;
        let mut profile = DifficultyProfile::preset(difficulty, layout, &self.levels());

        if let Some(o) = self.profiles.get(&difficulty) {
            if let Some(v) = o.beat_divisor {
                profile.beat_divisor = v;
            }
            if let Some(v) = o.lane_variety {
                profile.lane_variety = v;
            }
            if let Some(v) = o.scratch_frequency {
                profile.scratch_frequency = v;
            }
            if let Some(v) = o.note_reduction {
                profile.note_reduction = v;
            }
            if let Some(v) = o.allow_holds {
                profile.allow_holds = v;
            }
            if let Some(v) = o.densify {
                profile.densify = v;
            }
            if let Some(v) = o.chord_level {
                profile.chord_level = v;
            }
        }

        profile.validate(layout)?;
        Ok(profile)
    }
}
