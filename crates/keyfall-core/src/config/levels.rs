use serde::{Deserialize, Serialize};
use strum::{EnumString, IntoStaticStr};

use crate::chart::Difficulty;

/// Which difficulty-level table to write into charts.
///
/// Two tables exist in the chart corpus: the canonical one, and the one the
/// section-template charts were first written with, which rates NORMAL as 7.
/// Neither is derived from the other, so the choice is left to configuration.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, EnumString, IntoStaticStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum LevelTableKind {
    #[default]
    Canonical,
    Legacy,
}

/// Level per difficulty
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LevelTable {
    levels: [u8; 4],
}

impl LevelTable {
    /// BEGINNER=3, NORMAL=5, HYPER=8, ANOTHER=11
    pub fn canonical() -> Self {
        Self {
            levels: [3, 5, 8, 11],
        }
    }

    /// Same as canonical except NORMAL=7.
    pub fn legacy() -> Self {
        Self {
            levels: [3, 7, 8, 11],
        }
    }

    pub fn from_kind(kind: LevelTableKind) -> Self {
        match kind {
            LevelTableKind::Canonical => Self::canonical(),
            LevelTableKind::Legacy => Self::legacy(),
        }
    }

    pub fn level(&self, difficulty: Difficulty) -> u8 {
        self.levels[difficulty as usize]
    }
}

impl Default for LevelTable {
    fn default() -> Self {
        Self::canonical()
    }
}
