use serde::{Deserialize, Serialize};
use strum::{EnumIter, EnumString, IntoEnumIterator, IntoStaticStr};

#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    EnumString,
    EnumIter,
    IntoStaticStr,
)]
#[serde(rename_all = "UPPERCASE")]
#[strum(ascii_case_insensitive)]
#[repr(u8)]
pub enum Difficulty {
    #[strum(serialize = "BEGINNER")]
    Beginner = 0,
    #[strum(serialize = "NORMAL")]
    Normal = 1,
    #[strum(serialize = "HYPER")]
    Hyper = 2,
    #[strum(serialize = "ANOTHER")]
    Another = 3,
}

impl Difficulty {
    /// Every tier, easiest first
    pub fn all() -> Vec<Self> {
        Self::iter().collect()
    }

    /// Upper-case name as it appears in chart files (e.g., "HYPER")
    pub fn name(&self) -> &'static str {
        self.into()
    }

    /// Lower-case name used in chart file names (e.g., "hyper")
    pub fn file_suffix(&self) -> &'static str {
        match self {
            Self::Beginner => "beginner",
            Self::Normal => "normal",
            Self::Hyper => "hyper",
            Self::Another => "another",
        }
    }

    /// Console color for summaries, as RGB
    pub fn rgb(&self) -> (u8, u8, u8) {
        match self {
            Self::Beginner => (0x32, 0xCD, 0x32),
            Self::Normal => (0x0F, 0xAB, 0xFD),
            Self::Hyper => (0xF4, 0x90, 0x3C),
            Self::Another => (0xE5, 0x2B, 0x19),
        }
    }
}

impl std::fmt::Display for Difficulty {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}
