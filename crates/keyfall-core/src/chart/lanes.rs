use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Smallest layout: one playable lane plus scratch.
pub const MIN_LANE_COUNT: u8 = 2;
pub const MAX_LANE_COUNT: u8 = 16;

/// Lane layout of a chart.
///
/// The last lane is the scratch lane; every lane below it is a playable key
/// lane. The historical layouts are 8 lanes (7 keys + scratch) and 7 lanes
/// (6 keys + scratch).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct LaneLayout {
    lane_count: u8,
}

impl LaneLayout {
    pub fn new(lane_count: u8) -> Result<Self> {
        if !(MIN_LANE_COUNT..=MAX_LANE_COUNT).contains(&lane_count) {
            return Err(Error::invalid(
                "lane_count",
                format!(
                    "must be between {} and {}, got {}",
                    MIN_LANE_COUNT, MAX_LANE_COUNT, lane_count
                ),
            ));
        }
        Ok(Self { lane_count })
    }

    /// 7 keys + scratch
    pub fn seven_key() -> Self {
        Self { lane_count: 8 }
    }

    /// 6 keys + scratch
    pub fn six_key() -> Self {
        Self { lane_count: 7 }
    }

    pub fn lane_count(&self) -> u8 {
        self.lane_count
    }

    pub fn scratch_lane(&self) -> u8 {
        self.lane_count - 1
    }

    /// Number of non-scratch lanes.
    pub fn playable_count(&self) -> u8 {
        self.lane_count - 1
    }

    pub fn is_scratch(&self, lane: u8) -> bool {
        lane == self.scratch_lane()
    }

    pub fn contains(&self, lane: u8) -> bool {
        lane < self.lane_count
    }

    pub fn playable_lanes(&self) -> std::ops::Range<u8> {
        0..self.playable_count()
    }

    /// Even-numbered playable lanes (0, 2, 4, ...), used by the sparse and
    /// dense section patterns.
    pub fn even_lanes(&self) -> Vec<u8> {
        self.playable_lanes().step_by(2).collect()
    }
}

impl Default for LaneLayout {
    fn default() -> Self {
        Self::seven_key()
    }
}

impl TryFrom<u8> for LaneLayout {
    type Error = Error;

    fn try_from(value: u8) -> Result<Self> {
        Self::new(value)
    }
}

impl From<LaneLayout> for u8 {
    fn from(layout: LaneLayout) -> Self {
        layout.lane_count
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seven_key_layout() {
        let layout = LaneLayout::seven_key();
        assert_eq!(layout.lane_count(), 8);
        assert_eq!(layout.scratch_lane(), 7);
        assert_eq!(layout.playable_count(), 7);
        assert_eq!(layout.even_lanes(), vec![0, 2, 4, 6]);
        assert!(layout.is_scratch(7));
        assert!(!layout.contains(8));
    }

    #[test]
    fn test_six_key_layout() {
        let layout = LaneLayout::six_key();
        assert_eq!(layout.scratch_lane(), 6);
        assert_eq!(layout.even_lanes(), vec![0, 2, 4]);
    }

    #[test]
    fn test_lane_count_out_of_range() {
        assert!(LaneLayout::new(1).unwrap_err().is_invalid_input());
        assert!(LaneLayout::new(17).unwrap_err().is_invalid_input());
        assert!(LaneLayout::new(2).is_ok());
    }
}
