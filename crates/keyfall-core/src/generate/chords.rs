//! Chord placement for recorded timing tracks.
//!
//! Every recorded timing becomes a chord of one to three taps on distinct
//! lanes. Lanes are sampled without replacement, so a chord can never repeat
//! a lane, and no timing is left without a note.

use rand::Rng;
use rand::seq::index;
use tracing::{debug, warn};

use crate::chart::Note;
use crate::error::{Error, Result};
use crate::generate::ConflictResolver;

/// Probability of each chord size; `weights[0]` is single notes.
#[derive(Debug, Clone, PartialEq)]
pub struct ChordDistribution {
    weights: Vec<f64>,
}

impl ChordDistribution {
    pub fn new(weights: Vec<f64>) -> Result<Self> {
        if weights.is_empty() {
            return Err(Error::invalid("chord_weights", "at least one weight required"));
        }
        if let Some(w) = weights.iter().find(|w| !(w.is_finite() && **w >= 0.0)) {
            return Err(Error::invalid(
                "chord_weights",
                format!("weights must be non-negative, got {}", w),
            ));
        }
        let total: f64 = weights.iter().sum();
        if (total - 1.0).abs() > 1e-6 {
            return Err(Error::invalid(
                "chord_weights",
                format!("weights must sum to 1, got {}", total),
            ));
        }
        Ok(Self { weights })
    }

    /// 70% single, 20% double, 10% triple.
    pub fn standard() -> Self {
        Self {
            weights: vec![0.7, 0.2, 0.1],
        }
    }

    /// Chord presets by level, from "no chords" (0) to "frequent triples" (4).
    pub fn from_level(level: u8) -> Result<Self> {
        let weights = match level {
            0 => vec![1.0],
            1 => vec![0.9, 0.1],
            2 => vec![0.8, 0.2],
            3 => return Ok(Self::standard()),
            4 => vec![0.5, 0.3, 0.2],
            _ => {
                return Err(Error::invalid(
                    "chord_level",
                    format!("must be between 0 and 4, got {}", level),
                ));
            }
        };
        Ok(Self { weights })
    }

    /// Largest chord size with a non-zero weight.
    pub fn max_size(&self) -> usize {
        self.weights
            .iter()
            .rposition(|&w| w > 0.0)
            .map_or(1, |i| i + 1)
    }

    pub fn probability(&self, size: usize) -> f64 {
        size.checked_sub(1)
            .and_then(|i| self.weights.get(i))
            .copied()
            .unwrap_or(0.0)
    }

    /// Draw a chord size.
    pub fn draw(&self, rng: &mut impl Rng) -> usize {
        let r: f64 = rng.random();
        let mut cumulative = 0.0;
        for (i, w) in self.weights.iter().enumerate() {
            cumulative += w;
            if r < cumulative {
                return i + 1;
            }
        }
        // Rounding left r above the last threshold
        self.max_size()
    }
}

impl Default for ChordDistribution {
    fn default() -> Self {
        Self::standard()
    }
}

#[derive(Debug)]
pub struct ChordGenerator {
    pool: Vec<u8>,
    distribution: ChordDistribution,
    resolver: ConflictResolver,
}

impl ChordGenerator {
    /// Chords drawn from `pool`. The pool must hold enough distinct lanes
    /// for the largest chord the distribution can draw.
    pub fn new(pool: Vec<u8>, distribution: ChordDistribution) -> Result<Self> {
        let mut distinct = pool.clone();
        distinct.sort_unstable();
        distinct.dedup();
        if distinct.len() != pool.len() {
            return Err(Error::invalid("chord_pool", "lanes must be distinct"));
        }
        if pool.len() < distribution.max_size() {
            return Err(Error::invalid(
                "chord_pool",
                format!(
                    "{} lanes cannot hold chords of {}",
                    pool.len(),
                    distribution.max_size()
                ),
            ));
        }
        Ok(Self {
            pool,
            distribution,
            resolver: ConflictResolver::default(),
        })
    }

    pub fn with_resolver(mut self, resolver: ConflictResolver) -> Self {
        self.resolver = resolver;
        self
    }

    /// Pool of lanes `0..size`.
    pub fn with_pool_size(size: u8, distribution: ChordDistribution) -> Result<Self> {
        Self::new((0..size).collect(), distribution)
    }

    /// One chord per timing, in timing order.
    ///
    /// Lanes still inside the conflict window of an earlier chord are left
    /// out of the draw, and the chord shrinks to the lanes that remain. When
    /// every pool lane is blocked the timing still gets a single tap on the
    /// lane that has rested longest.
    pub fn generate(&self, timings: &[f64], rng: &mut impl Rng) -> Vec<Note> {
        let mut notes: Vec<Note> = Vec::with_capacity(timings.len());
        let mut shrunk = 0usize;
        let mut exhausted = 0usize;
        for &time in timings {
            let free: Vec<u8> = self
                .pool
                .iter()
                .copied()
                .filter(|&lane| !self.resolver.conflicts_on_lane(time, lane, &notes))
                .collect();
            if free.is_empty() {
                exhausted += 1;
                let lane = self.least_recent_lane(&notes);
                notes.push(Note::tap(time, lane));
                continue;
            }

            let drawn = self.distribution.draw(rng);
            let size = drawn.min(free.len());
            if size < drawn {
                shrunk += 1;
            }
            notes.extend(Self::chord(time, &free, size, rng));
        }
        if shrunk > 0 {
            debug!("Shrunk {} chords to the lanes left free", shrunk);
        }
        if exhausted > 0 {
            warn!(
                "Lane pool exhausted at {} timings, reused the longest-resting lane",
                exhausted
            );
        }
        debug!(
            "Generated {} chord notes from {} timings",
            notes.len(),
            timings.len()
        );
        notes
    }

    /// `size` taps on distinct lanes drawn from `lanes`, lanes ascending.
    fn chord(time: f64, lanes: &[u8], size: usize, rng: &mut impl Rng) -> Vec<Note> {
        let mut picked: Vec<u8> = index::sample(rng, lanes.len(), size)
            .into_iter()
            .map(|i| lanes[i])
            .collect();
        picked.sort_unstable();
        picked.into_iter().map(|lane| Note::tap(time, lane)).collect()
    }

    /// Pool lane whose last note is furthest in the past.
    fn least_recent_lane(&self, notes: &[Note]) -> u8 {
        let last_use = |lane: u8| {
            notes
                .iter()
                .rev()
                .find(|note| note.lane == lane)
                .map_or(f64::NEG_INFINITY, |note| note.time)
        };
        self.pool
            .iter()
            .copied()
            .min_by(|&a, &b| last_use(a).total_cmp(&last_use(b)))
            .unwrap_or_default()
    }
}

/// Keep `floor(len * density)` timings at evenly spaced indices.
pub fn select_timings(timings: &[f64], density: f64) -> Vec<f64> {
    let count = (timings.len() as f64 * density).floor() as usize;
    if count >= timings.len() {
        return timings.to_vec();
    }
    let step = timings.len() as f64 / count as f64;
    (0..count)
        .map(|i| timings[(i as f64 * step).floor() as usize])
        .collect()
}
