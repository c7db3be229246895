//! CLI command implementations.
//!
//! This module contains the implementation of each CLI command.

pub mod analysis;
pub mod edit;
pub mod recording;
pub mod template;

use keyfall_core::{Derivation, Difficulty};

/// `--project-from` as a derivation strategy.
pub(crate) fn derivation(project_from: Option<Difficulty>) -> Derivation {
    match project_from {
        Some(base) => Derivation::Projected { base },
        None => Derivation::Direct,
    }
}
