//! Hero progression: converts accumulated raw XP into a displayed level.
//!
//! Raw XP is converted to effective XP band by band, at a gain rate that
//! shrinks as the hero levels. The final level has no gain, so progress
//! saturates there.

use crate::constants::{
    HERO_LEVEL_THRESHOLDS, HERO_XP_GAIN, MAX_HERO_LEVEL, MAX_UNIT_LEVEL, MIN_UNIT_LEVEL,
    RAW_XP_BY_UNIT_LEVEL,
};
use serde::Serialize;

/// Derived hero progress for one total of raw XP.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ProgressionState {
    pub level: u32,
    pub current_xp: f64,
    pub xp_for_next_level: f64,
    pub total_raw_xp: f64,
}

impl Default for ProgressionState {
    fn default() -> Self {
        calculate_progression(0.0)
    }
}

impl ProgressionState {
    pub fn is_capped(&self) -> bool {
        self.level >= MAX_HERO_LEVEL || self.xp_for_next_level <= 0.0
    }

    /// Bar fill in percent; a capped hero shows a full bar.
    pub fn progress_percent(&self) -> f64 {
        if self.is_capped() {
            100.0
        } else {
            (self.current_xp / self.xp_for_next_level * 100.0).clamp(0.0, 100.0)
        }
    }

    pub fn display_current_xp(&self) -> f64 {
        round2(self.current_xp)
    }

    pub fn display_xp_for_next_level(&self) -> f64 {
        round2(self.xp_for_next_level)
    }
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Raw XP one unit instance of `unit_level` is worth; levels outside 1-10 give nothing.
pub fn raw_xp_for_unit_level(unit_level: u32) -> f64 {
    if (MIN_UNIT_LEVEL..=MAX_UNIT_LEVEL).contains(&unit_level) {
        RAW_XP_BY_UNIT_LEVEL[unit_level as usize]
    } else {
        0.0
    }
}

/// Converts raw XP into effective XP using the diminishing gain table.
pub fn effective_xp(total_raw_xp: f64) -> f64 {
    let mut remaining = total_raw_xp.max(0.0);
    let mut effective = 0.0;

    for level in 1..=MAX_HERO_LEVEL as usize {
        let gain = HERO_XP_GAIN[level];
        if gain == 0.0 {
            break;
        }

        let band = HERO_LEVEL_THRESHOLDS[level] - HERO_LEVEL_THRESHOLDS[level - 1];
        let required = band / gain;
        if remaining >= required {
            remaining -= required;
            effective += band;
        } else {
            effective += remaining * gain;
            break;
        }
    }

    effective
}

/// Computes level and in-level progress for a total of raw XP.
///
/// No rounding happens here; use the `display_*` helpers for presentation.
pub fn calculate_progression(total_raw_xp: f64) -> ProgressionState {
    let total_raw_xp = total_raw_xp.max(0.0);
    let effective = effective_xp(total_raw_xp);

    let completed = (1..=MAX_HERO_LEVEL)
        .filter(|&l| effective >= HERO_LEVEL_THRESHOLDS[l as usize])
        .max()
        .unwrap_or(0);
    let level = (completed + 1).min(MAX_HERO_LEVEL);

    let floor = HERO_LEVEL_THRESHOLDS[level as usize - 1];
    let (current_xp, xp_for_next_level) = if level == MAX_HERO_LEVEL {
        // Capped: the final band reads as full and nothing is left to earn.
        (HERO_LEVEL_THRESHOLDS[level as usize] - floor, 0.0)
    } else {
        (effective - floor, HERO_LEVEL_THRESHOLDS[level as usize] - floor)
    };

    ProgressionState {
        level,
        current_xp,
        xp_for_next_level,
        total_raw_xp,
    }
}
