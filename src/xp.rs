//! Experience point awards and level progression.
//!
//! Awards are pure arithmetic over a per-activity multiplier table. Level
//! thresholds are precomputed once at construction into a sorted table, so
//! a level lookup is a binary search with no per-call allocation.

use std::collections::HashMap;

use serde::Serialize;

/// Highest reachable level. XP beyond the last threshold stays at this cap.
pub const MAX_LEVEL: u32 = 50;

/// Multiplier applied to activity types with no table entry.
const DEFAULT_MULTIPLIER: f64 = 1.0;

const DEFAULT_MULTIPLIERS: [(&str, f64); 5] = [
    ("assignment", 1.0),
    ("quiz", 1.2),
    ("discussion", 0.8),
    ("project", 2.0),
    ("bonus", 1.5),
];

/// Resolved level standing for a given XP total.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct LevelInfo {
    pub level: u32,
    /// XP still needed to reach the next level; 0 at the cap.
    pub xp_to_next: u64,
    /// XP accumulated past the current level's threshold; 0 at the cap.
    pub xp_into_level: u64,
}

/// XP award rules and level thresholds.
#[derive(Debug, Clone)]
pub struct XpSystem {
    multipliers: HashMap<String, f64>,
    thresholds: Vec<u64>,
}

impl Default for XpSystem {
    fn default() -> Self {
        Self::new()
    }
}

impl XpSystem {
    /// Create a system with the default multiplier table.
    #[must_use]
    pub fn new() -> Self {
        let multipliers = DEFAULT_MULTIPLIERS
            .iter()
            .map(|&(name, value)| (name.to_string(), value))
            .collect();
        Self {
            multipliers,
            thresholds: build_thresholds(),
        }
    }

    /// Override or extend one activity multiplier.
    pub fn set_multiplier(&mut self, activity_type: impl Into<String>, value: f64) {
        self.multipliers.insert(activity_type.into(), value);
    }

    /// Multiplier for an activity type; unknown types fall back to 1.0.
    #[must_use]
    pub fn multiplier(&self, activity_type: &str) -> f64 {
        self.multipliers
            .get(activity_type)
            .copied()
            .unwrap_or(DEFAULT_MULTIPLIER)
    }

    /// XP awarded for one activity.
    ///
    /// `base_points * multiplier * performance_score * bonus_multiplier`,
    /// truncated to an integer and clamped at zero. Non-finite products
    /// award nothing.
    #[must_use]
    pub fn calculate_xp(
        &self,
        activity_type: &str,
        base_points: f64,
        performance_score: f64,
        bonus_multiplier: f64,
    ) -> u64 {
        let raw =
            base_points * self.multiplier(activity_type) * performance_score * bonus_multiplier;
        if raw.is_finite() && raw > 0.0 {
            raw as u64
        } else {
            0
        }
    }

    /// Level thresholds in ascending order; `thresholds()[L-1]` is the XP
    /// floor of level L.
    #[must_use]
    pub fn thresholds(&self) -> &[u64] {
        &self.thresholds
    }

    /// Resolve the level standing for an XP total.
    ///
    /// At or above the final threshold the standing is pinned to
    /// `(MAX_LEVEL, 0, 0)`. Below it, `xp_into_level + xp_to_next` always
    /// spans exactly the gap to the next threshold.
    #[must_use]
    pub fn level_for_xp(&self, xp: u64) -> LevelInfo {
        // thresholds[0] == 0, so the partition point is always >= 1.
        let idx = self.thresholds.partition_point(|&t| t <= xp) - 1;
        if idx + 1 >= self.thresholds.len() {
            return LevelInfo {
                level: MAX_LEVEL,
                xp_to_next: 0,
                xp_into_level: 0,
            };
        }
        LevelInfo {
            level: idx as u32 + 1,
            xp_to_next: self.thresholds[idx + 1] - xp,
            xp_into_level: xp - self.thresholds[idx],
        }
    }
}

/// Threshold table: level 1 starts at 0, and reaching level L costs
/// `floor(100 * (L-1)^1.5)` more than reaching L-1.
fn build_thresholds() -> Vec<u64> {
    let mut thresholds = Vec::with_capacity(MAX_LEVEL as usize);
    thresholds.push(0);
    let mut total = 0u64;
    for level in 2..=MAX_LEVEL {
        total += (100.0 * f64::from(level - 1).powf(1.5)).floor() as u64;
        thresholds.push(total);
    }
    thresholds
}
