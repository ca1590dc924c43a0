//! Engine configuration.
//!
//! A small TOML file tunes the two policy knobs the engine exposes: the
//! per-activity XP multiplier table and the treatment of unlock-requirement
//! kinds the engine does not understand. Everything is optional; an absent
//! key means the built-in default.
//!
//! ```toml
//! [xp]
//! multipliers = { quiz = 1.5, lab = 0.9 }
//!
//! [unlock]
//! unknown_requirements = "reject"
//! ```

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{AscentError, Result};
use crate::xp::XpSystem;

/// What the course builder does with an unlock-requirement kind outside the
/// supported set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum UnknownRequirementPolicy {
    /// Keep the requirement as an unsatisfiable gate: the node stays locked.
    #[default]
    FailClosed,
    /// Drop the requirement with a warning, as if it were never declared.
    Ignore,
    /// Abort the build with an error naming the kind.
    Reject,
}

/// `[xp]` section.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct XpConfig {
    /// Per-activity multiplier overrides, merged over the built-in table.
    #[serde(default)]
    pub multipliers: BTreeMap<String, f64>,
}

/// `[unlock]` section.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnlockConfig {
    #[serde(default)]
    pub unknown_requirements: UnknownRequirementPolicy,
}

/// Top-level engine configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EngineConfig {
    #[serde(default)]
    pub xp: XpConfig,

    #[serde(default)]
    pub unlock: UnlockConfig,
}

impl EngineConfig {
    /// Load configuration from a TOML file.
    pub fn load(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .map_err(|err| AscentError::Config(format!("read {}: {err}", path.display())))?;
        Ok(toml::from_str(&raw)?)
    }

    /// Load from `path` when given, otherwise the defaults.
    pub fn load_or_default(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::load(path),
            None => Ok(Self::default()),
        }
    }

    /// Build an [`XpSystem`] with this config's multiplier overrides merged
    /// over the defaults.
    #[must_use]
    pub fn xp_system(&self) -> XpSystem {
        let mut xp = XpSystem::new();
        for (activity, value) in &self.xp.multipliers {
            xp.set_multiplier(activity, *value);
        }
        xp
    }
}
