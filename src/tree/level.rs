//! Skill level progression.
//!
//! Levels form a strict conceptual ladder from pattern recognition up to
//! mastery. The derived ordering follows declaration order, so comparisons
//! like `SkillLevel::Intuition > SkillLevel::Application` hold by
//! construction.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::AscentError;

/// Depth of understanding a skill node targets.
#[derive(Debug, Clone, Copy, Hash, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord)]
pub enum SkillLevel {
    /// Recognize the pattern when seen
    Recognition,
    /// Apply the pattern in guided settings
    Application,
    /// Reach for the pattern without prompting
    Intuition,
    /// Combine patterns into new solutions
    Synthesis,
    /// Teach and extend the pattern
    Mastery,
}

impl SkillLevel {
    /// All levels in ascending order.
    pub const ALL: [Self; 5] = [
        Self::Recognition,
        Self::Application,
        Self::Intuition,
        Self::Synthesis,
        Self::Mastery,
    ];

    /// 1-based position on the ladder.
    #[must_use]
    pub const fn rank(self) -> u8 {
        match self {
            Self::Recognition => 1,
            Self::Application => 2,
            Self::Intuition => 3,
            Self::Synthesis => 4,
            Self::Mastery => 5,
        }
    }

    /// Canonical name as it appears in course JSON.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Recognition => "Recognition",
            Self::Application => "Application",
            Self::Intuition => "Intuition",
            Self::Synthesis => "Synthesis",
            Self::Mastery => "Mastery",
        }
    }
}

impl FromStr for SkillLevel {
    type Err = AscentError;

    // Course JSON uses a fixed vocabulary; matching is deliberately
    // case-sensitive so typos surface during validation.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Recognition" => Ok(Self::Recognition),
            "Application" => Ok(Self::Application),
            "Intuition" => Ok(Self::Intuition),
            "Synthesis" => Ok(Self::Synthesis),
            "Mastery" => Ok(Self::Mastery),
            _ => Err(AscentError::InvalidLevel(s.to_string())),
        }
    }
}

impl fmt::Display for SkillLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn levels_order_ascending() {
        assert!(SkillLevel::Recognition < SkillLevel::Application);
        assert!(SkillLevel::Application < SkillLevel::Intuition);
        assert!(SkillLevel::Intuition < SkillLevel::Synthesis);
        assert!(SkillLevel::Synthesis < SkillLevel::Mastery);
    }

    #[test]
    fn ranks_match_declaration_order() {
        for (i, level) in SkillLevel::ALL.iter().enumerate() {
            assert_eq!(level.rank() as usize, i + 1);
        }
    }

    #[test]
    fn parses_canonical_names() {
        for level in SkillLevel::ALL {
            assert_eq!(level.as_str().parse::<SkillLevel>().unwrap(), level);
        }
    }

    #[test]
    fn rejects_unknown_and_miscased_names() {
        assert!("Wizard".parse::<SkillLevel>().is_err());
        assert!("recognition".parse::<SkillLevel>().is_err());
        assert!("MASTERY".parse::<SkillLevel>().is_err());
        assert!("".parse::<SkillLevel>().is_err());
    }

    #[test]
    fn display_round_trips_through_from_str() {
        for level in SkillLevel::ALL {
            assert_eq!(level.to_string().parse::<SkillLevel>().unwrap(), level);
        }
    }

    #[test]
    fn serde_uses_canonical_names() {
        let json = serde_json::to_string(&SkillLevel::Intuition).unwrap();
        assert_eq!(json, "\"Intuition\"");
        let back: SkillLevel = serde_json::from_str("\"Synthesis\"").unwrap();
        assert_eq!(back, SkillLevel::Synthesis);
    }
}
