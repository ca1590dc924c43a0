//! Skill nodes and their unlock requirements.

use serde::{Deserialize, Serialize};

use crate::tree::level::SkillLevel;
use crate::tree::progress::StudentProgress;

/// One gate that must hold before a node unlocks.
///
/// The set of kinds is closed. Course data carrying a kind outside this set
/// becomes [`UnlockRequirement::Unsupported`] at build time (policy
/// permitting), which never evaluates satisfied. Unlocks fail locked: an
/// unknown gate keeps the node shut instead of waving students through.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnlockRequirement {
    /// Student scored at least `min_score` on the quiz.
    QuizScore { quiz_id: String, min_score: f64 },
    /// Student completed every listed assignment.
    AssignmentsCompleted { assignment_ids: Vec<String> },
    /// Student holds every listed badge.
    BadgesEarned { badge_ids: Vec<String> },
    /// Requirement kind the engine does not understand.
    Unsupported { kind: String },
}

impl UnlockRequirement {
    /// Evaluate this requirement against a progress snapshot.
    #[must_use]
    pub fn is_satisfied(&self, progress: &StudentProgress) -> bool {
        match self {
            Self::QuizScore { quiz_id, min_score } => progress
                .quiz_score(quiz_id)
                .is_some_and(|score| score >= *min_score),
            Self::AssignmentsCompleted { assignment_ids } => assignment_ids
                .iter()
                .all(|id| progress.assignment_completed(id)),
            Self::BadgesEarned { badge_ids } => {
                badge_ids.iter().all(|id| progress.has_badge(id))
            }
            Self::Unsupported { .. } => false,
        }
    }
}

fn default_mastery_threshold() -> f64 {
    0.8
}

/// A unit of skill in the tree, typically one course module.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SkillNode {
    pub id: String,
    pub name: String,

    #[serde(default)]
    pub description: String,

    pub level: SkillLevel,

    /// Total XP the student must hold before this node can unlock.
    #[serde(default)]
    pub xp_required: u64,

    /// Ids of nodes that must be completed first.
    #[serde(default)]
    pub prerequisites: Vec<String>,

    #[serde(default)]
    pub unlock_requirements: Vec<UnlockRequirement>,

    /// Ids of badges associated with completing this node.
    #[serde(default)]
    pub badges: Vec<String>,

    /// Completion fraction a deployment should require before treating the
    /// node as mastered. Carried for consumers; unlock evaluation does not
    /// read it.
    #[serde(default = "default_mastery_threshold")]
    pub mastery_threshold: f64,
}

impl SkillNode {
    /// Create a node with no gates beyond its (empty) defaults.
    #[must_use]
    pub fn new(id: impl Into<String>, name: impl Into<String>, level: SkillLevel) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            description: String::new(),
            level,
            xp_required: 0,
            prerequisites: Vec::new(),
            unlock_requirements: Vec::new(),
            badges: Vec::new(),
            mastery_threshold: default_mastery_threshold(),
        }
    }

    /// Whether every gate on this node holds for the given snapshot.
    ///
    /// All three gate families must pass: every prerequisite completed,
    /// total XP at or above `xp_required`, and every unlock requirement
    /// satisfied. Prerequisite ids missing from the snapshot count as not
    /// completed.
    #[must_use]
    pub fn is_unlocked(&self, progress: &StudentProgress) -> bool {
        self.prerequisites
            .iter()
            .all(|id| progress.node_completed(id))
            && progress.total_xp >= self.xp_required
            && self
                .unlock_requirements
                .iter()
                .all(|req| req.is_satisfied(progress))
    }
}
