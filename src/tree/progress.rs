//! Caller-owned student progress snapshot.
//!
//! The engine never stores learner state. Callers assemble a
//! [`StudentProgress`] from whatever system of record they have (LMS
//! submissions, a grade export, a test fixture) and pass it into queries.
//! Every lookup on a missing key answers "not satisfied": unlock evaluation
//! fails locked rather than guessing.

use std::collections::{BTreeSet, HashMap};
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{AscentError, Result};

/// Per-node completion state.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct NodeProgress {
    #[serde(default)]
    pub completed: bool,
}

/// Per-assignment completion state.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct AssignmentProgress {
    #[serde(default)]
    pub completed: bool,
}

/// Snapshot of one student's standing, as far as unlock evaluation cares.
///
/// All fields default to empty so partial snapshots deserialize cleanly.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StudentProgress {
    /// Total accumulated experience points.
    #[serde(default)]
    pub total_xp: u64,

    /// Completion state keyed by skill node id.
    #[serde(default)]
    pub nodes: HashMap<String, NodeProgress>,

    /// Best quiz scores keyed by quiz id, on whatever scale the course uses.
    #[serde(default)]
    pub quiz_scores: HashMap<String, f64>,

    /// Completion state keyed by assignment id.
    #[serde(default)]
    pub assignments: HashMap<String, AssignmentProgress>,

    /// Ids of badges already earned.
    #[serde(default)]
    pub badges: BTreeSet<String>,
}

impl StudentProgress {
    /// Read a snapshot from a JSON file.
    pub fn load(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)?;
        serde_json::from_str(&raw).map_err(|err| {
            AscentError::InvalidProgress(format!("{}: {err}", path.display()))
        })
    }

    /// Whether the given skill node is marked completed.
    #[must_use]
    pub fn node_completed(&self, node_id: &str) -> bool {
        self.nodes.get(node_id).is_some_and(|n| n.completed)
    }

    /// Recorded score for a quiz, if any.
    #[must_use]
    pub fn quiz_score(&self, quiz_id: &str) -> Option<f64> {
        self.quiz_scores.get(quiz_id).copied()
    }

    /// Whether the given assignment is marked completed.
    #[must_use]
    pub fn assignment_completed(&self, assignment_id: &str) -> bool {
        self.assignments.get(assignment_id).is_some_and(|a| a.completed)
    }

    /// Whether the student already holds a badge.
    #[must_use]
    pub fn has_badge(&self, badge_id: &str) -> bool {
        self.badges.contains(badge_id)
    }
}
