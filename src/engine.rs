//! Gamification engine: tree queries + XP rules behind one handle.
//!
//! The engine owns a built [`SkillTree`] and an [`XpSystem`] and composes
//! them into read-only answers. It holds no student state and mutates
//! nothing after construction, so one instance serves any number of
//! concurrent progress snapshots.

use serde::Serialize;

use crate::tree::{Badge, SkillLevel, SkillTree, StudentProgress, TreeProgressSummary};
use crate::xp::{LevelInfo, XpSystem};

/// Badge line in a progress report.
#[derive(Debug, Clone, Serialize)]
pub struct BadgeSummary {
    pub id: String,
    pub name: String,
    pub xp_value: u64,
}

/// Frontier node line in a progress report.
#[derive(Debug, Clone, Serialize)]
pub struct NodeSummary {
    pub id: String,
    pub name: String,
    pub level: SkillLevel,
    pub xp_required: u64,
}

/// One-shot read-only summary for a single student.
#[derive(Debug, Clone, Serialize)]
pub struct ProgressReport {
    pub skill_tree_progress: TreeProgressSummary,
    pub level_info: LevelInfo,
    /// Badges the student is currently eligible to earn.
    pub badges: Vec<BadgeSummary>,
    pub next_unlocks: Vec<NodeSummary>,
}

/// Skill tree plus XP rules for one course.
#[derive(Debug, Clone)]
pub struct GamificationEngine {
    tree: SkillTree,
    xp: XpSystem,
}

impl GamificationEngine {
    #[must_use]
    pub fn new(tree: SkillTree, xp: XpSystem) -> Self {
        Self { tree, xp }
    }

    #[must_use]
    pub fn tree(&self) -> &SkillTree {
        &self.tree
    }

    #[must_use]
    pub fn xp(&self) -> &XpSystem {
        &self.xp
    }

    /// Compute the XP an activity would award. Pure calculation; recording
    /// the award against a student is the caller's business.
    #[must_use]
    pub fn award_xp(
        &self,
        activity_type: &str,
        base_points: f64,
        performance_score: f64,
        bonus_multiplier: f64,
    ) -> u64 {
        self.xp
            .calculate_xp(activity_type, base_points, performance_score, bonus_multiplier)
    }

    /// Badges not yet earned whose XP threshold the student meets.
    ///
    /// Eligibility is XP-only. Badge `unlock_requirements` payloads are
    /// deliberately not consulted (see [`Badge::unlock_requirements`]).
    #[must_use]
    pub fn eligible_badges(&self, progress: &StudentProgress) -> Vec<&Badge> {
        self.tree
            .badges()
            .iter()
            .filter(|b| !progress.has_badge(&b.id))
            .filter(|b| progress.total_xp >= b.xp_value)
            .collect()
    }

    /// Compose tree progress, level standing, badge eligibility, and the
    /// unlock frontier into one serializable report.
    #[must_use]
    pub fn progress_report(&self, progress: &StudentProgress) -> ProgressReport {
        let badges = self
            .eligible_badges(progress)
            .into_iter()
            .map(|b| BadgeSummary {
                id: b.id.clone(),
                name: b.name.clone(),
                xp_value: b.xp_value,
            })
            .collect();

        let next_unlocks = self
            .tree
            .next_available_nodes(progress)
            .into_iter()
            .map(|n| NodeSummary {
                id: n.id.clone(),
                name: n.name.clone(),
                level: n.level,
                xp_required: n.xp_required,
            })
            .collect();

        ProgressReport {
            skill_tree_progress: self.tree.progress_summary(progress),
            level_info: self.xp.level_for_xp(progress.total_xp),
            badges,
            next_unlocks,
        }
    }
}
