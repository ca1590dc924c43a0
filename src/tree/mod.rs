//! Skill tree model: levels, nodes, badges, progress snapshots.

pub mod badge;
pub mod level;
pub mod node;
pub mod progress;
#[allow(clippy::module_inception)]
pub mod tree;

pub use badge::Badge;
pub use level::SkillLevel;
pub use node::{SkillNode, UnlockRequirement};
pub use progress::{AssignmentProgress, NodeProgress, StudentProgress};
pub use tree::{
    DanglingPrerequisite, IntegrityReport, LevelProgress, NodeStatus, SkillTree,
    TreeProgressSummary, VisualizationData, VizEdge, VizNode,
};
