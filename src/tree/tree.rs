//! Skill tree aggregate: node arena, unlock queries, exports.
//!
//! Nodes live in an insertion-ordered arena with an id index on the side, so
//! every query walks nodes in a deterministic order regardless of hash
//! seeding. Student state never enters the tree: queries take a
//! [`StudentProgress`] snapshot and recompute unlock state from scratch,
//! trading recomputation for never holding stale per-student caches. Once
//! populated, a tree is read-only and safe to share across threads.

use std::collections::{BTreeMap, HashMap, HashSet};

use serde::Serialize;

use crate::tree::badge::Badge;
use crate::tree::level::SkillLevel;
use crate::tree::node::SkillNode;
use crate::tree::progress::StudentProgress;

/// A populated course skill tree.
#[derive(Debug, Clone, Default)]
pub struct SkillTree {
    name: String,
    description: String,
    nodes: Vec<SkillNode>,
    index: HashMap<String, usize>,
    badges: Vec<Badge>,
    badge_index: HashMap<String, usize>,
}

/// Unlock progress for one level bucket.
#[derive(Debug, Clone, Copy, Default, Serialize, PartialEq)]
pub struct LevelProgress {
    pub unlocked: usize,
    pub total: usize,
    pub percent: f64,
}

/// Aggregate progress snapshot over a whole tree.
#[derive(Debug, Clone, Serialize)]
pub struct TreeProgressSummary {
    /// Percentage of nodes currently unlocked, 0-100.
    pub total_progress: f64,
    pub unlocked_nodes: usize,
    pub total_nodes: usize,
    pub level_progress: BTreeMap<SkillLevel, LevelProgress>,
    pub current_xp: u64,
    pub earned_badges: usize,
}

/// Presentation status of a node for one student.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeStatus {
    Unlocked,
    Available,
    Locked,
}

/// One node in the visualization export.
#[derive(Debug, Clone, Serialize)]
pub struct VizNode {
    pub id: String,
    pub name: String,
    pub level: SkillLevel,
    pub status: NodeStatus,
}

/// One prerequisite edge in the visualization export.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct VizEdge {
    pub from: String,
    pub to: String,
}

/// Flat node/edge export for a rendering layer.
#[derive(Debug, Clone, Serialize)]
pub struct VisualizationData {
    pub nodes: Vec<VizNode>,
    pub edges: Vec<VizEdge>,
}

/// A prerequisite reference that resolves to no node in the tree.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct DanglingPrerequisite {
    pub node_id: String,
    pub prerequisite: String,
}

/// Structural problems found in a built tree.
///
/// Dangling prerequisites keep their node permanently locked; cycles lock
/// every member. Both are tolerated at query time, so surfacing them here is
/// the only chance a course author gets.
#[derive(Debug, Clone, Default, Serialize)]
pub struct IntegrityReport {
    pub dangling: Vec<DanglingPrerequisite>,
    pub cycles: Vec<Vec<String>>,
}

impl IntegrityReport {
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.dangling.is_empty() && self.cycles.is_empty()
    }
}

impl SkillTree {
    /// Create an empty tree.
    #[must_use]
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Insert a node. A node with an already-registered id replaces the
    /// existing one in place, keeping its arena position.
    pub fn add_node(&mut self, node: SkillNode) {
        if let Some(&pos) = self.index.get(&node.id) {
            self.nodes[pos] = node;
        } else {
            self.index.insert(node.id.clone(), self.nodes.len());
            self.nodes.push(node);
        }
    }

    /// Insert a badge. Same replace-by-id semantics as [`Self::add_node`].
    pub fn add_badge(&mut self, badge: Badge) {
        if let Some(&pos) = self.badge_index.get(&badge.id) {
            self.badges[pos] = badge;
        } else {
            self.badge_index.insert(badge.id.clone(), self.badges.len());
            self.badges.push(badge);
        }
    }

    #[must_use]
    pub fn node(&self, id: &str) -> Option<&SkillNode> {
        self.index.get(id).map(|&pos| &self.nodes[pos])
    }

    /// All nodes in insertion order.
    #[must_use]
    pub fn nodes(&self) -> &[SkillNode] {
        &self.nodes
    }

    #[must_use]
    pub fn badge(&self, id: &str) -> Option<&Badge> {
        self.badge_index.get(id).map(|&pos| &self.badges[pos])
    }

    /// All badges in insertion order.
    #[must_use]
    pub fn badges(&self) -> &[Badge] {
        &self.badges
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Nodes at one level, in insertion order.
    pub fn nodes_at_level(&self, level: SkillLevel) -> impl Iterator<Item = &SkillNode> {
        self.nodes.iter().filter(move |n| n.level == level)
    }

    /// Every node whose gates all hold for the snapshot, in insertion order.
    #[must_use]
    pub fn unlocked_nodes(&self, progress: &StudentProgress) -> Vec<&SkillNode> {
        self.nodes
            .iter()
            .filter(|n| n.is_unlocked(progress))
            .collect()
    }

    /// The frontier: nodes not yet unlocked whose every prerequisite is in
    /// the unlocked set. A node gated only by XP it lacks still shows up
    /// here, which is exactly what a "what's next" view wants.
    #[must_use]
    pub fn next_available_nodes(&self, progress: &StudentProgress) -> Vec<&SkillNode> {
        let unlocked: HashSet<&str> = self
            .unlocked_nodes(progress)
            .iter()
            .map(|n| n.id.as_str())
            .collect();

        self.nodes
            .iter()
            .filter(|n| !unlocked.contains(n.id.as_str()))
            .filter(|n| {
                n.prerequisites
                    .iter()
                    .all(|p| unlocked.contains(p.as_str()))
            })
            .collect()
    }

    /// Fraction of nodes marked completed in the snapshot, in [0, 1].
    ///
    /// Distinct from unlock percentage: only explicit completion counts.
    /// An empty tree yields 0.0 rather than dividing by zero.
    #[must_use]
    pub fn completion_ratio(&self, progress: &StudentProgress) -> f64 {
        if self.nodes.is_empty() {
            return 0.0;
        }
        let completed = self
            .nodes
            .iter()
            .filter(|n| progress.node_completed(&n.id))
            .count();
        completed as f64 / self.nodes.len() as f64
    }

    /// Per-level and overall unlock percentages plus XP/badge counts.
    #[must_use]
    pub fn progress_summary(&self, progress: &StudentProgress) -> TreeProgressSummary {
        let unlocked: HashSet<&str> = self
            .unlocked_nodes(progress)
            .iter()
            .map(|n| n.id.as_str())
            .collect();

        let mut level_progress: BTreeMap<SkillLevel, LevelProgress> = BTreeMap::new();
        for node in &self.nodes {
            let entry = level_progress.entry(node.level).or_default();
            entry.total += 1;
            if unlocked.contains(node.id.as_str()) {
                entry.unlocked += 1;
            }
        }
        for entry in level_progress.values_mut() {
            entry.percent = if entry.total == 0 {
                0.0
            } else {
                entry.unlocked as f64 / entry.total as f64 * 100.0
            };
        }

        let total_progress = if self.nodes.is_empty() {
            0.0
        } else {
            unlocked.len() as f64 / self.nodes.len() as f64 * 100.0
        };

        TreeProgressSummary {
            total_progress,
            unlocked_nodes: unlocked.len(),
            total_nodes: self.nodes.len(),
            level_progress,
            current_xp: progress.total_xp,
            earned_badges: progress.badges.len(),
        }
    }

    /// Export nodes tagged unlocked/available/locked plus prerequisite
    /// edges, for a rendering layer. Edges are emitted only for
    /// prerequisites that resolve; unresolved ones are the integrity
    /// report's business.
    #[must_use]
    pub fn visualization_data(&self, progress: &StudentProgress) -> VisualizationData {
        let unlocked: HashSet<&str> = self
            .unlocked_nodes(progress)
            .iter()
            .map(|n| n.id.as_str())
            .collect();
        let available: HashSet<&str> = self
            .next_available_nodes(progress)
            .iter()
            .map(|n| n.id.as_str())
            .collect();

        let nodes = self
            .nodes
            .iter()
            .map(|n| {
                let status = if unlocked.contains(n.id.as_str()) {
                    NodeStatus::Unlocked
                } else if available.contains(n.id.as_str()) {
                    NodeStatus::Available
                } else {
                    NodeStatus::Locked
                };
                VizNode {
                    id: n.id.clone(),
                    name: n.name.clone(),
                    level: n.level,
                    status,
                }
            })
            .collect();

        let mut edges = Vec::new();
        for node in &self.nodes {
            for prereq in &node.prerequisites {
                if self.index.contains_key(prereq) {
                    edges.push(VizEdge {
                        from: prereq.clone(),
                        to: node.id.clone(),
                    });
                }
            }
        }

        VisualizationData { nodes, edges }
    }

    /// Scan for dangling prerequisites and prerequisite cycles.
    #[must_use]
    pub fn integrity_report(&self) -> IntegrityReport {
        let mut dangling = Vec::new();
        for node in &self.nodes {
            for prereq in &node.prerequisites {
                if !self.index.contains_key(prereq) {
                    dangling.push(DanglingPrerequisite {
                        node_id: node.id.clone(),
                        prerequisite: prereq.clone(),
                    });
                }
            }
        }

        IntegrityReport {
            dangling,
            cycles: self.detect_cycles(),
        }
    }

    /// DFS with back-edge detection over prerequisite edges. Nodes are
    /// visited in arena order so reported cycles are stable across runs.
    fn detect_cycles(&self) -> Vec<Vec<String>> {
        let mut cycles = Vec::new();
        let mut visited = HashSet::new();
        let mut rec_stack = HashSet::new();
        let mut path = Vec::new();

        for node in &self.nodes {
            if !visited.contains(node.id.as_str()) {
                self.dfs_detect_cycles(
                    &node.id,
                    &mut visited,
                    &mut rec_stack,
                    &mut path,
                    &mut cycles,
                );
            }
        }

        cycles
    }

    fn dfs_detect_cycles<'a>(
        &'a self,
        node_id: &'a str,
        visited: &mut HashSet<&'a str>,
        rec_stack: &mut HashSet<&'a str>,
        path: &mut Vec<&'a str>,
        cycles: &mut Vec<Vec<String>>,
    ) {
        visited.insert(node_id);
        rec_stack.insert(node_id);
        path.push(node_id);

        if let Some(node) = self.node(node_id) {
            for prereq in &node.prerequisites {
                if !self.index.contains_key(prereq) {
                    continue;
                }
                if !visited.contains(prereq.as_str()) {
                    self.dfs_detect_cycles(prereq, visited, rec_stack, path, cycles);
                } else if rec_stack.contains(prereq.as_str()) {
                    if let Some(start) = path.iter().position(|&id| id == prereq) {
                        cycles.push(path[start..].iter().map(ToString::to_string).collect());
                    }
                }
            }
        }

        path.pop();
        rec_stack.remove(node_id);
    }
}
