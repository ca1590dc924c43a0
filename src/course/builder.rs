//! Skill tree construction from course documents.
//!
//! The builder is the bridge from loose JSON records to the typed tree:
//! module records become skill nodes, Meta-Badge outcome records become
//! badge definitions, and the prerequisites map wires the edges. It is
//! deliberately tolerant where the validator is strict. Callers that want
//! hard guarantees run [`validate`](crate::course::validate) first; the
//! builder itself only refuses to proceed when the configured policy says
//! an unknown requirement kind is fatal.

use std::collections::HashMap;

use serde_json::Value;
use tracing::debug;

use crate::config::UnknownRequirementPolicy;
use crate::course::documents::{CourseDocuments, Section};
use crate::course::META_BADGE_LEVEL;
use crate::error::{AscentError, Result};
use crate::tree::{Badge, SkillLevel, SkillNode, SkillTree, UnlockRequirement};

/// Default tree name when the caller does not supply one.
const DEFAULT_TREE_NAME: &str = "course";

/// Builds a [`SkillTree`] from a loaded document set.
#[derive(Debug, Clone, Default)]
pub struct CourseBuilder {
    name: Option<String>,
    policy: UnknownRequirementPolicy,
}

/// A constructed tree plus everything the builder had to paper over.
#[derive(Debug)]
pub struct CourseBuild {
    pub tree: SkillTree,
    pub warnings: Vec<String>,
}

impl CourseBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Name for the resulting tree, typically the course directory name.
    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    #[must_use]
    pub fn with_policy(mut self, policy: UnknownRequirementPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn build(&self, docs: &CourseDocuments) -> Result<CourseBuild> {
        let name = self.name.as_deref().unwrap_or(DEFAULT_TREE_NAME);
        let mut tree = SkillTree::new(name, "");
        let mut warnings = Vec::new();

        let prerequisites = prerequisite_edges(docs);

        for (idx, record) in docs.records(Section::Modules).iter().enumerate() {
            let Some(module_name) = non_empty_str(record, "name") else {
                warnings.push(format!("modules[{idx}]: skipped (missing 'name')"));
                continue;
            };
            if tree.node(module_name).is_some() {
                warnings.push(format!(
                    "modules[{idx}]: duplicate module name '{module_name}', later definition wins"
                ));
            }

            let node = self.build_node(module_name, record, &prerequisites, &mut warnings)?;
            tree.add_node(node);
        }

        for (idx, record) in docs.records(Section::Outcomes).iter().enumerate() {
            if str_field(record, "level") != Some(META_BADGE_LEVEL) {
                continue;
            }
            let Some(id) = non_empty_str(record, "id") else {
                warnings.push(format!("outcomes[{idx}]: badge skipped (missing 'id')"));
                continue;
            };
            tree.add_badge(build_badge(id, record, &mut warnings));
        }

        let report = tree.integrity_report();
        for dangling in &report.dangling {
            warnings.push(format!(
                "node '{}' lists unknown prerequisite '{}'",
                dangling.node_id, dangling.prerequisite
            ));
        }
        for cycle in &report.cycles {
            warnings.push(format!("prerequisite cycle: {}", cycle.join(" -> ")));
        }

        debug!(
            "built tree '{}': {} nodes, {} badges, {} warnings",
            tree.name(),
            tree.len(),
            tree.badges().len(),
            warnings.len()
        );
        Ok(CourseBuild { tree, warnings })
    }

    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    fn build_node(
        &self,
        module_name: &str,
        record: &Value,
        prerequisites: &HashMap<String, Vec<String>>,
        warnings: &mut Vec<String>,
    ) -> Result<SkillNode> {
        let gamification = record.get("gamification");
        let field = |key: &str| gamification.and_then(|g| g.get(key)).filter(|v| !v.is_null());

        let level = match field("skill_level") {
            None => SkillLevel::Recognition,
            Some(value) => value
                .as_str()
                .and_then(|s| s.parse().ok())
                .unwrap_or_else(|| {
                    warnings.push(format!(
                        "module '{module_name}': unrecognized skill_level {value}, \
                         defaulting to Recognition"
                    ));
                    SkillLevel::Recognition
                }),
        };

        let mut node = SkillNode::new(module_name, module_name, level);
        if let Some(overview) = str_field(record, "overview") {
            node.description = overview.to_string();
        }

        if let Some(value) = field("xp_required") {
            match value.as_f64().filter(|n| n.is_finite() && *n >= 0.0) {
                Some(n) => node.xp_required = n as u64,
                None => warnings.push(format!(
                    "module '{module_name}': unusable xp_required {value}, defaulting to 0"
                )),
            }
        }

        if let Some(value) = field("mastery_threshold") {
            match value.as_f64().filter(|n| (0.0..=1.0).contains(n)) {
                Some(n) => node.mastery_threshold = n,
                None => warnings.push(format!(
                    "module '{module_name}': mastery_threshold {value} outside [0, 1], \
                     keeping default"
                )),
            }
        }

        if let Some(badges) = field("badges").and_then(Value::as_array) {
            node.badges = badges
                .iter()
                .filter_map(Value::as_str)
                .map(str::to_string)
                .collect();
        }

        if let Some(prereqs) = prerequisites.get(module_name) {
            node.prerequisites.clone_from(prereqs);
        }

        if let Some(requirements) = field("unlock_requirements").and_then(Value::as_object) {
            for (kind, value) in requirements {
                if let Some(requirement) =
                    self.parse_requirement(module_name, kind, value, warnings)?
                {
                    node.unlock_requirements.push(requirement);
                }
            }
        }

        Ok(node)
    }

    /// Turn one `kind: payload` pair into a typed requirement.
    ///
    /// Known kinds with a malformed payload degrade to
    /// [`UnlockRequirement::Unsupported`] so the node stays shut instead of
    /// silently opening. Unknown kinds follow the configured policy.
    fn parse_requirement(
        &self,
        node_id: &str,
        kind: &str,
        value: &Value,
        warnings: &mut Vec<String>,
    ) -> Result<Option<UnlockRequirement>> {
        let parsed = match kind {
            "quiz_score" => parse_quiz_score(value),
            "assignment_completion" => Some(UnlockRequirement::AssignmentsCompleted {
                assignment_ids: id_list(value),
            }),
            "badge_earned" => Some(UnlockRequirement::BadgesEarned {
                badge_ids: id_list(value),
            }),
            unknown => {
                return match self.policy {
                    UnknownRequirementPolicy::FailClosed => {
                        warnings.push(format!(
                            "node '{node_id}': unknown unlock requirement kind '{unknown}', \
                             treating as never satisfied"
                        ));
                        Ok(Some(UnlockRequirement::Unsupported {
                            kind: unknown.to_string(),
                        }))
                    }
                    UnknownRequirementPolicy::Ignore => {
                        warnings.push(format!(
                            "node '{node_id}': ignoring unknown unlock requirement kind \
                             '{unknown}'"
                        ));
                        Ok(None)
                    }
                    UnknownRequirementPolicy::Reject => Err(AscentError::UnsupportedRequirement {
                        node_id: node_id.to_string(),
                        kind: unknown.to_string(),
                    }),
                };
            }
        };

        Ok(Some(parsed.unwrap_or_else(|| {
            warnings.push(format!(
                "node '{node_id}': malformed '{kind}' requirement payload, \
                 treating as never satisfied"
            ));
            UnlockRequirement::Unsupported {
                kind: kind.to_string(),
            }
        })))
    }
}

/// `["quiz-id", 80]` in exports; the object spelling appears in
/// hand-edited courses.
fn parse_quiz_score(value: &Value) -> Option<UnlockRequirement> {
    let (quiz_id, min_score) = match value {
        Value::Array(parts) => (
            parts.first().and_then(Value::as_str),
            parts.get(1).and_then(Value::as_f64),
        ),
        Value::Object(_) => (
            value.get("quiz_id").and_then(Value::as_str),
            value.get("min_score").and_then(Value::as_f64),
        ),
        _ => (None, None),
    };
    match (quiz_id, min_score) {
        (Some(quiz_id), Some(min_score)) => Some(UnlockRequirement::QuizScore {
            quiz_id: quiz_id.to_string(),
            min_score,
        }),
        _ => None,
    }
}

/// Requirement payloads accept a single id or a list of ids.
fn id_list(value: &Value) -> Vec<String> {
    match value {
        Value::String(s) => vec![s.clone()],
        Value::Array(items) => items
            .iter()
            .filter_map(Value::as_str)
            .map(str::to_string)
            .collect(),
        _ => Vec::new(),
    }
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn build_badge(id: &str, record: &Value, warnings: &mut Vec<String>) -> Badge {
    let name = str_field(record, "name").unwrap_or(id);

    let mut badge = Badge::new(id, name, 0);
    if let Some(value) = record.get("xp_value").filter(|v| !v.is_null()) {
        match value.as_f64().filter(|n| n.is_finite() && *n >= 0.0) {
            Some(n) => badge.xp_value = n as u64,
            None => warnings.push(format!(
                "badge '{id}': unusable xp_value {value}, defaulting to 0"
            )),
        }
    }
    if let Some(description) = str_field(record, "description") {
        badge.description = description.to_string();
    }
    if let Some(criteria) = str_field(record, "criteria") {
        badge.criteria = criteria.to_string();
    }
    badge.image_url = str_field(record, "image_url").map(str::to_string);
    badge.category = str_field(record, "category").map(str::to_string);
    if let Some(requirements) = record.get("unlock_requirements").and_then(Value::as_array) {
        badge.unlock_requirements = requirements.clone();
    }
    badge
}

/// Flatten the prerequisites document into module name edges.
fn prerequisite_edges(docs: &CourseDocuments) -> HashMap<String, Vec<String>> {
    let mut edges = HashMap::new();
    let Some(map) = docs.prerequisite_map() else {
        return edges;
    };
    for (module, deps) in map {
        let Some(deps) = deps.as_array() else {
            continue;
        };
        let deps: Vec<String> = deps
            .iter()
            .filter_map(Value::as_str)
            .map(str::to_string)
            .collect();
        edges.insert(module.clone(), deps);
    }
    edges
}

fn str_field<'a>(record: &'a Value, key: &str) -> Option<&'a str> {
    record.get(key).and_then(Value::as_str)
}

fn non_empty_str<'a>(record: &'a Value, key: &str) -> Option<&'a str> {
    str_field(record, key).filter(|s| !s.trim().is_empty())
}
