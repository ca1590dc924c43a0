//! Achievement badge descriptors.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// An earnable achievement attached to a skill tree.
///
/// Badges are immutable descriptors. Whether a student holds one lives in
/// [`crate::tree::StudentProgress`]; eligibility is decided by the engine
/// from `xp_value` alone. The `unlock_requirements` field is carried through
/// from course data untouched because the upstream format never defined how
/// multiple entries combine, and guessing AND vs OR here would silently
/// change who earns what.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Badge {
    pub id: String,
    pub name: String,

    #[serde(default)]
    pub description: String,

    /// Human-readable earning criteria, for display only.
    #[serde(default)]
    pub criteria: String,

    /// XP awarded when earned, and the eligibility threshold.
    #[serde(default)]
    pub xp_value: u64,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,

    /// Opaque requirement payloads, preserved but never evaluated.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub unlock_requirements: Vec<Value>,
}

impl Badge {
    /// Create a badge with the given identity and XP value.
    #[must_use]
    pub fn new(id: impl Into<String>, name: impl Into<String>, xp_value: u64) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            description: String::new(),
            criteria: String::new(),
            xp_value,
            image_url: None,
            category: None,
            unlock_requirements: Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_fills_defaults() {
        let badge = Badge::new("first-steps", "First Steps", 50);
        assert_eq!(badge.id, "first-steps");
        assert_eq!(badge.xp_value, 50);
        assert!(badge.description.is_empty());
        assert!(badge.image_url.is_none());
        assert!(badge.unlock_requirements.is_empty());
    }

    #[test]
    fn optional_fields_are_omitted_from_json() {
        let badge = Badge::new("b", "B", 10);
        let json = serde_json::to_string(&badge).unwrap();
        assert!(!json.contains("image_url"));
        assert!(!json.contains("category"));
        assert!(!json.contains("unlock_requirements"));
    }

    #[test]
    fn deserializes_with_opaque_requirements() {
        let raw = r#"{
            "id": "quiz-whiz",
            "name": "Quiz Whiz",
            "criteria": "Score 90+ on three quizzes",
            "xp_value": 100,
            "category": "quizzes",
            "unlock_requirements": [{"quiz_score": ["quiz-1", 90]}]
        }"#;
        let badge: Badge = serde_json::from_str(raw).unwrap();
        assert_eq!(badge.xp_value, 100);
        assert_eq!(badge.category.as_deref(), Some("quizzes"));
        assert_eq!(badge.unlock_requirements.len(), 1);
    }
}
