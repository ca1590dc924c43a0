//! The course document set: seven JSON files, held as raw values.
//!
//! Documents are kept as `serde_json::Value` rather than typed structs on
//! purpose: the validator wants to report a wrong-typed field as a finding
//! with the record's position in it, not fail the whole file at
//! deserialization. Typing happens later, in the builder, against data the
//! validator has already screened.

use std::collections::HashMap;

use serde_json::{Map, Value};

/// One logical section of a course export.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Section {
    Assignments,
    Modules,
    Quizzes,
    Pages,
    Outcomes,
    Prerequisites,
    AssignmentIdMap,
}

impl Section {
    /// Every section, in canonical load/report order.
    pub const ALL: [Self; 7] = [
        Self::Assignments,
        Self::Modules,
        Self::Quizzes,
        Self::Pages,
        Self::Outcomes,
        Self::Prerequisites,
        Self::AssignmentIdMap,
    ];

    /// Section name; doubles as the record-array key inside the document
    /// for the record sections.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Assignments => "assignments",
            Self::Modules => "modules",
            Self::Quizzes => "quizzes",
            Self::Pages => "pages",
            Self::Outcomes => "outcomes",
            Self::Prerequisites => "prerequisites",
            Self::AssignmentIdMap => "assignment_id_map",
        }
    }

    /// File name inside a course directory.
    #[must_use]
    pub const fn file_name(self) -> &'static str {
        match self {
            Self::Assignments => "assignments.json",
            Self::Modules => "modules.json",
            Self::Quizzes => "quizzes.json",
            Self::Pages => "pages.json",
            Self::Outcomes => "outcomes.json",
            Self::Prerequisites => "prerequisites.json",
            Self::AssignmentIdMap => "assignment_id_map.json",
        }
    }

    /// Whether the section carries an array of records under its name key.
    /// The other two are auxiliary maps with free-form object roots.
    #[must_use]
    pub const fn has_records(self) -> bool {
        !matches!(self, Self::Prerequisites | Self::AssignmentIdMap)
    }
}

impl std::fmt::Display for Section {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// How a section arrived in memory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadStatus {
    /// File was read and parsed as a JSON object.
    Loaded,
    /// File was absent; the section is an empty document.
    Missing,
    /// File existed but did not parse (or had a non-object root); the
    /// section is an empty document and validation will report this.
    ParseFailed(String),
}

/// Parsed (or defaulted) content for all seven sections.
#[derive(Debug, Clone)]
pub struct CourseDocuments {
    docs: HashMap<Section, Value>,
    status: HashMap<Section, LoadStatus>,
}

impl Default for CourseDocuments {
    fn default() -> Self {
        Self::new()
    }
}

impl CourseDocuments {
    /// An all-missing document set: every section an empty object.
    #[must_use]
    pub fn new() -> Self {
        let mut docs = HashMap::new();
        let mut status = HashMap::new();
        for section in Section::ALL {
            docs.insert(section, Value::Object(Map::new()));
            status.insert(section, LoadStatus::Missing);
        }
        Self { docs, status }
    }

    /// Install a section's content and mark it loaded.
    pub fn set(&mut self, section: Section, value: Value) {
        self.docs.insert(section, value);
        self.status.insert(section, LoadStatus::Loaded);
    }

    /// Record a parse failure; the section keeps its empty document.
    pub fn mark_parse_failed(&mut self, section: Section, reason: impl Into<String>) {
        self.status
            .insert(section, LoadStatus::ParseFailed(reason.into()));
    }

    #[must_use]
    pub fn status(&self, section: Section) -> &LoadStatus {
        // Both maps are populated for all sections at construction.
        &self.status[&section]
    }

    /// Raw document root for a section.
    #[must_use]
    pub fn raw(&self, section: Section) -> &Value {
        &self.docs[&section]
    }

    /// Records of a record section; empty when the key is absent, the wrong
    /// shape, or the section is an auxiliary map.
    #[must_use]
    pub fn records(&self, section: Section) -> &[Value] {
        if !section.has_records() {
            return &[];
        }
        self.docs[&section]
            .get(section.name())
            .and_then(Value::as_array)
            .map_or(&[], Vec::as_slice)
    }

    /// The module-prerequisite map from `prerequisites.json`, when present
    /// and object-shaped: module name to list of prerequisite module names.
    #[must_use]
    pub fn prerequisite_map(&self) -> Option<&Map<String, Value>> {
        self.docs[&Section::Prerequisites]
            .get("prerequisites")
            .and_then(Value::as_object)
    }
}
