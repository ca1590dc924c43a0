//! Course data validation.
//!
//! Validation is total: it never panics and never stops at the first
//! problem. One pass walks every section and accumulates two independent
//! lists. `errors` mark the course invalid (missing required fields, bad
//! types, out-of-range values, duplicate ids, unparseable dates, quizzes
//! with no correct answer, unparseable files). `warnings` are advisory and
//! never block validity; cross-reference problems land there because Canvas
//! courses routinely reference content created out of band.
//!
//! Running validation twice over the same documents yields the same result;
//! nothing here mutates the document set.

use std::collections::HashSet;
use std::str::FromStr;

use serde::Serialize;
use serde_json::Value;

use crate::course::documents::{CourseDocuments, LoadStatus, Section};
use crate::course::META_BADGE_LEVEL;
use crate::tree::SkillLevel;

/// Outcome of one validation pass.
#[derive(Debug, Clone, Serialize)]
pub struct ValidationResult {
    pub is_valid: bool,
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
}

#[derive(Default)]
struct Findings {
    errors: Vec<String>,
    warnings: Vec<String>,
}

impl Findings {
    fn error(&mut self, msg: impl Into<String>) {
        self.errors.push(msg.into());
    }

    fn warning(&mut self, msg: impl Into<String>) {
        self.warnings.push(msg.into());
    }
}

/// Validate a loaded document set.
#[must_use]
pub fn validate(docs: &CourseDocuments) -> ValidationResult {
    let mut f = Findings::default();

    check_section_statuses(docs, &mut f);
    validate_assignments(docs, &mut f);
    validate_modules(docs, &mut f);
    validate_quizzes(docs, &mut f);
    validate_pages(docs, &mut f);
    validate_outcomes(docs, &mut f);
    check_cross_references(docs, &mut f);

    ValidationResult {
        is_valid: f.errors.is_empty(),
        errors: f.errors,
        warnings: f.warnings,
    }
}

/// A file that existed but did not parse is an error; a file that was
/// simply absent is not (partial courses are a normal authoring state).
fn check_section_statuses(docs: &CourseDocuments, f: &mut Findings) {
    for section in Section::ALL {
        if let LoadStatus::ParseFailed(reason) = docs.status(section) {
            f.error(format!(
                "{}: could not be parsed ({reason})",
                section.file_name()
            ));
        }
    }
}

// ---------------------------------------------------------------------------
// field access helpers
// ---------------------------------------------------------------------------

fn str_field<'a>(record: &'a Value, key: &str) -> Option<&'a str> {
    record.get(key).and_then(Value::as_str)
}

fn non_empty_str<'a>(record: &'a Value, key: &str) -> Option<&'a str> {
    str_field(record, key).filter(|s| !s.trim().is_empty())
}

/// Record label for findings: `assignments[2] ('hw-3')`.
fn label(section: Section, idx: usize, id: Option<&str>) -> String {
    match id {
        Some(id) => format!("{section}[{idx}] ('{id}')"),
        None => format!("{section}[{idx}]"),
    }
}

/// `null` counts as absent: Canvas exports use it for unset optionals.
fn present<'a>(record: &'a Value, key: &str) -> Option<&'a Value> {
    record.get(key).filter(|v| !v.is_null())
}

fn check_non_negative(f: &mut Findings, who: &str, field: &str, value: &Value) {
    match value.as_f64() {
        Some(n) if n >= 0.0 => {}
        _ => f.error(format!(
            "{who}: Invalid '{field}' value: {value} (must be a non-negative number)"
        )),
    }
}

/// ISO-8601 timestamp, seconds precision, offset optional.
fn is_iso8601(s: &str) -> bool {
    chrono::DateTime::parse_from_rfc3339(s).is_ok()
        || chrono::NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%.f").is_ok()
}

fn check_date(f: &mut Findings, who: &str, field: &str, value: &Value) {
    match value.as_str() {
        Some(s) if is_iso8601(s) => {}
        _ => f.error(format!(
            "{who}: Invalid '{field}' date: {value} (expected ISO-8601)"
        )),
    }
}

// ---------------------------------------------------------------------------
// per-section rules
// ---------------------------------------------------------------------------

fn validate_assignments(docs: &CourseDocuments, f: &mut Findings) {
    let mut seen: HashSet<&str> = HashSet::new();
    for (idx, record) in docs.records(Section::Assignments).iter().enumerate() {
        let id = non_empty_str(record, "id");
        let who = label(Section::Assignments, idx, id);

        if !record.is_object() {
            f.error(format!("{who}: record is not a JSON object"));
            continue;
        }

        match id {
            Some(id) => {
                if !seen.insert(id) {
                    f.error(format!("{who}: duplicate assignment id '{id}'"));
                }
            }
            None => f.error(format!("{who}: missing or empty 'id'")),
        }
        if non_empty_str(record, "title").is_none() {
            f.error(format!("{who}: missing or empty 'title'"));
        }

        match present(record, "points_possible") {
            Some(value) => check_non_negative(f, &who, "points_possible", value),
            None => f.error(format!("{who}: missing 'points_possible'")),
        }

        for field in ["due_at", "unlock_at", "lock_at"] {
            if let Some(value) = present(record, field) {
                check_date(f, &who, field, value);
            }
        }

        if let Some(gamification) = present(record, "gamification") {
            validate_gamification_award(f, &who, gamification);
        }
    }
}

/// `gamification` block on assignments: an XP award plus badge grants.
fn validate_gamification_award(f: &mut Findings, who: &str, gamification: &Value) {
    let Some(block) = gamification.as_object() else {
        f.warning(format!("{who}: 'gamification' is not an object, ignoring"));
        return;
    };
    if let Some(value) = block.get("xp_value").filter(|v| !v.is_null()) {
        check_non_negative(f, who, "xp_value", value);
    }
    if let Some(badges) = block.get("badges").filter(|v| !v.is_null()) {
        if !is_string_array(badges) {
            f.warning(format!(
                "{who}: 'gamification.badges' is not an array of strings, ignoring"
            ));
        }
    }
}

fn is_string_array(value: &Value) -> bool {
    value
        .as_array()
        .is_some_and(|a| a.iter().all(Value::is_string))
}

fn validate_modules(docs: &CourseDocuments, f: &mut Findings) {
    let mut seen: HashSet<&str> = HashSet::new();
    for (idx, record) in docs.records(Section::Modules).iter().enumerate() {
        let name = non_empty_str(record, "name");
        let who = label(Section::Modules, idx, name);

        if !record.is_object() {
            f.error(format!("{who}: record is not a JSON object"));
            continue;
        }

        match name {
            Some(name) => {
                if !seen.insert(name) {
                    f.error(format!("{who}: duplicate module name '{name}'"));
                }
            }
            None => f.error(format!("{who}: missing or empty 'name'")),
        }

        if let Some(items) = present(record, "items") {
            if let Some(items) = items.as_array() {
                for (item_idx, item) in items.iter().enumerate() {
                    if !item.is_object() {
                        f.warning(format!("{who}: item {item_idx} is not an object"));
                    }
                }
            } else {
                f.warning(format!("{who}: 'items' is not an array, ignoring"));
            }
        }

        if let Some(criteria) = present(record, "mastery_criteria") {
            validate_mastery_criteria(f, &who, criteria);
        }

        if let Some(requirements) = present(record, "unlock_requirements") {
            if !requirements.is_array() {
                f.warning(format!("{who}: 'unlock_requirements' is not an array, ignoring"));
            }
        }

        if let Some(gamification) = present(record, "gamification") {
            validate_gamification_node(f, &who, gamification);
        }
    }
}

fn validate_mastery_criteria(f: &mut Findings, who: &str, criteria: &Value) {
    let Some(block) = criteria.as_object() else {
        f.warning(format!("{who}: 'mastery_criteria' is not an object, ignoring"));
        return;
    };
    if let Some(value) = block.get("min_score").filter(|v| !v.is_null()) {
        match value.as_f64() {
            Some(n) if (0.0..=100.0).contains(&n) => {}
            _ => f.error(format!(
                "{who}: Invalid 'min_score' value: {value} (must be a number between 0 and 100)"
            )),
        }
    }
}

/// `gamification` block on modules: the future skill node.
fn validate_gamification_node(f: &mut Findings, who: &str, gamification: &Value) {
    let Some(block) = gamification.as_object() else {
        f.warning(format!("{who}: 'gamification' is not an object, ignoring"));
        return;
    };

    if let Some(value) = block.get("skill_level").filter(|v| !v.is_null()) {
        let valid = value
            .as_str()
            .is_some_and(|s| SkillLevel::from_str(s).is_ok());
        if !valid {
            f.error(format!(
                "{who}: Invalid 'skill_level' value: {value} (must be one of \
                 Recognition, Application, Intuition, Synthesis, Mastery)"
            ));
        }
    }

    if let Some(value) = block.get("xp_required").filter(|v| !v.is_null()) {
        check_non_negative(f, who, "xp_required", value);
    }

    if let Some(value) = block.get("mastery_threshold").filter(|v| !v.is_null()) {
        match value.as_f64() {
            Some(n) if (0.0..=1.0).contains(&n) => {}
            _ => f.error(format!(
                "{who}: Invalid 'mastery_threshold' value: {value} (must be a number between 0 and 1)"
            )),
        }
    }

    if let Some(requirements) = block.get("unlock_requirements").filter(|v| !v.is_null()) {
        if !requirements.is_object() {
            f.warning(format!(
                "{who}: 'gamification.unlock_requirements' is not an object, ignoring"
            ));
        }
    }

    if let Some(badges) = block.get("badges").filter(|v| !v.is_null()) {
        if !is_string_array(badges) {
            f.warning(format!(
                "{who}: 'gamification.badges' is not an array of strings, ignoring"
            ));
        }
    }
}

fn validate_quizzes(docs: &CourseDocuments, f: &mut Findings) {
    let mut seen: HashSet<&str> = HashSet::new();
    for (idx, record) in docs.records(Section::Quizzes).iter().enumerate() {
        let id = non_empty_str(record, "id");
        let who = label(Section::Quizzes, idx, id);

        if !record.is_object() {
            f.error(format!("{who}: record is not a JSON object"));
            continue;
        }

        match id {
            Some(id) => {
                if !seen.insert(id) {
                    f.error(format!("{who}: duplicate quiz id '{id}'"));
                }
            }
            None => f.error(format!("{who}: missing or empty 'id'")),
        }
        if non_empty_str(record, "title").is_none() {
            f.error(format!("{who}: missing or empty 'title'"));
        }

        if let Some(settings) = present(record, "settings") {
            validate_quiz_settings(f, &who, settings);
        }

        if let Some(questions) = present(record, "questions") {
            if let Some(questions) = questions.as_array() {
                for (q_idx, question) in questions.iter().enumerate() {
                    validate_quiz_question(f, &who, q_idx, question);
                }
            } else {
                f.warning(format!("{who}: 'questions' is not an array, ignoring"));
            }
        }
    }
}

fn validate_quiz_settings(f: &mut Findings, who: &str, settings: &Value) {
    let Some(block) = settings.as_object() else {
        f.warning(format!("{who}: 'settings' is not an object, ignoring"));
        return;
    };

    if let Some(value) = block.get("allowed_attempts").filter(|v| !v.is_null()) {
        // -1 is the unlimited sentinel; otherwise at least one attempt.
        let valid = value.as_i64().is_some_and(|n| n >= 1 || n == -1);
        if !valid {
            f.error(format!(
                "{who}: Invalid 'allowed_attempts' value: {value} \
                 (must be an integer >= 1, or -1 for unlimited)"
            ));
        }
    }

    if let Some(value) = block.get("time_limit").filter(|v| !v.is_null()) {
        check_non_negative(f, who, "time_limit", value);
    }

    if let Some(value) = block.get("show_correct_answers_at").filter(|v| !v.is_null()) {
        check_date(f, who, "show_correct_answers_at", value);
    }
}

fn validate_quiz_question(f: &mut Findings, who: &str, q_idx: usize, question: &Value) {
    if !question.is_object() {
        f.error(format!("{who}: question {q_idx} is not an object"));
        return;
    }

    if non_empty_str(question, "question_text").is_none() {
        f.error(format!(
            "{who}: question {q_idx}: missing or empty 'question_text'"
        ));
    }

    if let Some(value) = present(question, "points_possible") {
        check_non_negative(f, &format!("{who}: question {q_idx}"), "points_possible", value);
    }

    let answers = present(question, "answers").and_then(Value::as_array);
    match answers {
        Some(answers) if !answers.is_empty() => {
            let has_correct = answers.iter().any(|a| {
                a.get("weight")
                    .and_then(Value::as_f64)
                    .is_some_and(|w| w > 0.0)
            });
            if !has_correct {
                f.error(format!(
                    "{who}: question {q_idx}: no answer with positive weight (no correct answer)"
                ));
            }
        }
        _ => f.error(format!("{who}: question {q_idx}: has no answers")),
    }
}

fn validate_pages(docs: &CourseDocuments, f: &mut Findings) {
    let mut seen: HashSet<&str> = HashSet::new();
    let mut front_pages = 0usize;
    for (idx, record) in docs.records(Section::Pages).iter().enumerate() {
        let title = non_empty_str(record, "title");
        let who = label(Section::Pages, idx, title);

        if !record.is_object() {
            f.error(format!("{who}: record is not a JSON object"));
            continue;
        }

        match title {
            Some(title) => {
                if !seen.insert(title) {
                    f.error(format!("{who}: duplicate page title '{title}'"));
                }
            }
            None => f.error(format!("{who}: missing or empty 'title'")),
        }

        match present(record, "front_page") {
            Some(Value::Bool(true)) => front_pages += 1,
            Some(Value::Bool(false)) | None => {}
            Some(value) => f.warning(format!(
                "{who}: 'front_page' is not a boolean ({value}), ignoring"
            )),
        }
    }

    if front_pages > 1 {
        f.warning(format!("pages: {front_pages} pages are marked front_page"));
    }
}

fn validate_outcomes(docs: &CourseDocuments, f: &mut Findings) {
    let mut seen: HashSet<&str> = HashSet::new();
    for (idx, record) in docs.records(Section::Outcomes).iter().enumerate() {
        let id = non_empty_str(record, "id");
        let who = label(Section::Outcomes, idx, id);

        if !record.is_object() {
            f.error(format!("{who}: record is not a JSON object"));
            continue;
        }

        match id {
            Some(id) => {
                if !seen.insert(id) {
                    f.error(format!("{who}: duplicate outcome id '{id}'"));
                }
            }
            None => f.error(format!("{who}: missing or empty 'id'")),
        }
        if non_empty_str(record, "name").is_none() {
            f.error(format!("{who}: missing or empty 'name'"));
        }

        if let Some(value) = present(record, "level") {
            let valid = value
                .as_str()
                .is_some_and(|s| s == META_BADGE_LEVEL || SkillLevel::from_str(s).is_ok());
            if !valid {
                f.error(format!(
                    "{who}: Invalid 'level' value: {value} (must be one of Recognition, \
                     Application, Intuition, Synthesis, Mastery, Meta-Badge)"
                ));
            }
        }

        if let Some(value) = present(record, "xp_value") {
            check_non_negative(f, &who, "xp_value", value);
        }
    }
}

// ---------------------------------------------------------------------------
// cross-references
// ---------------------------------------------------------------------------

fn collect_ids<'a>(docs: &'a CourseDocuments, section: Section, key: &str) -> HashSet<&'a str> {
    docs.records(section)
        .iter()
        .filter_map(|r| non_empty_str(r, key))
        .collect()
}

fn check_cross_references(docs: &CourseDocuments, f: &mut Findings) {
    let assignment_ids = collect_ids(docs, Section::Assignments, "id");
    let quiz_ids = collect_ids(docs, Section::Quizzes, "id");
    let page_titles = collect_ids(docs, Section::Pages, "title");
    let outcome_ids = collect_ids(docs, Section::Outcomes, "id");
    let module_names = collect_ids(docs, Section::Modules, "name");
    let badge_ids: HashSet<&str> = docs
        .records(Section::Outcomes)
        .iter()
        .filter(|r| str_field(r, "level") == Some(META_BADGE_LEVEL))
        .filter_map(|r| non_empty_str(r, "id"))
        .collect();

    check_module_items(docs, f, &assignment_ids, &quiz_ids, &page_titles);
    check_outcome_refs(docs, f, Section::Assignments, "id", &outcome_ids);
    check_outcome_refs(docs, f, Section::Quizzes, "id", &outcome_ids);
    check_module_requirement_refs(docs, f, &assignment_ids, &quiz_ids, &badge_ids);
    check_prerequisite_refs(docs, f, &module_names);
}

/// Module items that look like content references should resolve.
fn check_module_items(
    docs: &CourseDocuments,
    f: &mut Findings,
    assignment_ids: &HashSet<&str>,
    quiz_ids: &HashSet<&str>,
    page_titles: &HashSet<&str>,
) {
    for (idx, record) in docs.records(Section::Modules).iter().enumerate() {
        let who = label(Section::Modules, idx, non_empty_str(record, "name"));
        let Some(items) = present(record, "items").and_then(Value::as_array) else {
            continue;
        };
        for item in items {
            let Some(id) = non_empty_str(item, "id") else {
                continue;
            };
            let item_type = str_field(item, "type").unwrap_or("");
            let resolved = match item_type {
                t if t.eq_ignore_ascii_case("assignment") => assignment_ids.contains(id),
                t if t.eq_ignore_ascii_case("quiz") => quiz_ids.contains(id),
                t if t.eq_ignore_ascii_case("page") => page_titles.contains(id),
                "" => {
                    assignment_ids.contains(id)
                        || quiz_ids.contains(id)
                        || page_titles.contains(id)
                }
                // items like external URLs are not content references
                _ => true,
            };
            if !resolved {
                f.warning(format!("{who}: item '{id}' references unknown content"));
            }
        }
    }
}

fn check_outcome_refs(
    docs: &CourseDocuments,
    f: &mut Findings,
    section: Section,
    id_key: &str,
    outcome_ids: &HashSet<&str>,
) {
    for (idx, record) in docs.records(section).iter().enumerate() {
        let who = label(section, idx, non_empty_str(record, id_key));
        let Some(outcomes) = present(record, "outcomes") else {
            continue;
        };
        let Some(outcomes) = outcomes.as_array() else {
            f.warning(format!("{who}: 'outcomes' is not an array, ignoring"));
            continue;
        };
        for outcome in outcomes {
            if let Some(id) = outcome.as_str() {
                if !outcome_ids.contains(id) {
                    f.warning(format!("{who}: references unknown outcome '{id}'"));
                }
            }
        }
    }
}

/// Requirement payloads in module gamification blocks should point at
/// content that exists.
fn check_module_requirement_refs(
    docs: &CourseDocuments,
    f: &mut Findings,
    assignment_ids: &HashSet<&str>,
    quiz_ids: &HashSet<&str>,
    badge_ids: &HashSet<&str>,
) {
    for (idx, record) in docs.records(Section::Modules).iter().enumerate() {
        let who = label(Section::Modules, idx, non_empty_str(record, "name"));
        let Some(requirements) = record
            .pointer("/gamification/unlock_requirements")
            .and_then(Value::as_object)
        else {
            continue;
        };

        for (kind, value) in requirements {
            match kind.as_str() {
                "quiz_score" => {
                    let quiz_id = value
                        .get(0)
                        .and_then(Value::as_str)
                        .or_else(|| str_field(value, "quiz_id"));
                    if let Some(quiz_id) = quiz_id {
                        if !quiz_ids.contains(quiz_id) {
                            f.warning(format!(
                                "{who}: unlock requirement references unknown quiz '{quiz_id}'"
                            ));
                        }
                    }
                }
                "assignment_completion" => {
                    for id in requirement_id_list(value) {
                        if !assignment_ids.contains(id) {
                            f.warning(format!(
                                "{who}: unlock requirement references unknown assignment '{id}'"
                            ));
                        }
                    }
                }
                "badge_earned" => {
                    for id in requirement_id_list(value) {
                        if !badge_ids.contains(id) {
                            f.warning(format!(
                                "{who}: unlock requirement references unknown badge '{id}'"
                            ));
                        }
                    }
                }
                other => f.warning(format!(
                    "{who}: unknown unlock requirement kind '{other}'"
                )),
            }
        }
    }
}

/// Requirement values may be a single id or a list of ids.
fn requirement_id_list(value: &Value) -> Vec<&str> {
    match value {
        Value::String(s) => vec![s.as_str()],
        Value::Array(items) => items.iter().filter_map(Value::as_str).collect(),
        _ => Vec::new(),
    }
}

fn check_prerequisite_refs(
    docs: &CourseDocuments,
    f: &mut Findings,
    module_names: &HashSet<&str>,
) {
    if docs.status(Section::Prerequisites) != &LoadStatus::Loaded {
        return;
    }
    let Some(map) = docs.prerequisite_map() else {
        f.warning("prerequisites.json: no 'prerequisites' object found");
        return;
    };

    for (module, deps) in map {
        if !module_names.contains(module.as_str()) {
            f.warning(format!(
                "prerequisites: unknown module '{module}'"
            ));
        }
        let Some(deps) = deps.as_array() else {
            f.warning(format!(
                "prerequisites: entry for '{module}' is not an array, ignoring"
            ));
            continue;
        };
        for dep in deps {
            if let Some(dep) = dep.as_str() {
                if !module_names.contains(dep) {
                    f.warning(format!(
                        "prerequisites: '{module}' lists unknown module '{dep}'"
                    ));
                }
            }
        }
    }
}
