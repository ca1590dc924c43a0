//! Shared fixtures for integration tests.
//!
//! `write_valid_course` lays down a small three-module course (a linear
//! Basics -> Ownership -> Lifetimes chain) that passes validation with zero
//! warnings. Tests mutate individual files on top of it to produce the
//! failure they need.

#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};

use serde_json::{Value, json};

pub fn write_json(dir: &Path, file_name: &str, value: &Value) -> PathBuf {
    let path = dir.join(file_name);
    fs::write(&path, serde_json::to_string_pretty(value).unwrap()).unwrap();
    path
}

pub fn write_valid_course(dir: &Path) {
    write_json(dir, "assignments.json", &assignments());
    write_json(dir, "modules.json", &modules());
    write_json(dir, "quizzes.json", &quizzes());
    write_json(dir, "pages.json", &pages());
    write_json(dir, "outcomes.json", &outcomes());
    write_json(dir, "prerequisites.json", &prerequisites());
}

/// Progress snapshot sitting between the second and third module: enough
/// XP and completions to unlock Ownership, with Lifetimes next in line.
pub fn write_student_progress(dir: &Path) -> PathBuf {
    write_json(
        dir,
        "student.json",
        &json!({
            "total_xp": 150,
            "nodes": {"Basics": {"completed": true}},
            "quiz_scores": {"quiz-ownership": 85.0},
            "assignments": {"hw-1": {"completed": true}}
        }),
    )
}

pub fn assignments() -> Value {
    json!({"assignments": [
        {
            "id": "hw-1",
            "title": "Hello, Cargo",
            "points_possible": 10,
            "due_at": "2024-02-01T23:59:00Z",
            "outcomes": ["outcome-basics"],
            "gamification": {"xp_value": 50, "badges": ["badge-rustacean"]}
        },
        {
            "id": "hw-2",
            "title": "Borrow Checker Katas",
            "points_possible": 20,
            "gamification": {"xp_value": 100}
        }
    ]})
}

pub fn modules() -> Value {
    json!({"modules": [
        {
            "name": "Basics",
            "overview": "Toolchain and syntax",
            "items": [
                {"id": "Welcome", "type": "Page"},
                {"id": "hw-1", "type": "Assignment"}
            ]
        },
        {
            "name": "Ownership",
            "overview": "Moves, borrows, lifetimes-lite",
            "items": [{"id": "quiz-ownership", "type": "Quiz"}],
            "mastery_criteria": {"min_score": 70},
            "gamification": {
                "skill_level": "Application",
                "xp_required": 100,
                "unlock_requirements": {"quiz_score": ["quiz-ownership", 70]}
            }
        },
        {
            "name": "Lifetimes",
            "overview": "Named lifetimes and variance",
            "gamification": {"skill_level": "Intuition", "xp_required": 300}
        }
    ]})
}

pub fn quizzes() -> Value {
    json!({"quizzes": [
        {
            "id": "quiz-ownership",
            "title": "Ownership Check",
            "settings": {"allowed_attempts": -1, "time_limit": 30},
            "outcomes": ["outcome-ownership"],
            "questions": [
                {
                    "question_text": "What happens when a value is moved?",
                    "points_possible": 5,
                    "answers": [
                        {"text": "The old binding is invalidated", "weight": 100},
                        {"text": "Both bindings stay usable", "weight": 0}
                    ]
                }
            ]
        }
    ]})
}

pub fn pages() -> Value {
    json!({"pages": [
        {"title": "Welcome", "body": "<p>Start here.</p>", "front_page": true}
    ]})
}

pub fn outcomes() -> Value {
    json!({"outcomes": [
        {"id": "outcome-basics", "name": "Reads simple Rust", "level": "Recognition"},
        {"id": "outcome-ownership", "name": "Applies ownership rules", "level": "Application"},
        {
            "id": "badge-rustacean",
            "name": "Rustacean",
            "level": "Meta-Badge",
            "criteria": "Finish the basics module",
            "xp_value": 40
        }
    ]})
}

pub fn prerequisites() -> Value {
    json!({"prerequisites": {
        "Ownership": ["Basics"],
        "Lifetimes": ["Ownership"]
    }})
}
