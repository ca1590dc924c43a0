//! Canvas course export handling: loading, validation, tree construction.

pub mod builder;
pub mod documents;
pub mod loader;
pub mod validator;

pub use builder::{CourseBuild, CourseBuilder};
pub use documents::{CourseDocuments, LoadStatus, Section};
pub use loader::CourseDataLoader;
pub use validator::{ValidationResult, validate};

/// Outcome `level` value that marks a badge definition instead of a
/// learning outcome.
pub const META_BADGE_LEVEL: &str = "Meta-Badge";
