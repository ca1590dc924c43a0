//! Property test suite entry point.

mod unlock_tests;
mod validation_tests;
mod xp_tests;
