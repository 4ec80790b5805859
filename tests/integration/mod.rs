//! Integration tests for diff generation and patch bodies.

pub mod diff_scenarios;
