//! Integration tests for JobTok
//!
//! Tests are organized by component:
//! - controller_test: Active-item selection, looping, focus and failures
//! - feed_source_test: HTTP (mockito) and JSON file sources
//! - cli_test: Argument parsing, command data shaping and exit codes
//! - ui_test: Frame rendering with ratatui's TestBackend
//! - e2e_test: App flows (paging, focus, submissions review, refresh)

// Note: Each test file is a separate integration test crate
// Tests are run individually by cargo, not via mod.rs
