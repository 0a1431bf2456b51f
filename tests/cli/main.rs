//! CLI integration tests for inkdown.
//!
//! These tests execute the compiled binary and verify CLI behavior including:
//! - Subcommand behavior (render, grammar)
//! - Stdin/stdout handling
//! - Exit codes
//! - Config discovery and flag overrides
//! - Error handling

mod common;
mod grammar;
mod render;
