//! Common test utilities and helpers
//!
//! This module provides shared utilities for all tests including:
//! - Record fixtures and sheet rows as the script sends them
//! - A wiremock stand-in for the script endpoint

pub mod fixtures;
pub mod mock_server;

// Re-export commonly used utilities
pub use fixtures::*;
pub use mock_server::*;
