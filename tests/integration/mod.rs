//! Integration tests
//!
//! HTTP client against a mock script, file-backed cache and full sessions

mod session_test;
