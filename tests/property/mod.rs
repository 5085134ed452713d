//! Property-based tests

mod gate_proptest;
mod record_proptest;
