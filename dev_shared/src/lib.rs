//! Shared utilities for testing.

pub mod fs;
pub mod test;
