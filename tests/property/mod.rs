//! Property-based tests for parameter merging and generation bounds
