//! Property-based tests for structural equality and parameter merging

mod structural_equality;
