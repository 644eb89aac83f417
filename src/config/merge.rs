//! Merge rules for layered settings sources.

pub mod merge_policy;
