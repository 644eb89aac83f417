//! Settings file and environment sources.

pub mod environment;
pub mod global_file;
pub mod workspace_file;
