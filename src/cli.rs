//! CLI domain: parse, route, presentation and output only.
//! Rule construction and URI retrieval live in the library modules.

mod output;
mod parse;
mod presentation;
mod route;

pub use output::map_error;
pub use parse::{Cli, Commands};
pub use route::RunContext;
