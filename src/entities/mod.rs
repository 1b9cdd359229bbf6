//! Entity type definitions
//!
//! - [`Problem`] - A generated worksheet problem with its answer and hints

pub mod problem;

pub use problem::{Answer, DisplayFormat, GraduatedHint, Problem, ProblemType};
