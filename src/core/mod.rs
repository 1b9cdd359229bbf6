//! Core module - fundamental types and utilities

pub mod config;
pub mod identity;
pub mod level;
pub mod math;
pub mod project;
pub mod random;

pub use config::Config;
pub use identity::{IdParseError, IdPrefix, RecordId};
pub use level::{Level, ReadingCategory};
pub use math::{Fraction, Polynomial};
pub use project::{Project, ProjectError};
pub use random::IntRange;
