//! CLI command implementations

pub mod completions;
pub mod curriculum;
pub mod generate;
pub mod init;
pub mod qa;
