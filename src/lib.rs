//! Drillsmith: leveled worksheet problem generation with a QA pipeline
//!
//! A declarative curriculum maps each level's worksheets to ranges and
//! generator archetypes. The [`generator`] synthesizes problems from it, and
//! the [`qa`] pipeline checks generated problems against the same table.

pub mod cli;
pub mod core;
pub mod curriculum;
pub mod entities;
pub mod generator;
pub mod qa;
pub mod telemetry;
