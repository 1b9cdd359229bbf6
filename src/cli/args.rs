//! CLI argument definitions using clap derive

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use crate::cli::commands::{
    completions::CompletionsArgs, curriculum::CurriculumCommands, generate::GenerateArgs,
    init::InitArgs, qa::QaArgs,
};

#[derive(Parser)]
#[command(name = "drillsmith")]
#[command(author, version, about = "Worksheet problem generator with a curriculum-aware QA pipeline")]
#[command(long_about = "Generates leveled math worksheet problems from a declarative curriculum \
and audits them with independent validators, optionally applying suggested source fixes.")]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    #[command(flatten)]
    pub global: GlobalOpts,
}

#[derive(clap::Args, Clone, Debug)]
pub struct GlobalOpts {
    /// Output format
    #[arg(long, short = 'f', global = true, default_value = "auto")]
    pub format: OutputFormat,

    /// Suppress non-essential output (logs at error level only)
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,

    /// Enable verbose output (debug logs)
    #[arg(long, short = 'v', global = true)]
    pub verbose: bool,

    /// Project root (default: auto-detect by finding drillsmith.yaml)
    #[arg(long, global = true)]
    pub project: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize a drillsmith project (writes drillsmith.yaml)
    Init(InitArgs),

    /// Run the QA pipeline over generated problems
    Qa(QaArgs),

    /// Generate problems for a worksheet
    Generate(GenerateArgs),

    /// Inspect and check curricula
    #[command(subcommand)]
    Curriculum(CurriculumCommands),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

#[derive(ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum OutputFormat {
    /// Human-readable terminal output
    #[default]
    Auto,
    /// JSON format (for programming)
    Json,
    /// YAML format (full fidelity)
    Yaml,
}
