//! Project discovery and structure
//!
//! A project is any directory holding a `drillsmith.yaml`. It anchors the
//! project config, custom curricula under `curricula/`, and the fix engine's
//! source root and backup directory.

use std::path::{Path, PathBuf};
use thiserror::Error;

/// Project config file marking the root
pub const PROJECT_FILE: &str = "drillsmith.yaml";

/// Represents a drillsmith project
#[derive(Debug, Clone)]
pub struct Project {
    /// Root directory of the project (holds drillsmith.yaml)
    root: PathBuf,
}

impl Project {
    /// Find project root by walking up from the current directory
    pub fn discover() -> Result<Self, ProjectError> {
        let current = std::env::current_dir().map_err(|e| ProjectError::IoError(e.to_string()))?;
        Self::discover_from(&current)
    }

    /// Find project root by walking up from the given directory
    pub fn discover_from(start: &Path) -> Result<Self, ProjectError> {
        let mut current = start
            .canonicalize()
            .map_err(|e| ProjectError::IoError(e.to_string()))?;

        loop {
            if current.join(PROJECT_FILE).is_file() {
                return Ok(Self { root: current });
            }

            if !current.pop() {
                return Err(ProjectError::NotFound {
                    searched_from: start.to_path_buf(),
                });
            }
        }
    }

    /// Use a directory as the project root without requiring a config file
    pub fn at(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Discovered project, or the current directory when none exists
    pub fn discover_or_cwd() -> Self {
        Self::discover().unwrap_or_else(|_| {
            Self::at(std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")))
        })
    }

    /// Create a new project structure at the given path
    pub fn init(path: &Path, force: bool) -> Result<Self, ProjectError> {
        let root = path.canonicalize().unwrap_or_else(|_| path.to_path_buf());

        let config_path = root.join(PROJECT_FILE);
        if config_path.exists() && !force {
            return Err(ProjectError::AlreadyExists(root.clone()));
        }

        std::fs::write(&config_path, Self::default_config())
            .map_err(|e| ProjectError::IoError(e.to_string()))?;

        for dir in ["curricula", ".drillsmith/backups"] {
            std::fs::create_dir_all(root.join(dir))
                .map_err(|e| ProjectError::IoError(e.to_string()))?;
        }

        Ok(Self { root })
    }

    fn default_config() -> &'static str {
        r#"# Drillsmith Project Configuration

# Curriculum to test against: a built-in name, a file under curricula/,
# or a path to a YAML curriculum
curriculum: kumon

# Problems generated per worksheet range during a QA run
problems_per_range: 10

# Restrict QA runs to these levels (empty = all levels)
levels: []

# Fixed seed for reproducible runs (omit for fresh randomness)
# seed: 42

# Validators to run
validators:
  visual: true
  math: true
  curriculum: true
  consistency: true
  readability: true
  fraction: true

# Default report output (console, json, html)
# output: console
"#
    }

    /// Get the project root directory
    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn config_path(&self) -> PathBuf {
        self.root.join(PROJECT_FILE)
    }

    /// Directory holding project-local curricula
    pub fn curricula_dir(&self) -> PathBuf {
        self.root.join("curricula")
    }

    /// Directory receiving fix-engine backups
    pub fn backup_dir(&self) -> PathBuf {
        self.root.join(".drillsmith").join("backups")
    }
}

/// Errors that can occur during project operations
#[derive(Debug, Error)]
pub enum ProjectError {
    #[error("not a drillsmith project (searched from {searched_from:?}). Run 'drillsmith init' to create one.")]
    NotFound { searched_from: PathBuf },

    #[error("drillsmith project already exists at {0:?}")]
    AlreadyExists(PathBuf),

    #[error("IO error: {0}")]
    IoError(String),
}
