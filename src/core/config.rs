//! Configuration management with layered hierarchy

use serde::Deserialize;
use std::path::PathBuf;

use crate::core::level::Level;
use crate::core::Project;
use crate::qa::validators::ValidatorToggles;

/// Default number of problems generated per worksheet range
pub const DEFAULT_PROBLEMS_PER_RANGE: usize = 10;

/// Default curriculum name
pub const DEFAULT_CURRICULUM: &str = "kumon";

/// Drillsmith configuration with layered hierarchy
#[derive(Debug, Default, Clone, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Curriculum name or path
    pub curriculum: Option<String>,

    /// Problems generated per worksheet range
    pub problems_per_range: Option<usize>,

    /// Level subset for QA runs (empty = all)
    pub levels: Option<Vec<Level>>,

    /// Fixed RNG seed
    pub seed: Option<u64>,

    /// Validator toggles
    pub validators: Option<ValidatorToggles>,

    /// Default report output
    pub output: Option<String>,
}

impl Config {
    /// Load configuration from all sources, merging in priority order
    pub fn load() -> Self {
        Self::load_for(Project::discover().ok().as_ref())
    }

    /// Load configuration using an already located project
    pub fn load_for(project: Option<&Project>) -> Self {
        let mut config = Config::default();

        // 1. Built-in defaults (accessor fallbacks)

        // 2. Global user config (~/.config/drillsmith/config.yaml)
        if let Some(global_path) = Self::global_config_path() {
            if let Some(global) = Self::read_file(&global_path) {
                config.merge(global);
            }
        }

        // 3. Project config (drillsmith.yaml)
        if let Some(project) = project {
            if let Some(project_config) = Self::read_file(&project.config_path()) {
                config.merge(project_config);
            }
        }

        // 4. Environment variables
        config.merge(Self::from_env());

        config
    }

    fn read_file(path: &std::path::Path) -> Option<Config> {
        if !path.exists() {
            return None;
        }
        let contents = std::fs::read_to_string(path).ok()?;
        match Self::from_yaml_str(&contents) {
            Ok(config) => Some(config),
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "ignoring unreadable config file");
                None
            }
        }
    }

    pub fn from_yaml_str(contents: &str) -> Result<Config, serde_yml::Error> {
        serde_yml::from_str(contents)
    }

    fn from_env() -> Config {
        let mut config = Config::default();
        if let Ok(curriculum) = std::env::var("DRILLSMITH_CURRICULUM") {
            config.curriculum = Some(curriculum);
        }
        if let Ok(problems) = std::env::var("DRILLSMITH_PROBLEMS") {
            config.problems_per_range = problems.trim().parse().ok();
        }
        if let Ok(seed) = std::env::var("DRILLSMITH_SEED") {
            config.seed = seed.trim().parse().ok();
        }
        config
    }

    /// Get the path to the global config file
    fn global_config_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("", "", "drillsmith")
            .map(|dirs| dirs.config_dir().join("config.yaml"))
    }

    /// Merge another config into this one (other takes precedence)
    pub fn merge(&mut self, other: Config) {
        if other.curriculum.is_some() {
            self.curriculum = other.curriculum;
        }
        if other.problems_per_range.is_some() {
            self.problems_per_range = other.problems_per_range;
        }
        if other.levels.is_some() {
            self.levels = other.levels;
        }
        if other.seed.is_some() {
            self.seed = other.seed;
        }
        if other.validators.is_some() {
            self.validators = other.validators;
        }
        if other.output.is_some() {
            self.output = other.output;
        }
    }

    pub fn curriculum(&self) -> String {
        self.curriculum
            .clone()
            .unwrap_or_else(|| DEFAULT_CURRICULUM.to_string())
    }

    pub fn problems_per_range(&self) -> usize {
        self.problems_per_range
            .filter(|n| *n > 0)
            .unwrap_or(DEFAULT_PROBLEMS_PER_RANGE)
    }

    pub fn levels(&self) -> Vec<Level> {
        self.levels.clone().unwrap_or_default()
    }

    pub fn validators(&self) -> ValidatorToggles {
        self.validators.clone().unwrap_or_default()
    }
}
