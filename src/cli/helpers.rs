//! Shared helper functions for CLI commands

use miette::{IntoDiagnostic, Result};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::cli::GlobalOpts;
use crate::core::{Config, Project};
use crate::curriculum::{self, CurriculumSpec};

/// Project from `--project`, the discovered project, or the current directory
pub fn project(global: &GlobalOpts) -> Project {
    match &global.project {
        Some(root) => Project::at(root.clone()),
        None => Project::discover_or_cwd(),
    }
}

/// Layered configuration for the project
pub fn load_config(project: &Project) -> Config {
    let located = project.config_path().is_file().then_some(project);
    Config::load_for(located)
}

/// Resolve a curriculum by name or path
pub fn load_curriculum(name: &str, project: &Project) -> Result<CurriculumSpec> {
    Ok(curriculum::load_curriculum(name, project)?)
}

/// Seeded RNG, or a fresh random seed when none is given
pub fn rng(seed: Option<u64>) -> StdRng {
    StdRng::seed_from_u64(seed.unwrap_or_else(rand::random))
}

/// Write content to a file, or to stdout when no path is given
pub fn write_output(content: &str, output_path: Option<&Path>) -> Result<()> {
    match output_path {
        Some(path) => {
            let file = File::create(path).into_diagnostic()?;
            let mut writer = BufWriter::new(file);
            writer.write_all(content.as_bytes()).into_diagnostic()?;
            writer.flush().into_diagnostic()?;
            eprintln!("Report written to: {}", path.display());
        }
        None => {
            print!("{}", content);
            std::io::stdout().flush().into_diagnostic()?;
        }
    }
    Ok(())
}

/// Truncate a string to max_len characters, adding "..." if truncated
pub fn truncate_str(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_str() {
        assert_eq!(truncate_str("short", 10), "short");
        assert_eq!(truncate_str("add_1, add_2, add_3", 10), "add_1, ...");
        assert_eq!(truncate_str("x → a", 5), "x → a");
    }

    #[test]
    fn test_seeded_rng_is_reproducible() {
        use rand::Rng;
        let a: u64 = rng(Some(9)).random();
        let b: u64 = rng(Some(9)).random();
        assert_eq!(a, b);
    }
}
