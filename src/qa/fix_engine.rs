//! Applies suggested code fixes to the source tree
//!
//! Fixes are literal text substitutions. Every touched file is backed up
//! once per engine, so a whole batch can be rolled back.

use chrono::Utc;
use serde::Serialize;
use std::collections::HashMap;
use std::io::Write;
use std::path::{Path, PathBuf};
use thiserror::Error;
use walkdir::WalkDir;

use crate::core::identity::RecordId;
use crate::qa::issue::{CodeFix, Issue};

/// Directories under `src/` searched when a fix path contains `**`
pub const FIX_SEARCH_DIRS: &[&str] = &["generator", "curriculum", "qa", "entities", "core"];

const SNIPPET_PREVIEW: usize = 60;

/// Why a fix could not be applied
#[derive(Debug, Error)]
pub enum FixError {
    #[error("issue has no suggested fix")]
    NoFix,

    #[error("target file not found: {0}")]
    FileNotFound(PathBuf),

    #[error("manual intervention required: {0}")]
    Manual(String),

    #[error("code to replace not found in {file}: \"{snippet}\"")]
    SnippetNotFound { file: PathBuf, snippet: String },

    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

fn io_error(path: &Path) -> impl FnOnce(std::io::Error) -> FixError + '_ {
    move |source| FixError::Io {
        path: path.to_path_buf(),
        source,
    }
}

/// Outcome of applying one fix
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FixResult {
    pub issue_id: RecordId,
    pub file: String,
    pub success: bool,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub backup_path: Option<PathBuf>,
}

impl FixResult {
    fn applied(issue: &Issue, file: &Path, message: impl Into<String>, backup_path: Option<PathBuf>) -> Self {
        Self {
            issue_id: issue.id.clone(),
            file: file.display().to_string(),
            success: true,
            message: message.into(),
            backup_path,
        }
    }

    pub fn failed(issue: &Issue, message: impl Into<String>) -> Self {
        Self {
            issue_id: issue.id.clone(),
            file: issue
                .suggested_fix
                .as_ref()
                .map(|fix| fix.file.clone())
                .unwrap_or_default(),
            success: false,
            message: message.into(),
            backup_path: None,
        }
    }
}

/// Original contents of a touched file
#[derive(Debug, Clone)]
struct Backup {
    original: String,
    path: Option<PathBuf>,
}

/// Text-substitution fix applier with per-file backups
pub struct FixEngine {
    root: PathBuf,
    backup_dir: PathBuf,
    dry_run: bool,
    backups: HashMap<PathBuf, Backup>,
}

impl FixEngine {
    /// `root` is the directory fix paths are relative to
    pub fn new(root: impl Into<PathBuf>, backup_dir: impl Into<PathBuf>, dry_run: bool) -> Self {
        Self {
            root: root.into(),
            backup_dir: backup_dir.into(),
            dry_run,
            backups: HashMap::new(),
        }
    }

    pub fn is_dry_run(&self) -> bool {
        self.dry_run
    }

    /// Files backed up so far
    pub fn backed_up_files(&self) -> Vec<&Path> {
        let mut files: Vec<&Path> = self.backups.keys().map(PathBuf::as_path).collect();
        files.sort();
        files
    }

    /// Resolve a fix path. A `**` segment searches [`FIX_SEARCH_DIRS`] for the
    /// first existing match; without one the literal path (minus `**/`) is used.
    pub fn resolve_path(&self, file: &str) -> PathBuf {
        let Some((prefix, suffix)) = file.split_once("**/") else {
            return self.root.join(file);
        };

        let base = self.root.join(prefix);
        for dir in FIX_SEARCH_DIRS {
            let direct = base.join(dir).join(suffix);
            if direct.is_file() {
                return direct;
            }
            let found = WalkDir::new(base.join(dir))
                .sort_by_file_name()
                .into_iter()
                .filter_map(Result::ok)
                .find(|entry| entry.file_type().is_file() && entry.path().ends_with(suffix));
            if let Some(entry) = found {
                return entry.into_path();
            }
        }
        base.join(suffix)
    }

    /// Apply one issue's suggested fix
    pub fn apply_fix(&mut self, issue: &Issue) -> FixResult {
        let Some(fix) = issue.suggested_fix.as_ref() else {
            return FixResult::failed(issue, FixError::NoFix.to_string());
        };

        let path = self.resolve_path(&fix.file);
        if !path.is_file() {
            return FixResult::failed(issue, FixError::FileNotFound(path).to_string());
        }

        let backup = match self.backup(&path) {
            Ok(backup) => backup,
            Err(e) => return FixResult::failed(issue, e.to_string()),
        };

        let before = match std::fs::read_to_string(&path) {
            Ok(contents) => contents,
            Err(e) => return FixResult::failed(issue, io_error(&path)(e).to_string()),
        };

        match self.substitute(&path, &before, fix) {
            Ok(message) => {
                tracing::info!(file = %path.display(), issue = %issue.id, dry_run = self.dry_run, "applied fix");
                FixResult::applied(issue, &path, message, backup.path)
            }
            Err(e) => {
                let changed = std::fs::read_to_string(&path).map_or(true, |now| now != before);
                if !self.dry_run && changed {
                    if let Err(restore) = std::fs::write(&path, &before) {
                        tracing::error!(file = %path.display(), error = %restore, "failed to restore backup");
                    }
                }
                tracing::warn!(file = %path.display(), issue = %issue.id, error = %e, "fix failed");
                let mut result = FixResult::failed(issue, e.to_string());
                result.file = path.display().to_string();
                result
            }
        }
    }

    /// Apply every auto-fixable issue's fix independently
    pub fn apply_all_fixes(&mut self, issues: &[Issue]) -> Vec<FixResult> {
        issues
            .iter()
            .filter(|issue| issue.auto_fixable && issue.suggested_fix.is_some())
            .map(|issue| self.apply_fix(issue))
            .collect()
    }

    /// Restore every backed-up file to its original contents.
    /// True only if all restorations succeeded.
    pub fn rollback_all(&mut self) -> bool {
        if self.dry_run {
            return true;
        }
        let mut ok = true;
        for (path, backup) in &self.backups {
            match std::fs::write(path, &backup.original) {
                Ok(()) => tracing::info!(file = %path.display(), "rolled back"),
                Err(e) => {
                    tracing::error!(file = %path.display(), error = %e, "rollback failed");
                    ok = false;
                }
            }
        }
        ok
    }

    /// Cached backup of `path`, created on first touch
    fn backup(&mut self, path: &Path) -> Result<Backup, FixError> {
        if let Some(existing) = self.backups.get(path) {
            return Ok(existing.clone());
        }

        let original = std::fs::read_to_string(path).map_err(io_error(path))?;
        let backup_path = if self.dry_run {
            None
        } else {
            std::fs::create_dir_all(&self.backup_dir).map_err(io_error(&self.backup_dir))?;
            let name = path
                .file_name()
                .map(|n| n.to_string_lossy().to_string())
                .unwrap_or_else(|| "file".to_string());
            let target = self
                .backup_dir
                .join(format!("{}.{}.bak", name, Utc::now().format("%Y%m%dT%H%M%S%.3f")));
            std::fs::write(&target, &original).map_err(io_error(&target))?;
            tracing::debug!(file = %path.display(), backup = %target.display(), "backed up");
            Some(target)
        };

        let backup = Backup {
            original,
            path: backup_path,
        };
        self.backups.insert(path.to_path_buf(), backup.clone());
        Ok(backup)
    }

    fn substitute(&self, path: &Path, current: &str, fix: &CodeFix) -> Result<String, FixError> {
        if fix.requires_manual_intervention() {
            return Err(FixError::Manual(fix.explanation.clone()));
        }

        if !current.contains(&fix.old_code) {
            return Err(FixError::SnippetNotFound {
                file: path.to_path_buf(),
                snippet: truncate(&fix.old_code, SNIPPET_PREVIEW),
            });
        }

        if self.dry_run {
            return Ok(format!("would update {}", path.display()));
        }

        let updated = current.replacen(&fix.old_code, &fix.new_code, 1);
        write_atomic(path, &updated)?;
        Ok(format!("updated {}", path.display()))
    }
}

/// Write through a temp file in the same directory, then rename over the target
fn write_atomic(path: &Path, contents: &str) -> Result<(), FixError> {
    let dir = path.parent().unwrap_or_else(|| Path::new("."));
    let mut temp = tempfile::NamedTempFile::new_in(dir).map_err(io_error(dir))?;
    temp.write_all(contents.as_bytes()).map_err(io_error(path))?;
    temp.persist(path).map_err(|e| FixError::Io {
        path: path.to_path_buf(),
        source: e.error,
    })?;
    Ok(())
}

fn truncate(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        text.to_string()
    } else {
        format!("{}...", text.chars().take(max).collect::<String>())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::level::Level;
    use crate::qa::issue::{IssueType, Severity};
    use tempfile::{tempdir, TempDir};

    fn issue(fix: CodeFix) -> Issue {
        Issue::new(IssueType::MathError, Severity::Error, Level::A, 1, "addition", "wrong sum").auto_fix(fix)
    }

    fn workspace() -> (TempDir, PathBuf) {
        let tmp = tempdir().unwrap();
        let dir = tmp.path().join("src/generator");
        std::fs::create_dir_all(&dir).unwrap();
        let file = dir.join("arithmetic.rs");
        std::fs::write(&file, "let sum = a + b + 1;\nlet sum = a + b + 1;\n").unwrap();
        (tmp, file)
    }

    fn engine(tmp: &TempDir, dry_run: bool) -> FixEngine {
        FixEngine::new(tmp.path(), tmp.path().join(".drillsmith/backups"), dry_run)
    }

    #[test]
    fn test_resolves_glob_segment() {
        let (tmp, file) = workspace();
        let engine = engine(&tmp, true);
        assert_eq!(engine.resolve_path("src/**/arithmetic.rs"), file);
        assert_eq!(
            engine.resolve_path("src/**/missing.rs"),
            tmp.path().join("src/missing.rs")
        );
        assert_eq!(engine.resolve_path("src/generator/arithmetic.rs"), file);
    }

    #[test]
    fn test_replaces_first_occurrence_with_backup() {
        let (tmp, file) = workspace();
        let mut engine = engine(&tmp, false);
        let result = engine.apply_fix(&issue(CodeFix::new(
            "src/**/arithmetic.rs",
            "a + b + 1",
            "a + b",
            "off by one",
        )));
        assert!(result.success, "{}", result.message);
        assert_eq!(
            std::fs::read_to_string(&file).unwrap(),
            "let sum = a + b;\nlet sum = a + b + 1;\n"
        );
        let backup = result.backup_path.unwrap();
        assert!(backup.starts_with(tmp.path().join(".drillsmith/backups")));
        assert!(std::fs::read_to_string(backup).unwrap().contains("a + b + 1;\nlet"));
    }

    #[test]
    fn test_dry_run_never_writes() {
        let (tmp, file) = workspace();
        let before = std::fs::read_to_string(&file).unwrap();
        let mut engine = engine(&tmp, true);

        let ok = engine.apply_fix(&issue(CodeFix::new("src/**/arithmetic.rs", "+ 1", "", "x")));
        assert!(!ok.success);
        let ok = engine.apply_fix(&issue(CodeFix::new("src/**/arithmetic.rs", "+ 1", "+ 0", "x")));
        assert!(ok.success);
        let missing = engine.apply_fix(&issue(CodeFix::new("src/**/arithmetic.rs", "nope", "x", "x")));
        assert!(!missing.success);

        assert_eq!(std::fs::read_to_string(&file).unwrap(), before);
        assert!(!tmp.path().join(".drillsmith/backups").exists());
        assert!(engine.rollback_all());
    }

    #[test]
    fn test_failures_are_reported() {
        let (tmp, _) = workspace();
        let mut engine = engine(&tmp, false);

        let manual = engine.apply_fix(&issue(CodeFix::manual("src/**/arithmetic.rs", "rework the helper")));
        assert!(!manual.success);
        assert!(manual.message.contains("manual intervention"));

        let long = "x".repeat(200);
        let missing = engine.apply_fix(&issue(CodeFix::new("src/**/arithmetic.rs", long, "y", "z")));
        assert!(!missing.success);
        assert!(missing.message.contains("not found"));
        assert!(missing.message.len() < 200);

        let absent = engine.apply_fix(&issue(CodeFix::new("src/**/nothing.rs", "a", "b", "c")));
        assert!(!absent.success);
        assert!(absent.message.contains("not found"));
    }

    #[test]
    fn test_batch_continues_and_rolls_back() {
        let (tmp, file) = workspace();
        let original = std::fs::read_to_string(&file).unwrap();
        let mut engine = engine(&tmp, false);

        let mut not_fixable = issue(CodeFix::new("src/**/arithmetic.rs", "sum", "total", "rename"));
        not_fixable.auto_fixable = false;
        let issues = vec![
            issue(CodeFix::new("src/**/arithmetic.rs", "missing snippet", "x", "x")),
            issue(CodeFix::new("src/**/arithmetic.rs", "+ 1;", "+ 2;", "bump")),
            not_fixable,
        ];
        let results = engine.apply_all_fixes(&issues);
        assert_eq!(results.len(), 2);
        assert!(!results[0].success);
        assert!(results[1].success);
        assert_eq!(engine.backed_up_files().len(), 1);
        assert_ne!(std::fs::read_to_string(&file).unwrap(), original);

        assert!(engine.rollback_all());
        assert_eq!(std::fs::read_to_string(&file).unwrap(), original);
    }
}
