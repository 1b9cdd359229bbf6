//! Curriculum resolution: file paths, project curricula, embedded built-ins

use rust_embed::Embed;
use std::path::Path;

use crate::core::Project;
use crate::curriculum::diagnostics::{CurriculumError, CurriculumSyntaxError};
use crate::curriculum::CurriculumSpec;

#[derive(Embed)]
#[folder = "curricula/"]
struct EmbeddedCurricula;

/// Parse curriculum YAML, attributing errors to `filename`
pub fn parse_curriculum(source: &str, filename: &str) -> Result<CurriculumSpec, CurriculumError> {
    serde_yml::from_str(source)
        .map_err(|e| CurriculumSyntaxError::from_serde_error(&e, source, filename).into())
}

/// Names of the curricula compiled into the binary
pub fn builtin_names() -> Vec<String> {
    let mut names: Vec<String> = EmbeddedCurricula::iter()
        .filter_map(|file| file.strip_suffix(".yaml").map(str::to_string))
        .collect();
    names.sort();
    names
}

/// Load an embedded curriculum by name
pub fn builtin(name: &str) -> Result<CurriculumSpec, CurriculumError> {
    let filename = format!("{}.yaml", name);
    let file = EmbeddedCurricula::get(&filename).ok_or_else(|| CurriculumError::NotFound {
        name: name.to_string(),
        available: builtin_names().join(", "),
    })?;
    let source = String::from_utf8_lossy(&file.data);
    parse_curriculum(&source, &filename)
}

fn load_file(path: &Path) -> Result<CurriculumSpec, CurriculumError> {
    let source = std::fs::read_to_string(path).map_err(|source| CurriculumError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    parse_curriculum(&source, &path.display().to_string())
}

/// Resolve a curriculum name: an existing YAML path, then
/// `<project>/curricula/<name>.yaml`, then a built-in of that name.
pub fn load_curriculum(name: &str, project: &Project) -> Result<CurriculumSpec, CurriculumError> {
    let as_path = Path::new(name);
    let is_yaml = as_path
        .extension()
        .is_some_and(|ext| ext == "yaml" || ext == "yml");
    if is_yaml && as_path.is_file() {
        tracing::debug!(path = %as_path.display(), "loading curriculum file");
        return load_file(as_path);
    }

    let project_file = project.curricula_dir().join(format!("{}.yaml", name));
    if project_file.is_file() {
        tracing::debug!(path = %project_file.display(), "loading project curriculum");
        return load_file(&project_file);
    }

    builtin(name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::level::Level;
    use tempfile::tempdir;

    #[test]
    fn test_builtin_kumon_is_listed_and_parses() {
        assert!(builtin_names().contains(&"kumon".to_string()));
        let spec = builtin("kumon").unwrap();
        assert_eq!(spec.name, "kumon");
        assert_eq!(spec.level_ids().len(), Level::all().len());
    }

    #[test]
    fn test_builtin_kumon_is_structurally_sound() {
        let spec = builtin("kumon").unwrap();
        let defects = spec.check();
        assert!(defects.is_empty(), "defects: {:?}", defects);
        for level in &spec.levels {
            for range in &level.ranges {
                assert!(range.generator.is_some(), "{} {} has no generator", level.level, range);
            }
        }
    }

    #[test]
    fn test_unknown_builtin() {
        let err = builtin("nope").unwrap_err();
        assert!(matches!(err, CurriculumError::NotFound { .. }));
    }

    #[test]
    fn test_syntax_error_has_help() {
        let err = parse_curriculum("name: x\nlevels:\n  - level: C\n", "bad.yaml").unwrap_err();
        match err {
            CurriculumError::Syntax(e) => assert!(e.message().contains("missing field")),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_load_from_project_dir_and_path() {
        let tmp = tempdir().unwrap();
        let project = Project::init(tmp.path(), false).unwrap();
        let yaml = "name: mini\nlevels:\n  - level: A\n    total_worksheets: 10\n    ranges:\n      - { start: 1, end: 10, type: addition, description: Sums, skills: [add_7] }\n";
        std::fs::write(project.curricula_dir().join("mini.yaml"), yaml).unwrap();

        let spec = load_curriculum("mini", &project).unwrap();
        assert_eq!(spec.name, "mini");

        let path = project.curricula_dir().join("mini.yaml");
        let spec = load_curriculum(path.to_str().unwrap(), &project).unwrap();
        assert!(spec.check().is_empty());

        assert_eq!(load_curriculum("kumon", &project).unwrap().name, "kumon");
    }
}
