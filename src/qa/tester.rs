//! QA orchestration: generate problems per worksheet range, run the
//! validators, and aggregate the results into a report

use chrono::{DateTime, Utc};
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};
use std::panic::{self, AssertUnwindSafe};

use crate::core::config::{Config, DEFAULT_PROBLEMS_PER_RANGE};
use crate::core::level::Level;
use crate::core::random::worksheet_in;
use crate::curriculum::{CurriculumSpec, LevelSpec, WorksheetRange};
use crate::entities::problem::Problem;
use crate::generator::ProblemSource;
use crate::qa::fix_engine::FixResult;
use crate::qa::issue::{Issue, IssueType, Severity};
use crate::qa::validators::{default_validators, Validator, ValidatorToggles};

/// Knobs for one QA run
#[derive(Debug, Clone)]
pub struct QaConfig {
    pub problems_per_range: usize,
    /// Levels to test; empty means every level in the curriculum
    pub levels: Vec<Level>,
    pub toggles: ValidatorToggles,
    /// Seed for worksheet sampling
    pub seed: Option<u64>,
}

impl Default for QaConfig {
    fn default() -> Self {
        Self {
            problems_per_range: DEFAULT_PROBLEMS_PER_RANGE,
            levels: Vec::new(),
            toggles: ValidatorToggles::default(),
            seed: None,
        }
    }
}

impl From<&Config> for QaConfig {
    fn from(config: &Config) -> Self {
        Self {
            problems_per_range: config.problems_per_range(),
            levels: config.levels(),
            toggles: config.validators(),
            seed: config.seed,
        }
    }
}

/// Outcome of testing one worksheet range
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TestResult {
    pub level: Level,
    pub range: WorksheetRange,
    pub problems_tested: usize,
    pub issues: Vec<Issue>,
    pub error_count: usize,
    pub warning_count: usize,
    pub info_count: usize,
    pub passed: bool,
}

impl TestResult {
    fn new(level: Level, range: &WorksheetRange, problems_tested: usize, issues: Vec<Issue>) -> Self {
        let count = |severity: Severity| issues.iter().filter(|i| i.severity == severity).count();
        let error_count = count(Severity::Error);
        let warning_count = count(Severity::Warning);
        let info_count = count(Severity::Info);
        Self {
            level,
            range: range.clone(),
            problems_tested,
            issues,
            error_count,
            warning_count,
            info_count,
            passed: error_count == 0,
        }
    }
}

/// Aggregated outcome of a QA run
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QaReport {
    pub generated_at: DateTime<Utc>,
    pub curriculum: String,
    pub total_problems: usize,
    pub total_issues: usize,
    pub issues_by_type: BTreeMap<String, usize>,
    pub issues_by_severity: BTreeMap<String, usize>,
    pub levels_tested: Vec<Level>,
    pub levels_passed: Vec<Level>,
    pub levels_failed: Vec<Level>,
    pub results: Vec<TestResult>,
    /// Structural curriculum defects of the tested levels
    pub curriculum_issues: Vec<Issue>,
    pub fixes_attempted: usize,
    pub fixes_applied: usize,
    pub fixes_failed: usize,
}

impl QaReport {
    /// Aggregate per-range results and curriculum defects
    pub fn from_results(curriculum: &str, results: Vec<TestResult>, curriculum_issues: Vec<Issue>) -> Self {
        let mut issues_by_type = BTreeMap::new();
        let mut issues_by_severity = BTreeMap::new();
        let mut tested = BTreeSet::new();
        let mut failed = BTreeSet::new();
        let mut total_problems = 0;
        let mut total_issues = 0;

        for result in &results {
            tested.insert(result.level);
            if !result.passed {
                failed.insert(result.level);
            }
            total_problems += result.problems_tested;
        }
        for issue in &curriculum_issues {
            tested.insert(issue.level);
            if issue.severity == Severity::Error {
                failed.insert(issue.level);
            }
        }

        let all_issues = curriculum_issues
            .iter()
            .chain(results.iter().flat_map(|result| result.issues.iter()));
        for issue in all_issues {
            total_issues += 1;
            *issues_by_type.entry(issue.issue_type.to_string()).or_insert(0) += 1;
            *issues_by_severity.entry(issue.severity.to_string()).or_insert(0) += 1;
        }

        let levels_passed = tested.difference(&failed).copied().collect();
        Self {
            generated_at: Utc::now(),
            curriculum: curriculum.to_string(),
            total_problems,
            total_issues,
            issues_by_type,
            issues_by_severity,
            levels_tested: tested.into_iter().collect(),
            levels_passed,
            levels_failed: failed.into_iter().collect(),
            results,
            curriculum_issues,
            fixes_attempted: 0,
            fixes_applied: 0,
            fixes_failed: 0,
        }
    }

    /// Curriculum defects first, then every issue in result order
    pub fn issues(&self) -> impl Iterator<Item = &Issue> {
        self.curriculum_issues
            .iter()
            .chain(self.results.iter().flat_map(|result| result.issues.iter()))
    }

    pub fn passed(&self) -> bool {
        self.levels_failed.is_empty()
    }

    /// Record the outcome of an auto-fix pass
    pub fn record_fixes(&mut self, fixes: &[FixResult]) {
        self.fixes_attempted = fixes.len();
        self.fixes_applied = fixes.iter().filter(|fix| fix.success).count();
        self.fixes_failed = self.fixes_attempted - self.fixes_applied;
    }
}

/// Drives a problem source through the validators
pub struct ProblemTester<'a, S: ProblemSource> {
    source: S,
    curriculum: &'a CurriculumSpec,
    config: QaConfig,
    validators: Vec<Box<dyn Validator>>,
    rng: StdRng,
}

impl<'a, S: ProblemSource> ProblemTester<'a, S> {
    pub fn new(source: S, curriculum: &'a CurriculumSpec, config: QaConfig) -> Self {
        let validators = default_validators(&config.toggles);
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::seed_from_u64(rand::random()),
        };
        Self {
            source,
            curriculum,
            config,
            validators,
            rng,
        }
    }

    /// Names of the validators this tester runs
    pub fn validator_names(&self) -> Vec<&'static str> {
        self.validators.iter().map(|v| v.name()).collect()
    }

    /// Generate `problems_per_range` problems at random worksheets in the
    /// range and validate each one
    pub fn test_worksheet_range(&mut self, level: Level, range: &WorksheetRange) -> TestResult {
        let mut issues = Vec::new();
        let mut tested = 0;

        for _ in 0..self.config.problems_per_range {
            let worksheet = worksheet_in(&mut self.rng, range.start, range.end);

            match generate_guarded(&mut self.source, level, worksheet) {
                Ok(problem) => {
                    tested += 1;
                    for validator in &self.validators {
                        issues.extend(run_validator(validator.as_ref(), &problem, self.curriculum));
                    }
                }
                Err(reason) => {
                    tracing::warn!(level = %level, worksheet, error = %reason, "generation failed");
                    issues.push(
                        Issue::new(
                            IssueType::Consistency,
                            Severity::Error,
                            level,
                            worksheet,
                            range.problem_type.as_str(),
                            format!("Failed to generate problem: {}", reason),
                        )
                        .with_validator("tester"),
                    );
                }
            }
        }

        let result = TestResult::new(level, range, tested, issues);
        tracing::debug!(
            level = %level,
            range = %range,
            problems = result.problems_tested,
            errors = result.error_count,
            warnings = result.warning_count,
            "tested worksheet range"
        );
        result
    }

    /// One result per range of the level
    pub fn test_level(&mut self, spec: &LevelSpec) -> Vec<TestResult> {
        spec.ranges
            .iter()
            .map(|range| self.test_worksheet_range(spec.level, range))
            .collect()
    }

    /// Test the configured levels (or all) and aggregate a report
    pub fn test_all_levels(&mut self) -> QaReport {
        let curriculum = self.curriculum;
        let mut defects: BTreeMap<Level, Vec<Issue>> = BTreeMap::new();
        for defect in curriculum.check() {
            tracing::warn!(level = %defect.level, "curriculum defect: {}", defect.message);
            defects.entry(defect.level).or_default().push(
                Issue::new(
                    IssueType::CurriculumMismatch,
                    Severity::Warning,
                    defect.level,
                    0,
                    "curriculum",
                    defect.message,
                )
                .with_validator("curriculum-check"),
            );
        }

        let levels = if self.config.levels.is_empty() {
            curriculum.level_ids()
        } else {
            self.config.levels.clone()
        };

        let mut results = Vec::new();
        let mut curriculum_issues = Vec::new();
        for level in levels {
            let Some(spec) = curriculum.level(level) else {
                tracing::warn!(level = %level, curriculum = %curriculum.name, "level not in curriculum, skipping");
                continue;
            };
            curriculum_issues.extend(defects.remove(&level).unwrap_or_default());
            results.extend(self.test_level(spec));
        }

        QaReport::from_results(&curriculum.name, results, curriculum_issues)
    }
}

/// Auto-fixable issues that carry a suggested fix
pub fn get_auto_fixable_issues(report: &QaReport) -> Vec<Issue> {
    report
        .issues()
        .filter(|issue| issue.auto_fixable && issue.suggested_fix.is_some())
        .cloned()
        .collect()
}

/// Generate one problem, turning a generator panic into an error message
fn generate_guarded<S: ProblemSource>(source: &mut S, level: Level, worksheet: u32) -> Result<Problem, String> {
    match panic::catch_unwind(AssertUnwindSafe(|| source.generate(level, worksheet))) {
        Ok(Ok(problem)) => Ok(problem),
        Ok(Err(e)) => Err(e.to_string()),
        Err(payload) => Err(format!("generator panicked: {}", panic_message(payload.as_ref()))),
    }
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    payload
        .downcast_ref::<&str>()
        .map(|s| s.to_string())
        .or_else(|| payload.downcast_ref::<String>().cloned())
        .unwrap_or_else(|| "panic".to_string())
}

/// Run one validator, turning errors and panics into a failure issue
fn run_validator(validator: &dyn Validator, problem: &Problem, curriculum: &CurriculumSpec) -> Vec<Issue> {
    let outcome = panic::catch_unwind(AssertUnwindSafe(|| validator.validate(problem, curriculum)));
    let reason = match outcome {
        Ok(Ok(issues)) => return issues,
        Ok(Err(e)) => e.to_string(),
        Err(payload) => panic_message(payload.as_ref()),
    };
    tracing::error!(validator = validator.name(), problem = %problem.id, "validator failed: {}", reason);
    vec![Issue::error(
        IssueType::ValidatorFailure,
        problem,
        format!("Validator '{}' failed on {}: {}", validator.name(), problem.id, reason),
    )
    .with_validator(validator.name())]
}
