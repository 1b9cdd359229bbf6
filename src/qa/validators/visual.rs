use super::{generator_fix, generator_module, Validator, ValidatorError};
use crate::curriculum::CurriculumSpec;
use crate::entities::problem::Problem;
use crate::qa::issue::{Issue, IssueType};

/// Checks that the count encoded in the first visual asset matches the answer
pub struct VisualValidator;

/// Trailing `_`-separated token of an asset id (`dots_1_5` -> 5)
fn encoded_count(asset: &str) -> Option<i64> {
    asset.rsplit('_').next()?.trim().parse().ok()
}

impl Validator for VisualValidator {
    fn name(&self) -> &'static str {
        "visual"
    }

    fn description(&self) -> &'static str {
        "Visual asset count agrees with the answer"
    }

    fn validate(&self, problem: &Problem, _spec: &CurriculumSpec) -> Result<Vec<Issue>, ValidatorError> {
        let Some(asset) = problem.visual_assets.first() else {
            return Ok(Vec::new());
        };

        let Some(count) = encoded_count(asset) else {
            return Ok(vec![Issue::warning(
                IssueType::VisualMismatch,
                problem,
                format!("Visual asset '{}' does not end in a count", asset),
            )
            .with_validator(self.name())]);
        };

        let Some(answer) = problem.correct_answer.numeric_value() else {
            return Ok(vec![Issue::warning(
                IssueType::VisualMismatch,
                problem,
                format!(
                    "Visual asset '{}' shows {} but the answer '{}' is not a number",
                    asset, count, problem.correct_answer
                ),
            )
            .with_validator(self.name())]);
        };
        if (answer - count as f64).abs() < f64::EPSILON {
            return Ok(Vec::new());
        }

        let subtype = problem.subtype.to_lowercase();
        let (module, explanation) = if subtype.contains("count") || subtype.contains("dot") {
            (
                "early",
                format!(
                    "Build the asset id from the same count as the answer ({} dots shown, answer {})",
                    count, problem.correct_answer
                ),
            )
        } else {
            (
                generator_module(problem),
                format!(
                    "The generator attaches a {}-item picture to a problem whose answer is {}",
                    count, problem.correct_answer
                ),
            )
        };

        Ok(vec![Issue::error(
            IssueType::VisualMismatch,
            problem,
            format!(
                "Visual asset '{}' shows {} but the answer is {}",
                asset, count, problem.correct_answer
            ),
        )
        .with_validator(self.name())
        .auto_fix(generator_fix(module, explanation))])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::level::Level;
    use crate::entities::problem::{Answer, ProblemType};
    use crate::qa::issue::Severity;

    fn spec() -> CurriculumSpec {
        CurriculumSpec {
            name: "empty".to_string(),
            description: String::new(),
            levels: Vec::new(),
        }
    }

    fn counting(answer: i64, asset: &str) -> Problem {
        Problem::new(Level::L6A, 1, ProblemType::Counting, "counting_to_5", Answer::Number(answer))
            .with_visual_assets(vec![asset.to_string()])
    }

    #[test]
    fn test_matching_asset_passes() {
        let issues = VisualValidator.validate(&counting(5, "dots_1_5"), &spec()).unwrap();
        assert!(issues.is_empty());
    }

    #[test]
    fn test_mismatch_is_auto_fixable_error() {
        let issues = VisualValidator.validate(&counting(4, "dots_1_5"), &spec()).unwrap();
        assert_eq!(issues.len(), 1);
        let issue = &issues[0];
        assert_eq!(issue.issue_type, IssueType::VisualMismatch);
        assert_eq!(issue.severity, Severity::Error);
        assert!(issue.is_auto_fixable());
        assert_eq!(issue.suggested_fix.as_ref().unwrap().file, "src/**/early.rs");
    }

    #[test]
    fn test_unparseable_asset_warns() {
        let issues = VisualValidator.validate(&counting(5, "dots_many"), &spec()).unwrap();
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].severity, Severity::Warning);
        assert!(!issues[0].auto_fixable);
    }

    #[test]
    fn test_non_numeric_answer_warns() {
        let problem = Problem::new(
            Level::C,
            150,
            ProblemType::Division,
            "division_remainder",
            Answer::Text("4 R 2".to_string()),
        )
        .with_visual_assets(vec!["groups_4".to_string()]);
        let issues = VisualValidator.validate(&problem, &spec()).unwrap();
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].severity, Severity::Warning);
        assert_eq!(issues[0].issue_type, IssueType::VisualMismatch);
        assert!(issues[0].description.contains("4 R 2"));
        assert!(!issues[0].auto_fixable);
    }

    #[test]
    fn test_non_counting_problem_targets_generator() {
        let problem = Problem::new(Level::A, 10, ProblemType::Addition, "addition_to_20", Answer::Number(7))
            .with_visual_assets(vec!["apples_3".to_string()]);
        let issues = VisualValidator.validate(&problem, &spec()).unwrap();
        assert_eq!(issues[0].suggested_fix.as_ref().unwrap().file, "src/**/arithmetic.rs");
    }
}
