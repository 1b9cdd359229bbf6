use super::{generator_fix, Validator, ValidatorError};
use crate::curriculum::{CurriculumSpec, WorksheetRange};
use crate::entities::problem::{Problem, ProblemType};
use crate::qa::issue::{Issue, IssueType};

/// Checks generated problems against the expected range type and skills
pub struct CurriculumValidator;

/// An `add_N` skill explains an addition problem whose second operand is N
fn explained_by_addend(problem: &Problem, range: &WorksheetRange) -> bool {
    if problem.problem_type != ProblemType::Addition {
        return false;
    }
    let Some(second) = problem.operands.get(1) else {
        return false;
    };
    range.expected_skills.iter().any(|skill| {
        skill
            .to_lowercase()
            .strip_prefix("add_")
            .and_then(|n| n.parse::<i64>().ok())
            .is_some_and(|n| n == *second)
    })
}

impl Validator for CurriculumValidator {
    fn name(&self) -> &'static str {
        "curriculum"
    }

    fn description(&self) -> &'static str {
        "Problem type and skill match the curriculum range"
    }

    fn validate(&self, problem: &Problem, spec: &CurriculumSpec) -> Result<Vec<Issue>, ValidatorError> {
        let Some(range) = spec.get_worksheet_range(problem.level, problem.worksheet_number) else {
            return Ok(vec![Issue::warning(
                IssueType::CurriculumMismatch,
                problem,
                format!(
                    "Curriculum '{}' has no range for level {} worksheet {}",
                    spec.name, problem.level, problem.worksheet_number
                ),
            )
            .with_validator(self.name())]);
        };

        if range.matches_problem_type(&problem.subtype)
            || range.matches_problem_type(problem.problem_type.as_str())
            || explained_by_addend(problem, range)
        {
            return Ok(Vec::new());
        }

        let description = format!(
            "Generated {} ({}) where worksheets {} expect {} [{}]",
            problem.problem_type,
            problem.subtype,
            range,
            range.problem_type,
            range.expected_skills.join(", ")
        );

        let wrong_category = problem.problem_type == ProblemType::Addition
            && matches!(range.problem_type, ProblemType::Sequence | ProblemType::Counting);

        let issue = if wrong_category {
            Issue::error(IssueType::CurriculumMismatch, problem, description).auto_fix(generator_fix(
                "early",
                format!(
                    "Worksheets {} should produce {} problems, not addition",
                    range, range.problem_type
                ),
            ))
        } else {
            Issue::warning(IssueType::CurriculumMismatch, problem, description)
        };
        Ok(vec![issue.with_validator(self.name())])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::level::Level;
    use crate::curriculum::LevelSpec;
    use crate::entities::problem::Answer;
    use crate::qa::issue::Severity;

    fn spec() -> CurriculumSpec {
        let range = |start, end, problem_type, skills: &[&str]| WorksheetRange {
            start,
            end,
            problem_type,
            description: String::new(),
            expected_skills: skills.iter().map(|s| s.to_string()).collect(),
            generator: None,
        };
        CurriculumSpec {
            name: "test".to_string(),
            description: String::new(),
            levels: vec![LevelSpec {
                level: Level::L3A,
                total_worksheets: 200,
                description: String::new(),
                ranges: vec![
                    range(1, 80, ProblemType::Sequence, &["sequence_to_120"]),
                    range(81, 130, ProblemType::Counting, &["add_1_prep"]),
                    range(131, 200, ProblemType::Multiplication, &["add_7", "times_table_7"]),
                ],
            }],
        }
    }

    fn addition(worksheet: u32, subtype: &str, operands: Vec<i64>) -> Problem {
        Problem::new(Level::L3A, worksheet, ProblemType::Addition, subtype, Answer::Number(0))
            .with_operands(operands)
    }

    #[test]
    fn test_matching_problem_passes() {
        let p = Problem::new(Level::L3A, 10, ProblemType::Sequence, "sequence_to_120", Answer::Number(5));
        assert!(CurriculumValidator.validate(&p, &spec()).unwrap().is_empty());
    }

    #[test]
    fn test_unmapped_worksheet_warns() {
        let p = addition(250, "add_1", vec![1, 1]);
        let issues = CurriculumValidator.validate(&p, &spec()).unwrap();
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].severity, Severity::Warning);
    }

    #[test]
    fn test_addition_in_sequence_range_is_error() {
        let p = addition(10, "add_2", vec![4, 2]);
        let issues = CurriculumValidator.validate(&p, &spec()).unwrap();
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].severity, Severity::Error);
        assert!(issues[0].is_auto_fixable());
    }

    #[test]
    fn test_addend_bucket_explains_mismatch() {
        let p = addition(150, "adding_sevens", vec![3, 7]);
        assert!(CurriculumValidator.validate(&p, &spec()).unwrap().is_empty());
        let p = addition(150, "adding_sevens", vec![3, 6]);
        let issues = CurriculumValidator.validate(&p, &spec()).unwrap();
        assert_eq!(issues[0].severity, Severity::Warning);
        assert!(!issues[0].auto_fixable);
    }
}
