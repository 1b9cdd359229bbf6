use super::{display_value, generator_fix, generator_module, recompute, Validator, ValidatorError};
use crate::curriculum::CurriculumSpec;
use crate::entities::problem::{Answer, Problem};
use crate::qa::issue::{Issue, IssueType};

/// Numeric tolerance for answers that went through a float path
const TOLERANCE: f64 = 1e-4;

/// Recomputes the four basic operations from their operands
pub struct MathValidator;

impl MathValidator {
    fn applies(problem: &Problem) -> bool {
        problem.problem_type.is_basic_operation()
            && problem.operands.len() >= 2
            && !problem.is_fill_in_blank()
    }

    fn mismatch(&self, problem: &Problem, expected: String) -> Issue {
        let symbol = problem.problem_type.symbol().unwrap_or("?");
        let expression = problem
            .operands
            .iter()
            .map(|o| o.to_string())
            .collect::<Vec<_>>()
            .join(&format!(" {} ", symbol));
        Issue::error(
            IssueType::MathError,
            problem,
            format!(
                "Expected {} for {}, but the answer is {}",
                expected, expression, problem.correct_answer
            ),
        )
        .with_validator(self.name())
        .auto_fix(generator_fix(
            generator_module(problem),
            format!("Compute the {} answer from the generated operands", problem.problem_type),
        ))
    }
}

/// Answer as a number: fraction-aware, then decimal text
fn numeric(answer: &Answer) -> Option<f64> {
    answer.numeric_value().or_else(|| match answer {
        Answer::Text(text) => text.trim().parse().ok(),
        _ => None,
    })
}

impl Validator for MathValidator {
    fn name(&self) -> &'static str {
        "math"
    }

    fn description(&self) -> &'static str {
        "Answer equals the operation recomputed from the operands"
    }

    fn validate(&self, problem: &Problem, _spec: &CurriculumSpec) -> Result<Vec<Issue>, ValidatorError> {
        if !Self::applies(problem) {
            return Ok(Vec::new());
        }
        let Some(expected) = recompute(problem)? else {
            return Ok(Vec::new());
        };

        // "q R r" answers are checked digit for digit
        if let Some((q, r)) = problem.correct_answer.remainder_parts() {
            let (a, b) = (problem.operands[0], problem.operands[1]);
            let (want_q, want_r) = (a.div_euclid(b), a.rem_euclid(b));
            if problem.operands.len() == 2 && (q, r) == (want_q, want_r) {
                return Ok(Vec::new());
            }
            return Ok(vec![self.mismatch(problem, format!("{} R {}", want_q, want_r))]);
        }

        let matches = match (numeric(&problem.correct_answer), expected.to_f64()) {
            (Some(actual), Some(want)) => (actual - want).abs() < TOLERANCE,
            _ => false,
        };
        if matches {
            Ok(Vec::new())
        } else {
            Ok(vec![self.mismatch(problem, display_value(&expected))])
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::level::Level;
    use crate::core::math::Fraction;
    use crate::entities::problem::ProblemType;
    use crate::qa::issue::Severity;

    fn spec() -> CurriculumSpec {
        CurriculumSpec {
            name: "empty".to_string(),
            description: String::new(),
            levels: Vec::new(),
        }
    }

    fn problem(problem_type: ProblemType, operands: Vec<i64>, answer: Answer) -> Problem {
        Problem::new(Level::A, 90, problem_type, "skill", answer)
            .with_operands(operands)
            .with_question("crafted")
    }

    #[test]
    fn test_wrong_subtraction_reports_expected_value() {
        let p = problem(ProblemType::Subtraction, vec![8, 3], Answer::Number(4));
        let issues = MathValidator.validate(&p, &spec()).unwrap();
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].issue_type, IssueType::MathError);
        assert_eq!(issues[0].severity, Severity::Error);
        assert!(issues[0].auto_fixable);
        assert!(issues[0].description.contains("Expected 5"), "{}", issues[0].description);
    }

    #[test]
    fn test_correct_answers_pass() {
        let cases = [
            problem(ProblemType::Addition, vec![47, 35], Answer::Number(82)),
            problem(ProblemType::Multiplication, vec![2, 7], Answer::Number(14)),
            problem(ProblemType::Division, vec![56, 7], Answer::Number(8)),
            problem(ProblemType::Division, vec![23, 5], Answer::Text("4 R 3".to_string())),
            problem(ProblemType::Division, vec![7, 2], Answer::Fraction(Fraction::new(7, 2))),
            problem(ProblemType::Division, vec![7, 2], Answer::Text("3.5".to_string())),
        ];
        for p in cases {
            assert!(MathValidator.validate(&p, &spec()).unwrap().is_empty(), "{:?}", p.operands);
        }
    }

    #[test]
    fn test_wrong_remainder_flagged() {
        let p = problem(ProblemType::Division, vec![23, 5], Answer::Text("4 R 2".to_string()));
        let issues = MathValidator.validate(&p, &spec()).unwrap();
        assert_eq!(issues.len(), 1);
        assert!(issues[0].description.contains("4 R 3"));
    }

    #[test]
    fn test_fill_in_blank_and_other_types_skipped() {
        let blank = problem(ProblemType::Addition, vec![3, 7], Answer::Number(4)).with_question("3 + ___ = 7");
        assert!(MathValidator.validate(&blank, &spec()).unwrap().is_empty());
        let signed = problem(ProblemType::Integers, vec![3, 7], Answer::Number(99));
        assert!(MathValidator.validate(&signed, &spec()).unwrap().is_empty());
        let single = problem(ProblemType::Addition, vec![3], Answer::Number(99));
        assert!(MathValidator.validate(&single, &spec()).unwrap().is_empty());
    }

    #[test]
    fn test_zero_divisor_is_a_validator_error() {
        let p = problem(ProblemType::Division, vec![5, 0], Answer::Number(0));
        assert!(MathValidator.validate(&p, &spec()).is_err());
    }
}
