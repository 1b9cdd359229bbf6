use super::{display_value, generator_fix, Validator, ValidatorError};
use crate::core::math::Fraction;
use crate::curriculum::CurriculumSpec;
use crate::entities::problem::{Problem, ProblemType};
use crate::qa::issue::{Issue, IssueType};

/// Checks fraction problems exactly, by cross-multiplication
pub struct FractionValidator;

fn promises_simplification(subtype: &str) -> bool {
    let subtype = subtype.to_lowercase();
    ["reduce", "simplif", "lowest"]
        .iter()
        .any(|keyword| subtype.contains(keyword))
}

/// Operator between the two fractions in `a/b op c/d =`
fn operator(question: &str) -> Option<&str> {
    let tokens: Vec<&str> = question.split_whitespace().collect();
    match tokens.as_slice() {
        [_, op, _, ..] => Some(*op),
        _ => None,
    }
}

impl Validator for FractionValidator {
    fn name(&self) -> &'static str {
        "fraction"
    }

    fn description(&self) -> &'static str {
        "Fraction answers are exact and simplified when required"
    }

    fn validate(&self, problem: &Problem, _spec: &CurriculumSpec) -> Result<Vec<Issue>, ValidatorError> {
        if problem.problem_type != ProblemType::Fraction {
            return Ok(Vec::new());
        }

        let (expected, reduce_only) = match problem.operands.as_slice() {
            [n, d] => {
                if *d == 0 {
                    return Ok(vec![self.zero_denominator(problem)]);
                }
                (Fraction::new(*n, *d).reduced(), true)
            }
            [n1, d1, n2, d2] => {
                if *d1 == 0 || *d2 == 0 {
                    return Ok(vec![self.zero_denominator(problem)]);
                }
                let (left, right) = (Fraction::new(*n1, *d1), Fraction::new(*n2, *d2));
                let question = problem.question.as_deref().unwrap_or_default();
                let value = match operator(question) {
                    Some("+") => left.add(&right),
                    Some("-") => left.sub(&right),
                    Some("×") | Some("*") => left.mul(&right),
                    Some("÷") | Some("/") => left.checked_div(&right).ok_or_else(|| {
                        ValidatorError::DivisionByZero {
                            operands: problem.operands.clone(),
                        }
                    })?,
                    _ => {
                        return Err(ValidatorError::Malformed(format!(
                            "no fraction operator in question '{}'",
                            question
                        )))
                    }
                };
                (value, false)
            }
            _ => return Ok(Vec::new()),
        };

        let Some(answer) = problem.correct_answer.as_fraction() else {
            return Ok(vec![Issue::error(
                IssueType::FractionError,
                problem,
                format!("Answer '{}' is not a fraction", problem.correct_answer),
            )
            .with_validator(self.name())]);
        };

        let mut issues = Vec::new();
        if !answer.equivalent(&expected) {
            issues.push(
                Issue::error(
                    IssueType::FractionError,
                    problem,
                    format!(
                        "Expected {} but the answer is {}",
                        display_value(&expected),
                        problem.correct_answer
                    ),
                )
                .with_validator(self.name())
                .auto_fix(generator_fix(
                    "fractions",
                    "Recompute the fraction result from the displayed operands",
                )),
            );
        } else if (reduce_only || promises_simplification(&problem.subtype)) && !answer.is_reduced() {
            issues.push(
                Issue::warning(
                    IssueType::FractionError,
                    problem,
                    format!("Answer {} is not in lowest terms ({})", answer, answer.reduced()),
                )
                .with_validator(self.name()),
            );
        }
        Ok(issues)
    }
}

impl FractionValidator {
    fn zero_denominator(&self, problem: &Problem) -> Issue {
        Issue::error(
            IssueType::FractionError,
            problem,
            format!("Operands {:?} contain a zero denominator", problem.operands),
        )
        .with_validator(self.name())
        .auto_fix(generator_fix("fractions", "Draw denominators from a range starting at 2"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::level::Level;
    use crate::entities::problem::Answer;
    use crate::qa::issue::Severity;

    fn spec() -> CurriculumSpec {
        CurriculumSpec {
            name: "empty".to_string(),
            description: String::new(),
            levels: Vec::new(),
        }
    }

    fn fraction(subtype: &str, question: &str, operands: Vec<i64>, answer: Answer) -> Problem {
        Problem::new(Level::E, 1, ProblemType::Fraction, subtype, answer)
            .with_question(question)
            .with_operands(operands)
    }

    #[test]
    fn test_equivalent_answer_passes() {
        let p = fraction(
            "fraction_add_same_denominator",
            "1/4 + 2/4 =",
            vec![1, 4, 2, 4],
            Answer::Fraction(Fraction::new(3, 4)),
        );
        assert!(FractionValidator.validate(&p, &spec()).unwrap().is_empty());

        let p = fraction("fraction_multiply", "6/3 × 1/1 =", vec![6, 3, 1, 1], Answer::Text("12/6".into()));
        assert!(FractionValidator.validate(&p, &spec()).unwrap().is_empty());
    }

    #[test]
    fn test_wrong_answer_is_error() {
        let p = fraction("fraction_review", "1/2 + 1/3 =", vec![1, 2, 1, 3], Answer::Fraction(Fraction::new(2, 5)));
        let issues = FractionValidator.validate(&p, &spec()).unwrap();
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].severity, Severity::Error);
        assert!(issues[0].description.contains("5/6"));
    }

    #[test]
    fn test_unreduced_answer_warns_when_simplifying() {
        let p = fraction("fraction_reduce", "Simplify 6/8", vec![6, 8], Answer::Fraction(Fraction::new(6, 8)));
        let issues = FractionValidator.validate(&p, &spec()).unwrap();
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].severity, Severity::Warning);

        let p = fraction("fraction_review", "1/4 + 1/4 =", vec![1, 4, 1, 4], Answer::Fraction(Fraction::new(2, 4)));
        assert!(FractionValidator.validate(&p, &spec()).unwrap().is_empty());
    }

    #[test]
    fn test_zero_denominator() {
        let p = fraction("fraction_review", "1/0 + 1/3 =", vec![1, 0, 1, 3], Answer::Fraction(Fraction::new(1, 3)));
        let issues = FractionValidator.validate(&p, &spec()).unwrap();
        assert_eq!(issues[0].severity, Severity::Error);
        assert!(issues[0].description.contains("zero denominator"));
    }

    #[test]
    fn test_missing_operator_is_validator_error() {
        let p = fraction("fraction_review", "1/2 ? 1/3", vec![1, 2, 1, 3], Answer::Fraction(Fraction::new(1, 6)));
        assert!(matches!(
            FractionValidator.validate(&p, &spec()),
            Err(ValidatorError::Malformed(_))
        ));
    }
}
