use super::{display_value, generator_fix, generator_module, is_complex, recompute, Validator, ValidatorError};
use crate::core::math::Fraction;
use crate::curriculum::CurriculumSpec;
use crate::entities::problem::{DisplayFormat, Problem, BLANK_MARKER};
use crate::qa::issue::{Issue, IssueType};

/// Cross-field checks: question text, operands, answer and layout agree
pub struct ConsistencyValidator;

#[derive(Debug, Clone, Copy, PartialEq)]
enum Term {
    Value(i64),
    Blank,
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Op {
    Add,
    Sub,
    Mul,
    Div,
}

fn parse_term(token: &str) -> Option<Term> {
    if token == BLANK_MARKER {
        return Some(Term::Blank);
    }
    token
        .trim_start_matches('(')
        .trim_end_matches(')')
        .parse()
        .ok()
        .map(Term::Value)
}

fn parse_op(token: &str) -> Option<Op> {
    match token {
        "+" => Some(Op::Add),
        "-" | "−" => Some(Op::Sub),
        "×" | "*" | "x" => Some(Op::Mul),
        "÷" | "/" => Some(Op::Div),
        _ => None,
    }
}

/// `a op b = c` where at most one term is a blank
fn parse_statement(question: &str) -> Option<(Term, Op, Term, Term)> {
    let tokens: Vec<&str> = question.split_whitespace().collect();
    let [a, op, b, "=", c] = tokens.as_slice() else {
        return None;
    };
    let statement = (parse_term(a)?, parse_op(op)?, parse_term(b)?, parse_term(c)?);
    let blanks = [statement.0, statement.2, statement.3]
        .iter()
        .filter(|t| **t == Term::Blank)
        .count();
    (blanks <= 1).then_some(statement)
}

fn apply(op: Op, a: i64, b: i64) -> Option<Fraction> {
    let (a, b) = (Fraction::whole(a), Fraction::whole(b));
    match op {
        Op::Add => Some(a.add(&b)),
        Op::Sub => Some(a.sub(&b)),
        Op::Mul => Some(a.mul(&b)),
        Op::Div => a.checked_div(&b),
    }
}

/// Value the question text implies for the answer slot
fn implied_answer(statement: (Term, Op, Term, Term)) -> Option<Fraction> {
    use Term::{Blank, Value};
    match statement {
        // The stated result is what the answer must be
        (Value(_), _, Value(_), Value(c)) => Some(Fraction::whole(c)),
        (Value(a), op, Value(b), Blank) => apply(op, a, b),
        (Value(a), op, Blank, Value(c)) => match op {
            Op::Add => apply(Op::Sub, c, a),
            Op::Sub => apply(Op::Sub, a, c),
            Op::Mul => apply(Op::Div, c, a),
            Op::Div => apply(Op::Div, a, c),
        },
        (Blank, op, Value(b), Value(c)) => match op {
            Op::Add => apply(Op::Sub, c, b),
            Op::Sub => apply(Op::Add, c, b),
            Op::Mul => apply(Op::Div, c, b),
            Op::Div => apply(Op::Mul, c, b),
        },
        _ => None,
    }
}

impl ConsistencyValidator {
    fn disagreement(&self, problem: &Problem, description: String) -> Issue {
        Issue::error(IssueType::Consistency, problem, description)
            .with_validator(self.name())
            .auto_fix(generator_fix(
                generator_module(problem),
                "Render the question from the same values the answer is computed from",
            ))
    }
}

impl Validator for ConsistencyValidator {
    fn name(&self) -> &'static str {
        "consistency"
    }

    fn description(&self) -> &'static str {
        "Question text, operands, answer and layout agree"
    }

    fn validate(&self, problem: &Problem, _spec: &CurriculumSpec) -> Result<Vec<Issue>, ValidatorError> {
        let mut issues = Vec::new();
        let complex = is_complex(problem);
        let answer = problem.correct_answer.as_fraction();

        // Textual statement in the question
        if let Some(statement) = problem.question.as_deref().and_then(parse_statement) {
            if let Some(implied) = implied_answer(statement) {
                let agrees = answer.is_some_and(|a| a.equivalent(&implied))
                    || (problem.correct_answer.remainder_parts().is_some() && statement.3 == Term::Blank);
                if !agrees {
                    issues.push(self.disagreement(
                        problem,
                        format!(
                            "Question '{}' implies {} but the answer is {}",
                            problem.question.as_deref().unwrap_or_default(),
                            display_value(&implied),
                            problem.correct_answer
                        ),
                    ));
                }
            }
        }

        // Operands against answer
        if !problem.is_fill_in_blank() && !complex && problem.operands.len() >= 2 {
            if let Some(expected) = recompute(problem)? {
                let agrees = match problem.correct_answer.remainder_parts() {
                    Some((q, r)) => {
                        let (a, b) = (problem.operands[0], problem.operands[1]);
                        problem.operands.len() == 2 && a.div_euclid(b) == q && a.rem_euclid(b) == r
                    }
                    None => answer.is_some_and(|a| a.equivalent(&expected)),
                };
                if !agrees {
                    issues.push(self.disagreement(
                        problem,
                        format!(
                            "Operands {:?} give {} but the answer is {}",
                            problem.operands,
                            display_value(&expected),
                            problem.correct_answer
                        ),
                    ));
                }
            }
        }

        if problem.question.is_none() && problem.operands.is_empty() {
            issues.push(
                Issue::warning(
                    IssueType::Consistency,
                    problem,
                    "Problem has neither question text nor operands to render",
                )
                .with_validator(self.name()),
            );
        }

        if problem.display_format == DisplayFormat::Vertical && problem.operands.len() < 2 && !complex {
            issues.push(
                Issue::error(
                    IssueType::Consistency,
                    problem,
                    format!(
                        "Vertical layout needs at least 2 operands, found {}",
                        problem.operands.len()
                    ),
                )
                .with_validator(self.name())
                .auto_fix(generator_fix(
                    generator_module(problem),
                    "Use the horizontal layout when there are fewer than two operands",
                )),
            );
        }

        Ok(issues)
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

    fn addition(question: &str, operands: Vec<i64>, answer: i64) -> Problem {
        Problem::new(Level::A, 10, ProblemType::Addition, "addition_to_20", Answer::Number(answer))
            .with_question(question)
            .with_operands(operands)
    }

    #[test]
    fn test_statement_parsing() {
        assert_eq!(
            parse_statement("3 + ___ = 7"),
            Some((Term::Value(3), Op::Add, Term::Blank, Term::Value(7)))
        );
        assert_eq!(
            parse_statement("(-5) - 3 = ___"),
            Some((Term::Value(-5), Op::Sub, Term::Value(3), Term::Blank))
        );
        assert!(parse_statement("47 + 35 =").is_none());
        assert!(parse_statement("___ + ___ = 7").is_none());
        assert!(parse_statement("How many dots?").is_none());
    }

    #[test]
    fn test_consistent_problems_pass() {
        let v = ConsistencyValidator;
        assert!(v.validate(&addition("47 + 35 =", vec![47, 35], 82), &spec()).unwrap().is_empty());
        assert!(v.validate(&addition("3 + ___ = 7", vec![3, 7], 4), &spec()).unwrap().is_empty());
        assert!(v.validate(&addition("6 + 4 = 10", vec![6, 4], 10), &spec()).unwrap().is_empty());
    }

    #[test]
    fn test_blank_disagreeing_with_answer() {
        let issues = ConsistencyValidator
            .validate(&addition("3 + ___ = 7", vec![3, 7], 5), &spec())
            .unwrap();
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].severity, Severity::Error);
        assert!(issues[0].auto_fixable);
        assert!(issues[0].description.contains("implies 4"));
    }

    #[test]
    fn test_operands_disagreeing_with_answer() {
        let issues = ConsistencyValidator
            .validate(&addition("47 + 35 =", vec![47, 35], 81), &spec())
            .unwrap();
        assert_eq!(issues.len(), 1);
        assert!(issues[0].description.contains("give 82"));
    }

    #[test]
    fn test_nothing_to_render_warns() {
        let p = Problem::new(Level::A, 1, ProblemType::Addition, "addition_to_20", Answer::Number(1));
        let issues = ConsistencyValidator.validate(&p, &spec()).unwrap();
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].severity, Severity::Warning);
    }

    #[test]
    fn test_vertical_needs_two_operands_unless_complex() {
        let p = addition("5 =", vec![5], 5).with_display_format(DisplayFormat::Vertical);
        let issues = ConsistencyValidator.validate(&p, &spec()).unwrap();
        assert!(issues.iter().any(|i| i.severity == Severity::Error && i.description.contains("Vertical")));

        let m = Problem::new(Level::XM, 1, ProblemType::Matrix, "determinant_2x2", Answer::Number(1))
            .with_question("Find the determinant of [[1]]")
            .with_display_format(DisplayFormat::Vertical);
        assert!(ConsistencyValidator.validate(&m, &spec()).unwrap().is_empty());
    }

    #[test]
    fn test_remainder_answers_are_consistent() {
        let p = Problem::new(Level::C, 170, ProblemType::Division, "division_with_remainder", Answer::Text("4 R 3".into()))
            .with_question("23 ÷ 5 =")
            .with_operands(vec![23, 5]);
        assert!(ConsistencyValidator.validate(&p, &spec()).unwrap().is_empty());
    }
}
