//! Equations, functions, powers and logarithms

use rand::Rng;

use super::{hints, GenerationError, Slot};
use crate::core::math::Polynomial;
use crate::core::random::IntRange;
use crate::entities::problem::{Answer, Problem, ProblemType};

/// Random polynomial of exactly `degree` (non-zero leading coefficient)
pub(crate) fn random_polynomial<R: Rng + ?Sized>(
    degree: usize,
    coefficient: &IntRange,
    rng: &mut R,
) -> Polynomial {
    let mut coefficients: Vec<i64> = (0..degree).map(|_| coefficient.sample(rng)).collect();
    coefficients.push(coefficient.sample_nonzero(rng));
    Polynomial::new(coefficients)
}

/// `ax + b` rendered without redundant signs or unit coefficients
fn linear_side(a: i64, b: i64) -> String {
    let lead = match a {
        1 => "x".to_string(),
        -1 => "-x".to_string(),
        _ => format!("{}x", a),
    };
    match b {
        0 => lead,
        b if b > 0 => format!("{} + {}", lead, b),
        b => format!("{} - {}", lead, -b),
    }
}

/// `ax + b = c` built backwards from an integer solution
pub(crate) fn linear_equation<R: Rng + ?Sized>(
    slot: &Slot,
    coefficient: &IntRange,
    constant: &IntRange,
    solution: &IntRange,
    rng: &mut R,
) -> Problem {
    let a = coefficient.sample_nonzero(rng);
    let b = constant.sample(rng);
    let x = solution.sample(rng);
    let c = a * x + b;

    let problem = slot
        .problem(ProblemType::Algebra, Answer::Number(x))
        .with_question(format!("Solve for x: {} = {}", linear_side(a, b), c))
        .with_operands(vec![a, b, c]);

    hints::attach(
        problem,
        "Undo the operations on x in reverse order.",
        [
            "Get the x term alone on one side.".to_string(),
            if b == 0 {
                format!("Divide both sides by {}.", a)
            } else {
                format!("Subtract {} from both sides, then divide by {}.", b, a)
            },
            format!("{}x = {}.", a, c - b),
        ],
    )
}

/// Monic quadratic with two distinct integer roots
pub(crate) fn quadratic_roots<R: Rng + ?Sized>(slot: &Slot, roots: &IntRange, rng: &mut R) -> Problem {
    let r1 = roots.sample(rng);
    let mut r2 = roots.sample(rng);
    for _ in 0..16 {
        if r2 != r1 {
            break;
        }
        r2 = roots.sample(rng);
    }
    if r2 == r1 {
        r2 = r1 + 1;
    }
    let (low, high) = (r1.min(r2), r1.max(r2));

    let quadratic = Polynomial::new(vec![low * high, -(low + high), 1]);
    let problem = slot
        .problem(
            ProblemType::Algebra,
            Answer::Text(format!("x = {}, x = {}", low, high)),
        )
        .with_question(format!("Solve: {} = 0", quadratic))
        .with_operands(vec![1, -(low + high), low * high]);

    hints::attach(
        problem,
        "Factor the left side into two brackets.",
        [
            format!("Find two numbers that multiply to {}.", low * high),
            format!("The same two numbers must add to {}.", -(low + high)),
            format!("One of the solutions is x = {}.", low),
        ],
    )
}

pub(crate) fn function_evaluation<R: Rng + ?Sized>(
    slot: &Slot,
    degree: usize,
    coefficient: &IntRange,
    input: &IntRange,
    rng: &mut R,
) -> Problem {
    let f = random_polynomial(degree, coefficient, rng);
    let x = input.sample(rng);
    let value = f.eval(x);

    let problem = slot
        .problem(ProblemType::Functions, Answer::Number(value))
        .with_question(format!("f(x) = {}. Find f({}).", f, x))
        .with_operands(vec![x]);

    hints::attach(
        problem,
        "Replace every x with the input value.",
        [
            format!("Write ({}) wherever you see x.", x),
            "Work out the powers first, then multiply, then add.".to_string(),
            format!("The leading term alone gives {}.", f.coefficients()[degree] * x.pow(degree as u32)),
        ],
    )
}

pub(crate) fn exponent<R: Rng + ?Sized>(
    slot: &Slot,
    base: &IntRange,
    exponent: &IntRange,
    rng: &mut R,
) -> Result<Problem, GenerationError> {
    let b = base.sample(rng);
    let e = exponent.sample(rng).max(0);
    let value = u32::try_from(e)
        .ok()
        .and_then(|e| b.checked_pow(e))
        .ok_or_else(|| slot.invalid("exponent", format!("{}^{} does not fit in an integer", b, e)))?;

    let problem = slot
        .problem(ProblemType::Exponents, Answer::Number(value))
        .with_question(format!("Evaluate {}^{}", b, e))
        .with_operands(vec![b, e]);

    Ok(hints::attach(
        problem,
        "The exponent counts how many times the base is multiplied.",
        [
            if e == 0 {
                "Any non-zero number to the power 0 is 1.".to_string()
            } else {
                format!("Write {} down {} times.", b, e)
            },
            "Multiply them together one at a time.".to_string(),
            format!("{}^{} = {}.", b, (e - 1).max(0), b.pow((e - 1).max(0) as u32)),
        ],
    ))
}

pub(crate) fn logarithm<R: Rng + ?Sized>(
    slot: &Slot,
    base: &IntRange,
    exponent: &IntRange,
    rng: &mut R,
) -> Result<Problem, GenerationError> {
    let b = base.sample(rng);
    let e = exponent.sample(rng).max(0);
    let value = u32::try_from(e)
        .ok()
        .and_then(|e| b.checked_pow(e))
        .ok_or_else(|| slot.invalid("logarithm", format!("{}^{} does not fit in an integer", b, e)))?;

    let problem = slot
        .problem(ProblemType::Logarithms, Answer::Number(e))
        .with_question(format!("Evaluate log_{}({})", b, value))
        .with_operands(vec![b, value]);

    Ok(hints::attach(
        problem,
        format!("log_{}(n) asks: {} to which power gives n?", b, b),
        [
            format!("List the powers of {}.", b),
            format!("Stop when you reach {}.", value),
            format!("{}^{} = {}.", b, e, value),
        ],
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::level::Level;
    use crate::curriculum::WorksheetRange;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn range(problem_type: ProblemType) -> WorksheetRange {
        WorksheetRange {
            start: 1,
            end: 200,
            problem_type,
            description: String::new(),
            expected_skills: vec!["skill".to_string()],
            generator: None,
        }
    }

    #[test]
    fn test_linear_side_formatting() {
        assert_eq!(linear_side(3, 5), "3x + 5");
        assert_eq!(linear_side(1, -4), "x - 4");
        assert_eq!(linear_side(-1, 0), "-x");
    }

    #[test]
    fn test_linear_solution_satisfies_equation() {
        let r = range(ProblemType::Algebra);
        let slot = Slot { level: Level::H, worksheet: 5, range: &r };
        let mut rng = StdRng::seed_from_u64(31);
        for _ in 0..100 {
            let p = linear_equation(&slot, &IntRange::new(2, 12), &IntRange::new(-30, 30), &IntRange::new(-12, 12), &mut rng);
            let Answer::Number(x) = p.correct_answer else {
                panic!("expected number");
            };
            let (a, b, c) = (p.operands[0], p.operands[1], p.operands[2]);
            assert_eq!(a * x + b, c);
        }
    }

    #[test]
    fn test_quadratic_roots_are_distinct_and_sorted() {
        let r = range(ProblemType::Algebra);
        let slot = Slot { level: Level::I, worksheet: 5, range: &r };
        let mut rng = StdRng::seed_from_u64(32);
        let p = quadratic_roots(&slot, &IntRange::new(2, 3), &mut rng);
        assert_eq!(p.question.as_deref(), Some("Solve: x^2 - 5x + 6 = 0"));
        assert_eq!(p.correct_answer, Answer::Text("x = 2, x = 3".to_string()));
    }

    #[test]
    fn test_logarithm_inverts_power() {
        let r = range(ProblemType::Logarithms);
        let slot = Slot { level: Level::K, worksheet: 150, range: &r };
        let mut rng = StdRng::seed_from_u64(33);
        let p = logarithm(&slot, &IntRange::fixed(2), &IntRange::fixed(3), &mut rng).unwrap();
        assert_eq!(p.question.as_deref(), Some("Evaluate log_2(8)"));
        assert_eq!(p.correct_answer, Answer::Number(3));
    }

    #[test]
    fn test_exponent_overflow_is_an_error() {
        let r = range(ProblemType::Exponents);
        let slot = Slot { level: Level::K, worksheet: 1, range: &r };
        let mut rng = StdRng::seed_from_u64(34);
        let err = exponent(&slot, &IntRange::fixed(10), &IntRange::fixed(40), &mut rng).unwrap_err();
        assert!(matches!(err, GenerationError::InvalidConstraint { kind: "exponent", .. }));
    }
}
