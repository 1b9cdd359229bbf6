//! Limits, derivatives and definite integrals of integer polynomials

use rand::Rng;

use super::algebra::random_polynomial;
use super::{hints, Slot};
use crate::core::random::IntRange;
use crate::entities::problem::{Answer, Problem, ProblemType};

/// Polynomials are continuous, so the limit is the value at the point
pub(crate) fn limit<R: Rng + ?Sized>(
    slot: &Slot,
    degree: usize,
    coefficient: &IntRange,
    point: &IntRange,
    rng: &mut R,
) -> Problem {
    let f = random_polynomial(degree, coefficient, rng);
    let a = point.sample(rng);

    let problem = slot
        .problem(ProblemType::Calculus, Answer::Number(f.eval(a)))
        .with_question(format!("Find the limit as x → {} of {}", a, f))
        .with_operands(vec![a]);

    hints::attach(
        problem,
        "A polynomial has no gaps or jumps.",
        [
            "Check whether direct substitution works.".to_string(),
            format!("Substitute x = {}.", a),
            format!("Evaluate {} at x = {}.", f, a),
        ],
    )
}

pub(crate) fn derivative<R: Rng + ?Sized>(
    slot: &Slot,
    degree: usize,
    coefficient: &IntRange,
    rng: &mut R,
) -> Problem {
    let f = random_polynomial(degree, coefficient, rng);
    let df = f.derivative();
    let leading = f.coefficients()[f.degree()];

    let problem = slot
        .problem(ProblemType::Calculus, Answer::Text(df.to_string()))
        .with_question(format!("Find the derivative of {}", f))
        .with_operands(f.coefficients().to_vec());

    hints::attach(
        problem,
        "Differentiate term by term with the power rule.",
        [
            "The derivative of a constant is 0.".to_string(),
            "Bring the power down in front and lower it by one.".to_string(),
            format!(
                "The leading term becomes {}x^{}.",
                leading * f.degree() as i64,
                f.degree().saturating_sub(1)
            ),
        ],
    )
}

/// Exact value of the integral between two distinct integer bounds
pub(crate) fn definite_integral<R: Rng + ?Sized>(
    slot: &Slot,
    degree: usize,
    coefficient: &IntRange,
    bounds: &IntRange,
    rng: &mut R,
) -> Problem {
    let f = random_polynomial(degree, coefficient, rng);
    let first = bounds.sample(rng);
    let mut second = bounds.sample(rng);
    for _ in 0..16 {
        if second != first {
            break;
        }
        second = bounds.sample(rng);
    }
    if second == first {
        second = first + 1;
    }
    let (a, b) = (first.min(second), first.max(second));

    let value = f.integrate(a, b).reduced();
    let answer = if value.is_whole() {
        Answer::Number(value.numerator)
    } else {
        Answer::Fraction(value)
    };

    let problem = slot
        .problem(ProblemType::Calculus, answer)
        .with_question(format!("Evaluate the integral of {} from {} to {}", f, a, b))
        .with_operands(vec![a, b]);

    hints::attach(
        problem,
        "Find an antiderivative, then subtract its values at the bounds.",
        [
            "Raise each power by one and divide by the new power.".to_string(),
            format!("Evaluate the antiderivative at {} and at {}.", b, a),
            "Subtract the lower value from the upper value and simplify.".to_string(),
        ],
    )
}
