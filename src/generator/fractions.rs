//! Fraction archetypes. Every result is reduced by GCD.

use rand::Rng;

use super::{hints, GenerationError, Slot};
use crate::core::math::{gcd, lcm, Fraction};
use crate::core::random::IntRange;
use crate::curriculum::FractionOp;
use crate::entities::problem::{Answer, Problem, ProblemType};

/// Proper fraction with the given denominator
fn proper<R: Rng + ?Sized>(denominator: i64, rng: &mut R) -> Fraction {
    let numerator = if denominator > 2 {
        rng.random_range(1..denominator)
    } else {
        1
    };
    Fraction::new(numerator, denominator)
}

/// Two distinct denominators when the range allows it
fn denominators<R: Rng + ?Sized>(range: &IntRange, same: bool, rng: &mut R) -> (i64, i64) {
    let first = range.sample(rng);
    if same {
        return (first, first);
    }
    for _ in 0..16 {
        let second = range.sample(rng);
        if second != first {
            return (first, second);
        }
    }
    (first, first)
}

pub(crate) fn fraction<R: Rng + ?Sized>(
    slot: &Slot,
    op: FractionOp,
    denominator: &IntRange,
    same_denominator: bool,
    rng: &mut R,
) -> Result<Problem, GenerationError> {
    let (d1, d2) = denominators(denominator, same_denominator, rng);
    let mut left = proper(d1, rng);
    let mut right = proper(d2, rng);

    if op == FractionOp::Subtract {
        // Minuend must not be smaller than the subtrahend; prefer a non-zero difference
        for _ in 0..8 {
            if !left.equivalent(&right) {
                break;
            }
            right = proper(d2, rng);
        }
        if left.cmp_value(&right) == Some(std::cmp::Ordering::Less) {
            std::mem::swap(&mut left, &mut right);
        }
    }

    let result = match op {
        FractionOp::Add => left.add(&right),
        FractionOp::Subtract => left.sub(&right),
        FractionOp::Multiply => left.mul(&right),
        FractionOp::Divide => left
            .checked_div(&right)
            .ok_or_else(|| slot.invalid("fraction", "divisor fraction is zero"))?,
        FractionOp::Reduce => return Ok(reduce(slot, denominator, rng)),
    };

    let problem = slot
        .problem(ProblemType::Fraction, Answer::Fraction(result))
        .with_question(format!("{} {} {} =", left, op.symbol(), right))
        .with_operands(vec![
            left.numerator,
            left.denominator,
            right.numerator,
            right.denominator,
        ]);

    let common = lcm(left.denominator, right.denominator);
    let steps = match op {
        FractionOp::Add | FractionOp::Subtract if left.denominator == right.denominator => [
            "The denominators already match.".to_string(),
            format!(
                "Work with the numerators only: {} {} {}.",
                left.numerator,
                op.symbol(),
                right.numerator
            ),
            "Keep the denominator, then simplify.".to_string(),
        ],
        FractionOp::Add | FractionOp::Subtract => [
            "Find a common denominator first.".to_string(),
            format!("Rewrite both fractions over {}.", common),
            format!("Combine the numerators over {}, then simplify.", common),
        ],
        FractionOp::Multiply => [
            "Multiply straight across.".to_string(),
            "Numerator times numerator, denominator times denominator.".to_string(),
            format!(
                "{} × {} over {} × {}, then simplify.",
                left.numerator, right.numerator, left.denominator, right.denominator
            ),
        ],
        FractionOp::Divide | FractionOp::Reduce => [
            "Dividing by a fraction is multiplying by its reciprocal.".to_string(),
            format!("Flip {} to {}/{}.", right, right.denominator, right.numerator),
            format!("Multiply {} by {}/{}, then simplify.", left, right.denominator, right.numerator),
        ],
    };

    Ok(hints::attach(problem, "Always give the answer in lowest terms.", steps))
}

/// "Simplify 6/8" with a numerator that shares a factor with the denominator
fn reduce<R: Rng + ?Sized>(slot: &Slot, denominator: &IntRange, rng: &mut R) -> Problem {
    let mut original = Fraction::new(2, 4);
    for _ in 0..32 {
        let d = denominator.sample(rng);
        let candidates: Vec<i64> = (2..d).filter(|n| gcd(*n, d) > 1).collect();
        if candidates.is_empty() {
            continue;
        }
        let n = candidates[rng.random_range(0..candidates.len())];
        original = Fraction::new(n, d);
        break;
    }

    let reduced = original.reduced();
    let factor = gcd(original.numerator, original.denominator);
    let problem = slot
        .problem(ProblemType::Fraction, Answer::Fraction(reduced))
        .with_question(format!("Simplify {}", original))
        .with_operands(vec![original.numerator, original.denominator]);

    hints::attach(
        problem,
        "Divide the top and bottom by the same number.",
        [
            format!("Which numbers divide both {} and {}?", original.numerator, original.denominator),
            "Use the largest number that divides both.".to_string(),
            format!("Both are divisible by {}.", factor),
        ],
    )
}
