//! The four basic operations and signed-number arithmetic

use rand::Rng;

use super::{hints, Slot};
use crate::core::random::IntRange;
use crate::curriculum::SignedOp;
use crate::entities::problem::{Answer, DisplayFormat, Problem, ProblemType, BLANK_MARKER};

fn layout(vertical: bool) -> DisplayFormat {
    if vertical {
        DisplayFormat::Vertical
    } else {
        DisplayFormat::Horizontal
    }
}

fn binary(slot: &Slot, problem_type: ProblemType, a: i64, b: i64, answer: Answer, vertical: bool) -> Problem {
    let symbol = problem_type.symbol().unwrap_or("?");
    slot.problem(problem_type, answer)
        .with_question(format!("{} {} {} =", a, symbol, b))
        .with_operands(vec![a, b])
        .with_display_format(layout(vertical))
}

pub(crate) fn addition<R: Rng + ?Sized>(
    slot: &Slot,
    left: &IntRange,
    right: &IntRange,
    vertical: bool,
    rng: &mut R,
) -> Problem {
    let a = left.sample(rng);
    let b = right.sample(rng);
    let problem = binary(slot, ProblemType::Addition, a, b, Answer::Number(a + b), vertical);

    let method = if vertical {
        "Add the ones column first, then carry into the tens.".to_string()
    } else {
        format!("Start at {} and count on {}.", a, b)
    };
    hints::attach(
        problem,
        "Put the two amounts together.",
        [
            "Which number is bigger? Start from it.".to_string(),
            method,
            format!("The sum is a little more than {}.", a.max(b)),
        ],
    )
}

/// `a + ___ = total`; the missing addend is always at least 1
pub(crate) fn missing_addend<R: Rng + ?Sized>(
    slot: &Slot,
    left: &IntRange,
    total: &IntRange,
    rng: &mut R,
) -> Problem {
    let a = left.sample(rng);
    let mut sum = total.sample(rng);
    if sum <= a {
        sum = a + 1;
    }
    let missing = sum - a;

    let problem = slot
        .problem(ProblemType::Addition, Answer::Number(missing))
        .with_question(format!("{} + {} = {}", a, BLANK_MARKER, sum))
        .with_operands(vec![a, sum]);

    hints::attach(
        problem,
        "Find the number that makes the total.",
        [
            format!("You have {} and need {}.", a, sum),
            format!("Count up from {} to {}.", a, sum),
            format!("Try {} - {}.", sum, a),
        ],
    )
}

/// Operands are swapped when needed so the difference is never negative
pub(crate) fn subtraction<R: Rng + ?Sized>(
    slot: &Slot,
    minuend: &IntRange,
    subtrahend: &IntRange,
    vertical: bool,
    rng: &mut R,
) -> Problem {
    let mut a = minuend.sample(rng);
    let mut b = subtrahend.sample(rng);
    if a < b {
        std::mem::swap(&mut a, &mut b);
    }
    let problem = binary(slot, ProblemType::Subtraction, a, b, Answer::Number(a - b), vertical);

    let method = if vertical {
        "Subtract the ones column first. Borrow from the tens if the top digit is smaller.".to_string()
    } else {
        format!("Start at {} and count back {}.", a, b)
    };
    hints::attach(
        problem,
        "Take the second amount away from the first.",
        [
            format!("How many are left when {} are taken away?", b),
            method,
            format!("Check: your answer + {} should make {}.", b, a),
        ],
    )
}

pub(crate) fn multiplication<R: Rng + ?Sized>(
    slot: &Slot,
    left: &IntRange,
    right: &IntRange,
    vertical: bool,
    rng: &mut R,
) -> Problem {
    let a = left.sample(rng);
    let b = right.sample(rng);
    let problem = binary(slot, ProblemType::Multiplication, a, b, Answer::Number(a * b), vertical);

    hints::attach(
        problem,
        format!("Multiplying by {} means adding {} groups of {}.", b, b, a),
        [
            format!("Say the {} times table.", a.min(b)),
            if vertical {
                "Multiply each digit of the top number, right to left, and carry.".to_string()
            } else {
                format!("Add {} to itself {} times.", a, b)
            },
            format!("{} × {} is {} more than {} × {}.", a, b, a, a, b - 1),
        ],
    )
}

/// Dividend is built as `divisor × quotient`, plus a non-zero remainder
/// smaller than the divisor when the bucket asks for one.
pub(crate) fn division<R: Rng + ?Sized>(
    slot: &Slot,
    divisor: &IntRange,
    quotient: &IntRange,
    remainder: bool,
    rng: &mut R,
) -> Problem {
    let d = divisor.sample(rng).max(1);
    let q = quotient.sample(rng);
    let r = if remainder && d > 1 {
        rng.random_range(1..d)
    } else {
        0
    };
    let dividend = d * q + r;
    let answer = if r == 0 {
        Answer::Number(q)
    } else {
        Answer::Text(format!("{} R {}", q, r))
    };
    let problem = binary(slot, ProblemType::Division, dividend, d, answer, false);

    hints::attach(
        problem,
        format!("How many groups of {} fit into {}?", d, dividend),
        [
            format!("Use the {} times table.", d),
            format!("Find the biggest number that times {} is not more than {}.", d, dividend),
            if r == 0 {
                format!("{} × {} = {}.", d, q, d * q)
            } else {
                format!("{} × {} = {}, and {} is left over.", d, q, d * q, r)
            },
        ],
    )
}

fn signed(n: i64) -> String {
    if n < 0 {
        format!("({})", n)
    } else {
        n.to_string()
    }
}

/// `(-5) + 3 =` style signed arithmetic
pub(crate) fn integers<R: Rng + ?Sized>(slot: &Slot, op: SignedOp, range: &IntRange, rng: &mut R) -> Problem {
    let a = range.sample(rng);
    let b = range.sample_nonzero(rng);
    let (symbol, value) = match op {
        SignedOp::Add => ("+", a + b),
        SignedOp::Subtract => ("-", a - b),
    };
    let problem = slot
        .problem(ProblemType::Integers, Answer::Number(value))
        .with_question(format!("{} {} {} =", signed(a), symbol, signed(b)))
        .with_operands(vec![a, b]);

    hints::attach(
        problem,
        "Picture a number line with zero in the middle.",
        [
            format!("Start at {} on the number line.", a),
            match op {
                SignedOp::Add => "Adding a negative number moves left; adding a positive moves right.".to_string(),
                SignedOp::Subtract => "Subtracting a number is the same as adding its opposite.".to_string(),
            },
            match op {
                SignedOp::Add => format!("Move {} steps from {}.", b.abs(), a),
                SignedOp::Subtract => format!("Work out {} + {}.", signed(a), signed(-b)),
            },
        ],
    )
}
