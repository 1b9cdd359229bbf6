//! Elective archetypes: vectors, matrices, probability, statistics

use rand::Rng;

use super::{hints, Slot};
use crate::core::math::Fraction;
use crate::core::random::{pick, IntRange};
use crate::entities::problem::{Answer, DisplayFormat, Problem, ProblemType};

fn tuple(values: &[i64]) -> String {
    let parts: Vec<String> = values.iter().map(|v| v.to_string()).collect();
    format!("({})", parts.join(", "))
}

pub(crate) fn vector_dot<R: Rng + ?Sized>(
    slot: &Slot,
    dimension: usize,
    component: &IntRange,
    rng: &mut R,
) -> Problem {
    let u: Vec<i64> = (0..dimension).map(|_| component.sample(rng)).collect();
    let v: Vec<i64> = (0..dimension).map(|_| component.sample(rng)).collect();
    let dot: i64 = u.iter().zip(&v).map(|(a, b)| a * b).sum();

    let problem = slot
        .problem(ProblemType::Vector, Answer::Number(dot))
        .with_question(format!("Find the dot product of {} and {}", tuple(&u), tuple(&v)))
        .with_operands(u.iter().chain(&v).copied().collect());

    hints::attach(
        problem,
        "Multiply matching components, then add.",
        [
            format!("Pair the components: {} with {}.", u[0], v[0]),
            "Multiply each pair.".to_string(),
            format!("The first product is {}.", u[0] * v[0]),
        ],
    )
}

fn determinant(m: &[Vec<i64>]) -> i64 {
    match m.len() {
        2 => m[0][0] * m[1][1] - m[0][1] * m[1][0],
        3 => {
            m[0][0] * (m[1][1] * m[2][2] - m[1][2] * m[2][1])
                - m[0][1] * (m[1][0] * m[2][2] - m[1][2] * m[2][0])
                + m[0][2] * (m[1][0] * m[2][1] - m[1][1] * m[2][0])
        }
        _ => 0,
    }
}

/// Square matrix laid out row by row (vertical display)
pub(crate) fn matrix_determinant<R: Rng + ?Sized>(
    slot: &Slot,
    size: usize,
    entry: &IntRange,
    rng: &mut R,
) -> Problem {
    let rows: Vec<Vec<i64>> = (0..size)
        .map(|_| (0..size).map(|_| entry.sample(rng)).collect())
        .collect();
    let det = determinant(&rows);

    let rendered: Vec<String> = rows
        .iter()
        .map(|row| {
            let cells: Vec<String> = row.iter().map(|c| c.to_string()).collect();
            format!("[{}]", cells.join(", "))
        })
        .collect();

    let problem = slot
        .problem(ProblemType::Matrix, Answer::Number(det))
        .with_question(format!("Find the determinant of [{}]", rendered.join(", ")))
        .with_operands(rows.iter().flatten().copied().collect())
        .with_display_format(DisplayFormat::Vertical);

    let method = if size == 2 {
        "Multiply the main diagonal, then subtract the other diagonal.".to_string()
    } else {
        "Expand along the first row using 2 by 2 minors.".to_string()
    };
    hints::attach(
        problem,
        "Use the cross-multiplication pattern for determinants.",
        [
            "Identify the main diagonal from top left.".to_string(),
            method,
            format!("The top-left entry is {}; start from it.", rows[0][0]),
        ],
    )
}

const COLORS: &[&str] = &["red", "blue", "green", "yellow", "purple"];

/// One draw from a bag of marbles; the answer is a reduced fraction
pub(crate) fn probability<R: Rng + ?Sized>(slot: &Slot, outcomes: &IntRange, rng: &mut R) -> Problem {
    let total = outcomes.sample(rng).max(2);
    let favorable = rng.random_range(1..total);
    let other = total - favorable;

    let color = pick(rng, COLORS);
    let rest = COLORS
        .iter()
        .copied()
        .find(|c| *c != color)
        .unwrap_or("white");
    let chance = Fraction::new(favorable, total).reduced();

    let problem = slot
        .problem(ProblemType::Probability, Answer::Fraction(chance))
        .with_question(format!(
            "A bag holds {} {} marbles and {} {} marbles. One marble is drawn at random. What is the probability that it is {}?",
            favorable, color, other, rest, color
        ))
        .with_operands(vec![favorable, total]);

    hints::attach(
        problem,
        "Probability is favorable outcomes over all outcomes.",
        [
            format!("How many {} marbles are there?", color),
            format!("How many marbles are there altogether? ({} + {})", favorable, other),
            format!("Write {}/{} in lowest terms.", favorable, total),
        ],
    )
}

/// Data set adjusted so the mean is a whole number
pub(crate) fn mean<R: Rng + ?Sized>(slot: &Slot, count: &IntRange, value: &IntRange, rng: &mut R) -> Problem {
    let n = count.sample(rng).max(2);
    let mut values: Vec<i64> = (0..n).map(|_| value.sample(rng)).collect();
    let remainder = values.iter().sum::<i64>().rem_euclid(n);
    if remainder != 0 {
        if let Some(last) = values.last_mut() {
            if *last - remainder >= value.min {
                *last -= remainder;
            } else {
                *last += n - remainder;
            }
        }
    }
    let sum: i64 = values.iter().sum();

    let listed: Vec<String> = values.iter().map(|v| v.to_string()).collect();
    let problem = slot
        .problem(ProblemType::Statistics, Answer::Number(sum / n))
        .with_question(format!("Find the mean of {}", listed.join(", ")))
        .with_operands(values);

    hints::attach(
        problem,
        "The mean is the total shared equally.",
        [
            "Add all the values.".to_string(),
            format!("Divide the total by how many values there are ({}).", n),
            format!("The total is {}.", sum),
        ],
    )
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
    fn test_determinants() {
        assert_eq!(determinant(&[vec![1, 2], vec![3, 4]]), -2);
        assert_eq!(
            determinant(&[vec![2, 0, 1], vec![1, 3, 2], vec![1, 1, 1]]),
            2 * (3 - 2) - 0 + (1 - 3)
        );
    }

    #[test]
    fn test_matrix_problem_is_vertical_with_entries() {
        let r = range(ProblemType::Matrix);
        let slot = Slot { level: Level::XM, worksheet: 150, range: &r };
        let mut rng = StdRng::seed_from_u64(51);
        let p = matrix_determinant(&slot, 3, &IntRange::new(-5, 5), &mut rng);
        assert_eq!(p.operands.len(), 9);
        assert_eq!(p.display_format, DisplayFormat::Vertical);
    }

    #[test]
    fn test_mean_is_whole() {
        let r = range(ProblemType::Statistics);
        let slot = Slot { level: Level::XS, worksheet: 10, range: &r };
        let mut rng = StdRng::seed_from_u64(52);
        for _ in 0..200 {
            let p = mean(&slot, &IntRange::new(3, 5), &IntRange::new(1, 20), &mut rng);
            let n = p.operands.len() as i64;
            let sum: i64 = p.operands.iter().sum();
            assert_eq!(sum % n, 0);
            assert_eq!(p.correct_answer, Answer::Number(sum / n));
        }
    }

    #[test]
    fn test_probability_reduced() {
        let r = range(ProblemType::Probability);
        let slot = Slot { level: Level::XP, worksheet: 10, range: &r };
        let mut rng = StdRng::seed_from_u64(53);
        for _ in 0..100 {
            let p = probability(&slot, &IntRange::new(2, 12), &mut rng);
            let Answer::Fraction(f) = p.correct_answer else {
                panic!("expected fraction");
            };
            assert!(f.is_reduced());
            assert!(f.equivalent(&Fraction::new(p.operands[0], p.operands[1])));
        }
    }
}
