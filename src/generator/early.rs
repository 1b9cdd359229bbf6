//! Pre-K archetypes: counting pictures and number order

use rand::Rng;

use super::{hints, Slot};
use crate::core::random::IntRange;
use crate::entities::problem::{Answer, Problem, ProblemType, BLANK_MARKER};

/// "How many dots?" with a `dots_<worksheet>_<count>` picture
pub(crate) fn count<R: Rng + ?Sized>(slot: &Slot, range: &IntRange, rng: &mut R) -> Problem {
    let n = range.sample(rng).max(1);
    let problem = slot
        .problem(ProblemType::Counting, Answer::Number(n))
        .with_question("How many dots?")
        .with_operands(vec![n])
        .with_visual_assets(vec![format!("dots_{}_{}", slot.worksheet, n)]);

    hints::attach(
        problem,
        "Touch each dot once as you count.",
        [
            "Start with the dot in the top row.".to_string(),
            "Say one number for every dot you touch.".to_string(),
            format!("The last number you say is between {} and {}.", n.saturating_sub(1).max(1), n + 1),
        ],
    )
}

/// "What comes next? 4, 5, 6, ___"
pub(crate) fn sequence<R: Rng + ?Sized>(
    slot: &Slot,
    start: &IntRange,
    step: &IntRange,
    length: usize,
    rng: &mut R,
) -> Problem {
    let first = start.sample(rng);
    let step = step.sample_nonzero(rng);
    let terms: Vec<i64> = (0..length as i64).map(|i| first + i * step).collect();
    let next = first + length as i64 * step;

    let shown: Vec<String> = terms.iter().map(|t| t.to_string()).collect();
    let question = format!("What comes next? {}, {}", shown.join(", "), BLANK_MARKER);

    let problem = slot
        .problem(ProblemType::Sequence, Answer::Number(next))
        .with_question(question)
        .with_operands(terms);

    let last = first + (length as i64 - 1) * step;
    hints::attach(
        problem,
        "Look at how each number changes.",
        [
            "Read the numbers out loud in order.".to_string(),
            format!("Each number is {} more than the one before.", step),
            format!("What is {} + {}?", last, step),
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

    fn range(problem_type: ProblemType, skill: &str) -> WorksheetRange {
        WorksheetRange {
            start: 1,
            end: 10,
            problem_type,
            description: String::new(),
            expected_skills: vec![skill.to_string()],
            generator: None,
        }
    }

    #[test]
    fn test_count_asset_encodes_answer() {
        let r = range(ProblemType::Counting, "counting_to_5");
        let slot = Slot {
            level: Level::L6A,
            worksheet: 1,
            range: &r,
        };
        let mut rng = StdRng::seed_from_u64(9);
        let p = count(&slot, &IntRange::fixed(5), &mut rng);
        assert_eq!(p.visual_assets, vec!["dots_1_5".to_string()]);
        assert_eq!(p.correct_answer, Answer::Number(5));
        assert_eq!(p.subtype, "counting_to_5");
    }

    #[test]
    fn test_sequence_question_and_answer() {
        let r = range(ProblemType::Sequence, "sequence_to_30");
        let slot = Slot {
            level: Level::L5A,
            worksheet: 120,
            range: &r,
        };
        let mut rng = StdRng::seed_from_u64(1);
        let p = sequence(&slot, &IntRange::fixed(4), &IntRange::fixed(1), 3, &mut rng);
        assert_eq!(p.question.as_deref(), Some("What comes next? 4, 5, 6, ___"));
        assert_eq!(p.correct_answer, Answer::Number(7));
        assert!(p.is_fill_in_blank());
    }
}
