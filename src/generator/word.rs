//! Word problems: a random vocabulary bound into Tera templates

use rand::Rng;
use tera::{Context, Tera};

use super::{hints, GenerationError, Slot};
use crate::core::random::{pick, IntRange};
use crate::curriculum::WordOperation;
use crate::entities::problem::{Answer, Problem};

const NAMES: &[&str] = &["Maya", "Leo", "Aiko", "Sam", "Priya", "Diego", "Nora", "Kofi"];
const OBJECTS: &[&str] = &["apples", "stickers", "marbles", "pencils", "cookies", "shells", "stamps"];
const PLACES: &[&str] = &["basket", "box", "jar", "bag"];

const ADDITION: &[&str] = &[
    "{{name}} has {{num1}} {{object}}. {{friend}} gives {{name}} {{num2}} more {{object}}. How many {{object}} does {{name}} have now?",
    "There are {{num1}} {{object}} in a {{place}} and {{num2}} {{object}} on the table. How many {{object}} are there in all?",
];

const SUBTRACTION: &[&str] = &[
    "{{name}} has {{num1}} {{object}} and gives {{num2}} of them to {{friend}}. How many {{object}} does {{name}} have left?",
    "A {{place}} holds {{num1}} {{object}}. {{name}} takes out {{num2}}. How many {{object}} are still in the {{place}}?",
];

const MULTIPLICATION: &[&str] = &[
    "{{name}} fills {{num1}} bags with {{num2}} {{object}} each. How many {{object}} is that altogether?",
    "There are {{num1}} rows of {{object}} with {{num2}} in each row. How many {{object}} are there?",
];

const DIVISION: &[&str] = &[
    "{{name}} shares {{num1}} {{object}} equally among {{num2}} friends. How many {{object}} does each friend get?",
    "{{num1}} {{object}} are packed into groups of {{num2}}. How many groups are there?",
];

/// Render a template, failing on any placeholder the context does not supply
pub fn render_template(template: &str, context: &Context) -> Result<String, GenerationError> {
    Tera::one_off(template, context, false).map_err(|e| {
        let mut message = e.to_string();
        let mut source = std::error::Error::source(&e);
        while let Some(inner) = source {
            message.push_str(": ");
            message.push_str(&inner.to_string());
            source = inner.source();
        }
        GenerationError::Template(message)
    })
}

pub(crate) fn word_problem<R: Rng + ?Sized>(
    slot: &Slot,
    operation: WordOperation,
    left: &IntRange,
    right: &IntRange,
    rng: &mut R,
) -> Result<Problem, GenerationError> {
    let mut a = left.sample(rng);
    let mut b = right.sample(rng);
    let (num1, num2, answer, templates) = match operation {
        WordOperation::Addition => (a, b, a + b, ADDITION),
        WordOperation::Subtraction => {
            if a < b {
                std::mem::swap(&mut a, &mut b);
            }
            (a, b, a - b, SUBTRACTION)
        }
        WordOperation::Multiplication => (a, b, a * b, MULTIPLICATION),
        WordOperation::Division => {
            let divisor = b.max(1);
            (a * divisor, divisor, a, DIVISION)
        }
    };

    let name = pick(rng, NAMES);
    let friend = NAMES
        .iter()
        .copied()
        .filter(|n| *n != name)
        .nth(rng.random_range(0..NAMES.len() - 1))
        .unwrap_or("a friend");

    let mut context = Context::new();
    context.insert("name", name);
    context.insert("friend", friend);
    context.insert("object", pick(rng, OBJECTS));
    context.insert("place", pick(rng, PLACES));
    context.insert("num1", &num1);
    context.insert("num2", &num2);

    let question = render_template(pick(rng, templates), &context)?;
    let problem_type = operation.problem_type();
    let symbol = problem_type.symbol().unwrap_or("?");

    let problem = slot
        .problem(problem_type, Answer::Number(answer))
        .with_question(question)
        .with_operands(vec![num1, num2]);

    Ok(hints::attach(
        problem,
        "Read the story twice and find the two numbers.",
        [
            "Decide whether the amount grows, shrinks, repeats or is shared.".to_string(),
            format!("Write it as a number sentence: {} {} {}.", num1, symbol, num2),
            format!("Work out {} {} {}.", num1, symbol, num2),
        ],
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::level::Level;
    use crate::curriculum::WorksheetRange;
    use crate::entities::problem::ProblemType;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_undefined_placeholder_fails() {
        let mut context = Context::new();
        context.insert("name", "Maya");
        let err = render_template("{{name}} has {{num1}} apples", &context).unwrap_err();
        match err {
            GenerationError::Template(message) => assert!(message.contains("num1")),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_all_templates_render_fully() {
        let mut context = Context::new();
        for (key, value) in [("name", "Maya"), ("friend", "Leo"), ("object", "shells"), ("place", "jar")] {
            context.insert(key, value);
        }
        context.insert("num1", &12);
        context.insert("num2", &3);
        for template in ADDITION.iter().chain(SUBTRACTION).chain(MULTIPLICATION).chain(DIVISION) {
            let text = render_template(template, &context).unwrap();
            assert!(!text.contains("{{"), "{text}");
            assert!(text.contains("12"));
        }
    }

    #[test]
    fn test_division_story_is_exact() {
        let r = WorksheetRange {
            start: 191,
            end: 200,
            problem_type: ProblemType::Division,
            description: String::new(),
            expected_skills: vec!["word_problem_division".to_string()],
            generator: None,
        };
        let slot = Slot { level: Level::D, worksheet: 195, range: &r };
        let mut rng = StdRng::seed_from_u64(61);
        for _ in 0..50 {
            let p = word_problem(&slot, WordOperation::Division, &IntRange::new(2, 10), &IntRange::new(2, 10), &mut rng)
                .unwrap();
            assert_eq!(p.problem_type, ProblemType::Division);
            assert_eq!(p.operands[0] % p.operands[1], 0);
            assert_eq!(p.correct_answer, Answer::Number(p.operands[0] / p.operands[1]));
        }
    }
}
