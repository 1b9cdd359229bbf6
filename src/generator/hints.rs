//! Static and graduated hints attached to every generated problem

use crate::entities::problem::{GraduatedHint, Problem};

/// Attach one static hint and three graduated hints (nudge, method, near-answer)
pub(crate) fn attach(problem: Problem, hint: impl Into<String>, steps: [String; 3]) -> Problem {
    let graduated = steps
        .into_iter()
        .enumerate()
        .map(|(i, text)| GraduatedHint {
            level: i as u8 + 1,
            text,
        })
        .collect();
    problem
        .with_hints(vec![hint.into()])
        .with_graduated_hints(graduated)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::level::Level;
    use crate::entities::problem::{Answer, ProblemType};

    #[test]
    fn test_levels_are_numbered_from_one() {
        let p = Problem::new(Level::A, 1, ProblemType::Addition, "add_1", Answer::Number(2));
        let p = attach(
            p,
            "Count on",
            ["a".to_string(), "b".to_string(), "c".to_string()],
        );
        assert_eq!(p.hints, vec!["Count on".to_string()]);
        let levels: Vec<u8> = p.graduated_hints.iter().map(|h| h.level).collect();
        assert_eq!(levels, vec![1, 2, 3]);
    }
}
