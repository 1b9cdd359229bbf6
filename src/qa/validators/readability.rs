use super::{Validator, ValidatorError};
use crate::core::level::ReadingCategory;
use crate::curriculum::CurriculumSpec;
use crate::entities::problem::Problem;
use crate::qa::issue::{Issue, IssueType};

/// Terms and the earliest reading category they may appear in
const VOCABULARY: &[(&str, ReadingCategory)] = &[
    ("numerator", ReadingCategory::ElementaryAdvanced),
    ("denominator", ReadingCategory::ElementaryAdvanced),
    ("remainder", ReadingCategory::ElementaryAdvanced),
    ("equation", ReadingCategory::MiddleSchool),
    ("variable", ReadingCategory::MiddleSchool),
    ("exponent", ReadingCategory::MiddleSchool),
    ("probability", ReadingCategory::MiddleSchool),
    ("quadratic", ReadingCategory::MiddleSchool),
    ("polynomial", ReadingCategory::MiddleSchool),
    ("function", ReadingCategory::MiddleSchool),
    ("logarithm", ReadingCategory::HighSchool),
    ("determinant", ReadingCategory::HighSchool),
    ("matrix", ReadingCategory::HighSchool),
    ("vector", ReadingCategory::HighSchool),
    ("derivative", ReadingCategory::Calculus),
    ("integral", ReadingCategory::Calculus),
    ("limit", ReadingCategory::Calculus),
];

const PRE_K_MAX_WORDS: usize = 12;
const PRE_K_MAX_AVERAGE_WORD_LENGTH: f64 = 6.0;

/// Flags vocabulary above the level's reading category and long pre-K questions
pub struct ReadabilityValidator;

fn words(text: &str) -> Vec<String> {
    text.split(|c: char| !c.is_alphabetic())
        .filter(|w| !w.is_empty())
        .map(str::to_lowercase)
        .collect()
}

impl Validator for ReadabilityValidator {
    fn name(&self) -> &'static str {
        "readability"
    }

    fn description(&self) -> &'static str {
        "Question wording suits the level's reading category"
    }

    fn validate(&self, problem: &Problem, _spec: &CurriculumSpec) -> Result<Vec<Issue>, ValidatorError> {
        let Some(question) = problem.question.as_deref() else {
            return Ok(Vec::new());
        };
        let category = problem.level.category();
        let mut issues = Vec::new();

        let found = words(question);
        for (term, required) in VOCABULARY {
            if *required <= category {
                continue;
            }
            let plural = format!("{}s", term);
            if found.iter().any(|w| w == term || *w == plural) {
                issues.push(
                    Issue::warning(
                        IssueType::Readability,
                        problem,
                        format!(
                            "'{}' is {} vocabulary but level {} reads at {}",
                            term, required, problem.level, category
                        ),
                    )
                    .with_validator(self.name()),
                );
            }
        }

        if category == ReadingCategory::PreK {
            let tokens: Vec<&str> = question.split_whitespace().collect();
            if !tokens.is_empty() {
                let letters: usize = tokens.iter().map(|t| t.chars().count()).sum();
                let average = letters as f64 / tokens.len() as f64;
                if tokens.len() > PRE_K_MAX_WORDS || average > PRE_K_MAX_AVERAGE_WORD_LENGTH {
                    issues.push(
                        Issue::info(
                            IssueType::Readability,
                            problem,
                            format!(
                                "Pre-K question has {} words averaging {:.1} characters",
                                tokens.len(),
                                average
                            ),
                        )
                        .with_validator(self.name()),
                    );
                }
            }
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

    fn problem(level: Level, question: &str) -> Problem {
        Problem::new(level, 1, ProblemType::Addition, "skill", Answer::Number(1)).with_question(question)
    }

    #[test]
    fn test_advanced_term_below_its_category() {
        let issues = ReadabilityValidator
            .validate(&problem(Level::B, "Find the derivative of 2x"), &spec())
            .unwrap();
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].severity, Severity::Warning);
        assert!(issues[0].description.contains("calculus"));
    }

    #[test]
    fn test_term_allowed_at_its_category() {
        let issues = ReadabilityValidator
            .validate(&problem(Level::M, "Find the derivative of 2x"), &spec())
            .unwrap();
        assert!(issues.is_empty());
        let issues = ReadabilityValidator
            .validate(&problem(Level::G, "Which fraction has the larger denominators?"), &spec())
            .unwrap();
        assert!(issues.is_empty());
    }

    #[test]
    fn test_substrings_do_not_count() {
        let issues = ReadabilityValidator
            .validate(&problem(Level::A, "Count the limitless stars"), &spec())
            .unwrap();
        assert!(issues.is_empty());
    }

    #[test]
    fn test_long_pre_k_question_is_info() {
        let issues = ReadabilityValidator
            .validate(
                &problem(Level::L6A, "Count every single one of the little round dots you can see in this picture"),
                &spec(),
            )
            .unwrap();
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].severity, Severity::Info);

        let issues = ReadabilityValidator
            .validate(&problem(Level::L6A, "How many dots?"), &spec())
            .unwrap();
        assert!(issues.is_empty());
    }
}
