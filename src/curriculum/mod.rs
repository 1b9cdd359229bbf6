//! Curriculum specification - the canonical worksheet layout per level
//!
//! One declarative table drives both sides of the pipeline: the generator
//! resolves a worksheet to its range and synthesizes from the range's
//! archetype, and the QA validators check generated problems against the
//! range's `type` and expected skills.

pub mod archetype;
pub mod diagnostics;
pub mod loader;

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::core::level::Level;
use crate::entities::problem::ProblemType;

pub use archetype::{Archetype, FractionOp, SignedOp, WordOperation};
pub use diagnostics::{CurriculumError, CurriculumSyntaxError};
pub use loader::{builtin, builtin_names, load_curriculum, parse_curriculum};

/// A contiguous block of worksheets sharing one archetype
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorksheetRange {
    pub start: u32,
    pub end: u32,
    #[serde(rename = "type")]
    pub problem_type: ProblemType,
    pub description: String,
    #[serde(rename = "skills", alias = "expected_skills")]
    pub expected_skills: Vec<String>,
    /// Absent in expectation-only curricula that cannot drive generation
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub generator: Option<Archetype>,
}

impl WorksheetRange {
    pub fn contains(&self, worksheet: u32) -> bool {
        worksheet >= self.start && worksheet <= self.end
    }

    pub fn len(&self) -> u32 {
        self.end.saturating_sub(self.start) + 1
    }

    pub fn is_empty(&self) -> bool {
        self.end < self.start
    }

    /// Skill stamped on generated problems as their subtype
    pub fn primary_skill(&self) -> &str {
        self.expected_skills
            .first()
            .map(String::as_str)
            .unwrap_or_else(|| self.problem_type.as_str())
    }

    /// True if `problem_type` is this range's type or names one of its skills
    pub fn matches_problem_type(&self, problem_type: &str) -> bool {
        let wanted = problem_type.trim().to_lowercase();
        if wanted.is_empty() {
            return false;
        }
        if wanted == self.problem_type.as_str() {
            return true;
        }
        self.expected_skills
            .iter()
            .any(|skill| skill.to_lowercase().contains(&wanted))
    }
}

impl fmt::Display for WorksheetRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{} ({})", self.start, self.end, self.problem_type)
    }
}

/// Worksheet layout of one level
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LevelSpec {
    pub level: Level,
    pub total_worksheets: u32,
    #[serde(default)]
    pub description: String,
    pub ranges: Vec<WorksheetRange>,
}

impl LevelSpec {
    /// Ordered range check, first match wins
    pub fn range_for(&self, worksheet: u32) -> Option<&WorksheetRange> {
        self.ranges.iter().find(|range| range.contains(worksheet))
    }
}

/// A complete curriculum
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurriculumSpec {
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub levels: Vec<LevelSpec>,
}

/// A structural defect found by [`CurriculumSpec::check`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CurriculumDefect {
    pub level: Level,
    pub message: String,
}

impl fmt::Display for CurriculumDefect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "level {}: {}", self.level, self.message)
    }
}

impl CurriculumSpec {
    pub fn level(&self, level: Level) -> Option<&LevelSpec> {
        self.levels.iter().find(|spec| spec.level == level)
    }

    /// Levels in curriculum order
    pub fn level_ids(&self) -> Vec<Level> {
        let mut ids: Vec<Level> = self.levels.iter().map(|spec| spec.level).collect();
        ids.sort();
        ids.dedup();
        ids
    }

    pub fn get_worksheet_range(&self, level: Level, worksheet: u32) -> Option<&WorksheetRange> {
        self.level(level)?.range_for(worksheet)
    }

    /// Expected skills for a worksheet, empty when unmapped
    pub fn get_expected_skills(&self, level: Level, worksheet: u32) -> &[String] {
        self.get_worksheet_range(level, worksheet)
            .map(|range| range.expected_skills.as_slice())
            .unwrap_or(&[])
    }

    /// True if `problem_type` equals the range type or matches an expected skill
    pub fn validate_problem_type(&self, level: Level, worksheet: u32, problem_type: &str) -> bool {
        self.get_worksheet_range(level, worksheet)
            .is_some_and(|range| range.matches_problem_type(problem_type))
    }

    /// One-time structural pass: every range non-empty, non-overlapping,
    /// contiguous over `1..=total_worksheets`, with skills, and with a
    /// generator consistent with its declared type.
    pub fn check(&self) -> Vec<CurriculumDefect> {
        let mut defects = Vec::new();
        let mut seen = Vec::new();

        for spec in &self.levels {
            let mut push = |message: String| {
                defects.push(CurriculumDefect {
                    level: spec.level,
                    message,
                })
            };

            if seen.contains(&spec.level) {
                push("level is declared more than once".to_string());
            }
            seen.push(spec.level);

            if spec.total_worksheets == 0 {
                push("total_worksheets must be positive".to_string());
            }
            if spec.ranges.is_empty() {
                push("level has no worksheet ranges".to_string());
                continue;
            }

            let mut sorted: Vec<&WorksheetRange> = spec.ranges.iter().collect();
            sorted.sort_by_key(|range| range.start);

            let mut next_expected = 1u32;
            for range in sorted {
                if range.is_empty() || range.start == 0 {
                    push(format!("range {}-{} is empty or starts at 0", range.start, range.end));
                    continue;
                }
                if range.start > next_expected {
                    push(format!(
                        "worksheets {}-{} are not covered by any range",
                        next_expected,
                        range.start - 1
                    ));
                } else if range.start < next_expected {
                    push(format!(
                        "range {}-{} overlaps worksheets before {}",
                        range.start, range.end, next_expected
                    ));
                }
                next_expected = next_expected.max(range.end.saturating_add(1));

                if range.expected_skills.is_empty() {
                    push(format!("range {}-{} lists no expected skills", range.start, range.end));
                }
                if let Some(generator) = &range.generator {
                    if generator.problem_type() != range.problem_type {
                        push(format!(
                            "range {}-{} is typed {} but its {} generator produces {}",
                            range.start,
                            range.end,
                            range.problem_type,
                            generator.kind(),
                            generator.problem_type()
                        ));
                    }
                    for problem in generator.constraint_problems() {
                        push(format!("range {}-{}: {}", range.start, range.end, problem));
                    }
                }
            }

            if spec.total_worksheets > 0 && next_expected <= spec.total_worksheets {
                push(format!(
                    "worksheets {}-{} are not covered by any range",
                    next_expected, spec.total_worksheets
                ));
            } else if next_expected > spec.total_worksheets.saturating_add(1) {
                push(format!(
                    "ranges extend past total_worksheets ({})",
                    spec.total_worksheets
                ));
            }
        }

        defects
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::random::IntRange;

    fn range(start: u32, end: u32, problem_type: ProblemType, skills: &[&str]) -> WorksheetRange {
        WorksheetRange {
            start,
            end,
            problem_type,
            description: String::new(),
            expected_skills: skills.iter().map(|s| s.to_string()).collect(),
            generator: None,
        }
    }

    fn spec(ranges: Vec<WorksheetRange>) -> CurriculumSpec {
        CurriculumSpec {
            name: "test".to_string(),
            description: String::new(),
            levels: vec![LevelSpec {
                level: Level::A,
                total_worksheets: 20,
                description: String::new(),
                ranges,
            }],
        }
    }

    #[test]
    fn test_lookup_first_match_wins() {
        let curriculum = spec(vec![
            range(1, 10, ProblemType::Addition, &["add_7"]),
            range(11, 20, ProblemType::Subtraction, &["subtraction_from_10"]),
        ]);
        assert_eq!(
            curriculum.get_worksheet_range(Level::A, 10).unwrap().problem_type,
            ProblemType::Addition
        );
        assert_eq!(
            curriculum.get_worksheet_range(Level::A, 11).unwrap().problem_type,
            ProblemType::Subtraction
        );
        assert!(curriculum.get_worksheet_range(Level::A, 21).is_none());
        assert!(curriculum.get_worksheet_range(Level::B, 1).is_none());
    }

    #[test]
    fn test_expected_skills_empty_when_unmapped() {
        let curriculum = spec(vec![range(1, 20, ProblemType::Addition, &["add_7"])]);
        assert_eq!(curriculum.get_expected_skills(Level::A, 5), ["add_7".to_string()]);
        assert!(curriculum.get_expected_skills(Level::A, 99).is_empty());
        assert!(curriculum.get_expected_skills(Level::C, 1).is_empty());
    }

    #[test]
    fn test_validate_problem_type_by_type_or_skill() {
        let curriculum = spec(vec![range(1, 20, ProblemType::Addition, &["Addition_To_20", "add_7"])]);
        assert!(curriculum.validate_problem_type(Level::A, 3, "addition"));
        assert!(curriculum.validate_problem_type(Level::A, 3, "ADD_7"));
        assert!(curriculum.validate_problem_type(Level::A, 3, "addition_to_20"));
        assert!(!curriculum.validate_problem_type(Level::A, 3, "multiplication"));
        assert!(!curriculum.validate_problem_type(Level::A, 30, "addition"));
    }

    #[test]
    fn test_check_accepts_contiguous_layout() {
        let curriculum = spec(vec![
            range(1, 10, ProblemType::Addition, &["add_7"]),
            range(11, 20, ProblemType::Subtraction, &["sub"]),
        ]);
        assert!(curriculum.check().is_empty());
    }

    #[test]
    fn test_check_reports_gap_overlap_and_tail() {
        let curriculum = spec(vec![
            range(1, 8, ProblemType::Addition, &["a"]),
            range(10, 12, ProblemType::Addition, &["b"]),
            range(12, 15, ProblemType::Addition, &["c"]),
        ]);
        let defects = curriculum.check();
        let messages: Vec<String> = defects.iter().map(|d| d.message.clone()).collect();
        assert!(messages.iter().any(|m| m.contains("9-9 are not covered")));
        assert!(messages.iter().any(|m| m.contains("overlaps")));
        assert!(messages.iter().any(|m| m.contains("16-20 are not covered")));
    }

    #[test]
    fn test_check_reports_generator_type_mismatch() {
        let mut r = range(1, 20, ProblemType::Sequence, &["sequence_to_10"]);
        r.generator = Some(Archetype::Addition {
            left: IntRange::new(1, 9),
            right: IntRange::new(1, 9),
            vertical: false,
        });
        let defects = spec(vec![r]).check();
        assert_eq!(defects.len(), 1);
        assert!(defects[0].message.contains("produces addition"));
    }
}
