//! Problem entity type (one generated worksheet item)

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::core::identity::{IdPrefix, RecordId};
use crate::core::level::Level;
use crate::core::math::Fraction;

/// Marker rendered in place of the unknown in fill-in-the-blank questions
pub const BLANK_MARKER: &str = "___";

/// Coarse operation category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProblemType {
    Counting,
    Sequence,
    Addition,
    Subtraction,
    Multiplication,
    Division,
    Fraction,
    Integers,
    Algebra,
    Functions,
    Exponents,
    Logarithms,
    Calculus,
    Vector,
    Matrix,
    Probability,
    Statistics,
}

impl ProblemType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProblemType::Counting => "counting",
            ProblemType::Sequence => "sequence",
            ProblemType::Addition => "addition",
            ProblemType::Subtraction => "subtraction",
            ProblemType::Multiplication => "multiplication",
            ProblemType::Division => "division",
            ProblemType::Fraction => "fraction",
            ProblemType::Integers => "integers",
            ProblemType::Algebra => "algebra",
            ProblemType::Functions => "functions",
            ProblemType::Exponents => "exponents",
            ProblemType::Logarithms => "logarithms",
            ProblemType::Calculus => "calculus",
            ProblemType::Vector => "vector",
            ProblemType::Matrix => "matrix",
            ProblemType::Probability => "probability",
            ProblemType::Statistics => "statistics",
        }
    }

    pub fn all() -> &'static [ProblemType] {
        &[
            ProblemType::Counting,
            ProblemType::Sequence,
            ProblemType::Addition,
            ProblemType::Subtraction,
            ProblemType::Multiplication,
            ProblemType::Division,
            ProblemType::Fraction,
            ProblemType::Integers,
            ProblemType::Algebra,
            ProblemType::Functions,
            ProblemType::Exponents,
            ProblemType::Logarithms,
            ProblemType::Calculus,
            ProblemType::Vector,
            ProblemType::Matrix,
            ProblemType::Probability,
            ProblemType::Statistics,
        ]
    }

    /// One of the four basic binary operations
    pub fn is_basic_operation(&self) -> bool {
        matches!(
            self,
            ProblemType::Addition
                | ProblemType::Subtraction
                | ProblemType::Multiplication
                | ProblemType::Division
        )
    }

    /// Operator symbol for the basic operations
    pub fn symbol(&self) -> Option<&'static str> {
        match self {
            ProblemType::Addition => Some("+"),
            ProblemType::Subtraction => Some("-"),
            ProblemType::Multiplication => Some("×"),
            ProblemType::Division => Some("÷"),
            _ => None,
        }
    }
}

impl fmt::Display for ProblemType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for ProblemType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase();
        ProblemType::all()
            .iter()
            .find(|t| t.as_str() == wanted)
            .copied()
            .ok_or_else(|| format!("unknown problem type: '{}'", s))
    }
}

/// How operands are laid out on the worksheet
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DisplayFormat {
    #[default]
    Horizontal,
    /// Stacked columns; needs at least two operands
    Vertical,
}

impl fmt::Display for DisplayFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DisplayFormat::Horizontal => write!(f, "horizontal"),
            DisplayFormat::Vertical => write!(f, "vertical"),
        }
    }
}

/// The stored correct answer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Answer {
    Number(i64),
    Fraction(Fraction),
    Text(String),
}

impl Answer {
    /// Numeric value of the answer, reading fractions and numeric text.
    /// Remainder answers (`"7 R 2"`) and symbolic text have no value.
    pub fn numeric_value(&self) -> Option<f64> {
        match self {
            Answer::Number(n) => Some(*n as f64),
            Answer::Fraction(f) => f.to_f64(),
            Answer::Text(text) => Fraction::parse(text).and_then(|f| f.to_f64()),
        }
    }

    /// Exact value as a fraction when the answer is rational
    pub fn as_fraction(&self) -> Option<Fraction> {
        match self {
            Answer::Number(n) => Some(Fraction::whole(*n)),
            Answer::Fraction(f) if f.denominator != 0 => Some(*f),
            Answer::Fraction(_) => None,
            Answer::Text(text) => Fraction::parse(text),
        }
    }

    /// Quotient and remainder of a `"q R r"` answer
    pub fn remainder_parts(&self) -> Option<(i64, i64)> {
        let Answer::Text(text) = self else {
            return None;
        };
        let (q, r) = text.split_once(" R ")?;
        Some((q.trim().parse().ok()?, r.trim().parse().ok()?))
    }

    /// Check a student's typed answer.
    ///
    /// Rational answers are compared by cross-multiplication, so `"12/6"`
    /// is accepted for `2` and for `{numerator: 2, denominator: 1}`.
    pub fn accepts(&self, input: &str) -> bool {
        match self {
            Answer::Number(_) | Answer::Fraction(_) => match (self.as_fraction(), Fraction::parse(input)) {
                (Some(expected), Some(given)) => expected.equivalent(&given),
                _ => false,
            },
            Answer::Text(expected) => {
                if let (Some(a), Some(b)) = (Fraction::parse(expected), Fraction::parse(input)) {
                    return a.equivalent(&b);
                }
                let mut want: Vec<String> = expected.split(',').map(normalize_text).collect();
                let mut got: Vec<String> = input.split(',').map(normalize_text).collect();
                want.sort();
                got.sort();
                want == got
            }
        }
    }
}

fn normalize_text(s: &str) -> String {
    s.chars()
        .filter(|c| !c.is_whitespace())
        .flat_map(|c| c.to_lowercase())
        .collect()
}

impl fmt::Display for Answer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Answer::Number(n) => write!(f, "{}", n),
            Answer::Fraction(frac) => write!(f, "{}", frac),
            Answer::Text(text) => write!(f, "{}", text),
        }
    }
}

/// Hint revealed at a given step
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraduatedHint {
    pub level: u8,
    pub text: String,
}

/// A generated worksheet problem
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Problem {
    pub id: RecordId,
    pub level: Level,
    pub worksheet_number: u32,
    #[serde(rename = "type")]
    pub problem_type: ProblemType,
    pub subtype: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub question: Option<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub operands: Vec<i64>,

    pub correct_answer: Answer,

    #[serde(default)]
    pub display_format: DisplayFormat,

    pub difficulty: u8,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub hints: Vec<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub graduated_hints: Vec<GraduatedHint>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub visual_assets: Vec<String>,
}

impl Problem {
    /// Create a problem with a fresh ID and no optional parts
    pub fn new(
        level: Level,
        worksheet_number: u32,
        problem_type: ProblemType,
        subtype: impl Into<String>,
        correct_answer: Answer,
    ) -> Self {
        Self {
            id: RecordId::new(IdPrefix::Prb),
            level,
            worksheet_number,
            problem_type,
            subtype: subtype.into(),
            question: None,
            operands: Vec::new(),
            correct_answer,
            display_format: DisplayFormat::Horizontal,
            difficulty: 1,
            hints: Vec::new(),
            graduated_hints: Vec::new(),
            visual_assets: Vec::new(),
        }
    }

    pub fn with_question(mut self, question: impl Into<String>) -> Self {
        self.question = Some(question.into());
        self
    }

    pub fn with_operands(mut self, operands: Vec<i64>) -> Self {
        self.operands = operands;
        self
    }

    pub fn with_display_format(mut self, format: DisplayFormat) -> Self {
        self.display_format = format;
        self
    }

    pub fn with_difficulty(mut self, difficulty: u8) -> Self {
        self.difficulty = difficulty;
        self
    }

    pub fn with_hints(mut self, hints: Vec<String>) -> Self {
        self.hints = hints;
        self
    }

    pub fn with_graduated_hints(mut self, hints: Vec<GraduatedHint>) -> Self {
        self.graduated_hints = hints;
        self
    }

    pub fn with_visual_assets(mut self, assets: Vec<String>) -> Self {
        self.visual_assets = assets;
        self
    }

    /// The question contains a blank to fill in
    pub fn is_fill_in_blank(&self) -> bool {
        self.question
            .as_deref()
            .is_some_and(|q| q.contains(BLANK_MARKER))
    }

    /// Type and subtype joined, for keyword matching
    pub fn type_tags(&self) -> String {
        format!("{} {}", self.problem_type, self.subtype).to_lowercase()
    }
}
