//! Problem validators
//!
//! Each validator checks one concern of a generated problem against the
//! curriculum. They are heuristics, not proofs: pattern matches, keyword
//! lists and recomputation of the simple operations. Validators are
//! independent and can be switched off one by one.

mod consistency;
mod curriculum;
mod fraction;
mod math;
mod readability;
mod visual;

use serde::Deserialize;
use thiserror::Error;

use crate::curriculum::CurriculumSpec;
use crate::entities::problem::{Problem, ProblemType};
use crate::qa::issue::{CodeFix, Issue};

pub use consistency::ConsistencyValidator;
pub use curriculum::CurriculumValidator;
pub use fraction::FractionValidator;
pub use math::MathValidator;
pub use readability::ReadabilityValidator;
pub use visual::VisualValidator;

/// Validator names, in run order
pub const VALIDATOR_NAMES: &[&str] = &[
    "visual",
    "math",
    "curriculum",
    "consistency",
    "readability",
    "fraction",
];

/// Type/subtype keywords of multi-step or symbolic problems that the
/// operand-based checks skip
pub const COMPLEX_KEYWORDS: &[&str] = &[
    "matrix",
    "proof",
    "induction",
    "vector",
    "derivative",
    "integral",
    "limit",
    "equation",
    "quadratic",
    "logarithm",
];

/// A validator could not evaluate a problem
#[derive(Debug, Error)]
pub enum ValidatorError {
    #[error("division by zero in operands {operands:?}")]
    DivisionByZero { operands: Vec<i64> },

    #[error("arithmetic overflow while recomputing {operation}")]
    Overflow { operation: String },

    #[error("malformed problem: {0}")]
    Malformed(String),
}

/// A single-concern problem checker
pub trait Validator {
    /// Short identifier used in issues and `--disable`
    fn name(&self) -> &'static str;

    fn description(&self) -> &'static str;

    fn validate(&self, problem: &Problem, spec: &CurriculumSpec) -> Result<Vec<Issue>, ValidatorError>;
}

/// Per-validator on/off switches (all on by default)
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ValidatorToggles {
    pub visual: bool,
    pub math: bool,
    pub curriculum: bool,
    pub consistency: bool,
    pub readability: bool,
    pub fraction: bool,
}

impl Default for ValidatorToggles {
    fn default() -> Self {
        Self {
            visual: true,
            math: true,
            curriculum: true,
            consistency: true,
            readability: true,
            fraction: true,
        }
    }
}

impl ValidatorToggles {
    fn slot(&mut self, name: &str) -> Option<&mut bool> {
        match name.trim().to_lowercase().as_str() {
            "visual" => Some(&mut self.visual),
            "math" => Some(&mut self.math),
            "curriculum" => Some(&mut self.curriculum),
            "consistency" => Some(&mut self.consistency),
            "readability" => Some(&mut self.readability),
            "fraction" => Some(&mut self.fraction),
            _ => None,
        }
    }

    /// Switch a validator off by name
    pub fn disable(&mut self, name: &str) -> Result<(), String> {
        match self.slot(name) {
            Some(enabled) => {
                *enabled = false;
                Ok(())
            }
            None => Err(format!(
                "unknown validator '{}' (valid: {})",
                name,
                VALIDATOR_NAMES.join(", ")
            )),
        }
    }

    pub fn is_enabled(&self, name: &str) -> bool {
        match name.trim().to_lowercase().as_str() {
            "visual" => self.visual,
            "math" => self.math,
            "curriculum" => self.curriculum,
            "consistency" => self.consistency,
            "readability" => self.readability,
            "fraction" => self.fraction,
            _ => false,
        }
    }
}

/// The enabled validators, in run order
pub fn default_validators(toggles: &ValidatorToggles) -> Vec<Box<dyn Validator>> {
    let all: Vec<Box<dyn Validator>> = vec![
        Box::new(VisualValidator),
        Box::new(MathValidator),
        Box::new(CurriculumValidator),
        Box::new(ConsistencyValidator),
        Box::new(ReadabilityValidator),
        Box::new(FractionValidator),
    ];
    all.into_iter()
        .filter(|validator| toggles.is_enabled(validator.name()))
        .collect()
}

/// True when the type or subtype names a multi-step or symbolic category
pub(crate) fn is_complex(problem: &Problem) -> bool {
    let tags = problem.type_tags();
    COMPLEX_KEYWORDS.iter().any(|keyword| tags.contains(keyword))
}

/// Generator module that synthesizes this problem
pub(crate) fn generator_module(problem: &Problem) -> &'static str {
    if problem.subtype.to_lowercase().contains("word") {
        return "word";
    }
    match problem.problem_type {
        ProblemType::Counting | ProblemType::Sequence => "early",
        ProblemType::Addition
        | ProblemType::Subtraction
        | ProblemType::Multiplication
        | ProblemType::Division
        | ProblemType::Integers => "arithmetic",
        ProblemType::Fraction => "fractions",
        ProblemType::Algebra
        | ProblemType::Functions
        | ProblemType::Exponents
        | ProblemType::Logarithms => "algebra",
        ProblemType::Calculus => "calculus",
        ProblemType::Vector
        | ProblemType::Matrix
        | ProblemType::Probability
        | ProblemType::Statistics => "electives",
    }
}

/// Manual fix pointing at a generator module
pub(crate) fn generator_fix(module: &str, explanation: impl Into<String>) -> CodeFix {
    CodeFix::manual(format!("src/**/{}.rs", module), explanation)
}

/// Exact result of a basic operation folded over the operands.
/// `Ok(None)` for types that are not one of the four operations.
pub(crate) fn recompute(problem: &Problem) -> Result<Option<crate::core::math::Fraction>, ValidatorError> {
    use crate::core::math::Fraction;

    let Some((first, rest)) = problem.operands.split_first() else {
        return Ok(None);
    };
    let overflow = || ValidatorError::Overflow {
        operation: format!("{} of {:?}", problem.problem_type, problem.operands),
    };

    let mut acc = Fraction::whole(*first);
    for operand in rest {
        let value = Fraction::whole(*operand);
        acc = match problem.problem_type {
            ProblemType::Addition => {
                let n = acc
                    .numerator
                    .checked_add(value.numerator.checked_mul(acc.denominator).ok_or_else(overflow)?)
                    .ok_or_else(overflow)?;
                Fraction::new(n, acc.denominator).reduced()
            }
            ProblemType::Subtraction => {
                let n = acc
                    .numerator
                    .checked_sub(value.numerator.checked_mul(acc.denominator).ok_or_else(overflow)?)
                    .ok_or_else(overflow)?;
                Fraction::new(n, acc.denominator).reduced()
            }
            ProblemType::Multiplication => {
                let n = acc.numerator.checked_mul(value.numerator).ok_or_else(overflow)?;
                Fraction::new(n, acc.denominator).reduced()
            }
            ProblemType::Division => acc.checked_div(&value).ok_or_else(|| ValidatorError::DivisionByZero {
                operands: problem.operands.clone(),
            })?,
            _ => return Ok(None),
        };
    }
    Ok(Some(acc))
}

/// Render an exact value as an integer when whole
pub(crate) fn display_value(value: &crate::core::math::Fraction) -> String {
    let value = value.reduced();
    if value.is_whole() {
        value.numerator.to_string()
    } else {
        value.to_string()
    }
}
