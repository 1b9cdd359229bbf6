//! Problem archetypes: the constraint set attached to a worksheet range

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::core::random::IntRange;
use crate::entities::problem::ProblemType;

// Operand ceilings keep every synthesized answer inside i64
const MAX_OPERAND: i64 = 1_000_000;
const MAX_COEFFICIENT: i64 = 1_000;
const MAX_POLYNOMIAL_INPUT: i64 = 100;
const MAX_INTEGRAL_BOUND: i64 = 20;
const MAX_POWER_BASE: i64 = 50;
const MAX_POWER_EXPONENT: i64 = 10;
const MAX_MEAN_COUNT: i64 = 100;
const MAX_SEQUENCE_LENGTH: usize = 20;

/// Fraction operation requested by a fraction bucket
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FractionOp {
    Add,
    Subtract,
    Multiply,
    Divide,
    Reduce,
}

impl FractionOp {
    pub fn symbol(&self) -> &'static str {
        match self {
            FractionOp::Add => "+",
            FractionOp::Subtract => "-",
            FractionOp::Multiply => "×",
            FractionOp::Divide => "÷",
            FractionOp::Reduce => "",
        }
    }
}

/// Signed-number operation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SignedOp {
    Add,
    Subtract,
}

/// Operation behind a word problem
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WordOperation {
    Addition,
    Subtraction,
    Multiplication,
    Division,
}

impl WordOperation {
    pub fn problem_type(&self) -> ProblemType {
        match self {
            WordOperation::Addition => ProblemType::Addition,
            WordOperation::Subtraction => ProblemType::Subtraction,
            WordOperation::Multiplication => ProblemType::Multiplication,
            WordOperation::Division => ProblemType::Division,
        }
    }
}

/// A bucket: which kind of problem a range produces and under which constraints
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Archetype {
    /// Count the dots in a picture
    Count { range: IntRange },
    /// Continue an arithmetic sequence
    Sequence {
        start: IntRange,
        step: IntRange,
        length: usize,
    },
    Addition {
        left: IntRange,
        right: IntRange,
        #[serde(default)]
        vertical: bool,
    },
    /// `a + ___ = total`
    MissingAddend { left: IntRange, total: IntRange },
    /// Operands are swapped when needed so the result is never negative
    Subtraction {
        minuend: IntRange,
        subtrahend: IntRange,
        #[serde(default)]
        vertical: bool,
    },
    Multiplication {
        left: IntRange,
        right: IntRange,
        #[serde(default)]
        vertical: bool,
    },
    /// Dividend is built as divisor × quotient (+ remainder when requested)
    Division {
        divisor: IntRange,
        quotient: IntRange,
        #[serde(default)]
        remainder: bool,
    },
    Fraction {
        op: FractionOp,
        denominator: IntRange,
        #[serde(default)]
        same_denominator: bool,
    },
    /// Signed-number arithmetic
    Integers { op: SignedOp, range: IntRange },
    /// `ax + b = c` with an integer solution
    LinearEquation {
        coefficient: IntRange,
        constant: IntRange,
        solution: IntRange,
    },
    /// Monic quadratic built from two distinct integer roots
    QuadraticRoots { roots: IntRange },
    FunctionEvaluation {
        degree: usize,
        coefficient: IntRange,
        input: IntRange,
    },
    Exponent { base: IntRange, exponent: IntRange },
    Logarithm { base: IntRange, exponent: IntRange },
    /// Limit of a polynomial at a point
    Limit {
        degree: usize,
        coefficient: IntRange,
        point: IntRange,
    },
    Derivative { degree: usize, coefficient: IntRange },
    DefiniteIntegral {
        degree: usize,
        coefficient: IntRange,
        bounds: IntRange,
    },
    VectorDot { dimension: usize, component: IntRange },
    MatrixDeterminant { size: usize, entry: IntRange },
    /// Single-draw probability, answered as a reduced fraction
    Probability { outcomes: IntRange },
    /// Arithmetic mean with an integer result
    Mean { count: IntRange, value: IntRange },
    WordProblem {
        operation: WordOperation,
        left: IntRange,
        right: IntRange,
    },
}

impl Archetype {
    /// Problem type this archetype generates
    pub fn problem_type(&self) -> ProblemType {
        match self {
            Archetype::Count { .. } => ProblemType::Counting,
            Archetype::Sequence { .. } => ProblemType::Sequence,
            Archetype::Addition { .. } | Archetype::MissingAddend { .. } => ProblemType::Addition,
            Archetype::Subtraction { .. } => ProblemType::Subtraction,
            Archetype::Multiplication { .. } => ProblemType::Multiplication,
            Archetype::Division { .. } => ProblemType::Division,
            Archetype::Fraction { .. } => ProblemType::Fraction,
            Archetype::Integers { .. } => ProblemType::Integers,
            Archetype::LinearEquation { .. } | Archetype::QuadraticRoots { .. } => ProblemType::Algebra,
            Archetype::FunctionEvaluation { .. } => ProblemType::Functions,
            Archetype::Exponent { .. } => ProblemType::Exponents,
            Archetype::Logarithm { .. } => ProblemType::Logarithms,
            Archetype::Limit { .. }
            | Archetype::Derivative { .. }
            | Archetype::DefiniteIntegral { .. } => ProblemType::Calculus,
            Archetype::VectorDot { .. } => ProblemType::Vector,
            Archetype::MatrixDeterminant { .. } => ProblemType::Matrix,
            Archetype::Probability { .. } => ProblemType::Probability,
            Archetype::Mean { .. } => ProblemType::Statistics,
            Archetype::WordProblem { operation, .. } => operation.problem_type(),
        }
    }

    /// Archetype name as written in curriculum files
    pub fn kind(&self) -> &'static str {
        match self {
            Archetype::Count { .. } => "count",
            Archetype::Sequence { .. } => "sequence",
            Archetype::Addition { .. } => "addition",
            Archetype::MissingAddend { .. } => "missing_addend",
            Archetype::Subtraction { .. } => "subtraction",
            Archetype::Multiplication { .. } => "multiplication",
            Archetype::Division { .. } => "division",
            Archetype::Fraction { .. } => "fraction",
            Archetype::Integers { .. } => "integers",
            Archetype::LinearEquation { .. } => "linear_equation",
            Archetype::QuadraticRoots { .. } => "quadratic_roots",
            Archetype::FunctionEvaluation { .. } => "function_evaluation",
            Archetype::Exponent { .. } => "exponent",
            Archetype::Logarithm { .. } => "logarithm",
            Archetype::Limit { .. } => "limit",
            Archetype::Derivative { .. } => "derivative",
            Archetype::DefiniteIntegral { .. } => "definite_integral",
            Archetype::VectorDot { .. } => "vector_dot",
            Archetype::MatrixDeterminant { .. } => "matrix_determinant",
            Archetype::Probability { .. } => "probability",
            Archetype::Mean { .. } => "mean",
            Archetype::WordProblem { .. } => "word_problem",
        }
    }

    /// Constraint sanity problems, empty when the archetype can generate
    pub fn constraint_problems(&self) -> Vec<String> {
        let mut problems = Vec::new();
        let mut range = |name: &str, r: &IntRange, limit: i64| {
            if !r.is_valid() {
                problems.push(format!("{} range {}..={} is inverted", name, r.min, r.max));
            } else if r.min < -limit || r.max > limit {
                problems.push(format!(
                    "{} range {}..={} exceeds the supported magnitude {}",
                    name, r.min, r.max, limit
                ));
            }
        };

        match self {
            Archetype::Count { range: r } => range("count", r, MAX_OPERAND),
            Archetype::Sequence { start, step, .. } => {
                range("start", start, MAX_OPERAND);
                range("step", step, MAX_OPERAND);
            }
            Archetype::Addition { left, right, .. }
            | Archetype::Multiplication { left, right, .. }
            | Archetype::WordProblem { left, right, .. } => {
                range("left", left, MAX_OPERAND);
                range("right", right, MAX_OPERAND);
            }
            Archetype::MissingAddend { left, total } => {
                range("left", left, MAX_OPERAND);
                range("total", total, MAX_OPERAND);
            }
            Archetype::Subtraction { minuend, subtrahend, .. } => {
                range("minuend", minuend, MAX_OPERAND);
                range("subtrahend", subtrahend, MAX_OPERAND);
            }
            Archetype::Division { divisor, quotient, .. } => {
                range("divisor", divisor, MAX_OPERAND);
                range("quotient", quotient, MAX_OPERAND);
            }
            Archetype::Fraction { denominator, .. } => range("denominator", denominator, MAX_OPERAND),
            Archetype::Integers { range: r, .. } => range("range", r, MAX_OPERAND),
            Archetype::LinearEquation {
                coefficient,
                constant,
                solution,
            } => {
                range("coefficient", coefficient, MAX_OPERAND);
                range("constant", constant, MAX_OPERAND);
                range("solution", solution, MAX_OPERAND);
            }
            Archetype::QuadraticRoots { roots } => range("roots", roots, MAX_OPERAND),
            Archetype::FunctionEvaluation { coefficient, input, .. } => {
                range("coefficient", coefficient, MAX_COEFFICIENT);
                range("input", input, MAX_POLYNOMIAL_INPUT);
            }
            Archetype::Exponent { base, exponent } | Archetype::Logarithm { base, exponent } => {
                range("base", base, MAX_POWER_BASE);
                range("exponent", exponent, MAX_POWER_EXPONENT);
            }
            Archetype::Limit { coefficient, point, .. } => {
                range("coefficient", coefficient, MAX_COEFFICIENT);
                range("point", point, MAX_POLYNOMIAL_INPUT);
            }
            Archetype::Derivative { coefficient, .. } => range("coefficient", coefficient, MAX_COEFFICIENT),
            Archetype::DefiniteIntegral { coefficient, bounds, .. } => {
                range("coefficient", coefficient, MAX_COEFFICIENT);
                range("bounds", bounds, MAX_INTEGRAL_BOUND);
            }
            Archetype::VectorDot { component, .. } => range("component", component, MAX_OPERAND),
            Archetype::MatrixDeterminant { entry, .. } => range("entry", entry, MAX_COEFFICIENT),
            Archetype::Probability { outcomes } => range("outcomes", outcomes, MAX_OPERAND),
            Archetype::Mean { count, value } => {
                range("count", count, MAX_MEAN_COUNT);
                range("value", value, MAX_OPERAND);
            }
        }

        match self {
            Archetype::Count { range } if range.min < 1 => {
                problems.push("count range must start at 1 or more".to_string());
            }
            Archetype::Sequence { length, .. } if *length < 2 => {
                problems.push("sequence length must be at least 2".to_string());
            }
            Archetype::Sequence { length, .. } if *length > MAX_SEQUENCE_LENGTH => {
                problems.push(format!("sequence length must be at most {}", MAX_SEQUENCE_LENGTH));
            }
            Archetype::Division { divisor, .. } if divisor.min < 1 => {
                problems.push("divisor range must be positive".to_string());
            }
            Archetype::Division { divisor, remainder: true, .. } if divisor.max < 2 => {
                problems.push("remainder division needs a divisor of at least 2".to_string());
            }
            Archetype::Fraction { denominator, .. } if denominator.min < 2 => {
                problems.push("fraction denominators must be at least 2".to_string());
            }
            Archetype::LinearEquation { coefficient, .. } if coefficient.min < 1 => {
                problems.push("linear equation coefficient must be positive".to_string());
            }
            Archetype::QuadraticRoots { roots } if roots.is_fixed() => {
                problems.push("quadratic roots range must allow two distinct roots".to_string());
            }
            Archetype::Logarithm { base, exponent } if base.min < 2 || exponent.min < 0 => {
                problems.push("logarithm base must be at least 2 and exponent non-negative".to_string());
            }
            Archetype::Exponent { exponent, .. } if exponent.min < 0 => {
                problems.push("exponent must be non-negative".to_string());
            }
            Archetype::FunctionEvaluation { degree, .. }
            | Archetype::Limit { degree, .. }
            | Archetype::Derivative { degree, .. }
            | Archetype::DefiniteIntegral { degree, .. }
                if *degree == 0 || *degree > 6 =>
            {
                problems.push("polynomial degree must be between 1 and 6".to_string());
            }
            Archetype::VectorDot { dimension, .. } if !(2..=4).contains(dimension) => {
                problems.push("vector dimension must be between 2 and 4".to_string());
            }
            Archetype::MatrixDeterminant { size, .. } if !(2..=3).contains(size) => {
                problems.push("matrix size must be 2 or 3".to_string());
            }
            Archetype::Probability { outcomes } if outcomes.min < 2 => {
                problems.push("probability needs at least 2 outcomes".to_string());
            }
            Archetype::Mean { count, .. } if count.min < 2 => {
                problems.push("mean needs at least 2 values".to_string());
            }
            Archetype::WordProblem { operation: WordOperation::Division, right, .. } if right.min < 1 => {
                problems.push("division word problems need a positive divisor".to_string());
            }
            _ => {}
        }

        problems
    }
}

impl fmt::Display for Archetype {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.kind())
    }
}
