//! Issue records produced by validators and the tester

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::core::identity::{IdPrefix, RecordId};
use crate::core::level::Level;
use crate::entities::problem::Problem;

/// Issue severity. Only `Error` fails a worksheet range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Error,
    Warning,
    Info,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Error => "error",
            Severity::Warning => "warning",
            Severity::Info => "info",
        }
    }

    pub fn all() -> &'static [Severity] {
        &[Severity::Error, Severity::Warning, Severity::Info]
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// What kind of defect an issue describes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum IssueType {
    MathError,
    VisualMismatch,
    CurriculumMismatch,
    Consistency,
    Readability,
    FractionError,
    ValidatorFailure,
}

impl IssueType {
    pub fn as_str(&self) -> &'static str {
        match self {
            IssueType::MathError => "math-error",
            IssueType::VisualMismatch => "visual-mismatch",
            IssueType::CurriculumMismatch => "curriculum-mismatch",
            IssueType::Consistency => "consistency",
            IssueType::Readability => "readability",
            IssueType::FractionError => "fraction-error",
            IssueType::ValidatorFailure => "validator-failure",
        }
    }
}

impl fmt::Display for IssueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A literal text substitution in a source file.
///
/// Empty `old_code` and `new_code` mean the fix needs a human.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CodeFix {
    /// Target path; may contain a `**` segment
    pub file: String,
    pub old_code: String,
    pub new_code: String,
    pub explanation: String,
}

impl CodeFix {
    pub fn new(
        file: impl Into<String>,
        old_code: impl Into<String>,
        new_code: impl Into<String>,
        explanation: impl Into<String>,
    ) -> Self {
        Self {
            file: file.into(),
            old_code: old_code.into(),
            new_code: new_code.into(),
            explanation: explanation.into(),
        }
    }

    /// A fix that only points at the file to change
    pub fn manual(file: impl Into<String>, explanation: impl Into<String>) -> Self {
        Self::new(file, "", "", explanation)
    }

    pub fn requires_manual_intervention(&self) -> bool {
        self.old_code.is_empty() || self.new_code.is_empty()
    }
}

/// One detected defect
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Issue {
    pub id: RecordId,
    #[serde(rename = "type")]
    pub issue_type: IssueType,
    pub severity: Severity,
    pub level: Level,
    pub worksheet: u32,
    pub problem_type: String,
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub suggested_fix: Option<CodeFix>,
    pub auto_fixable: bool,
    /// Validator that raised the issue (or `tester`)
    pub validator: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub problem_id: Option<RecordId>,
}

impl Issue {
    pub fn new(
        issue_type: IssueType,
        severity: Severity,
        level: Level,
        worksheet: u32,
        problem_type: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            id: RecordId::new(IdPrefix::Iss),
            issue_type,
            severity,
            level,
            worksheet,
            problem_type: problem_type.into(),
            description: description.into(),
            suggested_fix: None,
            auto_fixable: false,
            validator: String::new(),
            problem_id: None,
        }
    }

    /// Issue located at a generated problem
    pub fn for_problem(
        issue_type: IssueType,
        severity: Severity,
        problem: &Problem,
        description: impl Into<String>,
    ) -> Self {
        let mut issue = Self::new(
            issue_type,
            severity,
            problem.level,
            problem.worksheet_number,
            problem.problem_type.as_str(),
            description,
        );
        issue.problem_id = Some(problem.id.clone());
        issue
    }

    pub fn error(issue_type: IssueType, problem: &Problem, description: impl Into<String>) -> Self {
        Self::for_problem(issue_type, Severity::Error, problem, description)
    }

    pub fn warning(issue_type: IssueType, problem: &Problem, description: impl Into<String>) -> Self {
        Self::for_problem(issue_type, Severity::Warning, problem, description)
    }

    pub fn info(issue_type: IssueType, problem: &Problem, description: impl Into<String>) -> Self {
        Self::for_problem(issue_type, Severity::Info, problem, description)
    }

    pub fn with_validator(mut self, validator: impl Into<String>) -> Self {
        self.validator = validator.into();
        self
    }

    /// Attach a suggestion without marking the issue auto-fixable
    pub fn with_fix(mut self, fix: CodeFix) -> Self {
        self.suggested_fix = Some(fix);
        self
    }

    /// Attach a suggestion and mark the issue auto-fixable
    pub fn auto_fix(mut self, fix: CodeFix) -> Self {
        self.suggested_fix = Some(fix);
        self.auto_fixable = true;
        self
    }

    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }

    /// Eligible for the fix engine
    pub fn is_auto_fixable(&self) -> bool {
        self.auto_fixable && self.suggested_fix.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::problem::{Answer, ProblemType};

    fn problem() -> Problem {
        Problem::new(Level::A, 90, ProblemType::Subtraction, "subtraction_from_10", Answer::Number(4))
            .with_operands(vec![8, 3])
    }

    #[test]
    fn test_issue_from_problem() {
        let p = problem();
        let issue = Issue::error(IssueType::MathError, &p, "wrong").with_validator("math");
        assert_eq!(issue.level, Level::A);
        assert_eq!(issue.worksheet, 90);
        assert_eq!(issue.problem_type, "subtraction");
        assert_eq!(issue.problem_id.as_ref(), Some(&p.id));
        assert!(issue.id.to_string().starts_with("ISS-"));
        assert!(!issue.is_auto_fixable());
    }

    #[test]
    fn test_auto_fix_requires_fix() {
        let p = problem();
        let issue = Issue::error(IssueType::MathError, &p, "wrong")
            .auto_fix(CodeFix::manual("src/**/arithmetic.rs", "check the operands"));
        assert!(issue.is_auto_fixable());
        assert!(issue.suggested_fix.unwrap().requires_manual_intervention());
    }

    #[test]
    fn test_serialized_names() {
        let p = problem();
        let issue = Issue::warning(IssueType::CurriculumMismatch, &p, "drift");
        let json = serde_json::to_value(&issue).unwrap();
        assert_eq!(json["type"], "curriculum-mismatch");
        assert_eq!(json["severity"], "warning");
        assert_eq!(json["autoFixable"], false);
        assert!(json.get("suggestedFix").is_none());
    }
}
