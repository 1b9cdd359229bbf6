//! Quality assurance pipeline
//!
//! [`ProblemTester`] samples problems from a [`ProblemSource`] for every
//! worksheet range, runs the enabled validators over them and aggregates a
//! [`QaReport`]. Auto-fixable issues can then be handed to the [`FixEngine`].
//!
//! [`ProblemSource`]: crate::generator::ProblemSource

pub mod fix_engine;
pub mod issue;
pub mod report;
pub mod tester;
pub mod validators;

pub use fix_engine::{FixEngine, FixError, FixResult};
pub use issue::{CodeFix, Issue, IssueType, Severity};
pub use report::{render_console, render_html, render_json, ReportError};
pub use tester::{get_auto_fixable_issues, ProblemTester, QaConfig, QaReport, TestResult};
pub use validators::{default_validators, Validator, ValidatorError, ValidatorToggles};
