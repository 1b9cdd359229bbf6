//! Report rendering: console, JSON and HTML

use console::style;
use rust_embed::Embed;
use std::collections::BTreeMap;
use std::fmt::Write;
use tabled::{builder::Builder, settings::Style};
use tera::{Context, Tera};
use thiserror::Error;

use crate::core::level::Level;
use crate::qa::fix_engine::FixResult;
use crate::qa::issue::{Issue, Severity};
use crate::qa::tester::QaReport;

#[derive(Embed)]
#[folder = "templates/"]
struct EmbeddedTemplates;

const HTML_TEMPLATE: &str = "report.html.tera";

/// Issues listed per severity before the console output summarizes the rest
const CONSOLE_ISSUE_LIMIT: usize = 50;

#[derive(Debug, Error)]
pub enum ReportError {
    #[error("failed to serialize report: {0}")]
    Json(#[from] serde_json::Error),

    #[error("failed to render HTML report: {0}")]
    Template(String),

    #[error("report template '{0}' is missing")]
    MissingTemplate(&'static str),
}

/// Pretty-printed JSON mirroring [`QaReport`]
pub fn render_json(report: &QaReport) -> Result<String, ReportError> {
    Ok(serde_json::to_string_pretty(report)?)
}

/// Standalone HTML page
pub fn render_html(report: &QaReport) -> Result<String, ReportError> {
    let file = EmbeddedTemplates::get(HTML_TEMPLATE).ok_or(ReportError::MissingTemplate(HTML_TEMPLATE))?;
    let source = String::from_utf8_lossy(&file.data);

    let mut tera = Tera::default();
    tera.autoescape_on(vec![".tera"]);
    tera.add_raw_template(HTML_TEMPLATE, &source)
        .map_err(|e| ReportError::Template(e.to_string()))?;
    let context = Context::from_serialize(report).map_err(|e| ReportError::Template(e.to_string()))?;
    tera.render(HTML_TEMPLATE, &context)
        .map_err(|e| ReportError::Template(describe(&e)))
}

fn describe(err: &dyn std::error::Error) -> String {
    let mut message = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        message.push_str(": ");
        message.push_str(&cause.to_string());
        source = cause.source();
    }
    message
}

/// Colorized terminal report: per-level table, issues grouped by severity,
/// fix outcomes and a pass/fail summary
pub fn render_console(report: &QaReport, fixes: &[FixResult]) -> String {
    let mut out = String::new();

    let _ = writeln!(
        out,
        "{} {}",
        style("QA report for curriculum").bold(),
        style(&report.curriculum).cyan().bold()
    );
    let _ = writeln!(
        out,
        "{}\n",
        style(report.generated_at.format("%Y-%m-%d %H:%M:%S UTC")).dim()
    );

    out.push_str(&level_table(report));
    out.push('\n');

    let issues: Vec<&Issue> = report.issues().collect();
    for severity in Severity::all() {
        let matching: Vec<&&Issue> = issues.iter().filter(|i| i.severity == *severity).collect();
        if matching.is_empty() {
            continue;
        }
        let _ = writeln!(out, "\n{} ({})", severity_heading(*severity), matching.len());
        for issue in matching.iter().take(CONSOLE_ISSUE_LIMIT) {
            let _ = writeln!(
                out,
                "  {} {} ws {} [{}] {}",
                severity_marker(*severity),
                issue.level,
                issue.worksheet,
                issue.issue_type,
                issue.description
            );
            if let Some(fix) = &issue.suggested_fix {
                let _ = writeln!(
                    out,
                    "      {} {} ({})",
                    style("fix:").dim(),
                    fix.explanation,
                    style(&fix.file).dim()
                );
            }
        }
        if matching.len() > CONSOLE_ISSUE_LIMIT {
            let _ = writeln!(
                out,
                "  {}",
                style(format!("... and {} more", matching.len() - CONSOLE_ISSUE_LIMIT)).dim()
            );
        }
    }

    if !fixes.is_empty() {
        let _ = writeln!(out, "\n{}", style("Fixes").bold());
        for fix in fixes {
            let marker = if fix.success {
                style("✓").green()
            } else {
                style("✗").red()
            };
            let _ = writeln!(out, "  {} {} {}", marker, fix.issue_id, fix.message);
        }
        let _ = writeln!(
            out,
            "  {} applied, {} failed of {}",
            report.fixes_applied, report.fixes_failed, report.fixes_attempted
        );
    }

    let tested = report.levels_tested.len();
    let passed = report.levels_passed.len();
    let percent = if tested == 0 {
        100.0
    } else {
        passed as f64 * 100.0 / tested as f64
    };
    let summary = format!(
        "{}/{} levels passed ({:.1}%), {} problems, {} issues",
        passed, tested, percent, report.total_problems, report.total_issues
    );
    if report.passed() {
        let _ = writeln!(out, "\n{} {}", style("PASS").green().bold(), summary);
    } else {
        let _ = writeln!(
            out,
            "\n{} {} (failed: {})",
            style("FAIL").red().bold(),
            summary,
            join_levels(&report.levels_failed)
        );
    }
    out
}

fn level_table(report: &QaReport) -> String {
    #[derive(Default)]
    struct Row {
        ranges: usize,
        problems: usize,
        errors: usize,
        warnings: usize,
        info: usize,
        failed: bool,
    }

    let mut rows: BTreeMap<Level, Row> = BTreeMap::new();
    for result in &report.results {
        let row = rows.entry(result.level).or_default();
        row.ranges += 1;
        row.problems += result.problems_tested;
        row.errors += result.error_count;
        row.warnings += result.warning_count;
        row.info += result.info_count;
        row.failed |= !result.passed;
    }
    for issue in &report.curriculum_issues {
        let row = rows.entry(issue.level).or_default();
        match issue.severity {
            Severity::Error => {
                row.errors += 1;
                row.failed = true;
            }
            Severity::Warning => row.warnings += 1,
            Severity::Info => row.info += 1,
        }
    }

    let mut builder = Builder::default();
    builder.push_record(["Level", "Ranges", "Problems", "Errors", "Warnings", "Info", "Status"]);
    for (level, row) in &rows {
        builder.push_record([
            level.to_string(),
            row.ranges.to_string(),
            row.problems.to_string(),
            row.errors.to_string(),
            row.warnings.to_string(),
            row.info.to_string(),
            if row.failed { "FAIL" } else { "pass" }.to_string(),
        ]);
    }
    let mut table = builder.build().with(Style::markdown()).to_string();
    table.push('\n');
    table
}

fn severity_heading(severity: Severity) -> console::StyledObject<&'static str> {
    match severity {
        Severity::Error => style("Errors").red().bold(),
        Severity::Warning => style("Warnings").yellow().bold(),
        Severity::Info => style("Info").blue().bold(),
    }
}

fn severity_marker(severity: Severity) -> console::StyledObject<&'static str> {
    match severity {
        Severity::Error => style("✗").red(),
        Severity::Warning => style("!").yellow(),
        Severity::Info => style("i").blue(),
    }
}

fn join_levels(levels: &[Level]) -> String {
    levels
        .iter()
        .map(Level::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::curriculum::WorksheetRange;
    use crate::entities::problem::ProblemType;
    use crate::qa::issue::IssueType;
    use crate::qa::tester::TestResult;

    fn report() -> QaReport {
        let range = WorksheetRange {
            start: 1,
            end: 10,
            problem_type: ProblemType::Addition,
            description: "Sums <to 10>".to_string(),
            expected_skills: vec!["add_1".to_string()],
            generator: None,
        };
        let issue = Issue::new(
            IssueType::MathError,
            Severity::Error,
            Level::A,
            3,
            "addition",
            "Expected 5 for 2 + 3, but the answer is <6>",
        );
        let failing = TestResult {
            level: Level::A,
            range: range.clone(),
            problems_tested: 10,
            issues: vec![issue],
            error_count: 1,
            warning_count: 0,
            info_count: 0,
            passed: false,
        };
        let passing = TestResult {
            level: Level::B,
            range,
            problems_tested: 10,
            issues: Vec::new(),
            error_count: 0,
            warning_count: 0,
            info_count: 0,
            passed: true,
        };
        let defect = Issue::new(
            IssueType::CurriculumMismatch,
            Severity::Warning,
            Level::C,
            0,
            "curriculum",
            "level has no worksheet ranges",
        )
        .with_validator("curriculum-check");
        QaReport::from_results("kumon", vec![failing, passing], vec![defect])
    }

    #[test]
    fn test_json_mirrors_report() {
        let json = render_json(&report()).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["totalIssues"], 2);
        assert_eq!(value["levelsFailed"][0], "A");
        assert_eq!(value["levelsTested"], serde_json::json!(["A", "B", "C"]));
        assert_eq!(value["issuesBySeverity"]["error"], 1);
        assert_eq!(value["curriculumIssues"][0]["validator"], "curriculum-check");
        assert_eq!(value["results"][0]["issues"][0]["type"], "math-error");
    }

    #[test]
    fn test_console_lists_issues_and_verdict() {
        console::set_colors_enabled(false);
        let text = render_console(&report(), &[]);
        assert!(text.contains("| A "));
        assert!(text.contains("Errors (1)"));
        assert!(text.contains("Expected 5"));
        assert!(text.contains("FAIL"));
        assert!(text.contains("| C "));
        assert!(text.contains("Warnings (1)"));
        assert!(text.contains("2/3 levels passed (66.7%)"));
    }

    #[test]
    fn test_html_escapes_text() {
        let html = render_html(&report()).unwrap();
        assert!(html.contains("<h1>Drillsmith QA Report</h1>"));
        assert!(html.contains("&lt;6&gt;"));
        assert!(html.contains("FAIL"));
        assert!(html.contains("Curriculum structure"));
        assert!(html.contains("level has no worksheet ranges"));
    }
}
