//! `drillsmith qa` command - Generate, validate and report

use clap::ValueEnum;
use console::style;
use dialoguer::{theme::ColorfulTheme, Confirm};
use miette::{IntoDiagnostic, Result};
use std::path::PathBuf;

use crate::cli::helpers::{load_config, load_curriculum, project, rng, write_output};
use crate::cli::{GlobalOpts, OutputFormat};
use crate::core::level::Level;
use crate::curriculum::CurriculumSpec;
use crate::generator::{builtin_curriculum, Generator};
use crate::qa::{
    get_auto_fixable_issues, render_console, render_html, render_json, FixEngine, FixResult, Issue,
    ProblemTester, QaConfig,
};

#[derive(clap::Args, Debug)]
pub struct QaArgs {
    /// Curriculum: built-in name, file under curricula/, or path to a YAML file
    #[arg(long, short = 'c')]
    pub curriculum: Option<String>,

    /// Level to test (repeatable)
    #[arg(long = "level", short = 'l', value_name = "LEVEL")]
    pub levels: Vec<Level>,

    /// Test every level, ignoring the configured subset
    #[arg(long, conflicts_with = "levels")]
    pub all: bool,

    /// Apply suggested fixes for auto-fixable issues. Fixes from the built-in
    /// validators only name the generator module to change; they are listed
    /// as needing manual intervention and nothing is edited.
    #[arg(long)]
    pub auto_fix: bool,

    /// Confirm each fix before applying it (implies --auto-fix)
    #[arg(long)]
    pub review_fixes: bool,

    /// Simulate fixes without writing any file
    #[arg(long)]
    pub dry_run: bool,

    /// Report format
    #[arg(long, short = 'o', value_enum)]
    pub output: Option<ReportFormat>,

    /// Write the report to a file instead of stdout
    #[arg(long)]
    pub output_path: Option<PathBuf>,

    /// Problems generated per worksheet range
    #[arg(long, short = 'n')]
    pub problems: Option<usize>,

    /// Seed for reproducible runs
    #[arg(long)]
    pub seed: Option<u64>,

    /// Disable a validator (repeatable)
    #[arg(long, value_name = "VALIDATOR")]
    pub disable: Vec<String>,
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum ReportFormat {
    /// Colorized terminal report
    Console,
    /// JSON mirroring the report structure
    Json,
    /// Standalone HTML page
    Html,
}

pub fn run(args: QaArgs, global: &GlobalOpts) -> Result<()> {
    let project = project(global);
    let config = load_config(&project);

    let mut qa_config = QaConfig::from(&config);
    if let Some(problems) = args.problems.filter(|n| *n > 0) {
        qa_config.problems_per_range = problems;
    }
    if args.all {
        qa_config.levels.clear();
    } else if !args.levels.is_empty() {
        qa_config.levels = args.levels.clone();
    }
    if args.seed.is_some() {
        qa_config.seed = args.seed;
    }
    for name in &args.disable {
        qa_config.toggles.disable(name).map_err(|e| miette::miette!("{}", e))?;
    }

    let format = report_format(&args, global, config.output.as_deref());

    let name = args.curriculum.clone().unwrap_or_else(|| config.curriculum());
    let expectations = load_curriculum(&name, &project)?;
    let generating = generating_curriculum(&expectations)?;
    if !std::ptr::eq(generating, &expectations) {
        tracing::info!(
            curriculum = %expectations.name,
            generator = %generating.name,
            "curriculum has no generators; auditing the built-in generator against it"
        );
    }

    let seed = qa_config.seed;
    let generator = Generator::new(generating, rng(seed));
    let mut tester = ProblemTester::new(generator, &expectations, qa_config);
    tracing::info!(validators = ?tester.validator_names(), "starting QA run");
    let mut report = tester.test_all_levels();

    let mut fixes = Vec::new();
    if args.auto_fix || args.review_fixes {
        let mut candidates = get_auto_fixable_issues(&report);
        if args.review_fixes {
            candidates = review(candidates)?;
        }
        let mut engine = FixEngine::new(project.root(), project.backup_dir(), args.dry_run);
        fixes = engine.apply_all_fixes(&candidates);
        report.record_fixes(&fixes);
        if args.dry_run && !fixes.is_empty() {
            eprintln!("{} Dry run: no files were changed", style("!").yellow());
        }
    }

    if args.output_path.is_some() {
        console::set_colors_enabled(false);
    }
    let rendered = match format {
        ReportFormat::Console => render_console(&report, &fixes),
        ReportFormat::Json => render_json(&report).map_err(|e| miette::miette!("{}", e))? + "\n",
        ReportFormat::Html => render_html(&report).map_err(|e| miette::miette!("{}", e))?,
    };
    write_output(&rendered, args.output_path.as_deref())?;
    log_fix_failures(&fixes);

    if report.passed() {
        Ok(())
    } else {
        Err(miette::miette!(
            "QA failed: {} of {} levels failed ({})",
            report.levels_failed.len(),
            report.levels_tested.len(),
            report
                .levels_failed
                .iter()
                .map(Level::to_string)
                .collect::<Vec<_>>()
                .join(", ")
        ))
    }
}

/// The curriculum that drives generation: the selected one when it declares
/// generators, otherwise the built-in table
fn generating_curriculum(expectations: &CurriculumSpec) -> Result<&CurriculumSpec> {
    let drives_generation = expectations
        .levels
        .iter()
        .flat_map(|level| &level.ranges)
        .any(|range| range.generator.is_some());
    if drives_generation {
        Ok(expectations)
    } else {
        builtin_curriculum().map_err(|e| miette::miette!("{}", e))
    }
}

/// `--output`, then `-f json`, then the configured default, then console
fn report_format(args: &QaArgs, global: &GlobalOpts, configured: Option<&str>) -> ReportFormat {
    if let Some(format) = args.output {
        return format;
    }
    if global.format == OutputFormat::Json {
        return ReportFormat::Json;
    }
    configured
        .and_then(|value| ReportFormat::from_str(value, true).ok())
        .unwrap_or(ReportFormat::Console)
}

/// Ask for confirmation of each fix
fn review(issues: Vec<Issue>) -> Result<Vec<Issue>> {
    let theme = ColorfulTheme::default();
    let mut accepted = Vec::new();
    for issue in issues {
        let Some(fix) = &issue.suggested_fix else {
            continue;
        };
        eprintln!(
            "\n{} {} ws {}: {}",
            style(issue.issue_type).red(),
            issue.level,
            issue.worksheet,
            issue.description
        );
        eprintln!("  {} {}", style("file:").dim(), fix.file);
        eprintln!("  {} {}", style("fix:").dim(), fix.explanation);
        let apply = Confirm::with_theme(&theme)
            .with_prompt("Apply this fix?")
            .default(false)
            .interact()
            .into_diagnostic()?;
        if apply {
            accepted.push(issue);
        }
    }
    Ok(accepted)
}

fn log_fix_failures(fixes: &[FixResult]) {
    for fix in fixes.iter().filter(|fix| !fix.success) {
        tracing::debug!(issue = %fix.issue_id, file = %fix.file, "fix not applied: {}", fix.message);
    }
}
