//! `drillsmith curriculum` command - Inspect and check curricula

use clap::Subcommand;
use console::style;
use miette::{IntoDiagnostic, Result};
use tabled::{builder::Builder, settings::Style};

use crate::cli::helpers::{load_config, load_curriculum, project, truncate_str};
use crate::cli::{GlobalOpts, OutputFormat};
use crate::core::level::Level;
use crate::curriculum::{builtin_names, CurriculumSpec, LevelSpec};

#[derive(Subcommand, Debug)]
pub enum CurriculumCommands {
    /// Show worksheet ranges per level
    Show(ShowArgs),

    /// Check ranges for gaps, overlaps and generator mismatches
    Check(CheckArgs),

    /// List the built-in curricula
    List,
}

#[derive(clap::Args, Debug)]
pub struct ShowArgs {
    /// Curriculum: built-in name, file under curricula/, or path to a YAML file
    #[arg(long, short = 'c')]
    pub curriculum: Option<String>,

    /// Only show this level
    #[arg(long, short = 'l')]
    pub level: Option<Level>,
}

#[derive(clap::Args, Debug)]
pub struct CheckArgs {
    /// Curriculum: built-in name, file under curricula/, or path to a YAML file
    #[arg(long, short = 'c')]
    pub curriculum: Option<String>,
}

pub fn run(cmd: CurriculumCommands, global: &GlobalOpts) -> Result<()> {
    match cmd {
        CurriculumCommands::Show(args) => show(args, global),
        CurriculumCommands::Check(args) => check(args, global),
        CurriculumCommands::List => {
            for name in builtin_names() {
                println!("{}", name);
            }
            Ok(())
        }
    }
}

fn resolve(name: Option<String>, global: &GlobalOpts) -> Result<CurriculumSpec> {
    let project = project(global);
    let name = name.unwrap_or_else(|| load_config(&project).curriculum());
    load_curriculum(&name, &project)
}

fn show(args: ShowArgs, global: &GlobalOpts) -> Result<()> {
    let spec = resolve(args.curriculum, global)?;
    let levels: Vec<&LevelSpec> = match args.level {
        Some(level) => vec![spec
            .level(level)
            .ok_or_else(|| miette::miette!("level {} is not part of curriculum '{}'", level, spec.name))?],
        None => spec.levels.iter().collect(),
    };

    match global.format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&levels).into_diagnostic()?);
        }
        OutputFormat::Yaml => {
            print!("{}", serde_yml::to_string(&levels).into_diagnostic()?);
        }
        OutputFormat::Auto => {
            println!("{} {}", style("Curriculum").bold(), style(&spec.name).cyan().bold());
            if !spec.description.is_empty() {
                println!("{}", spec.description);
            }
            let mut builder = Builder::default();
            builder.push_record(["Level", "Worksheets", "Type", "Skills", "Generator", "Description"]);
            for level in levels {
                for range in &level.ranges {
                    builder.push_record([
                        level.level.to_string(),
                        format!("{}-{}", range.start, range.end),
                        range.problem_type.to_string(),
                        truncate_str(&range.expected_skills.join(", "), 30),
                        range
                            .generator
                            .as_ref()
                            .map(|g| g.kind().to_string())
                            .unwrap_or_else(|| "-".to_string()),
                        truncate_str(&range.description, 40),
                    ]);
                }
            }
            println!("{}", builder.build().with(Style::markdown()));
        }
    }
    Ok(())
}

fn check(args: CheckArgs, global: &GlobalOpts) -> Result<()> {
    let spec = resolve(args.curriculum, global)?;
    let defects = spec.check();

    if global.format == OutputFormat::Json {
        let listed: Vec<serde_json::Value> = defects
            .iter()
            .map(|d| serde_json::json!({ "level": d.level, "message": d.message }))
            .collect();
        let value = serde_json::json!({
            "curriculum": spec.name,
            "levels": spec.levels.len(),
            "defects": listed,
        });
        println!("{}", serde_json::to_string_pretty(&value).into_diagnostic()?);
    } else if defects.is_empty() {
        let ranges: usize = spec.levels.iter().map(|l| l.ranges.len()).sum();
        println!(
            "{} Curriculum {} is sound: {} levels, {} ranges",
            style("✓").green().bold(),
            style(&spec.name).cyan(),
            spec.levels.len(),
            ranges
        );
    } else {
        for defect in &defects {
            println!("{} {}", style("✗").red(), defect);
        }
    }

    if defects.is_empty() {
        Ok(())
    } else {
        Err(miette::miette!(
            "Curriculum '{}' has {} defect(s)",
            spec.name,
            defects.len()
        ))
    }
}
