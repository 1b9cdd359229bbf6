//! `drillsmith generate` command - Print problems for a worksheet

use console::style;
use miette::{IntoDiagnostic, Result};

use crate::cli::helpers::{load_config, load_curriculum, project, rng};
use crate::cli::{GlobalOpts, OutputFormat};
use crate::core::level::Level;
use crate::entities::problem::{DisplayFormat, Problem};
use crate::generator::Generator;

#[derive(clap::Args, Debug)]
pub struct GenerateArgs {
    /// Level (6A-2A, A-O, XV, XM, XP, XS)
    #[arg(long, short = 'l')]
    pub level: Level,

    /// Worksheet number within the level
    #[arg(long, short = 'w')]
    pub worksheet: u32,

    /// Number of problems
    #[arg(long, short = 'n', default_value_t = 1)]
    pub count: usize,

    /// Seed for reproducible output
    #[arg(long)]
    pub seed: Option<u64>,

    /// Curriculum driving generation
    #[arg(long, short = 'c')]
    pub curriculum: Option<String>,
}

pub fn run(args: GenerateArgs, global: &GlobalOpts) -> Result<()> {
    let project = project(global);
    let config = load_config(&project);
    let name = args.curriculum.clone().unwrap_or_else(|| config.curriculum());
    let curriculum = load_curriculum(&name, &project)?;

    let mut generator = Generator::new(&curriculum, rng(args.seed.or(config.seed)));
    let problems = (0..args.count)
        .map(|_| generator.generate(args.level, args.worksheet))
        .collect::<Result<Vec<Problem>, _>>()
        .map_err(|e| miette::miette!("{}", e))?;

    match global.format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&problems).into_diagnostic()?);
        }
        OutputFormat::Yaml => {
            print!("{}", serde_yml::to_string(&problems).into_diagnostic()?);
        }
        OutputFormat::Auto => {
            for (index, problem) in problems.iter().enumerate() {
                if index > 0 {
                    println!();
                }
                print_problem(problem, global.verbose);
            }
        }
    }
    Ok(())
}

fn print_problem(problem: &Problem, verbose: bool) {
    println!(
        "{} {} ws {} {}/{}",
        style(&problem.id).dim(),
        style(problem.level).cyan(),
        problem.worksheet_number,
        problem.problem_type,
        problem.subtype
    );

    match (&problem.question, problem.display_format) {
        (_, DisplayFormat::Vertical)
            if problem.problem_type.is_basic_operation() && problem.operands.len() >= 2 =>
        {
            let width = problem
                .operands
                .iter()
                .map(|n| n.to_string().len())
                .max()
                .unwrap_or_default();
            let symbol = problem.problem_type.symbol().unwrap_or(" ");
            for (index, operand) in problem.operands.iter().enumerate() {
                let prefix = if index + 1 == problem.operands.len() { symbol } else { " " };
                println!("  {} {:>width$}", prefix, operand, width = width);
            }
            println!("  {}", "-".repeat(width + 2));
        }
        (Some(question), _) => println!("  {}", style(question).bold()),
        (None, _) => println!("  {:?}", problem.operands),
    }

    println!("  {} {}", style("answer:").dim(), style(&problem.correct_answer).green());
    for asset in &problem.visual_assets {
        println!("  {} {}", style("asset:").dim(), asset);
    }
    if verbose {
        for hint in &problem.graduated_hints {
            println!("  {} {}", style(format!("hint {}:", hint.level)).dim(), hint.text);
        }
    } else if let Some(hint) = problem.hints.first() {
        println!("  {} {}", style("hint:").dim(), hint);
    }
}
