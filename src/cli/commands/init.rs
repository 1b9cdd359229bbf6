//! `drillsmith init` command - Initialize a new project

use console::style;
use miette::{IntoDiagnostic, Result};

use crate::core::project::{Project, ProjectError, PROJECT_FILE};

#[derive(clap::Args, Debug)]
pub struct InitArgs {
    /// Directory to initialize (default: current directory)
    #[arg(default_value = ".")]
    pub path: std::path::PathBuf,

    /// Overwrite an existing drillsmith.yaml
    #[arg(long)]
    pub force: bool,
}

pub fn run(args: InitArgs) -> Result<()> {
    let path = if args.path.as_os_str() == "." {
        std::env::current_dir().into_diagnostic()?
    } else {
        args.path.clone()
    };

    if !path.exists() {
        std::fs::create_dir_all(&path).into_diagnostic()?;
        println!(
            "{} Created directory {}",
            style("✓").green(),
            style(path.display()).cyan()
        );
    }

    match Project::init(&path, args.force) {
        Ok(project) => {
            println!(
                "{} Initialized drillsmith project at {}",
                style("✓").green(),
                style(project.root().display()).cyan()
            );
            println!();
            println!("Created:");
            println!("  {}", PROJECT_FILE);
            println!("  curricula/");
            println!("  .drillsmith/backups/");
            println!();
            println!("Next steps:");
            println!(
                "  {} Run the QA pipeline over level C",
                style("drillsmith qa --level C").yellow()
            );
            println!(
                "  {} Preview a worksheet",
                style("drillsmith generate --level A --worksheet 1 -n 5").yellow()
            );
            Ok(())
        }
        Err(ProjectError::AlreadyExists(path)) => {
            println!(
                "{} drillsmith project already exists at {}",
                style("!").yellow(),
                style(path.display()).cyan()
            );
            println!();
            println!(
                "Use {} to reinitialize",
                style("drillsmith init --force").yellow()
            );
            Ok(())
        }
        Err(e) => Err(miette::miette!("{}", e)),
    }
}
