// Declare modules
pub mod cli;
pub mod config;
pub mod formatter;
pub mod mkdocs;
pub mod models;
pub mod orchestrator;
pub mod planner;
pub mod prefix;
pub mod strategy;

use anyhow::{Context, Result};
use clap::Parser;
use log::LevelFilter;
use std::env;
use std::io::Write;
use std::path::Path;
use std::process::ExitCode;

use self::cli::{Cli, Command, CreateArgs};
use self::config::{resolve_config, write_starter_config, StructureConfig};
use self::formatter::OutputGenerator;
use self::models::{Outcome, RunState, StructureTree};
use self::orchestrator::create_structure;
use self::strategy::{ApplyError, ExecutionStrategy, Mode};

/// Exit code for a run the user cancelled.
const EXIT_ABORTED: u8 = 130;

fn init_logging(verbose: bool) {
    let level = if verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };
    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .format(|buf, record| writeln!(buf, "{}", record.args()))
        .init();
}

/// Parses arguments and dispatches the selected command.
pub fn run() -> Result<ExitCode> {
    let args = Cli::parse();
    init_logging(args.verbose);

    match args.command {
        Command::Init { force } => {
            let cwd = env::current_dir().context("Failed to get current directory")?;
            let path = write_starter_config(&cwd, force)?;
            log::info!("Created configuration file: {}", path.display());
            Ok(ExitCode::SUCCESS)
        }
        Command::Create(create) => create_docs(&create),
    }
}

fn create_docs(args: &CreateArgs) -> Result<ExitCode> {
    let config = resolve_config(args).context("Configuration error")?;
    let base = match &args.directory {
        Some(dir) => dir.clone(),
        None => env::current_dir().context("Failed to get current directory")?,
    };

    let mode = Mode::from_flags(args.dry_run, args.yes);
    let mut strategy = mode.build();
    let summary = create_structure(&config, strategy.as_mut(), Some(&base))?;

    if mode == Mode::DryRun {
        println!("{}", OutputGenerator::generate_tree(&summary.tree));
    }
    println!("{}", OutputGenerator::format_summary(&summary));

    match summary.state {
        RunState::Completed => {}
        RunState::Aborted => return Ok(ExitCode::from(EXIT_ABORTED)),
        RunState::Fatal { .. } => return Ok(ExitCode::FAILURE),
    }

    if config.generate_mkdocs() {
        return emit_navigation(&config, &summary.tree, strategy.as_mut(), &base);
    }
    Ok(ExitCode::SUCCESS)
}

fn emit_navigation(
    config: &StructureConfig,
    tree: &StructureTree,
    strategy: &mut dyn ExecutionStrategy,
    base: &Path,
) -> Result<ExitCode> {
    let settings = config
        .mkdocs()
        .context("generate_mkdocs requires a mkdocs_config section")?;
    let action = mkdocs::navigation_action(settings, tree).context("Failed to render mkdocs.yaml")?;
    let target = base.join(action.path());

    match strategy.apply(base, &action) {
        Ok(Outcome::Created) => log::info!("Generated {}", target.display()),
        Ok(Outcome::WouldCreate) => log::info!("Would generate {}", target.display()),
        Ok(Outcome::Skipped(_)) => log::info!("Skipping {}", target.display()),
        Ok(Outcome::Failed(reason)) => {
            log::error!("Could not generate {}: {}", target.display(), reason);
            return Ok(ExitCode::FAILURE);
        }
        Err(ApplyError::Aborted) => {
            log::warn!("Operation cancelled by user");
            return Ok(ExitCode::from(EXIT_ABORTED));
        }
        Err(err) => return Err(err).context("Failed to write mkdocs.yaml"),
    }
    Ok(ExitCode::SUCCESS)
}
