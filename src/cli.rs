//! CLI module - command-line interface definitions and handlers
//!
//! Uses clap v4 with derive macros for argument parsing.

use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use colored::Colorize;
use itertools::Itertools;
use tracing::warn;

use crate::config::EngineConfig;
use crate::course::{
    CourseBuild, CourseBuilder, CourseDataLoader, ValidationResult, validate,
};
use crate::engine::{GamificationEngine, ProgressReport};
use crate::error::{AscentError, Result};
use crate::tree::{NodeStatus, StudentProgress, VisualizationData};

/// Ascent - turn Canvas course exports into a skill tree
#[derive(Parser, Debug)]
#[command(name = "ascent")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Enable machine-readable JSON output
    #[arg(long, global = true)]
    pub json: bool,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Engine config file (TOML)
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Validate a course export directory
    Validate {
        /// Directory with the exported course JSON files
        course_dir: PathBuf,
    },

    /// Show a student's progress report for a course
    Report {
        /// Directory with the exported course JSON files
        course_dir: PathBuf,

        /// Student progress snapshot (JSON); omit for a fresh student
        #[arg(long, value_name = "PATH")]
        progress: Option<PathBuf>,
    },

    /// Export skill tree visualization data
    Tree {
        /// Directory with the exported course JSON files
        course_dir: PathBuf,

        /// Student progress snapshot (JSON); omit for a fresh student
        #[arg(long, value_name = "PATH")]
        progress: Option<PathBuf>,
    },
}

pub fn run(cli: &Cli) -> Result<()> {
    let config = EngineConfig::load_or_default(cli.config.as_deref())?;

    match &cli.command {
        Commands::Validate { course_dir } => run_validate(cli, course_dir),
        Commands::Report {
            course_dir,
            progress,
        } => run_report(cli, &config, course_dir, progress.as_deref()),
        Commands::Tree {
            course_dir,
            progress,
        } => run_tree(cli, &config, course_dir, progress.as_deref()),
    }
}

fn run_validate(cli: &Cli, course_dir: &Path) -> Result<()> {
    let docs = CourseDataLoader::new(course_dir).load()?;
    let result = validate(&docs);

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else {
        print_findings(&result);
        if result.is_valid {
            println!(
                "{} {} is valid ({} warning(s))",
                "ok:".green().bold(),
                course_dir.display(),
                result.warnings.len()
            );
        }
    }

    if result.is_valid {
        Ok(())
    } else {
        Err(AscentError::CourseInvalid {
            errors: result.errors.len(),
        })
    }
}

fn run_report(
    cli: &Cli,
    config: &EngineConfig,
    course_dir: &Path,
    progress_path: Option<&Path>,
) -> Result<()> {
    let (build, progress) = load_course(config, course_dir, progress_path)?;
    let engine = GamificationEngine::new(build.tree, config.xp_system());
    let report = engine.progress_report(&progress);

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_report(engine.tree().name(), &report);
    }
    Ok(())
}

fn run_tree(
    cli: &Cli,
    config: &EngineConfig,
    course_dir: &Path,
    progress_path: Option<&Path>,
) -> Result<()> {
    let (build, progress) = load_course(config, course_dir, progress_path)?;
    let viz = build.tree.visualization_data(&progress);

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&viz)?);
    } else {
        print_tree(build.tree.name(), &viz);
    }
    Ok(())
}

/// Load, validate, and build. Shared by every command that needs a tree.
fn load_course(
    config: &EngineConfig,
    course_dir: &Path,
    progress_path: Option<&Path>,
) -> Result<(CourseBuild, StudentProgress)> {
    let docs = CourseDataLoader::new(course_dir).load()?;

    let result = validate(&docs);
    if !result.is_valid {
        print_findings(&result);
        return Err(AscentError::CourseInvalid {
            errors: result.errors.len(),
        });
    }

    let build = CourseBuilder::new()
        .with_name(tree_name(course_dir))
        .with_policy(config.unlock.unknown_requirements)
        .build(&docs)?;
    for warning in &build.warnings {
        warn!("{warning}");
    }

    let progress = match progress_path {
        Some(path) => StudentProgress::load(path)?,
        None => StudentProgress::default(),
    };
    Ok((build, progress))
}

/// Tree name from the course directory, `course` when the path has no
/// usable final component.
fn tree_name(course_dir: &Path) -> String {
    course_dir
        .file_name()
        .map_or_else(|| "course".to_string(), |n| n.to_string_lossy().into_owned())
}

fn print_findings(result: &ValidationResult) {
    for error in &result.errors {
        eprintln!("{} {error}", "error:".red().bold());
    }
    for warning in &result.warnings {
        eprintln!("{} {warning}", "warning:".yellow().bold());
    }
}

fn print_report(name: &str, report: &ProgressReport) {
    println!("{} {name}", "Course:".bold());
    println!(
        "  Level {} ({} XP into level, {} XP to next)",
        report.level_info.level, report.level_info.xp_into_level, report.level_info.xp_to_next
    );
    println!(
        "  Nodes unlocked: {}/{} ({:.1}%)",
        report.skill_tree_progress.unlocked_nodes,
        report.skill_tree_progress.total_nodes,
        report.skill_tree_progress.total_progress
    );
    println!("  Total XP: {}", report.skill_tree_progress.current_xp);
    println!(
        "  Badges earned: {}",
        report.skill_tree_progress.earned_badges
    );

    for (level, progress) in &report.skill_tree_progress.level_progress {
        println!(
            "    {level:<12} {}/{} ({:.1}%)",
            progress.unlocked, progress.total, progress.percent
        );
    }

    if !report.badges.is_empty() {
        let names = report.badges.iter().map(|b| b.name.as_str()).join(", ");
        println!("  {} {names}", "Eligible badges:".green().bold());
    }
    if !report.next_unlocks.is_empty() {
        let names = report
            .next_unlocks
            .iter()
            .map(|n| n.name.as_str())
            .join(", ");
        println!("  {} {names}", "Next up:".yellow().bold());
    }
}

fn print_tree(name: &str, viz: &VisualizationData) {
    println!("{} {name}", "Tree:".bold());
    for node in &viz.nodes {
        let status = match node.status {
            NodeStatus::Unlocked => "unlocked".green(),
            NodeStatus::Available => "available".yellow(),
            NodeStatus::Locked => "locked".red(),
        };
        println!("  {} [{}] {status}", node.id, node.level);
    }
    if !viz.edges.is_empty() {
        println!("{}", "Edges:".bold());
        for edge in &viz.edges {
            println!("  {} -> {}", edge.from, edge.to);
        }
    }
}
