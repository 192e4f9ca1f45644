use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use generic_pipeline::node::Tag;
use pipeline::{NodeId, build::BuildReport, recipe::Recipe};
use simplelog::LevelFilter;

mod build;
mod status;
mod targets;
mod verify;

/// Builds JSON tables from pages of a PDF manual, rebuilding only what is out of date.
#[derive(Debug, Parser)]
struct Args {
    #[command(subcommand)]
    command: Option<Command>,

    /// Logging level.
    #[arg(long, default_value = "Warn", global = true)]
    log_level: LevelFilter,

    /// Directory to build in. Recipe paths are relative to it.
    #[arg(short = 'C', long, default_value = ".", global = true)]
    directory: PathBuf,

    /// YAML recipe to build, instead of the built-in one.
    #[arg(long, global = true)]
    recipe: Option<PathBuf>,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Builds the given targets (default).
    Build(build::Command),
    /// Reports which nodes are out of date, without building anything.
    Status(status::Command),
    /// Lists the nodes of the recipe.
    Targets,
    /// Summarises the JSON written by table extraction nodes.
    Verify(verify::Command),
}

pub fn run() -> Result<()> {
    let args = Args::parse();

    simplelog::SimpleLogger::init(args.log_level, simplelog::Config::default())
        .with_context(|| "configuring logging")?;

    let recipe = load_recipe(&args)?;

    use Command::*;
    match &args.command {
        None => build::run(&build::Command::default(), recipe, &args.directory),
        Some(Build(cmd)) => build::run(cmd, recipe, &args.directory),
        Some(Status(cmd)) => status::run(cmd, recipe, &args.directory),
        Some(Targets) => targets::run(&recipe),
        Some(Verify(cmd)) => verify::run(cmd, &recipe, &args.directory),
    }
}

fn load_recipe(args: &Args) -> Result<Recipe> {
    match &args.recipe {
        Some(path) => Recipe::load_path(path).with_context(|| format!("loading recipe {path:?}")),
        None => Recipe::builtin().context("loading built-in recipe"),
    }
}

fn parse_node_ids(ids: &[String]) -> Result<Vec<NodeId>> {
    ids.iter()
        .map(|id| NodeId::try_from(id.as_str()).with_context(|| format!("target {id:?}")))
        .collect()
}

fn parse_tags(tags: &[String]) -> Result<Vec<Tag>> {
    tags.iter()
        .map(|tag| Tag::try_from(tag.as_str()).with_context(|| format!("tag {tag:?}")))
        .collect()
}

fn print_report(report: &BuildReport) {
    for node in &report.nodes {
        println!("{}: {}", node.id, node.status);
    }
}
