use std::{num::NonZeroUsize, path::Path};

use anyhow::{Result, bail};
use clap::Args;
use pipeline::{
    build::{BuildOptions, Builder, TargetSelection},
    fetch::HttpFetcher,
    recipe::Recipe,
    tools::{PageSlicerKind, ProcessToolRunner},
};

#[derive(Args, Debug)]
pub struct Command {
    /// Node IDs to build, along with whatever they are built from. Defaults to the public nodes.
    pub(super) targets: Vec<String>,

    /// Build the nodes carrying any of these tags instead of named targets.
    #[arg(long, value_delimiter(','), conflicts_with = "targets")]
    pub(super) tags: Vec<String>,

    /// Keep building whatever does not depend on a failed node.
    #[arg(short, long)]
    pub(super) keep_going: bool,

    /// Print what would be built, without building it.
    #[arg(short = 'n', long)]
    pub(super) dry_run: bool,

    /// Maximum number of external programs to run at once.
    #[arg(short, long, default_value = "1")]
    pub(super) jobs: NonZeroUsize,

    /// Page slicing program to use, overriding the recipe.
    #[arg(long)]
    pub(super) page_slicer: Option<PageSlicerKind>,
}

impl Default for Command {
    fn default() -> Self {
        Self {
            targets: Vec::new(),
            tags: Vec::new(),
            keep_going: false,
            dry_run: false,
            jobs: NonZeroUsize::MIN,
            page_slicer: None,
        }
    }
}

impl Command {
    pub fn selection(&self) -> Result<TargetSelection> {
        Ok(if !self.targets.is_empty() {
            TargetSelection::Named(super::parse_node_ids(&self.targets)?)
        } else if !self.tags.is_empty() {
            TargetSelection::Tagged(super::parse_tags(&self.tags)?)
        } else {
            TargetSelection::Default
        })
    }

    fn options(&self) -> BuildOptions {
        BuildOptions {
            keep_going: self.keep_going,
            dry_run: self.dry_run,
            jobs: self.jobs,
        }
    }
}

/// Runs the subcommand.
pub fn run(cmd: &Command, mut recipe: Recipe, directory: &Path) -> Result<()> {
    if let Some(kind) = cmd.page_slicer {
        recipe.tools.page_slicer.kind = kind;
        recipe.tools.page_slicer.program = None;
    }

    log::info!("Building in {directory:?}.");
    let builder = Builder::new(
        recipe,
        directory.to_owned(),
        cmd.options(),
        Box::new(ProcessToolRunner),
        Box::new(HttpFetcher::new()?),
    )?;
    let report = builder.build(&cmd.selection()?)?;
    super::print_report(&report);

    if !report.is_success() {
        bail!("build failed");
    }
    Ok(())
}
