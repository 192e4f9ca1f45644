use std::path::Path;

use anyhow::{Result, bail};
use clap::Args;
use pipeline::{
    build::{BuildOptions, Builder, TargetSelection},
    fetch::HttpFetcher,
    recipe::Recipe,
    tools::ProcessToolRunner,
};

#[derive(Args, Debug)]
pub struct Command {
    /// Node IDs to check. Defaults to the public nodes.
    targets: Vec<String>,
}

/// Runs the subcommand.
pub fn run(cmd: &Command, recipe: Recipe, directory: &Path) -> Result<()> {
    let selection = if cmd.targets.is_empty() {
        TargetSelection::Default
    } else {
        TargetSelection::Named(super::parse_node_ids(&cmd.targets)?)
    };

    let builder = Builder::new(
        recipe,
        directory.to_owned(),
        BuildOptions {
            keep_going: true,
            dry_run: true,
            ..Default::default()
        },
        Box::new(ProcessToolRunner),
        Box::new(HttpFetcher::new()?),
    )?;
    let report = builder.build(&selection)?;
    super::print_report(&report);

    if !report.is_success() {
        bail!("some nodes cannot be built");
    }
    Ok(())
}
