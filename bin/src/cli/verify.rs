use std::path::Path;

use anyhow::{Result, bail};
use clap::Args;
use pipeline::{recipe::Recipe, specs::TableExtract, verify};

#[derive(Args, Debug)]
pub struct Command {
    /// Table extraction node IDs to check. Defaults to all of them.
    targets: Vec<String>,
}

/// Runs the subcommand.
pub fn run(cmd: &Command, recipe: &Recipe, directory: &Path) -> Result<()> {
    let wanted = super::parse_node_ids(&cmd.targets)?;
    for id in &wanted {
        match recipe.nodes.iter().find(|node| &node.id == id) {
            Some(node) if <&TableExtract>::try_from(&node.spec).is_ok() => {}
            Some(_) => bail!("{id} is not a table extraction node"),
            None => bail!("no node with ID {id}"),
        }
    }

    let mut failures = 0;
    for node in &recipe.nodes {
        let Ok(spec) = <&TableExtract>::try_from(&node.spec) else {
            continue;
        };
        if !wanted.is_empty() && !wanted.contains(&node.id) {
            continue;
        }
        match verify::summarise_table_json(&spec.output.under(directory)) {
            Ok(summary) => println!("{}: {summary}", node.id),
            Err(err) => {
                failures += 1;
                println!("{}: {:#}", node.id, anyhow::Error::from(err));
            }
        }
    }

    if failures > 0 {
        bail!("{failures} output(s) failed verification");
    }
    Ok(())
}
