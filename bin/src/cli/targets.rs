use anyhow::Result;
use pipeline::{recipe::Recipe, specs::SpecDiscriminants};

/// Runs the subcommand.
pub fn run(recipe: &Recipe) -> Result<()> {
    let any_public = recipe.nodes.iter().any(|node| node.public);
    for node in &recipe.nodes {
        let mut tags: Vec<String> = node.tags.iter().map(ToString::to_string).collect();
        tags.sort();
        let default = if node.public || !any_public {
            " (default)"
        } else {
            ""
        };
        println!(
            "{}{default}\n  type: {}\n  file: {}\n  tags: {}",
            node.id,
            SpecDiscriminants::from(&node.spec),
            node.spec.artifact_path().display(),
            tags.join(", "),
        );
    }
    Ok(())
}
