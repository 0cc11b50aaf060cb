use clap::Parser;
use cookbook::Summary as RecipeSummary;
use tracing::instrument;

use super::{OutputFormat, Paths, terminal::Tone};

#[derive(Debug, Parser)]
pub struct Summary {
    /// The recipe to resolve
    name: String,

    /// Output format
    #[arg(long, value_enum, default_value_t)]
    output: OutputFormat,
}

impl Summary {
    #[instrument(skip(paths))]
    pub fn run(self, paths: &Paths) -> anyhow::Result<()> {
        let catalog = paths.open_catalog()?;
        let summary = catalog.cookbook().summarize(&self.name)?;

        match self.output {
            OutputFormat::Pretty => {
                println!("{}", Tone::Heading.paint(&summary.name));
                for line in render(&summary) {
                    println!("{line}");
                }
            }
            OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&summary)?),
        }

        Ok(())
    }
}

/// Renders the body of a summary, below its title.
fn render(summary: &RecipeSummary) -> Vec<String> {
    let cook_time = format!("  Cook time:   {}", summary.cook_time);

    if summary.ingredients.is_empty() {
        return vec![cook_time, "  Ingredients: none".to_string()];
    }

    let width = summary
        .ingredients
        .iter()
        .map(|line| line.name.len())
        .max()
        .unwrap_or(0);

    [cook_time, "  Ingredients:".to_string()]
        .into_iter()
        .chain(
            summary
                .ingredients
                .iter()
                .map(|line| format!("    {:<width$}  x{}", line.name, line.quantity)),
        )
        .collect()
}
