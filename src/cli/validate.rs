use clap::Parser;
use cookbook::Cookbook;
use serde::Serialize;
use tracing::instrument;

use super::{OutputFormat, Paths, terminal::Tone};

#[derive(Debug, Parser)]
#[command(about = "Check the catalog for broken references and cycles")]
pub struct Validate {
    /// Output format
    #[arg(long, value_name = "FORMAT", value_enum, default_value_t)]
    output: OutputFormat,
}

#[derive(Debug, Default, Serialize, PartialEq, Eq)]
struct ValidationResult {
    broken_references: Vec<BrokenReference>,
    cycles: Vec<Vec<String>>,
}

#[derive(Debug, Serialize, PartialEq, Eq)]
struct BrokenReference {
    recipe: String,
    item: String,
}

impl ValidationResult {
    fn check(cookbook: &Cookbook) -> Self {
        let broken_references = cookbook
            .dangling_references()
            .into_iter()
            .map(|reference| BrokenReference {
                recipe: reference.recipe.to_string(),
                item: reference.item.to_string(),
            })
            .collect();

        let cycles = cookbook
            .cycles()
            .into_iter()
            .map(|cycle| cycle.into_iter().map(str::to_string).collect())
            .collect();

        Self {
            broken_references,
            cycles,
        }
    }

    fn issue_count(&self) -> usize {
        self.broken_references.len() + self.cycles.len()
    }
}

impl Validate {
    #[instrument(level = "debug", skip(paths))]
    pub fn run(self, paths: &Paths) -> anyhow::Result<()> {
        let catalog = paths.open_catalog()?;
        let result = ValidationResult::check(catalog.cookbook());

        match self.output {
            OutputFormat::Pretty => Self::output_pretty(&result, catalog.cookbook().len()),
            OutputFormat::Json => Self::output_json(&result)?,
        }

        if result.issue_count() > 0 {
            std::process::exit(2);
        }

        Ok(())
    }

    fn output_pretty(result: &ValidationResult, entries: usize) {
        if result.broken_references.is_empty() {
            println!("✓ References: all {entries} entries resolve");
        } else {
            println!(
                "{}",
                Tone::Warning.paint(&format!(
                    "✗ References: {} broken references",
                    result.broken_references.len()
                ))
            );
            for reference in &result.broken_references {
                println!("    {} requires missing '{}'", reference.recipe, reference.item);
            }
        }

        if result.cycles.is_empty() {
            println!("✓ Cycles:     no recipe requires itself");
        } else {
            println!(
                "{}",
                Tone::Warning.paint(&format!("✗ Cycles:     {} cycles found", result.cycles.len()))
            );
            for cycle in &result.cycles {
                println!("    {}", cycle.join(", "));
            }
        }

        let total = result.issue_count();
        if total == 0 {
            println!("\n{}", Tone::Success.paint("Catalog is healthy (0 issues)"));
        } else {
            println!("\n{}", Tone::Warning.paint(&format!("Summary: {total} issues found")));
            println!(
                "{}",
                Tone::Hint.paint("Recipes with issues cannot be summarized until they are fixed")
            );
        }
    }

    fn output_json(result: &ValidationResult) -> anyhow::Result<()> {
        use serde_json::json;

        let output = json!({
            "status": if result.issue_count() == 0 { "healthy" } else { "issues_found" },
            "issues": result,
            "summary": { "total_issues": result.issue_count() }
        });

        println!("{}", serde_json::to_string_pretty(&output)?);
        Ok(())
    }
}
