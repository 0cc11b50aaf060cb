use clap::{Parser, ValueEnum};
use cookbook::{Entry, NewEntry, domain::EntryKind};
use tracing::instrument;

use super::{OutputFormat, Paths, terminal};

/// Command arguments for `cookbook list`.
#[derive(Debug, Parser)]
pub struct List {
    /// Show only entries of this kind
    #[arg(long, value_enum)]
    kind: Option<KindFilter>,

    /// Output format
    #[arg(long, value_enum, default_value_t)]
    output: OutputFormat,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum KindFilter {
    Ingredient,
    Recipe,
}

impl KindFilter {
    const fn matches(self, kind: EntryKind) -> bool {
        matches!(
            (self, kind),
            (Self::Ingredient, EntryKind::Ingredient) | (Self::Recipe, EntryKind::Recipe)
        )
    }
}

impl List {
    #[instrument(level = "debug", skip(paths))]
    pub fn run(self, paths: &Paths) -> anyhow::Result<()> {
        let catalog = paths.open_catalog()?;
        let entries: Vec<&Entry> = catalog
            .cookbook()
            .iter()
            .filter(|entry| self.kind.is_none_or(|kind| kind.matches(entry.kind())))
            .collect();

        match self.output {
            OutputFormat::Pretty => {
                for line in render_table(&entries, terminal::terminal_width()) {
                    println!("{line}");
                }
            }
            OutputFormat::Json => {
                let entries: Vec<NewEntry> = entries.into_iter().map(NewEntry::from).collect();
                println!("{}", serde_json::to_string_pretty(&entries)?);
            }
        }

        Ok(())
    }
}

/// What an entry is made of, in one line.
fn details(entry: &Entry) -> String {
    match entry {
        Entry::Ingredient(ingredient) => format!("cook time {}", ingredient.cook_time()),
        Entry::Recipe(recipe) => recipe
            .required_items()
            .iter()
            .map(|item| format!("{} x{}", item.name(), item.quantity()))
            .collect::<Vec<_>>()
            .join(", "),
    }
}

/// Lays entries out in aligned columns, truncating the last column to fit
/// `width` when it is known.
fn render_table(entries: &[&Entry], width: Option<usize>) -> Vec<String> {
    const HEADERS: [&str; 3] = ["NAME", "TYPE", "DETAILS"];

    let rows: Vec<[String; 3]> = entries
        .iter()
        .map(|entry| {
            [
                entry.name().to_string(),
                entry.kind().to_string(),
                details(entry),
            ]
        })
        .collect();

    let name_width = rows
        .iter()
        .map(|row| row[0].len())
        .max()
        .unwrap_or(0)
        .max(HEADERS[0].len());
    let kind_width = rows
        .iter()
        .map(|row| row[1].len())
        .max()
        .unwrap_or(0)
        .max(HEADERS[1].len());

    let format_row = |row: [&str; 3]| {
        let line = format!(
            "{:<name_width$}  {:<kind_width$}  {}",
            row[0], row[1], row[2]
        );
        match width {
            Some(width) if line.chars().count() > width && width > 3 => {
                let mut truncated: String = line.chars().take(width - 3).collect();
                truncated.push_str("...");
                truncated
            }
            _ => line,
        }
    };

    std::iter::once(format_row(HEADERS))
        .chain(
            rows.iter()
                .map(|row| format_row([row[0].as_str(), row[1].as_str(), row[2].as_str()])),
        )
        .collect()
}

#[cfg(test)]
mod tests {
    use cookbook::{Cookbook, NewEntry, domain::RawRequiredItem};

    use super::*;

    fn omelette_cookbook() -> Cookbook {
        let mut cookbook = Cookbook::new();
        cookbook.create(NewEntry::ingredient("Egg", 1_i64)).unwrap();
        cookbook
            .create(NewEntry::recipe(
                "Omelette",
                vec![RawRequiredItem::new("Egg", 3_i64)],
            ))
            .unwrap();
        cookbook
    }

    #[test]
    fn renders_aligned_table() {
        let cookbook = omelette_cookbook();
        let entries: Vec<_> = cookbook.iter().collect();

        let lines = render_table(&entries, None);

        assert_eq!(
            lines,
            [
                "NAME      TYPE        DETAILS",
                "Egg       ingredient  cook time 1",
                "Omelette  recipe      Egg x3",
            ]
        );
    }

    #[test]
    fn truncates_to_terminal_width() {
        let cookbook = omelette_cookbook();
        let entries: Vec<_> = cookbook.iter().collect();

        let lines = render_table(&entries, Some(24));

        assert_eq!(lines[1], "Egg       ingredient ...");
        assert!(lines.iter().all(|line| line.chars().count() <= 24));
    }

    #[test]
    fn kind_filter() {
        assert!(KindFilter::Recipe.matches(EntryKind::Recipe));
        assert!(!KindFilter::Recipe.matches(EntryKind::Ingredient));
    }
}
