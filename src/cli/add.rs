use clap::Subcommand;
use cookbook::domain::{NewEntry, RawInteger, RawRequiredItem};
use tracing::instrument;

use super::{Paths, terminal::Tone};

/// Parse a `NAME=QUANTITY` pair.
///
/// The quantity is kept as written so the cookbook reports bad values the same
/// way it does for any other caller.
fn parse_item(s: &str) -> Result<RawRequiredItem, String> {
    let (name, quantity) = s
        .rsplit_once('=')
        .ok_or_else(|| format!("expected NAME=QUANTITY, got '{s}'"))?;
    Ok(RawRequiredItem::new(name.trim(), RawInteger::from(quantity)))
}

#[derive(Debug, Subcommand)]
pub enum Add {
    /// Add a base ingredient
    Ingredient {
        /// The ingredient's name
        name: String,

        /// Time taken to prepare one unit
        #[arg(long, allow_hyphen_values = true)]
        cook_time: String,

        /// Normalize the name before adding it
        #[arg(long)]
        normalize: bool,
    },

    /// Add a recipe
    Recipe {
        /// The recipe's name
        name: String,

        /// A required item as NAME=QUANTITY (can be specified multiple times)
        #[arg(long = "item", value_name = "NAME=QUANTITY", value_parser = parse_item)]
        items: Vec<RawRequiredItem>,

        /// Normalize the recipe name before adding it
        #[arg(long)]
        normalize: bool,
    },
}

impl Add {
    #[instrument(skip(paths))]
    pub fn run(self, paths: &Paths) -> anyhow::Result<()> {
        let entry = self.into_entry()?;
        let mut catalog = paths.open_catalog()?;

        let added = catalog.add(entry)?;
        let message = format!("Added {} '{}'", added.kind(), added.name());

        catalog.save()?;
        println!("{}", Tone::Success.paint(&message));
        Ok(())
    }

    fn into_entry(self) -> anyhow::Result<NewEntry> {
        let entry = match self {
            Self::Ingredient {
                name,
                cook_time,
                normalize,
            } => NewEntry::ingredient(canonical(name, normalize)?, cook_time.as_str()),
            Self::Recipe {
                name,
                items,
                normalize,
            } => NewEntry::recipe(canonical(name, normalize)?, items),
        };
        Ok(entry)
    }
}

fn canonical(name: String, normalize: bool) -> anyhow::Result<String> {
    if normalize {
        Ok(cookbook::normalize(&name)?)
    } else {
        Ok(name)
    }
}
