//! In-memory catalog of ingredients and recipes.
//!
//! The [`Cookbook`] knows nothing about files or HTTP. It holds validated
//! [`Entry`] values keyed by their unique name, and the only way in is through
//! the validating `create` family of methods.

use std::{
    collections::{BTreeMap, HashMap},
    fmt,
    num::NonZeroU64,
};

use non_empty_string::NonEmptyString;
use petgraph::{algo::tarjan_scc, graphmap::DiGraphMap};
use thiserror::Error;
use tracing::{debug, instrument};

use crate::domain::entry::{
    Entry, EntryKind, Ingredient, NewEntry, RawInteger, RawRequiredItem, Recipe, RequiredItem,
};

/// The catalog of all entries, keyed by unique name.
///
/// Entries are never updated or removed once inserted.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Cookbook {
    /// `BTreeMap` so listings come out in name order.
    entries: BTreeMap<String, Entry>,
}

/// The field a [`CreateError::MissingField`] refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    /// The entry's own name.
    Name,
    /// The name of the required item at this index.
    ItemName(usize),
    /// The quantity of the required item at this index.
    ItemQuantity(usize),
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::Name => f.write_str("name"),
            Self::ItemName(index) => write!(f, "requiredItems[{index}].name"),
            Self::ItemQuantity(index) => write!(f, "requiredItems[{index}].quantity"),
        }
    }
}

/// Errors that can occur when adding an entry to the cookbook.
///
/// Validation stops at the first problem found.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CreateError {
    /// An entry with this name already exists, whatever its type.
    #[error("Cookbook already has an entry with name {0}")]
    DuplicateName(String),

    /// The type tag was neither `recipe` nor `ingredient`.
    #[error("Type must be recipe or ingredient, got '{0}'")]
    UnsupportedType(String),

    /// A required field was empty or absent.
    #[error("Entry '{entry}' is missing {field}")]
    MissingField {
        /// Name of the entry being created (empty if the name is what's missing).
        entry: String,
        /// The missing field.
        field: Field,
    },

    /// Two required items of one recipe share a name.
    #[error("Recipe '{recipe}' requiredItems can only have one element per name, '{item}' appears more than once")]
    DuplicateRequiredItem {
        /// Name of the recipe being created.
        recipe: String,
        /// The repeated item name.
        item: String,
    },

    /// A required item quantity is not an integer of at least 1.
    #[error("Quantity of '{item}' in recipe '{recipe}' must be an integer greater than or equal to 1, got {value}")]
    InvalidQuantity {
        /// Name of the recipe being created.
        recipe: String,
        /// Name of the offending item.
        item: String,
        /// The value as supplied.
        value: String,
    },

    /// An ingredient cook time is absent or not an integer of at least 0.
    #[error("Cook time of '{ingredient}' must be an integer greater than or equal to 0, got {value}")]
    InvalidCookTime {
        /// Name of the ingredient being created.
        ingredient: String,
        /// The value as supplied.
        value: String,
    },
}

/// A required item that points at a name the cookbook does not contain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct DanglingReference<'a> {
    /// The recipe holding the reference.
    pub recipe: &'a str,
    /// The name that could not be found.
    pub item: &'a str,
}

impl Cookbook {
    /// Creates an empty cookbook.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Finds an entry by exact name.
    #[must_use]
    pub fn lookup(&self, name: &str) -> Option<&Entry> {
        self.entries.get(name)
    }

    /// Whether an entry with this exact name exists.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    /// Number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the cookbook has no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterates over all entries in name order.
    pub fn iter(&self) -> impl Iterator<Item = &Entry> + '_ {
        self.entries.values()
    }

    /// Validates and stores an entry, dispatching on its type tag.
    ///
    /// The name collision check happens once, before the type is looked at.
    ///
    /// # Errors
    ///
    /// Returns the first [`CreateError`] found. The cookbook is unchanged on
    /// error.
    #[instrument(level = "debug", skip_all, fields(name = %entry.name, kind = %entry.kind))]
    pub fn create(&mut self, entry: NewEntry) -> Result<&Entry, CreateError> {
        let NewEntry {
            name,
            kind,
            cook_time,
            required_items,
        } = entry;

        let name = self.available_name(name)?;

        let entry = match EntryKind::from_tag(&kind) {
            Some(EntryKind::Ingredient) => {
                Entry::Ingredient(validate_ingredient(name, cook_time.as_ref())?)
            }
            Some(EntryKind::Recipe) => Entry::Recipe(validate_recipe(
                name,
                required_items.as_deref().unwrap_or_default(),
            )?),
            None => return Err(CreateError::UnsupportedType(kind)),
        };

        Ok(self.insert(entry))
    }

    /// Validates and stores an ingredient.
    ///
    /// # Errors
    ///
    /// Returns [`CreateError::DuplicateName`] if the name is taken, or
    /// [`CreateError::InvalidCookTime`] if the cook time is absent, not an
    /// integer, or negative.
    pub fn create_ingredient(
        &mut self,
        name: impl Into<String>,
        cook_time: Option<&RawInteger>,
    ) -> Result<&Entry, CreateError> {
        let name = self.available_name(name.into())?;
        let ingredient = validate_ingredient(name, cook_time)?;
        Ok(self.insert(Entry::Ingredient(ingredient)))
    }

    /// Validates and stores a recipe.
    ///
    /// # Errors
    ///
    /// Returns [`CreateError::DuplicateName`] if the name is taken. Items are
    /// then checked in order, each for [`CreateError::MissingField`],
    /// [`CreateError::DuplicateRequiredItem`], and
    /// [`CreateError::InvalidQuantity`].
    pub fn create_recipe(
        &mut self,
        name: impl Into<String>,
        required_items: &[RawRequiredItem],
    ) -> Result<&Entry, CreateError> {
        let name = self.available_name(name.into())?;
        let recipe = validate_recipe(name, required_items)?;
        Ok(self.insert(Entry::Recipe(recipe)))
    }

    /// Builds the dependency graph of the cookbook.
    ///
    /// Edges point from a recipe to each of its required items, weighted by
    /// quantity. Item names that do not exist in the cookbook still appear as
    /// nodes.
    #[must_use]
    pub fn dependency_graph(&self) -> DiGraphMap<&str, u64> {
        let mut graph = DiGraphMap::with_capacity(self.entries.len(), self.entries.len() * 2);

        for entry in self.entries.values() {
            graph.add_node(entry.name());
            if let Entry::Recipe(recipe) = entry {
                for item in recipe.required_items() {
                    graph.add_edge(recipe.name(), item.name(), item.quantity().get());
                }
            }
        }

        graph
    }

    /// Every required item that names a missing entry, in recipe order.
    #[must_use]
    pub fn dangling_references(&self) -> Vec<DanglingReference<'_>> {
        self.entries
            .values()
            .filter_map(|entry| match entry {
                Entry::Recipe(recipe) => Some(recipe),
                Entry::Ingredient(_) => None,
            })
            .flat_map(|recipe| {
                recipe
                    .required_items()
                    .iter()
                    .filter(move |item| !self.contains(item.name()))
                    .map(move |item| DanglingReference {
                        recipe: recipe.name(),
                        item: item.name(),
                    })
            })
            .collect()
    }

    /// Every group of recipes that requires itself, directly or transitively.
    ///
    /// Names within a group are sorted, as are the groups.
    #[must_use]
    pub fn cycles(&self) -> Vec<Vec<&str>> {
        let graph = self.dependency_graph();
        let mut cycles = Vec::new();

        for mut component in tarjan_scc(&graph) {
            if component.len() > 1 {
                component.sort_unstable();
                cycles.push(component);
                continue;
            }

            let Some(&node) = component.first() else {
                continue;
            };

            if graph.contains_edge(node, node) {
                cycles.push(vec![node]);
            }
        }

        cycles.sort();
        cycles
    }
}

impl Cookbook {
    /// Checks the new entry's name is present and not already taken.
    fn available_name(&self, name: String) -> Result<NonEmptyString, CreateError> {
        if self.contains(&name) {
            return Err(CreateError::DuplicateName(name));
        }

        NonEmptyString::new(name).map_err(|_| CreateError::MissingField {
            entry: String::new(),
            field: Field::Name,
        })
    }

    fn insert(&mut self, entry: Entry) -> &Entry {
        debug!(name = entry.name(), kind = %entry.kind(), "adding entry");
        self.entries.entry(entry.name().to_string()).or_insert(entry)
    }
}

fn validate_ingredient(
    name: NonEmptyString,
    cook_time: Option<&RawInteger>,
) -> Result<Ingredient, CreateError> {
    let Some(cook_time) = cook_time else {
        return Err(CreateError::InvalidCookTime {
            ingredient: name.to_string(),
            value: "nothing".to_string(),
        });
    };

    let Ok(value) = u64::try_from(cook_time.value()) else {
        return Err(CreateError::InvalidCookTime {
            ingredient: name.to_string(),
            value: cook_time.to_string(),
        });
    };

    Ok(Ingredient::new(name, value))
}

fn validate_recipe(
    name: NonEmptyString,
    raw_items: &[RawRequiredItem],
) -> Result<Recipe, CreateError> {
    let mut occurrences: HashMap<&str, usize> = HashMap::with_capacity(raw_items.len());
    for raw in raw_items {
        *occurrences.entry(raw.name.as_str()).or_default() += 1;
    }

    let mut items = Vec::with_capacity(raw_items.len());

    for (index, raw) in raw_items.iter().enumerate() {
        let missing = |field| CreateError::MissingField {
            entry: name.to_string(),
            field,
        };

        let item_name =
            NonEmptyString::new(raw.name.clone()).map_err(|_| missing(Field::ItemName(index)))?;

        let Some(quantity) = raw.quantity.as_ref().filter(|quantity| !quantity.is_empty()) else {
            return Err(missing(Field::ItemQuantity(index)));
        };

        if occurrences.get(raw.name.as_str()).copied().unwrap_or_default() > 1 {
            return Err(CreateError::DuplicateRequiredItem {
                recipe: name.to_string(),
                item: raw.name.clone(),
            });
        }

        let quantity = u64::try_from(quantity.value())
            .ok()
            .and_then(NonZeroU64::new)
            .ok_or_else(|| CreateError::InvalidQuantity {
                recipe: name.to_string(),
                item: raw.name.clone(),
                value: quantity.to_string(),
            })?;

        items.push(RequiredItem::new(item_name, quantity));
    }

    Ok(Recipe::new(name, items))
}
