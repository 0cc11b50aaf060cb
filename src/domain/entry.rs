//! Cookbook entries and their raw, unvalidated counterparts.
//!
//! [`Entry`] is what the [`Cookbook`](crate::Cookbook) stores once validation
//! has passed. [`NewEntry`] is the shape callers hand in (an HTTP body, a
//! catalog file record, a CLI invocation) before anything has been checked.

use std::{fmt, num::NonZeroU64};

use non_empty_string::NonEmptyString;
use serde::{Deserialize, Serialize};

/// A validated entry in the cookbook.
///
/// Entries are immutable once stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Entry {
    /// A base ingredient with a fixed cook time.
    Ingredient(Ingredient),
    /// A recipe built from other entries.
    Recipe(Recipe),
}

impl Entry {
    /// The entry's unique name.
    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            Self::Ingredient(ingredient) => ingredient.name(),
            Self::Recipe(recipe) => recipe.name(),
        }
    }

    /// Which variant this entry is.
    #[must_use]
    pub const fn kind(&self) -> EntryKind {
        match self {
            Self::Ingredient(_) => EntryKind::Ingredient,
            Self::Recipe(_) => EntryKind::Recipe,
        }
    }
}

/// The variant tag of an [`Entry`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum EntryKind {
    /// See [`Entry::Ingredient`].
    Ingredient,
    /// See [`Entry::Recipe`].
    Recipe,
}

impl EntryKind {
    /// The tag used for this kind in creation payloads.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Ingredient => "ingredient",
            Self::Recipe => "recipe",
        }
    }

    /// Parses a creation payload type tag.
    ///
    /// Tags are matched exactly; `"Recipe"` is not a recipe.
    #[must_use]
    pub fn from_tag(tag: &str) -> Option<Self> {
        match tag {
            "ingredient" => Some(Self::Ingredient),
            "recipe" => Some(Self::Recipe),
            _ => None,
        }
    }
}

impl fmt::Display for EntryKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A base ingredient.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ingredient {
    name: NonEmptyString,
    cook_time: u64,
}

impl Ingredient {
    pub(crate) const fn new(name: NonEmptyString, cook_time: u64) -> Self {
        Self { name, cook_time }
    }

    /// The ingredient's name.
    #[must_use]
    pub fn name(&self) -> &str {
        self.name.as_str()
    }

    /// Time taken to prepare one unit of this ingredient.
    #[must_use]
    pub const fn cook_time(&self) -> u64 {
        self.cook_time
    }
}

/// A recipe: an ordered list of other entries, each with a quantity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Recipe {
    name: NonEmptyString,
    required_items: Vec<RequiredItem>,
}

impl Recipe {
    pub(crate) const fn new(name: NonEmptyString, required_items: Vec<RequiredItem>) -> Self {
        Self {
            name,
            required_items,
        }
    }

    /// The recipe's name.
    #[must_use]
    pub fn name(&self) -> &str {
        self.name.as_str()
    }

    /// The entries this recipe needs, in the order they were declared.
    ///
    /// Item names are pairwise distinct.
    #[must_use]
    pub fn required_items(&self) -> &[RequiredItem] {
        &self.required_items
    }
}

/// A reference from a recipe to another entry, by name.
///
/// The referenced entry is not required to exist when the recipe is created.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequiredItem {
    name: NonEmptyString,
    quantity: NonZeroU64,
}

impl RequiredItem {
    pub(crate) const fn new(name: NonEmptyString, quantity: NonZeroU64) -> Self {
        Self { name, quantity }
    }

    /// Name of the referenced entry.
    #[must_use]
    pub fn name(&self) -> &str {
        self.name.as_str()
    }

    /// How many units of the referenced entry are needed.
    #[must_use]
    pub const fn quantity(&self) -> NonZeroU64 {
        self.quantity
    }
}

/// Sentinel standing in for any integer field that does not parse.
///
/// It fails both the cook time (`>= 0`) and quantity (`>= 1`) checks, so an
/// unparseable value and an out of range value produce the same error.
pub const INVALID_INTEGER: i64 = -1;

/// An integer field as supplied by a caller.
///
/// Payloads may carry integers as numbers or as strings; anything else is kept
/// so it can be reported, but never parses.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawInteger {
    /// A native integer.
    Integer(i64),
    /// A string that may contain an integer.
    Text(String),
    /// Any other value (floats, booleans, lists, ...).
    Other(serde_json::Value),
}

impl RawInteger {
    /// The parsed value, or [`INVALID_INTEGER`] if the field is not an
    /// integer.
    ///
    /// Surrounding whitespace in strings is ignored. A whole-valued number
    /// such as `2.0` counts as the integer it equals; a fractional one such as
    /// `2.5` is rejected rather than truncated, as is a string like `"2.0"`.
    #[must_use]
    pub fn value(&self) -> i64 {
        match self {
            Self::Integer(n) => *n,
            Self::Text(text) => text.trim().parse().unwrap_or(INVALID_INTEGER),
            Self::Other(serde_json::Value::Number(number)) => number
                .as_f64()
                .and_then(|float| float.to_string().parse().ok())
                .unwrap_or(INVALID_INTEGER),
            Self::Other(_) => INVALID_INTEGER,
        }
    }

    /// Whether the field was supplied as an empty string.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        matches!(self, Self::Text(text) if text.is_empty())
    }
}

impl From<i64> for RawInteger {
    fn from(value: i64) -> Self {
        Self::Integer(value)
    }
}

impl From<u64> for RawInteger {
    fn from(value: u64) -> Self {
        i64::try_from(value).map_or_else(|_| Self::Text(value.to_string()), Self::Integer)
    }
}

impl From<&str> for RawInteger {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl fmt::Display for RawInteger {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::Integer(n) => write!(f, "{n}"),
            Self::Text(text) => write!(f, "{text:?}"),
            Self::Other(value) => write!(f, "{value}"),
        }
    }
}

/// A required item as supplied by a caller.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct RawRequiredItem {
    /// Name of the referenced entry. Empty if missing.
    #[serde(default)]
    pub name: String,
    /// Quantity of the referenced entry.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quantity: Option<RawInteger>,
}

impl RawRequiredItem {
    /// Creates a raw item from a name and a quantity.
    pub fn new(name: impl Into<String>, quantity: impl Into<RawInteger>) -> Self {
        Self {
            name: name.into(),
            quantity: Some(quantity.into()),
        }
    }
}

/// An unvalidated request to add an entry to the cookbook.
///
/// This is also the wire and file format of an entry: `cookTime` for
/// ingredients, `requiredItems` for recipes, and a `type` tag choosing between
/// them.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewEntry {
    /// Name of the new entry. Empty if missing.
    #[serde(default)]
    pub name: String,

    /// Type tag, `"ingredient"` or `"recipe"`. Empty if missing.
    #[serde(rename = "type", default)]
    pub kind: String,

    /// Cook time of an ingredient.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cook_time: Option<RawInteger>,

    /// Required items of a recipe.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub required_items: Option<Vec<RawRequiredItem>>,
}

impl NewEntry {
    /// A request for an ingredient.
    pub fn ingredient(name: impl Into<String>, cook_time: impl Into<RawInteger>) -> Self {
        Self {
            name: name.into(),
            kind: EntryKind::Ingredient.as_str().to_string(),
            cook_time: Some(cook_time.into()),
            required_items: None,
        }
    }

    /// A request for a recipe.
    pub fn recipe(name: impl Into<String>, required_items: Vec<RawRequiredItem>) -> Self {
        Self {
            name: name.into(),
            kind: EntryKind::Recipe.as_str().to_string(),
            cook_time: None,
            required_items: Some(required_items),
        }
    }
}

impl From<&Entry> for NewEntry {
    fn from(entry: &Entry) -> Self {
        match entry {
            Entry::Ingredient(ingredient) => Self::ingredient(ingredient.name(), ingredient.cook_time()),
            Entry::Recipe(recipe) => Self::recipe(
                recipe.name(),
                recipe
                    .required_items()
                    .iter()
                    .map(|item| RawRequiredItem::new(item.name(), item.quantity().get()))
                    .collect(),
            ),
        }
    }
}
