//! Domain models for the cookbook.
//!
//! This module contains the core types: entries, the cookbook that stores them,
//! the resolver that expands recipes, name normalization, and configuration.

/// Cookbook entries (ingredients and recipes) and raw creation payloads.
pub mod entry;
pub use entry::{Entry, EntryKind, Ingredient, NewEntry, RawInteger, RawRequiredItem, Recipe, RequiredItem};

/// The validated in-memory store of entries.
pub mod cookbook;
pub use cookbook::{CreateError, Cookbook, DanglingReference};

/// Recipe resolution.
pub mod resolver;
pub use resolver::{IngredientQuantity, ResolveError, Resolver, Summary};

pub mod name;
pub use name::normalize;

mod config;
pub use config::Config;
