//! Recipe Catalog
//!
//! A cookbook of ingredients and recipes. Recipes are built from other entries,
//! and can be resolved into a total cook time and a flat list of base
//! ingredients.

pub mod domain;
pub use domain::{
    normalize, Config, Cookbook, CreateError, Entry, NewEntry, ResolveError, Resolver, Summary,
};

/// Catalog file storage.
pub mod storage;
pub use storage::Catalog;

/// HTTP interface to a shared cookbook.
pub mod server;
