//! A cookbook persisted as a YAML catalog file.
//!
//! The file lists entries in creation order using the same shape as a creation
//! payload:
//!
//! ```yaml
//! entries:
//!   - name: Eggs
//!     type: ingredient
//!     cookTime: 1
//!   - name: Cake
//!     type: recipe
//!     requiredItems:
//!       - name: Eggs
//!         quantity: 3
//! ```
//!
//! Loading replays every record through [`Cookbook::create`], so a catalog file
//! can never produce a cookbook that the validated creation path could not.

use std::{
    fs::File,
    io::{self, BufReader, BufWriter},
    path::{Path, PathBuf},
};

use serde::{Deserialize, Serialize};
use tracing::instrument;

use crate::domain::{Cookbook, CreateError, Entry, NewEntry};

/// Errors that can occur when reading or writing a catalog file.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The catalog file could not be read or written.
    #[error("failed to access catalog file {}: {source}", .path.display())]
    Io {
        /// Path of the catalog file.
        path: PathBuf,
        /// Underlying I/O error.
        source: io::Error,
    },

    /// The catalog file is not valid YAML, or does not have the catalog
    /// shape.
    #[error("failed to parse catalog file {}: {source}", .path.display())]
    Parse {
        /// Path of the catalog file.
        path: PathBuf,
        /// Underlying YAML error.
        source: serde_yaml::Error,
    },

    /// The cookbook could not be serialized.
    #[error("failed to serialize catalog: {0}")]
    Serialize(#[source] serde_yaml::Error),

    /// A record in the catalog file was rejected by the cookbook.
    #[error("invalid entry #{index} in catalog file {}: {source}", .path.display())]
    Entry {
        /// Path of the catalog file.
        path: PathBuf,
        /// Zero-based position of the record in the file.
        index: usize,
        /// Why the record was rejected.
        source: CreateError,
    },

    /// A new entry was rejected by the cookbook.
    #[error(transparent)]
    Create(#[from] CreateError),
}

/// On-disk layout of a catalog file.
#[derive(Debug, Default, Serialize, Deserialize)]
struct CatalogFile {
    #[serde(default)]
    entries: Vec<NewEntry>,
}

/// A [`Cookbook`] bound to the catalog file it was loaded from.
///
/// Entries are written back in creation order, which is the only order in
/// which replaying them is guaranteed to succeed.
#[derive(Debug)]
pub struct Catalog {
    path: PathBuf,
    cookbook: Cookbook,
    order: Vec<String>,
}

impl Catalog {
    /// An empty catalog that will be saved to `path`.
    #[must_use]
    pub fn empty(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            cookbook: Cookbook::new(),
            order: Vec::new(),
        }
    }

    /// Loads the catalog at `path`.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed, or if any record
    /// is rejected by [`Cookbook::create`]. Loading stops at the first rejected
    /// record.
    #[instrument]
    pub fn load(path: impl Into<PathBuf> + std::fmt::Debug) -> Result<Self, Error> {
        let path = path.into();
        let file = File::open(&path).map_err(|source| Error::Io {
            path: path.clone(),
            source,
        })?;

        let contents: CatalogFile =
            serde_yaml::from_reader(BufReader::new(file)).map_err(|source| Error::Parse {
                path: path.clone(),
                source,
            })?;

        let mut catalog = Self::empty(path);
        for (index, entry) in contents.entries.into_iter().enumerate() {
            if let Err(source) = catalog.insert(entry).map(|_| ()) {
                return Err(Error::Entry {
                    path: catalog.path,
                    index,
                    source,
                });
            }
        }

        tracing::debug!(entries = catalog.order.len(), "loaded catalog");
        Ok(catalog)
    }

    /// Loads the catalog at `path`, or starts an empty one if the file does
    /// not exist yet.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be loaded.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, Error> {
        let path = path.into();
        if path.exists() {
            Self::load(path)
        } else {
            tracing::debug!(path = %path.display(), "no catalog file, starting empty");
            Ok(Self::empty(path))
        }
    }

    /// Writes the catalog back to its file.
    ///
    /// Parent directories are created if they don't exist.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be written.
    #[instrument(skip(self), fields(path = %self.path.display()))]
    pub fn save(&self) -> Result<(), Error> {
        let io_error = |source| Error::Io {
            path: self.path.clone(),
            source,
        };

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(io_error)?;
        }

        let contents = CatalogFile {
            entries: self.entries().map(NewEntry::from).collect(),
        };

        let file = File::create(&self.path).map_err(io_error)?;
        serde_yaml::to_writer(BufWriter::new(file), &contents).map_err(Error::Serialize)?;

        tracing::debug!(entries = contents.entries.len(), "saved catalog");
        Ok(())
    }

    /// Validates and stores a new entry.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Create`] if the cookbook rejects the entry.
    pub fn add(&mut self, entry: NewEntry) -> Result<&Entry, Error> {
        Ok(self.insert(entry)?)
    }

    fn insert(&mut self, entry: NewEntry) -> Result<&Entry, CreateError> {
        let name = entry.name.clone();
        let stored = self.cookbook.create(entry)?;
        self.order.push(name);
        Ok(stored)
    }

    /// Entries in creation order.
    pub fn entries(&self) -> impl Iterator<Item = &Entry> + '_ {
        self.order
            .iter()
            .filter_map(|name| self.cookbook.lookup(name))
    }

    /// The path this catalog is loaded from and saved to.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// The catalog's cookbook.
    #[must_use]
    pub const fn cookbook(&self) -> &Cookbook {
        &self.cookbook
    }

    /// Releases the cookbook, detaching it from the file.
    #[must_use]
    pub fn into_cookbook(self) -> Cookbook {
        self.cookbook
    }
}
