//! Persistence collaborators. The repository only sees the [`RecipeStore`]
//! trait; the binary wires in the JSON file store and tests use the in-memory
//! one.

mod json;
mod memory;

use std::path::PathBuf;

use thiserror::Error;

use crate::models::Recipe;

pub use json::JsonStore;
pub use memory::MemoryStore;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("failed to encode recipes: {0}")]
    Encode(#[from] serde_json::Error),

    #[error("failed to write {}: {source}", path.display())]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("store is read-only")]
    ReadOnly,
}

/// Whole-collection persistence. Implementations overwrite the entire store
/// on every save and return records in the order they were saved.
pub trait RecipeStore {
    /// Load every stored recipe. A store that does not exist yet loads as an
    /// empty collection.
    fn load_all(&self) -> Result<Vec<Recipe>, StoreError>;

    /// Replace the stored collection with `recipes`.
    fn save_all(&self, recipes: &[Recipe]) -> Result<(), StoreError>;
}

impl<T: RecipeStore + ?Sized> RecipeStore for std::rc::Rc<T> {
    fn load_all(&self) -> Result<Vec<Recipe>, StoreError> {
        (**self).load_all()
    }

    fn save_all(&self, recipes: &[Recipe]) -> Result<(), StoreError> {
        (**self).save_all(recipes)
    }
}
