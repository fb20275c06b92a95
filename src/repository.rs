//! Canonical recipe storage. The repository owns the ordered collection,
//! enforces case-insensitive name uniqueness, and after every mutation
//! rebuilds the index and hands the full collection to the store, in that
//! order.

use log::{debug, info, warn};
use thiserror::Error;

use crate::index::RecipeIndex;
use crate::models::{name_key, Recipe};
use crate::store::{RecipeStore, StoreError};

#[derive(Error, Debug)]
pub enum RepositoryError {
    #[error("Recipe name cannot be empty.")]
    InvalidName,

    #[error("A recipe with name '{0}' already exists.")]
    DuplicateName(String),

    #[error("No recipe named '{0}'.")]
    NotFound(String),

    /// The in-memory change was applied; only writing it out failed.
    #[error("Failed to save recipes: {0}")]
    PersistenceFailure(#[from] StoreError),
}

pub struct RecipeRepository {
    recipes: Vec<Recipe>,
    index: RecipeIndex,
    store: Box<dyn RecipeStore>,
}

impl RecipeRepository {
    /// Create an empty repository backed by `store` without reading from it.
    pub fn new(store: Box<dyn RecipeStore>) -> Self {
        Self {
            recipes: Vec::new(),
            index: RecipeIndex::new(),
            store,
        }
    }

    /// Create a repository and load whatever `store` currently holds. A store
    /// that cannot be read starts the session with an empty catalog.
    pub fn open(store: Box<dyn RecipeStore>) -> Self {
        let mut repository = Self::new(store);
        match repository.store.load_all() {
            Ok(records) => repository.load(records),
            Err(err) => warn!("starting with an empty catalog: {err}"),
        }
        repository
    }

    /// Replace the collection wholesale. Nothing is persisted.
    pub fn load(&mut self, records: Vec<Recipe>) {
        self.recipes = records;
        self.rebuild_index();
        info!("loaded {} recipes", self.recipes.len());
    }

    pub fn create(&mut self, mut recipe: Recipe) -> Result<(), RepositoryError> {
        recipe.name = validated_name(&recipe.name)?;
        if self.position(&recipe.name).is_some() {
            return Err(RepositoryError::DuplicateName(recipe.name));
        }

        info!("creating recipe '{}'", recipe.name);
        self.recipes.push(recipe);
        self.commit()
    }

    /// Replace the fields of the recipe currently named `old_name`. The
    /// recipe keeps its position in the collection.
    pub fn update(&mut self, old_name: &str, mut recipe: Recipe) -> Result<(), RepositoryError> {
        recipe.name = validated_name(&recipe.name)?;
        let position = self
            .position(old_name)
            .ok_or_else(|| RepositoryError::NotFound(old_name.trim().to_string()))?;

        let renamed = name_key(old_name) != recipe.key();
        if renamed && self.position(&recipe.name).is_some() {
            return Err(RepositoryError::DuplicateName(recipe.name));
        }

        info!("updating recipe '{}' as '{}'", old_name.trim(), recipe.name);
        self.recipes[position] = recipe;
        self.commit()
    }

    /// Remove the recipe named `name`, ignoring case. Deleting a name that is
    /// not present still refreshes the index and the store. Returns whether a
    /// recipe was removed.
    pub fn delete(&mut self, name: &str) -> Result<bool, RepositoryError> {
        let removed = match self.position(name) {
            Some(position) => {
                let recipe = self.recipes.remove(position);
                info!("deleted recipe '{}'", recipe.name);
                true
            }
            None => {
                debug!("delete of missing recipe '{}' ignored", name.trim());
                false
            }
        };
        self.commit()?;
        Ok(removed)
    }

    /// Discard the index and re-insert every recipe in collection order.
    pub fn rebuild_index(&mut self) {
        self.index = RecipeIndex::build(&self.recipes);
    }

    /// Exact, case-insensitive lookup through the index.
    pub fn search(&self, name: &str) -> Option<&Recipe> {
        self.index
            .search(name)
            .and_then(|slot| self.recipes.get(slot))
    }

    /// Linear lookup over the collection, independent of the index.
    pub fn get(&self, name: &str) -> Option<&Recipe> {
        self.position(name).map(|position| &self.recipes[position])
    }

    pub fn recipes(&self) -> &[Recipe] {
        &self.recipes
    }

    pub fn index(&self) -> &RecipeIndex {
        &self.index
    }

    pub fn len(&self) -> usize {
        self.recipes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.recipes.is_empty()
    }

    fn position(&self, name: &str) -> Option<usize> {
        let key = name_key(name);
        self.recipes.iter().position(|recipe| recipe.key() == key)
    }

    fn commit(&mut self) -> Result<(), RepositoryError> {
        self.rebuild_index();
        self.store.save_all(&self.recipes).map_err(|err| {
            warn!("recipes changed in memory but were not saved: {err}");
            RepositoryError::from(err)
        })
    }
}

fn validated_name(name: &str) -> Result<String, RepositoryError> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        Err(RepositoryError::InvalidName)
    } else {
        Ok(trimmed.to_string())
    }
}
