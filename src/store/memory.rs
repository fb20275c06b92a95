use std::cell::{Cell, RefCell};

use super::{RecipeStore, StoreError};
use crate::models::Recipe;

/// In-process store. Saves can be switched off to simulate a failing disk.
#[derive(Debug, Default)]
pub struct MemoryStore {
    recipes: RefCell<Vec<Recipe>>,
    read_only: Cell<bool>,
    saves: Cell<usize>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_recipes(recipes: Vec<Recipe>) -> Self {
        Self {
            recipes: RefCell::new(recipes),
            ..Self::default()
        }
    }

    /// Make every subsequent save fail with [`StoreError::ReadOnly`].
    pub fn set_read_only(&self, read_only: bool) {
        self.read_only.set(read_only);
    }

    /// Snapshot of what was last saved.
    pub fn stored(&self) -> Vec<Recipe> {
        self.recipes.borrow().clone()
    }

    /// Number of successful saves so far.
    pub fn save_count(&self) -> usize {
        self.saves.get()
    }
}

impl RecipeStore for MemoryStore {
    fn load_all(&self) -> Result<Vec<Recipe>, StoreError> {
        Ok(self.recipes.borrow().clone())
    }

    fn save_all(&self, recipes: &[Recipe]) -> Result<(), StoreError> {
        if self.read_only.get() {
            return Err(StoreError::ReadOnly);
        }
        *self.recipes.borrow_mut() = recipes.to_vec();
        self.saves.set(self.saves.get() + 1);
        Ok(())
    }
}
