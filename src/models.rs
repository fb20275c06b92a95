//! Domain model shared by the repository, the persistence layer, and the TUI.
//! A recipe is a plain data holder: the repository decides identity and
//! uniqueness, the store decides how it is written to disk.

use std::fmt;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
/// A single catalog entry. Field order matches the on-disk JSON objects.
pub struct Recipe {
    /// Unique identifying name. Uniqueness is case-insensitive, see
    /// [`name_key`].
    pub name: String,
    /// Ingredient lines in display order. Duplicates are allowed and nothing
    /// is parsed out of them.
    #[serde(default)]
    pub ingredients: Vec<String>,
    /// Instruction lines in step order.
    #[serde(default)]
    pub instructions: Vec<String>,
}

impl Recipe {
    /// Build a recipe from anything that converts into owned strings.
    pub fn new<N, I, S>(name: N, ingredients: I, instructions: S) -> Self
    where
        N: Into<String>,
        I: IntoIterator,
        I::Item: Into<String>,
        S: IntoIterator,
        S::Item: Into<String>,
    {
        Self {
            name: name.into(),
            ingredients: ingredients.into_iter().map(Into::into).collect(),
            instructions: instructions.into_iter().map(Into::into).collect(),
        }
    }

    /// Normalized lookup key for this recipe's name.
    pub fn key(&self) -> String {
        name_key(&self.name)
    }

    /// True when `name` refers to this recipe under case-insensitive rules.
    pub fn matches(&self, name: &str) -> bool {
        self.key() == name_key(name)
    }
}

impl fmt::Display for Recipe {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

/// Normalize a recipe name into the key used for comparisons: surrounding
/// whitespace is ignored and case is folded.
pub fn name_key(name: &str) -> String {
    name.trim().to_lowercase()
}
