//! Exact-name lookup over a snapshot of the catalog.
//!
//! The index is a plain (unbalanced) binary search tree keyed by the
//! normalized recipe name. Nodes live in an arena and point at recipes by
//! their position in the repository's collection, so the tree never owns or
//! copies recipe data. It is rebuilt wholesale after every mutation.

use crate::models::{name_key, Recipe};

/// Position of a recipe inside the repository's collection.
pub type Slot = usize;

#[derive(Debug, Clone)]
struct Node {
    key: String,
    slot: Slot,
    left: Option<usize>,
    right: Option<usize>,
}

/// Outcome of a lookup, including how many nodes were visited.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Probe {
    pub slot: Option<Slot>,
    pub steps: usize,
}

#[derive(Debug, Clone, Default)]
pub struct RecipeIndex {
    nodes: Vec<Node>,
    root: Option<usize>,
}

impl RecipeIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build an index by inserting every recipe in collection order.
    pub fn build(recipes: &[Recipe]) -> Self {
        let mut index = Self {
            nodes: Vec::with_capacity(recipes.len()),
            root: None,
        };
        for (slot, recipe) in recipes.iter().enumerate() {
            index.insert(recipe, slot);
        }
        index
    }

    /// Insert `recipe`, stored at `slot` in the collection. Keys strictly
    /// less than a node go left; equal or greater keys go right, so a
    /// duplicate key lands behind the first one and is never reached by
    /// [`search`](Self::search).
    pub fn insert(&mut self, recipe: &Recipe, slot: Slot) {
        let key = recipe.key();
        let id = self.nodes.len();

        let Some(mut current) = self.root else {
            self.nodes.push(Node {
                key,
                slot,
                left: None,
                right: None,
            });
            self.root = Some(id);
            return;
        };

        loop {
            let node = &mut self.nodes[current];
            let next = if key < node.key {
                &mut node.left
            } else {
                &mut node.right
            };
            match *next {
                Some(child) => current = child,
                None => {
                    *next = Some(id);
                    break;
                }
            }
        }

        self.nodes.push(Node {
            key,
            slot,
            left: None,
            right: None,
        });
    }

    /// Exact, case-insensitive lookup. `None` means "absent", callers fall
    /// back to scanning the collection.
    pub fn search(&self, name: &str) -> Option<Slot> {
        self.probe(name).slot
    }

    /// Same walk as [`search`](Self::search), also reporting the number of
    /// nodes compared before the walk stopped.
    pub fn probe(&self, name: &str) -> Probe {
        let key = name_key(name);
        let mut steps = 0;
        let mut current = self.root;

        while let Some(id) = current {
            let node = &self.nodes[id];
            steps += 1;
            if key == node.key {
                return Probe {
                    slot: Some(node.slot),
                    steps,
                };
            }
            current = if key < node.key { node.left } else { node.right };
        }

        Probe { slot: None, steps }
    }

    /// Number of nodes on the longest root-to-leaf path.
    pub fn depth(&self) -> usize {
        let mut deepest = 0;
        let mut stack: Vec<(usize, usize)> = self.root.map(|id| (id, 1)).into_iter().collect();

        while let Some((id, level)) = stack.pop() {
            deepest = deepest.max(level);
            let node = &self.nodes[id];
            stack.extend(node.left.map(|child| (child, level + 1)));
            stack.extend(node.right.map(|child| (child, level + 1)));
        }

        deepest
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn clear(&mut self) {
        self.nodes.clear();
        self.root = None;
    }
}
