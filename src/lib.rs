//! Core library surface for the recipe book TUI.
//!
//! The catalog logic (index, repository, session) has no terminal
//! dependencies, so the `bin` target and the integration tests drive the same
//! pieces.
pub mod assistant;
pub mod config;
pub mod history;
pub mod index;
pub mod logging;
pub mod models;
pub mod repository;
pub mod session;
pub mod store;
pub mod ui;

pub use config::Config;
pub use models::Recipe;
pub use repository::{RecipeRepository, RepositoryError};
pub use session::Session;
pub use store::{JsonStore, RecipeStore, StoreError};

/// The interactive application entry point and state container.
pub use ui::{run_app, App};
