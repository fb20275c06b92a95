//! Ratatui front end: the catalog list with its detail pane, the assistant
//! chat screen, and the modal forms layered over them.

mod app;
mod forms;
mod helpers;
mod screens;
mod terminal;

pub use app::App;
pub use terminal::run_app;
