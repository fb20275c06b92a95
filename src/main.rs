//! Binary entry point: read the environment, open the JSON catalog, and drive
//! the Ratatui event loop until the user exits.
use log::info;
use recipe_book::{assistant, logging, run_app, App, Config, JsonStore, Session};

fn main() -> anyhow::Result<()> {
    let config = Config::from_env()?;
    logging::init(&config.log_file)?;
    info!(
        "starting with catalog at {} (assistant {})",
        config.data_file.display(),
        if config.assistant_enabled() { "enabled" } else { "disabled" }
    );

    let store = JsonStore::new(config.data_file.clone());
    let session = Session::open(Box::new(store), assistant::from_config(&config));

    let mut app = App::new(session);
    run_app(&mut app)
}
