// Little Lemon menu browser.
// Terminal UI over a local SQLite menu cache filled from the remote feed.

mod app;
mod cache;
mod config;
mod error;
mod feed;
mod logging;
mod menu;
mod profile;
mod state;
mod ui;

use tracing::{error, info};

use crate::app::App;
use crate::cache::{MenuStore, Preferences};
use crate::config::Config;
use crate::feed::FeedClient;
use crate::menu::MenuLoader;
use crate::profile::ProfileStore;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load()?;
    logging::init(&config)?;
    info!("Starting Little Lemon");
    config.log_resolved();

    let runtime = tokio::runtime::Runtime::new()?;
    let _guard = runtime.enter();

    let store = MenuStore::open(&config.database_path())?;
    let feed = FeedClient::new(&config.feed_url, &config.image_base_url)?;
    let profiles = ProfileStore::new(Preferences::open(config.preferences_path())?);
    let mut app = App::new(MenuLoader::new(store, feed), profiles, config.debounce)?;

    let mut terminal = ratatui::init();
    let result = app.run(&mut terminal);
    ratatui::restore();

    if let Err(e) = &result {
        error!(error = %e, "Terminal error");
    }
    info!("Exiting");
    Ok(result?)
}
