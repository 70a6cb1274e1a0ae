use crate::config::Config;
use crate::loader::ConfigLoader;

/// Shared application state
///
/// Built once at startup and handed to the router; holds nothing mutable.
#[derive(Clone)]
pub struct AppState {
    pub loader: ConfigLoader,
}

impl AppState {
    pub fn new(config: &Config) -> Self {
        Self {
            loader: ConfigLoader::new(config.config_file.clone()),
        }
    }
}
