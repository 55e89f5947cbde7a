//! Application state for the payslip engine API.

use std::sync::Arc;

use crate::config::ConfigLoader;

/// Shared application state.
///
/// Only the loaded configuration is shared; each request carries its own
/// payslip state.
#[derive(Clone)]
pub struct AppState {
    config: Arc<ConfigLoader>,
}

impl AppState {
    /// Creates a new application state with the given configuration loader.
    pub fn new(config: ConfigLoader) -> Self {
        Self {
            config: Arc::new(config),
        }
    }

    /// Returns a reference to the configuration loader.
    pub fn config(&self) -> &ConfigLoader {
        &self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_app_state_shares_config_between_clones() {
        let state = AppState::new(ConfigLoader::load("./config/default").unwrap());
        let cloned = state.clone();

        assert!(std::ptr::eq(state.config(), cloned.config()));
    }
}
