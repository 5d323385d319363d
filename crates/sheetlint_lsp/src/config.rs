//! Configuration management for LSP server.

use tracing::{error, info};

use sheetlint_core::LinterConfig;

use crate::state::BackendState;

/// Reloads configuration from the workspace root.
///
/// Returns true if a config file was loaded. Every open document then
/// starts over with a full pass.
pub fn reload_config(state: &BackendState) -> bool {
    let path = match state.workspace_root.read() {
        Ok(root) => match root.as_ref() {
            Some(p) => p.clone(),
            None => return false,
        },
        Err(e) => {
            error!("Workspace root lock poisoned: {}", e);
            return false;
        }
    };

    let Some(config_path) = LinterConfig::discover(&path) else {
        return false;
    };
    info!("Found config file: {}", config_path.display());

    let config = match LinterConfig::from_file(&config_path) {
        Ok(config) => config,
        Err(e) => {
            error!("Failed to load config: {}", e);
            return false;
        }
    };

    match state.engine.write() {
        Ok(mut engine) => engine.reconfigure(&config),
        Err(e) => {
            error!("Engine lock poisoned: {}", e);
            return false;
        }
    }
    let reset = state.reset_sessions();
    info!(
        documents = reset.len(),
        "Loaded configuration from workspace"
    );
    true
}
