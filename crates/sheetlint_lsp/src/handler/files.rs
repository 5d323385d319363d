//! Watched file handlers.

use tower_lsp::lsp_types::*;
use tracing::{debug, info};

use sheetlint_core::CONFIG_FILE_NAMES;

use crate::config::reload_config;
use crate::state::BackendState;

/// Handles the `workspace/didChangeWatchedFiles` notification.
///
/// Returns true if the configuration was reloaded.
pub fn handle_did_change_watched_files(
    state: &BackendState,
    params: DidChangeWatchedFilesParams,
) -> bool {
    debug!("Watched files changed: {:?}", params.changes);

    let config_changed = params.changes.iter().any(|change| {
        let path = change.uri.path();
        CONFIG_FILE_NAMES.iter().any(|name| path.ends_with(name))
    });

    if config_changed {
        info!("Configuration file changed, reloading...");
        return reload_config(state);
    }
    false
}
