//! Debouncing utilities for LSP notifications.

use std::future::Future;
use std::time::Duration;

use tower_lsp::lsp_types::Url;
use tracing::{debug, error};

use crate::state::{BackendState, SharedState};

/// Spawns a debounced validation task.
///
/// This function waits for `delay`, then checks if the document version is
/// still the same before triggering validation.
pub(crate) fn spawn_debounced_validation<F, Fut>(
    state: SharedState,
    uri: Url,
    version: i32,
    delay: Duration,
    validate_fn: F,
) where
    F: FnOnce(Url) -> Fut + Send + 'static,
    Fut: Future<Output = ()> + Send + 'static,
{
    tokio::spawn(async move {
        tokio::time::sleep(delay).await;

        if check_version(&state, &uri, version) {
            validate_fn(uri).await;
        } else {
            debug!("Skipping superseded validation of {} (version {})", uri, version);
        }
    });
}

/// Checks if the document version is still current.
fn check_version(state: &BackendState, uri: &Url, version: i32) -> bool {
    let docs = match state.documents.read() {
        Ok(g) => g,
        Err(e) => {
            error!("Documents lock poisoned: {}", e);
            return false;
        }
    };

    docs.get(uri)
        .map(|doc| doc.version == version)
        .unwrap_or(false)
}
