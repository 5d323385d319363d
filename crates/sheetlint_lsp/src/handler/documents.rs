//! Document lifecycle handlers (open, change, close).

use tower_lsp::lsp_types::*;
use tracing::{debug, error, warn};

use crate::conversion::to_text_edit;
use crate::state::{DocumentData, SharedState};

/// Handles the `textDocument/didOpen` notification.
pub fn handle_did_open(state: &SharedState, params: DidOpenTextDocumentParams) -> Url {
    debug!("Document opened: {}", params.text_document.uri);

    match state.documents.write() {
        Ok(mut docs) => {
            docs.insert(
                params.text_document.uri.clone(),
                DocumentData::new(params.text_document.text, params.text_document.version),
            );
        }
        Err(e) => error!("Documents lock poisoned: {}", e),
    }

    params.text_document.uri
}

/// Handles the `textDocument/didChange` notification.
///
/// Applies each change to the stored buffer in order and queues it for the
/// document's session. Returns the URI and version for debounced validation.
pub fn handle_did_change(
    state: &SharedState,
    params: DidChangeTextDocumentParams,
) -> Option<(Url, i32)> {
    debug!("Document changed: {}", params.text_document.uri);

    let uri = params.text_document.uri;
    let version = params.text_document.version;

    let mut docs = match state.documents.write() {
        Ok(guard) => guard,
        Err(e) => {
            error!("Documents lock poisoned: {}", e);
            return None;
        }
    };
    let Some(doc) = docs.get_mut(&uri) else {
        warn!("Change for a document that is not open: {}", uri);
        return None;
    };

    for change in &params.content_changes {
        let edit = to_text_edit(change, &doc.buffer);
        doc.buffer.apply(&edit);
        doc.pending.push(edit);
    }
    doc.version = version;

    Some((uri, version))
}

/// Handles the `textDocument/didClose` notification.
pub fn handle_did_close(state: &SharedState, params: DidCloseTextDocumentParams) -> Url {
    debug!("Document closed: {}", params.text_document.uri);

    match state.documents.write() {
        Ok(mut docs) => {
            docs.remove(&params.text_document.uri);
        }
        Err(e) => error!("Documents lock poisoned: {}", e),
    }

    params.text_document.uri
}
