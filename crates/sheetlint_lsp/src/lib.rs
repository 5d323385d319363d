//! sheetlint LSP Server
//!
//! Language Server Protocol implementation for sheetlint.
//! Edits arrive incrementally; each document keeps a lint session that
//! relints only the blocks around what changed.

mod config;
mod conversion;
mod debounce;
mod handler;
mod state;

use std::sync::Arc;

use tower_lsp::jsonrpc::Result;
use tower_lsp::lsp_types::*;
use tower_lsp::{Client, LanguageServer, LspService, Server};
use tracing::{debug, error, info, warn};

use crate::conversion::to_lsp_diagnostic;
use crate::debounce::spawn_debounced_validation;
use crate::state::{BackendState, SharedState};

/// The LSP backend for sheetlint.
#[derive(Clone)]
pub struct Backend {
    /// LSP client for sending notifications.
    client: Client,
    /// Shared state
    state: SharedState,
}

impl Backend {
    /// Creates a new backend with the given client.
    ///
    /// The default configuration applies until `initialize` finds a config file.
    pub fn new(client: Client) -> Self {
        Self {
            client,
            state: Arc::new(BackendState::new()),
        }
    }

    /// Runs a lint pass over a document and publishes diagnostics.
    ///
    /// The session lock serializes passes per document. Edits that arrive
    /// while a pass runs are queued and picked up by the next pass; results
    /// of a pass that was overtaken by such edits are not published.
    async fn validate_document(&self, uri: &Url) {
        debug!("Validating document: {}", uri);

        let Some(handle) = self.state.session_for(uri) else {
            debug!("Linting not available, skipping {}", uri);
            return;
        };
        let mut session = handle.lock().await;

        let Some((buffer, version, edits)) = self.state.take_snapshot(uri) else {
            return;
        };
        for edit in &edits {
            session.apply_edit(edit);
        }

        let report = session.lint(&buffer).await;
        if report.timed_out {
            warn!("Reconciliation timed out for {}", uri);
        }
        if !self.state.is_current(uri, version, &handle) {
            debug!("Document {} or its session changed during the pass; not publishing", uri);
            return;
        }

        let diagnostics: Vec<Diagnostic> = session
            .diagnostics()
            .iter()
            .map(|d| to_lsp_diagnostic(d, &buffer))
            .collect();
        drop(session);

        self.client
            .publish_diagnostics(uri.clone(), diagnostics, Some(version))
            .await;
    }

    /// Validates every open document.
    async fn validate_all(&self) {
        let uris: Vec<Url> = match self.state.documents.read() {
            Ok(docs) => docs.keys().cloned().collect(),
            Err(e) => {
                error!("Documents lock poisoned: {}", e);
                return;
            }
        };
        for uri in uris {
            self.validate_document(&uri).await;
        }
    }
}

#[tower_lsp::async_trait]
impl LanguageServer for Backend {
    async fn initialize(&self, params: InitializeParams) -> Result<InitializeResult> {
        handler::handle_initialize(&self.state, params)
    }

    async fn initialized(&self, _: InitializedParams) {
        handler::handle_initialized(&self.client).await;
    }

    async fn shutdown(&self) -> Result<()> {
        handler::handle_shutdown().await
    }

    async fn did_open(&self, params: DidOpenTextDocumentParams) {
        let uri = handler::handle_did_open(&self.state, params);
        self.validate_document(&uri).await;
    }

    async fn did_change(&self, params: DidChangeTextDocumentParams) {
        let Some((uri, version)) = handler::handle_did_change(&self.state, params) else {
            return;
        };

        let backend = self.clone();
        spawn_debounced_validation(
            self.state.clone(),
            uri,
            version,
            self.state.debounce(),
            move |uri| async move {
                backend.validate_document(&uri).await;
            },
        );
    }

    async fn did_save(&self, params: DidSaveTextDocumentParams) {
        debug!("Document saved: {}", params.text_document.uri);
        self.validate_document(&params.text_document.uri).await;
    }

    async fn did_change_watched_files(&self, params: DidChangeWatchedFilesParams) {
        if handler::handle_did_change_watched_files(&self.state, params) {
            self.validate_all().await;
        }
    }

    async fn did_close(&self, params: DidCloseTextDocumentParams) {
        let uri = handler::handle_did_close(&self.state, params);

        // Clear diagnostics
        self.client.publish_diagnostics(uri, vec![], None).await;
    }
}

/// Starts the LSP server.
///
/// This function does not return unless an error occurs or the server shuts down.
pub async fn run() {
    info!("sheetlint LSP server starting...");

    let stdin = tokio::io::stdin();
    let stdout = tokio::io::stdout();

    let (service, socket) = LspService::new(Backend::new);
    Server::new(stdin, stdout, socket).serve(service).await;
}
