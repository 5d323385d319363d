//! LSP Backend state management.

use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, RwLock};
use std::time::Duration;

use sheetlint_core::{Checker, LintSession, LinterConfig, SharedConfigProvider};
use sheetlint_text::{LineBuffer, TextEdit};
use tokio::sync::Mutex;
use tower_lsp::lsp_types::Url;
use tracing::error;

/// A document's lint session, locked for the duration of a pass.
pub(crate) type SessionHandle = Arc<Mutex<LintSession>>;

/// Document content, version and lint session.
pub(crate) struct DocumentData {
    pub buffer: LineBuffer,
    pub version: i32,
    /// Edits applied to `buffer` that the session has not seen yet.
    pub pending: Vec<TextEdit>,
    /// Created on first validation; dropped when the config changes.
    pub session: Option<SessionHandle>,
}

impl DocumentData {
    pub fn new(text: impl Into<String>, version: i32) -> Self {
        Self {
            buffer: LineBuffer::new(text),
            version,
            pending: Vec::new(),
            session: None,
        }
    }
}

impl fmt::Debug for DocumentData {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DocumentData")
            .field("version", &self.version)
            .field("pending", &self.pending.len())
            .field("session", &self.session.is_some())
            .finish()
    }
}

/// What new sessions are built from.
pub(crate) struct Engine {
    /// Checker shared by all sessions (None if the config could not build one).
    pub checker: Option<Arc<Checker>>,
    pub provider: SharedConfigProvider,
    pub watchdog_budget: Duration,
    pub debounce: Duration,
}

impl Engine {
    pub fn from_config(config: &LinterConfig) -> Self {
        let checker = match config.build_checker() {
            Ok(checker) => Some(Arc::new(checker)),
            Err(e) => {
                error!("Failed to build checker: {}. LSP will run without linting.", e);
                None
            }
        };
        Self {
            checker,
            provider: SharedConfigProvider::new(config.snapshot()),
            watchdog_budget: config.watchdog_budget(),
            debounce: config.debounce(),
        }
    }

    /// Takes over `config`, keeping the provider shared with existing sessions.
    pub fn reconfigure(&mut self, config: &LinterConfig) {
        let next = Self::from_config(config);
        self.provider.replace(config.snapshot());
        self.checker = next.checker;
        self.watchdog_budget = next.watchdog_budget;
        self.debounce = next.debounce;
    }

    pub fn new_session(&self) -> Option<LintSession> {
        let checker = self.checker.clone()?;
        Some(
            LintSession::new(checker, Arc::new(self.provider.clone()))
                .with_watchdog_budget(self.watchdog_budget),
        )
    }
}

/// Shared backend state.
pub(crate) struct BackendState {
    /// Open documents.
    pub documents: RwLock<HashMap<Url, DocumentData>>,
    pub engine: RwLock<Engine>,
    /// Workspace root path.
    pub workspace_root: RwLock<Option<std::path::PathBuf>>,
}

impl fmt::Debug for BackendState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BackendState")
            .field("documents", &"<HashMap<Url, DocumentData>>")
            .field("engine", &"<Engine>")
            .field("workspace_root", &self.workspace_root)
            .finish()
    }
}

impl BackendState {
    /// Creates a state with the default configuration.
    pub fn new() -> Self {
        Self::with_config(&LinterConfig::default())
    }

    pub fn with_config(config: &LinterConfig) -> Self {
        Self {
            documents: RwLock::new(HashMap::new()),
            engine: RwLock::new(Engine::from_config(config)),
            workspace_root: RwLock::new(None),
        }
    }

    /// Returns the document's session, creating it if needed.
    pub fn session_for(&self, uri: &Url) -> Option<SessionHandle> {
        let engine = match self.engine.read() {
            Ok(g) => g,
            Err(e) => {
                error!("Engine lock poisoned: {}", e);
                return None;
            }
        };
        let mut docs = match self.documents.write() {
            Ok(g) => g,
            Err(e) => {
                error!("Documents lock poisoned: {}", e);
                return None;
            }
        };
        let doc = docs.get_mut(uri)?;
        if doc.session.is_none() {
            doc.session = Some(Arc::new(Mutex::new(engine.new_session()?)));
            // A fresh session lints everything on its first pass.
            doc.pending.clear();
        }
        doc.session.clone()
    }

    /// Takes the current text, version and unseen edits of a document.
    pub fn take_snapshot(&self, uri: &Url) -> Option<(LineBuffer, i32, Vec<TextEdit>)> {
        let mut docs = match self.documents.write() {
            Ok(g) => g,
            Err(e) => {
                error!("Documents lock poisoned: {}", e);
                return None;
            }
        };
        let doc = docs.get_mut(uri)?;
        Some((
            doc.buffer.clone(),
            doc.version,
            std::mem::take(&mut doc.pending),
        ))
    }

    /// Returns true if the document is open at `version` with no unseen edits
    /// and `session` is still its session.
    pub fn is_current(&self, uri: &Url, version: i32, session: &SessionHandle) -> bool {
        match self.documents.read() {
            Ok(docs) => docs.get(uri).is_some_and(|doc| {
                doc.version == version
                    && doc.pending.is_empty()
                    && doc.session.as_ref().is_some_and(|s| Arc::ptr_eq(s, session))
            }),
            Err(e) => {
                error!("Documents lock poisoned: {}", e);
                false
            }
        }
    }

    /// Drops every session so the next validation starts from scratch.
    pub fn reset_sessions(&self) -> Vec<Url> {
        match self.documents.write() {
            Ok(mut docs) => docs
                .iter_mut()
                .map(|(uri, doc)| {
                    doc.session = None;
                    doc.pending.clear();
                    uri.clone()
                })
                .collect(),
            Err(e) => {
                error!("Documents lock poisoned: {}", e);
                Vec::new()
            }
        }
    }

    pub fn debounce(&self) -> Duration {
        match self.engine.read() {
            Ok(engine) => engine.debounce,
            Err(_) => Duration::from_millis(sheetlint_core::DEFAULT_DEBOUNCE_MS),
        }
    }
}

impl Default for BackendState {
    fn default() -> Self {
        Self::new()
    }
}

/// Type alias for shared state.
pub(crate) type SharedState = Arc<BackendState>;
