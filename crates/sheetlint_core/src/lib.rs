//! # sheetlint_core
//!
//! Incremental lint engine for sheetlint.
//!
//! A lint pass takes the spans edited since the previous pass, merges them,
//! widens them to the enclosing rule blocks, lints each resulting region
//! with the configured checker, and merges the fresh diagnostics into the
//! stored list. Diagnostics outside the recomputed regions are left alone.
//!
//! ## Example
//!
//! ```rust
//! use sheetlint_core::{LintSession, LinterConfig};
//! use sheetlint_text::{LineBuffer, Position, Span, TextEdit};
//!
//! # async fn run() -> Result<(), sheetlint_core::LinterError> {
//! let mut buffer = LineBuffer::new("a { color: red }\nb { top: 0 }");
//! let mut session = LintSession::from_config(&LinterConfig::default())?;
//! session.lint(&buffer).await;
//!
//! let edit = TextEdit::delete(Span::new(Position::new(0, 3), Position::new(0, 15)));
//! buffer.apply(&edit);
//! session.apply_edit(&edit);
//! session.lint(&buffer).await;
//!
//! assert_eq!(session.diagnostics().len(), 1);
//! # Ok(())
//! # }
//! ```

mod config;
mod dispatch;
mod error;
mod expand;
mod merge;
mod reconcile;
mod region;
mod session;
mod state;
mod tracker;
mod watchdog;

pub use config::{
    CONFIG_FILE_NAMES, ConfigProvider, DEFAULT_DEBOUNCE_MS, DEFAULT_WATCHDOG_MS, LinterConfig,
    PluginCommand, SharedConfigProvider, StaticConfigProvider,
};
pub use dispatch::{LintDispatcher, RegionOutcome, normalize};
pub use error::LinterError;
pub use expand::{BLOCK_TERMINATOR, BoundaryExpander, TERMINATORS_AFTER, TERMINATORS_BEFORE};
pub use merge::merge_spans;
pub use reconcile::{Reconciliation, reconcile};
pub use region::Region;
pub use session::{LintSession, PassReport};
pub use state::DocumentLintState;
pub use tracker::ChangeTracker;
pub use watchdog::{DEFAULT_BUDGET, Watchdog};

pub use sheetlint_plugin::{Checker, CheckerKind, ConfigSnapshot, Diagnostic, Severity};
