//! LSP request/notification handlers.

mod documents;
mod files;
mod initialize;

pub use documents::{handle_did_change, handle_did_close, handle_did_open};
pub use files::handle_did_change_watched_files;
pub use initialize::{handle_initialize, handle_initialized, handle_shutdown};
