//! Subcommand implementations

pub mod check_config;
pub mod lint;
pub mod lsp;
