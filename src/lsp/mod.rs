//! LSP Server for ClassPad Basic programs
//!
//! Provides Language Server Protocol support for:
//! - Diagnostics for all-uppercase words, bounded by `maxNumberOfProblems`
//! - Per-document settings via `workspace/configuration`
//! - Completion for keywords, operators, Greek letters and function templates
//!
//! The same server backs every editor integration under `editors/`.

use std::path::PathBuf;

pub mod capabilities;
pub mod client;
pub mod completion;
pub mod document;
pub mod server;
pub mod settings;
pub mod validator;

pub use server::run_lsp_server;
pub use server::ClasspadLsp;

/// Default tracing filter for the server process
pub const DEFAULT_LOG_FILTER: &str = "classpad_lsp=info";

/// Process-level server configuration
#[derive(Debug, Clone)]
pub struct LspConfig {
    /// Replacement for the embedded completion catalog
    pub catalog_path: Option<PathBuf>,
    /// `tracing_subscriber::EnvFilter` directive
    pub log_filter: String,
}

impl Default for LspConfig {
    fn default() -> Self {
        Self {
            catalog_path: None,
            log_filter: DEFAULT_LOG_FILTER.to_string(),
        }
    }
}
