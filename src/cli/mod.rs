//! CLI command handlers

use std::path::PathBuf;

use clap::Args;

use crate::lsp::{LspConfig, DEFAULT_LOG_FILTER};

pub mod commands;

pub use commands::{catalog, check};

/// Options shared by `classpad lsp` and the `classpad-lsp` binary
#[derive(Args, Debug, Clone)]
pub struct LspArgs {
    /// Communicate over stdin/stdout (the only transport; accepted for editor clients)
    #[arg(long)]
    pub stdio: bool,

    /// YAML file replacing the built-in completion catalog
    #[arg(long, env = "CLASSPAD_CATALOG")]
    pub catalog: Option<PathBuf>,

    /// Log filter directive, written to stderr
    #[arg(long, default_value = DEFAULT_LOG_FILTER, env = "CLASSPAD_LOG")]
    pub log_level: String,
}

impl LspArgs {
    pub fn into_config(self) -> LspConfig {
        LspConfig {
            catalog_path: self.catalog,
            log_filter: self.log_level,
        }
    }
}
