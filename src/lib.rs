//! ClassPad Basic language server
//!
//! This library provides the pieces behind the `classpad-lsp` server and the
//! `classpad` command line tool: a per-document settings cache, an
//! uppercase-run validator and a static completion catalog.
//!
//! # Example
//!
//! ```
//! use classpad_lsp::lsp::document::ClasspadDocument;
//! use classpad_lsp::lsp::validator::Validator;
//! use classpad_lsp::types::Settings;
//! use tower_lsp::lsp_types::Url;
//!
//! let uri = Url::parse("file:///prog.cp").unwrap();
//! let document = ClasspadDocument::new(uri, "The API is HOT today", 1);
//! let validator = Validator::new()?;
//! let findings = validator.validate(&document, &Settings::default(), false);
//!
//! assert_eq!(findings.len(), 2);
//! # Ok::<(), classpad_lsp::error::ClasspadError>(())
//! ```

pub mod cli;
pub mod error;
pub mod lsp;
pub mod types;

// Re-export commonly used types
pub use error::{ClasspadError, ClasspadResult};
pub use types::{CapabilityFlags, Settings};
