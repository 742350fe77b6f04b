//! ClassPad Basic extension for Zed
//!
//! Starts `classpad-lsp` over stdio for `.cp` programs. Highlighting comes
//! from the TextMate grammar in `editors/textmate`.
//!
//! Requires: classpad-lsp in PATH (install via `cargo install classpad-lsp`)

use zed_extension_api::{self as zed, LanguageServerId, Result};

struct ClasspadExtension;

impl zed::Extension for ClasspadExtension {
    fn new() -> Self {
        Self
    }

    fn language_server_command(
        &mut self,
        _language_server_id: &LanguageServerId,
        worktree: &zed::Worktree,
    ) -> Result<zed::Command> {
        let path = worktree.which("classpad-lsp").ok_or_else(|| {
            "classpad-lsp not found in PATH. Install with: cargo install classpad-lsp".to_string()
        })?;

        Ok(zed::Command {
            command: path,
            args: vec!["--stdio".to_string()],
            env: worktree.shell_env(),
        })
    }
}

zed::register_extension!(ClasspadExtension);
