//! LSP Capabilities for ClassPad
//!
//! Defines what features the ClassPad language server supports.

use tower_lsp::lsp_types::*;

use crate::types::CapabilityFlags;

/// Get the server capabilities for the negotiated client flags
pub fn get_server_capabilities(flags: &CapabilityFlags) -> ServerCapabilities {
    ServerCapabilities {
        // Incremental sync; edits are applied to the document rope
        text_document_sync: Some(TextDocumentSyncCapability::Kind(
            TextDocumentSyncKind::INCREMENTAL,
        )),

        // Static catalog of keywords, operators and function templates
        completion_provider: Some(CompletionOptions {
            resolve_provider: Some(true),
            ..Default::default()
        }),

        workspace: flags.workspace_folders.then(|| WorkspaceServerCapabilities {
            workspace_folders: Some(WorkspaceFoldersServerCapabilities {
                supported: Some(true),
                change_notifications: Some(OneOf::Left(true)),
            }),
            file_operations: None,
        }),

        ..Default::default()
    }
}

/// Dynamic registration for `workspace/didChangeConfiguration`
pub fn configuration_registration() -> Registration {
    Registration {
        id: uuid::Uuid::new_v4().to_string(),
        method: "workspace/didChangeConfiguration".to_string(),
        register_options: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sync_is_incremental() {
        let caps = get_server_capabilities(&CapabilityFlags::default());
        assert_eq!(
            caps.text_document_sync,
            Some(TextDocumentSyncCapability::Kind(
                TextDocumentSyncKind::INCREMENTAL
            ))
        );
    }

    #[test]
    fn test_completion_resolves() {
        let caps = get_server_capabilities(&CapabilityFlags::default());
        assert_eq!(caps.completion_provider.unwrap().resolve_provider, Some(true));
    }

    #[test]
    fn test_workspace_folders_follow_client() {
        let without = get_server_capabilities(&CapabilityFlags::default());
        assert!(without.workspace.is_none());

        let flags = CapabilityFlags {
            workspace_folders: true,
            ..Default::default()
        };
        let with = get_server_capabilities(&flags);
        let folders = with.workspace.unwrap().workspace_folders.unwrap();
        assert_eq!(folders.supported, Some(true));
    }

    #[test]
    fn test_configuration_registration() {
        let first = configuration_registration();
        let second = configuration_registration();
        assert_eq!(first.method, "workspace/didChangeConfiguration");
        assert_ne!(first.id, second.id);
    }
}
