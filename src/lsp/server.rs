//! ClassPad LSP Server implementation
//!
//! Tracks open documents, resolves their settings and republishes
//! diagnostics whenever a document or the configuration changes.

use std::sync::{Arc, OnceLock};

use dashmap::DashMap;
use futures::future::join_all;
use tower_lsp::jsonrpc::Result;
use tower_lsp::lsp_types::*;
use tower_lsp::{Client, LanguageServer, LspService, Server};
use tracing::{debug, info, warn};

use crate::error::ClasspadResult;
use crate::lsp::capabilities::{configuration_registration, get_server_capabilities};
use crate::lsp::client::LspClient;
use crate::lsp::completion::Catalog;
use crate::lsp::document::ClasspadDocument;
use crate::lsp::settings::{SettingsCache, SettingsScope};
use crate::lsp::validator::Validator;
use crate::lsp::LspConfig;
use crate::types::{CapabilityFlags, Settings};

/// ClassPad Language Server
pub struct ClasspadLsp<C = Client> {
    client: C,
    /// Client capabilities, fixed by `initialize`
    flags: OnceLock<CapabilityFlags>,
    settings: SettingsCache<C>,
    /// Open documents
    documents: DashMap<Url, ClasspadDocument>,
    validator: Arc<Validator>,
    catalog: Arc<Catalog>,
}

impl<C: LspClient> ClasspadLsp<C> {
    pub fn new(client: C, validator: Arc<Validator>, catalog: Arc<Catalog>) -> Self {
        Self {
            settings: SettingsCache::new(client.clone()),
            client,
            flags: OnceLock::new(),
            documents: DashMap::new(),
            validator,
            catalog,
        }
    }

    /// Negotiated flags; all off before `initialize`.
    pub fn flags(&self) -> CapabilityFlags {
        self.flags.get().copied().unwrap_or_default()
    }

    pub fn settings(&self) -> &SettingsCache<C> {
        &self.settings
    }

    pub fn open_documents(&self) -> Vec<Url> {
        self.documents.iter().map(|entry| entry.key().clone()).collect()
    }

    /// Validate one open document and publish the result.
    ///
    /// A failed settings lookup skips this pass; nothing is published. The
    /// text is read once the lookup resolves, so a slow answer never
    /// validates an outdated copy.
    async fn validate_document(&self, uri: &Url) {
        if !self.documents.contains_key(uri) {
            return;
        }

        let settings = match self.settings.get(uri).await {
            Ok(settings) => settings,
            Err(e) => {
                warn!(uri = %uri, error = %e, "skipping validation");
                self.client
                    .log_message(
                        MessageType::WARNING,
                        format!("Skipping validation of {uri}: {e}"),
                    )
                    .await;
                return;
            }
        };

        let Some(document) = self.documents.get(uri).map(|doc| doc.clone()) else {
            debug!(uri = %uri, "closed while settings were pending");
            return;
        };
        let diagnostics =
            self.validator
                .validate(&document, &settings, self.flags().related_information);
        debug!(uri = %uri, count = diagnostics.len(), "publishing diagnostics");
        self.client
            .publish_diagnostics(uri.clone(), diagnostics, None)
            .await;
    }

    /// Every open document at once; one stalled lookup holds back only its own.
    async fn revalidate_open_documents(&self) {
        let uris = self.open_documents();
        join_all(uris.iter().map(|uri| self.validate_document(uri))).await;
    }
}

#[tower_lsp::async_trait]
impl<C: LspClient> LanguageServer for ClasspadLsp<C> {
    async fn initialize(&self, params: InitializeParams) -> Result<InitializeResult> {
        let flags = CapabilityFlags::from_client(&params.capabilities);
        if self.flags.set(flags).is_err() {
            warn!("initialize received twice; keeping the first capabilities");
        }
        let flags = self.flags();
        self.settings.set_scope(if flags.configuration {
            SettingsScope::PerResource
        } else {
            SettingsScope::Global
        });
        info!(?flags, "client capabilities");

        Ok(InitializeResult {
            capabilities: get_server_capabilities(&flags),
            server_info: Some(ServerInfo {
                name: "ClassPad Language Server".to_string(),
                version: Some(env!("CARGO_PKG_VERSION").to_string()),
            }),
        })
    }

    async fn initialized(&self, _: InitializedParams) {
        if self.flags().configuration {
            if let Err(e) = self
                .client
                .register_capability(vec![configuration_registration()])
                .await
            {
                warn!(error = %e, "configuration change registration failed");
            }
        }
        self.client
            .log_message(MessageType::INFO, "ClassPad LSP initialized".to_string())
            .await;
    }

    async fn shutdown(&self) -> Result<()> {
        Ok(())
    }

    async fn did_open(&self, params: DidOpenTextDocumentParams) {
        let TextDocumentItem {
            uri, text, version, ..
        } = params.text_document;
        debug!(uri = %uri, "document opened");
        self.documents
            .insert(uri.clone(), ClasspadDocument::new(uri.clone(), &text, version));
        self.validate_document(&uri).await;
    }

    async fn did_change(&self, params: DidChangeTextDocumentParams) {
        let uri = params.text_document.uri;
        match self.documents.get_mut(&uri) {
            Some(mut document) => {
                document.apply_changes(params.content_changes, params.text_document.version);
            }
            None => {
                warn!(uri = %uri, "change for a document that is not open");
                return;
            }
        }
        self.validate_document(&uri).await;
    }

    async fn did_close(&self, params: DidCloseTextDocumentParams) {
        let uri = params.text_document.uri;
        debug!(uri = %uri, "document closed");
        self.documents.remove(&uri);
        self.settings.forget(&uri);
    }

    async fn did_change_configuration(&self, params: DidChangeConfigurationParams) {
        match self.settings.scope() {
            SettingsScope::PerResource => self.settings.invalidate_all(),
            SettingsScope::Global => {
                let settings = Settings::from_change_notification(&params.settings);
                self.settings.set_global(settings).await;
            }
        }
        info!("configuration changed, revalidating open documents");
        self.revalidate_open_documents().await;
    }

    async fn did_change_workspace_folders(&self, _: DidChangeWorkspaceFoldersParams) {
        info!("workspace folders changed");
        self.client
            .log_message(
                MessageType::LOG,
                "Workspace folder change event received.".to_string(),
            )
            .await;
    }

    async fn did_change_watched_files(&self, params: DidChangeWatchedFilesParams) {
        info!(count = params.changes.len(), "watched files changed");
        self.client
            .log_message(MessageType::LOG, "We received a file change event".to_string())
            .await;
    }

    async fn completion(&self, _: CompletionParams) -> Result<Option<CompletionResponse>> {
        Ok(Some(CompletionResponse::Array(
            self.catalog.completion_items(),
        )))
    }

    async fn completion_resolve(&self, item: CompletionItem) -> Result<CompletionItem> {
        Ok(self.catalog.resolve(item))
    }
}

/// Initialize tracing on stderr; stdout carries the protocol.
pub fn init_logging(filter: &str) {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_new(filter)
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("classpad_lsp=info")),
        )
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .try_init();
}

/// Run the LSP server on stdin/stdout
pub async fn run_lsp_server(config: LspConfig) -> ClasspadResult<()> {
    init_logging(&config.log_filter);

    let catalog = match &config.catalog_path {
        Some(path) => {
            info!(path = %path.display(), "loading completion catalog");
            Catalog::load(path)?
        }
        None => Catalog::builtin()?,
    };
    let catalog = Arc::new(catalog);
    let validator = Arc::new(Validator::new()?);
    info!(entries = catalog.len(), "ClassPad LSP starting on stdio");

    let stdin = tokio::io::stdin();
    let stdout = tokio::io::stdout();

    let (service, socket) =
        LspService::new(move |client| ClasspadLsp::new(client, validator.clone(), catalog.clone()));
    Server::new(stdin, stdout, socket).serve(service).await;

    info!("ClassPad LSP shutdown complete");
    Ok(())
}
