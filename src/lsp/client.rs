//! The slice of the editor connection the server talks to.
//!
//! `tower_lsp::Client` implements both traits; tests substitute a recording
//! client so lifecycle behavior can be checked without a transport.

use async_trait::async_trait;
use serde_json::Value;
use tower_lsp::jsonrpc::Result;
use tower_lsp::lsp_types::{ConfigurationItem, Diagnostic, MessageType, Registration, Url};
use tower_lsp::Client;

/// Answers `workspace/configuration` requests.
#[async_trait]
pub trait ConfigurationSource: Send + Sync + Clone + 'static {
    async fn configuration(&self, items: Vec<ConfigurationItem>) -> Result<Vec<Value>>;
}

/// Outbound half of the connection: diagnostics sink, registration, console.
#[async_trait]
pub trait LspClient: ConfigurationSource {
    async fn publish_diagnostics(&self, uri: Url, diagnostics: Vec<Diagnostic>, version: Option<i32>);

    async fn register_capability(&self, registrations: Vec<Registration>) -> Result<()>;

    async fn log_message(&self, typ: MessageType, message: String);
}

#[async_trait]
impl ConfigurationSource for Client {
    async fn configuration(&self, items: Vec<ConfigurationItem>) -> Result<Vec<Value>> {
        Client::configuration(self, items).await
    }
}

#[async_trait]
impl LspClient for Client {
    async fn publish_diagnostics(&self, uri: Url, diagnostics: Vec<Diagnostic>, version: Option<i32>) {
        Client::publish_diagnostics(self, uri, diagnostics, version).await
    }

    async fn register_capability(&self, registrations: Vec<Registration>) -> Result<()> {
        Client::register_capability(self, registrations).await
    }

    async fn log_message(&self, typ: MessageType, message: String) {
        Client::log_message(self, typ, message).await
    }
}
