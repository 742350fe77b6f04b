//! Recording client shared by the server integration tests.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use classpad_lsp::lsp::client::{ConfigurationSource, LspClient};
use serde_json::{json, Value};
use tokio::sync::watch;
use tower_lsp::jsonrpc::{Error, Result};
use tower_lsp::lsp_types::{
    ConfigurationItem, Diagnostic, MessageType, Registration, Url,
};

#[derive(Default)]
struct Recorded {
    configuration_requests: Vec<ConfigurationItem>,
    published: Vec<(Url, Vec<Diagnostic>)>,
    registrations: Vec<Registration>,
    logs: Vec<(MessageType, String)>,
    settings: HashMap<Url, Value>,
    default_settings: Value,
    fail_configuration: bool,
    stalled: HashMap<Url, watch::Receiver<bool>>,
}

/// Stands in for `tower_lsp::Client`, answering configuration requests from
/// a table and recording everything sent to the editor.
#[derive(Clone, Default)]
pub struct RecordingClient {
    inner: Arc<Mutex<Recorded>>,
}

impl RecordingClient {
    pub fn new() -> Self {
        let client = Self::default();
        client.set_default_settings(json!({"maxNumberOfProblems": 1000}));
        client
    }

    pub fn set_default_settings(&self, value: Value) {
        self.inner.lock().unwrap().default_settings = value;
    }

    pub fn set_settings(&self, uri: &Url, value: Value) {
        self.inner
            .lock()
            .unwrap()
            .settings
            .insert(uri.clone(), value);
    }

    pub fn fail_configuration(&self, fail: bool) {
        self.inner.lock().unwrap().fail_configuration = fail;
    }

    /// Hold configuration answers for `uri` until `true` is sent on the
    /// returned handle. Dropping the handle unanswered stalls them forever.
    pub fn stall(&self, uri: &Url) -> watch::Sender<bool> {
        let (release, gate) = watch::channel(false);
        self.inner.lock().unwrap().stalled.insert(uri.clone(), gate);
        release
    }

    pub fn configuration_requests(&self) -> Vec<ConfigurationItem> {
        self.inner.lock().unwrap().configuration_requests.clone()
    }

    pub fn published(&self) -> Vec<(Url, Vec<Diagnostic>)> {
        self.inner.lock().unwrap().published.clone()
    }

    /// Diagnostics of the most recent publish for `uri`.
    pub fn last_published(&self, uri: &Url) -> Option<Vec<Diagnostic>> {
        self.published()
            .into_iter()
            .rev()
            .find(|(published, _)| published == uri)
            .map(|(_, diagnostics)| diagnostics)
    }

    pub fn publish_count(&self, uri: &Url) -> usize {
        self.published()
            .iter()
            .filter(|(published, _)| published == uri)
            .count()
    }

    pub fn registrations(&self) -> Vec<Registration> {
        self.inner.lock().unwrap().registrations.clone()
    }

    pub fn logs(&self) -> Vec<(MessageType, String)> {
        self.inner.lock().unwrap().logs.clone()
    }
}

#[async_trait]
impl ConfigurationSource for RecordingClient {
    async fn configuration(&self, items: Vec<ConfigurationItem>) -> Result<Vec<Value>> {
        let gates: Vec<_> = {
            let mut recorded = self.inner.lock().unwrap();
            recorded.configuration_requests.extend(items.iter().cloned());
            items
                .iter()
                .filter_map(|item| item.scope_uri.as_ref())
                .filter_map(|uri| recorded.stalled.get(uri).cloned())
                .collect()
        };
        for mut gate in gates {
            if gate.wait_for(|released| *released).await.is_err() {
                std::future::pending::<()>().await;
            }
        }

        let recorded = self.inner.lock().unwrap();
        if recorded.fail_configuration {
            return Err(Error::internal_error());
        }
        Ok(items
            .iter()
            .map(|item| {
                item.scope_uri
                    .as_ref()
                    .and_then(|uri| recorded.settings.get(uri).cloned())
                    .unwrap_or_else(|| recorded.default_settings.clone())
            })
            .collect())
    }
}

#[async_trait]
impl LspClient for RecordingClient {
    async fn publish_diagnostics(&self, uri: Url, diagnostics: Vec<Diagnostic>, _: Option<i32>) {
        self.inner.lock().unwrap().published.push((uri, diagnostics));
    }

    async fn register_capability(&self, registrations: Vec<Registration>) -> Result<()> {
        self.inner
            .lock()
            .unwrap()
            .registrations
            .extend(registrations);
        Ok(())
    }

    async fn log_message(&self, typ: MessageType, message: String) {
        self.inner.lock().unwrap().logs.push((typ, message));
    }
}
