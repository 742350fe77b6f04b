//! Per-document settings cache.
//!
//! In per-resource scope every document gets its own `workspace/configuration`
//! lookup. The lookup is stored as a shared future the moment it is issued, so
//! callers arriving before the client answers await the same request instead
//! of sending another one. Failed lookups stay cached until the entry is
//! invalidated or forgotten.

use std::sync::OnceLock;

use dashmap::DashMap;
use futures::future::{BoxFuture, FutureExt, Shared};
use tokio::sync::RwLock;
use tower_lsp::lsp_types::{ConfigurationItem, Url};
use tracing::debug;

use crate::error::SettingsError;
use crate::lsp::client::ConfigurationSource;
use crate::types::{Settings, SETTINGS_SECTION};

type PendingSettings = Shared<BoxFuture<'static, Result<Settings, SettingsError>>>;

/// Where settings come from, fixed once the client capabilities are known.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SettingsScope {
    /// One value for every document, pushed by change notifications.
    Global,
    /// Queried from the client per document URI.
    PerResource,
}

pub struct SettingsCache<S> {
    source: S,
    scope: OnceLock<SettingsScope>,
    global: RwLock<Settings>,
    documents: DashMap<Url, PendingSettings>,
}

impl<S: ConfigurationSource> SettingsCache<S> {
    pub fn new(source: S) -> Self {
        Self {
            source,
            scope: OnceLock::new(),
            global: RwLock::new(Settings::default()),
            documents: DashMap::new(),
        }
    }

    /// Fix the scope. Only the first call has an effect; returns whether it
    /// was this one.
    pub fn set_scope(&self, scope: SettingsScope) -> bool {
        self.scope.set(scope).is_ok()
    }

    /// Global until `set_scope` has been called.
    pub fn scope(&self) -> SettingsScope {
        self.scope.get().copied().unwrap_or(SettingsScope::Global)
    }

    pub async fn get(&self, resource: &Url) -> Result<Settings, SettingsError> {
        match self.scope() {
            SettingsScope::Global => Ok(*self.global.read().await),
            SettingsScope::PerResource => {
                // The map guard must be released before awaiting.
                let pending = self
                    .documents
                    .entry(resource.clone())
                    .or_insert_with(|| self.query(resource.clone()))
                    .clone();
                pending.await
            }
        }
    }

    fn query(&self, resource: Url) -> PendingSettings {
        debug!(uri = %resource, "requesting document settings");
        let source = self.source.clone();
        async move {
            let item = ConfigurationItem {
                scope_uri: Some(resource),
                section: Some(SETTINGS_SECTION.to_string()),
            };
            let mut values = source
                .configuration(vec![item])
                .await
                .map_err(|e| SettingsError::Query(e.to_string()))?;
            if values.is_empty() {
                return Err(SettingsError::Missing);
            }
            Settings::from_configuration(values.swap_remove(0))
        }
        .boxed()
        .shared()
    }

    /// Drop every per-resource entry; the next `get` re-queries.
    pub fn invalidate_all(&self) {
        self.documents.clear();
    }

    pub async fn set_global(&self, settings: Settings) {
        *self.global.write().await = settings;
    }

    pub fn forget(&self, resource: &Url) {
        self.documents.remove(resource);
    }

    /// Number of documents with a cached or in-flight lookup.
    pub fn cached_len(&self) -> usize {
        self.documents.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use serde_json::{json, Value};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::{Arc, Mutex};
    use tokio::sync::Notify;
    use tower_lsp::jsonrpc::{Error, Result};

    /// Answers every request with `response` after `gate` is opened.
    #[derive(Clone)]
    struct GatedSource {
        calls: Arc<AtomicUsize>,
        scopes: Arc<Mutex<Vec<Option<Url>>>>,
        gate: Arc<Notify>,
        gated: bool,
        response: Value,
        fail: bool,
    }

    impl GatedSource {
        fn answering(response: Value) -> Self {
            Self {
                calls: Arc::new(AtomicUsize::new(0)),
                scopes: Arc::new(Mutex::new(Vec::new())),
                gate: Arc::new(Notify::new()),
                gated: false,
                response,
                fail: false,
            }
        }

        fn gated(mut self) -> Self {
            self.gated = true;
            self
        }

        fn failing() -> Self {
            let mut source = Self::answering(Value::Null);
            source.fail = true;
            source
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl ConfigurationSource for GatedSource {
        async fn configuration(&self, items: Vec<ConfigurationItem>) -> Result<Vec<Value>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.scopes
                .lock()
                .unwrap()
                .extend(items.into_iter().map(|item| item.scope_uri));
            if self.gated {
                self.gate.notified().await;
            }
            if self.fail {
                return Err(Error::internal_error());
            }
            Ok(vec![self.response.clone()])
        }
    }

    fn uri(name: &str) -> Url {
        Url::parse(&format!("file:///workspace/{name}.cp")).unwrap()
    }

    #[tokio::test]
    async fn test_global_scope_returns_default_without_query() {
        let source = GatedSource::answering(json!({"maxNumberOfProblems": 5}));
        let cache = SettingsCache::new(source.clone());

        let settings = cache.get(&uri("a")).await.unwrap();

        assert_eq!(settings, Settings::default());
        assert_eq!(source.calls(), 0);
    }

    #[tokio::test]
    async fn test_set_global_replaces_value() {
        let cache = SettingsCache::new(GatedSource::answering(Value::Null));
        cache
            .set_global(Settings {
                max_number_of_problems: 2,
            })
            .await;
        assert_eq!(cache.get(&uri("a")).await.unwrap().max_number_of_problems, 2);
    }

    #[tokio::test]
    async fn test_scope_is_fixed_after_first_set() {
        let cache = SettingsCache::new(GatedSource::answering(Value::Null));
        assert!(cache.set_scope(SettingsScope::PerResource));
        assert!(!cache.set_scope(SettingsScope::Global));
        assert_eq!(cache.scope(), SettingsScope::PerResource);
    }

    #[tokio::test]
    async fn test_per_resource_query_is_scoped_to_uri() {
        let source = GatedSource::answering(json!({"maxNumberOfProblems": 5}));
        let cache = SettingsCache::new(source.clone());
        cache.set_scope(SettingsScope::PerResource);

        let settings = cache.get(&uri("a")).await.unwrap();

        assert_eq!(settings.max_number_of_problems, 5);
        assert_eq!(*source.scopes.lock().unwrap(), vec![Some(uri("a"))]);
    }

    #[tokio::test]
    async fn test_concurrent_lookups_share_one_query() {
        let source = GatedSource::answering(json!({"maxNumberOfProblems": 9})).gated();
        let cache = SettingsCache::new(source.clone());
        cache.set_scope(SettingsScope::PerResource);
        let target = uri("a");

        let first = cache.get(&target);
        let second = cache.get(&target);
        let release = async {
            tokio::task::yield_now().await;
            source.gate.notify_waiters();
        };
        let (first, second, ()) = tokio::join!(first, second, release);

        assert_eq!(first.unwrap().max_number_of_problems, 9);
        assert_eq!(second.unwrap().max_number_of_problems, 9);
        assert_eq!(source.calls(), 1);
    }

    #[tokio::test]
    async fn test_resolved_lookup_is_memoized() {
        let source = GatedSource::answering(json!({"maxNumberOfProblems": 4}));
        let cache = SettingsCache::new(source.clone());
        cache.set_scope(SettingsScope::PerResource);

        cache.get(&uri("a")).await.unwrap();
        cache.get(&uri("a")).await.unwrap();
        cache.get(&uri("b")).await.unwrap();

        assert_eq!(source.calls(), 2);
        assert_eq!(cache.cached_len(), 2);
    }

    #[tokio::test]
    async fn test_forget_forces_fresh_query() {
        let source = GatedSource::answering(json!({"maxNumberOfProblems": 4}));
        let cache = SettingsCache::new(source.clone());
        cache.set_scope(SettingsScope::PerResource);

        cache.get(&uri("a")).await.unwrap();
        cache.forget(&uri("a"));
        cache.get(&uri("a")).await.unwrap();

        assert_eq!(source.calls(), 2);
    }

    #[tokio::test]
    async fn test_forget_unknown_uri_is_noop() {
        let cache = SettingsCache::new(GatedSource::answering(Value::Null));
        cache.set_scope(SettingsScope::PerResource);
        cache.forget(&uri("never-opened"));
        assert_eq!(cache.cached_len(), 0);
    }

    #[tokio::test]
    async fn test_invalidate_all_clears_entries() {
        let source = GatedSource::answering(json!({"maxNumberOfProblems": 4}));
        let cache = SettingsCache::new(source.clone());
        cache.set_scope(SettingsScope::PerResource);

        cache.get(&uri("a")).await.unwrap();
        cache.get(&uri("b")).await.unwrap();
        cache.invalidate_all();
        assert_eq!(cache.cached_len(), 0);

        cache.get(&uri("a")).await.unwrap();
        assert_eq!(source.calls(), 3);
    }

    #[tokio::test]
    async fn test_failed_query_propagates_and_stays_cached() {
        let source = GatedSource::failing();
        let cache = SettingsCache::new(source.clone());
        cache.set_scope(SettingsScope::PerResource);

        let first = cache.get(&uri("a")).await;
        let second = cache.get(&uri("a")).await;

        assert!(matches!(first, Err(SettingsError::Query(_))));
        assert_eq!(first, second);
        assert_eq!(source.calls(), 1);
    }

    #[tokio::test]
    async fn test_zero_limit_from_client_is_an_error() {
        let cache = SettingsCache::new(GatedSource::answering(json!({"maxNumberOfProblems": 0})));
        cache.set_scope(SettingsScope::PerResource);
        assert_eq!(
            cache.get(&uri("a")).await,
            Err(SettingsError::ZeroProblemLimit)
        );
    }
}
