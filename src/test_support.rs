//! Test utilities shared across the crate.
//!
//! This module is only compiled during tests (`#[cfg(test)]`).

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use crate::inference::{
    ModelCatalog, ModelProvider, ProviderConfig, ProviderConfigs, ProviderError, ProviderKind,
    ProviderRegistry,
};

/// An in-memory provider with a fixed catalog that records every request.
pub struct ScriptedProvider {
    kind: ProviderKind,
    supported: Vec<String>,
    backend_models: Vec<String>,
    catalog: ModelCatalog,
    catalog_fetches: AtomicUsize,
    requests: Mutex<Vec<(String, String)>>,
    fail_requests: bool,
}

impl ScriptedProvider {
    pub fn new(kind: ProviderKind, supported: &[&str], backend_models: &[&str]) -> Self {
        Self {
            kind,
            supported: supported.iter().map(|m| m.to_string()).collect(),
            backend_models: backend_models.iter().map(|m| m.to_string()).collect(),
            catalog: ModelCatalog::new(),
            catalog_fetches: AtomicUsize::new(0),
            requests: Mutex::new(Vec::new()),
            fail_requests: false,
        }
    }

    /// Every request returns HTTP 500.
    pub fn failing(mut self) -> Self {
        self.fail_requests = true;
        self
    }

    pub fn requests(&self) -> Vec<(String, String)> {
        self.requests.lock().unwrap().clone()
    }

    pub fn catalog_fetches(&self) -> usize {
        self.catalog_fetches.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ModelProvider for ScriptedProvider {
    fn kind(&self) -> ProviderKind {
        self.kind
    }

    fn supported_models(&self) -> &[String] {
        &self.supported
    }

    async fn all_models(&self) -> Result<Vec<String>, ProviderError> {
        self.catalog
            .get_or_fetch(|| async {
                self.catalog_fetches.fetch_add(1, Ordering::SeqCst);
                Ok(self.backend_models.clone())
            })
            .await
    }

    async fn request(&self, prompt: &str, model: &str) -> Result<String, ProviderError> {
        self.requests
            .lock()
            .unwrap()
            .push((prompt.to_string(), model.to_string()));
        if self.fail_requests {
            return Err(ProviderError::Api {
                status: 500,
                message: "backend unavailable".to_string(),
            });
        }
        Ok(format!("Response from {} model {}: {}", self.kind, model, prompt))
    }
}

/// Every provider a [`scripted_registry`] has constructed, grouped by kind.
#[derive(Clone, Default)]
pub struct Built {
    providers: Arc<Mutex<HashMap<ProviderKind, Vec<Arc<ScriptedProvider>>>>>,
}

impl Built {
    /// The most recently constructed provider of `kind`.
    pub fn last(&self, kind: ProviderKind) -> Arc<ScriptedProvider> {
        self.providers.lock().unwrap()[&kind]
            .last()
            .cloned()
            .expect("no provider of this kind was built")
    }

    pub fn count(&self, kind: ProviderKind) -> usize {
        self.providers
            .lock()
            .unwrap()
            .get(&kind)
            .map_or(0, Vec::len)
    }

    fn record(&self, provider: Arc<ScriptedProvider>) {
        self.providers
            .lock()
            .unwrap()
            .entry(provider.kind)
            .or_default()
            .push(provider);
    }
}

/// A registry whose `openai` and `gemini` entries build [`ScriptedProvider`]s.
///
/// The allowlist comes from the config; the catalogs are fixed per kind.
pub fn scripted_registry(gemini_catalog: &[&str], openai_catalog: &[&str]) -> (ProviderRegistry, Built) {
    let built = Built::default();
    let mut registry = ProviderRegistry::empty();

    for (kind, catalog) in [
        (ProviderKind::Gemini, gemini_catalog),
        (ProviderKind::OpenAi, openai_catalog),
    ] {
        let catalog: Vec<String> = catalog.iter().map(|m| m.to_string()).collect();
        let built = built.clone();
        registry.register(kind.as_str(), move |config: ProviderConfig| {
            let supported: Vec<&str> = config.supported_models.iter().map(String::as_str).collect();
            let catalog: Vec<&str> = catalog.iter().map(String::as_str).collect();
            let provider = Arc::new(ScriptedProvider::new(kind, &supported, &catalog));
            built.record(provider.clone());
            Ok(provider as Arc<dyn ModelProvider>)
        });
    }

    (registry, built)
}

/// Builds a [`ProviderConfigs`] map, keeping the given order.
pub fn configs(entries: &[(&str, Option<ProviderConfig>)]) -> ProviderConfigs {
    entries
        .iter()
        .map(|(name, config)| (name.to_string(), config.clone()))
        .collect()
}
