//! Memoize-once cache for a provider's model list.
//!
//! The catalog starts unpopulated. The first caller runs the fetch; concurrent
//! callers wait on that same fetch instead of starting their own. A failed
//! fetch leaves the catalog unpopulated so a later call can try again.

use std::future::Future;

use log::debug;
use tokio::sync::OnceCell;

use super::provider::ProviderError;

#[derive(Debug, Default)]
pub struct ModelCatalog {
    models: OnceCell<Vec<String>>,
}

impl ModelCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the cached list, running `fetch` only if nothing is cached yet.
    pub async fn get_or_fetch<F, Fut>(&self, fetch: F) -> Result<Vec<String>, ProviderError>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<Vec<String>, ProviderError>>,
    {
        let models = self.models.get_or_try_init(fetch).await?;
        Ok(models.clone())
    }
}

/// Drops the vendor's path prefix from a model identifier (`models/gemini-pro` → `gemini-pro`).
pub fn normalize_model_name<'a>(name: &'a str, prefix: &str) -> &'a str {
    let stripped = name.strip_prefix(prefix).unwrap_or(name);
    if stripped.len() != name.len() {
        debug!("Normalized model name {} -> {}", name, stripped);
    }
    stripped
}
