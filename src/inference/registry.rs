//! # Provider Registry
//!
//! Maps a provider name (the key used in configuration) to the constructor
//! that builds it. Adding a backend means adding one entry in
//! [`ProviderRegistry::default`].

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use super::provider::{ModelProvider, ProviderError};
use super::providers::{GeminiProvider, OpenAiProvider};
use super::types::{ProviderConfig, ProviderKind};

/// Builds a provider from its configuration.
pub type ProviderConstructor =
    Arc<dyn Fn(ProviderConfig) -> Result<Arc<dyn ModelProvider>, ProviderError> + Send + Sync>;

#[derive(Clone)]
pub struct ProviderRegistry {
    constructors: HashMap<String, ProviderConstructor>,
}

impl fmt::Debug for ProviderRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProviderRegistry")
            .field("providers", &self.names())
            .finish()
    }
}

impl Default for ProviderRegistry {
    /// A registry with every built-in backend.
    fn default() -> Self {
        let mut registry = Self::empty();
        registry.register(ProviderKind::OpenAi.as_str(), |config| {
            OpenAiProvider::new(config).map(|p| Arc::new(p) as Arc<dyn ModelProvider>)
        });
        registry.register(ProviderKind::Gemini.as_str(), |config| {
            GeminiProvider::new(config).map(|p| Arc::new(p) as Arc<dyn ModelProvider>)
        });
        registry
    }
}

impl ProviderRegistry {
    /// A registry with no backends at all.
    pub fn empty() -> Self {
        Self {
            constructors: HashMap::new(),
        }
    }

    /// Adds a constructor under `name`, replacing any previous one.
    pub fn register<F>(&mut self, name: impl Into<String>, constructor: F)
    where
        F: Fn(ProviderConfig) -> Result<Arc<dyn ModelProvider>, ProviderError>
            + Send
            + Sync
            + 'static,
    {
        self.constructors.insert(name.into(), Arc::new(constructor));
    }

    /// Registered names, sorted.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.constructors.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Builds the provider registered under `name`.
    ///
    /// Returns `None` for unknown names; the caller decides whether that matters.
    pub fn build(
        &self,
        name: &str,
        config: ProviderConfig,
    ) -> Option<Result<Arc<dyn ModelProvider>, ProviderError>> {
        self.constructors.get(name).map(|constructor| constructor(config))
    }
}
