use std::fmt;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

pub const DEFAULT_MAX_RESPONSE_TOKENS: u32 = 4096;
pub const DEFAULT_TEMPERATURE: f32 = 0.5;
pub const DEFAULT_TIMEOUT_SECS: u64 = 120;

/// Backend kinds this crate knows how to talk to.
/// Doubles as the registry key (via [`ProviderKind::as_str`]) and a provider's self-reported identity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProviderKind {
    OpenAi,
    Gemini,
}

impl ProviderKind {
    /// The configuration key for this backend.
    pub fn as_str(self) -> &'static str {
        match self {
            ProviderKind::OpenAi => "openai",
            ProviderKind::Gemini => "gemini",
        }
    }
}

impl fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Everything a provider needs at construction time.
///
/// Every field has a serde default so a sparse TOML table such as
/// `[providers.gemini]` with only `supported_models` still parses.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct ProviderConfig {
    /// Falls back to the vendor's environment variable when unset.
    pub api_key: Option<String>,
    /// Models this provider is allowed to serve. Duplicates are harmless.
    pub supported_models: Vec<String>,
    pub max_response_tokens: u32,
    pub temperature: f32,
    /// Overrides the vendor endpoint (proxies, mock servers).
    pub base_url: Option<String>,
    /// Upper bound on every vendor call made by this provider.
    pub timeout_secs: u64,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            supported_models: Vec::new(),
            max_response_tokens: DEFAULT_MAX_RESPONSE_TOKENS,
            temperature: DEFAULT_TEMPERATURE,
            base_url: None,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

impl ProviderConfig {
    /// Shorthand for the common case: a key plus an allowlist, defaults for the rest.
    pub fn new(api_key: impl Into<String>, supported_models: &[&str]) -> Self {
        Self {
            api_key: Some(api_key.into()),
            supported_models: supported_models.iter().map(|m| m.to_string()).collect(),
            ..Default::default()
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }
}

/// Provider name → configuration, in insertion order.
/// A `None` value means "named but not configured" and is skipped.
pub type ProviderConfigs = IndexMap<String, Option<ProviderConfig>>;
