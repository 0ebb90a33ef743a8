use std::fmt;

use async_trait::async_trait;

use super::types::ProviderKind;

/// Errors that can occur during provider operations.
/// None of these are retried anywhere in the crate.
#[derive(Debug)]
pub enum ProviderError {
    /// Provider misconfigured (missing API key, unbuildable client).
    Config(String),
    /// Network-level failure (timeout, DNS, connection refused).
    Network(String),
    /// API returned an error response (bad key, unknown model, server error).
    Api { status: u16, message: String },
    /// Failed to parse the provider's response.
    Parse(String),
}

impl fmt::Display for ProviderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProviderError::Config(msg) => write!(f, "config error: {msg}"),
            ProviderError::Network(msg) => write!(f, "network error: {msg}"),
            ProviderError::Api { status, message } => {
                write!(f, "API error (HTTP {status}): {message}")
            }
            ProviderError::Parse(msg) => write!(f, "parse error: {msg}"),
        }
    }
}

impl std::error::Error for ProviderError {}

impl From<reqwest::Error> for ProviderError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_decode() {
            ProviderError::Parse(e.to_string())
        } else {
            ProviderError::Network(e.to_string())
        }
    }
}

/// A generative-model backend.
///
/// A model is usable through a provider only if it appears in both
/// [`supported_models`](Self::supported_models) (what the caller allows) and
/// [`all_models`](Self::all_models) (what the backend offers).
#[async_trait]
pub trait ModelProvider: Send + Sync {
    /// Which backend this is. Constant per instance.
    fn kind(&self) -> ProviderKind;

    /// The configured allowlist, verbatim. Never touches the network.
    fn supported_models(&self) -> &[String];

    /// The backend's text-generation models.
    ///
    /// Fetched on first call and cached for the lifetime of the instance.
    async fn all_models(&self) -> Result<Vec<String>, ProviderError>;

    /// Issues exactly one generation call and returns the generated text,
    /// or an empty string if the backend produced none.
    async fn request(&self, prompt: &str, model: &str) -> Result<String, ProviderError>;
}

/// Reads a credential from config, falling back to the first set environment variable.
pub(crate) fn resolve_api_key(
    configured: Option<&str>,
    env_vars: &[&str],
) -> Result<String, ProviderError> {
    configured
        .map(str::to_string)
        .or_else(|| env_vars.iter().find_map(|var| std::env::var(var).ok()))
        .filter(|key| !key.is_empty())
        .ok_or_else(|| {
            ProviderError::Config(format!("no API key configured (set {})", env_vars.join(" or ")))
        })
}

/// Builds the HTTP client every provider uses, with the configured timeout.
pub(crate) fn build_client(timeout_secs: u64) -> Result<reqwest::Client, ProviderError> {
    reqwest::Client::builder()
        .timeout(std::time::Duration::from_secs(timeout_secs))
        .build()
        .map_err(|e| ProviderError::Config(format!("failed to build HTTP client: {e}")))
}

/// Turns a non-2xx response into [`ProviderError::Api`], passing successes through.
pub(crate) async fn check_status(
    vendor: &str,
    response: reqwest::Response,
) -> Result<reqwest::Response, ProviderError> {
    log::debug!("{} response status: {}", vendor, response.status());

    if !response.status().is_success() {
        let status = response.status().as_u16();
        let err_body = response
            .text()
            .await
            .unwrap_or_else(|_| "unknown error".to_string());
        log::warn!("{} API error: {} - {}", vendor, status, err_body);
        return Err(ProviderError::Api {
            status,
            message: err_body,
        });
    }

    Ok(response)
}
