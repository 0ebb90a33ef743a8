//! OpenAI provider implementation using the Responses API.
//!
//! - Catalog: `GET /models`, every returned id counts.
//! - Generation: `POST /responses` with a plain-string `input`.

use async_trait::async_trait;
use log::{debug, info};
use serde::{Deserialize, Serialize};

use crate::inference::catalog::ModelCatalog;
use crate::inference::provider::{build_client, check_status, resolve_api_key};
use crate::inference::{ModelProvider, ProviderConfig, ProviderError, ProviderKind};

pub const DEFAULT_OPENAI_BASE_URL: &str = "https://api.openai.com/v1";
const API_KEY_ENV_VARS: &[&str] = &["OPENAI_API_KEY"];

// ============================================================================
// OpenAI API Types
// ============================================================================

/// `GET /models` response body
#[derive(Deserialize, Debug)]
struct ModelList {
    data: Vec<ModelEntry>,
}

#[derive(Deserialize, Debug)]
struct ModelEntry {
    id: String,
}

/// The request body for the Responses API
#[derive(Serialize, Debug)]
struct ResponsesRequest<'a> {
    model: &'a str,
    input: &'a str,
    temperature: f32,
    max_output_tokens: u32,
}

#[derive(Deserialize, Debug)]
struct ResponsesResponse {
    #[serde(default)]
    output: Vec<OutputItem>,
}

/// One entry of the `output` array. Only `message` items carry text.
#[derive(Deserialize, Debug)]
struct OutputItem {
    #[serde(rename = "type")]
    item_type: String,
    #[serde(default)]
    content: Vec<OutputContent>,
}

#[derive(Deserialize, Debug)]
struct OutputContent {
    #[serde(rename = "type")]
    content_type: String,
    #[serde(default)]
    text: String,
}

impl ResponsesResponse {
    /// Concatenates every `output_text` part of every message item.
    fn output_text(&self) -> String {
        self.output
            .iter()
            .filter(|item| item.item_type == "message")
            .flat_map(|item| item.content.iter())
            .filter(|part| part.content_type == "output_text")
            .map(|part| part.text.as_str())
            .collect()
    }
}

// ============================================================================
// Provider Implementation
// ============================================================================

/// OpenAI API provider
pub struct OpenAiProvider {
    config: ProviderConfig,
    api_key: String,
    base_url: String,
    client: reqwest::Client,
    catalog: ModelCatalog,
}

impl OpenAiProvider {
    /// Creates a new OpenAI provider.
    ///
    /// Fails if neither `config.api_key` nor `OPENAI_API_KEY` supplies a key.
    pub fn new(config: ProviderConfig) -> Result<Self, ProviderError> {
        Self::with_key_vars(config, API_KEY_ENV_VARS)
    }

    /// Like [`OpenAiProvider::new`], but falls back to `env_vars` for the key.
    pub(crate) fn with_key_vars(config: ProviderConfig, env_vars: &[&str]) -> Result<Self, ProviderError> {
        let api_key = resolve_api_key(config.api_key.as_deref(), env_vars)?;
        let client = build_client(config.timeout_secs)?;
        let base_url = config
            .base_url
            .clone()
            .unwrap_or_else(|| DEFAULT_OPENAI_BASE_URL.to_string());

        info!(
            "OpenAI provider ready: base_url={}, supported_models={:?}",
            base_url, config.supported_models
        );

        Ok(Self {
            config,
            api_key,
            base_url,
            client,
            catalog: ModelCatalog::new(),
        })
    }

    async fn fetch_models(&self) -> Result<Vec<String>, ProviderError> {
        info!("Fetching OpenAI model list");

        let response = self
            .client
            .get(format!("{}/models", self.base_url))
            .bearer_auth(&self.api_key)
            .send()
            .await?;
        let response = check_status("OpenAI", response).await?;

        let list: ModelList = response.json().await?;
        let models: Vec<String> = list.data.into_iter().map(|m| m.id).collect();
        debug!("OpenAI catalog: {} models", models.len());
        Ok(models)
    }
}

#[async_trait]
impl ModelProvider for OpenAiProvider {
    fn kind(&self) -> ProviderKind {
        ProviderKind::OpenAi
    }

    fn supported_models(&self) -> &[String] {
        &self.config.supported_models
    }

    async fn all_models(&self) -> Result<Vec<String>, ProviderError> {
        self.catalog.get_or_fetch(|| self.fetch_models()).await
    }

    async fn request(&self, prompt: &str, model: &str) -> Result<String, ProviderError> {
        let body = ResponsesRequest {
            model,
            input: prompt,
            temperature: self.config.temperature,
            max_output_tokens: self.config.max_response_tokens,
        };

        info!(
            "OpenAI Responses API request: model={}, prompt_len={}, temperature={}, max_output_tokens={}",
            model,
            prompt.len(),
            body.temperature,
            body.max_output_tokens
        );

        let response = self
            .client
            .post(format!("{}/responses", self.base_url))
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await?;
        let response = check_status("OpenAI", response).await?;

        let parsed: ResponsesResponse = response.json().await?;
        let text = parsed.output_text();
        debug!("OpenAI response text: {} bytes", text.len());
        Ok(text)
    }
}
