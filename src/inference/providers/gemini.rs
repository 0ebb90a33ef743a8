//! Gemini provider implementation using the Generative Language API.
//!
//! - Catalog: `GET /models`, paged via `nextPageToken`, keeping only models
//!   that advertise `generateContent`. Names come back as `models/<id>`.
//! - Generation: `POST /models/{model}:generateContent`.

use async_trait::async_trait;
use log::{debug, info};
use serde::{Deserialize, Serialize};

use crate::inference::catalog::{ModelCatalog, normalize_model_name};
use crate::inference::provider::{build_client, check_status, resolve_api_key};
use crate::inference::{ModelProvider, ProviderConfig, ProviderError, ProviderKind};

pub const DEFAULT_GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";
const API_KEY_ENV_VARS: &[&str] = &["GEMINI_API_KEY", "GOOGLE_API_KEY"];
const GENERATE_CONTENT: &str = "generateContent";
const MODEL_PREFIX: &str = "models/";

// ============================================================================
// Gemini API Types
// ============================================================================

#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
struct ModelPage {
    #[serde(default)]
    models: Vec<GeminiModel>,
    next_page_token: Option<String>,
}

#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
struct GeminiModel {
    name: String,
    #[serde(default)]
    supported_generation_methods: Vec<String>,
}

#[derive(Deserialize, Debug)]
struct Part {
    #[serde(default)]
    text: Option<String>,
}

#[derive(Serialize, Debug)]
struct Content<'a> {
    role: &'static str,
    parts: Vec<PromptPart<'a>>,
}

#[derive(Serialize, Debug)]
struct PromptPart<'a> {
    text: &'a str,
}

#[derive(Serialize, Debug)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    max_output_tokens: u32,
    temperature: f32,
}

#[derive(Serialize, Debug)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest<'a> {
    contents: Vec<Content<'a>>,
    generation_config: GenerationConfig,
}

#[derive(Deserialize, Debug)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Deserialize, Debug)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Deserialize, Debug)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<Part>,
}

impl GenerateContentResponse {
    /// Text of the first candidate's parts, or empty when the model returned none
    /// (safety block, max tokens hit before any output, etc).
    fn text(&self) -> String {
        self.candidates
            .first()
            .and_then(|c| c.content.as_ref())
            .map(|content| {
                content
                    .parts
                    .iter()
                    .filter_map(|p| p.text.as_deref())
                    .collect()
            })
            .unwrap_or_default()
    }
}

/// Keeps text-generation models and strips the `models/` prefix.
fn generation_models(models: Vec<GeminiModel>) -> impl Iterator<Item = String> {
    models.into_iter().filter_map(|m| {
        m.supported_generation_methods
            .iter()
            .any(|method| method == GENERATE_CONTENT)
            .then(|| normalize_model_name(&m.name, MODEL_PREFIX).to_string())
    })
}

// ============================================================================
// Provider Implementation
// ============================================================================

/// Gemini API provider
pub struct GeminiProvider {
    config: ProviderConfig,
    api_key: String,
    base_url: String,
    client: reqwest::Client,
    catalog: ModelCatalog,
}

impl GeminiProvider {
    /// Creates a new Gemini provider.
    ///
    /// Fails if no key is found in `config.api_key`, `GEMINI_API_KEY` or `GOOGLE_API_KEY`.
    pub fn new(config: ProviderConfig) -> Result<Self, ProviderError> {
        Self::with_key_vars(config, API_KEY_ENV_VARS)
    }

    /// Like [`GeminiProvider::new`], but falls back to `env_vars` for the key.
    pub(crate) fn with_key_vars(config: ProviderConfig, env_vars: &[&str]) -> Result<Self, ProviderError> {
        let api_key = resolve_api_key(config.api_key.as_deref(), env_vars)?;
        let client = build_client(config.timeout_secs)?;
        let base_url = config
            .base_url
            .clone()
            .unwrap_or_else(|| DEFAULT_GEMINI_BASE_URL.to_string());

        info!(
            "Gemini provider ready: base_url={}, supported_models={:?}",
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
        info!("Fetching Gemini model list");

        let mut models = Vec::new();
        let mut page_token: Option<String> = None;

        loop {
            let mut request = self
                .client
                .get(format!("{}/models", self.base_url))
                .header("x-goog-api-key", &self.api_key);
            if let Some(token) = &page_token {
                request = request.query(&[("pageToken", token)]);
            }

            let response = check_status("Gemini", request.send().await?).await?;
            let page: ModelPage = response.json().await?;
            debug!("Gemini model page: {} entries", page.models.len());
            models.extend(generation_models(page.models));

            match page.next_page_token {
                Some(token) if !token.is_empty() => page_token = Some(token),
                _ => break,
            }
        }

        debug!("Gemini catalog: {} models", models.len());
        Ok(models)
    }
}

#[async_trait]
impl ModelProvider for GeminiProvider {
    fn kind(&self) -> ProviderKind {
        ProviderKind::Gemini
    }

    fn supported_models(&self) -> &[String] {
        &self.config.supported_models
    }

    async fn all_models(&self) -> Result<Vec<String>, ProviderError> {
        self.catalog.get_or_fetch(|| self.fetch_models()).await
    }

    async fn request(&self, prompt: &str, model: &str) -> Result<String, ProviderError> {
        let body = GenerateContentRequest {
            contents: vec![Content {
                role: "user",
                parts: vec![PromptPart { text: prompt }],
            }],
            generation_config: GenerationConfig {
                max_output_tokens: self.config.max_response_tokens,
                temperature: self.config.temperature,
            },
        };

        info!(
            "Gemini generateContent request: model={}, prompt_len={}, temperature={}, max_output_tokens={}",
            model,
            prompt.len(),
            body.generation_config.temperature,
            body.generation_config.max_output_tokens
        );

        let response = self
            .client
            .post(format!("{}/models/{}:generateContent", self.base_url, model))
            .header("x-goog-api-key", &self.api_key)
            .json(&body)
            .send()
            .await?;
        let response = check_status("Gemini", response).await?;

        let parsed: GenerateContentResponse = response.json().await?;
        let text = parsed.text();
        debug!("Gemini response text: {} bytes", text.len());
        Ok(text)
    }
}
