//! # Prompter
//!
//! Dispatches a prompt to the first provider that both allows and offers the
//! requested model.
//!
//! ```text
//! Prompter
//! ├── registry: ProviderRegistry             // name → constructor
//! └── state: Mutex<State>
//!     ├── default_model: Option<String>      // used when send() gets no model
//!     └── providers: Vec<Arc<dyn ModelProvider>>  // insertion order, first match wins
//! ```
//!
//! `send` copies the provider list out of the lock before doing any I/O, so a
//! slow vendor call never blocks `set_providers` or `set_default_model`.

use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use log::{debug, info, warn};

use crate::inference::{ModelProvider, ProviderConfigs, ProviderError, ProviderKind, ProviderRegistry};

/// Errors surfaced by [`Prompter`]. None are retried.
#[derive(Debug)]
pub enum PrompterError {
    /// Missing or empty configuration, a provider that failed to build,
    /// or a send with no model to resolve.
    Configuration(String),
    /// No provider both allows and offers this model.
    ModelNotSupported(String),
    /// The chosen provider's backend call failed.
    Request(ProviderError),
}

impl fmt::Display for PrompterError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PrompterError::Configuration(msg) => write!(f, "configuration error: {msg}"),
            PrompterError::ModelNotSupported(model) => {
                write!(f, "model '{model}' is not supported by any provider")
            }
            PrompterError::Request(e) => write!(f, "provider request failed: {e}"),
        }
    }
}

impl std::error::Error for PrompterError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            PrompterError::Request(e) => Some(e),
            _ => None,
        }
    }
}

impl From<ProviderError> for PrompterError {
    fn from(e: ProviderError) -> Self {
        PrompterError::Request(e)
    }
}

const EMPTY_CONFIG: &str = "at least one model provider configuration is required";

#[derive(Default)]
struct State {
    default_model: Option<String>,
    providers: Vec<Arc<dyn ModelProvider>>,
}

pub struct Prompter {
    registry: ProviderRegistry,
    state: Mutex<State>,
}

impl fmt::Debug for Prompter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.lock();
        f.debug_struct("Prompter")
            .field("default_model", &state.default_model)
            .field("providers", &kinds(&state.providers))
            .finish()
    }
}

impl Prompter {
    /// Builds a prompter over the built-in backends.
    ///
    /// Entries whose name is unknown or whose config is `None` are skipped.
    /// Fails if `configs` is empty or a provider cannot be constructed.
    pub fn new(default_model: Option<String>, configs: &ProviderConfigs) -> Result<Self, PrompterError> {
        Self::with_registry(ProviderRegistry::default(), default_model, configs)
    }

    /// Like [`Prompter::new`], but resolves provider names through `registry`.
    pub fn with_registry(
        registry: ProviderRegistry,
        default_model: Option<String>,
        configs: &ProviderConfigs,
    ) -> Result<Self, PrompterError> {
        if configs.is_empty() {
            return Err(PrompterError::Configuration(EMPTY_CONFIG.to_string()));
        }

        let providers = build_providers(&registry, configs)?;
        info!(
            "Prompter initialized: default_model={:?}, providers={:?}",
            default_model,
            kinds(&providers)
        );

        Ok(Self {
            registry,
            state: Mutex::new(State {
                default_model,
                providers,
            }),
        })
    }

    /// Replaces every provider with those built from `configs`.
    ///
    /// The current providers are dropped even when `configs` turns out to be empty.
    pub fn set_providers(&self, configs: &ProviderConfigs) -> Result<(), PrompterError> {
        let mut state = self.lock();
        state.providers.clear();

        if configs.is_empty() {
            return Err(PrompterError::Configuration(EMPTY_CONFIG.to_string()));
        }

        state.providers = build_providers(&self.registry, configs)?;
        info!("Providers replaced: {:?}", kinds(&state.providers));
        Ok(())
    }

    /// Replaces the providers named in `configs` and keeps all others.
    ///
    /// A key mapped to `None` still evicts the existing provider of that name.
    pub fn update_providers(&self, configs: &ProviderConfigs) -> Result<(), PrompterError> {
        if configs.is_empty() {
            return Err(PrompterError::Configuration(EMPTY_CONFIG.to_string()));
        }

        // Build before touching state so a constructor failure leaves the set intact.
        let added = build_providers(&self.registry, configs)?;

        let mut state = self.lock();
        state
            .providers
            .retain(|provider| !configs.contains_key(provider.kind().as_str()));
        state.providers.extend(added);
        info!("Providers updated: {:?}", kinds(&state.providers));
        Ok(())
    }

    pub fn set_default_model(&self, model: impl Into<String>) {
        let model = model.into();
        debug!("Default model set to {}", model);
        self.lock().default_model = Some(model);
    }

    pub fn default_model(&self) -> Option<String> {
        self.lock().default_model.clone()
    }

    /// Kinds of the current providers, in dispatch order.
    pub fn provider_kinds(&self) -> Vec<ProviderKind> {
        kinds(&self.lock().providers)
    }

    /// Current providers, in dispatch order.
    pub fn providers(&self) -> Vec<Arc<dyn ModelProvider>> {
        self.lock().providers.clone()
    }

    /// Sends `prompt` to `model`, or to the default model when `model` is `None`.
    ///
    /// Providers are tried in insertion order. The first one whose allowlist and
    /// catalog both contain the model handles the request; its result is returned
    /// as is, and later providers are never consulted, even if it fails.
    pub async fn send(&self, prompt: &str, model: Option<&str>) -> Result<String, PrompterError> {
        let (model, providers) = {
            let state = self.lock();
            let model = model
                .map(str::to_string)
                .or_else(|| state.default_model.clone())
                .ok_or_else(|| {
                    PrompterError::Configuration(
                        "no model specified and no default model set".to_string(),
                    )
                })?;
            (model, state.providers.clone())
        };

        for provider in &providers {
            if !provider.supported_models().contains(&model) {
                continue;
            }
            if !provider.all_models().await?.contains(&model) {
                debug!("{} allows {} but does not offer it", provider.kind(), model);
                continue;
            }

            info!("Dispatching to {} with model {}", provider.kind(), model);
            return provider.request(prompt, &model).await.map_err(|e| {
                warn!("{} request for {} failed: {}", provider.kind(), model, e);
                PrompterError::Request(e)
            });
        }

        warn!("No provider serves model {}", model);
        Err(PrompterError::ModelNotSupported(model))
    }

    fn lock(&self) -> MutexGuard<'_, State> {
        // Every mutation leaves State consistent, so a poisoned lock is still usable.
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

fn kinds(providers: &[Arc<dyn ModelProvider>]) -> Vec<ProviderKind> {
    providers.iter().map(|p| p.kind()).collect()
}

/// Builds one provider per known, configured entry, in map order.
fn build_providers(
    registry: &ProviderRegistry,
    configs: &ProviderConfigs,
) -> Result<Vec<Arc<dyn ModelProvider>>, PrompterError> {
    let mut providers = Vec::new();

    for (name, config) in configs {
        let Some(config) = config else {
            debug!("Provider {} has no config, skipping", name);
            continue;
        };
        match registry.build(name, config.clone()) {
            Some(Ok(provider)) => providers.push(provider),
            Some(Err(e)) => {
                return Err(PrompterError::Configuration(format!(
                    "failed to construct provider {name}: {e}"
                )));
            }
            None => debug!("Unknown provider {}, skipping", name),
        }
    }

    Ok(providers)
}
