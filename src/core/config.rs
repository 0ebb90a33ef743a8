//! # Configuration
//!
//! Settings resolve with a clear override hierarchy:
//! defaults → config file → env vars → CLI flags.
//!
//! Config lives at `~/.model-hub/config.toml`. If missing on first run, a
//! commented-out default is generated so users can discover all options.

use log::{debug, info, warn};
use serde::Deserialize;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use crate::inference::ProviderConfigs;

// ============================================================================
// Config Structs (all fields optional for sparse TOML)
// ============================================================================

#[derive(Debug, Default, Deserialize)]
pub struct HubConfig {
    pub default_model: Option<String>,
    /// One table per provider, e.g. `[providers.gemini]`. Unknown names are kept
    /// here and ignored later by the registry.
    #[serde(default)]
    pub providers: ProviderConfigs,
}

// ============================================================================
// Resolved Config
// ============================================================================

#[derive(Debug, Clone)]
pub struct ResolvedConfig {
    pub default_model: Option<String>,
    pub providers: ProviderConfigs,
}

// ============================================================================
// Error Type
// ============================================================================

#[derive(Debug)]
pub enum ConfigError {
    Io(std::io::Error),
    Parse(toml::de::Error),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Io(e) => write!(f, "config I/O error: {e}"),
            ConfigError::Parse(e) => write!(f, "config parse error: {e}"),
        }
    }
}

impl std::error::Error for ConfigError {}

// ============================================================================
// Loading
// ============================================================================

/// Returns the path to `~/.model-hub/config.toml`.
pub fn config_path() -> Option<PathBuf> {
    dirs::home_dir().map(|h| h.join(".model-hub").join("config.toml"))
}

/// Load config from `explicit` if given, else from `~/.model-hub/config.toml`.
///
/// An explicit path must exist. A missing default file is generated with
/// commented-out contents and `HubConfig::default()` is returned.
pub fn load_config(explicit: Option<&Path>) -> Result<HubConfig, ConfigError> {
    if let Some(path) = explicit {
        return load_from(path);
    }

    let path = match config_path() {
        Some(p) => p,
        None => {
            warn!("Could not determine home directory, using default config");
            return Ok(HubConfig::default());
        }
    };

    if !path.exists() {
        info!("No config file found, generating default at {}", path.display());
        generate_default_config(&path);
        return Ok(HubConfig::default());
    }

    load_from(&path)
}

fn load_from(path: &Path) -> Result<HubConfig, ConfigError> {
    let contents = fs::read_to_string(path).map_err(ConfigError::Io)?;
    let config: HubConfig = toml::from_str(&contents).map_err(ConfigError::Parse)?;
    info!("Loaded config from {}", path.display());
    debug!(
        "Config: default_model={:?}, providers={:?}",
        config.default_model,
        config.providers.keys().collect::<Vec<_>>()
    );
    Ok(config)
}

/// Generates a commented-out default config file at the given path.
fn generate_default_config(path: &Path) {
    let default_content = r#"# model-hub configuration
# Override hierarchy: defaults -> this file -> env vars -> CLI flags.

# default_model = "gemini-2.0-flash"   # Or set MODEL_HUB_DEFAULT_MODEL

# [providers.openai]
# api_key = "sk-..."                   # Or set OPENAI_API_KEY
# supported_models = ["gpt-4o-mini"]
# max_response_tokens = 4096
# temperature = 0.5
# timeout_secs = 120

# [providers.gemini]
# api_key = "..."                      # Or set GEMINI_API_KEY / GOOGLE_API_KEY
# supported_models = ["gemini-2.0-flash"]
"#;

    if let Some(parent) = path.parent()
        && let Err(e) = fs::create_dir_all(parent)
    {
        warn!("Failed to create config directory: {}", e);
        return;
    }
    if let Err(e) = fs::write(path, default_content) {
        warn!("Failed to write default config: {}", e);
    }
}

// ============================================================================
// Resolution
// ============================================================================

/// Resolve the final config by collapsing: config file → env vars → CLI.
///
/// `cli_model` is the `--model` flag (None = not specified).
pub fn resolve(config: &HubConfig, cli_model: Option<&str>) -> ResolvedConfig {
    let default_model = cli_model
        .map(|s| s.to_string())
        .or_else(|| std::env::var("MODEL_HUB_DEFAULT_MODEL").ok())
        .or_else(|| config.default_model.clone());

    ResolvedConfig {
        default_model,
        providers: config.providers.clone(),
    }
}
