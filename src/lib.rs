//! Route a prompt to whichever configured backend serves the requested model.
//!
//! ```no_run
//! use model_hub::{Prompter, ProviderConfig, ProviderConfigs};
//!
//! # async fn run() -> Result<(), model_hub::PrompterError> {
//! let mut configs = ProviderConfigs::new();
//! configs.insert(
//!     "gemini".to_string(),
//!     Some(ProviderConfig::new("api-key", &["gemini-2.0-flash"])),
//! );
//!
//! let prompter = Prompter::new(Some("gemini-2.0-flash".to_string()), &configs)?;
//! let _answer = prompter.send("Hello!", None).await?;
//! # Ok(())
//! # }
//! ```

pub mod core;
pub mod inference;

#[cfg(test)]
pub mod test_support;

pub use crate::core::{Prompter, PrompterError};
pub use inference::{ModelProvider, ProviderConfig, ProviderConfigs, ProviderError, ProviderKind, ProviderRegistry};
