//! # Core
//!
//! The dispatcher and the configuration that feeds it.
//!
//! ```text
//!   config.toml ──► config::resolve ──► ProviderConfigs
//!                                            │
//!                                            ▼
//!                                    ProviderRegistry ──► Prompter::send ──► ModelProvider::request
//! ```
//!
//! ## Modules
//!
//! - [`config`]: file loading and override resolution
//! - [`prompter`]: the `Prompter` dispatcher and its error type

pub mod config;
pub mod prompter;

pub use prompter::{Prompter, PrompterError};
