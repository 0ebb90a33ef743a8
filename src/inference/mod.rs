pub mod catalog;
pub mod provider;
pub mod providers;
pub mod registry;
pub mod types;

pub use catalog::ModelCatalog;
pub use provider::{ModelProvider, ProviderError};
pub use providers::{GeminiProvider, OpenAiProvider};
pub use registry::{ProviderConstructor, ProviderRegistry};
pub use types::{ProviderConfig, ProviderConfigs, ProviderKind};
