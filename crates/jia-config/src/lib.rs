//! Configuration for the jia console: boundary endpoints and credentials.

mod error;
mod loader;
mod model;

pub use error::ConfigError;
pub use loader::{
    ENV_ASSISTANT_TIMEOUT_SECS, ENV_ASSISTANT_URL, ENV_CONFIG_PATH, ENV_STORE_API_KEY,
    ENV_STORE_URL, EnvLookup, LoadOptions,
};
pub use model::{AssistantConfig, JiaConfig, JiaConfigBuilder, StoreConfig};
