use serde::Deserialize;
use std::env;
use std::sync::OnceLock;
use thiserror::Error;

/// Errors encountered while loading configuration from environment variables.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Required environment variable was not provided.
    #[error("Missing environment variable: {0}")]
    MissingVariable(String),
    /// Environment variable contained a value that could not be parsed.
    #[error("Invalid value for environment variable: {0}")]
    InvalidValue(String),
}

/// Runtime configuration for the Draft Forge server.
#[derive(Debug, Deserialize)]
pub struct Config {
    /// Base URL of the external search provider.
    pub search_api_url: String,
    /// Optional API key sent to the search provider.
    pub search_api_key: Option<String>,
    /// Maximum results requested per search call.
    pub search_max_results: usize,
    /// Retry attempts after the first failed lookup.
    pub search_max_retries: u32,
    /// Base retry delay in milliseconds before exponential growth.
    pub search_retry_base_ms: u64,
    /// Whether retry delays are randomized to avoid synchronized retries.
    pub search_retry_jitter: bool,
    /// Base URL of the vector store holding research documents.
    pub store_url: String,
    /// Name of the store collection used for research documents.
    pub store_collection_name: String,
    /// Optional API key required to access the store.
    pub store_api_key: Option<String>,
    /// Whether synthetic fallback research is persisted to the store.
    pub store_fallback_research: bool,
    /// Optional override for the Ollama base URL used for generation.
    pub ollama_url: Option<String>,
    /// Model identifier passed to the generation provider.
    pub generation_model: String,
    /// Optional override for the HTTP server port.
    pub server_port: Option<u16>,
}

const DEFAULT_MAX_RESULTS: usize = 5;
const DEFAULT_MAX_RETRIES: u32 = 3;
const DEFAULT_RETRY_BASE_MS: u64 = 2000;

impl Config {
    /// Load configuration from environment variables, performing validation along the way.
    pub fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            search_api_url: load_env("SEARCH_API_URL")?,
            search_api_key: load_env_optional("SEARCH_API_KEY"),
            search_max_results: parse_optional("SEARCH_MAX_RESULTS")?
                .unwrap_or(DEFAULT_MAX_RESULTS),
            search_max_retries: parse_optional("SEARCH_MAX_RETRIES")?
                .unwrap_or(DEFAULT_MAX_RETRIES),
            search_retry_base_ms: parse_optional("SEARCH_RETRY_BASE_MS")?
                .unwrap_or(DEFAULT_RETRY_BASE_MS),
            search_retry_jitter: parse_optional("SEARCH_RETRY_JITTER")?.unwrap_or(true),
            store_url: load_env("STORE_URL")?,
            store_collection_name: load_env("STORE_COLLECTION_NAME")?,
            store_api_key: load_env_optional("STORE_API_KEY"),
            store_fallback_research: parse_optional("STORE_FALLBACK_RESEARCH")?.unwrap_or(false),
            ollama_url: load_env_optional("OLLAMA_URL"),
            generation_model: load_env("GENERATION_MODEL")?,
            server_port: parse_optional("SERVER_PORT")?,
        })
    }
}

fn load_env(key: &str) -> Result<String, ConfigError> {
    env::var(key).map_err(|_| ConfigError::MissingVariable(key.to_string()))
}

fn load_env_optional(key: &str) -> Option<String> {
    env::var(key).ok().filter(|value| !value.trim().is_empty())
}

fn parse_optional<T: std::str::FromStr>(key: &str) -> Result<Option<T>, ConfigError> {
    load_env_optional(key)
        .map(|value| {
            value
                .parse()
                .map_err(|_| ConfigError::InvalidValue(key.to_string()))
        })
        .transpose()
}

/// Global configuration cache populated during process start.
pub static CONFIG: OnceLock<Config> = OnceLock::new();

/// Retrieve the loaded configuration, panicking if initialization has not occurred.
pub fn get_config() -> &'static Config {
    CONFIG.get().expect("Config not initialized")
}

/// Load configuration from the environment and install it in the global cache.
pub fn init_config() {
    dotenvy::dotenv().ok();
    let config = Config::from_env().expect("Failed to load config from environment");
    tracing::debug!(
        search_api_url = %config.search_api_url,
        store_url = %config.store_url,
        collection = %config.store_collection_name,
        model = %config.generation_model,
        server_port = ?config.server_port,
        "Loaded configuration"
    );
    CONFIG.set(config).expect("Failed to set config");
}
