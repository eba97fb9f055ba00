use core_config::{AppInfo, ConfigError, FromEnv, app_info, env_or_default, server::ServerConfig};
use domain_similarity::{OllamaConfig, QdrantConfig};
use std::str::FromStr;

// Re-export Environment for use in other modules
pub use core_config::Environment;

/// Which vector store backs the users collection
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StoreBackend {
    Qdrant,
    /// Process-local store; contents are lost on restart
    Memory,
}

impl FromStr for StoreBackend {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "qdrant" => Ok(StoreBackend::Qdrant),
            "memory" => Ok(StoreBackend::Memory),
            other => Err(format!(
                "Unknown vector store '{}', expected 'qdrant' or 'memory'",
                other
            )),
        }
    }
}

/// Application-specific configuration
/// Composes shared config components from the `config` library
#[derive(Clone, Debug)]
pub struct Config {
    pub app: AppInfo,
    pub server: ServerConfig,
    pub environment: Environment,
    pub ollama: OllamaConfig,
    pub qdrant: QdrantConfig,
    pub store: StoreBackend,
}

impl Config {
    pub fn from_env() -> eyre::Result<Self> {
        let environment = Environment::from_env();
        let server = ServerConfig::from_env()?; // Uses defaults: HOST=0.0.0.0, PORT=8080
        let ollama = OllamaConfig::from_env()?;
        let qdrant = QdrantConfig::from_env()?;

        let store: StoreBackend = env_or_default("VECTOR_STORE", "qdrant")
            .parse()
            .map_err(|details| ConfigError::ParseError {
                key: "VECTOR_STORE".to_string(),
                details,
            })?;

        Ok(Self {
            app: app_info!(),
            server,
            environment,
            ollama,
            qdrant,
            store,
        })
    }
}
