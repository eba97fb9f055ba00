use std::time::Duration;

use async_trait::async_trait;
use core_config::{ConfigError, FromEnv, env_list, env_or_default, env_parse};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument, warn};

use super::EmbeddingProvider;
use crate::error::{SimilarityError, SimilarityResult};
use crate::retry::{RetryPolicy, retry_if};

/// Ollama embedding server configuration
#[derive(Debug, Clone)]
pub struct OllamaConfig {
    pub base_url: String,
    /// Tried in order until one returns a usable vector
    pub models: Vec<String>,
    pub dimension: usize,
    /// Per-request timeout
    pub timeout: Duration,
    pub retry: RetryPolicy,
}

impl OllamaConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Self::default()
        }
    }

    pub fn with_models(mut self, models: Vec<String>) -> Self {
        self.models = models;
        self
    }

    pub fn with_dimension(mut self, dimension: usize) -> Self {
        self.dimension = dimension;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    /// `host` may be a bare host name or a full `http(s)://` URL.
    fn base_url_from(host: &str, port: u16) -> String {
        let host = host.trim().trim_end_matches('/');
        if host.starts_with("http://") || host.starts_with("https://") {
            host.to_string()
        } else {
            format!("http://{}:{}", host, port)
        }
    }
}

impl FromEnv for OllamaConfig {
    /// - OLLAMA_HOST: defaults to localhost
    /// - OLLAMA_PORT: defaults to 11434
    /// - EMBEDDING_MODELS: comma-separated, defaults to nomic-embed-text
    /// - EMBEDDING_DIMENSION: defaults to 768
    /// - EMBEDDING_TIMEOUT_SECS: defaults to 30
    /// - EMBEDDING_RETRY_DELAY_MS: defaults to 200
    fn from_env() -> Result<Self, ConfigError> {
        let host = env_or_default("OLLAMA_HOST", "localhost");
        let port = env_parse("OLLAMA_PORT", 11434u16)?;

        let models = env_list("EMBEDDING_MODELS", "nomic-embed-text");
        if models.is_empty() {
            return Err(ConfigError::ParseError {
                key: "EMBEDDING_MODELS".to_string(),
                details: "at least one model is required".to_string(),
            });
        }

        let dimension = env_parse("EMBEDDING_DIMENSION", 768usize)?;
        if dimension == 0 {
            return Err(ConfigError::ParseError {
                key: "EMBEDDING_DIMENSION".to_string(),
                details: "must be greater than zero".to_string(),
            });
        }

        let timeout_secs = env_parse("EMBEDDING_TIMEOUT_SECS", 30u64)?;
        let retry_delay_ms = env_parse("EMBEDDING_RETRY_DELAY_MS", 200u64)?;

        Ok(Self {
            base_url: Self::base_url_from(&host, port),
            models,
            dimension,
            timeout: Duration::from_secs(timeout_secs),
            retry: RetryPolicy::new().with_initial_delay(retry_delay_ms),
        })
    }
}

impl Default for OllamaConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:11434".to_string(),
            models: vec!["nomic-embed-text".to_string()],
            dimension: 768,
            timeout: Duration::from_secs(30),
            retry: RetryPolicy::default(),
        }
    }
}

#[derive(Debug, Serialize)]
struct EmbeddingRequest<'a> {
    model: &'a str,
    prompt: &'a str,
}

#[derive(Debug, Deserialize)]
struct EmbeddingResponse {
    #[serde(default)]
    embedding: Option<Vec<f32>>,
}

/// Embeddings from a local Ollama server (`POST /api/embeddings`)
pub struct OllamaProvider {
    client: Client,
    config: OllamaConfig,
}

impl OllamaProvider {
    pub fn new(config: OllamaConfig) -> SimilarityResult<Self> {
        if config.models.is_empty() {
            return Err(SimilarityError::Config(
                "at least one embedding model is required".to_string(),
            ));
        }

        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| SimilarityError::Config(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self { client, config })
    }

    async fn embed_with_model(&self, model: &str, text: &str) -> SimilarityResult<Vec<f32>> {
        let response = self
            .client
            .post(format!("{}/api/embeddings", self.config.base_url))
            .json(&EmbeddingRequest {
                model,
                prompt: text,
            })
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            return Err(SimilarityError::Embedding(format!(
                "Ollama API error ({}) for model {}: {}",
                status, model, error_text
            )));
        }

        let body: EmbeddingResponse = response.json().await?;

        let vector = body
            .embedding
            .filter(|v| !v.is_empty())
            .ok_or_else(|| {
                SimilarityError::Embedding(format!("Model {} returned no embedding", model))
            })?;

        if vector.len() != self.config.dimension {
            return Err(SimilarityError::Embedding(format!(
                "Model {} returned {} dimensions, expected {}",
                model,
                vector.len(),
                self.config.dimension
            )));
        }

        Ok(vector)
    }
}

#[async_trait]
impl EmbeddingProvider for OllamaProvider {
    fn provider_name(&self) -> &'static str {
        "ollama"
    }

    fn dimension(&self) -> usize {
        self.config.dimension
    }

    /// Models are tried in order. A model that answers badly falls through to
    /// the next one; an unreachable server ends the attempt immediately.
    #[instrument(skip(self, text), fields(text_len = text.len()))]
    async fn embed(&self, text: &str) -> SimilarityResult<Vec<f32>> {
        if text.trim().is_empty() {
            return Err(SimilarityError::Validation(
                "Embedding input must not be empty".to_string(),
            ));
        }

        let mut last_error = None;

        for model in &self.config.models {
            let result = retry_if(
                || self.embed_with_model(model, text),
                &self.config.retry,
                SimilarityError::is_transient,
            )
            .await;

            match result {
                Ok(vector) => {
                    debug!(model = %model, "Generated embedding");
                    return Ok(vector);
                }
                Err(e) if e.is_transient() => return Err(e),
                Err(e) => {
                    warn!(model = %model, error = %e, "Embedding model failed");
                    last_error = Some(e);
                }
            }
        }

        Err(last_error.unwrap_or_else(|| {
            SimilarityError::Embedding("No embedding model available".to_string())
        }))
    }

    async fn health_check(&self) -> SimilarityResult<()> {
        let response = self
            .client
            .get(format!("{}/api/tags", self.config.base_url))
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(SimilarityError::UpstreamUnavailable(format!(
                "Ollama health check returned {}",
                response.status()
            )));
        }

        Ok(())
    }
}
