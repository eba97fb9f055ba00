mod ollama;
mod provider;

pub use ollama::{OllamaConfig, OllamaProvider};
pub use provider::EmbeddingProvider;

#[cfg(test)]
pub use provider::MockEmbeddingProvider;
