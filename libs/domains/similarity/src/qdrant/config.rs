use core_config::{ConfigError, FromEnv, env_or_default, env_parse};

/// Qdrant connection configuration
#[derive(Debug, Clone)]
pub struct QdrantConfig {
    /// gRPC endpoint, e.g. `http://qdrant:6334`
    pub url: String,
    pub api_key: Option<String>,
    pub timeout_secs: u64,
    pub collection: String,
}

impl QdrantConfig {
    pub fn new(url: String) -> Self {
        Self {
            url,
            ..Self::default()
        }
    }

    pub fn with_api_key(mut self, api_key: String) -> Self {
        self.api_key = Some(api_key);
        self
    }

    pub fn with_timeout(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }

    pub fn with_collection(mut self, collection: impl Into<String>) -> Self {
        self.collection = collection.into();
        self
    }
}

impl FromEnv for QdrantConfig {
    /// - QDRANT_HOST: defaults to qdrant (a full `http(s)://` URL is also accepted)
    /// - QDRANT_PORT: gRPC port, defaults to 6334
    /// - QDRANT_API_KEY: optional
    /// - QDRANT_TIMEOUT_SECS: defaults to 30
    /// - QDRANT_COLLECTION: defaults to users
    fn from_env() -> Result<Self, ConfigError> {
        let host = env_or_default("QDRANT_HOST", "qdrant");
        let port = env_parse("QDRANT_PORT", 6334u16)?;

        let host = host.trim().trim_end_matches('/');
        let url = if host.starts_with("http://") || host.starts_with("https://") {
            host.to_string()
        } else {
            format!("http://{}:{}", host, port)
        };

        let api_key = std::env::var("QDRANT_API_KEY")
            .ok()
            .filter(|k| !k.is_empty());

        let timeout_secs = env_parse("QDRANT_TIMEOUT_SECS", 30u64)?;

        let collection = env_or_default("QDRANT_COLLECTION", "users");
        if collection.trim().is_empty() {
            return Err(ConfigError::ParseError {
                key: "QDRANT_COLLECTION".to_string(),
                details: "must not be empty".to_string(),
            });
        }

        Ok(Self {
            url,
            api_key,
            timeout_secs,
            collection,
        })
    }
}

impl Default for QdrantConfig {
    fn default() -> Self {
        Self {
            url: "http://localhost:6334".to_string(),
            api_key: None,
            timeout_secs: 30,
            collection: "users".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const VARS: [&str; 5] = [
        "QDRANT_HOST",
        "QDRANT_PORT",
        "QDRANT_API_KEY",
        "QDRANT_TIMEOUT_SECS",
        "QDRANT_COLLECTION",
    ];

    #[test]
    fn test_from_env_defaults() {
        temp_env::with_vars(VARS.map(|k| (k, None::<&str>)), || {
            let config = QdrantConfig::from_env().unwrap();
            assert_eq!(config.url, "http://qdrant:6334");
            assert_eq!(config.api_key, None);
            assert_eq!(config.timeout_secs, 30);
            assert_eq!(config.collection, "users");
        });
    }

    #[test]
    fn test_from_env_custom() {
        temp_env::with_vars(
            [
                ("QDRANT_HOST", Some("localhost")),
                ("QDRANT_PORT", Some("7334")),
                ("QDRANT_API_KEY", Some("secret")),
                ("QDRANT_TIMEOUT_SECS", Some("3")),
                ("QDRANT_COLLECTION", Some("users1")),
            ],
            || {
                let config = QdrantConfig::from_env().unwrap();
                assert_eq!(config.url, "http://localhost:7334");
                assert_eq!(config.api_key.as_deref(), Some("secret"));
                assert_eq!(config.timeout_secs, 3);
                assert_eq!(config.collection, "users1");
            },
        );
    }

    #[test]
    fn test_from_env_rejects_bad_port() {
        temp_env::with_var("QDRANT_PORT", Some("grpc"), || {
            let err = QdrantConfig::from_env().unwrap_err();
            assert!(err.to_string().contains("QDRANT_PORT"));
        });
    }

    #[test]
    fn test_builder() {
        let config = QdrantConfig::new("http://q:6334".into())
            .with_api_key("k".into())
            .with_timeout(5)
            .with_collection("people");
        assert_eq!(config.api_key.as_deref(), Some("k"));
        assert_eq!(config.timeout_secs, 5);
        assert_eq!(config.collection, "people");
    }
}
