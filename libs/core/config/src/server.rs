use crate::{ConfigError, FromEnv, env_list, env_or_default, env_parse};
use std::net::Ipv4Addr;
use std::time::Duration;

const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 120;

/// HTTP listener and request-level settings
#[derive(Clone, Debug)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Upper bound for a whole request, including upstream calls.
    ///
    /// Must exceed the worst-case upstream time (embedding timeout twice plus
    /// the retry delay, then the vector store timeout), otherwise a slow
    /// upstream is cut off with an empty 503 before its own error is reported.
    pub request_timeout_secs: u64,
    /// Allowed CORS origins; empty disables the CORS layer
    pub cors_origins: Vec<String>,
}

impl ServerConfig {
    /// Get the server address as "host:port"
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

impl FromEnv for ServerConfig {
    /// - HOST: defaults to 0.0.0.0
    /// - PORT: defaults to 8080
    /// - REQUEST_TIMEOUT_SECS: defaults to 120
    /// - CORS_ALLOWED_ORIGIN: comma-separated, unset means no CORS
    fn from_env() -> Result<Self, ConfigError> {
        let host = env_or_default("HOST", &Ipv4Addr::UNSPECIFIED.to_string());
        let port = env_parse("PORT", 8080u16)?;
        let request_timeout_secs = env_parse("REQUEST_TIMEOUT_SECS", DEFAULT_REQUEST_TIMEOUT_SECS)?;
        let cors_origins = env_list("CORS_ALLOWED_ORIGIN", "");

        Ok(Self {
            host,
            port,
            request_timeout_secs,
            cors_origins,
        })
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: Ipv4Addr::UNSPECIFIED.to_string(),
            port: 8080,
            request_timeout_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
            cors_origins: Vec::new(),
        }
    }
}
