use std::time::Duration;

use serde::{Deserialize, Deserializer};
use thiserror::Error;

const DEFAULT_ENDPOINT_URL: &str = "opc.tcp://localhost:4840";
const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);
const DEFAULT_MAX_PENDING_REQUESTS: usize = 10_000;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Unable to parse configuration: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

fn duration_from_millis<'de, D: Deserializer<'de>>(d: D) -> Result<Duration, D::Error> {
    u64::deserialize(d).map(Duration::from_millis)
}

/// Configuration of the request processing side of a stack server.
///
/// # Examples
///
/// ```
/// use std::time::Duration;
/// use opcx_stack::StackServerConfig;
///
/// let config = StackServerConfig::new()
///     .with_endpoint_url("opc.tcp://plc-gateway:4840")
///     .with_request_timeout(Duration::from_secs(5));
/// assert_eq!(config.max_pending_requests, 10_000);
///
/// let config = StackServerConfig::from_json(r#"{"request_timeout_ms": 250}"#).unwrap();
/// assert_eq!(config.request_timeout, Duration::from_millis(250));
/// ```
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct StackServerConfig {
    pub endpoint_url: String,
    /// Upper bound on how long a service handler may take before the request is faulted
    #[serde(rename = "request_timeout_ms", deserialize_with = "duration_from_millis")]
    pub request_timeout: Duration,
    /// Requests beyond this many in flight are faulted with `Bad_TooManyOperations`
    pub max_pending_requests: usize,
}

impl Default for StackServerConfig {
    fn default() -> Self {
        Self {
            endpoint_url: DEFAULT_ENDPOINT_URL.into(),
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
            max_pending_requests: DEFAULT_MAX_PENDING_REQUESTS,
        }
    }
}

impl StackServerConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn with_endpoint_url<S: Into<String>>(mut self, endpoint_url: S) -> Self {
        self.endpoint_url = endpoint_url.into();
        self
    }

    pub fn with_request_timeout(mut self, request_timeout: Duration) -> Self {
        self.request_timeout = request_timeout;
        self
    }

    pub fn with_max_pending_requests(mut self, max_pending_requests: usize) -> Self {
        self.max_pending_requests = max_pending_requests;
        self
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.request_timeout.is_zero() {
            return Err(ConfigError::Invalid("request timeout must be non zero".into()));
        }
        if self.max_pending_requests == 0 {
            return Err(ConfigError::Invalid(
                "max pending requests must be at least 1".into(),
            ));
        }
        if !self.endpoint_url.starts_with("opc.tcp://") {
            return Err(ConfigError::Invalid(format!(
                "endpoint url {} is not an opc.tcp url",
                self.endpoint_url
            )));
        }
        Ok(())
    }
}
