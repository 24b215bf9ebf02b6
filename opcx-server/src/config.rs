use opcx_stack::{ConfigError, StackServerConfig};
use serde::Deserialize;

const DEFAULT_MAX_NODES_PER_READ: usize = 10_000;
const DEFAULT_MAX_NODES_PER_WRITE: usize = 10_000;

/// Configuration of a [UaServer](crate::UaServer).
///
/// ```
/// use opcx_server::ServerConfig;
///
/// let config = ServerConfig::from_json(r#"{
///     "stack": { "endpoint_url": "opc.tcp://0.0.0.0:4840", "request_timeout_ms": 5000 },
///     "max_nodes_per_read": 500
/// }"#).unwrap();
/// assert_eq!(config.max_nodes_per_read, 500);
/// assert_eq!(config.max_nodes_per_write, 10_000);
/// ```
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub stack: StackServerConfig,
    /// Read requests with more items are faulted with `Bad_TooManyOperations`
    pub max_nodes_per_read: usize,
    /// Write requests with more items are faulted with `Bad_TooManyOperations`
    pub max_nodes_per_write: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            stack: StackServerConfig::default(),
            max_nodes_per_read: DEFAULT_MAX_NODES_PER_READ,
            max_nodes_per_write: DEFAULT_MAX_NODES_PER_WRITE,
        }
    }
}

impl ServerConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn with_stack(mut self, stack: StackServerConfig) -> Self {
        self.stack = stack;
        self
    }

    pub fn with_max_nodes_per_read(mut self, max_nodes_per_read: usize) -> Self {
        self.max_nodes_per_read = max_nodes_per_read;
        self
    }

    pub fn with_max_nodes_per_write(mut self, max_nodes_per_write: usize) -> Self {
        self.max_nodes_per_write = max_nodes_per_write;
        self
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.stack.validate()?;
        if self.max_nodes_per_read == 0 || self.max_nodes_per_write == 0 {
            return Err(ConfigError::Invalid(
                "max nodes per read and write must be at least 1".into(),
            ));
        }
        Ok(())
    }
}
