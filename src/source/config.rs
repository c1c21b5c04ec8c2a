use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;

use crate::constants::{defaults, keys};

/// Loosely-typed option bag, as handed over by the pipeline
pub type Options = Map<String, Value>;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("invalid source options: {0}")]
    Decode(#[from] serde_json::Error),
    #[error("option '{0}' must not be empty")]
    Empty(&'static str),
}

/// Connection settings of the EdgeX source
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq, Eq)]
#[serde(default)]
pub struct EdgexConfig {
    pub protocol: String,
    pub server: String,
    pub port: u16,
    pub topic: String,
}

impl Default for EdgexConfig {
    fn default() -> Self {
        Self {
            protocol: defaults::PROTOCOL.to_string(),
            server: defaults::SERVER.to_string(),
            port: defaults::PORT,
            topic: defaults::TOPIC.to_string(),
        }
    }
}

impl EdgexConfig {
    /// Resolve options into a config
    ///
    /// Missing or `null` options take their defaults and unknown keys are
    /// ignored. A value of the wrong type is an error.
    pub fn from_options(options: &Options) -> Result<Self, ConfigError> {
        let present: Options = options
            .iter()
            .filter(|(_, v)| !v.is_null())
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect();
        let config: EdgexConfig = serde_json::from_value(Value::Object(present))?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.protocol.is_empty() {
            return Err(ConfigError::Empty(keys::PROTOCOL));
        }
        if self.server.is_empty() {
            return Err(ConfigError::Empty(keys::SERVER));
        }
        Ok(())
    }

    pub fn uri(&self) -> String {
        format!("{}://{}:{}", self.protocol, self.server, self.port)
    }
}
