use std::collections::HashMap;
use thiserror::Error;

pub const DEFAULT_MODULE: &str = "payssion_fees";
pub const DEFAULT_MARKER: &str = "gateway_fees";
pub const DEFAULT_DESCRIPTION_PREFIX: &str = "Payment Gateway Fees";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Namespace of the addon settings rows holding the fee rules.
    pub module: String,
    /// Notes value identifying surcharge line items.
    pub marker: String,
    /// Leading text of surcharge descriptions and checkout estimates.
    pub description_prefix: String,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid value for {0}: {1}")]
    InvalidValue(String, String),
}

impl Default for Config {
    fn default() -> Self {
        Self {
            module: DEFAULT_MODULE.to_string(),
            marker: DEFAULT_MARKER.to_string(),
            description_prefix: DEFAULT_DESCRIPTION_PREFIX.to_string(),
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_env_map(std::env::vars().collect())
    }

    pub fn from_env_map(env_map: HashMap<String, String>) -> Result<Self, ConfigError> {
        Ok(Config {
            module: non_empty(&env_map, "GATEWAY_FEES_MODULE", DEFAULT_MODULE)?,
            marker: non_empty(&env_map, "GATEWAY_FEES_MARKER", DEFAULT_MARKER)?,
            description_prefix: non_empty(
                &env_map,
                "GATEWAY_FEES_DESCRIPTION",
                DEFAULT_DESCRIPTION_PREFIX,
            )?,
        })
    }
}

fn non_empty(
    env_map: &HashMap<String, String>,
    key: &str,
    default: &str,
) -> Result<String, ConfigError> {
    match env_map.get(key).map(|s| s.trim()) {
        None => Ok(default.to_string()),
        Some("") => Err(ConfigError::InvalidValue(
            key.to_string(),
            "must not be empty".to_string(),
        )),
        Some(value) => Ok(value.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::from_env_map(HashMap::new()).unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.module, "payssion_fees");
        assert_eq!(config.marker, "gateway_fees");
    }

    #[test]
    fn test_overrides() {
        let mut env_map = HashMap::new();
        env_map.insert("GATEWAY_FEES_MODULE".to_string(), "gateway_fees".to_string());
        env_map.insert("GATEWAY_FEES_DESCRIPTION".to_string(), "Card surcharge".to_string());
        let config = Config::from_env_map(env_map).unwrap();
        assert_eq!(config.module, "gateway_fees");
        assert_eq!(config.description_prefix, "Card surcharge");
        assert_eq!(config.marker, DEFAULT_MARKER);
    }

    #[test]
    fn test_empty_marker_rejected() {
        let mut env_map = HashMap::new();
        env_map.insert("GATEWAY_FEES_MARKER".to_string(), "  ".to_string());
        match Config::from_env_map(env_map) {
            Err(ConfigError::InvalidValue(k, _)) => assert_eq!(k, "GATEWAY_FEES_MARKER"),
            _ => panic!("Expected InvalidValue error"),
        }
    }
}
