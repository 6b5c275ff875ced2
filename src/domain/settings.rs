use serde::{Deserialize, Serialize};

/// Key prefix of the fixed fee setting, followed by the gateway identifier.
pub const FIXED_KEY_PREFIX: &str = "fee_1_";
/// Key prefix of the percent fee setting, followed by the gateway identifier.
pub const PERCENT_KEY_PREFIX: &str = "fee_2_";
/// Value seeded for fee keys that do not exist yet.
pub const DEFAULT_FEE_VALUE: &str = "0.00";

/// One row of the host's addon settings table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Setting {
    pub module: String,
    #[serde(rename = "setting")]
    pub key: String,
    pub value: String,
}

impl Setting {
    pub fn new(module: impl Into<String>, key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            module: module.into(),
            key: key.into(),
            value: value.into(),
        }
    }
}

/// A fee setting key decoded into its component and gateway.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RuleKey {
    Fixed(String),
    Percent(String),
}

impl RuleKey {
    pub fn parse(key: &str) -> Option<Self> {
        if let Some(gateway) = key.strip_prefix(FIXED_KEY_PREFIX) {
            (!gateway.is_empty()).then(|| Self::Fixed(gateway.to_string()))
        } else if let Some(gateway) = key.strip_prefix(PERCENT_KEY_PREFIX) {
            (!gateway.is_empty()).then(|| Self::Percent(gateway.to_string()))
        } else {
            None
        }
    }

    pub fn fixed_key(gateway: &str) -> String {
        format!("{FIXED_KEY_PREFIX}{gateway}")
    }

    pub fn percent_key(gateway: &str) -> String {
        format!("{PERCENT_KEY_PREFIX}{gateway}")
    }
}

/// A payment gateway known to the host.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Gateway {
    pub name: String,
    pub display_name: Option<String>,
}

impl Gateway {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            display_name: None,
        }
    }

    pub fn with_display_name(mut self, display_name: impl Into<String>) -> Self {
        self.display_name = Some(display_name.into());
        self
    }

    /// Friendly name when configured, system name otherwise.
    pub fn label(&self) -> &str {
        match self.display_name.as_deref() {
            Some(name) if !name.is_empty() => name,
            _ => &self.name,
        }
    }
}
