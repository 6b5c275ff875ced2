use crate::domain::ports::{GatewayCatalogRef, SettingsStoreRef};
use crate::domain::settings::{DEFAULT_FEE_VALUE, Gateway, RuleKey, Setting};
use crate::error::Result;
use serde::{Serialize, Serializer};
use tracing::info;

pub const ADDON_NAME: &str = "Gateway Fees (All Gateways)";
pub const ADDON_DESCRIPTION: &str = "Configure fixed + percent fees per payment gateway.";
pub const ADDON_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Configuration schema presented by the host's addon settings page.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AddonConfig {
    pub name: String,
    pub description: String,
    pub version: String,
    /// Serialized as a map keyed by setting name, in gateway order.
    #[serde(serialize_with = "fields_by_key")]
    pub fields: Vec<ConfigField>,
}

fn fields_by_key<S>(fields: &[ConfigField], serializer: S) -> std::result::Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.collect_map(fields.iter().map(|field| (&field.key, field)))
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct ConfigField {
    #[serde(skip)]
    pub key: String,
    pub friendly_name: String,
    #[serde(rename = "Type")]
    pub field_type: String,
    pub size: u8,
    pub default: String,
    pub description: String,
}

impl ConfigField {
    fn text(key: String, friendly_name: String, description: &str) -> Self {
        Self {
            key,
            friendly_name,
            field_type: "text".to_string(),
            size: 10,
            default: DEFAULT_FEE_VALUE.to_string(),
            description: description.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LifecycleStatus {
    Success,
}

/// Result of an activation or deactivation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LifecycleReport {
    pub status: LifecycleStatus,
    pub description: String,
    /// Keys seeded during activation.
    pub seeded: Vec<String>,
}

/// Addon surface: configuration schema and activation lifecycle.
pub struct AddonModule {
    settings: SettingsStoreRef,
    gateways: GatewayCatalogRef,
    module: String,
}

impl AddonModule {
    pub fn new(
        settings: SettingsStoreRef,
        gateways: GatewayCatalogRef,
        module: impl Into<String>,
    ) -> Self {
        Self {
            settings,
            gateways,
            module: module.into(),
        }
    }

    /// Two text fields per known gateway: fixed amount and percent.
    pub async fn config(&self) -> Result<AddonConfig> {
        let gateways = self.gateways.gateways().await?;
        let fields = gateways.iter().flat_map(gateway_fields).collect();
        Ok(AddonConfig {
            name: ADDON_NAME.to_string(),
            description: ADDON_DESCRIPTION.to_string(),
            version: ADDON_VERSION.to_string(),
            fields,
        })
    }

    /// Seeds a default value for every missing fee key. Existing values are kept.
    pub async fn activate(&self) -> Result<LifecycleReport> {
        let mut seeded = Vec::new();
        for gateway in self.gateways.gateways().await? {
            for key in [
                RuleKey::fixed_key(&gateway.name),
                RuleKey::percent_key(&gateway.name),
            ] {
                if !self.settings.exists(&self.module, &key).await? {
                    self.settings
                        .put(Setting::new(&self.module, &key, DEFAULT_FEE_VALUE))
                        .await?;
                    seeded.push(key);
                }
            }
        }
        info!(module = %self.module, seeded = seeded.len(), "Addon activated");
        Ok(LifecycleReport {
            status: LifecycleStatus::Success,
            description: "Initialized fee keys for all gateways.".to_string(),
            seeded,
        })
    }

    /// Leaves every stored rule in place.
    pub fn deactivate(&self) -> LifecycleReport {
        info!(module = %self.module, "Addon deactivated");
        LifecycleReport {
            status: LifecycleStatus::Success,
            description: "Addon deactivated. Settings preserved.".to_string(),
            seeded: Vec::new(),
        }
    }
}

fn gateway_fields(gateway: &Gateway) -> [ConfigField; 2] {
    let label = gateway.label();
    [
        ConfigField::text(
            RuleKey::fixed_key(&gateway.name),
            format!("{label} - Fixed"),
            "Fixed fee amount (in invoice currency)",
        ),
        ConfigField::text(
            RuleKey::percent_key(&gateway.name),
            format!("{label} - Percent"),
            "Percent fee (e.g. 4.4 for 4.4%)",
        ),
    ]
}
