use crate::domain::fee_rule::FeeRuleSet;
use crate::domain::ports::SettingsStoreRef;
use crate::error::Result;

/// Read-only view of the fee rules kept in the addon settings table.
#[derive(Clone)]
pub struct FeeRuleStore {
    settings: SettingsStoreRef,
    module: String,
}

impl FeeRuleStore {
    pub fn new(settings: SettingsStoreRef, module: impl Into<String>) -> Self {
        Self {
            settings,
            module: module.into(),
        }
    }

    /// Loads every configured gateway rule.
    pub async fn list_rules(&self) -> Result<FeeRuleSet> {
        let rows = self.settings.settings(&self.module).await?;
        Ok(FeeRuleSet::from_settings(rows))
    }
}
