use gateway_fees::application::addon::{AddonModule, LifecycleStatus};
use gateway_fees::domain::ports::SettingsStore;
use gateway_fees::domain::settings::{Gateway, Setting};
use gateway_fees::infrastructure::in_memory::{InMemoryGatewayCatalog, InMemorySettingsStore};
use std::sync::Arc;

fn catalog() -> Arc<InMemoryGatewayCatalog> {
    Arc::new(InMemoryGatewayCatalog::new(vec![
        Gateway::new("paypal").with_display_name("PayPal"),
        Gateway::new("payssion_alipay"),
    ]))
}

#[tokio::test]
async fn test_config_schema_lists_two_fields_per_gateway() {
    let addon = AddonModule::new(
        Arc::new(InMemorySettingsStore::new()),
        catalog(),
        "payssion_fees",
    );

    let config = addon.config().await.unwrap();
    let keys: Vec<&str> = config.fields.iter().map(|f| f.key.as_str()).collect();
    assert_eq!(
        keys,
        vec![
            "fee_1_paypal",
            "fee_2_paypal",
            "fee_1_payssion_alipay",
            "fee_2_payssion_alipay"
        ]
    );
    assert_eq!(config.fields[0].friendly_name, "PayPal - Fixed");
    assert_eq!(config.fields[3].friendly_name, "payssion_alipay - Percent");
    assert!(config.fields.iter().all(|f| f.default == "0.00"));

    let json = serde_json::to_value(&config).unwrap();
    assert_eq!(json["name"], "Gateway Fees (All Gateways)");
    assert_eq!(json["fields"]["fee_2_paypal"]["FriendlyName"], "PayPal - Percent");
    assert_eq!(
        json["fields"]["fee_2_paypal"]["Description"],
        "Percent fee (e.g. 4.4 for 4.4%)"
    );
}

#[tokio::test]
async fn test_activation_seeds_missing_keys_only() {
    let settings = Arc::new(InMemorySettingsStore::new());
    settings
        .put(Setting::new("payssion_fees", "fee_2_paypal", "4.4"))
        .await
        .unwrap();
    let addon = AddonModule::new(settings.clone(), catalog(), "payssion_fees");

    let report = addon.activate().await.unwrap();
    assert_eq!(report.status, LifecycleStatus::Success);
    assert_eq!(
        report.seeded,
        vec!["fee_1_paypal", "fee_1_payssion_alipay", "fee_2_payssion_alipay"]
    );

    let rows = settings.settings("payssion_fees").await.unwrap();
    assert_eq!(rows.len(), 4);
    let paypal_percent = rows.iter().find(|r| r.key == "fee_2_paypal").unwrap();
    assert_eq!(paypal_percent.value, "4.4");

    // Activating again changes nothing.
    let report = addon.activate().await.unwrap();
    assert!(report.seeded.is_empty());
}
