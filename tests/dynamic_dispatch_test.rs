use gateway_fees::domain::invoice::Invoice;
use gateway_fees::domain::ports::{GatewayCatalogRef, InvoiceServiceRef, SettingsStoreRef};
use gateway_fees::domain::settings::{Gateway, Setting};
use gateway_fees::infrastructure::in_memory::{
    InMemoryGatewayCatalog, InMemoryInvoiceService, InMemorySettingsStore,
};
use std::sync::Arc;

#[tokio::test]
async fn test_ports_as_shared_trait_objects() {
    let service = InMemoryInvoiceService::new();
    service.insert_invoice(Invoice::new(1, 2, "paypal")).await.unwrap();

    let invoices: InvoiceServiceRef = Arc::new(service);
    let settings: SettingsStoreRef = Arc::new(InMemorySettingsStore::new());
    let gateways: GatewayCatalogRef =
        Arc::new(InMemoryGatewayCatalog::new(vec![Gateway::new("paypal")]));

    // Verify Send + Sync by spawning tasks
    let invoice_handle = tokio::spawn({
        let invoices = invoices.clone();
        async move { invoices.get_invoice(1).await.unwrap().unwrap() }
    });
    let settings_handle = tokio::spawn({
        let settings = settings.clone();
        async move {
            settings
                .put(Setting::new("payssion_fees", "fee_1_paypal", "1"))
                .await
                .unwrap();
            settings.settings("payssion_fees").await.unwrap()
        }
    });
    let gateway_handle = tokio::spawn(async move { gateways.gateways().await.unwrap() });

    assert_eq!(invoice_handle.await.unwrap().payment_method, "paypal");
    assert_eq!(settings_handle.await.unwrap().len(), 1);
    assert_eq!(gateway_handle.await.unwrap()[0].name, "paypal");
}
