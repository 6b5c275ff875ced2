#![allow(dead_code)]

use gateway_fees::application::estimator::CheckoutEstimator;
use gateway_fees::application::hooks::HookDispatcher;
use gateway_fees::application::reconciler::InvoiceReconciler;
use gateway_fees::application::rule_store::FeeRuleStore;
use gateway_fees::config::Config;
use gateway_fees::domain::invoice::{Invoice, LineItem};
use gateway_fees::domain::settings::Setting;
use gateway_fees::infrastructure::in_memory::{InMemoryInvoiceService, InMemorySettingsStore};
use rust_decimal::Decimal;
use std::sync::Arc;

pub const MARKER: &str = "gateway_fees";

/// In-memory host with a reconciler and dispatcher wired to it.
pub struct Host {
    pub invoices: Arc<InMemoryInvoiceService>,
    pub settings: Arc<InMemorySettingsStore>,
    pub config: Config,
}

impl Host {
    pub async fn with_rules(rules: &[(&str, &str, &str)]) -> Self {
        let settings = Arc::new(InMemorySettingsStore::new());
        settings
            .put_all(
                rules
                    .iter()
                    .flat_map(|(gateway, fixed, percent)| {
                        [
                            Setting::new("payssion_fees", format!("fee_1_{gateway}"), *fixed),
                            Setting::new("payssion_fees", format!("fee_2_{gateway}"), *percent),
                        ]
                    })
                    .collect(),
            )
            .await;
        Self {
            invoices: Arc::new(InMemoryInvoiceService::new()),
            settings,
            config: Config::default(),
        }
    }

    pub fn rule_store(&self) -> FeeRuleStore {
        FeeRuleStore::new(self.settings.clone(), self.config.module.clone())
    }

    pub fn reconciler(&self) -> InvoiceReconciler {
        InvoiceReconciler::new(self.invoices.clone(), self.rule_store(), &self.config)
    }

    pub fn dispatcher(&self) -> HookDispatcher {
        HookDispatcher::new(
            self.reconciler(),
            CheckoutEstimator::new(self.rule_store(), &self.config),
        )
    }

    /// Adds an invoice with a single product line of `amount`.
    pub async fn invoice(&self, id: u32, payment_method: &str, amount: Decimal) {
        let mut invoice = Invoice::new(id, 100 + id, payment_method);
        invoice.line_items.push(LineItem {
            id: id * 1000,
            invoice_id: id,
            item_type: "Hosting".to_string(),
            notes: String::new(),
            description: "Shared hosting".to_string(),
            amount,
            taxed: false,
        });
        self.invoices.insert_invoice(invoice).await.unwrap();
    }

    pub async fn fee_items(&self, id: u32) -> Vec<LineItem> {
        self.invoices
            .invoice(id)
            .await
            .map(|invoice| invoice.marked_items(MARKER).cloned().collect())
            .unwrap_or_default()
    }

    pub async fn total(&self, id: u32) -> Decimal {
        self.invoices
            .invoice(id)
            .await
            .map(|invoice| invoice.total)
            .unwrap_or_default()
    }
}
