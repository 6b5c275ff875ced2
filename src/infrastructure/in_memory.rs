use crate::domain::invoice::{Invoice, LineItem, NewLineItem};
use crate::domain::ports::{GatewayCatalog, InvoiceService, SettingsStore};
use crate::domain::settings::{Gateway, Setting};
use crate::error::{FeeError, Result};
use async_trait::async_trait;
use rust_decimal::Decimal;
use std::collections::{BTreeMap, HashMap};
use std::str::FromStr;
use std::sync::Arc;
use tokio::sync::RwLock;

#[derive(Default)]
struct InvoiceState {
    invoices: HashMap<u32, Invoice>,
    next_item_id: u32,
    recomputes: usize,
    unavailable: bool,
}

impl InvoiceState {
    fn ensure_available(&self) -> Result<()> {
        if self.unavailable {
            Err(FeeError::InvoiceApiError("invoice API unavailable".to_string()))
        } else {
            Ok(())
        }
    }
}

/// A thread-safe in-memory stand-in for the host's invoice API.
///
/// Recomputing sets the invoice total to the sum of its line items. Useful for
/// tests and for replaying host events offline.
#[derive(Default, Clone)]
pub struct InMemoryInvoiceService {
    state: Arc<RwLock<InvoiceState>>,
}

impl InMemoryInvoiceService {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts or replaces an invoice. Its total is recomputed from the line items.
    pub async fn insert_invoice(&self, mut invoice: Invoice) -> Result<()> {
        invoice.total = invoice.line_item_total()?;
        let mut state = self.state.write().await;
        if let Some(max_id) = invoice.line_items.iter().map(|item| item.id).max() {
            state.next_item_id = state.next_item_id.max(max_id);
        }
        state.invoices.insert(invoice.id, invoice);
        Ok(())
    }

    pub async fn invoice(&self, invoice_id: u32) -> Option<Invoice> {
        self.state.read().await.invoices.get(&invoice_id).cloned()
    }

    /// All invoices ordered by id.
    pub async fn invoices(&self) -> Vec<Invoice> {
        let state = self.state.read().await;
        let mut invoices: Vec<Invoice> = state.invoices.values().cloned().collect();
        invoices.sort_by_key(|invoice| invoice.id);
        invoices
    }

    /// Number of recompute calls served so far.
    pub async fn recompute_count(&self) -> usize {
        self.state.read().await.recomputes
    }

    /// Makes every subsequent mutating call fail, simulating a host API outage.
    pub async fn set_unavailable(&self, unavailable: bool) {
        self.state.write().await.unavailable = unavailable;
    }
}

#[async_trait]
impl InvoiceService for InMemoryInvoiceService {
    async fn get_invoice(&self, invoice_id: u32) -> Result<Option<Invoice>> {
        Ok(self.invoice(invoice_id).await)
    }

    async fn recompute_invoice(&self, invoice_id: u32) -> Result<()> {
        let mut state = self.state.write().await;
        state.ensure_available()?;
        let invoice = state.invoices.get_mut(&invoice_id).ok_or_else(|| {
            FeeError::InvoiceApiError(format!("invoice {invoice_id} not found"))
        })?;
        invoice.total = invoice.line_item_total()?;
        state.recomputes += 1;
        Ok(())
    }

    async fn delete_line_item(&self, item_id: u32) -> Result<()> {
        let mut state = self.state.write().await;
        state.ensure_available()?;
        for invoice in state.invoices.values_mut() {
            if let Some(pos) = invoice.line_items.iter().position(|item| item.id == item_id) {
                invoice.line_items.remove(pos);
                return Ok(());
            }
        }
        Err(FeeError::InvoiceApiError(format!(
            "line item {item_id} not found"
        )))
    }

    async fn add_line_item(&self, item: NewLineItem) -> Result<()> {
        let mut state = self.state.write().await;
        state.ensure_available()?;
        let amount = Decimal::from_str(&item.amount)?;
        state.next_item_id += 1;
        let id = state.next_item_id;
        let invoice = state.invoices.get_mut(&item.invoice_id).ok_or_else(|| {
            FeeError::InvoiceApiError(format!("invoice {} not found", item.invoice_id))
        })?;
        invoice.line_items.push(LineItem {
            id,
            invoice_id: item.invoice_id,
            item_type: item.item_type,
            notes: item.notes,
            description: item.description,
            amount,
            taxed: item.taxed,
        });
        Ok(())
    }
}

/// A thread-safe in-memory addon settings table.
#[derive(Default, Clone)]
pub struct InMemorySettingsStore {
    rows: Arc<RwLock<BTreeMap<(String, String), String>>>,
}

impl InMemorySettingsStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn put_all(&self, settings: Vec<Setting>) {
        let mut rows = self.rows.write().await;
        for setting in settings {
            rows.insert((setting.module, setting.key), setting.value);
        }
    }
}

#[async_trait]
impl SettingsStore for InMemorySettingsStore {
    async fn settings(&self, module: &str) -> Result<Vec<Setting>> {
        let rows = self.rows.read().await;
        Ok(rows
            .iter()
            .filter(|((row_module, _), _)| row_module == module)
            .map(|((row_module, key), value)| Setting::new(row_module, key, value))
            .collect())
    }

    async fn exists(&self, module: &str, key: &str) -> Result<bool> {
        let rows = self.rows.read().await;
        Ok(rows.contains_key(&(module.to_string(), key.to_string())))
    }

    async fn put(&self, setting: Setting) -> Result<()> {
        let mut rows = self.rows.write().await;
        rows.insert((setting.module, setting.key), setting.value);
        Ok(())
    }
}

/// A fixed list of gateways.
#[derive(Default, Clone)]
pub struct InMemoryGatewayCatalog {
    gateways: Vec<Gateway>,
}

impl InMemoryGatewayCatalog {
    pub fn new(gateways: Vec<Gateway>) -> Self {
        Self { gateways }
    }
}

#[async_trait]
impl GatewayCatalog for InMemoryGatewayCatalog {
    async fn gateways(&self) -> Result<Vec<Gateway>> {
        Ok(self.gateways.clone())
    }
}
