use super::invoice::{Invoice, NewLineItem};
use super::settings::{Gateway, Setting};
use crate::error::Result;
use async_trait::async_trait;
use std::sync::Arc;

/// The host's invoice API.
///
/// Failures are reported as `FeeError::InvoiceApiError` and are not retried by callers.
#[async_trait]
pub trait InvoiceService: Send + Sync {
    async fn get_invoice(&self, invoice_id: u32) -> Result<Option<Invoice>>;
    /// Recalculates the invoice total from its current line items.
    async fn recompute_invoice(&self, invoice_id: u32) -> Result<()>;
    async fn delete_line_item(&self, item_id: u32) -> Result<()>;
    async fn add_line_item(&self, item: NewLineItem) -> Result<()>;
}

/// Flat key-value rows of the host's addon settings table.
#[async_trait]
pub trait SettingsStore: Send + Sync {
    async fn settings(&self, module: &str) -> Result<Vec<Setting>>;
    async fn exists(&self, module: &str, key: &str) -> Result<bool>;
    async fn put(&self, setting: Setting) -> Result<()>;
}

/// Payment gateways configured on the host.
#[async_trait]
pub trait GatewayCatalog: Send + Sync {
    async fn gateways(&self) -> Result<Vec<Gateway>>;
}

pub type InvoiceServiceRef = Arc<dyn InvoiceService>;
pub type SettingsStoreRef = Arc<dyn SettingsStore>;
pub type GatewayCatalogRef = Arc<dyn GatewayCatalog>;
