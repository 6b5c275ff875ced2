use super::rule_store::FeeRuleStore;
use crate::config::Config;
use crate::domain::calculator::{compute_fee, format_amount};
use crate::domain::fee_rule::FeeRule;
use crate::domain::invoice::{FEE_ITEM_TYPE, Invoice, NewLineItem};
use crate::domain::ports::InvoiceServiceRef;
use crate::error::Result;
use rust_decimal::Decimal;
use tracing::{debug, info};

/// Which path a reconciliation took.
#[derive(Debug, Clone, PartialEq)]
pub enum ReconcileOutcome {
    /// The invoice does not exist (or vanished after the first recompute).
    InvoiceNotFound,
    /// No gateway could be resolved; nothing was touched.
    NoGateway,
    /// The pre-surcharge total was zero or negative.
    NonPositiveTotal { removed: usize },
    /// The gateway's rule produced no fee.
    NoFee { removed: usize },
    FeeApplied { removed: usize, amount: Decimal },
}

impl ReconcileOutcome {
    /// Soft failures are reported by the caller, never raised as errors.
    pub fn is_soft_failure(&self) -> bool {
        matches!(self, Self::InvoiceNotFound | Self::NoGateway)
    }
}

/// Keeps exactly one surcharge line item on an invoice, matching its gateway and total.
///
/// Each call removes every marked item, recomputes the invoice, then adds a fresh
/// item when the rule yields a positive fee. The invoice API offers no transaction,
/// so two concurrent calls on the same invoice can interleave between the delete
/// and add steps; the last writer wins.
pub struct InvoiceReconciler {
    invoices: InvoiceServiceRef,
    rules: FeeRuleStore,
    marker: String,
    description_prefix: String,
}

impl InvoiceReconciler {
    pub fn new(invoices: InvoiceServiceRef, rules: FeeRuleStore, config: &Config) -> Self {
        Self {
            invoices,
            rules,
            marker: config.marker.clone(),
            description_prefix: config.description_prefix.clone(),
        }
    }

    /// Reconciles the surcharge on `invoice_id`.
    ///
    /// `gateway_override` takes precedence over the invoice's payment method. Safe to
    /// call repeatedly; errors from the invoice API are returned as-is.
    pub async fn apply_fee(
        &self,
        invoice_id: u32,
        gateway_override: Option<&str>,
    ) -> Result<ReconcileOutcome> {
        let Some(invoice) = self.invoices.get_invoice(invoice_id).await? else {
            debug!(invoice_id, "Invoice not found");
            return Ok(ReconcileOutcome::InvoiceNotFound);
        };

        let gateway = gateway_override
            .map(str::to_owned)
            .unwrap_or_else(|| invoice.payment_method.clone());
        if gateway.is_empty() {
            debug!(invoice_id, "No gateway on invoice");
            return Ok(ReconcileOutcome::NoGateway);
        }

        let removed = self.remove_fee_items(&invoice).await?;

        self.invoices.recompute_invoice(invoice_id).await?;
        let Some(invoice) = self.invoices.get_invoice(invoice_id).await? else {
            return Ok(ReconcileOutcome::InvoiceNotFound);
        };

        if invoice.total <= Decimal::ZERO {
            debug!(invoice_id, total = %invoice.total, "Non-positive total, no surcharge");
            return Ok(ReconcileOutcome::NonPositiveTotal { removed });
        }

        let rule = self.rules.list_rules().await?.rule_for(&gateway);
        let fee = compute_fee(invoice.total, &rule)?;
        if fee <= Decimal::ZERO {
            debug!(invoice_id, gateway = %gateway, "Gateway has no fee");
            return Ok(ReconcileOutcome::NoFee { removed });
        }

        self.invoices
            .add_line_item(self.surcharge_item(&invoice, &rule, fee))
            .await?;
        self.invoices.recompute_invoice(invoice_id).await?;

        info!(invoice_id, gateway = %gateway, fee = %fee, "Applied gateway surcharge");
        Ok(ReconcileOutcome::FeeApplied {
            removed,
            amount: fee,
        })
    }

    async fn remove_fee_items(&self, invoice: &Invoice) -> Result<usize> {
        let stale: Vec<u32> = invoice
            .marked_items(&self.marker)
            .map(|item| item.id)
            .collect();
        for item_id in &stale {
            self.invoices.delete_line_item(*item_id).await?;
        }
        if !stale.is_empty() {
            debug!(invoice_id = invoice.id, count = stale.len(), "Removed stale surcharge items");
        }
        Ok(stale.len())
    }

    fn surcharge_item(&self, invoice: &Invoice, rule: &FeeRule, fee: Decimal) -> NewLineItem {
        NewLineItem {
            invoice_id: invoice.id,
            user_id: invoice.user_id,
            item_type: FEE_ITEM_TYPE.to_string(),
            notes: self.marker.clone(),
            description: rule.describe(&self.description_prefix),
            amount: format_amount(fee),
            taxed: false,
        }
    }
}
