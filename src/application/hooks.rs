use super::estimator::CheckoutEstimator;
use super::reconciler::{InvoiceReconciler, ReconcileOutcome};
use crate::domain::cart::{CartEstimate, CheckoutSession};
use crate::error::Result;
use rust_decimal::Decimal;
use serde::Deserialize;
use tracing::warn;

/// Host events the addon reacts to, in the host's payload shape.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "hook")]
pub enum HookEvent {
    InvoiceCreated {
        #[serde(rename = "invoiceid")]
        invoice_id: u32,
    },
    InvoiceChangeGateway {
        #[serde(rename = "invoiceid")]
        invoice_id: u32,
        #[serde(rename = "paymentmethod")]
        payment_method: String,
    },
    InvoiceCreationPreEmail {
        #[serde(rename = "invoiceid")]
        invoice_id: u32,
    },
    AdminInvoicesControlsOutput {
        #[serde(rename = "invoiceid", default)]
        invoice_id: u32,
    },
    AfterCalculateCartTotals {
        total: CartTotals,
    },
    ClientAreaFooterOutput {
        #[serde(default)]
        action: String,
    },
}

/// Cart total object handed over by the host: formatted and numeric forms.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct CartTotals {
    #[serde(default)]
    pub full: String,
    #[serde(default)]
    pub numeric: Decimal,
}

/// Routes host events to the reconciler and the checkout estimator.
///
/// Invoice hooks return `None`; output hooks return the markup to inject, which may be empty.
pub struct HookDispatcher {
    reconciler: InvoiceReconciler,
    estimator: CheckoutEstimator,
}

impl HookDispatcher {
    pub fn new(reconciler: InvoiceReconciler, estimator: CheckoutEstimator) -> Self {
        Self {
            reconciler,
            estimator,
        }
    }

    pub async fn dispatch(
        &self,
        event: HookEvent,
        session: &mut CheckoutSession,
    ) -> Result<Option<String>> {
        match event {
            HookEvent::InvoiceCreated { invoice_id } => {
                self.on_invoice_created(invoice_id).await?;
                Ok(None)
            }
            HookEvent::InvoiceChangeGateway {
                invoice_id,
                payment_method,
            } => {
                self.on_payment_method_changed(invoice_id, &payment_method)
                    .await?;
                Ok(None)
            }
            HookEvent::InvoiceCreationPreEmail { invoice_id } => {
                self.on_pre_send(invoice_id).await?;
                Ok(None)
            }
            HookEvent::AdminInvoicesControlsOutput { invoice_id } => {
                Ok(Some(self.on_admin_view(invoice_id).await?))
            }
            HookEvent::AfterCalculateCartTotals { total } => {
                on_cart_totals_calculated(session, total);
                Ok(None)
            }
            HookEvent::ClientAreaFooterOutput { action } => {
                Ok(Some(self.on_footer_render(session, &action).await?))
            }
        }
    }

    pub async fn on_invoice_created(&self, invoice_id: u32) -> Result<ReconcileOutcome> {
        self.reconcile("InvoiceCreated", invoice_id, None).await
    }

    pub async fn on_payment_method_changed(
        &self,
        invoice_id: u32,
        payment_method: &str,
    ) -> Result<ReconcileOutcome> {
        self.reconcile("InvoiceChangeGateway", invoice_id, Some(payment_method))
            .await
    }

    /// Safety recompute before the invoice email goes out.
    pub async fn on_pre_send(&self, invoice_id: u32) -> Result<ReconcileOutcome> {
        self.reconcile("InvoiceCreationPreEmail", invoice_id, None).await
    }

    /// Safety recompute when an admin opens the invoice. Renders nothing.
    pub async fn on_admin_view(&self, invoice_id: u32) -> Result<String> {
        if invoice_id > 0 {
            self.reconcile("AdminInvoicesControlsOutput", invoice_id, None)
                .await?;
        }
        Ok(String::new())
    }

    pub async fn on_footer_render(
        &self,
        session: &CheckoutSession,
        action: &str,
    ) -> Result<String> {
        self.estimator.render(session, action).await
    }

    async fn reconcile(
        &self,
        hook: &str,
        invoice_id: u32,
        gateway: Option<&str>,
    ) -> Result<ReconcileOutcome> {
        let outcome = self.reconciler.apply_fee(invoice_id, gateway).await?;
        if outcome.is_soft_failure() {
            warn!(hook, invoice_id, outcome = ?outcome, "Gateway fee not reconciled");
        }
        Ok(outcome)
    }
}

/// Replaces the session's cart snapshot with the freshly calculated totals.
pub fn on_cart_totals_calculated(session: &mut CheckoutSession, total: CartTotals) {
    session.record_cart_totals(CartEstimate::new(total.full, total.numeric));
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_deserialize_host_payloads() {
        let event: HookEvent = serde_json::from_str(
            r#"{"hook":"InvoiceChangeGateway","invoiceid":5,"paymentmethod":"paypal"}"#,
        )
        .unwrap();
        assert_eq!(
            event,
            HookEvent::InvoiceChangeGateway {
                invoice_id: 5,
                payment_method: "paypal".to_string()
            }
        );

        let event: HookEvent = serde_json::from_str(
            r#"{"hook":"AfterCalculateCartTotals","total":{"full":"$12.50 USD","numeric":"12.50"}}"#,
        )
        .unwrap();
        assert_eq!(
            event,
            HookEvent::AfterCalculateCartTotals {
                total: CartTotals {
                    full: "$12.50 USD".to_string(),
                    numeric: dec!(12.50)
                }
            }
        );

        let event: HookEvent =
            serde_json::from_str(r#"{"hook":"ClientAreaFooterOutput"}"#).unwrap();
        assert_eq!(
            event,
            HookEvent::ClientAreaFooterOutput {
                action: String::new()
            }
        );
    }

    #[test]
    fn test_unknown_hook_is_rejected() {
        let result: std::result::Result<HookEvent, _> =
            serde_json::from_str(r#"{"hook":"InvoicePaid","invoiceid":1}"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_cart_totals_replace_snapshot() {
        let mut session = CheckoutSession::new();
        on_cart_totals_calculated(
            &mut session,
            CartTotals {
                full: "$10.00".to_string(),
                numeric: dec!(10),
            },
        );
        on_cart_totals_calculated(
            &mut session,
            CartTotals {
                full: "$30.00".to_string(),
                numeric: dec!(30),
            },
        );
        assert_eq!(session.cart_totals().unwrap().numeric_total, dec!(30));
    }
}
