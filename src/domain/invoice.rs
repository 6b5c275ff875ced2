use crate::error::{FeeError, Result};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Line item type used for surcharge entries.
pub const FEE_ITEM_TYPE: &str = "Fee";

/// An invoice as seen through the host's invoice API.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Invoice {
    pub id: u32,
    pub user_id: u32,
    /// Gateway identifier currently selected on the invoice. Empty when unset.
    pub payment_method: String,
    pub total: Decimal,
    pub line_items: Vec<LineItem>,
}

impl Invoice {
    pub fn new(id: u32, user_id: u32, payment_method: impl Into<String>) -> Self {
        Self {
            id,
            user_id,
            payment_method: payment_method.into(),
            total: Decimal::ZERO,
            line_items: Vec::new(),
        }
    }

    /// Line items tagged with `marker`.
    pub fn marked_items<'a>(&'a self, marker: &'a str) -> impl Iterator<Item = &'a LineItem> {
        self.line_items
            .iter()
            .filter(move |item| item.carries_marker(marker))
    }

    /// Sum of all line item amounts.
    pub fn line_item_total(&self) -> Result<Decimal> {
        self.line_items
            .iter()
            .try_fold(Decimal::ZERO, |sum, item| sum.checked_add(item.amount))
            .ok_or_else(|| {
                FeeError::AmountOverflow(format!("line items of invoice {} overflow", self.id))
            })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineItem {
    pub id: u32,
    pub invoice_id: u32,
    pub item_type: String,
    /// Free-form notes column; surcharge items carry the fee marker here.
    pub notes: String,
    pub description: String,
    pub amount: Decimal,
    pub taxed: bool,
}

impl LineItem {
    pub fn carries_marker(&self, marker: &str) -> bool {
        self.notes == marker
    }
}

/// Payload for adding a line item through the invoice API.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewLineItem {
    pub invoice_id: u32,
    pub user_id: u32,
    pub item_type: String,
    pub notes: String,
    pub description: String,
    /// Amount formatted with exactly two decimals.
    pub amount: String,
    pub taxed: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn item(id: u32, notes: &str, amount: Decimal) -> LineItem {
        LineItem {
            id,
            invoice_id: 1,
            item_type: "Hosting".to_string(),
            notes: notes.to_string(),
            description: "item".to_string(),
            amount,
            taxed: false,
        }
    }

    #[test]
    fn test_marked_items() {
        let mut invoice = Invoice::new(1, 7, "paypal");
        invoice.line_items = vec![
            item(1, "", dec!(10)),
            item(2, "gateway_fees", dec!(1)),
            item(3, "gateway_fees", dec!(2)),
        ];

        let ids: Vec<u32> = invoice.marked_items("gateway_fees").map(|i| i.id).collect();
        assert_eq!(ids, vec![2, 3]);
        assert_eq!(invoice.line_item_total().unwrap(), dec!(13));
    }

    #[test]
    fn test_line_item_total_overflow_is_an_error() {
        let mut invoice = Invoice::new(4, 7, "paypal");
        invoice.line_items = vec![item(1, "", Decimal::MAX), item(2, "", dec!(1))];
        assert!(matches!(
            invoice.line_item_total(),
            Err(FeeError::AmountOverflow(_))
        ));
    }
}
