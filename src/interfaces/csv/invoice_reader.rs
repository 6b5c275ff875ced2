use crate::domain::invoice::{Invoice, LineItem};
use crate::error::{FeeError, Result};
use rust_decimal::Decimal;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::io::Read;

/// One CSV row: an invoice header plus at most one of its line items.
///
/// A row with an empty `item` column declares an invoice without contributing a line item.
#[derive(Debug, Deserialize, PartialEq, Clone)]
pub struct InvoiceRow {
    pub invoice: u32,
    pub user: u32,
    #[serde(default)]
    pub payment_method: String,
    pub item: Option<u32>,
    #[serde(rename = "type", default)]
    pub item_type: String,
    #[serde(default)]
    pub notes: String,
    #[serde(default)]
    pub description: String,
    pub amount: Option<Decimal>,
    pub taxed: Option<bool>,
}

/// Reads invoices and their line items from a CSV source.
pub struct InvoiceReader<R: Read> {
    reader: csv::Reader<R>,
}

impl<R: Read> InvoiceReader<R> {
    pub fn new(source: R) -> Self {
        let reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .flexible(true)
            .from_reader(source);
        Self { reader }
    }

    pub fn rows(self) -> impl Iterator<Item = Result<InvoiceRow>> {
        self.reader
            .into_deserialize()
            .map(|result| result.map_err(FeeError::from))
    }

    /// Groups all rows into invoices ordered by id. The first row of an invoice
    /// sets its user and payment method.
    pub fn invoices(self) -> Result<Vec<Invoice>> {
        let mut invoices: BTreeMap<u32, Invoice> = BTreeMap::new();
        for row in self.rows() {
            let row = row?;
            let invoice = invoices
                .entry(row.invoice)
                .or_insert_with(|| Invoice::new(row.invoice, row.user, row.payment_method.clone()));
            if let Some(id) = row.item {
                invoice.line_items.push(LineItem {
                    id,
                    invoice_id: row.invoice,
                    item_type: row.item_type,
                    notes: row.notes,
                    description: row.description,
                    amount: row.amount.unwrap_or(Decimal::ZERO),
                    taxed: row.taxed.unwrap_or(false),
                });
            }
        }
        Ok(invoices.into_values().collect())
    }
}
