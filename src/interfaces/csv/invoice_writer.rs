use crate::domain::calculator::format_amount;
use crate::domain::invoice::Invoice;
use crate::error::Result;
use serde::Serialize;
use std::io::Write;

#[derive(Debug, Serialize)]
struct LineItemRecord<'a> {
    invoice: u32,
    payment_method: &'a str,
    total: String,
    item: Option<u32>,
    #[serde(rename = "type")]
    item_type: &'a str,
    notes: &'a str,
    description: &'a str,
    amount: String,
}

/// Writes invoices as CSV, one row per line item.
///
/// Invoices without line items still get one row with the item columns left empty.
pub struct InvoiceWriter<W: Write> {
    writer: csv::Writer<W>,
}

impl<W: Write> InvoiceWriter<W> {
    pub fn new(destination: W) -> Self {
        Self {
            writer: csv::Writer::from_writer(destination),
        }
    }

    pub fn write_invoices<I>(&mut self, invoices: I) -> Result<()>
    where
        I: IntoIterator<Item = Invoice>,
    {
        for invoice in invoices {
            let total = format_amount(invoice.total);
            if invoice.line_items.is_empty() {
                self.writer.serialize(LineItemRecord {
                    invoice: invoice.id,
                    payment_method: &invoice.payment_method,
                    total: total.clone(),
                    item: None,
                    item_type: "",
                    notes: "",
                    description: "",
                    amount: String::new(),
                })?;
            }
            for item in &invoice.line_items {
                self.writer.serialize(LineItemRecord {
                    invoice: invoice.id,
                    payment_method: &invoice.payment_method,
                    total: total.clone(),
                    item: Some(item.id),
                    item_type: &item.item_type,
                    notes: &item.notes,
                    description: &item.description,
                    amount: format_amount(item.amount),
                })?;
            }
        }
        self.writer.flush()?;
        Ok(())
    }
}
