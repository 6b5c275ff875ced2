use crate::error::Result;
use std::collections::BTreeMap;
use std::io::Write;

/// Writes a `gateway,estimate` table as CSV.
pub struct EstimateWriter<W: Write> {
    writer: csv::Writer<W>,
}

impl<W: Write> EstimateWriter<W> {
    pub fn new(destination: W) -> Self {
        Self {
            writer: csv::Writer::from_writer(destination),
        }
    }

    pub fn write_estimates(&mut self, estimates: &BTreeMap<String, String>) -> Result<()> {
        self.writer.write_record(["gateway", "estimate"])?;
        for (gateway, estimate) in estimates {
            self.writer.write_record([gateway, estimate])?;
        }
        self.writer.flush()?;
        Ok(())
    }
}
