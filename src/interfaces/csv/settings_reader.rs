use crate::domain::settings::Setting;
use crate::error::{FeeError, Result};
use std::io::Read;

/// Reads addon settings rows (`module,setting,value`) from a CSV source.
///
/// Values are kept as raw strings; rule parsing happens when the rule set is built.
pub struct SettingsReader<R: Read> {
    reader: csv::Reader<R>,
}

impl<R: Read> SettingsReader<R> {
    pub fn new(source: R) -> Self {
        let reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .flexible(true)
            .from_reader(source);
        Self { reader }
    }

    pub fn settings(self) -> impl Iterator<Item = Result<Setting>> {
        self.reader
            .into_deserialize()
            .map(|result| result.map_err(FeeError::from))
    }
}
