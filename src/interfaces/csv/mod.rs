pub mod estimate_writer;
pub mod invoice_reader;
pub mod invoice_writer;
pub mod settings_reader;
