use thiserror::Error;

#[derive(Error, Debug)]
pub enum FeeError {
    #[error("CSV error: {0}")]
    CsvError(#[from] csv::Error),
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),
    #[error("Invalid decimal value: {0}")]
    DecimalError(#[from] rust_decimal::Error),
    #[error("Amount out of range: {0}")]
    AmountOverflow(String),
    #[error("Invoice API error: {0}")]
    InvoiceApiError(String),
    #[error("Storage error: {0}")]
    StorageError(String),
    #[cfg(feature = "storage-rocksdb")]
    #[error("RocksDB error: {0}")]
    RocksDbError(#[from] rocksdb::Error),
}

pub type Result<T> = std::result::Result<T, FeeError>;
