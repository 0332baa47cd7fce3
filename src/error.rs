use thiserror::Error;

#[derive(Error, Debug)]
pub enum NotifyError {
    #[error("notification carries no order reference")]
    MissingReference,
    #[error("no transaction found for reference {0}")]
    UnknownReference(String),
    #[error("reference {reference} matches {count} transactions")]
    AmbiguousReference { reference: String, count: usize },
    #[error("gateway echo endpoint unavailable: {0}")]
    EchoUnavailable(String),
    #[error("storage error: {0}")]
    Storage(String),
    #[error("CSV error: {0}")]
    CsvError(#[from] csv::Error),
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
    #[cfg(feature = "storage-rocksdb")]
    #[error("RocksDB error: {0}")]
    RocksDbError(#[from] rocksdb::Error),
}

impl NotifyError {
    /// Whether the gateway should be asked to redeliver the notification later.
    pub fn is_retryable(&self) -> bool {
        matches!(self, NotifyError::EchoUnavailable(_))
    }
}

pub type Result<T> = std::result::Result<T, NotifyError>;
