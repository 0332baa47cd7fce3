use crate::domain::ports::{Lookup, TransactionRepository};
use crate::domain::transaction::Transaction;
use crate::error::{NotifyError, Result};
use async_trait::async_trait;
use rocksdb::{ColumnFamilyDescriptor, DB, Options};
use std::path::Path;
use std::sync::Arc;

/// Column Family for storing transactions, keyed by reference.
pub const CF_TRANSACTIONS: &str = "transactions";

/// A persistent transaction repository backed by RocksDB.
///
/// Each key holds the JSON array of records sharing that reference, so
/// duplicates survive a restart and keep being reported as ambiguous.
/// `Clone` shares the underlying `Arc<DB>`.
#[derive(Clone)]
pub struct RocksDBTransactionRepository {
    db: Arc<DB>,
}

impl RocksDBTransactionRepository {
    /// Opens or creates a RocksDB instance at the specified path.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let mut opts = Options::default();
        opts.create_if_missing(true);
        opts.create_missing_column_families(true);

        let cf_transactions = ColumnFamilyDescriptor::new(CF_TRANSACTIONS, Options::default());
        let db = DB::open_cf_descriptors(&opts, path, vec![cf_transactions])?;

        Ok(Self { db: Arc::new(db) })
    }

    fn read(&self, reference: &str) -> Result<Vec<Transaction>> {
        let cf = self
            .db
            .cf_handle(CF_TRANSACTIONS)
            .ok_or_else(|| NotifyError::Storage("transactions column family not found".to_string()))?;

        match self.db.get_cf(&cf, reference.as_bytes())? {
            Some(bytes) => serde_json::from_slice(&bytes)
                .map_err(|e| NotifyError::Storage(format!("deserialization error: {e}"))),
            None => Ok(Vec::new()),
        }
    }

    fn write(&self, reference: &str, records: &[Transaction]) -> Result<()> {
        let cf = self
            .db
            .cf_handle(CF_TRANSACTIONS)
            .ok_or_else(|| NotifyError::Storage("transactions column family not found".to_string()))?;

        let value = serde_json::to_vec(records)
            .map_err(|e| NotifyError::Storage(format!("serialization error: {e}")))?;
        self.db.put_cf(&cf, reference.as_bytes(), value)?;
        Ok(())
    }
}

#[async_trait]
impl TransactionRepository for RocksDBTransactionRepository {
    async fn find(&self, reference: &str) -> Result<Lookup> {
        let mut records = self.read(reference)?;
        Ok(match records.len() {
            0 => Lookup::NotFound,
            1 => Lookup::Found(records.remove(0)),
            n => Lookup::Ambiguous(n),
        })
    }

    async fn create(&self, tx: Transaction) -> Result<()> {
        let mut records = self.read(&tx.reference)?;
        let reference = tx.reference.clone();
        records.push(tx);
        self.write(&reference, &records)
    }

    async fn save(&self, tx: Transaction) -> Result<()> {
        let records = self.read(&tx.reference)?;
        match records.len() {
            1 => self.write(&tx.reference, std::slice::from_ref(&tx)),
            0 => Err(NotifyError::UnknownReference(tx.reference)),
            count => Err(NotifyError::AmbiguousReference {
                reference: tx.reference,
                count,
            }),
        }
    }
}
