use crate::domain::ports::{Lookup, TransactionRepository};
use crate::domain::transaction::Transaction;
use crate::error::{NotifyError, Result};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

/// A thread-safe in-memory transaction repository.
///
/// Records are grouped by reference so that duplicate references, which a
/// real order store can end up with, are reported as ambiguous instead of
/// being silently overwritten. `Clone` shares the underlying map.
#[derive(Default, Clone)]
pub struct InMemoryTransactionRepository {
    transactions: Arc<RwLock<HashMap<String, Vec<Transaction>>>>,
}

impl InMemoryTransactionRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns every stored record carrying `reference`.
    pub async fn all(&self, reference: &str) -> Vec<Transaction> {
        let transactions = self.transactions.read().await;
        transactions.get(reference).cloned().unwrap_or_default()
    }

    pub async fn len(&self) -> usize {
        let transactions = self.transactions.read().await;
        transactions.values().map(Vec::len).sum()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

#[async_trait]
impl TransactionRepository for InMemoryTransactionRepository {
    async fn find(&self, reference: &str) -> Result<Lookup> {
        let transactions = self.transactions.read().await;
        Ok(match transactions.get(reference).map(Vec::as_slice) {
            None | Some([]) => Lookup::NotFound,
            Some([tx]) => Lookup::Found(tx.clone()),
            Some(many) => Lookup::Ambiguous(many.len()),
        })
    }

    async fn create(&self, tx: Transaction) -> Result<()> {
        let mut transactions = self.transactions.write().await;
        transactions.entry(tx.reference.clone()).or_default().push(tx);
        Ok(())
    }

    async fn save(&self, tx: Transaction) -> Result<()> {
        let mut transactions = self.transactions.write().await;
        match transactions.get_mut(&tx.reference).map(Vec::as_mut_slice) {
            Some([stored]) => {
                *stored = tx;
                Ok(())
            }
            Some(many) if many.len() > 1 => Err(NotifyError::AmbiguousReference {
                reference: tx.reference.clone(),
                count: many.len(),
            }),
            _ => Err(NotifyError::UnknownReference(tx.reference)),
        }
    }
}
