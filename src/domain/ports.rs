use super::acquirer::AcquirerConfig;
use super::notification::RawFields;
use super::transaction::Transaction;
use crate::error::Result;
use async_trait::async_trait;
use std::sync::Arc;

/// Outcome of looking a transaction up by its reference.
#[derive(Debug, Clone, PartialEq)]
pub enum Lookup {
    NotFound,
    Found(Transaction),
    /// More than one record claims the reference.
    Ambiguous(usize),
}

#[async_trait]
pub trait TransactionRepository: Send + Sync {
    async fn find(&self, reference: &str) -> Result<Lookup>;
    async fn create(&self, tx: Transaction) -> Result<()>;
    /// Replaces the stored record carrying `tx.reference` in a single write.
    async fn save(&self, tx: Transaction) -> Result<()>;
}

/// Transport used to echo a notification back to the gateway.
#[async_trait]
pub trait EchoGateway: Send + Sync {
    /// Posts `fields` to `url` and returns the response body.
    ///
    /// Network failures and timeouts surface as `NotifyError::EchoUnavailable`.
    async fn post_echo(&self, url: &str, fields: &RawFields) -> Result<String>;
}

/// Side channel for operator-facing messages.
#[async_trait]
pub trait MerchantNotifier: Send + Sync {
    async fn send_configuration_advisory(&self, acquirer: &AcquirerConfig, reference: &str) -> Result<()>;
}

pub type TransactionRepositoryBox = Box<dyn TransactionRepository>;
pub type EchoGatewayRef = Arc<dyn EchoGateway>;
pub type MerchantNotifierRef = Arc<dyn MerchantNotifier>;
