//! Adapters implementing the domain ports.

pub mod http_gateway;
pub mod in_memory;
pub mod log_notifier;
#[cfg(feature = "storage-rocksdb")]
pub mod rocksdb;
