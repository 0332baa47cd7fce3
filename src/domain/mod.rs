//! Domain layer: notification and transaction types, pure verification logic
//! and the ports the application layer depends on.

pub mod acquirer;
pub mod checkout;
pub mod notification;
pub mod ports;
pub mod reconciliation;
pub mod transaction;
pub mod verdict;
