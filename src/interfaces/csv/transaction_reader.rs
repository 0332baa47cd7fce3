use crate::domain::transaction::Transaction;
use crate::error::{NotifyError, Result};
use rust_decimal::Decimal;
use serde::Deserialize;
use std::io::Read;

#[derive(Debug, Deserialize)]
struct TransactionRecord {
    reference: String,
    amount: Decimal,
    currency: String,
    #[serde(default)]
    fees: Option<Decimal>,
    #[serde(default)]
    payment_token: Option<String>,
}

/// Reads draft transactions from a CSV source.
///
/// Expected header: `reference, amount, currency[, fees][, payment_token]`.
/// Whitespace is trimmed and trailing optional columns may be omitted.
pub struct TransactionReader<R: Read> {
    reader: csv::Reader<R>,
}

impl<R: Read> TransactionReader<R> {
    /// Creates a new `TransactionReader` from any `Read` source (e.g., File, Stdin).
    pub fn new(source: R) -> Self {
        let reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .flexible(true)
            .from_reader(source);
        Self { reader }
    }

    /// Returns an iterator that lazily reads and deserializes transactions.
    pub fn transactions(self) -> impl Iterator<Item = Result<Transaction>> {
        self.reader.into_deserialize().map(|result| {
            let record: TransactionRecord = result.map_err(NotifyError::from)?;
            let mut tx = Transaction::new(record.reference, record.amount, record.currency)
                .with_fees(record.fees.unwrap_or(Decimal::ZERO));
            tx.payment_token = record.payment_token.filter(|t| !t.is_empty());
            Ok(tx)
        })
    }
}
