use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Lifecycle state of a payment transaction.
///
/// `Done` and `Cancel` are terminal: once reached, notifications can no longer
/// move the transaction elsewhere.
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq, Clone, Copy, Default)]
#[serde(rename_all = "lowercase")]
pub enum TransactionState {
    #[default]
    Draft,
    Pending,
    Done,
    Cancel,
    Error,
}

impl TransactionState {
    pub fn is_terminal(self) -> bool {
        matches!(self, TransactionState::Done | TransactionState::Cancel)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            TransactionState::Draft => "draft",
            TransactionState::Pending => "pending",
            TransactionState::Done => "done",
            TransactionState::Cancel => "cancel",
            TransactionState::Error => "error",
        }
    }
}

impl fmt::Display for TransactionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Money flow direction reported by the gateway.
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq, Clone, Copy)]
#[serde(rename_all = "lowercase")]
pub enum PaymentDirection {
    Inbound,
    Outbound,
}

impl PaymentDirection {
    pub fn from_amount(amount: Decimal) -> Self {
        if amount > Decimal::ZERO {
            PaymentDirection::Inbound
        } else {
            PaymentDirection::Outbound
        }
    }
}

/// A merchant-side payment transaction, keyed by its unique `reference`.
#[derive(Debug, Serialize, Deserialize, PartialEq, Clone)]
pub struct Transaction {
    pub reference: String,
    pub amount: Decimal,
    pub currency_code: String,
    #[serde(default)]
    pub fees: Decimal,
    #[serde(default)]
    pub state: TransactionState,
    /// Gateway payment id, recorded once a notification has been accepted.
    #[serde(default)]
    pub acquirer_reference: Option<String>,
    #[serde(default)]
    pub state_message: Option<String>,
    #[serde(default)]
    pub completed_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub direction: Option<PaymentDirection>,
    /// Gateway-side reference of the stored payment method, if the buyer paid with one.
    #[serde(default)]
    pub payment_token: Option<String>,
}

impl Transaction {
    /// Creates a draft transaction awaiting its first notification.
    pub fn new(reference: impl Into<String>, amount: Decimal, currency_code: impl Into<String>) -> Self {
        Self {
            reference: reference.into(),
            amount,
            currency_code: currency_code.into(),
            fees: Decimal::ZERO,
            state: TransactionState::Draft,
            acquirer_reference: None,
            state_message: None,
            completed_at: None,
            direction: None,
            payment_token: None,
        }
    }

    pub fn with_fees(mut self, fees: Decimal) -> Self {
        self.fees = fees;
        self
    }

    /// The amount the gateway is expected to collect: order amount plus handling fees.
    pub fn expected_gross(&self) -> Decimal {
        self.amount + self.fees
    }
}
