use super::acquirer::AcquirerConfig;
use super::notification::{
    AMOUNT, BUSINESS, CURRENCY, HANDLING_AMOUNT, NotificationData, PAYER_ID, PAYMENT_ID,
    RECEIVER_EMAIL, RECEIVER_ID,
};
use super::transaction::Transaction;
use rust_decimal::Decimal;
use std::collections::BTreeSet;
use std::fmt;

/// A single field whose notified value disagrees with the local record.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct Discrepancy {
    pub field: &'static str,
    pub received: Option<String>,
    pub expected: String,
}

impl fmt::Display for Discrepancy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: received {}, expected {}",
            self.field,
            self.received.as_deref().unwrap_or("<none>"),
            self.expected
        )
    }
}

/// Every discrepancy found between a notification and its transaction.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReconciliationResult {
    discrepancies: BTreeSet<Discrepancy>,
}

impl ReconciliationResult {
    pub fn len(&self) -> usize {
        self.discrepancies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.discrepancies.is_empty()
    }

    pub fn fields(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.discrepancies.iter().map(|d| d.field)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Discrepancy> {
        self.discrepancies.iter()
    }

    fn push(&mut self, field: &'static str, received: Option<&str>, expected: impl Into<String>) {
        self.discrepancies.insert(Discrepancy {
            field,
            received: received.map(str::to_string),
            expected: expected.into(),
        });
    }
}

fn cents(value: Decimal) -> Decimal {
    value.round_dp(2)
}

/// Compares a notification against the transaction it claims to settle.
///
/// Every check runs, so the result lists all mismatches rather than the first.
/// Nothing is rejected here; the caller decides what is material.
pub fn reconcile(
    notification: &NotificationData,
    tx: &Transaction,
    acquirer: &AcquirerConfig,
) -> ReconciliationResult {
    let mut result = ReconciliationResult::default();
    let raw = |key: &str| notification.raw.get(key).map(String::as_str);

    // Payment id can only be compared once a prior notification recorded it.
    if let Some(recorded) = tx.acquirer_reference.as_deref()
        && notification.external_payment_id.as_deref() != Some(recorded)
    {
        result.push(PAYMENT_ID, raw(PAYMENT_ID), recorded);
    }

    let expected_gross = tx.expected_gross();
    if cents(notification.amount) != cents(expected_gross) {
        result.push(AMOUNT, raw(AMOUNT), format!("{:.2}", cents(expected_gross)));
    }

    if notification.currency_code.as_deref() != Some(tx.currency_code.as_str()) {
        result.push(CURRENCY, raw(CURRENCY), tx.currency_code.as_str());
    }

    if let Some(fee) = notification.handling_fee
        && cents(fee) != cents(tx.fees)
    {
        result.push(HANDLING_AMOUNT, raw(HANDLING_AMOUNT), format!("{:.2}", cents(tx.fees)));
    }

    if let Some(token) = tx.payment_token.as_deref()
        && notification.payer_id.as_deref() != Some(token)
    {
        result.push(PAYER_ID, raw(PAYER_ID), token);
    }

    match (notification.receiver_id.as_deref(), acquirer.seller_account.as_deref()) {
        (Some(receiver), Some(seller)) => {
            if receiver != seller {
                result.push(RECEIVER_ID, Some(receiver), seller);
            }
        }
        _ => {
            // Without a seller id on both sides at least the emails must be checked.
            let account = acquirer.email_account.as_str();
            if let Some(email) = notification.receiver_email.as_deref()
                && email != account
            {
                result.push(RECEIVER_EMAIL, Some(email), account);
            }
            if let Some(business) = notification.business_email.as_deref()
                && business != account
            {
                result.push(BUSINESS, Some(business), account);
            }
        }
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::notification::RawFields;
    use rust_decimal_macros::dec;

    fn notification(pairs: &[(&str, &str)]) -> NotificationData {
        let mut raw: RawFields = [("order_id", "SO100"), ("payhere_amount", "10.00"), ("payhere_currency", "LKR")]
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        for (k, v) in pairs {
            raw.insert(k.to_string(), v.to_string());
        }
        NotificationData::parse(&raw).unwrap()
    }

    fn acquirer() -> AcquirerConfig {
        AcquirerConfig {
            email_account: "shop@example.com".to_string(),
            ..AcquirerConfig::default()
        }
    }

    fn tx() -> Transaction {
        Transaction::new("SO100", dec!(10.00), "LKR")
    }

    #[test]
    fn test_matching_notification_has_no_discrepancy() {
        let result = reconcile(&notification(&[]), &tx(), &acquirer());
        assert!(result.is_empty());
    }

    #[test]
    fn test_amount_includes_fees_at_cent_precision() {
        let tx = Transaction::new("SO100", dec!(10.00), "LKR").with_fees(dec!(0.504));
        let ok = notification(&[("payhere_amount", "10.50")]);
        assert!(reconcile(&ok, &tx, &acquirer()).is_empty());

        let off = notification(&[("payhere_amount", "10.49")]);
        let result = reconcile(&off, &tx, &acquirer());
        assert_eq!(result.fields().collect::<Vec<_>>(), vec![AMOUNT]);
        let d = result.iter().next().unwrap();
        assert_eq!(d.received.as_deref(), Some("10.49"));
        assert_eq!(d.expected, "10.50");
    }

    #[test]
    fn test_reports_every_mismatch() {
        let mut tx = tx();
        tx.acquirer_reference = Some("PH-1".to_string());
        tx.payment_token = Some("BUYER-1".to_string());

        let n = notification(&[
            ("payment_id", "PH-2"),
            ("payhere_amount", "99.00"),
            ("payhere_currency", "USD"),
            ("handling_amount", "1.00"),
            ("payer_id", "BUYER-2"),
            ("receiver_email", "fraud@example.com"),
            ("business", "fraud@example.com"),
        ]);

        let result = reconcile(&n, &tx, &acquirer());
        let fields: BTreeSet<_> = result.fields().collect();
        let expected: BTreeSet<_> = [
            PAYMENT_ID,
            AMOUNT,
            CURRENCY,
            HANDLING_AMOUNT,
            PAYER_ID,
            RECEIVER_EMAIL,
            BUSINESS,
        ]
        .into_iter()
        .collect();
        assert_eq!(fields, expected);
        assert_eq!(reconcile(&n, &tx, &acquirer()), result);
    }

    #[test]
    fn test_first_notification_skips_payment_id_check() {
        let result = reconcile(&notification(&[("payment_id", "PH-9")]), &tx(), &acquirer());
        assert!(result.is_empty());
    }

    #[test]
    fn test_seller_id_takes_precedence_over_email() {
        let mut acquirer = acquirer();
        acquirer.seller_account = Some("1211149".to_string());

        let n = notification(&[("receiver_id", "1211149"), ("receiver_email", "other@example.com")]);
        assert!(reconcile(&n, &tx(), &acquirer).is_empty());

        let n = notification(&[("receiver_id", "666")]);
        let result = reconcile(&n, &tx(), &acquirer);
        assert_eq!(result.fields().collect::<Vec<_>>(), vec![RECEIVER_ID]);
    }

    #[test]
    fn test_email_checked_when_seller_id_missing_on_either_side() {
        let mut acquirer = acquirer();
        acquirer.seller_account = Some("1211149".to_string());
        let n = notification(&[("receiver_email", "other@example.com")]);
        let result = reconcile(&n, &tx(), &acquirer);
        assert_eq!(result.fields().collect::<Vec<_>>(), vec![RECEIVER_EMAIL]);

        let plain = self::acquirer();
        let n = notification(&[("receiver_id", "1211149"), ("business", "shop@example.com")]);
        assert!(reconcile(&n, &tx(), &plain).is_empty());
    }
}
