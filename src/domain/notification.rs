use crate::error::{NotifyError, Result};
use chrono::{DateTime, FixedOffset, NaiveDateTime, TimeZone, Utc};
use rust_decimal::Decimal;
use std::collections::BTreeMap;
use std::str::FromStr;

/// Raw notification payload as posted by the gateway.
pub type RawFields = BTreeMap<String, String>;

pub const ORDER_ID: &str = "order_id";
pub const PAYMENT_ID: &str = "payment_id";
pub const STATUS_CODE: &str = "status_code";
pub const AMOUNT: &str = "payhere_amount";
pub const CURRENCY: &str = "payhere_currency";
pub const HANDLING_AMOUNT: &str = "handling_amount";
pub const PAYER_ID: &str = "payer_id";
pub const RECEIVER_ID: &str = "receiver_id";
pub const RECEIVER_EMAIL: &str = "receiver_email";
pub const BUSINESS: &str = "business";
pub const PENDING_REASON: &str = "pending_reason";
pub const PAYMENT_DATE: &str = "payment_date";

/// Separator between the merchant reference and the suffix the gateway appends.
const REFERENCE_DELIMITER: char = '-';

/// A typed, immutable view of an inbound payment notification.
///
/// Only `reference` is mandatory. Numeric fields that are absent or malformed
/// fall back to a sentinel instead of failing the whole notification:
/// `amount` becomes zero and `status_code` stays `None`.
#[derive(Debug, Clone, PartialEq)]
pub struct NotificationData {
    pub reference: String,
    pub external_payment_id: Option<String>,
    pub status_code: Option<i32>,
    pub amount: Decimal,
    pub currency_code: Option<String>,
    pub handling_fee: Option<Decimal>,
    pub payer_id: Option<String>,
    pub receiver_id: Option<String>,
    pub receiver_email: Option<String>,
    pub business_email: Option<String>,
    pub pending_reason: Option<String>,
    pub payment_date: Option<String>,
    /// The unmodified payload, kept for echo-back resubmission.
    pub raw: RawFields,
}

impl NotificationData {
    pub fn parse(raw: &RawFields) -> Result<Self> {
        let reference = text(raw, ORDER_ID)
            .map(extract_reference)
            .filter(|r| !r.is_empty())
            .ok_or(NotifyError::MissingReference)?
            .to_string();

        Ok(Self {
            reference,
            external_payment_id: text(raw, PAYMENT_ID).map(str::to_string),
            status_code: text(raw, STATUS_CODE).and_then(|s| s.parse().ok()),
            amount: text(raw, AMOUNT)
                .and_then(|s| Decimal::from_str(s).ok())
                .unwrap_or(Decimal::ZERO),
            currency_code: text(raw, CURRENCY).map(str::to_string),
            handling_fee: raw
                .get(HANDLING_AMOUNT)
                .map(|s| Decimal::from_str(s.trim()).unwrap_or(Decimal::ZERO)),
            payer_id: text(raw, PAYER_ID).map(str::to_string),
            receiver_id: text(raw, RECEIVER_ID).map(str::to_string),
            receiver_email: text(raw, RECEIVER_EMAIL).map(str::to_string),
            business_email: text(raw, BUSINESS).map(str::to_string),
            pending_reason: text(raw, PENDING_REASON).map(str::to_string),
            payment_date: text(raw, PAYMENT_DATE).map(str::to_string),
            raw: raw.clone(),
        })
    }

    /// Payment timestamp reported by the gateway, if it could be parsed.
    pub fn paid_at(&self) -> Option<DateTime<Utc>> {
        self.payment_date.as_deref().and_then(parse_payment_date)
    }
}

/// Non-empty, trimmed value of a field.
fn text<'a>(raw: &'a RawFields, key: &str) -> Option<&'a str> {
    raw.get(key).map(|v| v.trim()).filter(|v| !v.is_empty())
}

/// Strips the disambiguating suffix the gateway appends to order ids.
///
/// `"test_ref0-1"` becomes `"test_ref0"`.
pub fn extract_reference(order_id: &str) -> &str {
    order_id
        .split(REFERENCE_DELIMITER)
        .next()
        .unwrap_or_default()
        .trim()
}

/// Parses the gateway's payment date.
///
/// Accepts `"03:21:19 Nov 18, 2013 PST"` style stamps (PST/PDT/UTC/GMT
/// abbreviations), RFC 3339, and `"2013-11-18 11:21:19"` taken as UTC.
pub fn parse_payment_date(value: &str) -> Option<DateTime<Utc>> {
    let value = value.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Some(dt.with_timezone(&Utc));
    }
    if let Ok(naive) = NaiveDateTime::parse_from_str(value, "%Y-%m-%d %H:%M:%S") {
        return Some(naive.and_utc());
    }

    let (stamp, zone) = value.rsplit_once(' ')?;
    let offset_secs = match zone.to_ascii_uppercase().as_str() {
        "PST" => -8 * 3600,
        "PDT" => -7 * 3600,
        "UTC" | "GMT" => 0,
        _ => return None,
    };
    let naive = NaiveDateTime::parse_from_str(stamp.trim(), "%H:%M:%S %b %d, %Y").ok()?;
    let offset = FixedOffset::east_opt(offset_secs)?;
    offset
        .from_local_datetime(&naive)
        .single()
        .map(|dt| dt.with_timezone(&Utc))
}
