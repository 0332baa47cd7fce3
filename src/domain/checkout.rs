//! Field map submitted to the gateway's checkout endpoint.

use super::acquirer::AcquirerConfig;
use super::notification::extract_reference;
use rust_decimal::Decimal;
use std::collections::BTreeMap;

pub const NOTIFY_PATH: &str = "/payment/payhere/notify";
pub const RETURN_PATH: &str = "/payment/payhere/return";
pub const CANCEL_PATH: &str = "/payment/payhere/cancel";

/// Buyer contact details forwarded to the checkout page.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Buyer {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
    pub address: String,
    pub city: String,
    pub zip_code: String,
    pub country_code: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CheckoutRequest {
    pub reference: String,
    pub amount: Decimal,
    pub currency_code: String,
    pub company_name: String,
    pub buyer: Buyer,
    /// Buyer pays from the merchant's own country; selects the domestic fee rate.
    pub domestic: bool,
}

/// Builds the checkout fields for `request`, with callback URLs joined on `base_url`.
pub fn checkout_fields(config: &AcquirerConfig, request: &CheckoutRequest, base_url: &str) -> BTreeMap<String, String> {
    let base = base_url.trim_end_matches('/');
    let reference = extract_reference(&request.reference);
    let buyer = &request.buyer;

    let mut fields: BTreeMap<String, String> = [
        ("merchant_id", config.email_account.clone()),
        ("items", format!("{}: {}", request.company_name, reference)),
        ("order_id", reference.to_string()),
        ("amount", format!("{:.2}", request.amount)),
        ("currency", request.currency_code.clone()),
        ("first_name", buyer.first_name.clone()),
        ("last_name", buyer.last_name.clone()),
        ("email", buyer.email.clone()),
        ("phone", buyer.phone.clone()),
        ("address", buyer.address.clone()),
        ("city", buyer.city.clone()),
        ("zip_code", buyer.zip_code.clone()),
        ("country", buyer.country_code.clone()),
        ("return_url", format!("{base}{RETURN_PATH}")),
        ("notify_url", format!("{base}{NOTIFY_PATH}")),
        ("cancel_url", format!("{base}{CANCEL_PATH}")),
    ]
    .into_iter()
    .map(|(k, v)| (k.to_string(), v))
    .collect();

    if config.fees.active {
        let fees = config.compute_fees(request.amount, request.domestic).round_dp(2);
        fields.insert("handling".to_string(), format!("{fees:.2}"));
    }

    fields
}
