use rust_decimal::Decimal;
use std::fmt;
use std::str::FromStr;

/// Gateway environment the acquirer is enabled for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Environment {
    Production,
    #[default]
    Sandbox,
}

impl FromStr for Environment {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "production" | "prod" | "enabled" => Ok(Environment::Production),
            "sandbox" | "test" => Ok(Environment::Sandbox),
            other => Err(format!("unknown environment '{other}', expected production or sandbox")),
        }
    }
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Environment::Production => f.write_str("production"),
            Environment::Sandbox => f.write_str("sandbox"),
        }
    }
}

/// Published gateway endpoints for one environment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GatewayUrls {
    pub form_url: &'static str,
    pub rest_url: &'static str,
}

impl GatewayUrls {
    pub fn for_environment(environment: Environment) -> Self {
        match environment {
            Environment::Production => Self {
                form_url: "https://www.payhere.lk/pay/checkout",
                rest_url: "https://api.payhere.lk/v1/oauth2/token",
            },
            Environment::Sandbox => Self {
                form_url: "https://sandbox.payhere.lk/pay/checkout",
                rest_url: "https://api.sandbox.payhere.lk/v1/oauth2/token",
            },
        }
    }
}

/// Fixed part plus percentage of a handling fee.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FeeRate {
    pub fixed: Decimal,
    /// Percentage, e.g. `3.4` for 3.4 %.
    pub percent: Decimal,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FeeSchedule {
    pub active: bool,
    pub domestic: FeeRate,
    pub international: FeeRate,
}

impl Default for FeeSchedule {
    fn default() -> Self {
        Self {
            active: false,
            domestic: FeeRate {
                fixed: Decimal::new(35, 2),
                percent: Decimal::new(34, 1),
            },
            international: FeeRate {
                fixed: Decimal::new(35, 2),
                percent: Decimal::new(39, 1),
            },
        }
    }
}

impl FeeSchedule {
    /// Handling fee charged on top of `amount`.
    ///
    /// `fees = percent/100 * amount + fixed / (1 - percent/100)`, zero when
    /// fees are not active. The result is not rounded.
    pub fn compute(&self, amount: Decimal, domestic: bool) -> Decimal {
        if !self.active {
            return Decimal::ZERO;
        }
        let rate = if domestic {
            self.domestic
        } else {
            self.international
        };
        let ratio = rate.percent / Decimal::ONE_HUNDRED;
        ratio * amount + rate.fixed / (Decimal::ONE - ratio)
    }
}

/// Per-merchant acquirer settings consumed by the verification flow.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct AcquirerConfig {
    pub environment: Environment,
    /// Merchant account the gateway knows this shop by.
    pub email_account: String,
    /// Optional numeric merchant id; preferred over the email when checking the receiver.
    pub seller_account: Option<String>,
    /// Long-lived token for data-transfer (synchronize) verification.
    pub pdt_token: Option<String>,
    pub use_ipn: bool,
    pub fees: FeeSchedule,
}

impl AcquirerConfig {
    pub fn urls(&self) -> GatewayUrls {
        GatewayUrls::for_environment(self.environment)
    }

    /// Endpoint notifications are echoed back to.
    pub fn echo_url(&self) -> &'static str {
        self.urls().form_url
    }

    pub fn compute_fees(&self, amount: Decimal, domestic: bool) -> Decimal {
        self.fees.compute(amount, domestic)
    }

    /// Whether the merchant has completed any verification-related setup.
    pub fn is_configured(&self) -> bool {
        self.pdt_token.is_some() || self.seller_account.is_some()
    }
}
