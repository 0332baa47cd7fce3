use crate::domain::acquirer::{AcquirerConfig, Environment, FeeRate, FeeSchedule};
use crate::infrastructure::http_gateway::DEFAULT_ECHO_TIMEOUT_MS;
use clap::Args;
use rust_decimal::Decimal;
use std::path::PathBuf;

/// Acquirer settings, read from flags or the environment.
#[derive(Args, Debug, Clone)]
pub struct AcquirerArgs {
    /// Gateway environment: production or sandbox
    #[arg(long, env = "PAYHERE_ENVIRONMENT", default_value = "sandbox")]
    pub environment: Environment,

    /// Merchant account registered with the gateway
    #[arg(long, env = "PAYHERE_MERCHANT_EMAIL", default_value = "")]
    pub merchant_email: String,

    /// Numeric merchant id, checked against the notified receiver id
    #[arg(long, env = "PAYHERE_SELLER_ACCOUNT")]
    pub seller_account: Option<String>,

    /// Token for data-transfer verification
    #[arg(long, env = "PAYHERE_PDT_TOKEN", hide_env_values = true)]
    pub pdt_token: Option<String>,

    /// Process server-to-server notifications
    #[arg(long, env = "PAYHERE_USE_IPN", default_value_t = true, action = clap::ArgAction::Set)]
    pub use_ipn: bool,

    /// Add handling fees on top of order amounts
    #[arg(long, env = "PAYHERE_FEES_ACTIVE")]
    pub fees_active: bool,

    #[arg(long, env = "PAYHERE_FEES_DOM_FIXED", default_value = "0.35")]
    pub fees_dom_fixed: Decimal,

    #[arg(long, env = "PAYHERE_FEES_DOM_VAR", default_value = "3.4")]
    pub fees_dom_var: Decimal,

    #[arg(long, env = "PAYHERE_FEES_INT_FIXED", default_value = "0.35")]
    pub fees_int_fixed: Decimal,

    #[arg(long, env = "PAYHERE_FEES_INT_VAR", default_value = "3.9")]
    pub fees_int_var: Decimal,
}

impl AcquirerArgs {
    pub fn to_config(&self) -> AcquirerConfig {
        let non_empty = |v: &Option<String>| v.clone().filter(|s| !s.trim().is_empty());
        AcquirerConfig {
            environment: self.environment,
            email_account: self.merchant_email.clone(),
            seller_account: non_empty(&self.seller_account),
            pdt_token: non_empty(&self.pdt_token),
            use_ipn: self.use_ipn,
            fees: FeeSchedule {
                active: self.fees_active,
                domestic: FeeRate {
                    fixed: self.fees_dom_fixed,
                    percent: self.fees_dom_var,
                },
                international: FeeRate {
                    fixed: self.fees_int_fixed,
                    percent: self.fees_int_var,
                },
            },
        }
    }
}

/// Settings of the webhook server.
#[derive(Args, Debug, Clone)]
pub struct ServeArgs {
    #[arg(long, env = "BIND_ADDR", default_value = "0.0.0.0:3000")]
    pub bind_addr: String,

    /// Timeout of the echo-back request to the gateway, in milliseconds
    #[arg(long, env = "PAYHERE_ECHO_TIMEOUT_MS", default_value_t = DEFAULT_ECHO_TIMEOUT_MS)]
    pub echo_timeout_ms: u64,

    /// CSV of transactions (reference, amount, currency[, fees]) loaded at start-up
    #[arg(long)]
    pub transactions: Option<PathBuf>,

    /// Path to persistent database (optional). If provided, uses RocksDB.
    #[arg(long)]
    pub db_path: Option<PathBuf>,

    #[command(flatten)]
    pub acquirer: AcquirerArgs,
}
