use crate::domain::acquirer::AcquirerConfig;
use crate::domain::ports::MerchantNotifier;
use crate::error::Result;
use async_trait::async_trait;

pub const ADVISORY_SUBJECT: &str = "Add your Payhere account";

/// `MerchantNotifier` that records configuration advisories in the log.
///
/// Stands in for mail dispatch; always succeeds.
#[derive(Debug, Default, Clone)]
pub struct LogNotifier;

impl LogNotifier {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl MerchantNotifier for LogNotifier {
    async fn send_configuration_advisory(&self, acquirer: &AcquirerConfig, reference: &str) -> Result<()> {
        tracing::warn!(
            email_to = %acquirer.email_account,
            subject = ADVISORY_SUBJECT,
            reference,
            "payment received before the acquirer was fully configured"
        );
        Ok(())
    }
}
