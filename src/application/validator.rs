use crate::domain::notification::{PAYMENT_ID, RawFields, STATUS_CODE};
use crate::domain::ports::EchoGatewayRef;
use crate::domain::verdict::Verdict;
use crate::error::Result;
use tracing::{debug, warn};

pub const COMMAND_FIELD: &str = "cmd";
pub const AUTH_TOKEN_FIELD: &str = "at";

/// Which handshake the gateway expects for a given notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EchoMode {
    /// Server-to-server notification.
    Validate,
    /// Data transfer after a browser redirect; needs the merchant's token.
    Synchronize,
}

impl EchoMode {
    pub fn for_payload(payload: &RawFields) -> Self {
        let has_payment_id = payload
            .get(PAYMENT_ID)
            .is_some_and(|id| !id.trim().is_empty());
        if has_payment_id {
            EchoMode::Synchronize
        } else {
            EchoMode::Validate
        }
    }

    pub fn command(self) -> &'static str {
        match self {
            EchoMode::Validate => "_notify-validate",
            EchoMode::Synchronize => "_notify-synch",
        }
    }
}

/// Authenticates notifications by posting them back to the gateway unmodified.
#[derive(Clone)]
pub struct GatewayEchoValidator {
    gateway: EchoGatewayRef,
}

impl GatewayEchoValidator {
    pub fn new(gateway: EchoGatewayRef) -> Self {
        Self { gateway }
    }

    /// Builds the echo request body: the original payload plus the command
    /// discriminator and, for data transfer, the auth token.
    pub fn echo_fields(payload: &RawFields, auth_token: Option<&str>) -> (EchoMode, RawFields) {
        let mode = EchoMode::for_payload(payload);
        let mut fields = payload.clone();
        fields.insert(COMMAND_FIELD.to_string(), mode.command().to_string());
        if mode == EchoMode::Synchronize {
            if auth_token.is_none() {
                warn!("data transfer verification without a configured token");
            }
            fields.insert(
                AUTH_TOKEN_FIELD.to_string(),
                auth_token.unwrap_or_default().to_string(),
            );
        }
        (mode, fields)
    }

    /// Posts the payload back to `submission_url` and interprets the answer.
    ///
    /// A verified answer yields the verdict of the payload's own status code.
    /// A transport failure is returned as `EchoUnavailable`, never as a verdict.
    pub async fn confirm(
        &self,
        payload: &RawFields,
        submission_url: &str,
        auth_token: Option<&str>,
    ) -> Result<Verdict> {
        let (mode, fields) = Self::echo_fields(payload, auth_token);
        let body = self.gateway.post_echo(submission_url, &fields).await?;
        let notified_status = payload
            .get(STATUS_CODE)
            .and_then(|code| code.trim().parse().ok());
        let verdict = Verdict::from_echo_response(&body, notified_status);
        debug!(?mode, %verdict, "gateway echo answered");
        if verdict == Verdict::Unrecognized {
            warn!(?mode, "unrecognized answer from gateway echo endpoint");
        }
        Ok(verdict)
    }
}
