use super::locks::ReferenceLocks;
use super::state_machine;
use super::validator::GatewayEchoValidator;
use crate::domain::acquirer::AcquirerConfig;
use crate::domain::notification::{NotificationData, RawFields};
use crate::domain::ports::{
    EchoGatewayRef, Lookup, MerchantNotifierRef, TransactionRepositoryBox,
};
use crate::domain::reconciliation::{ReconciliationResult, reconcile};
use crate::domain::transaction::{Transaction, TransactionState};
use crate::domain::verdict::Verdict;
use crate::error::{NotifyError, Result};
use chrono::Utc;
use tracing::{error, info, warn};

/// Summary of a processed notification.
#[derive(Debug, Clone, PartialEq)]
pub struct Report {
    pub reference: String,
    pub verdict: Verdict,
    pub former_state: TransactionState,
    pub state: TransactionState,
    /// Whether the transaction record was written.
    pub changed: bool,
    pub discrepancies: ReconciliationResult,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    /// The reference does not belong to any local transaction; nothing was done.
    UnknownReference(String),
    Processed(Report),
}

impl Outcome {
    pub fn is_processed(&self) -> bool {
        matches!(self, Outcome::Processed(_))
    }
}

/// Runs the full verification flow for inbound gateway notifications.
///
/// The echo round-trip happens without holding any lock; only the
/// read-decide-write section is serialized per reference.
pub struct NotificationProcessor {
    repository: TransactionRepositoryBox,
    validator: GatewayEchoValidator,
    notifier: MerchantNotifierRef,
    acquirer: AcquirerConfig,
    locks: ReferenceLocks,
}

impl NotificationProcessor {
    pub fn new(
        repository: TransactionRepositoryBox,
        gateway: EchoGatewayRef,
        notifier: MerchantNotifierRef,
        acquirer: AcquirerConfig,
    ) -> Self {
        Self {
            repository,
            validator: GatewayEchoValidator::new(gateway),
            notifier,
            acquirer,
            locks: ReferenceLocks::new(),
        }
    }

    pub fn acquirer(&self) -> &AcquirerConfig {
        &self.acquirer
    }

    /// Looks a transaction up, treating several matches as a hard failure.
    pub async fn find_transaction(&self, reference: &str) -> Result<Option<Transaction>> {
        match self.repository.find(reference).await? {
            Lookup::NotFound => Ok(None),
            Lookup::Found(tx) => Ok(Some(tx)),
            Lookup::Ambiguous(count) => {
                error!(reference, count, "notification reference matches several transactions");
                Err(NotifyError::AmbiguousReference {
                    reference: reference.to_string(),
                    count,
                })
            }
        }
    }

    pub async fn handle(&self, raw: &RawFields) -> Result<Outcome> {
        let notification = NotificationData::parse(raw)?;
        let reference = notification.reference.clone();

        if self.find_transaction(&reference).await?.is_none() {
            warn!(reference = %reference, "received notification for unknown payment reference");
            return Ok(Outcome::UnknownReference(reference));
        }

        let verdict = self
            .validator
            .confirm(
                &notification.raw,
                self.acquirer.echo_url(),
                self.acquirer.pdt_token.as_deref(),
            )
            .await
            .inspect_err(|e| warn!(reference = %reference, error = %e, "gateway echo failed"))?;

        let _guard = self.locks.acquire(&reference).await;

        // Re-read under the lock: a concurrent handler may have moved the state.
        let Some(tx) = self.find_transaction(&reference).await? else {
            return Ok(Outcome::UnknownReference(reference));
        };

        let discrepancies = reconcile(&notification, &tx, &self.acquirer);
        for discrepancy in discrepancies.iter() {
            warn!(reference = %reference, %discrepancy, "notification field mismatch");
        }

        let transition = state_machine::apply(tx, verdict, &notification, &self.acquirer, Utc::now());
        if transition.changed {
            self.repository.save(transition.tx.clone()).await?;
            info!(
                reference = %reference,
                former_state = %transition.former_state,
                state = %transition.tx.state,
                "transaction updated from notification"
            );
        }

        if transition.advisory
            && let Err(e) = self
                .notifier
                .send_configuration_advisory(&self.acquirer, &reference)
                .await
        {
            warn!(reference = %reference, error = %e, "could not send configuration advisory");
        }

        Ok(Outcome::Processed(Report {
            reference,
            verdict,
            former_state: transition.former_state,
            state: transition.tx.state,
            changed: transition.changed,
            discrepancies,
        }))
    }
}
