use crate::domain::acquirer::AcquirerConfig;
use crate::domain::notification::NotificationData;
use crate::domain::transaction::{PaymentDirection, Transaction, TransactionState};
use crate::domain::verdict::Verdict;
use chrono::{DateTime, Utc};
use tracing::{info, warn};

/// Result of applying a verdict to a transaction.
#[derive(Debug, Clone, PartialEq)]
pub struct Transition {
    /// The transaction after the transition, or the input unchanged.
    pub tx: Transaction,
    pub former_state: TransactionState,
    pub target_state: TransactionState,
    pub verdict: Verdict,
    /// Whether `tx` differs from the input and must be persisted.
    pub changed: bool,
    /// Whether the merchant should be invited to finish configuring the acquirer.
    pub advisory: bool,
}

pub fn target_state(verdict: Verdict) -> TransactionState {
    match verdict {
        Verdict::Confirmed => TransactionState::Done,
        Verdict::Pending => TransactionState::Pending,
        Verdict::Invalid | Verdict::Unrecognized => TransactionState::Cancel,
    }
}

fn cancel_message(verdict: Verdict, notification: &NotificationData) -> String {
    let status = notification
        .status_code
        .map_or_else(|| "unparsed".to_string(), |c| c.to_string());
    match verdict {
        Verdict::Invalid => format!(
            "gateway rejected the notification for {} (status {status})",
            notification.reference
        ),
        _ => format!(
            "unrecognized verdict for {} (status {status})",
            notification.reference
        ),
    }
}

/// Advances `tx` according to the gateway verdict.
///
/// Applying a verdict whose target equals the current state is a no-op, so
/// duplicate deliveries never rewrite the record. `Done` and `Cancel` are
/// terminal: any attempt to move away from them is refused and logged.
pub fn apply(
    tx: Transaction,
    verdict: Verdict,
    notification: &NotificationData,
    acquirer: &AcquirerConfig,
    now: DateTime<Utc>,
) -> Transition {
    let former_state = tx.state;
    let target_state = target_state(verdict);

    info!(
        reference = %tx.reference,
        former_state = %former_state,
        target_state = %target_state,
        verdict = %verdict,
        "applying payment notification"
    );

    let unchanged = |tx: Transaction| Transition {
        tx,
        former_state,
        target_state,
        verdict,
        changed: false,
        advisory: false,
    };

    if former_state == target_state {
        return unchanged(tx);
    }
    if former_state.is_terminal() {
        warn!(
            reference = %tx.reference,
            former_state = %former_state,
            target_state = %target_state,
            "refusing to move a transaction out of a terminal state"
        );
        return unchanged(tx);
    }

    let mut next = tx;
    next.state = target_state;
    if let Some(payment_id) = &notification.external_payment_id {
        next.acquirer_reference = Some(payment_id.clone());
    }
    next.direction = Some(PaymentDirection::from_amount(notification.amount));

    match target_state {
        TransactionState::Done => {
            next.completed_at = Some(notification.paid_at().unwrap_or(now));
        }
        TransactionState::Pending => {
            next.state_message = Some(notification.pending_reason.clone().unwrap_or_default());
        }
        _ => {
            let message = cancel_message(verdict, notification);
            info!(reference = %next.reference, "{message}");
            next.state_message = Some(message);
        }
    }

    let advisory = former_state == TransactionState::Draft
        && matches!(target_state, TransactionState::Pending | TransactionState::Cancel)
        && !acquirer.is_configured()
        && matches!(notification.status_code, Some(0 | 1));

    Transition {
        tx: next,
        former_state,
        target_state,
        verdict,
        changed: true,
        advisory,
    }
}
