//! HTTP binding of the notification endpoints.
//!
//! Responses to the gateway never carry payload data or error details: the
//! notify endpoint answers `200` with an empty body for every outcome except
//! an unreachable echo endpoint, where `503` asks the gateway to redeliver.

use crate::application::processor::{NotificationProcessor, Outcome};
use crate::domain::checkout::{CANCEL_PATH, NOTIFY_PATH, RETURN_PATH};
use crate::domain::notification::RawFields;
use crate::error::NotifyError;
use axum::Router;
use axum::extract::{Form, Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Redirect};
use axum::routing::{get, post};
use std::sync::Arc;
use tracing::{debug, error, info, warn};

/// Generic page the payer lands on after returning from the gateway.
pub const PROCESSING_PAGE: &str = "/payment/process";

#[derive(Clone)]
pub struct AppState {
    pub processor: Arc<NotificationProcessor>,
}

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route(NOTIFY_PATH, post(notify))
        .route(RETURN_PATH, get(return_query).post(return_form))
        .route(CANCEL_PATH, get(cancel))
        .with_state(state)
}

pub async fn health() -> impl IntoResponse {
    (StatusCode::OK, "ok")
}

async fn process(state: &AppState, fields: &RawFields) -> Result<Outcome, NotifyError> {
    let outcome = state.processor.handle(fields).await;
    match &outcome {
        Ok(Outcome::Processed(report)) => debug!(
            reference = %report.reference,
            state = %report.state,
            changed = report.changed,
            discrepancies = report.discrepancies.len(),
            "notification processed"
        ),
        Ok(Outcome::UnknownReference(_)) => {}
        Err(NotifyError::MissingReference) => {
            warn!("received notification without an order reference")
        }
        Err(e) => error!(error = %e, "unable to validate the payment notification"),
    }
    outcome
}

/// Server-to-server notification.
pub async fn notify(State(state): State<AppState>, Form(fields): Form<RawFields>) -> StatusCode {
    if !state.processor.acquirer().use_ipn {
        info!("instant payment notifications disabled, acknowledging without processing");
        return StatusCode::OK;
    }
    match process(&state, &fields).await {
        Err(e) if e.is_retryable() => StatusCode::SERVICE_UNAVAILABLE,
        _ => StatusCode::OK,
    }
}

async fn return_query(State(state): State<AppState>, Query(fields): Query<RawFields>) -> Redirect {
    payer_return(&state, &fields).await
}

async fn return_form(State(state): State<AppState>, Form(fields): Form<RawFields>) -> Redirect {
    payer_return(&state, &fields).await
}

/// Browser redirect back from the gateway.
async fn payer_return(state: &AppState, fields: &RawFields) -> Redirect {
    let _ = process(state, fields).await;
    Redirect::to(PROCESSING_PAGE)
}

/// Payer abandoned the payment on the gateway's page; nothing is mutated.
pub async fn cancel(Query(fields): Query<RawFields>) -> Redirect {
    info!(
        order_id = fields.get("order_id").map(String::as_str).unwrap_or_default(),
        "payer cancelled the payment"
    );
    Redirect::to(PROCESSING_PAGE)
}
