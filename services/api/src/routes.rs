use crate::infra::{parse_instant, AppState};
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::Extension;
use axum::Json;
use chrono::{DateTime, Utc};
use ev_rental::error::AppError;
use ev_rental::workflows::rentals::{
    booking_router, BookingRepository, BookingService, RefundDispatcher, RefundPolicy, RefundQuote,
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::sync::Arc;

/// Ad-hoc refund quote for a rental start and payment amount, without a
/// stored booking. The rental apps use this to preview the policy while the
/// cancellation sheet is open.
#[derive(Debug, Deserialize)]
pub(crate) struct RefundQuoteRequest {
    pub(crate) rental_start: String,
    pub(crate) total_payment: i64,
    #[serde(default)]
    pub(crate) at: Option<String>,
}

#[derive(Debug, Serialize)]
pub(crate) struct RefundQuoteResponse {
    pub(crate) at: DateTime<Utc>,
    #[serde(flatten)]
    pub(crate) quote: RefundQuote,
}

pub(crate) fn with_booking_routes<R, D>(service: Arc<BookingService<R, D>>) -> axum::Router
where
    R: BookingRepository + 'static,
    D: RefundDispatcher + 'static,
{
    booking_router(service)
        .route("/health", axum::routing::get(healthcheck))
        .route("/ready", axum::routing::get(readiness_endpoint))
        .route("/metrics", axum::routing::get(metrics_endpoint))
        .route(
            "/api/v1/rentals/refund-quote",
            axum::routing::post(refund_quote_endpoint),
        )
}

pub(crate) async fn healthcheck() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

pub(crate) async fn readiness_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    let ready = state.readiness.load(std::sync::atomic::Ordering::Relaxed);
    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let payload = if ready {
        json!({ "status": "ready" })
    } else {
        json!({ "status": "initializing" })
    };

    (status, Json(payload))
}

pub(crate) async fn metrics_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.metrics.render(),
    )
}

pub(crate) async fn refund_quote_endpoint(
    Json(payload): Json<RefundQuoteRequest>,
) -> Result<Json<RefundQuoteResponse>, AppError> {
    let RefundQuoteRequest {
        rental_start,
        total_payment,
        at,
    } = payload;

    let policy = RefundPolicy::default();
    let at = match at {
        Some(raw) => parse_instant(&raw)?,
        None => Utc::now(),
    };
    let quote = policy.quote_raw(&rental_start, total_payment, at)?;

    Ok(Json(RefundQuoteResponse { at, quote }))
}
