use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use serde_json::json;

use super::domain::{BookingId, BookingRequest, RefundMethod};
use super::repository::{BookingRepository, RefundDispatcher, RepositoryError};
use super::service::{BookingService, BookingServiceError};

/// Router builder exposing HTTP endpoints for booking intake, refund
/// quoting, and cancellation.
pub fn booking_router<R, D>(service: Arc<BookingService<R, D>>) -> Router
where
    R: BookingRepository + 'static,
    D: RefundDispatcher + 'static,
{
    Router::new()
        .route("/api/v1/rentals/bookings", post(create_handler::<R, D>))
        .route(
            "/api/v1/rentals/bookings/:booking_id",
            get(status_handler::<R, D>),
        )
        .route(
            "/api/v1/rentals/bookings/:booking_id/refund-quote",
            get(quote_handler::<R, D>),
        )
        .route(
            "/api/v1/rentals/bookings/:booking_id/cancel",
            post(cancel_handler::<R, D>),
        )
        .with_state(service)
}

#[derive(Debug, Deserialize)]
pub(crate) struct QuoteQuery {
    /// Evaluation instant override so reads can be made deterministic.
    pub(crate) at: Option<DateTime<Utc>>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct CancelRequest {
    pub(crate) refund_method: RefundMethod,
    #[serde(default)]
    pub(crate) at: Option<DateTime<Utc>>,
}

pub(crate) async fn create_handler<R, D>(
    State(service): State<Arc<BookingService<R, D>>>,
    axum::Json(request): axum::Json<BookingRequest>,
) -> Response
where
    R: BookingRepository + 'static,
    D: RefundDispatcher + 'static,
{
    match service.create(request) {
        Ok(record) => {
            let view = record.status_view();
            (StatusCode::CREATED, axum::Json(view)).into_response()
        }
        Err(BookingServiceError::Violation(error)) => {
            let payload = json!({
                "error": error.to_string(),
            });
            (StatusCode::UNPROCESSABLE_ENTITY, axum::Json(payload)).into_response()
        }
        Err(BookingServiceError::Repository(RepositoryError::Conflict)) => {
            let payload = json!({
                "error": "booking already exists",
            });
            (StatusCode::CONFLICT, axum::Json(payload)).into_response()
        }
        Err(other) => {
            let payload = json!({
                "error": other.to_string(),
            });
            (StatusCode::INTERNAL_SERVER_ERROR, axum::Json(payload)).into_response()
        }
    }
}

pub(crate) async fn status_handler<R, D>(
    State(service): State<Arc<BookingService<R, D>>>,
    Path(booking_id): Path<String>,
) -> Response
where
    R: BookingRepository + 'static,
    D: RefundDispatcher + 'static,
{
    let id = BookingId(booking_id);
    match service.get(&id) {
        Ok(record) => {
            let view = record.status_view();
            (StatusCode::OK, axum::Json(view)).into_response()
        }
        Err(error) => cancellation_error_response(error),
    }
}

pub(crate) async fn quote_handler<R, D>(
    State(service): State<Arc<BookingService<R, D>>>,
    Path(booking_id): Path<String>,
    Query(query): Query<QuoteQuery>,
) -> Response
where
    R: BookingRepository + 'static,
    D: RefundDispatcher + 'static,
{
    let id = BookingId(booking_id);
    match service.quote(&id, query.at) {
        Ok(quote) => (StatusCode::OK, axum::Json(quote)).into_response(),
        Err(error) => cancellation_error_response(error),
    }
}

pub(crate) async fn cancel_handler<R, D>(
    State(service): State<Arc<BookingService<R, D>>>,
    Path(booking_id): Path<String>,
    axum::Json(request): axum::Json<CancelRequest>,
) -> Response
where
    R: BookingRepository + 'static,
    D: RefundDispatcher + 'static,
{
    let id = BookingId(booking_id);
    match service.cancel(&id, request.refund_method, request.at) {
        Ok(outcome) => (StatusCode::OK, axum::Json(outcome)).into_response(),
        Err(error) => cancellation_error_response(error),
    }
}

/// Shared status mapping for the fetch/quote/cancel paths.
fn cancellation_error_response(error: BookingServiceError) -> Response {
    let status = match &error {
        BookingServiceError::Repository(RepositoryError::NotFound) => StatusCode::NOT_FOUND,
        BookingServiceError::Violation(_) => StatusCode::UNPROCESSABLE_ENTITY,
        BookingServiceError::Quote(_) => StatusCode::BAD_REQUEST,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    };

    let payload = json!({
        "error": error.to_string(),
    });
    (status, axum::Json(payload)).into_response()
}
