use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::domain::{Booking, BookingId, BookingStatus, CancellationOutcome, RefundMethod};

/// Repository record carrying the booking, its status, and any cancellation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookingRecord {
    pub booking: Booking,
    pub status: BookingStatus,
    pub cancellation: Option<CancellationOutcome>,
}

impl BookingRecord {
    pub fn refund_summary(&self) -> String {
        match &self.cancellation {
            Some(outcome) => format!(
                "refunded {} of {} VND via {}",
                outcome.quote.refund_amount,
                self.booking.total_payment,
                outcome.method.label()
            ),
            None => "no cancellation recorded".to_string(),
        }
    }

    pub fn status_view(&self) -> BookingStatusView {
        BookingStatusView {
            booking_id: self.booking.booking_id.clone(),
            booking_code: self.booking.booking_code.clone(),
            status: self.status.label(),
            refund_summary: self.refund_summary(),
            refund_amount: self
                .cancellation
                .as_ref()
                .map(|outcome| outcome.quote.refund_amount),
        }
    }
}

/// Storage abstraction so the service module can be exercised in isolation.
pub trait BookingRepository: Send + Sync {
    fn insert(&self, record: BookingRecord) -> Result<BookingRecord, RepositoryError>;
    fn update(&self, record: BookingRecord) -> Result<(), RepositoryError>;
    fn fetch(&self, id: &BookingId) -> Result<Option<BookingRecord>, RepositoryError>;
    fn upcoming(&self, limit: usize) -> Result<Vec<BookingRecord>, RepositoryError>;
}

/// Error enumeration for repository failures.
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("record already exists")]
    Conflict,
    #[error("record not found")]
    NotFound,
    #[error("repository unavailable: {0}")]
    Unavailable(String),
}

/// Outbound hook settling refunds (wallet credit or payment-gateway
/// reversal). Settlement transport lives behind this seam.
pub trait RefundDispatcher: Send + Sync {
    fn dispatch(&self, instruction: RefundInstruction) -> Result<(), DispatchError>;
}

/// Payload handed to the settlement adapter after a cancellation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RefundInstruction {
    pub booking_id: BookingId,
    pub method: RefundMethod,
    pub amount: u64,
    pub details: BTreeMap<String, String>,
}

/// Refund dispatch error.
#[derive(Debug, thiserror::Error)]
pub enum DispatchError {
    #[error("refund transport unavailable: {0}")]
    Transport(String),
}

/// Sanitized representation of a booking's exposed status.
#[derive(Debug, Clone, Serialize)]
pub struct BookingStatusView {
    pub booking_id: BookingId,
    pub booking_code: String,
    pub status: &'static str,
    pub refund_summary: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub refund_amount: Option<u64>,
}
