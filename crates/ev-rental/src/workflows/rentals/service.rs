use std::collections::BTreeMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use chrono::{DateTime, Utc};

use super::code::booking_code;
use super::domain::{BookingId, BookingRequest, BookingStatus, CancellationOutcome, RefundMethod};
use super::guard::{BookingViolation, CancellationGuard};
use super::refund::{QuoteError, RefundPolicy, RefundPolicyConfig, RefundQuote};
use super::repository::{
    BookingRecord, BookingRepository, DispatchError, RefundDispatcher, RefundInstruction,
    RepositoryError,
};

/// Service composing the cancellation guard, repository, refund policy, and
/// refund dispatcher.
pub struct BookingService<R, D> {
    guard: CancellationGuard,
    repository: Arc<R>,
    dispatcher: Arc<D>,
    policy: Arc<RefundPolicy>,
}

static BOOKING_SEQUENCE: AtomicU64 = AtomicU64::new(1);

fn next_booking_sequence() -> u64 {
    BOOKING_SEQUENCE.fetch_add(1, Ordering::Relaxed)
}

impl<R, D> BookingService<R, D>
where
    R: BookingRepository + 'static,
    D: RefundDispatcher + 'static,
{
    pub fn new(repository: Arc<R>, dispatcher: Arc<D>, config: RefundPolicyConfig) -> Self {
        Self {
            guard: CancellationGuard::default(),
            repository,
            dispatcher,
            policy: Arc::new(RefundPolicy::new(config)),
        }
    }

    /// Register a paid booking, returning the repository-backed record.
    /// Payment settles upstream of this service, so new records enter as
    /// `Confirmed`.
    pub fn create(&self, request: BookingRequest) -> Result<BookingRecord, BookingServiceError> {
        let mut booking = self.guard.booking_from_request(request)?;
        let sequence = next_booking_sequence();
        booking.booking_id = BookingId(format!("bkg-{sequence:06}"));
        booking.booking_code = booking_code(
            &booking.station.code,
            &booking.vehicle_type.code,
            sequence,
        );

        let record = BookingRecord {
            booking,
            status: BookingStatus::Confirmed,
            cancellation: None,
        };

        let stored = self.repository.insert(record)?;
        Ok(stored)
    }

    /// Quote the refund owed if the booking were cancelled at `now`
    /// (wall-clock when `None`). Read-only: the cancellation surface shows
    /// this before the customer confirms.
    pub fn quote(
        &self,
        booking_id: &BookingId,
        now: Option<DateTime<Utc>>,
    ) -> Result<RefundQuote, BookingServiceError> {
        let record = self.fetch(booking_id)?;
        self.guard.ensure_cancellable(record.status)?;

        let now = now.unwrap_or_else(Utc::now);
        let quote = self.policy.quote(
            record.booking.rental_start,
            record.booking.total_payment as i64,
            now,
        )?;
        Ok(quote)
    }

    /// Cancel the booking, persist the outcome, and hand the refund to the
    /// settlement adapter when anything is owed back.
    pub fn cancel(
        &self,
        booking_id: &BookingId,
        method: RefundMethod,
        now: Option<DateTime<Utc>>,
    ) -> Result<CancellationOutcome, BookingServiceError> {
        let mut record = self.fetch(booking_id)?;
        self.guard.ensure_cancellable(record.status)?;

        let now = now.unwrap_or_else(Utc::now);
        let quote = self.policy.quote(
            record.booking.rental_start,
            record.booking.total_payment as i64,
            now,
        )?;

        let outcome = CancellationOutcome {
            booking_id: booking_id.clone(),
            method,
            quote,
            cancelled_at: now,
        };

        record.status = BookingStatus::Cancelled;
        record.cancellation = Some(outcome.clone());
        self.repository.update(record)?;

        if outcome.quote.refund_amount > 0 {
            let mut details = BTreeMap::new();
            details.insert(
                "refund_percentage".to_string(),
                outcome.quote.refund_percentage.to_string(),
            );
            self.dispatcher.dispatch(RefundInstruction {
                booking_id: booking_id.clone(),
                method,
                amount: outcome.quote.refund_amount,
                details,
            })?;
        }

        Ok(outcome)
    }

    /// Fetch a booking and current status for API responses.
    pub fn get(&self, booking_id: &BookingId) -> Result<BookingRecord, BookingServiceError> {
        self.fetch(booking_id)
    }

    fn fetch(&self, booking_id: &BookingId) -> Result<BookingRecord, BookingServiceError> {
        let record = self
            .repository
            .fetch(booking_id)?
            .ok_or(RepositoryError::NotFound)?;
        Ok(record)
    }
}

/// Error raised by the booking service.
#[derive(Debug, thiserror::Error)]
pub enum BookingServiceError {
    #[error(transparent)]
    Violation(#[from] BookingViolation),
    #[error(transparent)]
    Quote(#[from] QuoteError),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
    #[error(transparent)]
    Dispatch(#[from] DispatchError),
}
