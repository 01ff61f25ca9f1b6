use chrono::{DateTime, Utc};

use super::domain::{Booking, BookingId, BookingRequest, BookingStatus};

/// Validation errors raised before a booking enters the repository or the
/// cancellation path.
#[derive(Debug, thiserror::Error)]
pub enum BookingViolation {
    #[error("station code must not be empty")]
    MissingStationCode,
    #[error("vehicle type code must not be empty")]
    MissingVehicleCode,
    #[error("rental end {end} must be after rental start {start}")]
    EmptyRentalPeriod {
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    },
    #[error("total payment must be non-negative, got {0}")]
    NegativePayment(i64),
    #[error("booking is {} and can no longer be cancelled", .0.label())]
    NotCancellable(BookingStatus),
}

/// Guard producing validated `Booking`s and vetting cancellation requests.
#[derive(Debug, Clone, Default)]
pub struct CancellationGuard;

impl CancellationGuard {
    /// Validate an intake request. The identifier and booking code are
    /// assigned by the service once the request passes.
    pub fn booking_from_request(
        &self,
        request: BookingRequest,
    ) -> Result<Booking, BookingViolation> {
        if request.station.code.trim().is_empty() {
            return Err(BookingViolation::MissingStationCode);
        }
        if request.vehicle_type.code.trim().is_empty() {
            return Err(BookingViolation::MissingVehicleCode);
        }
        if request.rental_end <= request.rental_start {
            return Err(BookingViolation::EmptyRentalPeriod {
                start: request.rental_start,
                end: request.rental_end,
            });
        }
        if request.total_payment < 0 {
            return Err(BookingViolation::NegativePayment(request.total_payment));
        }

        Ok(Booking {
            booking_id: BookingId(String::new()),
            booking_code: String::new(),
            station: request.station,
            vehicle_type: request.vehicle_type,
            rental_start: request.rental_start,
            rental_end: request.rental_end,
            total_payment: request.total_payment as u64,
        })
    }

    /// Only bookings not yet handed over may be quoted or cancelled. The
    /// check is by status, not by clock: a still-confirmed booking past its
    /// start time can be cancelled, for a 0% refund.
    pub fn ensure_cancellable(&self, status: BookingStatus) -> Result<(), BookingViolation> {
        match status {
            BookingStatus::Pending | BookingStatus::Confirmed => Ok(()),
            other => Err(BookingViolation::NotCancellable(other)),
        }
    }
}
