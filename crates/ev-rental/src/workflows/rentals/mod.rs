//! Booking intake, refund quoting, and cancellation workflows for the
//! rental fleet.

pub mod code;
pub mod domain;
pub mod guard;
pub mod refund;
pub mod repository;
pub mod router;
pub mod service;

#[cfg(test)]
mod tests;

pub use domain::{
    Booking, BookingId, BookingRequest, BookingStatus, CancellationOutcome, RefundMethod,
    StationRef, VehicleTypeRef,
};
pub use guard::{BookingViolation, CancellationGuard};
pub use refund::{
    PolicyConfigError, QuoteError, RefundBand, RefundPolicy, RefundPolicyConfig, RefundQuote,
};
pub use repository::{
    BookingRecord, BookingRepository, BookingStatusView, DispatchError, RefundDispatcher,
    RefundInstruction, RepositoryError,
};
pub use router::booking_router;
pub use service::{BookingService, BookingServiceError};
