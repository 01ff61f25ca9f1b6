use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::refund::RefundQuote;

/// Identifier wrapper for stored bookings.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BookingId(pub String);

/// Pickup station as advertised in search results.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StationRef {
    pub code: String,
    pub name: String,
}

/// Vehicle type offered at a station (e-bike, e-scooter, e-car).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VehicleTypeRef {
    pub code: String,
    pub display_name: String,
}

/// Intake payload for a paid booking handed to this service.
///
/// The payment amount is signed so the guard can reject negative values
/// explicitly instead of silently wrapping them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookingRequest {
    pub station: StationRef,
    pub vehicle_type: VehicleTypeRef,
    pub rental_start: DateTime<Utc>,
    pub rental_end: DateTime<Utc>,
    pub total_payment: i64,
}

/// Validated booking as stored by the repository. Amounts are VND whole
/// units; there is no minor unit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Booking {
    pub booking_id: BookingId,
    pub booking_code: String,
    pub station: StationRef,
    pub vehicle_type: VehicleTypeRef,
    pub rental_start: DateTime<Utc>,
    pub rental_end: DateTime<Utc>,
    pub total_payment: u64,
}

/// Lifecycle status tracked for each booking record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BookingStatus {
    Pending,
    Confirmed,
    Active,
    Completed,
    Cancelled,
}

impl BookingStatus {
    pub const fn label(self) -> &'static str {
        match self {
            BookingStatus::Pending => "pending",
            BookingStatus::Confirmed => "confirmed",
            BookingStatus::Active => "active",
            BookingStatus::Completed => "completed",
            BookingStatus::Cancelled => "cancelled",
        }
    }
}

/// Destination chosen by the customer for a cancellation refund.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RefundMethod {
    Wallet,
    OriginalPayment,
}

impl RefundMethod {
    pub const fn label(self) -> &'static str {
        match self {
            RefundMethod::Wallet => "wallet",
            RefundMethod::OriginalPayment => "original_payment",
        }
    }
}

/// Recorded result of a completed cancellation: the quote the customer
/// accepted, the refund destination, and when it happened.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CancellationOutcome {
    pub booking_id: BookingId,
    pub method: RefundMethod,
    pub quote: RefundQuote,
    pub cancelled_at: DateTime<Utc>,
}
