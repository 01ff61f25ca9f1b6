//! Booking cancellation and refund policy engine for an electric-vehicle
//! rental service, plus the HTTP surface the rental apps call into.

pub mod config;
pub mod error;
pub mod telemetry;
pub mod workflows;
