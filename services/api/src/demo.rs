use crate::infra::{
    default_refund_policy_config, parse_instant, InMemoryBookingRepository,
    InMemoryRefundDispatcher,
};
use chrono::{Duration, Utc};
use clap::Args;
use ev_rental::error::AppError;
use ev_rental::workflows::rentals::{
    BookingRequest, BookingService, RefundMethod, RefundPolicy, StationRef, VehicleTypeRef,
};
use std::sync::Arc;

#[derive(Args, Debug)]
pub(crate) struct RefundQuoteArgs {
    /// Rental start instant, RFC 3339 (e.g. 2026-08-10T09:00:00Z)
    #[arg(long)]
    pub(crate) start: String,
    /// Total payment already made, VND whole units
    #[arg(long)]
    pub(crate) amount: i64,
    /// Evaluation instant, RFC 3339; defaults to the current time
    #[arg(long)]
    pub(crate) at: Option<String>,
}

pub(crate) fn run_refund_quote(args: RefundQuoteArgs) -> Result<(), AppError> {
    let at = match args.at {
        Some(raw) => parse_instant(&raw)?,
        None => Utc::now(),
    };

    let policy = RefundPolicy::default();
    let quote = policy.quote_raw(&args.start, args.amount, at)?;

    println!("evaluated at      : {at}");
    println!("hours until start : {:.2}", quote.hours_until_start);
    println!("refund percentage : {}%", quote.refund_percentage);
    println!("refund amount     : {} VND", quote.refund_amount);
    println!("cancellation fee  : {} VND", quote.fee_amount);
    Ok(())
}

#[derive(Args, Debug, Default)]
pub(crate) struct DemoArgs {
    /// Pin the demo clock to a fixed instant, RFC 3339
    #[arg(long)]
    pub(crate) at: Option<String>,
}

/// Seeds a handful of bookings at different lead times, previews each
/// refund quote, and cancels the earliest one so the dispatch path shows up
/// in the output.
pub(crate) fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let now = match args.at {
        Some(raw) => parse_instant(&raw)?,
        None => Utc::now(),
    };

    let repository = Arc::new(InMemoryBookingRepository::default());
    let dispatcher = Arc::new(InMemoryRefundDispatcher::default());
    let service = BookingService::new(
        repository,
        dispatcher.clone(),
        default_refund_policy_config(),
    );

    println!("== EV rental cancellation demo (clock {now}) ==");

    let mut first_booking = None;
    for (lead_hours, amount) in [(36_i64, 2_400_000_i64), (8, 800_000), (1, 1_000_000)] {
        let rental_start = now + Duration::hours(lead_hours);
        let record = service.create(BookingRequest {
            station: StationRef {
                code: "SGN03".to_string(),
                name: "Ben Thanh Station".to_string(),
            },
            vehicle_type: VehicleTypeRef {
                code: "EBIKE".to_string(),
                display_name: "Electric bike".to_string(),
            },
            rental_start,
            rental_end: rental_start + Duration::hours(4),
            total_payment: amount,
        })?;

        let quote = service.quote(&record.booking.booking_id, Some(now))?;
        println!(
            "{} starts in {:>3}h, paid {:>9} VND -> refund {}% = {} VND (fee {} VND)",
            record.booking.booking_code,
            lead_hours,
            amount,
            quote.refund_percentage,
            quote.refund_amount,
            quote.fee_amount,
        );

        if first_booking.is_none() {
            first_booking = Some(record.booking.booking_id);
        }
    }

    if let Some(booking_id) = first_booking {
        let outcome = service.cancel(&booking_id, RefundMethod::Wallet, Some(now))?;
        println!(
            "cancelled {} -> {} VND back to {}",
            outcome.booking_id.0,
            outcome.quote.refund_amount,
            outcome.method.label(),
        );
    }

    for instruction in dispatcher.dispatched() {
        println!(
            "dispatched refund: {} VND via {} for {}",
            instruction.amount,
            instruction.method.label(),
            instruction.booking_id.0,
        );
    }

    Ok(())
}
