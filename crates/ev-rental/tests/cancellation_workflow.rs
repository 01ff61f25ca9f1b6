//! Integration specifications for the booking cancellation workflow.
//!
//! Scenarios drive the public service facade and the HTTP router, so quoting,
//! cancellation, and refund dispatch are validated without reaching into
//! private modules.

mod common {
    use std::collections::HashMap;
    use std::sync::{Arc, Mutex};

    use chrono::{DateTime, Duration, TimeZone, Utc};

    use ev_rental::workflows::rentals::domain::{
        BookingId, BookingRequest, StationRef, VehicleTypeRef,
    };
    use ev_rental::workflows::rentals::repository::{
        BookingRecord, BookingRepository, DispatchError, RefundDispatcher, RefundInstruction,
        RepositoryError,
    };
    use ev_rental::workflows::rentals::{BookingService, RefundPolicyConfig};

    pub(super) fn clock() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 11, 3, 9, 30, 0)
            .single()
            .expect("valid instant")
    }

    pub(super) fn booking_request(lead_hours: i64, total_payment: i64) -> BookingRequest {
        let rental_start = clock() + Duration::hours(lead_hours);
        BookingRequest {
            station: StationRef {
                code: "SGN03".to_string(),
                name: "Ben Thanh Station".to_string(),
            },
            vehicle_type: VehicleTypeRef {
                code: "ESCOOTER".to_string(),
                display_name: "Electric scooter".to_string(),
            },
            rental_start,
            rental_end: rental_start + Duration::hours(6),
            total_payment,
        }
    }

    #[derive(Default, Clone)]
    pub(super) struct MemoryRepository {
        records: Arc<Mutex<HashMap<BookingId, BookingRecord>>>,
    }

    impl BookingRepository for MemoryRepository {
        fn insert(&self, record: BookingRecord) -> Result<BookingRecord, RepositoryError> {
            let mut guard = self.records.lock().expect("lock");
            if guard.contains_key(&record.booking.booking_id) {
                return Err(RepositoryError::Conflict);
            }
            guard.insert(record.booking.booking_id.clone(), record.clone());
            Ok(record)
        }

        fn update(&self, record: BookingRecord) -> Result<(), RepositoryError> {
            let mut guard = self.records.lock().expect("lock");
            guard.insert(record.booking.booking_id.clone(), record);
            Ok(())
        }

        fn fetch(&self, id: &BookingId) -> Result<Option<BookingRecord>, RepositoryError> {
            let guard = self.records.lock().expect("lock");
            Ok(guard.get(id).cloned())
        }

        fn upcoming(&self, _limit: usize) -> Result<Vec<BookingRecord>, RepositoryError> {
            Ok(Vec::new())
        }
    }

    #[derive(Default, Clone)]
    pub(super) struct MemoryDispatcher {
        instructions: Arc<Mutex<Vec<RefundInstruction>>>,
    }

    impl MemoryDispatcher {
        pub(super) fn dispatched(&self) -> Vec<RefundInstruction> {
            self.instructions.lock().expect("lock").clone()
        }
    }

    impl RefundDispatcher for MemoryDispatcher {
        fn dispatch(&self, instruction: RefundInstruction) -> Result<(), DispatchError> {
            self.instructions.lock().expect("lock").push(instruction);
            Ok(())
        }
    }

    pub(super) fn build_service() -> (
        BookingService<MemoryRepository, MemoryDispatcher>,
        Arc<MemoryRepository>,
        Arc<MemoryDispatcher>,
    ) {
        let repository = Arc::new(MemoryRepository::default());
        let dispatcher = Arc::new(MemoryDispatcher::default());
        let service = BookingService::new(
            repository.clone(),
            dispatcher.clone(),
            RefundPolicyConfig::default(),
        );
        (service, repository, dispatcher)
    }
}

mod cancellation {
    use super::common::*;
    use chrono::Duration;
    use ev_rental::workflows::rentals::{
        BookingRepository, BookingServiceError, BookingStatus, BookingViolation, RefundMethod,
    };

    #[test]
    fn early_cancellation_refunds_ninety_percent() {
        let (service, repository, dispatcher) = build_service();
        let record = service
            .create(booking_request(36, 2_400_000))
            .expect("booking stored");
        let id = record.booking.booking_id.clone();

        let preview = service.quote(&id, Some(clock())).expect("quote");
        assert_eq!(preview.refund_percentage, 90);
        assert_eq!(preview.refund_amount, 2_160_000);

        let outcome = service
            .cancel(&id, RefundMethod::Wallet, Some(clock()))
            .expect("cancellation succeeds");
        assert_eq!(outcome.quote, preview);

        let stored = repository
            .fetch(&id)
            .expect("repo fetch")
            .expect("record present");
        assert_eq!(stored.status, BookingStatus::Cancelled);

        let dispatched = dispatcher.dispatched();
        assert_eq!(dispatched.len(), 1);
        assert_eq!(dispatched[0].amount, 2_160_000);
    }

    #[test]
    fn quote_is_a_read_model_and_changes_with_the_clock() {
        let (service, _, _) = build_service();
        let record = service
            .create(booking_request(26, 1_000_000))
            .expect("booking stored");
        let id = record.booking.booking_id;

        let early = service.quote(&id, Some(clock())).expect("early quote");
        let later = service
            .quote(&id, Some(clock() + Duration::hours(20)))
            .expect("later quote");

        assert_eq!(early.refund_percentage, 90);
        assert_eq!(later.refund_percentage, 50);
        assert!(later.refund_amount < early.refund_amount);
    }

    #[test]
    fn late_cancellation_keeps_the_full_payment() {
        let (service, _, dispatcher) = build_service();
        let record = service
            .create(booking_request(1, 1_000_000))
            .expect("booking stored");

        let outcome = service
            .cancel(
                &record.booking.booking_id,
                RefundMethod::OriginalPayment,
                Some(clock()),
            )
            .expect("cancellation succeeds");

        assert_eq!(outcome.quote.refund_amount, 0);
        assert_eq!(outcome.quote.fee_amount, 1_000_000);
        assert!(dispatcher.dispatched().is_empty());
    }

    #[test]
    fn cancellation_is_terminal() {
        let (service, _, _) = build_service();
        let record = service
            .create(booking_request(26, 1_000_000))
            .expect("booking stored");
        let id = record.booking.booking_id.clone();

        service
            .cancel(&id, RefundMethod::Wallet, Some(clock()))
            .expect("first cancellation succeeds");

        match service.quote(&id, Some(clock())) {
            Err(BookingServiceError::Violation(BookingViolation::NotCancellable(
                BookingStatus::Cancelled,
            ))) => {}
            other => panic!("expected not-cancellable violation, got {other:?}"),
        }
    }
}

mod routing {
    use std::sync::Arc;

    use axum::body::Body;
    use axum::http::{header, Request, StatusCode};
    use serde_json::{json, Value};
    use tower::util::ServiceExt;

    use super::common::*;
    use ev_rental::workflows::rentals::booking_router;

    async fn body_json(response: axum::response::Response) -> Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("body readable");
        serde_json::from_slice(&bytes).expect("json body")
    }

    #[tokio::test]
    async fn quote_then_cancel_over_http() {
        let (service, _, dispatcher) = build_service();
        let app = booking_router(Arc::new(service));

        let created = app
            .clone()
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/api/v1/rentals/bookings")
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from(
                        serde_json::to_vec(&booking_request(36, 2_400_000)).expect("json"),
                    ))
                    .expect("request builds"),
            )
            .await
            .expect("create call");
        assert_eq!(created.status(), StatusCode::CREATED);
        let booking_id = body_json(created).await["booking_id"]
            .as_str()
            .expect("booking id")
            .to_string();

        let quote = app
            .clone()
            .oneshot(
                Request::builder()
                    .uri(format!(
                        "/api/v1/rentals/bookings/{booking_id}/refund-quote?at=2025-11-03T09:30:00Z"
                    ))
                    .body(Body::empty())
                    .expect("request builds"),
            )
            .await
            .expect("quote call");
        assert_eq!(quote.status(), StatusCode::OK);
        assert_eq!(body_json(quote).await["refund_amount"], 2_160_000);

        let cancelled = app
            .clone()
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri(format!("/api/v1/rentals/bookings/{booking_id}/cancel"))
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from(
                        json!({
                            "refund_method": "original_payment",
                            "at": "2025-11-03T09:30:00Z",
                        })
                        .to_string(),
                    ))
                    .expect("request builds"),
            )
            .await
            .expect("cancel call");
        assert_eq!(cancelled.status(), StatusCode::OK);
        let outcome = body_json(cancelled).await;
        assert_eq!(outcome["method"], "original_payment");
        assert_eq!(outcome["quote"]["fee_amount"], 240_000);

        assert_eq!(dispatcher.dispatched().len(), 1);
    }
}
