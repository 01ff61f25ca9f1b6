use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use chrono::{DateTime, Duration, TimeZone, Utc};

use crate::workflows::rentals::domain::{BookingId, BookingRequest, StationRef, VehicleTypeRef};
use crate::workflows::rentals::refund::RefundPolicyConfig;
use crate::workflows::rentals::repository::{
    BookingRecord, BookingRepository, DispatchError, RefundDispatcher, RefundInstruction,
    RepositoryError,
};
use crate::workflows::rentals::service::BookingService;

pub(super) fn fixed_now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 6, 10, 8, 0, 0)
        .single()
        .expect("valid instant")
}

pub(super) fn station() -> StationRef {
    StationRef {
        code: "HAN01".to_string(),
        name: "Hoan Kiem Station".to_string(),
    }
}

pub(super) fn vehicle_type() -> VehicleTypeRef {
    VehicleTypeRef {
        code: "EBIKE".to_string(),
        display_name: "Electric bike".to_string(),
    }
}

/// Booking whose rental starts `lead_hours` after the fixed test clock.
pub(super) fn request_starting_in(lead_hours: i64, total_payment: i64) -> BookingRequest {
    let rental_start = fixed_now() + Duration::hours(lead_hours);
    BookingRequest {
        station: station(),
        vehicle_type: vehicle_type(),
        rental_start,
        rental_end: rental_start + Duration::hours(4),
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
