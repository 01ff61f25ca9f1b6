use chrono::{DateTime, Utc};
use ev_rental::workflows::rentals::{
    BookingId, BookingRecord, BookingRepository, BookingStatus, DispatchError, QuoteError,
    RefundDispatcher, RefundInstruction, RefundPolicyConfig, RepositoryError,
};
use metrics_exporter_prometheus::PrometheusHandle;
use std::collections::HashMap;
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex};

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

#[derive(Default, Clone)]
pub(crate) struct InMemoryBookingRepository {
    records: Arc<Mutex<HashMap<BookingId, BookingRecord>>>,
}

impl BookingRepository for InMemoryBookingRepository {
    fn insert(&self, record: BookingRecord) -> Result<BookingRecord, RepositoryError> {
        let mut guard = self.records.lock().expect("repository mutex poisoned");
        if guard.contains_key(&record.booking.booking_id) {
            return Err(RepositoryError::Conflict);
        }
        guard.insert(record.booking.booking_id.clone(), record.clone());
        Ok(record)
    }

    fn update(&self, record: BookingRecord) -> Result<(), RepositoryError> {
        let mut guard = self.records.lock().expect("repository mutex poisoned");
        if guard.contains_key(&record.booking.booking_id) {
            guard.insert(record.booking.booking_id.clone(), record);
            Ok(())
        } else {
            Err(RepositoryError::NotFound)
        }
    }

    fn fetch(&self, id: &BookingId) -> Result<Option<BookingRecord>, RepositoryError> {
        let guard = self.records.lock().expect("repository mutex poisoned");
        Ok(guard.get(id).cloned())
    }

    fn upcoming(&self, limit: usize) -> Result<Vec<BookingRecord>, RepositoryError> {
        let guard = self.records.lock().expect("repository mutex poisoned");
        let mut records: Vec<BookingRecord> = guard
            .values()
            .filter(|record| {
                matches!(
                    record.status,
                    BookingStatus::Pending | BookingStatus::Confirmed
                )
            })
            .cloned()
            .collect();
        records.sort_by_key(|record| record.booking.rental_start);
        records.truncate(limit);
        Ok(records)
    }
}

#[derive(Default, Clone)]
pub(crate) struct InMemoryRefundDispatcher {
    instructions: Arc<Mutex<Vec<RefundInstruction>>>,
}

impl RefundDispatcher for InMemoryRefundDispatcher {
    fn dispatch(&self, instruction: RefundInstruction) -> Result<(), DispatchError> {
        let mut guard = self.instructions.lock().expect("dispatch mutex poisoned");
        guard.push(instruction);
        Ok(())
    }
}

impl InMemoryRefundDispatcher {
    pub(crate) fn dispatched(&self) -> Vec<RefundInstruction> {
        self.instructions
            .lock()
            .expect("dispatch mutex poisoned")
            .clone()
    }
}

pub(crate) fn default_refund_policy_config() -> RefundPolicyConfig {
    RefundPolicyConfig::default()
}

pub(crate) fn parse_instant(raw: &str) -> Result<DateTime<Utc>, QuoteError> {
    DateTime::parse_from_rfc3339(raw.trim())
        .map(|instant| instant.with_timezone(&Utc))
        .map_err(|source| QuoteError::InvalidStart {
            value: raw.to_string(),
            source,
        })
}
