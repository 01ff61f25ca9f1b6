mod config;
mod quote;

pub use config::{PolicyConfigError, RefundBand, RefundPolicyConfig};
pub use quote::RefundQuote;

use chrono::{DateTime, Utc};

/// Stateless engine applying the configured refund ladder to a booking.
pub struct RefundPolicy {
    config: RefundPolicyConfig,
}

impl RefundPolicy {
    pub fn new(config: RefundPolicyConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &RefundPolicyConfig {
        &self.config
    }

    /// Quote the refund owed if a booking paying `total_payment` for a
    /// rental starting at `rental_start` were cancelled at `now`.
    ///
    /// The evaluation instant is an explicit input: the service layer passes
    /// wall-clock time, tests and read-back endpoints pin a fixed instant.
    /// Identical inputs always produce identical quotes.
    pub fn quote(
        &self,
        rental_start: DateTime<Utc>,
        total_payment: i64,
        now: DateTime<Utc>,
    ) -> Result<RefundQuote, QuoteError> {
        if total_payment < 0 {
            return Err(QuoteError::NegativePayment(total_payment));
        }
        let paid = total_payment as u64;

        // Millisecond resolution so fractional hours resolve band
        // boundaries: 23h59m falls below the 24-hour threshold.
        let lead = rental_start.signed_duration_since(now);
        let hours_until_start = lead.num_milliseconds() as f64 / 3_600_000.0;

        let refund_percentage = self.config.percentage_for(hours_until_start);
        // Truncating division keeps the refund within the payment; the fee
        // is the complement, so the two always add back up to `paid`.
        let refund_amount = (u128::from(paid) * u128::from(refund_percentage) / 100) as u64;
        let fee_amount = paid - refund_amount;

        Ok(RefundQuote {
            hours_until_start,
            refund_percentage,
            refund_amount,
            fee_amount,
        })
    }

    /// Variant taking the rental start as an RFC 3339 string, for callers
    /// holding unparsed input (CLI flags, ad-hoc quote requests).
    pub fn quote_raw(
        &self,
        rental_start: &str,
        total_payment: i64,
        now: DateTime<Utc>,
    ) -> Result<RefundQuote, QuoteError> {
        let start = DateTime::parse_from_rfc3339(rental_start.trim())
            .map_err(|source| QuoteError::InvalidStart {
                value: rental_start.to_string(),
                source,
            })?
            .with_timezone(&Utc);
        self.quote(start, total_payment, now)
    }
}

impl Default for RefundPolicy {
    fn default() -> Self {
        Self::new(RefundPolicyConfig::default())
    }
}

/// Input validation failures for refund quoting. These are precondition
/// violations on the caller's side; there is nothing to retry.
#[derive(Debug, thiserror::Error)]
pub enum QuoteError {
    #[error("total payment must be non-negative, got {0}")]
    NegativePayment(i64),
    #[error("invalid rental start '{value}': {source}")]
    InvalidStart {
        value: String,
        source: chrono::format::ParseError,
    },
}
