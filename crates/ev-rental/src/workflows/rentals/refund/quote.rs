use serde::{Deserialize, Serialize};

/// Refund decision computed for one booking at one evaluation instant.
///
/// A quote is a transient read-model: it is recomputed every time the
/// cancellation surface asks for it and is only persisted as part of a
/// completed `CancellationOutcome`. `refund_amount + fee_amount` always
/// equals the payment the quote was computed from, because the fee is
/// derived as the complement rather than computed independently.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RefundQuote {
    /// Lead time in real-valued hours; negative once the rental has started.
    pub hours_until_start: f64,
    pub refund_percentage: u8,
    pub refund_amount: u64,
    pub fee_amount: u64,
}

impl RefundQuote {
    /// The payment amount this quote conserves.
    pub fn total_payment(&self) -> u64 {
        self.refund_amount + self.fee_amount
    }
}
