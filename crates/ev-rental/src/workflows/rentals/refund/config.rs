use serde::{Deserialize, Serialize};

/// One rung of the refund ladder: cancellations at least `min_lead_hours`
/// before the rental start refund `refund_percentage` of the payment.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RefundBand {
    pub min_lead_hours: f64,
    pub refund_percentage: u8,
}

/// Ordered refund ladder, evaluated top-down with the first matching band
/// winning. Lead times below the last band refund nothing.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RefundPolicyConfig {
    bands: Vec<RefundBand>,
}

/// Rejections raised while assembling a refund ladder.
#[derive(Debug, thiserror::Error)]
pub enum PolicyConfigError {
    #[error("refund ladder must contain at least one band")]
    Empty,
    #[error("band thresholds must be finite and strictly descending (band {0})")]
    ThresholdOrder(usize),
    #[error("band percentages must be at most 100 and non-increasing (band {0})")]
    PercentageOrder(usize),
}

impl RefundPolicyConfig {
    /// Validates the ladder shape. Descending thresholds paired with
    /// non-increasing percentages are what make the refund monotone in lead
    /// time, so both are enforced structurally rather than re-checked at
    /// quote time.
    pub fn new(bands: Vec<RefundBand>) -> Result<Self, PolicyConfigError> {
        if bands.is_empty() {
            return Err(PolicyConfigError::Empty);
        }

        for (index, band) in bands.iter().enumerate() {
            if !band.min_lead_hours.is_finite() {
                return Err(PolicyConfigError::ThresholdOrder(index));
            }
            if band.refund_percentage > 100 {
                return Err(PolicyConfigError::PercentageOrder(index));
            }
            if index > 0 {
                let previous = &bands[index - 1];
                if band.min_lead_hours >= previous.min_lead_hours {
                    return Err(PolicyConfigError::ThresholdOrder(index));
                }
                if band.refund_percentage > previous.refund_percentage {
                    return Err(PolicyConfigError::PercentageOrder(index));
                }
            }
        }

        Ok(Self { bands })
    }

    /// First band whose threshold the lead time reaches, 0% past the ladder.
    /// Bands are left-closed: landing exactly on a threshold takes the
    /// higher band.
    pub fn percentage_for(&self, hours_until_start: f64) -> u8 {
        self.bands
            .iter()
            .find(|band| hours_until_start >= band.min_lead_hours)
            .map(|band| band.refund_percentage)
            .unwrap_or(0)
    }

    pub fn bands(&self) -> &[RefundBand] {
        &self.bands
    }
}

impl Default for RefundPolicyConfig {
    /// Standard ladder: 90% a day or more out, then 70%, 50%, and 30% at
    /// twelve, six, and two hours, and nothing inside the final two hours.
    fn default() -> Self {
        Self {
            bands: vec![
                RefundBand {
                    min_lead_hours: 24.0,
                    refund_percentage: 90,
                },
                RefundBand {
                    min_lead_hours: 12.0,
                    refund_percentage: 70,
                },
                RefundBand {
                    min_lead_hours: 6.0,
                    refund_percentage: 50,
                },
                RefundBand {
                    min_lead_hours: 2.0,
                    refund_percentage: 30,
                },
            ],
        }
    }
}
