//! Human-facing booking codes printed on pickup confirmations.

/// Builds the booking code from its identifying parts, e.g.
/// `HAN01-EBIKE-000042`. Station and vehicle segments are uppercased with
/// non-alphanumerics stripped; the sequence is zero-padded to six digits.
/// The encoding is deterministic: the same inputs always yield the same
/// code.
pub fn booking_code(station_code: &str, vehicle_code: &str, sequence: u64) -> String {
    format!(
        "{}-{}-{sequence:06}",
        segment(station_code),
        segment(vehicle_code)
    )
}

/// `X` stands in for a segment that sanitizes to nothing so the code shape
/// stays parseable.
fn segment(raw: &str) -> String {
    let cleaned: String = raw
        .chars()
        .filter(char::is_ascii_alphanumeric)
        .map(|c| c.to_ascii_uppercase())
        .collect();

    if cleaned.is_empty() {
        "X".to_string()
    } else {
        cleaned
    }
}
