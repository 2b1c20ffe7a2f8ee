//! Time helpers

/// Seconds in a chrono duration, or `None` if the duration is too long to count in nanoseconds.
pub fn duration_to_seconds(duration: chrono::Duration) -> Option<f64> {
    duration.num_nanoseconds().map(|ns| ns as f64 * 1e-9)
}
