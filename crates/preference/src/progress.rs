//! Learning progress: how much feedback the profile is built on.

/// Feedback count at which progress reaches 100 %.
pub const DEFAULT_PROGRESS_SATURATION: u32 = 10;

/// `min(feedback_count / saturation, 1) * 100`. Non-decreasing in `feedback_count`.
/// A zero saturation is treated as one.
pub fn learning_progress(feedback_count: u64, saturation: u32) -> f64 {
    let saturation = f64::from(saturation.max(1));
    (feedback_count as f64 / saturation).min(1.0) * 100.0
}
