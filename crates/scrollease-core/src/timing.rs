//! L4 Atomic Layer: Time calculation utilities for scroll animations
//!
//! Pure functions over frame-clock timestamps (milliseconds as f64).

/// Calculate animation progress from elapsed time and duration
///
/// A non-positive duration reports full progress instead of dividing by
/// zero. The result is not clamped: the driver decides when a run is over.
#[inline]
pub fn progress(elapsed_ms: f64, duration_ms: f64) -> f64 {
    if duration_ms <= 0.0 {
        return 1.0;
    }
    elapsed_ms / duration_ms
}

/// Check if animation is complete
///
/// Strictly greater-than: a frame landing exactly on the duration still
/// interpolates, and the next frame finalizes.
#[inline]
pub fn is_complete(elapsed_ms: f64, duration_ms: f64) -> bool {
    elapsed_ms > duration_ms
}

/// Linear interpolation between two values
///
/// # Arguments
/// * `from` - Start value
/// * `to` - End value
/// * `t` - Interpolation factor, usually [0.0, 1.0]
#[inline]
pub fn lerp(from: f64, to: f64, t: f64) -> f64 {
    from + (to - from) * t
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lerp() {
        assert!((lerp(0.0, 100.0, 0.0) - 0.0).abs() < 0.001);
        assert!((lerp(0.0, 100.0, 0.5) - 50.0).abs() < 0.001);
        assert!((lerp(0.0, 100.0, 1.0) - 100.0).abs() < 0.001);
        assert!((lerp(100.0, 0.0, 0.25) - 75.0).abs() < 0.001);
    }

    #[test]
    fn test_progress_zero_duration() {
        assert_eq!(progress(0.0, 0.0), 1.0);
        assert_eq!(progress(5.0, -10.0), 1.0);
    }

    #[test]
    fn test_progress_is_unclamped() {
        assert_eq!(progress(150.0, 300.0), 0.5);
        assert_eq!(progress(450.0, 300.0), 1.5);
    }

    #[test]
    fn test_is_complete_is_strict() {
        assert!(!is_complete(300.0, 300.0));
        assert!(is_complete(300.5, 300.0));
        assert!(!is_complete(0.0, 0.0));
        assert!(is_complete(0.0, -1.0));
    }
}
