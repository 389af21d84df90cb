//! Playback timing from granule positions.

use crate::error::ConfigError;

/// Converts the granule delta between two pages into milliseconds.
///
/// Granule positions count samples at `sample_rate`. A zero rate, a
/// position that moves backwards, or a result that does not fit in `u64`
/// is an error, never a wrapped value.
pub fn sample_duration(previous: u64, current: u64, sample_rate: u32) -> Result<u64, ConfigError> {
    if sample_rate == 0 {
        return Err(ConfigError::ZeroSampleRate);
    }
    let Some(delta) = current.checked_sub(previous) else {
        return Err(ConfigError::GranuleRegression { previous, current });
    };
    let ms = delta as u128 * 1000 / sample_rate as u128;
    u64::try_from(ms).map_err(|_| ConfigError::DurationOverflow { delta, sample_rate })
}

/// Tracks the granule position of consecutive pages.
#[derive(Debug, Default)]
pub struct TimingTracker {
    previous: u64,
    current_samples: u64,
    last: Option<Result<u64, ConfigError>>,
}

impl TimingTracker {
    /// Creates a tracker starting at granule position 0.
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a page's granule position and returns that page's duration.
    ///
    /// The delta is computed against the previous position before the
    /// previous position is replaced, even when the computation fails.
    pub fn observe(&mut self, granule: u64, sample_rate: u32) -> Result<u64, ConfigError> {
        let result = sample_duration(self.previous, granule, sample_rate);
        self.current_samples = granule.saturating_sub(self.previous);
        self.previous = granule;
        self.last = Some(result.clone());
        result
    }

    /// Records a page on which no packet ends. Its position is not a timestamp.
    pub fn observe_unknown(&mut self) {
        self.current_samples = 0;
        self.last = None;
    }

    /// Granule delta of the last observed page.
    pub fn current_samples(&self) -> u64 {
        self.current_samples
    }

    /// Outcome of the last computation, `None` if the last page had no position.
    pub fn last(&self) -> Option<&Result<u64, ConfigError>> {
        self.last.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sample_duration() {
        assert_eq!(sample_duration(0, 48000, 48000), Ok(1000));
        assert_eq!(sample_duration(960, 1920, 48000), Ok(20));
        assert_eq!(sample_duration(0, 441, 44100), Ok(10));
        assert_eq!(sample_duration(100, 100, 48000), Ok(0));
    }

    #[test]
    fn test_sample_duration_zero_rate() {
        assert_eq!(sample_duration(0, 960, 0), Err(ConfigError::ZeroSampleRate));
    }

    #[test]
    fn test_sample_duration_regression() {
        assert_eq!(
            sample_duration(1920, 960, 48000),
            Err(ConfigError::GranuleRegression {
                previous: 1920,
                current: 960
            })
        );
    }

    #[test]
    fn test_sample_duration_monotonic() {
        let rates = [8000u32, 16000, 44100, 48000];
        for rate in rates {
            let mut last = 0;
            for current in (0..200_000u64).step_by(997) {
                let ms = sample_duration(0, current, rate).unwrap();
                assert!(ms >= last);
                last = ms;
            }
        }
    }

    #[test]
    fn test_sample_duration_large_values() {
        let ms = sample_duration(0, u64::MAX - 1, 48000).unwrap();
        assert_eq!(ms, ((u64::MAX - 1) as u128 * 1000 / 48000) as u64);
    }

    #[test]
    fn test_sample_duration_overflow() {
        assert_eq!(
            sample_duration(0, u64::MAX - 1, 1),
            Err(ConfigError::DurationOverflow {
                delta: u64::MAX - 1,
                sample_rate: 1
            })
        );
        // Largest delta that still fits at 1 Hz.
        let max = u64::MAX / 1000;
        assert_eq!(sample_duration(0, max, 1), Ok(max * 1000));
        assert!(sample_duration(0, max + 1, 1).is_err());
    }

    #[test]
    fn test_tracker_observe() {
        let mut t = TimingTracker::new();
        assert_eq!(t.observe(960, 48000), Ok(20));
        assert_eq!(t.current_samples(), 960);
        assert_eq!(t.observe(2880, 48000), Ok(40));
        assert_eq!(t.last(), Some(&Ok(40)));
    }

    #[test]
    fn test_tracker_regression_still_advances() {
        let mut t = TimingTracker::new();
        t.observe(4800, 48000).unwrap();
        assert!(t.observe(960, 48000).is_err());
        assert_eq!(t.current_samples(), 0);
        assert_eq!(t.observe(1920, 48000), Ok(20));
    }

    #[test]
    fn test_tracker_unknown_keeps_previous() {
        let mut t = TimingTracker::new();
        t.observe(960, 48000).unwrap();
        t.observe_unknown();
        assert_eq!(t.current_samples(), 0);
        assert_eq!(t.last(), None);
        assert_eq!(t.observe(2880, 48000), Ok(40));
    }
}
