//! Sliding-window accumulator for the transcription direction.
//!
//! Accumulates normalized samples from arbitrarily sized wire frames and
//! emits fixed-duration inference windows. Consecutive windows share a
//! configurable overlap for word continuity at the boundary.

use crate::defaults;
use crate::error::{Result, VostreamError};
use std::collections::VecDeque;

/// Configuration for the sliding window.
#[derive(Debug, Clone, Copy)]
pub struct WindowConfig {
    /// Sample rate for duration calculations.
    pub sample_rate: u32,
    /// Window duration in seconds.
    pub window_secs: f64,
    /// Overlap duration in seconds, retained as context for the next window.
    pub overlap_secs: f64,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            sample_rate: defaults::SAMPLE_RATE,
            window_secs: defaults::WINDOW_SECS,
            overlap_secs: defaults::OVERLAP_SECS,
        }
    }
}

/// Per-connection accumulator that turns an unbounded sample stream into
/// bounded inference windows.
///
/// Owned by exactly one connection handler; never shared.
pub struct StreamBuffer {
    accumulated: VecDeque<f32>,
    window_samples: usize,
    overlap_samples: usize,
}

impl StreamBuffer {
    /// Creates a buffer with default window parameters.
    pub fn new() -> Self {
        // Defaults always satisfy the overlap < window invariant
        #[allow(clippy::expect_used)]
        Self::with_config(WindowConfig::default()).expect("default window config is valid")
    }

    /// Creates a buffer with custom window parameters.
    ///
    /// Requires `0 <= overlap_secs < window_secs` and a window of at least
    /// one sample.
    pub fn with_config(config: WindowConfig) -> Result<Self> {
        let window_samples = (config.sample_rate as f64 * config.window_secs) as usize;
        let overlap_samples = (config.sample_rate as f64 * config.overlap_secs) as usize;

        if window_samples == 0 {
            return Err(VostreamError::ConfigInvalidValue {
                key: "window_secs".to_string(),
                message: "window must cover at least one sample".to_string(),
            });
        }
        if config.overlap_secs < 0.0 || overlap_samples >= window_samples {
            return Err(VostreamError::ConfigInvalidValue {
                key: "overlap_secs".to_string(),
                message: format!(
                    "overlap ({overlap_samples} samples) must be shorter than the window \
                     ({window_samples} samples)"
                ),
            });
        }

        Ok(Self {
            accumulated: VecDeque::new(),
            window_samples,
            overlap_samples,
        })
    }

    /// Appends samples to the accumulator.
    pub fn push(&mut self, samples: &[f32]) {
        self.accumulated.extend(samples.iter().copied());
    }

    /// Extracts the next full window, if one is buffered.
    ///
    /// The window is the first `window_samples` samples; the buffer keeps
    /// the last `overlap_samples` of it as leading context. Callers loop
    /// until `None`; a single large push can make several windows
    /// extractable.
    pub fn try_extract_window(&mut self) -> Option<Vec<f32>> {
        if self.accumulated.len() < self.window_samples {
            return None;
        }

        let window: Vec<f32> = self
            .accumulated
            .iter()
            .take(self.window_samples)
            .copied()
            .collect();
        self.accumulated
            .drain(..self.window_samples - self.overlap_samples);

        Some(window)
    }

    /// Discards all buffered samples.
    pub fn reset(&mut self) {
        self.accumulated.clear();
    }

    /// Number of samples currently buffered.
    pub fn len(&self) -> usize {
        self.accumulated.len()
    }

    /// Returns true when nothing is buffered.
    pub fn is_empty(&self) -> bool {
        self.accumulated.is_empty()
    }

    /// Samples per extracted window.
    pub fn window_samples(&self) -> usize {
        self.window_samples
    }

    /// Samples retained between consecutive windows.
    pub fn overlap_samples(&self) -> usize {
        self.overlap_samples
    }
}

impl Default for StreamBuffer {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn small_buffer(window: usize, overlap: usize) -> StreamBuffer {
        // sample_rate 1000 keeps the sample math readable
        StreamBuffer::with_config(WindowConfig {
            sample_rate: 1000,
            window_secs: window as f64 / 1000.0,
            overlap_secs: overlap as f64 / 1000.0,
        })
        .unwrap()
    }

    fn ramp(n: usize, start: usize) -> Vec<f32> {
        (start..start + n).map(|i| i as f32).collect()
    }

    #[test]
    fn test_default_parameters() {
        let buffer = StreamBuffer::new();
        assert_eq!(buffer.window_samples(), 40000); // 2.5s at 16kHz
        assert_eq!(buffer.overlap_samples(), 8000); // 0.5s at 16kHz
        assert!(buffer.is_empty());
    }

    #[test]
    fn test_no_window_before_threshold() {
        let mut buffer = small_buffer(100, 20);
        buffer.push(&ramp(99, 0));
        assert!(buffer.try_extract_window().is_none());
        assert_eq!(buffer.len(), 99);
    }

    #[test]
    fn test_window_at_exact_threshold() {
        let mut buffer = small_buffer(100, 20);
        buffer.push(&ramp(100, 0));

        let window = buffer.try_extract_window().unwrap();
        assert_eq!(window.len(), 100);
        assert_eq!(window[0], 0.0);
        assert_eq!(window[99], 99.0);
        // Retained tail is the last overlap_samples of the window
        assert_eq!(buffer.len(), 20);
        assert!(buffer.try_extract_window().is_none());
    }

    #[test]
    fn test_overlap_content_carries_into_next_window() {
        let mut buffer = small_buffer(100, 20);
        // 179 samples: one window out, 99 left, one short of the next.
        buffer.push(&ramp(179, 0));

        let first = buffer.try_extract_window().unwrap();
        assert_eq!(first[99], 99.0);
        assert!(buffer.try_extract_window().is_none());

        buffer.push(&ramp(1, 179));
        let second = buffer.try_extract_window().unwrap();
        // Second window starts at the overlap: sample 80
        assert_eq!(second[0], 80.0);
        assert_eq!(second[19], 99.0);
        assert_eq!(second[20], 100.0);
        assert_eq!(second[99], 179.0);
    }

    #[test]
    fn test_zero_overlap_drains_fully() {
        let mut buffer = small_buffer(100, 0);
        buffer.push(&ramp(100, 0));

        assert!(buffer.try_extract_window().is_some());
        assert!(buffer.is_empty());
    }

    #[test]
    fn test_multiple_windows_from_single_push() {
        let mut buffer = small_buffer(100, 20);
        // 100 + 2*(100-20) = 260 samples → exactly 3 windows
        buffer.push(&ramp(260, 0));

        let mut count = 0;
        while buffer.try_extract_window().is_some() {
            count += 1;
        }
        assert_eq!(count, 3);
        assert_eq!(buffer.len(), 20);
    }

    #[test]
    fn test_window_count_formula() {
        // floor((total - window) / (window - overlap)) + 1 windows extractable
        for (total, window, overlap) in [(500, 100, 20), (500, 100, 0), (130, 100, 50), (99, 100, 0)]
        {
            let mut buffer = small_buffer(window, overlap);
            buffer.push(&ramp(total, 0));

            let mut count = 0usize;
            while buffer.try_extract_window().is_some() {
                count += 1;
            }

            let expected = if total < window {
                0
            } else {
                (total - window) / (window - overlap) + 1
            };
            assert_eq!(
                count, expected,
                "total={total} window={window} overlap={overlap}"
            );
        }
    }

    #[test]
    fn test_reset_discards_everything() {
        let mut buffer = small_buffer(100, 20);
        buffer.push(&ramp(90, 0));
        buffer.reset();
        assert!(buffer.is_empty());

        // Samples pushed before the reset never reach the next window
        buffer.push(&ramp(100, 1000));
        let window = buffer.try_extract_window().unwrap();
        assert_eq!(window[0], 1000.0);
    }

    #[test]
    fn test_invalid_overlap_rejected() {
        let result = StreamBuffer::with_config(WindowConfig {
            sample_rate: 1000,
            window_secs: 0.1,
            overlap_secs: 0.1,
        });
        assert!(matches!(
            result,
            Err(VostreamError::ConfigInvalidValue { .. })
        ));

        let result = StreamBuffer::with_config(WindowConfig {
            sample_rate: 1000,
            window_secs: 0.1,
            overlap_secs: 0.2,
        });
        assert!(result.is_err());
    }

    #[test]
    fn test_zero_window_rejected() {
        let result = StreamBuffer::with_config(WindowConfig {
            sample_rate: 1000,
            window_secs: 0.0,
            overlap_secs: 0.0,
        });
        assert!(result.is_err());
    }
}
