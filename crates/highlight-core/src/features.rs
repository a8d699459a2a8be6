//! Per-recording audio feature series
//!
//! Produced by an external analyzer; the engine only reads it.

use crate::error::{HighlightError, Result};
use serde::{Deserialize, Serialize};

/// Frame-aligned feature arrays for one recording
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FeatureSeries {
    /// Recording duration in seconds
    pub duration: f64,
    /// Sample rate of the analyzed audio (Hz)
    pub sample_rate: u32,
    /// Analysis hop length in samples
    pub hop_length: u32,

    /// Frame timestamps in seconds, strictly increasing
    pub times: Vec<f64>,
    /// RMS energy per frame
    pub rms: Vec<f64>,
    #[serde(default)]
    pub spectral_centroid: Vec<f64>,
    #[serde(default)]
    pub zero_crossing_rate: Vec<f64>,
    #[serde(default)]
    pub spectral_flatness: Vec<f64>,

    /// Short-time magnitude spectrum [frequency_bin][frame]
    #[serde(default)]
    pub stft_magnitude: Vec<Vec<f64>>,
    /// Center frequency of each STFT bin (Hz)
    #[serde(default)]
    pub frequency_bins: Vec<f64>,

    // Informational only
    #[serde(default)]
    pub tempo: f64,
    #[serde(default)]
    pub beat_frames: Vec<usize>,
}

impl FeatureSeries {
    /// Number of frames on the time axis
    pub fn num_frames(&self) -> usize {
        self.times.len()
    }

    pub fn is_empty(&self) -> bool {
        self.times.is_empty()
    }

    /// Convert a duration in seconds into a frame count (truncating)
    pub fn frames_for(&self, seconds: f64) -> usize {
        if self.hop_length == 0 {
            return 0;
        }
        (seconds * self.sample_rate as f64 / self.hop_length as f64) as usize
    }

    /// Convert a frame count into seconds
    pub fn seconds_for(&self, frames: usize) -> f64 {
        if self.sample_rate == 0 {
            return 0.0;
        }
        frames as f64 * self.hop_length as f64 / self.sample_rate as f64
    }

    /// Timestamp of frame `index`, clamped to the last frame.
    ///
    /// Derived series are cut to the shortest input, so their frame `i` is
    /// still frame `i` of the time axis.
    pub fn time_of(&self, index: usize) -> f64 {
        match self.times.len() {
            0 => 0.0,
            n => self.times[index.min(n - 1)],
        }
    }

    /// Check the input contract expected by the engine.
    ///
    /// Length mismatches between per-frame series are tolerated (detectors
    /// truncate), but frame/time conversion constants and the time axis
    /// itself must be usable.
    pub fn validate(&self) -> Result<()> {
        if self.sample_rate == 0 {
            return Err(HighlightError::invalid_input("sample_rate", "must be > 0"));
        }
        if self.hop_length == 0 {
            return Err(HighlightError::invalid_input("hop_length", "must be > 0"));
        }
        if !self.duration.is_finite() || self.duration < 0.0 {
            return Err(HighlightError::invalid_input(
                "duration",
                format!("must be a finite, non-negative number (got {})", self.duration),
            ));
        }
        if let Some(i) = self.times.iter().position(|t| !t.is_finite()) {
            return Err(HighlightError::invalid_input(
                "times",
                format!("non-finite timestamp at frame {}", i),
            ));
        }
        if let Some(i) = self.times.windows(2).position(|w| w[1] <= w[0]) {
            return Err(HighlightError::invalid_input(
                "times",
                format!("not strictly increasing at frame {}", i + 1),
            ));
        }
        Ok(())
    }
}
