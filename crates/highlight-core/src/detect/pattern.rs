//! Pattern detectors combining several normalized feature series
//!
//! Each detector builds a per-frame composite score, then reports one event
//! per contiguous span where the score stays above a threshold.

use super::hysteresis::spans_above;
use super::EventDetector;
use crate::config::{ApplauseConfig, CheeringConfig, LaughterConfig};
use crate::event::{Event, EventKind};
use crate::features::FeatureSeries;
use crate::signal::{diff, mean, moving_average, normalize, std_dev};

#[cfg(test)]
mod tests;

// Laughter score weights: band energy, energy variation, zero-crossing rate
const LAUGH_ENERGY_WEIGHT: f64 = 0.3;
const LAUGH_VARIATION_WEIGHT: f64 = 0.4;
const LAUGH_ZCR_WEIGHT: f64 = 0.3;

/// `mean + k * std`, or `None` when the score is empty
fn adaptive_threshold(score: &[f64], k: f64) -> Option<f64> {
    Some(mean(score)? + k * std_dev(score)?)
}

/// Element-wise product of two normalized series, cut to the shorter one
fn normalized_product(a: &[f64], b: &[f64]) -> Vec<f64> {
    normalize(a)
        .into_iter()
        .zip(normalize(b))
        .map(|(x, y)| x * y)
        .collect()
}

/// Bursty energy in the 300-800 Hz band with a high zero-crossing rate
pub struct LaughterDetector {
    confidence_threshold: f64,
    band_low_hz: f64,
    band_high_hz: f64,
    smoothing_frames: usize,
    min_frames: usize,
}

impl LaughterDetector {
    pub fn new(config: &LaughterConfig) -> Self {
        Self {
            confidence_threshold: config.confidence_threshold,
            band_low_hz: config.band_low_hz,
            band_high_hz: config.band_high_hz,
            smoothing_frames: config.smoothing_frames,
            min_frames: config.min_frames,
        }
    }

    /// Mean STFT magnitude across the bins inside the band, per frame
    fn band_energy(&self, features: &FeatureSeries) -> Vec<f64> {
        let rows: Vec<&[f64]> = features
            .frequency_bins
            .iter()
            .zip(&features.stft_magnitude)
            .filter(|(hz, _)| **hz >= self.band_low_hz && **hz <= self.band_high_hz)
            .map(|(_, row)| row.as_slice())
            .collect();

        let Some(frames) = rows.iter().map(|r| r.len()).min() else {
            return Vec::new();
        };
        (0..frames)
            .map(|t| rows.iter().map(|r| r[t]).sum::<f64>() / rows.len() as f64)
            .collect()
    }

    /// Composite laughter likelihood per frame, in [0, 1]
    pub fn score(&self, features: &FeatureSeries) -> Vec<f64> {
        let energy = self.band_energy(features);
        if energy.is_empty() {
            return Vec::new();
        }
        let abs_diff: Vec<f64> = diff(&energy).iter().map(|d| d.abs()).collect();
        let variation = moving_average(&abs_diff, self.smoothing_frames);

        let energy_norm = normalize(&energy);
        let variation_norm = normalize(&variation);
        let zcr_norm = normalize(&features.zero_crossing_rate);

        energy_norm
            .iter()
            .zip(&variation_norm)
            .zip(&zcr_norm)
            .map(|((e, v), z)| {
                LAUGH_ENERGY_WEIGHT * e + LAUGH_VARIATION_WEIGHT * v + LAUGH_ZCR_WEIGHT * z
            })
            .collect()
    }
}

impl EventDetector for LaughterDetector {
    fn kind(&self) -> EventKind {
        EventKind::Laughter
    }

    fn detect(&self, features: &FeatureSeries) -> Vec<Event> {
        let score = self.score(features);
        let mut events = Vec::new();
        for span in spans_above(&score, self.confidence_threshold) {
            if span.len() <= self.min_frames {
                continue;
            }
            let confidence = mean(span.slice(&score)).unwrap_or(0.0);
            events.push(
                Event::new(
                    features.time_of(span.start),
                    EventKind::Laughter,
                    "laughter",
                )
                .with_confidence(confidence)
                .with_duration(features.seconds_for(span.len())),
            );
        }
        events
    }
}

/// Broadband noise: high zero-crossing rate and high spectral flatness
pub struct ApplauseDetector {
    min_duration_s: f64,
    smoothing_s: f64,
    std_multiplier: f64,
}

impl ApplauseDetector {
    pub fn new(config: &ApplauseConfig) -> Self {
        Self {
            min_duration_s: config.min_duration_s,
            smoothing_s: config.smoothing_s,
            std_multiplier: config.std_multiplier,
        }
    }

    /// Smoothed applause score per frame
    pub fn score(&self, features: &FeatureSeries) -> Vec<f64> {
        let raw = normalized_product(&features.zero_crossing_rate, &features.spectral_flatness);
        let window = features.frames_for(self.smoothing_s).max(1);
        moving_average(&raw, window)
    }
}

impl EventDetector for ApplauseDetector {
    fn kind(&self) -> EventKind {
        EventKind::Applause
    }

    fn detect(&self, features: &FeatureSeries) -> Vec<Event> {
        let score = self.score(features);
        let Some(threshold) = adaptive_threshold(&score, self.std_multiplier) else {
            return Vec::new();
        };

        let mut events = Vec::new();
        for span in spans_above(&score, threshold) {
            let duration = features.seconds_for(span.len());
            if duration < self.min_duration_s {
                continue;
            }
            let intensity = mean(span.slice(&score)).unwrap_or(0.0);
            events.push(
                Event::new(
                    features.time_of(span.start),
                    EventKind::Applause,
                    format!("applause ({:.1}s)", duration),
                )
                .with_intensity(intensity)
                .with_duration(duration),
            );
        }
        events
    }
}

/// Bright and loud at the same time
pub struct CheeringDetector {
    min_duration_s: f64,
    std_multiplier: f64,
}

impl CheeringDetector {
    pub fn new(config: &CheeringConfig) -> Self {
        Self {
            min_duration_s: config.min_duration_s,
            std_multiplier: config.std_multiplier,
        }
    }

    pub fn score(&self, features: &FeatureSeries) -> Vec<f64> {
        normalized_product(&features.spectral_centroid, &features.rms)
    }
}

impl EventDetector for CheeringDetector {
    fn kind(&self) -> EventKind {
        EventKind::Cheering
    }

    fn detect(&self, features: &FeatureSeries) -> Vec<Event> {
        let score = self.score(features);
        let Some(threshold) = adaptive_threshold(&score, self.std_multiplier) else {
            return Vec::new();
        };

        let mut events = Vec::new();
        for span in spans_above(&score, threshold) {
            let duration = features.seconds_for(span.len());
            if duration < self.min_duration_s {
                continue;
            }
            let intensity = mean(span.slice(&score)).unwrap_or(0.0);
            events.push(
                Event::new(
                    features.time_of(span.start),
                    EventKind::Cheering,
                    format!("cheering ({:.1}s)", duration),
                )
                .with_intensity(intensity)
                .with_duration(duration),
            );
        }
        events
    }
}
