//! Volume-driven detectors working on the RMS envelope alone

use super::hysteresis::spans_above;
use super::EventDetector;
use crate::config::{SurpriseConfig, SustainedConfig, VolumePeakConfig};
use crate::event::{Event, EventKind};
use crate::features::FeatureSeries;
use crate::signal::{mean, std_dev};

/// RMS and times cut to their common length
fn aligned_rms(features: &FeatureSeries) -> (&[f64], &[f64]) {
    let n = features.rms.len().min(features.times.len());
    (&features.rms[..n], &features.times[..n])
}

/// Local maxima of `rms` above `mean + k * std`, spaced apart in time
pub struct VolumePeakDetector {
    threshold_multiplier: f64,
    min_distance_s: f64,
}

impl VolumePeakDetector {
    pub fn new(config: &VolumePeakConfig) -> Self {
        Self {
            threshold_multiplier: config.threshold_multiplier,
            min_distance_s: config.min_distance_s,
        }
    }

    fn describe(intensity: f64) -> &'static str {
        if intensity > 3.0 {
            "very large spike"
        } else if intensity > 2.0 {
            "large spike"
        } else if intensity > 1.5 {
            "surge"
        } else {
            "mild rise"
        }
    }
}

impl EventDetector for VolumePeakDetector {
    fn kind(&self) -> EventKind {
        EventKind::VolumePeak
    }

    fn detect(&self, features: &FeatureSeries) -> Vec<Event> {
        let (rms, times) = aligned_rms(features);
        let (Some(mu), Some(sigma)) = (mean(rms), std_dev(rms)) else {
            return Vec::new();
        };
        if !(sigma > 0.0) {
            return Vec::new();
        }

        let threshold = mu + self.threshold_multiplier * sigma;
        let candidates: Vec<usize> = local_maxima(rms)
            .into_iter()
            .filter(|&i| rms[i] > threshold)
            .collect();
        let distance = features.frames_for(self.min_distance_s).max(1);
        let peaks = select_by_distance(&candidates, rms, distance);

        log::debug!(
            "volume peaks: threshold {:.4}, {} candidates, {} kept (distance {} frames)",
            threshold,
            candidates.len(),
            peaks.len(),
            distance
        );

        peaks
            .into_iter()
            .map(|i| {
                let intensity = (rms[i] - mu) / sigma;
                Event::new(times[i], EventKind::VolumePeak, Self::describe(intensity))
                    .with_intensity(intensity)
            })
            .collect()
    }
}

/// Indices of strict local maxima; a flat top reports its middle frame.
/// The first and last frames are never peaks.
fn local_maxima(x: &[f64]) -> Vec<usize> {
    let mut peaks = Vec::new();
    if x.len() < 3 {
        return peaks;
    }
    let last = x.len() - 1;
    let mut i = 1;
    while i < last {
        if x[i - 1] < x[i] {
            let mut ahead = i + 1;
            while ahead < last && x[ahead] == x[i] {
                ahead += 1;
            }
            if x[ahead] < x[i] {
                peaks.push((i + ahead - 1) / 2);
                i = ahead;
            }
        }
        i += 1;
    }
    peaks
}

/// Greedy suppression: keep the highest peak, drop any peak closer than
/// `distance` frames to an already kept one. Result stays in index order.
fn select_by_distance(peaks: &[usize], x: &[f64], distance: usize) -> Vec<usize> {
    let mut order: Vec<usize> = (0..peaks.len()).collect();
    order.sort_by(|&a, &b| x[peaks[a]].total_cmp(&x[peaks[b]]));

    let mut keep = vec![true; peaks.len()];
    for &j in order.iter().rev() {
        if !keep[j] {
            continue;
        }
        let mut k = j;
        while k > 0 && peaks[j] - peaks[k - 1] < distance {
            keep[k - 1] = false;
            k -= 1;
        }
        let mut k = j + 1;
        while k < peaks.len() && peaks[k] - peaks[j] < distance {
            keep[k] = false;
            k += 1;
        }
    }

    peaks
        .iter()
        .zip(keep)
        .filter_map(|(&p, kept)| kept.then_some(p))
        .collect()
}

/// Silence followed immediately by a loud frame
pub struct SurpriseDetector {
    silence_threshold: f64,
    loud_threshold: f64,
    max_gap_s: f64,
}

impl SurpriseDetector {
    pub fn new(config: &SurpriseConfig) -> Self {
        Self {
            silence_threshold: config.silence_threshold,
            loud_threshold: config.loud_threshold,
            max_gap_s: config.max_gap_s,
        }
    }

    /// Frames at the silence threshold itself count as silent
    fn is_silent(&self, value: f64) -> bool {
        value <= self.silence_threshold
    }
}

impl EventDetector for SurpriseDetector {
    fn kind(&self) -> EventKind {
        EventKind::Surprise
    }

    fn detect(&self, features: &FeatureSeries) -> Vec<Event> {
        let (rms, times) = aligned_rms(features);
        let gap_frames = features.frames_for(self.max_gap_s).max(1);

        (1..rms.len())
            .filter(|&i| self.is_silent(rms[i - 1]) && rms[i] > self.loud_threshold)
            .filter(|&i| {
                let lookback = i.min(gap_frames);
                mean(&rms[i - lookback..i])
                    .map(|m| m < 2.0 * self.silence_threshold)
                    .unwrap_or(false)
            })
            .map(|i| {
                Event::new(times[i], EventKind::Surprise, "sudden jump from silence")
                    .with_intensity(rms[i] / self.silence_threshold)
            })
            .collect()
    }
}

/// Long runs of above-average loudness
pub struct SustainedVolumeDetector {
    threshold_multiplier: f64,
    min_duration_s: f64,
}

impl SustainedVolumeDetector {
    pub fn new(config: &SustainedConfig) -> Self {
        Self {
            threshold_multiplier: config.threshold_multiplier,
            min_duration_s: config.min_duration_s,
        }
    }
}

impl EventDetector for SustainedVolumeDetector {
    fn kind(&self) -> EventKind {
        EventKind::SustainedHighVolume
    }

    fn detect(&self, features: &FeatureSeries) -> Vec<Event> {
        let (rms, times) = aligned_rms(features);
        let Some(mu) = mean(rms) else {
            return Vec::new();
        };
        if !(mu > 0.0) {
            return Vec::new();
        }

        let threshold = mu * self.threshold_multiplier;
        let mut events = Vec::new();
        for span in spans_above(rms, threshold) {
            // A run reaching the last frame ends at that frame's timestamp
            let end_time = times[span.end.min(times.len() - 1)];
            let duration = end_time - times[span.start];
            if duration < self.min_duration_s {
                continue;
            }
            let intensity = mean(span.slice(rms)).unwrap_or(0.0) / mu;
            events.push(
                Event::new(
                    times[span.start],
                    EventKind::SustainedHighVolume,
                    format!("sustained excitement ({:.1}s)", duration),
                )
                .with_intensity(intensity)
                .with_duration(duration),
            );
        }
        events
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::HighlightKind;
    use approx::assert_abs_diff_eq;

    /// 10 frames per second keeps the arithmetic readable
    fn features_from_rms(rms: Vec<f64>) -> FeatureSeries {
        FeatureSeries {
            duration: rms.len() as f64 / 10.0,
            sample_rate: 1000,
            hop_length: 100,
            times: (0..rms.len()).map(|i| i as f64 / 10.0).collect(),
            rms,
            ..Default::default()
        }
    }

    #[test]
    fn test_constant_rms_yields_nothing() {
        let fs = features_from_rms(vec![0.05; 20]);
        assert!(VolumePeakDetector::new(&Default::default()).detect(&fs).is_empty());
        assert!(SurpriseDetector::new(&Default::default()).detect(&fs).is_empty());
        assert!(SustainedVolumeDetector::new(&Default::default()).detect(&fs).is_empty());
    }

    #[test]
    fn test_empty_input() {
        let fs = features_from_rms(vec![]);
        assert!(VolumePeakDetector::new(&Default::default()).detect(&fs).is_empty());
        assert!(SurpriseDetector::new(&Default::default()).detect(&fs).is_empty());
        assert!(SustainedVolumeDetector::new(&Default::default()).detect(&fs).is_empty());
    }

    #[test]
    fn test_volume_peaks_respect_distance() {
        let mut rms = vec![0.1; 100];
        rms[10] = 1.0;
        rms[15] = 0.8; // within 2 s of the taller peak
        rms[60] = 0.9;
        let fs = features_from_rms(rms);

        let events = VolumePeakDetector::new(&Default::default()).detect(&fs);
        let times: Vec<f64> = events.iter().map(|e| e.time).collect();
        assert_eq!(times, vec![1.0, 6.0]);
        assert!(events
            .iter()
            .all(|e| e.kind == HighlightKind::Single(EventKind::VolumePeak)));
        assert!(events[0].intensity.unwrap() > 3.0);
        assert_eq!(events[0].description, "very large spike");
    }

    #[test]
    fn test_local_maxima_plateau_and_edges() {
        assert_eq!(local_maxima(&[0.0, 1.0, 1.0, 1.0, 0.0]), vec![2]);
        assert_eq!(local_maxima(&[5.0, 1.0, 2.0, 1.0, 9.0]), vec![2]);
        assert!(local_maxima(&[0.0, 1.0, 1.0]).is_empty());
    }

    #[test]
    fn test_describe_tiers() {
        assert_eq!(VolumePeakDetector::describe(3.5), "very large spike");
        assert_eq!(VolumePeakDetector::describe(2.5), "large spike");
        assert_eq!(VolumePeakDetector::describe(1.7), "surge");
        assert_eq!(VolumePeakDetector::describe(1.5), "mild rise");
    }

    #[test]
    fn test_surprise_single_jump() {
        let mut rms = vec![0.01; 5];
        rms.push(0.3);
        rms.extend(vec![0.01; 5]);
        let fs = features_from_rms(rms);

        let config = SurpriseConfig {
            silence_threshold: 0.01,
            loud_threshold: 0.1,
            ..Default::default()
        };
        let events = SurpriseDetector::new(&config).detect(&fs);
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].time, fs.times[5]);
        assert_abs_diff_eq!(events[0].intensity.unwrap(), 30.0, epsilon = 1e-9);
    }

    #[test]
    fn test_surprise_needs_quiet_lookback() {
        // loud until the frame right before the jump
        let mut rms = vec![0.5; 10];
        rms[9] = 0.001;
        rms.push(0.4);
        let fs = features_from_rms(rms);
        assert!(SurpriseDetector::new(&Default::default()).detect(&fs).is_empty());
    }

    #[test]
    fn test_frame_zero_never_surprise() {
        let fs = features_from_rms(vec![0.5, 0.5, 0.5]);
        assert!(SurpriseDetector::new(&Default::default()).detect(&fs).is_empty());
    }

    #[test]
    fn test_sustained_run() {
        // 3 s quiet, 6 s loud, 3 s quiet, 2 s loud (too short)
        let mut rms = vec![0.1; 30];
        rms.extend(vec![1.0; 60]);
        rms.extend(vec![0.1; 30]);
        rms.extend(vec![1.0; 20]);
        rms.extend(vec![0.1; 10]);
        let fs = features_from_rms(rms);

        let events = SustainedVolumeDetector::new(&Default::default()).detect(&fs);
        assert_eq!(events.len(), 1);
        assert_abs_diff_eq!(events[0].time, 3.0);
        assert_abs_diff_eq!(events[0].duration.unwrap(), 6.0, epsilon = 1e-9);
        let mu = fs.rms.iter().sum::<f64>() / fs.rms.len() as f64;
        assert_abs_diff_eq!(events[0].intensity.unwrap(), 1.0 / mu, epsilon = 1e-9);
    }

    #[test]
    fn test_sustained_run_reaching_end() {
        let mut rms = vec![0.1; 60];
        rms.extend(vec![1.0; 80]);
        let fs = features_from_rms(rms);

        let events = SustainedVolumeDetector::new(&Default::default()).detect(&fs);
        assert_eq!(events.len(), 1);
        assert_abs_diff_eq!(events[0].time, 6.0);
        assert_abs_diff_eq!(events[0].duration.unwrap(), 7.9, epsilon = 1e-9);
    }
}
