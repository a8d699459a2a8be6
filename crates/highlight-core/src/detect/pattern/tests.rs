//! Tests for the pattern detectors

use super::*;
use approx::assert_abs_diff_eq;

/// 10 frames per second, all per-frame series filled with `base`
fn flat_features(frames: usize, base: f64) -> FeatureSeries {
    FeatureSeries {
        duration: frames as f64 / 10.0,
        sample_rate: 1000,
        hop_length: 100,
        times: (0..frames).map(|i| i as f64 / 10.0).collect(),
        rms: vec![base; frames],
        spectral_centroid: vec![base; frames],
        zero_crossing_rate: vec![base; frames],
        spectral_flatness: vec![base; frames],
        frequency_bins: vec![100.0, 400.0, 600.0, 2000.0],
        stft_magnitude: vec![vec![base; frames]; 4],
        ..Default::default()
    }
}

/// Bursty mid-band energy plus high ZCR over `[start, end)`
fn with_laughter(mut fs: FeatureSeries, start: usize, end: usize) -> FeatureSeries {
    for t in start..end {
        let level = if t % 2 == 0 { 1.0 } else { 0.5 };
        fs.stft_magnitude[1][t] = level;
        fs.stft_magnitude[2][t] = level;
        fs.zero_crossing_rate[t] = 1.0;
    }
    fs
}

#[test]
fn test_laughter_detected() {
    let fs = with_laughter(flat_features(200, 0.0), 50, 100);
    let events = LaughterDetector::new(&LaughterConfig::default()).detect(&fs);

    assert_eq!(events.len(), 1);
    let ev = &events[0];
    assert_abs_diff_eq!(ev.time, 5.0, epsilon = 0.15);
    let confidence = ev.confidence.unwrap();
    assert!(confidence > 0.7 && confidence <= 1.0);
    assert!(ev.duration.unwrap() > 4.0 && ev.duration.unwrap() <= 5.0);
    assert!(ev.intensity.is_none());
}

#[test]
fn test_short_laughter_span_dropped() {
    let fs = with_laughter(flat_features(200, 0.0), 50, 58);
    let events = LaughterDetector::new(&LaughterConfig::default()).detect(&fs);
    assert!(events.is_empty());
}

#[test]
fn test_laughter_without_band_bins() {
    let mut fs = with_laughter(flat_features(200, 0.0), 50, 100);
    fs.frequency_bins = vec![50.0, 60.0, 1000.0, 2000.0];
    let detector = LaughterDetector::new(&LaughterConfig::default());
    assert!(detector.score(&fs).is_empty());
    assert!(detector.detect(&fs).is_empty());
}

#[test]
fn test_laughter_score_truncates_to_shortest() {
    let mut fs = with_laughter(flat_features(200, 0.0), 50, 100);
    fs.zero_crossing_rate.truncate(120);
    let detector = LaughterDetector::new(&LaughterConfig::default());
    assert_eq!(detector.score(&fs).len(), 120);
    // must not index past the shorter series
    let _ = detector.detect(&fs);
}

#[test]
fn test_applause_detected() {
    let mut fs = flat_features(300, 0.0);
    for t in (100..130).chain(200..205) {
        fs.zero_crossing_rate[t] = 1.0;
        fs.spectral_flatness[t] = 1.0;
    }

    let events = ApplauseDetector::new(&ApplauseConfig::default()).detect(&fs);
    assert_eq!(events.len(), 1);
    assert_abs_diff_eq!(events[0].time, 10.1, epsilon = 0.11);
    assert!(events[0].duration.unwrap() >= 2.5);
    assert!(events[0].intensity.unwrap() > 0.8);
    assert!(events[0].description.starts_with("applause ("));
}

#[test]
fn test_cheering_detected() {
    let mut fs = flat_features(200, 0.1);
    for t in (50..70).chain(150..155) {
        fs.spectral_centroid[t] = 1.0;
        fs.rms[t] = 1.0;
    }

    let events = CheeringDetector::new(&CheeringConfig::default()).detect(&fs);
    assert_eq!(events.len(), 1);
    assert_abs_diff_eq!(events[0].time, 5.0);
    assert_abs_diff_eq!(events[0].duration.unwrap(), 2.0, epsilon = 1e-9);
    assert_abs_diff_eq!(events[0].intensity.unwrap(), 1.0, epsilon = 1e-9);
}

#[test]
fn test_cheering_misaligned_lengths() {
    let mut fs = flat_features(200, 0.1);
    for t in 50..70 {
        fs.spectral_centroid[t] = 1.0;
        fs.rms[t] = 1.0;
    }
    fs.spectral_centroid.truncate(100);
    let detector = CheeringDetector::new(&CheeringConfig::default());
    assert_eq!(detector.score(&fs).len(), 100);

    let events = detector.detect(&fs);
    assert_eq!(events.len(), 1);
    // frame 50 of the shorter score is still frame 50 of the time axis
    assert_eq!(events[0].time, fs.times[50]);
}

#[test]
fn test_applause_misaligned_lengths() {
    let mut fs = flat_features(300, 0.0);
    for t in (100..130).chain(200..205) {
        fs.zero_crossing_rate[t] = 1.0;
        fs.spectral_flatness[t] = 1.0;
    }
    fs.spectral_flatness.truncate(280);

    let events = ApplauseDetector::new(&ApplauseConfig::default()).detect(&fs);
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].time, fs.times[101]);
    assert_abs_diff_eq!(events[0].duration.unwrap(), 2.8, epsilon = 1e-9);
}

#[test]
fn test_constant_features_yield_nothing() {
    let fs = flat_features(200, 0.3);
    assert!(LaughterDetector::new(&Default::default()).detect(&fs).is_empty());
    assert!(ApplauseDetector::new(&Default::default()).detect(&fs).is_empty());
    assert!(CheeringDetector::new(&Default::default()).detect(&fs).is_empty());
}

#[test]
fn test_empty_features_yield_nothing() {
    let fs = flat_features(0, 0.0);
    assert!(LaughterDetector::new(&Default::default()).detect(&fs).is_empty());
    assert!(ApplauseDetector::new(&Default::default()).detect(&fs).is_empty());
    assert!(CheeringDetector::new(&Default::default()).detect(&fs).is_empty());
}
