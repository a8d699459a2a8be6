//! Event detectors
//!
//! Detectors are independent and read-only over the feature series, so the
//! bank runs them in parallel and only combines their output afterwards.

mod hysteresis;
mod pattern;
mod threshold;

pub use hysteresis::{spans_above, Span, SpanTracker};
pub use pattern::{ApplauseDetector, CheeringDetector, LaughterDetector};
pub use threshold::{SurpriseDetector, SustainedVolumeDetector, VolumePeakDetector};

use crate::config::HighlightConfig;
use crate::event::{sort_by_time, Event, EventKind};
use crate::features::FeatureSeries;
use rayon::prelude::*;

/// A stateless scan of a feature series for one kind of event
pub trait EventDetector: Send + Sync {
    fn kind(&self) -> EventKind;

    /// Events in ascending time order; empty for degenerate input
    fn detect(&self, features: &FeatureSeries) -> Vec<Event>;
}

/// The set of enabled detectors
pub struct DetectorBank {
    detectors: Vec<Box<dyn EventDetector>>,
}

impl DetectorBank {
    pub fn new(config: &HighlightConfig) -> Self {
        let mut detectors: Vec<Box<dyn EventDetector>> = Vec::new();
        if config.volume_peak.enabled {
            detectors.push(Box::new(VolumePeakDetector::new(&config.volume_peak)));
        }
        if config.surprise.enabled {
            detectors.push(Box::new(SurpriseDetector::new(&config.surprise)));
        }
        if config.sustained.enabled {
            detectors.push(Box::new(SustainedVolumeDetector::new(&config.sustained)));
        }
        if config.laughter.enabled {
            detectors.push(Box::new(LaughterDetector::new(&config.laughter)));
        }
        if config.applause.enabled {
            detectors.push(Box::new(ApplauseDetector::new(&config.applause)));
        }
        if config.cheering.enabled {
            detectors.push(Box::new(CheeringDetector::new(&config.cheering)));
        }
        Self { detectors }
    }

    pub fn with_detectors(detectors: Vec<Box<dyn EventDetector>>) -> Self {
        Self { detectors }
    }

    pub fn kinds(&self) -> Vec<EventKind> {
        self.detectors.iter().map(|d| d.kind()).collect()
    }

    pub fn len(&self) -> usize {
        self.detectors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.detectors.is_empty()
    }

    /// Run every detector and return the combined events sorted by time
    pub fn detect_all(&self, features: &FeatureSeries) -> Vec<Event> {
        let per_detector: Vec<(EventKind, Vec<Event>)> = self
            .detectors
            .par_iter()
            .map(|d| (d.kind(), d.detect(features)))
            .collect();

        for (kind, events) in &per_detector {
            log::info!("  {}: {} events", kind, events.len());
        }

        let mut all: Vec<Event> = per_detector
            .into_iter()
            .flat_map(|(_, events)| events)
            .collect();
        sort_by_time(&mut all);
        all
    }
}
