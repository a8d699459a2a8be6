//! Acoustic events emitted by the detectors and folded by the merger

use serde::{Serialize, Serializer};
use std::fmt;

/// The six kinds of event a detector can produce
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EventKind {
    VolumePeak,
    Surprise,
    SustainedHighVolume,
    Laughter,
    Applause,
    Cheering,
}

impl EventKind {
    pub const ALL: [EventKind; 6] = [
        EventKind::VolumePeak,
        EventKind::Surprise,
        EventKind::SustainedHighVolume,
        EventKind::Laughter,
        EventKind::Applause,
        EventKind::Cheering,
    ];

    /// Stable machine name, as used in JSON output
    pub fn as_str(&self) -> &'static str {
        match self {
            EventKind::VolumePeak => "volume_peak",
            EventKind::Surprise => "surprise",
            EventKind::SustainedHighVolume => "sustained_high_volume",
            EventKind::Laughter => "laughter",
            EventKind::Applause => "applause",
            EventKind::Cheering => "cheering",
        }
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Member counts per kind, in first-seen order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KindHistogram {
    counts: Vec<(EventKind, usize)>,
}

impl KindHistogram {
    pub fn add(&mut self, kind: EventKind, count: usize) {
        match self.counts.iter_mut().find(|(k, _)| *k == kind) {
            Some((_, c)) => *c += count,
            None => self.counts.push((kind, count)),
        }
    }

    pub fn count(&self, kind: EventKind) -> usize {
        self.counts
            .iter()
            .find(|(k, _)| *k == kind)
            .map(|(_, c)| *c)
            .unwrap_or(0)
    }

    /// Number of distinct kinds
    pub fn len(&self) -> usize {
        self.counts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    pub fn total(&self) -> usize {
        self.counts.iter().map(|(_, c)| c).sum()
    }

    /// Kinds by descending count; ties keep first-seen order
    pub fn ranked(&self) -> Vec<(EventKind, usize)> {
        let mut ranked = self.counts.clone();
        ranked.sort_by(|a, b| b.1.cmp(&a.1));
        ranked
    }
}

/// Type of a merged event or section
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HighlightKind {
    Single(EventKind),
    /// Group with more than one member kind
    Mixed(KindHistogram),
}

impl HighlightKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            HighlightKind::Single(kind) => kind.as_str(),
            HighlightKind::Mixed(_) => "mixed",
        }
    }

    pub fn is_mixed(&self) -> bool {
        matches!(self, HighlightKind::Mixed(_))
    }
}

impl From<EventKind> for HighlightKind {
    fn from(kind: EventKind) -> Self {
        HighlightKind::Single(kind)
    }
}

impl fmt::Display for HighlightKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for HighlightKind {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

/// A detected (or merged) acoustic event
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Event {
    /// Seconds from the start of the recording
    pub time: f64,
    #[serde(rename = "type")]
    pub kind: HighlightKind,
    /// Detector-specific magnitude relative to a baseline
    #[serde(skip_serializing_if = "Option::is_none")]
    pub intensity: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub confidence: Option<f64>,
    pub description: String,
    /// Number of detector events folded into this one
    pub event_count: usize,
}

impl Event {
    /// Fresh detector event with no optional fields set
    pub fn new(time: f64, kind: EventKind, description: impl Into<String>) -> Self {
        Self {
            time,
            kind: HighlightKind::Single(kind),
            intensity: None,
            duration: None,
            confidence: None,
            description: description.into(),
            event_count: 1,
        }
    }

    pub fn with_intensity(mut self, intensity: f64) -> Self {
        self.intensity = Some(intensity);
        self
    }

    pub fn with_duration(mut self, duration: f64) -> Self {
        self.duration = Some(duration);
        self
    }

    pub fn with_confidence(mut self, confidence: f64) -> Self {
        self.confidence = Some(confidence);
        self
    }

    /// Add this event's members to a histogram
    pub fn tally_into(&self, histogram: &mut KindHistogram) {
        match &self.kind {
            HighlightKind::Single(kind) => histogram.add(*kind, self.event_count),
            HighlightKind::Mixed(inner) => {
                for (kind, count) in &inner.counts {
                    histogram.add(*kind, *count);
                }
            }
        }
    }
}

/// Sort events ascending by time; NaN-safe and stable
pub fn sort_by_time(events: &mut [Event]) {
    events.sort_by(|a, b| a.time.total_cmp(&b.time));
}
