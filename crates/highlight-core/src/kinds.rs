//! Per-kind lookup tables: importance weight, emoji and display label
//!
//! Passed by reference into the merger and section builder, so alternate
//! weightings or localized labels can be swapped in from configuration.

use crate::event::{EventKind, HighlightKind};
use serde::{Deserialize, Serialize};

/// Weight, emoji and label for one kind
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KindEntry {
    pub weight: f64,
    pub emoji: String,
    pub label: String,
}

impl KindEntry {
    fn new(weight: f64, emoji: &str, label: &str) -> Self {
        Self {
            weight,
            emoji: emoji.to_string(),
            label: label.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct KindTable {
    pub volume_peak: KindEntry,
    pub surprise: KindEntry,
    pub sustained_high_volume: KindEntry,
    pub laughter: KindEntry,
    pub applause: KindEntry,
    pub cheering: KindEntry,
    pub mixed: KindEntry,

    /// Qualifier for intensity above 2.0
    pub qualifier_large: String,
    /// Qualifier for intensity at or below 1.5
    pub qualifier_small: String,
    /// Joins member kinds in a composite description
    pub list_separator: String,
}

impl Default for KindTable {
    fn default() -> Self {
        Self {
            volume_peak: KindEntry::new(1.0, "🔊", "volume peak"),
            surprise: KindEntry::new(1.5, "😱", "surprise"),
            sustained_high_volume: KindEntry::new(1.2, "🔥", "sustained excitement"),
            laughter: KindEntry::new(1.3, "😂", "laughter"),
            applause: KindEntry::new(1.4, "👏", "applause"),
            cheering: KindEntry::new(1.2, "🎉", "cheering"),
            mixed: KindEntry::new(1.0, "🎊", "composite event"),
            qualifier_large: "large".to_string(),
            qualifier_small: "small".to_string(),
            list_separator: ", ".to_string(),
        }
    }
}

impl KindTable {
    pub fn event(&self, kind: EventKind) -> &KindEntry {
        match kind {
            EventKind::VolumePeak => &self.volume_peak,
            EventKind::Surprise => &self.surprise,
            EventKind::SustainedHighVolume => &self.sustained_high_volume,
            EventKind::Laughter => &self.laughter,
            EventKind::Applause => &self.applause,
            EventKind::Cheering => &self.cheering,
        }
    }

    pub fn entry(&self, kind: &HighlightKind) -> &KindEntry {
        match kind {
            HighlightKind::Single(kind) => self.event(*kind),
            HighlightKind::Mixed(_) => &self.mixed,
        }
    }

    pub fn weight(&self, kind: &HighlightKind) -> f64 {
        self.entry(kind).weight
    }

    pub(crate) fn entries(&self) -> impl Iterator<Item = (&'static str, &KindEntry)> {
        EventKind::ALL
            .into_iter()
            .map(|k| (k.as_str(), self.event(k)))
            .chain(std::iter::once(("mixed", &self.mixed)))
    }
}
