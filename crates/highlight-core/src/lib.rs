//! Highlight Core - Highlight Detection & Segmentation Library
//!
//! Scans pre-computed audio feature series for acoustic events (volume
//! peaks, surprises, sustained loudness, laughter, applause, cheering),
//! merges events that fall close together and turns the groups into a
//! chronological list of titled timeline sections, optionally enriched with
//! transcript text. Talks without much audience noise can instead be split
//! into topic sections from the transcript alone.

pub mod config;
pub mod detect;
pub mod error;
pub mod event;
pub mod features;
pub mod kinds;
pub mod merge;
pub mod section;
pub mod signal;
pub mod topics;
pub mod transcript;

pub use config::HighlightConfig;
pub use detect::{DetectorBank, EventDetector};
pub use error::{HighlightError, Result};
pub use event::{Event, EventKind, HighlightKind, KindHistogram};
pub use features::FeatureSeries;
pub use kinds::{KindEntry, KindTable};
pub use merge::EventMerger;
pub use section::{format_timestamp, Section, SectionBuilder};
pub use topics::{TopicSection, TopicSectioner};
pub use transcript::{RawSegment, Transcript, TranscriptSegment};

/// Detection pipeline bound to one validated configuration
pub struct HighlightEngine {
    config: HighlightConfig,
    detectors: DetectorBank,
}

impl HighlightEngine {
    pub fn new(config: HighlightConfig) -> Result<Self> {
        // Validate configuration
        config.validate()?;

        // Build enabled detectors
        let detectors = DetectorBank::new(&config);
        Ok(Self { config, detectors })
    }

    pub fn config(&self) -> &HighlightConfig {
        &self.config
    }

    /// Run every enabled detector; events come back sorted by time
    pub fn detect_events(&self, features: &FeatureSeries) -> Result<Vec<Event>> {
        // Validate input
        features.validate()?;

        log::info!(
            "Detecting events over {} frames ({:.1}s) with {} detectors",
            features.num_frames(),
            features.duration,
            self.detectors.len()
        );

        let events = self.detectors.detect_all(features);
        log::info!("Detected {} events", events.len());
        Ok(events)
    }

    /// Merge detected events into groups
    pub fn merge_events(&self, events: &[Event]) -> Vec<Event> {
        EventMerger::new(self.config.merge.threshold_s, &self.config.kinds).merge(events)
    }

    /// Titled, prioritized sections in chronological order
    pub fn build_sections(&self, merged: &[Event], transcript: Option<&Transcript>) -> Vec<Section> {
        SectionBuilder::new(&self.config.kinds, &self.config.transcript).build(merged, transcript)
    }

    /// Full pipeline: detect, merge, build sections
    pub fn run(
        &self,
        features: &FeatureSeries,
        transcript: Option<&Transcript>,
    ) -> Result<Vec<Section>> {
        // Detect events
        let events = self.detect_events(features)?;

        // Merge close events
        let merged = self.merge_events(&events);

        // Build sections
        let sections = self.build_sections(&merged, transcript);

        log::info!(
            "Built {} sections from {} events",
            sections.len(),
            events.len()
        );
        Ok(sections)
    }

    /// Topic sections from the transcript alone
    pub fn detect_topics(&self, transcript: &Transcript) -> Vec<TopicSection> {
        TopicSectioner::new(&self.config.topics).sections(transcript)
    }
}

/// Detect highlight sections in one call
pub fn detect_highlights(
    features: &FeatureSeries,
    transcript: Option<&Transcript>,
    config: &HighlightConfig,
) -> Result<Vec<Section>> {
    HighlightEngine::new(config.clone())?.run(features, transcript)
}

/// Split a transcript into topic sections in one call
pub fn detect_topic_sections(
    transcript: &Transcript,
    config: &HighlightConfig,
) -> Result<Vec<TopicSection>> {
    Ok(HighlightEngine::new(config.clone())?.detect_topics(transcript))
}
