//! Timeline sections built from merged events

use crate::config::TranscriptConfig;
use crate::event::{Event, HighlightKind};
use crate::kinds::KindTable;
use crate::transcript::Transcript;
use serde::Serialize;

#[cfg(test)]
mod tests;

/// Intensity above which a title gets the "large" qualifier
const LARGE_INTENSITY: f64 = 2.0;
/// Intensity above which a title gets no qualifier
const PLAIN_INTENSITY: f64 = 1.5;

/// One entry of the highlight timeline
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Section {
    /// Seconds from the start of the recording
    pub start_time: f64,
    /// `MM:SS`, or `HH:MM:SS` past the first hour
    pub start_time_str: String,
    pub title: String,
    #[serde(rename = "type")]
    pub kind: HighlightKind,
    pub intensity: f64,
    pub event_count: usize,
    /// Informational; sections stay in chronological order
    pub priority_score: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub full_text: Option<String>,
}

/// Format seconds as `MM:SS` or `HH:MM:SS`, dropping fractions
pub fn format_timestamp(seconds: f64) -> String {
    let total = seconds.max(0.0) as u64;
    let (hours, minutes, secs) = (total / 3600, (total % 3600) / 60, total % 60);
    if hours > 0 {
        format!("{:02}:{:02}:{:02}", hours, minutes, secs)
    } else {
        format!("{:02}:{:02}", minutes, secs)
    }
}

/// `weight * intensity * (1 + ln(count))`
pub fn priority_score(weight: f64, intensity: f64, event_count: usize) -> f64 {
    weight * intensity * (1.0 + (event_count.max(1) as f64).ln())
}

/// Turns merged events into titled, prioritized sections
pub struct SectionBuilder<'a> {
    kinds: &'a KindTable,
    transcript: &'a TranscriptConfig,
}

impl<'a> SectionBuilder<'a> {
    pub fn new(kinds: &'a KindTable, transcript: &'a TranscriptConfig) -> Self {
        Self { kinds, transcript }
    }

    /// One section per merged event, sorted by start time
    pub fn build(&self, merged: &[Event], transcript: Option<&Transcript>) -> Vec<Section> {
        let mut sections: Vec<Section> = merged
            .iter()
            .map(|event| self.section_for(event, transcript))
            .collect();
        sections.sort_by(|a, b| a.start_time.total_cmp(&b.start_time));

        let enriched = sections.iter().filter(|s| s.content.is_some()).count();
        log::debug!(
            "built {} sections ({} with transcript text)",
            sections.len(),
            enriched
        );
        sections
    }

    fn section_for(&self, event: &Event, transcript: Option<&Transcript>) -> Section {
        let intensity = event.intensity.unwrap_or(1.0);
        let excerpt = transcript.and_then(|t| t.excerpt(event.time, self.transcript));

        Section {
            start_time: event.time,
            start_time_str: format_timestamp(event.time),
            title: self.title(event, intensity),
            kind: event.kind.clone(),
            intensity,
            event_count: event.event_count,
            priority_score: priority_score(
                self.kinds.weight(&event.kind),
                intensity,
                event.event_count,
            ),
            content: excerpt.as_ref().map(|e| e.content.clone()),
            full_text: excerpt.map(|e| e.full_text),
        }
    }

    /// Emoji, magnitude qualifier (never for composites), description
    pub fn title(&self, event: &Event, intensity: f64) -> String {
        let emoji = &self.kinds.entry(&event.kind).emoji;
        let qualifier = if event.kind.is_mixed() {
            None
        } else if intensity > LARGE_INTENSITY {
            Some(&self.kinds.qualifier_large)
        } else if intensity > PLAIN_INTENSITY {
            None
        } else {
            Some(&self.kinds.qualifier_small)
        };

        match qualifier {
            Some(q) if !q.is_empty() => format!("{} {} {}", emoji, q, event.description),
            _ => format!("{} {}", emoji, event.description),
        }
    }
}
