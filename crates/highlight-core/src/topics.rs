//! Topic sections from speech alone
//!
//! Segments announcing a new topic ("next", "moving on", 次は, ...) open a
//! section unless the current one is still too short. A transcript without
//! any such cue is cut into fixed-length sections instead.

use crate::config::TopicConfig;
use crate::section::format_timestamp;
use crate::transcript::{truncate_chars, Transcript, TranscriptSegment};
use serde::Serialize;


/// Title text is cut at the first of these (in this order of preference)
const TITLE_DELIMITERS: [char; 4] = ['。', '、', ',', '.'];

/// One topic of a talk
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TopicSection {
    pub start_time: f64,
    pub start_time_str: String,
    pub title: String,
    /// All segment text of the section, joined with spaces
    pub text: String,
}

/// Section under construction
struct Draft<'t> {
    start: f64,
    title: String,
    segments: Vec<&'t TranscriptSegment>,
}

impl<'t> Draft<'t> {
    fn new(start: f64, title: String, first: &'t TranscriptSegment) -> Self {
        Self {
            start,
            title,
            segments: vec![first],
        }
    }

    fn finish(self) -> TopicSection {
        let text = self
            .segments
            .iter()
            .map(|s| s.text.trim())
            .collect::<Vec<_>>()
            .join(" ");
        TopicSection {
            start_time: self.start,
            start_time_str: format_timestamp(self.start),
            title: self.title,
            text,
        }
    }
}

/// Splits a transcript into topic sections at spoken cues
pub struct TopicSectioner<'a> {
    config: &'a TopicConfig,
    cues: Vec<Vec<String>>,
}

impl<'a> TopicSectioner<'a> {
    pub fn new(config: &'a TopicConfig) -> Self {
        let cues = config
            .cues
            .iter()
            .map(|cue| {
                cue.to_lowercase()
                    .split('*')
                    .filter(|p| !p.is_empty())
                    .map(str::to_string)
                    .collect::<Vec<_>>()
            })
            .filter(|parts| !parts.is_empty())
            .collect();
        Self { config, cues }
    }

    /// Whether the text contains any cue (parts of a cue in order)
    pub fn is_topic_start(&self, text: &str) -> bool {
        let text = text.to_lowercase();
        self.cues.iter().any(|parts| contains_in_order(&text, parts))
    }

    /// First clause of the segment text, bounded in length
    pub fn title_for(&self, text: &str) -> String {
        let max = self.config.title_max_chars;
        let title = text.trim();
        if title.chars().count() <= max {
            return title.to_string();
        }
        let clause = TITLE_DELIMITERS
            .iter()
            .find_map(|&d| title.split_once(d).map(|(head, _)| head))
            .unwrap_or(title);
        truncate_chars(clause, max)
    }

    pub fn sections(&self, transcript: &Transcript) -> Vec<TopicSection> {
        let segments = &transcript.segments;
        if segments.is_empty() {
            return Vec::new();
        }

        let mut sections = Vec::new();
        let mut current: Option<Draft> = None;
        let mut cue_found = false;

        for segment in segments {
            if self.is_topic_start(&segment.text) {
                cue_found = true;
                let far_enough = current
                    .as_ref()
                    .map_or(true, |d| segment.start - d.start >= self.config.min_section_s);
                if far_enough {
                    sections.extend(current.take().map(Draft::finish));
                    current = Some(Draft::new(
                        segment.start,
                        self.title_for(&segment.text),
                        segment,
                    ));
                    continue;
                }
            }
            match current.as_mut() {
                Some(draft) => draft.segments.push(segment),
                // Talk before the first cue
                None => {
                    current = Some(Draft::new(0.0, self.config.intro_title.clone(), segment))
                }
            }
        }
        sections.extend(current.map(Draft::finish));

        if !cue_found {
            log::debug!("no topic cues found, splitting by time");
            sections = self.time_based(segments);
        }

        log::info!("Detected {} topic sections", sections.len());
        sections
    }

    /// Fixed-length sections numbered from 1
    fn time_based(&self, segments: &[TranscriptSegment]) -> Vec<TopicSection> {
        let title = |n: usize| format!("{} {}", self.config.fallback_title_prefix, n);

        let mut sections = Vec::new();
        let mut current = Draft {
            start: 0.0,
            title: title(1),
            segments: Vec::new(),
        };
        for segment in segments {
            if segment.start - current.start >= self.config.fallback_interval_s {
                let next = Draft::new(segment.start, title(sections.len() + 2), segment);
                sections.push(std::mem::replace(&mut current, next).finish());
            } else {
                current.segments.push(segment);
            }
        }
        if !current.segments.is_empty() {
            sections.push(current.finish());
        }
        sections
    }
}

fn contains_in_order(text: &str, parts: &[String]) -> bool {
    let mut rest = text;
    for part in parts {
        match rest.find(part.as_str()) {
            Some(pos) => rest = &rest[pos + part.len()..],
            None => return false,
        }
    }
    true
}
